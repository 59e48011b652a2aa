use crate::{
    foundation::core::Size,
    foundation::error::{ShowError, ShowResult},
    model::script::{
        AnimValue, Animation, Effect, Layer, Scalar, Scene, TRANSFORM_TX, TRANSFORM_TZ,
    },
    scale::tiles::{TileGrid, is_tile_effect, tile_rect},
    timeline::aggregate::ShowScript,
};

/// Depth values used as ordering markers; never scaled.
pub const DEPTH_SENTINELS: [f64; 2] = [1.0, 0.01];

/// `true` if `v` is a depth ordering marker.
pub fn is_depth_sentinel(v: f64) -> bool {
    DEPTH_SENTINELS.contains(&v)
}

/// How a property's samples respond to a scale factor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Channel {
    /// Scalar length.
    Length,
    /// Scalar depth; markers pass through.
    Depth,
    /// 2D point.
    Point,
    /// 4x4 matrix; only the translation column scales.
    Transform,
    /// `{width, height}`.
    Bounds,
}

fn channel(property: &str) -> Option<Channel> {
    Some(match property {
        "anchorPointZ" | "zPosition" | "transform.translation.x" | "transform.translation.y" => {
            Channel::Length
        }
        "transform.translation.z" => Channel::Depth,
        "position" | "transform.translation" => Channel::Point,
        "transform" => Channel::Transform,
        "bounds" => Channel::Bounds,
        // Ratios (transform.scale.*), angles, opacity and flags are scale-invariant.
        _ => return None,
    })
}

#[derive(Clone, Copy, Debug)]
struct ScaleCtx {
    k: f64,
    show: Size,
    grid: Option<TileGrid>,
}

/// Rewrite every pixel-valued leaf of the current tree as `original * k`.
///
/// The original tree is only read, so applying a new factor always starts from the
/// authoring-time values and repeated resizes never accumulate rounding.
#[tracing::instrument(skip(script), fields(scenes = script.num_scenes()))]
pub fn apply_scale(script: &mut ShowScript, k: f64) -> ShowResult<()> {
    if !(k.is_finite() && k > 0.0) {
        return Err(ShowError::validation(format!(
            "scale factor must be finite and > 0, got {k}"
        )));
    }
    let original = script.original_slide_size();
    let ctx = ScaleCtx {
        k,
        show: Size::new(original.width * k, original.height * k),
        grid: None,
    };

    same_len("scenes", &script.scenes, &script.original_scenes)?;
    for (cur, orig) in script.scenes.iter_mut().zip(&script.original_scenes) {
        scale_scene(cur, orig, ctx)?;
    }

    same_len(
        "slide assets",
        &script.slide_assets,
        &script.original_slide_assets,
    )?;
    for (cur, orig) in script
        .slide_assets
        .iter_mut()
        .zip(&script.original_slide_assets)
    {
        for (id, asset) in cur.iter_mut() {
            if let Some(o) = orig.get(id) {
                asset.width = o.width * k;
                asset.height = o.height * k;
            }
        }
    }

    script.slide_width = ctx.show.width;
    script.slide_height = ctx.show.height;
    script.scale_factor = k;
    tracing::debug!(
        width = script.slide_width,
        height = script.slide_height,
        "scale applied"
    );
    Ok(())
}

fn same_len<T>(what: &str, cur: &[T], orig: &[T]) -> ShowResult<()> {
    if cur.len() == orig.len() {
        Ok(())
    } else {
        Err(ShowError::structure(format!(
            "{what}: {} current vs {} original",
            cur.len(),
            orig.len()
        )))
    }
}

fn scale_scene(cur: &mut Scene, orig: &Scene, ctx: ScaleCtx) -> ShowResult<()> {
    scale_layer(&mut cur.base_layer, &orig.base_layer, ctx)?;

    same_len("effects", &cur.effects, &orig.effects)?;
    for (c, o) in cur.effects.iter_mut().zip(&orig.effects) {
        scale_effect(c, o, ctx)?;
    }

    same_len("hyperlinks", &cur.hyperlinks, &orig.hyperlinks)?;
    for (c, o) in cur.hyperlinks.iter_mut().zip(&orig.hyperlinks) {
        c.target_rectangle = o.target_rectangle.scaled(ctx.k);
        if !c.events.keys().eq(o.events.keys()) {
            return Err(ShowError::structure("hyperlink state names differ"));
        }
        for (cs, os) in c.events.values_mut().zip(o.events.values()) {
            scale_scene(cs, os, ctx)?;
        }
    }
    Ok(())
}

fn scale_effect(cur: &mut Effect, orig: &Effect, ctx: ScaleCtx) -> ShowResult<()> {
    let grid = if is_tile_effect(&orig.name) {
        orig.base_layer
            .layers
            .first()
            .map(|container| TileGrid::infer(&container.layers))
            .transpose()?
    } else {
        None
    };
    scale_layer(&mut cur.base_layer, &orig.base_layer, ScaleCtx { grid, ..ctx })?;

    same_len("nested effects", &cur.effects, &orig.effects)?;
    for (c, o) in cur.effects.iter_mut().zip(&orig.effects) {
        scale_effect(c, o, ScaleCtx { grid: None, ..ctx })?;
    }
    Ok(())
}

fn scale_layer(cur: &mut Layer, orig: &Layer, ctx: ScaleCtx) -> ShowResult<()> {
    let k = ctx.k;
    let s = &mut cur.initial_state;
    let o = &orig.initial_state;
    s.affine_transform[4] = o.affine_transform[4] * k;
    s.affine_transform[5] = o.affine_transform[5] * k;
    s.width = o.width * k;
    s.height = o.height * k;
    s.position = o.position.scaled(k);

    if let (Some(grid), Some(crop)) = (ctx.grid, o.contents_rect) {
        if !crop.is_unit() {
            let (col, row) = crop.grid_cell();
            let tile = tile_rect(ctx.show, col, row, grid);
            s.width = tile.size.width;
            s.height = tile.size.height;
            s.position = tile.position;
            s.contents_rect = Some(tile.contents_rect);
        }
    }

    same_len("animations", &cur.animations, &orig.animations)?;
    for (c, o) in cur.animations.iter_mut().zip(&orig.animations) {
        scale_animation(c, o, k)?;
    }

    same_len("layers", &cur.layers, &orig.layers)?;
    for (c, o) in cur.layers.iter_mut().zip(&orig.layers) {
        scale_layer(c, o, ctx)?;
    }
    Ok(())
}

fn scale_animation(cur: &mut Animation, orig: &Animation, k: f64) -> ShowResult<()> {
    if let (Some(cp), Some(op)) = (cur.path.as_mut(), orig.path.as_ref()) {
        for (cs, os) in cp.iter_mut().zip(op) {
            if let (Some(c), Some(o)) = (cs.points.first_mut(), os.points.first()) {
                *c = [o[0] * k, o[1] * k];
            }
        }
    }

    if let Some(ch) = channel(&orig.property) {
        let f = |c: &mut AnimValue, o: &AnimValue| scale_value(ch, c, o, k);
        if let (Some(c), Some(o)) = (cur.from.as_mut(), orig.from.as_ref()) {
            f(c, o);
        }
        if let (Some(c), Some(o)) = (cur.to.as_mut(), orig.to.as_ref()) {
            f(c, o);
        }
        if let (Some(cv), Some(ov)) = (cur.values.as_mut(), orig.values.as_ref()) {
            for (c, o) in cv.iter_mut().zip(ov) {
                f(c, o);
            }
        }
    }

    same_len("child animations", &cur.animations, &orig.animations)?;
    for (c, o) in cur.animations.iter_mut().zip(&orig.animations) {
        scale_animation(c, o, k)?;
    }
    Ok(())
}

fn scale_value(ch: Channel, cur: &mut AnimValue, orig: &AnimValue, k: f64) {
    match (ch, cur, orig) {
        (
            Channel::Length,
            AnimValue::Scalar {
                scalar: Scalar::Number(c),
            },
            o,
        ) => {
            if let Some(o) = o.as_number() {
                *c = o * k;
            }
        }
        (
            Channel::Depth,
            AnimValue::Scalar {
                scalar: Scalar::Number(c),
            },
            o,
        ) => {
            if let Some(o) = o.as_number() {
                *c = if is_depth_sentinel(o) { o } else { o * k };
            }
        }
        (Channel::Point, AnimValue::Point(c), AnimValue::Point(o)) => *c = o.scaled(k),
        (
            Channel::Transform,
            AnimValue::Transform { transform: c },
            AnimValue::Transform { transform: o },
        ) => {
            for i in TRANSFORM_TX..=TRANSFORM_TZ {
                if let (Some(c), Some(o)) = (c.get_mut(i), o.get(i)) {
                    *c = o * k;
                }
            }
        }
        (Channel::Bounds, AnimValue::Size(c), AnimValue::Size(o)) => {
            c.width = o.width * k;
            c.height = o.height * k;
        }
        _ => {}
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scale/geometry.rs"]
mod tests;
