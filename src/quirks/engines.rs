//! Rewrites that compensate for one engine family's compositing model.
//!
//! Every rule reads timing from the original tree (the two sides are equal before the
//! first rescale) and applies each edit to both trees through [`Paired`].

use crate::{
    foundation::error::{ShowError, ShowResult},
    model::paired::Paired,
    model::script::{AnimValue, Animation, Effect},
    quirks::names,
};

/// Duration of the trailing depth flip appended to falling pages.
const MARKER_SLACK: f64 = 0.01;
/// Delay before a promoted layer becomes visible relative to its first motion.
const REVEAL_DELAY: f64 = 0.03;
/// Fraction of the swap duration used for the opacity ramp's delay and length.
const SWAP_FADE_FRACTION: f64 = 0.4;

fn is_depth_marker(a: &Animation) -> bool {
    a.property == names::PROP_TRANSLATION_Z
}

fn hidden_toggle(begin: f64, duration: f64, hidden: bool) -> Animation {
    Animation::synthetic(
        names::PROP_HIDDEN,
        begin,
        duration,
        AnimValue::flag(hidden),
        AnimValue::flag(hidden),
    )
}

fn first_child_timing(anim: &Animation, what: &str) -> ShowResult<(f64, f64)> {
    anim.animations
        .first()
        .map(|c| (c.begin_time, c.duration))
        .ok_or_else(|| ShowError::structure(format!("missing {what}.animations[0]")))
}

/// Falling page: keep the page in front for its fall, then push it behind.
///
/// Appends `translation.z` markers `{1 -> 1}` over the fall and `{-1 -> -1}` for the
/// final [`MARKER_SLACK`] seconds to the page's animation group.
pub(crate) fn fall_depth_markers(effect: Paired<'_, Effect>) -> ShowResult<()> {
    let mut group = effect.base_layer().layer(0)?.layer(1)?.animation(0)?;
    let (begin, duration) = (group.original().begin_time, group.original().duration);
    if group.original().animations.is_empty() {
        tracing::debug!("fall page has no child animations; leaving it unchanged");
        return Ok(());
    }
    group.push_child(Animation::synthetic(
        names::PROP_TRANSLATION_Z,
        begin,
        duration - MARKER_SLACK,
        AnimValue::number(1.0),
        AnimValue::number(1.0),
    ));
    group.push_child(Animation::synthetic(
        names::PROP_TRANSLATION_Z,
        duration - MARKER_SLACK,
        MARKER_SLACK,
        AnimValue::number(-1.0),
        AnimValue::number(-1.0),
    ));
    Ok(())
}

/// Move the animated layer behind its sibling, hide it initially, and replace its
/// depth markers with a `hidden` toggle that reveals it when its motion starts.
pub(crate) fn promote_hidden_layer(effect: Paired<'_, Effect>) -> ShowResult<()> {
    let mut root = effect.base_layer().layer(0)?;
    if root.reborrow().layer(0)?.original().animations.is_empty() {
        return Ok(());
    }
    root.swap_layers(0, 1)?;

    let mut moved = root.layer(1)?;
    moved.set_hidden(true);
    let mut group = moved.animation(0)?;
    let (begin, duration) = (group.original().begin_time, group.original().duration);
    let (first_begin, _) = first_child_timing(group.original(), "layers[1].animations[0]")?;

    if begin == first_begin {
        group.remove_children(is_depth_marker);
        group.push_child(hidden_toggle(begin, duration, false));
    } else {
        let mut inner = group.child(0)?;
        inner.remove_children(is_depth_marker);
        let (b, d) = first_child_timing(inner.original(), "layers[1].animations[0].animations[0]")?;
        inner.push_child(hidden_toggle(b + REVEAL_DELAY, d, false));
    }
    Ok(())
}

/// Swap: fade the outgoing page out over the middle of the effect.
///
/// The opacity child is looked up in the page's group, or one level deeper when the
/// group wraps a single child. A page without opacity animation is left as is.
pub(crate) fn swap_opacity_retime(effect: Paired<'_, Effect>) -> ShowResult<()> {
    let group = effect.base_layer().layer(0)?.layer(1)?.animation(0)?;
    let (target, duration) = if group.child_count() > 1 {
        let d = group.original().duration;
        (group, d)
    } else {
        let inner = group.child(0)?;
        let d = inner.original().duration;
        (inner, d)
    };

    let Some(i) = target.find_child(|a| a.property == names::PROP_OPACITY) else {
        tracing::debug!("swap page has no opacity animation; leaving it unchanged");
        return Ok(());
    };
    let start = duration * SWAP_FADE_FRACTION;
    let length = duration * SWAP_FADE_FRACTION;
    target.child(i)?.edit(|a| {
        a.to = Some(AnimValue::number(0.0));
        a.begin_time = start;
        a.duration = length;
    });
    Ok(())
}

/// Doorway: empty the left door, give the right door the left door's timing, and drop
/// the third layer.
pub(crate) fn doorway(effect: Paired<'_, Effect>) -> ShowResult<()> {
    let mut root = effect.base_layer().layer(0)?;
    let (begin, first_begin, first_duration) = {
        let left = root.reborrow().layer(0)?.animation(0)?;
        let (b, d) = first_child_timing(left.original(), "layers[0].animations[0]")?;
        (left.original().begin_time, b, d)
    };

    root.reborrow().layer(0)?.strip();

    let mut right = root.reborrow().layer(1)?.animation(0)?.child(0)?;
    if begin == first_begin {
        right.edit(|a| {
            a.begin_time = first_begin;
            a.duration = first_duration;
        });
    } else {
        right.child(0)?.edit(|a| a.duration = first_duration);
    }

    root.drain_layers(2..3);
    Ok(())
}

/// Replace a 3D transition with a plain fade of the incoming layer over the whole
/// effect. Blinds also unhides both layers and drops the rest.
pub(crate) fn fade_replacement(effect: Paired<'_, Effect>) -> ShowResult<()> {
    let duration = effect.original().duration;
    let blinds = effect.name() == names::BLINDS;
    let mut root = effect.base_layer().layer(0)?;
    if root.layer_count() < 2 {
        return Err(ShowError::structure(format!(
            "fade replacement expects 2 layers, found {}",
            root.layer_count()
        )));
    }

    root.reborrow().layer(0)?.strip();
    {
        let mut incoming = root.reborrow().layer(1)?;
        incoming.strip();
        incoming.push_animation(
            Animation::synthetic(
                names::PROP_OPACITY,
                0.0,
                duration,
                AnimValue::number(1.0),
                AnimValue::number(0.0),
            )
            .with_fill_mode("both")
            .with_timing_function("easeInEaseOut"),
        );
    }

    if blinds {
        root.reborrow().layer(0)?.set_hidden(false);
        root.reborrow().layer(1)?.set_hidden(false);
        root.truncate_layers(2);
    }
    Ok(())
}

/// Page flip: duplicate the incoming page beneath everything and hide the flipping
/// page halfway through its turn.
pub(crate) fn flip_through(effect: Paired<'_, Effect>) -> ShowResult<()> {
    let mut root = effect.base_layer().layer(0)?;
    if root.reborrow().layer(0)?.original().animations.is_empty() {
        return Ok(());
    }
    root.duplicate_layer(1, 0)?;

    let (begin, duration, first_begin) = {
        let group = root.reborrow().layer(1)?.animation(0)?;
        let (b, _) = first_child_timing(group.original(), "layers[1].animations[0]")?;
        (group.original().begin_time, group.original().duration, b)
    };

    if begin == first_begin {
        root.reborrow()
            .layer(1)?
            .animation(0)?
            .remove_children(is_depth_marker);
        root.layer(2)?
            .animation(0)?
            .push_child(hidden_toggle(begin + duration / 2.0, duration / 2.0, true));
    } else {
        root.reborrow()
            .layer(1)?
            .animation(0)?
            .child(0)?
            .remove_children(is_depth_marker);
        let mut page = root.layer(2)?.animation(0)?.child(0)?;
        let (b, d) = first_child_timing(page.original(), "layers[2].animations[0].animations[0]")?;
        page.push_child(hidden_toggle(b + d / 2.0, d / 2.0, true));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/quirks/engines.rs"]
mod tests;
