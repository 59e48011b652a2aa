//! Repetition expansion for emphasis builds.

use crate::{
    foundation::error::{ShowError, ShowResult},
    model::paired::Paired,
    model::script::{AnimValue, Animation, Effect},
    quirks::names,
};

/// Upper bound on how many times one jiggle cycle may repeat.
pub(crate) const MAX_JIGGLE_REPEATS: usize = 1000;

/// Unroll a jiggle's cycle animations so they repeat over the whole effect.
///
/// The jiggle group is `animations[0]` of the effect's first layer, or of that layer's
/// first child when the layer itself carries no animations. Each cycle child `h`
/// repeats `ceil(group.duration / h.duration)` times; clones are appended to the group
/// in both trees. The last clone is cut to the remaining time and its end value eased
/// back (rotation to `0`, position to the midpoint of its swing).
pub(crate) fn jiggle(effect: Paired<'_, Effect>) -> ShowResult<()> {
    let mut layer = effect.base_layer().layer(0)?;
    if layer.original().animations.is_empty() {
        layer = layer.layer(0)?;
    }
    let mut group = layer.animation(0)?;
    let total = group.original().duration;

    for h in 0..group.child_count() {
        let Some(cycle) = group.original().animations.get(h).map(|a| a.duration) else {
            return Err(ShowError::structure(format!(
                "jiggle cycle animations[{h}] missing from the original tree"
            )));
        };
        if !(cycle > 0.0 && cycle.is_finite()) {
            tracing::debug!(child = h, cycle, "skipping jiggle child without a cycle duration");
            continue;
        }
        let repeats = (total / cycle).ceil().max(1.0);
        if repeats > MAX_JIGGLE_REPEATS as f64 {
            return Err(ShowError::structure(format!(
                "jiggle cycle animations[{h}] would repeat {repeats} times \
                 (limit {MAX_JIGGLE_REPEATS})"
            )));
        }
        let repeats = repeats as usize;
        for g in 0..repeats - 1 {
            let begin = cycle * (g + 1) as f64;
            let last = g + 2 == repeats;
            group.edit(|a| {
                let Some(mut clone) = a.animations.get(h).cloned() else {
                    return;
                };
                clone.begin_time = begin;
                if last {
                    settle_last_cycle(&mut clone, total - begin);
                }
                a.animations.push(clone);
            });
        }
    }
    Ok(())
}

fn settle_last_cycle(clone: &mut Animation, remaining: f64) {
    clone.duration = remaining;
    match clone.property.as_str() {
        names::PROP_ROTATION_Z => clone.to = Some(AnimValue::number(0.0)),
        names::PROP_POSITION => {
            let from = clone.from.as_ref().and_then(AnimValue::as_point);
            let to = clone.to.as_ref().and_then(AnimValue::as_point);
            if let (Some(from), Some(to)) = (from, to) {
                clone.to = Some(AnimValue::Point(from.midpoint(to)));
            }
        }
        _ => {}
    }
}

#[cfg(test)]
#[path = "../../tests/unit/quirks/emphasis.rs"]
mod tests;
