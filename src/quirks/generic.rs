//! Engine-neutral cleanups of authoring-pipeline artifacts.

use crate::{
    foundation::error::{ShowError, ShowResult},
    model::paired::Paired,
    model::script::Effect,
};

/// Blinds used as a slide transition: drop the two leading control layers of the grid.
pub(crate) fn blinds_transition(effect: Paired<'_, Effect>) -> ShowResult<()> {
    if !effect.current().is_transition() {
        return Ok(());
    }
    drop_control_layers(effect)
}

/// Grid transition: drop the two leading control layers of the grid.
pub(crate) fn grid(effect: Paired<'_, Effect>) -> ShowResult<()> {
    drop_control_layers(effect)
}

fn drop_control_layers(effect: Paired<'_, Effect>) -> ShowResult<()> {
    let mut grid = effect.base_layer().layer(0)?;
    grid.drain_layers(0..2);
    Ok(())
}

/// Swoosh transition: drop the outgoing page's leading control layer and restore the
/// z-order of the two page layers.
pub(crate) fn swoosh_transition(effect: Paired<'_, Effect>) -> ShowResult<()> {
    if !effect.current().is_transition() {
        return Ok(());
    }
    let mut root = effect.base_layer().layer(0)?;
    if root.layer_count() < 3 {
        return Err(ShowError::structure(format!(
            "swoosh expects 3 page layers, found {}",
            root.layer_count()
        )));
    }
    root.reborrow().layer(1)?.layer(0)?.drain_layers(0..1);
    root.swap_layers(1, 2)
}

#[cfg(test)]
#[path = "../../tests/unit/quirks/generic.rs"]
mod tests;
