//! Paired (current, original) tree walk.
//!
//! Every structural edit made after aggregation goes through a [`Paired`] handle so the
//! same topology change lands on both trees. Projections check that the requested
//! substructure exists on *both* sides before handing out the child pair, so an edit
//! either applies to both trees or to neither.

use std::ops::Range;

use crate::foundation::error::{ShowError, ShowResult};
use crate::model::script::{Animation, Effect, Layer, Scene};

/// Mutable handle on a node of the current tree and its mirror in the original tree.
#[derive(Debug)]
pub struct Paired<'a, T> {
    cur: &'a mut T,
    orig: &'a mut T,
}

impl<'a, T> Paired<'a, T> {
    /// Pair a current node with its original counterpart.
    pub fn new(cur: &'a mut T, orig: &'a mut T) -> Self {
        Self { cur, orig }
    }

    /// The working-tree node.
    pub fn current(&self) -> &T {
        self.cur
    }

    /// The authoring-time node.
    pub fn original(&self) -> &T {
        self.orig
    }

    /// Shorter-lived handle on the same pair.
    pub fn reborrow(&mut self) -> Paired<'_, T> {
        Paired {
            cur: &mut *self.cur,
            orig: &mut *self.orig,
        }
    }

    /// Descend into a child selected by `f`, failing unless it exists in both trees.
    pub fn project<U>(
        self,
        what: &str,
        f: impl Fn(&mut T) -> Option<&mut U>,
    ) -> ShowResult<Paired<'a, U>> {
        match (f(self.cur), f(self.orig)) {
            (Some(cur), Some(orig)) => Ok(Paired { cur, orig }),
            (None, None) => Err(ShowError::structure(format!("missing {what}"))),
            _ => Err(ShowError::structure(format!(
                "{what} present in only one of current/original"
            ))),
        }
    }

    /// Apply the same in-place edit to both trees.
    pub fn edit(&mut self, f: impl Fn(&mut T)) {
        f(self.cur);
        f(self.orig);
    }
}

/// Zip two sibling lists into pairs, failing on a length mismatch.
pub fn zip_pairs<'a, U>(
    what: &str,
    cur: &'a mut [U],
    orig: &'a mut [U],
) -> ShowResult<impl Iterator<Item = Paired<'a, U>> + use<'a, U>> {
    if cur.len() != orig.len() {
        return Err(ShowError::structure(format!(
            "{what}: {} current vs {} original",
            cur.len(),
            orig.len()
        )));
    }
    Ok(cur
        .iter_mut()
        .zip(orig.iter_mut())
        .map(|(cur, orig)| Paired { cur, orig }))
}

impl<'a> Paired<'a, Scene> {
    /// Visit every effect of this scene and, recursively, of its hyperlink state scenes.
    pub fn for_each_effect(
        &mut self,
        f: &mut dyn FnMut(Paired<'_, Effect>) -> ShowResult<()>,
    ) -> ShowResult<()> {
        for effect in zip_pairs("effects", &mut self.cur.effects, &mut self.orig.effects)? {
            f(effect)?;
        }
        for link in zip_pairs(
            "hyperlinks",
            &mut self.cur.hyperlinks,
            &mut self.orig.hyperlinks,
        )? {
            let Paired { cur, orig } = link;
            if !cur.events.keys().eq(orig.events.keys()) {
                return Err(ShowError::structure("hyperlink state names differ"));
            }
            for (c, o) in cur.events.values_mut().zip(orig.events.values_mut()) {
                Paired::new(c, o).for_each_effect(f)?;
            }
        }
        Ok(())
    }
}

impl<'a> Paired<'a, Effect> {
    /// Effect identifier (identical on both sides).
    pub fn name(&self) -> &str {
        &self.cur.name
    }

    /// The effect's private layer tree.
    pub fn base_layer(self) -> Paired<'a, Layer> {
        let Self { cur, orig } = self;
        Paired {
            cur: &mut cur.base_layer,
            orig: &mut orig.base_layer,
        }
    }

    /// Visit each nested effect.
    pub fn for_each_nested(
        &mut self,
        f: &mut dyn FnMut(Paired<'_, Effect>) -> ShowResult<()>,
    ) -> ShowResult<()> {
        for nested in zip_pairs("effects", &mut self.cur.effects, &mut self.orig.effects)? {
            f(nested)?;
        }
        Ok(())
    }
}

impl<'a> Paired<'a, Layer> {
    /// Child layer `i`.
    pub fn layer(self, i: usize) -> ShowResult<Paired<'a, Layer>> {
        self.project(&format!("layers[{i}]"), |l| l.layers.get_mut(i))
    }

    /// Animation `i`.
    pub fn animation(self, i: usize) -> ShowResult<Paired<'a, Animation>> {
        self.project(&format!("animations[{i}]"), |l| l.animations.get_mut(i))
    }

    /// Number of child layers.
    pub fn layer_count(&self) -> usize {
        self.cur.layers.len()
    }

    /// Remove the child layers in `range`, clamped to the existing children.
    pub fn drain_layers(&mut self, range: Range<usize>) {
        self.edit(|l| {
            let end = range.end.min(l.layers.len());
            let start = range.start.min(end);
            l.layers.drain(start..end);
        });
    }

    /// Keep only the first `len` child layers.
    pub fn truncate_layers(&mut self, len: usize) {
        self.edit(|l| l.layers.truncate(len));
    }

    /// Swap two child layers.
    pub fn swap_layers(&mut self, a: usize, b: usize) -> ShowResult<()> {
        let need = a.max(b) + 1;
        if self.cur.layers.len() < need || self.orig.layers.len() < need {
            return Err(ShowError::structure(format!(
                "cannot swap layers[{a}] and layers[{b}]: missing layers"
            )));
        }
        self.edit(|l| l.layers.swap(a, b));
        Ok(())
    }

    /// Deep-copy child layer `src` of each tree and insert the copy at `dst` in that tree.
    pub fn duplicate_layer(&mut self, src: usize, dst: usize) -> ShowResult<()> {
        if src >= self.cur.layers.len() || src >= self.orig.layers.len() {
            return Err(ShowError::structure(format!("missing layers[{src}]")));
        }
        if dst > self.cur.layers.len() {
            return Err(ShowError::structure(format!(
                "insert position {dst} is past the end of layers"
            )));
        }
        self.edit(|l| {
            let copy = l.layers[src].clone();
            l.layers.insert(dst, copy);
        });
        Ok(())
    }

    /// Drop all children and animations, keeping the layer's own initial state.
    pub fn strip(&mut self) {
        self.edit(|l| {
            l.layers.clear();
            l.animations.clear();
        });
    }

    /// Set the initial `hidden` flag in both trees.
    pub fn set_hidden(&mut self, hidden: bool) {
        self.edit(|l| l.initial_state.hidden = hidden);
    }

    /// Append an animation to both trees.
    pub fn push_animation(&mut self, anim: Animation) {
        self.cur.animations.push(anim.clone());
        self.orig.animations.push(anim);
    }
}

impl<'a> Paired<'a, Animation> {
    /// Child animation `i`.
    pub fn child(self, i: usize) -> ShowResult<Paired<'a, Animation>> {
        self.project(&format!("animations[{i}]"), |a| a.animations.get_mut(i))
    }

    /// Number of child animations.
    pub fn child_count(&self) -> usize {
        self.cur.animations.len()
    }

    /// Position of the first child matching `pred` in the current tree.
    pub fn find_child(&self, pred: impl Fn(&Animation) -> bool) -> Option<usize> {
        self.cur.animations.iter().position(pred)
    }

    /// Append a child animation to both trees.
    pub fn push_child(&mut self, anim: Animation) {
        self.cur.animations.push(anim.clone());
        self.orig.animations.push(anim);
    }

    /// Remove every child whose *current* copy matches `pred`, at the same positions in
    /// both trees. Returns how many were removed.
    pub fn remove_children(&mut self, pred: impl Fn(&Animation) -> bool) -> usize {
        let keep: Vec<bool> = self.cur.animations.iter().map(|a| !pred(a)).collect();
        let removed = keep.iter().filter(|k| !**k).count();
        self.edit(|a| {
            let mut idx = 0;
            a.animations.retain(|_| {
                let k = keep.get(idx).copied().unwrap_or(true);
                idx += 1;
                k
            });
        });
        removed
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/paired.rs"]
mod tests;
