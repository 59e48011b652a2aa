use crate::{
    foundation::error::{ShowError, ShowResult},
    model::paired::Paired,
    model::script::Effect,
    quirks::{registry::QuirkTable, variant::RendererVariant},
    timeline::aggregate::ShowScript,
};

/// One-shot structural normalization of a merged show for a renderer variant.
///
/// For every effect reachable from every scene (hyperlink state scenes included) the
/// adapter runs, in order: the generic table, the emphasis table over the effect and
/// its nested effects, then the variant's own table. A generic rule is skipped when the
/// variant table has its own rule for the same effect, since that rule expects the
/// authoring topology. Each rule edits current and original trees alike.
#[derive(Clone, Debug)]
pub struct QuirkAdapter {
    variant: RendererVariant,
    generic: QuirkTable,
    emphasis: QuirkTable,
    engine: QuirkTable,
}

impl QuirkAdapter {
    /// Adapter with the built-in tables for `variant`.
    pub fn new(variant: RendererVariant) -> Self {
        Self {
            variant,
            generic: QuirkTable::generic(),
            emphasis: QuirkTable::emphasis(),
            engine: QuirkTable::for_variant(variant),
        }
    }

    /// Replace the variant table, e.g. to register extra effect rules.
    pub fn with_engine_table(mut self, table: QuirkTable) -> Self {
        self.engine = table;
        self
    }

    /// Active variant.
    pub fn variant(&self) -> RendererVariant {
        self.variant
    }

    /// Rewrite `script` in place. A script is rewritten at most once.
    #[tracing::instrument(
        skip(self, script),
        fields(variant = %self.variant, scenes = script.num_scenes())
    )]
    pub fn apply(&self, script: &mut ShowScript) -> ShowResult<()> {
        if script.quirks_applied {
            return Err(ShowError::validation(
                "quirk rewrites were already applied to this script",
            ));
        }
        let mut rewritten = 0usize;
        for idx in 0..script.num_scenes() {
            let Some(mut scene) = script.scene_pair(idx) else {
                return Err(ShowError::structure(format!(
                    "scene {idx} is missing from the original timeline"
                )));
            };
            scene
                .for_each_effect(&mut |effect: Paired<'_, Effect>| {
                    self.apply_effect(effect, &mut rewritten)
                })
                .map_err(|e| in_context(&format!("scene {idx}"), e))?;
        }
        script.quirks_applied = true;
        tracing::info!(rewritten, "quirk rewrites applied");
        Ok(())
    }

    fn apply_effect(&self, mut effect: Paired<'_, Effect>, count: &mut usize) -> ShowResult<()> {
        let name = effect.name().to_string();
        let mut run = || -> ShowResult<()> {
            if self.engine.rule(&name).is_some() {
                tracing::debug!(effect = %name, "variant rule overrides the generic rule");
            } else if self.generic.apply(effect.reborrow())? {
                *count += 1;
            }
            self.expand_emphasis(effect.reborrow(), count)?;
            if self.engine.apply(effect.reborrow())? {
                *count += 1;
            }
            Ok(())
        };
        run().map_err(|e| in_context(&format!("effect '{name}'"), e))
    }

    fn expand_emphasis(&self, mut effect: Paired<'_, Effect>, count: &mut usize) -> ShowResult<()> {
        if self.emphasis.apply(effect.reborrow())? {
            *count += 1;
        }
        effect.for_each_nested(&mut |nested: Paired<'_, Effect>| {
            self.expand_emphasis(nested, count)
        })
    }
}

/// Prefix a structural error with where it happened; other kinds pass through.
fn in_context(place: &str, e: ShowError) -> ShowError {
    match e {
        ShowError::Structure(msg) => ShowError::Structure(format!("{place}: {msg}")),
        other => other,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/quirks/adapter.rs"]
mod tests;
