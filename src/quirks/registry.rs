use std::collections::BTreeMap;

use crate::{
    foundation::error::ShowResult,
    model::paired::Paired,
    model::script::Effect,
    quirks::{emphasis, engines, generic, names, variant::RendererVariant},
};

/// A structural rewrite of one effect, applied to both trees through the pair.
pub type QuirkRule = fn(Paired<'_, Effect>) -> ShowResult<()>;

/// Effect name to rewrite rule. Names without an entry pass through unchanged.
#[derive(Clone, Debug, Default)]
pub struct QuirkTable {
    rules: BTreeMap<&'static str, QuirkRule>,
}

impl QuirkTable {
    /// Empty table (identity for every effect).
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `rule` for effects named `name`, replacing any previous entry.
    pub fn with_rule(mut self, name: &'static str, rule: QuirkRule) -> Self {
        self.rules.insert(name, rule);
        self
    }

    fn with_rules(self, effects: &[&'static str], rule: QuirkRule) -> Self {
        effects.iter().copied().fold(self, |t, n| t.with_rule(n, rule))
    }

    /// Rule registered for `name`.
    pub fn rule(&self, name: &str) -> Option<QuirkRule> {
        self.rules.get(name).copied()
    }

    /// Number of registered names.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// `true` if no rule is registered.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run the rule for this effect's name, if any. Returns whether one ran.
    pub fn apply(&self, effect: Paired<'_, Effect>) -> ShowResult<bool> {
        match self.rule(effect.name()) {
            Some(rule) => {
                tracing::debug!(effect = effect.name(), "applying quirk rule");
                rule(effect)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Engine-neutral cleanups of authoring-pipeline artifacts.
    pub fn generic() -> Self {
        Self::new()
            .with_rule(names::BLINDS, generic::blinds_transition)
            .with_rule(names::GRID, generic::grid)
            .with_rule(names::SWOOSH, generic::swoosh_transition)
    }

    /// Repetition expansion for emphasis builds; runs for every variant.
    pub fn emphasis() -> Self {
        Self::new().with_rule(names::JIGGLE, emphasis::jiggle)
    }

    /// Rewrites specific to one engine family.
    pub fn for_variant(variant: RendererVariant) -> Self {
        match variant {
            RendererVariant::Reference => Self::new(),
            RendererVariant::WebKit => Self::new()
                .with_rule(names::FALL, engines::fall_depth_markers)
                .with_rule(names::SCALE, engines::promote_hidden_layer)
                .with_rule(names::SWAP, engines::swap_opacity_retime),
            RendererVariant::Gecko => Self::new()
                .with_rule(names::SCALE, engines::promote_hidden_layer)
                .with_rule(names::SWAP, engines::swap_opacity_retime),
            RendererVariant::Legacy => Self::new()
                .with_rules(
                    &[names::BOUNCE, names::SLIDE, names::PIVOT, names::SCALE],
                    engines::promote_hidden_layer,
                )
                .with_rule(names::DOORWAY, engines::doorway)
                .with_rules(
                    &[
                        names::BLINDS,
                        names::CUBE,
                        names::REFLECTION,
                        names::REVOLVE,
                        names::REVOLVING_DOOR,
                    ],
                    engines::fade_replacement,
                )
                .with_rule(names::SWAP, engines::swap_opacity_retime)
                .with_rule(names::FLIP_THROUGH, engines::flip_through),
        }
    }
}
