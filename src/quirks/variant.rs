use std::fmt;
use std::str::FromStr;

use crate::foundation::error::ShowError;

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
/// Rendering engine family the show is normalized for.
pub enum RendererVariant {
    /// Engine whose compositing matches the authoring tool; only generic rewrites.
    #[default]
    Reference,
    /// WebKit-family engine.
    #[value(name = "webkit")]
    WebKit,
    /// Gecko-family engine.
    Gecko,
    /// Legacy engine without 3D compositing; gets the most invasive rewrites.
    Legacy,
}

impl RendererVariant {
    /// Every variant, in declaration order.
    pub const ALL: [RendererVariant; 4] = [
        RendererVariant::Reference,
        RendererVariant::WebKit,
        RendererVariant::Gecko,
        RendererVariant::Legacy,
    ];

    /// Lowercase identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            RendererVariant::Reference => "reference",
            RendererVariant::WebKit => "webkit",
            RendererVariant::Gecko => "gecko",
            RendererVariant::Legacy => "legacy",
        }
    }
}

impl fmt::Display for RendererVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RendererVariant {
    type Err = ShowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reference" | "ref" => Ok(RendererVariant::Reference),
            "webkit" | "chrome" | "safari" => Ok(RendererVariant::WebKit),
            "gecko" | "firefox" | "moz" => Ok(RendererVariant::Gecko),
            "legacy" | "ie" | "edge" => Ok(RendererVariant::Legacy),
            other => Err(ShowError::validation(format!(
                "unknown renderer variant '{other}' (expected reference|webkit|gecko|legacy)"
            ))),
        }
    }
}
