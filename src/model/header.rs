use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::foundation::core::Size;
use crate::foundation::error::{ShowError, ShowResult};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Show-level descriptor delivered before any slide fragment.
pub struct ShowHeader {
    /// Slide identifiers in presentation order.
    pub slide_list: Vec<String>,
    /// Authoring-time show width.
    pub slide_width: f64,
    /// Authoring-time show height.
    pub slide_height: f64,
    /// Unrecognized fields, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ShowHeader {
    /// Parse and validate a header from JSON text.
    pub fn from_json(s: &str) -> ShowResult<Self> {
        let header: Self = serde_json::from_str(s)
            .map_err(|e| ShowError::header(format!("unparseable show header: {e}")))?;
        header.validate()?;
        Ok(header)
    }

    /// Authoring-time show size.
    pub fn size(&self) -> Size {
        Size::new(self.slide_width, self.slide_height)
    }

    /// Validate header invariants.
    pub fn validate(&self) -> ShowResult<()> {
        if self.slide_list.is_empty() {
            return Err(ShowError::header("slideList must be non-empty"));
        }
        if !self.slide_width.is_finite() || self.slide_width <= 0.0 {
            return Err(ShowError::header("slideWidth must be finite and > 0"));
        }
        if !self.slide_height.is_finite() || self.slide_height <= 0.0 {
            return Err(ShowError::header("slideHeight must be finite and > 0"));
        }
        let mut seen = HashSet::with_capacity(self.slide_list.len());
        for id in &self.slide_list {
            if id.trim().is_empty() {
                return Err(ShowError::header("slide ids must be non-empty"));
            }
            if !seen.insert(id.as_str()) {
                return Err(ShowError::header(format!("duplicate slide id '{id}'")));
            }
        }
        Ok(())
    }
}
