use crate::{
    foundation::error::{ShowError, ShowResult},
    model::{mirror::slide_mismatch, script::SlideScript},
};

#[derive(Clone, Debug, PartialEq)]
/// One slide's contribution: its working script and the untouched original.
pub struct Fragment {
    slide_id: String,
    current: SlideScript,
    original: SlideScript,
}

impl Fragment {
    /// Build a fragment from a freshly loaded script; the original is a deep copy.
    pub fn new(slide_id: impl Into<String>, script: SlideScript) -> Self {
        Self {
            slide_id: slide_id.into(),
            original: script.clone(),
            current: script,
        }
    }

    /// Build a fragment from separately loaded current and original scripts.
    ///
    /// The two must mirror each other structurally.
    pub fn from_pair(
        slide_id: impl Into<String>,
        current: SlideScript,
        original: SlideScript,
    ) -> ShowResult<Self> {
        let slide_id = slide_id.into();
        if let Some(m) = slide_mismatch(&current, &original) {
            return Err(ShowError::structure(format!(
                "slide '{slide_id}' current/original differ at {m}"
            )));
        }
        Ok(Self {
            slide_id,
            current,
            original,
        })
    }

    /// Parse a slide script from JSON text.
    pub fn from_json(slide_id: impl Into<String>, s: &str) -> ShowResult<Self> {
        let slide_id = slide_id.into();
        let script: SlideScript = serde_json::from_str(s)
            .map_err(|e| ShowError::serde(format!("slide '{slide_id}': {e}")))?;
        Ok(Self::new(slide_id, script))
    }

    /// Identifier of the slide this fragment belongs to.
    pub fn slide_id(&self) -> &str {
        &self.slide_id
    }

    /// Number of scenes this slide contributes.
    pub fn scene_count(&self) -> usize {
        self.current.events.len()
    }

    /// Working script.
    pub fn current(&self) -> &SlideScript {
        &self.current
    }

    /// Authoring-time script.
    pub fn original(&self) -> &SlideScript {
        &self.original
    }

    pub(crate) fn into_parts(self) -> (String, SlideScript, SlideScript) {
        (self.slide_id, self.current, self.original)
    }
}

#[derive(Clone, Debug, PartialEq)]
/// Completion state of one slide as seen by the aggregation barrier.
pub enum FragmentStatus {
    /// No completion signal yet.
    Pending,
    /// Loaded successfully.
    Loaded(Fragment),
    /// Failed to load.
    Failed(String),
}

impl FragmentStatus {
    /// `true` once a completion signal (success or failure) has arrived.
    pub fn is_reported(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}
