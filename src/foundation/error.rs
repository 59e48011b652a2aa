/// Convenience result type used across showscript.
pub type ShowResult<T> = Result<T, ShowError>;

/// Top-level error taxonomy used by the merge, scale and quirk APIs.
#[derive(thiserror::Error, Debug)]
pub enum ShowError {
    /// The show header is absent or unparseable.
    #[error("header error: {0}")]
    Header(String),

    /// A slide fragment failed to arrive, or the load barrier timed out.
    #[error("load error: {0}")]
    Load(String),

    /// Expected tree substructure is missing, or current/original trees diverged.
    #[error("structure error: {0}")]
    Structure(String),

    /// Invalid caller-provided input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing script data.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ShowError {
    /// Build a [`ShowError::Header`] value.
    pub fn header(msg: impl Into<String>) -> Self {
        Self::Header(msg.into())
    }

    /// Build a [`ShowError::Load`] value.
    pub fn load(msg: impl Into<String>) -> Self {
        Self::Load(msg.into())
    }

    /// Build a [`ShowError::Structure`] value.
    pub fn structure(msg: impl Into<String>) -> Self {
        Self::Structure(msg.into())
    }

    /// Build a [`ShowError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ShowError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for ShowError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serde(value.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
