/// Convenience result type used across loopbrush.
pub type LoopResult<T> = Result<T, LoopError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Invalid numeric configuration (durations, speeds, zoom factors) is never reported through
/// this type: those inputs are clamped or ignored at the call site.
#[derive(thiserror::Error, Debug)]
pub enum LoopError {
    /// Invalid user-provided or session data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A required platform capability (encoder, font, ...) is not available.
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// The requested operation has nothing to work on.
    #[error("empty input: {0}")]
    EmptyInput(String),

    /// Errors raised while rasterizing a frame.
    #[error("render error: {0}")]
    Render(String),

    /// Errors raised by a frame sink while encoding.
    #[error("encode error: {0}")]
    Encode(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// The operation was cancelled before completion.
    #[error("cancelled: {0}")]
    Cancelled(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LoopError {
    /// Build a [`LoopError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`LoopError::Unsupported`] value.
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    /// Build a [`LoopError::EmptyInput`] value.
    pub fn empty_input(msg: impl Into<String>) -> Self {
        Self::EmptyInput(msg.into())
    }

    /// Build a [`LoopError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`LoopError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`LoopError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`LoopError::Cancelled`] value.
    pub fn cancelled(msg: impl Into<String>) -> Self {
        Self::Cancelled(msg.into())
    }
}

impl From<serde_json::Error> for LoopError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
