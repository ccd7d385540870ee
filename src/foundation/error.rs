/// Convenience result type used across snapframe.
pub type SnapframeResult<T> = Result<T, SnapframeError>;

/// Top-level error taxonomy used by the compositing APIs.
///
/// Overlay asset failures are deliberately absent: they are carried by
/// [`crate::AssetLoadFailure`] and always recovered through a fallback renderer.
#[derive(thiserror::Error, Debug)]
pub enum SnapframeError {
    /// Malformed geometry input (non-positive or non-finite sizes).
    #[error("invalid dimension: {0}")]
    InvalidDimension(String),

    /// Malformed capture; the composite is aborted before any drawing.
    #[error("invalid frame: {0}")]
    InvalidFrame(String),

    /// Serializing a composite into an output byte stream failed.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Invalid configuration values or an unreadable configuration file.
    #[error("config error: {0}")]
    Config(String),

    /// A composite operation already holds the session surface.
    #[error("a capture is already being composed")]
    Busy,

    /// The capture was discarded (retake) before the composite finished.
    #[error("capture was discarded before compositing finished")]
    Cancelled,

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SnapframeError {
    /// Build a [`SnapframeError::InvalidDimension`] value.
    pub fn invalid_dimension(msg: impl Into<String>) -> Self {
        Self::InvalidDimension(msg.into())
    }

    /// Build a [`SnapframeError::InvalidFrame`] value.
    pub fn invalid_frame(msg: impl Into<String>) -> Self {
        Self::InvalidFrame(msg.into())
    }

    /// Build a [`SnapframeError::Encoding`] value.
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    /// Build a [`SnapframeError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether the caller may retry the same call once with identical inputs.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Encoding(_))
    }
}

/// Why an overlay asset could not be produced (missing, undecodable, timed out).
///
/// Recovered locally by the overlay resolver; `compose` never returns it.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
#[error("asset load failed: {reason}")]
pub struct AssetLoadFailure {
    /// Human-readable cause.
    pub reason: String,
}

impl AssetLoadFailure {
    /// Build a failure from any message.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl From<SnapframeError> for AssetLoadFailure {
    fn from(err: SnapframeError) -> Self {
        Self::new(format!("{err:#}"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
