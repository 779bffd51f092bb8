/// Convenience result type used across texelkit.
pub type TexelResult<T> = Result<T, TexelError>;

/// Top-level error taxonomy used by the toolkit core.
///
/// Every failure is fatal to the single call that produced it; nothing in
/// this crate retries. Numeric edge cases (near-zero slopes, negative
/// radicands, NaN samples) are clamped by the operations themselves and
/// never surface here.
#[derive(thiserror::Error, Debug)]
pub enum TexelError {
    /// Wrong dimensionality, channel count, or buffer size.
    #[error("shape error: {0}")]
    Shape(String),

    /// Unrecognized operation selector, e.g. an unknown fill method.
    #[error("invalid method: {0}")]
    InvalidMethod(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TexelError {
    /// Build a [`TexelError::Shape`] value.
    pub fn shape(msg: impl Into<String>) -> Self {
        Self::Shape(msg.into())
    }

    /// Build a [`TexelError::InvalidMethod`] value.
    pub fn invalid_method(msg: impl Into<String>) -> Self {
        Self::InvalidMethod(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
