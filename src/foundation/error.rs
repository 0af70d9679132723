/// Convenience result type used across basvid.
pub type BasvidResult<T> = Result<T, BasvidError>;

/// Top-level error taxonomy used by pipeline APIs.
#[derive(thiserror::Error, Debug)]
pub enum BasvidError {
    /// Invalid user-provided input (empty image, empty palette, bad configuration).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Errors while probing or decoding the source video.
    #[error("decode error: {0}")]
    Decode(String),

    /// Errors while tracing a layer mask into vector outlines.
    #[error("trace error: {0}")]
    Trace(String),

    /// Errors while parsing traced vector documents (paths, viewBox).
    #[error("parse error: {0}")]
    Parse(String),

    /// Errors while creating or writing output segments.
    #[error("io error: {0}")]
    Io(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BasvidError {
    /// Build a [`BasvidError::InvalidInput`] value.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Build a [`BasvidError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`BasvidError::Trace`] value.
    pub fn trace(msg: impl Into<String>) -> Self {
        Self::Trace(msg.into())
    }

    /// Build a [`BasvidError::Parse`] value.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Build a [`BasvidError::Io`] value.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
