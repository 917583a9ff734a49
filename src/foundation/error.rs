/// Convenience result type used across cmdent.
pub type CmdentResult<T> = Result<T, CmdentError>;

/// Top-level error taxonomy used by compiler APIs.
///
/// Every variant is a compile-time failure: once artifacts are emitted the target interpreter
/// has no error channel, so anything that can go wrong must surface here.
#[derive(thiserror::Error, Debug)]
pub enum CmdentError {
    /// Invalid user-provided entity data (names, ids, geometry references).
    #[error("validation error: {0}")]
    Validation(String),

    /// Invalid compile configuration (loop policies, options).
    #[error("config error: {0}")]
    Config(String),

    /// Textures that cannot be located or decoded.
    #[error("asset error: {0}")]
    Asset(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Filesystem failures while reading inputs or writing artifacts.
    #[error("io error: {0}")]
    Io(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CmdentError {
    /// Build a [`CmdentError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CmdentError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`CmdentError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`CmdentError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`CmdentError::Io`] value.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
