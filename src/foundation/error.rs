/// Convenience result type used across omenspec.
pub type SpecResult<T> = Result<T, SpecError>;

/// Errors that abort a run outright.
///
/// Validation findings are never reported through this type: they are accumulated as
/// [`crate::Finding`] values. `SpecError` only covers the load boundary (the input is not a
/// decodable tree at all) and I/O around the pipeline.
#[derive(thiserror::Error, Debug)]
pub enum SpecError {
    /// The input could not be read or decoded into a JSON tree.
    #[error("load error: {0}")]
    Load(String),

    /// A precondition of a pipeline stage was not met.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SpecError {
    /// Build a [`SpecError::Load`] value.
    pub fn load(msg: impl Into<String>) -> Self {
        Self::Load(msg.into())
    }

    /// Build a [`SpecError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SpecError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
