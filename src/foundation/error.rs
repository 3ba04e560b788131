/// Convenience result type used across barrace.
pub type BarRaceResult<T> = Result<T, BarRaceError>;

/// Top-level error taxonomy used by the pipeline stages.
#[derive(thiserror::Error, Debug)]
pub enum BarRaceError {
    /// Invalid configuration or degenerate input that cannot produce an animation.
    #[error("validation error: {0}")]
    Validation(String),

    /// Malformed or inconsistent sales records.
    #[error("data error: {0}")]
    Data(String),

    /// Errors while building or rasterizing a chart frame.
    #[error("render error: {0}")]
    Render(String),

    /// Errors while writing the animated output.
    #[error("encode error: {0}")]
    Encode(String),

    /// Errors when serializing or deserializing configuration.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BarRaceError {
    /// Build a [`BarRaceError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`BarRaceError::Data`] value.
    pub fn data(msg: impl Into<String>) -> Self {
        Self::Data(msg.into())
    }

    /// Build a [`BarRaceError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`BarRaceError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`BarRaceError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
