use thiserror::Error;

/// Errors raised while loading a [`crate::LocomotionConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// A field is outside its accepted range
    #[error("invalid `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}
