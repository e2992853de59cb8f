/// Configuration loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("cannot read config {path}: {reason}")]
    Read { path: String, reason: String },
    /// TOML syntax or shape error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Parsed, but semantically invalid.
    #[error("config validation error: {0}")]
    Validation(String),
}
