use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgeError {
    // Config-related errors
    #[error("Failed to get config directory")]
    ConfigDirNotFound,

    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize config: {0}")]
    SerializationFailed(#[from] toml::ser::Error),

    #[error("Failed to deserialize config: {0}")]
    DeserializationFailed(#[from] toml::de::Error),

    #[error("Config validation failed: {reason}")]
    ConfigValidationFailed { reason: String },

    // Level-related errors
    #[error("Level file not found at path: {path}")]
    LevelFileNotFound { path: PathBuf },

    #[error("Invalid level data: {reason}")]
    InvalidLevelData { reason: String },

    #[error("Corrupted level file: {reason}")]
    CorruptedLevelFile { reason: String },

    #[error("Level validation failed: {reason}")]
    LevelValidationFailed { reason: String },

    // Command line errors
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },
}

/// Result type alias for all fallible operations
pub type LedgeResult<T> = Result<T, LedgeError>;

/// Flatten `validator` field errors into one readable line
pub fn describe_validation_errors(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            format!("{field}: {}", messages.join(", "))
        })
        .collect::<Vec<String>>()
        .join("; ")
}
