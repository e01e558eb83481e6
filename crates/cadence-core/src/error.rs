//! Error types for Cadence

use thiserror::Error;

/// The main error type for Cadence operations
#[derive(Debug, Error)]
pub enum CadenceError {
    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    #[error("Duplicate object name: {0}")]
    DuplicateObjectName(String),

    #[error("Unknown component type: {0}")]
    UnknownComponent(String),

    #[error("Invalid component '{component}': {reason}")]
    InvalidComponent { component: String, reason: String },

    #[error("Scene error: {0}")]
    SceneError(String),

    #[error("Script error: {0}")]
    ScriptError(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),
}

/// Result type alias for Cadence operations
pub type Result<T> = std::result::Result<T, CadenceError>;

impl From<toml::de::Error> for CadenceError {
    fn from(err: toml::de::Error) -> Self {
        CadenceError::TomlParseError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_errors_convert() {
        let err: CadenceError = toml::from_str::<toml::Table>("= broken")
            .unwrap_err()
            .into();
        assert!(matches!(err, CadenceError::TomlParseError(_)));
    }

    #[test]
    fn invalid_component_message() {
        let err = CadenceError::InvalidComponent {
            component: "lifetime".into(),
            reason: "frames must be an integer".into(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid component 'lifetime': frames must be an integer"
        );
    }
}
