//! Error types for settings operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading, saving, or checking settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create directory
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        /// Path of the directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Settings parsed but hold unusable values
    #[error("invalid settings: {0}")]
    Validation(#[from] crate::validation::ValidationError),
}

impl ConfigError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// Create a create directory error.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::CreateDir {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationError;
    use std::error::Error;

    fn denied() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied")
    }

    #[test]
    fn factories_keep_the_path() {
        let err = ConfigError::read_file("/etc/twinosc.toml", denied());
        assert!(
            matches!(err, ConfigError::ReadFile { ref path, .. } if path == std::path::Path::new("/etc/twinosc.toml"))
        );
        let err = ConfigError::write_file("/tmp/out.toml", denied());
        assert!(matches!(err, ConfigError::WriteFile { .. }));
        let err = ConfigError::create_dir("/tmp/nested", denied());
        assert!(matches!(err, ConfigError::CreateDir { .. }));
    }

    #[test]
    fn io_messages_name_path_and_cause() {
        let msg = ConfigError::write_file("/a/settings.toml", denied()).to_string();
        assert!(msg.contains("failed to write file"), "got: {msg}");
        assert!(msg.contains("/a/settings.toml"), "got: {msg}");
        assert!(msg.contains("denied"), "got: {msg}");

        let msg = ConfigError::create_dir("/a", denied()).to_string();
        assert!(msg.contains("failed to create directory"), "got: {msg}");
    }

    #[test]
    fn io_variants_expose_source() {
        assert!(ConfigError::read_file("/x", denied()).source().is_some());
        assert!(ConfigError::write_file("/x", denied()).source().is_some());
        assert!(ConfigError::create_dir("/x", denied()).source().is_some());
    }

    #[test]
    fn validation_converts_with_question_mark() {
        fn check() -> Result<(), ConfigError> {
            let result: Result<(), ValidationError> =
                Err(ValidationError::UnknownChannel("volume".to_string()));
            result?;
            Ok(())
        }
        let err = check().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert_eq!(
            err.to_string(),
            "invalid settings: unknown calibration channel: volume"
        );
    }

    #[test]
    fn toml_parse_converts() {
        let parse: Result<toml::Value, _> = toml::from_str("sample_rate = ");
        let err: ConfigError = parse.unwrap_err().into();
        assert!(err.to_string().starts_with("failed to parse TOML"));
    }
}
