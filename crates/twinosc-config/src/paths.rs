//! Platform-specific location of the settings file.
//!
//! - Linux: `~/.config/twinosc/settings.toml`
//! - macOS: `~/Library/Application Support/twinosc/settings.toml`
//! - Windows: `%APPDATA%\twinosc\settings.toml`

use std::path::{Path, PathBuf};

use crate::{ConfigError, Settings};

/// Application name used for directory paths.
const APP_NAME: &str = "twinosc";

/// File name of the settings file inside the config directory.
pub const SETTINGS_FILE: &str = "settings.toml";

/// Returns the user-specific configuration directory.
///
/// Returns a fallback path if the config directory cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Returns the path of the user's settings file.
pub fn settings_path() -> PathBuf {
    user_config_dir().join(SETTINGS_FILE)
}

/// Ensures the user config directory exists, creating it if necessary.
pub fn ensure_user_config_dir() -> Result<PathBuf, ConfigError> {
    let dir = user_config_dir();

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| ConfigError::create_dir(&dir, e))?;
    }

    Ok(dir)
}

/// Load `path` if it exists, otherwise return default settings.
///
/// A file that exists but fails to parse or validate is an error.
pub fn load_from_or_default(path: impl AsRef<Path>) -> Result<Settings, ConfigError> {
    let path = path.as_ref();
    if path.is_file() {
        Settings::load(path)
    } else {
        Ok(Settings::default())
    }
}

/// Load the user's settings file, or defaults if there is none.
///
/// # Example
///
/// ```rust,no_run
/// use twinosc_config::load_or_default;
///
/// let settings = load_or_default().unwrap();
/// println!("sample rate: {}", settings.sample_rate);
/// ```
pub fn load_or_default() -> Result<Settings, ConfigError> {
    load_from_or_default(settings_path())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn config_dir_names_the_app() {
        assert!(user_config_dir().to_string_lossy().contains("twinosc"));
    }

    #[test]
    fn settings_path_inside_config_dir() {
        let path = settings_path();
        assert_eq!(path.parent(), Some(user_config_dir().as_path()));
        assert!(path.ends_with(SETTINGS_FILE));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let settings = load_from_or_default(temp.path().join("absent.toml")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn existing_file_is_loaded() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(SETTINGS_FILE);
        fs::write(&path, "sample_rate = 44100\n").unwrap();
        assert_eq!(load_from_or_default(&path).unwrap().sample_rate, 44100);
    }

    #[test]
    fn broken_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(SETTINGS_FILE);
        fs::write(&path, "[voice]\nmix_gain = 3.0\n").unwrap();
        assert!(matches!(
            load_from_or_default(&path),
            Err(ConfigError::Validation(_))
        ));
    }
}
