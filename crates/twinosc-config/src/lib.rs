//! Settings and calibration storage for the twinosc oscillator module.
//!
//! The oscillator core is configured entirely in code
//! ([`CoreConfig`](twinosc_platform::CoreConfig) and
//! [`Calibration`](twinosc_platform::Calibration)). This crate persists those
//! values as a TOML settings file so each unit can carry its own measured
//! calibration.
//!
//! # Features
//!
//! - **Settings file**: Load and save [`Settings`] as TOML
//! - **Validation**: Reject out-of-range rates, gains, and calibration values
//! - **Paths**: Platform-specific config directory and settings file
//!
//! # Example
//!
//! ```rust,no_run
//! use twinosc_config::{Settings, settings_path};
//! use twinosc_platform::TwinOscillator;
//!
//! let settings = Settings::load(settings_path()).unwrap();
//!
//! let mut core = TwinOscillator::new(settings.core_config());
//! core.set_calibration(settings.calibration());
//! ```

mod error;
mod settings;

/// Platform-specific paths for the settings file.
pub mod paths;

/// Settings validation.
pub mod validation;

pub use error::ConfigError;
pub use paths::{
    SETTINGS_FILE, ensure_user_config_dir, load_from_or_default, load_or_default,
    settings_path, user_config_dir,
};
pub use settings::{CalibrationEntry, PitchSettings, Settings, VoiceSettings};
pub use validation::{ValidationError, ValidationResult, validate_settings};
