//! Settings validation.
//!
//! Parsing only checks that a settings file has the right shape. The checks
//! here reject values the oscillator core would accept but that cannot come
//! from a working unit: a zero calibration scale silences a channel, an
//! offset of a full volt is not a zero-point correction, and so on.
//!
//! Every field is checked and all problems are reported together.
//!
//! | Field | Rule |
//! |-------|------|
//! | `sample_rate` | 8000 to 192000 Hz |
//! | `pitch.base_note` | 0 to 127 |
//! | `pitch.glide_range` | above 0, at most 127 |
//! | `voice.mix_gain` | above 0, at most 1 |
//! | `calibration.<channel>` | known channel name |
//! | `calibration.<channel>.scale` | finite and non-zero |
//! | `calibration.<channel>.offset` | finite, magnitude below 1 |

use crate::Settings;
use thiserror::Error;
use twinosc_platform::CvChannel;

/// Lowest accepted sample rate in Hz.
pub const MIN_SAMPLE_RATE: u32 = 8000;

/// Highest accepted sample rate in Hz.
pub const MAX_SAMPLE_RATE: u32 = 192_000;

/// Highest MIDI note.
pub const MAX_NOTE: f32 = 127.0;

/// Calibration offsets must stay strictly below this magnitude.
pub const MAX_CALIBRATION_OFFSET: f32 = 1.0;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Numeric field outside its accepted range.
    #[error("'{field}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Dotted path of the field.
        field: String,
        /// The rejected value.
        value: f32,
        /// Minimum allowed value.
        min: f32,
        /// Maximum allowed value.
        max: f32,
    },

    /// Field value unusable for a reason other than range.
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue {
        /// Dotted path of the field.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// Calibration table names a channel that does not exist.
    #[error("unknown calibration channel: {0}")]
    UnknownChannel(String),

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

impl ValidationError {
    /// Collapse a list of errors: none is `Ok`, one is itself, more is [`Multiple`](Self::Multiple).
    pub fn from_list(mut errors: Vec<ValidationError>) -> ValidationResult<()> {
        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(ValidationError::Multiple(errors)),
        }
    }

    /// Individual errors, flattening [`Multiple`](Self::Multiple).
    pub fn errors(&self) -> Vec<&ValidationError> {
        match self {
            ValidationError::Multiple(list) => list.iter().flat_map(|e| e.errors()).collect(),
            other => vec![other],
        }
    }

    fn out_of_range(field: impl Into<String>, value: f32, min: f32, max: f32) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            value,
            min,
            max,
        }
    }

    fn invalid(field: impl Into<String>, reason: &str) -> Self {
        ValidationError::InvalidValue {
            field: field.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Check every field of `settings`.
///
/// # Example
///
/// ```rust
/// use twinosc_config::{Settings, validate_settings};
///
/// let mut settings = Settings::default();
/// assert!(validate_settings(&settings).is_ok());
///
/// settings.sample_rate = 100;
/// settings.voice.mix_gain = 2.0;
/// let err = validate_settings(&settings).unwrap_err();
/// assert_eq!(err.errors().len(), 2);
/// ```
pub fn validate_settings(settings: &Settings) -> ValidationResult<()> {
    let mut errors = Vec::new();

    if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&settings.sample_rate) {
        errors.push(ValidationError::out_of_range(
            "sample_rate",
            settings.sample_rate as f32,
            MIN_SAMPLE_RATE as f32,
            MAX_SAMPLE_RATE as f32,
        ));
    }

    let base_note = settings.pitch.base_note;
    if !(0.0..=MAX_NOTE).contains(&base_note) {
        errors.push(ValidationError::out_of_range(
            "pitch.base_note",
            base_note,
            0.0,
            MAX_NOTE,
        ));
    }

    let glide_range = settings.pitch.glide_range;
    if !(glide_range > 0.0 && glide_range <= MAX_NOTE) {
        errors.push(ValidationError::out_of_range(
            "pitch.glide_range",
            glide_range,
            0.0,
            MAX_NOTE,
        ));
    }

    let mix_gain = settings.voice.mix_gain;
    if !(mix_gain > 0.0 && mix_gain <= 1.0) {
        errors.push(ValidationError::out_of_range(
            "voice.mix_gain",
            mix_gain,
            0.0,
            1.0,
        ));
    }

    for (name, entry) in &settings.calibration {
        if CvChannel::from_name(name).is_none() {
            errors.push(ValidationError::UnknownChannel(name.clone()));
            continue;
        }

        if !entry.scale.is_finite() {
            errors.push(ValidationError::invalid(
                format!("calibration.{name}.scale"),
                "must be finite",
            ));
        } else if entry.scale == 0.0 {
            errors.push(ValidationError::invalid(
                format!("calibration.{name}.scale"),
                "must not be zero",
            ));
        }

        if !entry.offset.is_finite() {
            errors.push(ValidationError::invalid(
                format!("calibration.{name}.offset"),
                "must be finite",
            ));
        } else if entry.offset.abs() >= MAX_CALIBRATION_OFFSET {
            errors.push(ValidationError::out_of_range(
                format!("calibration.{name}.offset"),
                entry.offset,
                -MAX_CALIBRATION_OFFSET,
                MAX_CALIBRATION_OFFSET,
            ));
        }
    }

    ValidationError::from_list(errors)
}
