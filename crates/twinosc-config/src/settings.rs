//! Settings file format and operations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use twinosc_platform::{Calibration, ChannelCalibration, CoreConfig, CvChannel};

use crate::error::ConfigError;
use crate::validation::{ValidationResult, validate_settings};

/// Per-unit settings of the oscillator module.
///
/// Settings are stored as TOML. Missing sections fall back to their
/// defaults; calibration entries that are not listed keep their factory
/// values.
///
/// # TOML Format
///
/// ```toml
/// sample_rate = 48000
///
/// [pitch]
/// base_note = 36.0
/// glide_range = 60.0
///
/// [voice]
/// mix_gain = 0.9
///
/// [calibration.coarse_pitch]
/// offset = 0.02708
/// scale = 58.2
///
/// [calibration.fine_tune_a]
/// offset = 0.0226
/// scale = 58.8
/// ```
///
/// # Example
///
/// ```rust
/// use twinosc_config::Settings;
/// use twinosc_platform::CvChannel;
///
/// let settings = Settings::from_toml(
///     "sample_rate = 96000\n[calibration.unison]\noffset = 0.01\nscale = 1.0\n",
/// )
/// .unwrap();
///
/// assert_eq!(settings.core_config().sample_rate, 96000.0);
/// assert_eq!(settings.calibration().get(CvChannel::Unison).offset, 0.01);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// Output sample rate in Hz.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Pitch pipeline constants.
    #[serde(default)]
    pub pitch: PitchSettings,

    /// Voice constants.
    #[serde(default)]
    pub voice: VoiceSettings,

    /// Calibration entries keyed by channel name.
    #[serde(default)]
    pub calibration: BTreeMap<String, CalibrationEntry>,
}

fn default_sample_rate() -> u32 {
    48000
}

/// `[pitch]` section.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PitchSettings {
    /// MIDI note of voice A with all pitch inputs at zero.
    pub base_note: f32,
    /// Semitones covered by one glide time constant.
    pub glide_range: f32,
}

impl Default for PitchSettings {
    fn default() -> Self {
        let core = CoreConfig::default();
        Self {
            base_note: core.base_note,
            glide_range: core.glide_range,
        }
    }
}

/// `[voice]` section.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VoiceSettings {
    /// Output gain of each voice.
    pub mix_gain: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            mix_gain: CoreConfig::default().mix_gain,
        }
    }
}

/// One `[calibration.<channel>]` table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CalibrationEntry {
    /// Added to the raw reading.
    pub offset: f32,
    /// Multiplies the offset reading.
    pub scale: f32,
}

impl CalibrationEntry {
    /// Create an entry.
    pub fn new(offset: f32, scale: f32) -> Self {
        Self { offset, scale }
    }
}

impl Default for CalibrationEntry {
    fn default() -> Self {
        ChannelCalibration::IDENTITY.into()
    }
}

impl From<ChannelCalibration> for CalibrationEntry {
    fn from(cal: ChannelCalibration) -> Self {
        Self::new(cal.offset, cal.scale)
    }
}

impl From<CalibrationEntry> for ChannelCalibration {
    fn from(entry: CalibrationEntry) -> Self {
        ChannelCalibration::new(entry.offset, entry.scale)
    }
}

impl Settings {
    /// Settings with every calibration channel listed explicitly.
    ///
    /// Equal in effect to [`Settings::default`], but the written file shows
    /// all twelve channels for editing.
    pub fn with_full_calibration() -> Self {
        let calibration = Calibration::factory()
            .iter()
            .map(|(channel, cal)| (channel.name().to_string(), cal.into()))
            .collect();
        Self {
            calibration,
            ..Self::default()
        }
    }

    /// Override one channel's calibration.
    pub fn with_calibration(mut self, channel: CvChannel, calibration: ChannelCalibration) -> Self {
        self.calibration
            .insert(channel.name().to_string(), calibration.into());
        self
    }

    /// Load and validate settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Parse and validate settings from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(toml_str)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Save the settings to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the settings to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every field; see [`validation`](crate::validation).
    pub fn validate(&self) -> ValidationResult<()> {
        validate_settings(self)
    }

    /// Orchestrator constants.
    pub fn core_config(&self) -> CoreConfig {
        CoreConfig {
            sample_rate: self.sample_rate as f32,
            base_note: self.pitch.base_note,
            glide_range: self.pitch.glide_range,
            mix_gain: self.voice.mix_gain,
        }
    }

    /// Calibration table: factory values overridden by the listed entries.
    ///
    /// Unknown channel names are skipped; [`validate`](Self::validate)
    /// reports them.
    pub fn calibration(&self) -> Calibration {
        let mut calibration = Calibration::factory();
        for (name, entry) in &self.calibration {
            if let Some(channel) = CvChannel::from_name(name) {
                calibration.set(channel, (*entry).into());
            }
        }
        calibration
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            pitch: PitchSettings::default(),
            voice: VoiceSettings::default(),
            calibration: BTreeMap::new(),
        }
    }
}
