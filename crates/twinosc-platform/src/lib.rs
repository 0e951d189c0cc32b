//! Twinosc Platform - control inputs and per-sample orchestration
//!
//! This crate connects the physical control surface of the module (CV jacks,
//! knobs, and the sync mode switch) to the two oscillator voices.
//!
//! # Core Abstractions
//!
//! ## Control System
//!
//! - [`CvChannel`] - The twelve named control channels
//! - [`ChannelKind`] - Knob or CV jack, with its nominal raw range
//! - [`ControlSource`] - Trait for hardware/software control readers
//! - [`ControlFrame`] - Plain array of readings implementing [`ControlSource`]
//! - [`Calibration`] - Per-channel zero-point and scale corrections
//!
//! ## Orchestration
//!
//! - [`TwinOscillator`] - Owns both voices, the glide, and the calibration;
//!   turns one set of control readings into one stereo frame
//! - [`PitchIndicator`] - Lock-free pitch-change handoff to an indicator driver
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible for embedded audio applications.
//! Disable the default `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! twinosc-platform = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use twinosc_platform::{Calibration, ControlFrame, CoreConfig, CvChannel, TwinOscillator};
//!
//! let mut core = TwinOscillator::new(CoreConfig::default());
//! core.set_calibration(Calibration::identity());
//!
//! let mut controls = ControlFrame::new()
//!     .with(CvChannel::CoarsePitch, 24.0)
//!     .with(CvChannel::RelativeTune, 0.75);
//!
//! let frame = core.process(&mut controls);
//! assert!(frame.left.is_finite() && frame.right.is_finite());
//! assert_eq!(core.snapshot().pitch_b, 67.0);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod calibration;
pub mod engine;
pub mod indicator;

// Re-export main types at crate root
pub use calibration::{Calibration, ChannelCalibration};
pub use engine::{CoreConfig, ParameterSnapshot, StereoFrame, SyncTarget, TwinOscillator};
pub use indicator::PitchIndicator;

/// Physical control type of a channel.
///
/// # Example
///
/// ```rust
/// use twinosc_platform::{ChannelKind, CvChannel};
///
/// assert_eq!(CvChannel::GlideTime.kind(), ChannelKind::Knob);
/// assert_eq!(ChannelKind::CvJack.range(), (-1.0, 1.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    /// Panel potentiometer, unipolar reading (0.0 to 1.0).
    Knob,
    /// CV input jack, bipolar reading (-1.0 to 1.0).
    CvJack,
}

impl ChannelKind {
    /// Nominal raw reading range `(min, max)` before calibration.
    #[inline]
    pub const fn range(&self) -> (f32, f32) {
        match self {
            ChannelKind::Knob => (0.0, 1.0),
            ChannelKind::CvJack => (-1.0, 1.0),
        }
    }
}

/// A named control channel, read once per output sample.
///
/// Each channel has a fixed role in the pitch/timbre pipeline of
/// [`TwinOscillator`]. Raw readings pass through the channel's
/// [`ChannelCalibration`] before use.
///
/// | Channel | Kind | Role |
/// |---------|------|------|
/// | `PitchBend` | CV | Bend, 0 to 24 semitones, dead zone below 0.05 |
/// | `CoarsePitch` | CV | Quantized pitch in semitones (glided) |
/// | `GlideTime` | Knob | Glide time, squared |
/// | `FineTuneA` / `FineTuneB` | CV | Fine pitch in semitones, dead zone ±0.2 |
/// | `SyncAmount` | CV | Shared hard-sync amount |
/// | `SyncOffsetA` / `SyncOffsetB` | CV | Added to the sync amount |
/// | `TimbreA` / `TimbreB` | Knob | Per-voice shape |
/// | `Unison` | CV | Shared unison control, clamped to 0..1 |
/// | `RelativeTune` | Knob | Voice B interval, mapped to -1..1 |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CvChannel {
    /// Pitch bend amount.
    PitchBend = 0,
    /// Coarse pitch, rounded to whole semitones.
    CoarsePitch,
    /// Glide time.
    GlideTime,
    /// First fine-tune input.
    FineTuneA,
    /// Second fine-tune input.
    FineTuneB,
    /// Shared hard-sync amount.
    SyncAmount,
    /// First additive sync input.
    SyncOffsetA,
    /// Second additive sync input.
    SyncOffsetB,
    /// Voice A timbre.
    TimbreA,
    /// Voice B timbre.
    TimbreB,
    /// Shared unison amount.
    Unison,
    /// Voice B interval relative to voice A.
    RelativeTune,
}

impl CvChannel {
    /// Number of channels.
    pub const COUNT: usize = 12;

    /// All channels in index order.
    pub const ALL: [CvChannel; Self::COUNT] = [
        CvChannel::PitchBend,
        CvChannel::CoarsePitch,
        CvChannel::GlideTime,
        CvChannel::FineTuneA,
        CvChannel::FineTuneB,
        CvChannel::SyncAmount,
        CvChannel::SyncOffsetA,
        CvChannel::SyncOffsetB,
        CvChannel::TimbreA,
        CvChannel::TimbreB,
        CvChannel::Unison,
        CvChannel::RelativeTune,
    ];

    /// Index into per-channel tables.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Channel at `index`, or `None` if out of range.
    #[inline]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < Self::COUNT {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    /// Stable snake_case name, used in settings files and the CLI.
    pub const fn name(self) -> &'static str {
        match self {
            CvChannel::PitchBend => "pitch_bend",
            CvChannel::CoarsePitch => "coarse_pitch",
            CvChannel::GlideTime => "glide_time",
            CvChannel::FineTuneA => "fine_tune_a",
            CvChannel::FineTuneB => "fine_tune_b",
            CvChannel::SyncAmount => "sync_amount",
            CvChannel::SyncOffsetA => "sync_offset_a",
            CvChannel::SyncOffsetB => "sync_offset_b",
            CvChannel::TimbreA => "timbre_a",
            CvChannel::TimbreB => "timbre_b",
            CvChannel::Unison => "unison",
            CvChannel::RelativeTune => "relative_tune",
        }
    }

    /// Look up a channel by its [`name`](Self::name).
    ///
    /// # Example
    ///
    /// ```rust
    /// use twinosc_platform::CvChannel;
    ///
    /// assert_eq!(CvChannel::from_name("unison"), Some(CvChannel::Unison));
    /// assert_eq!(CvChannel::from_name("volume"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ch| ch.name() == name)
    }

    /// Physical control type.
    pub const fn kind(self) -> ChannelKind {
        match self {
            CvChannel::GlideTime
            | CvChannel::TimbreA
            | CvChannel::TimbreB
            | CvChannel::RelativeTune => ChannelKind::Knob,
            _ => ChannelKind::CvJack,
        }
    }
}

/// Trait for platform-specific control readers.
///
/// Implement this for the target hardware (ADC driver plus debounced
/// switch) or for software sources such as test fixtures.
///
/// # Real-time Contract
///
/// All methods are called from the audio callback once per sample and must
/// not block or allocate.
pub trait ControlSource {
    /// Acquire fresh readings. Called once at the start of every sample.
    ///
    /// Default implementation does nothing (for sources updated elsewhere).
    fn poll(&mut self) {}

    /// Raw normalized reading of a channel, before calibration.
    fn read(&self, channel: CvChannel) -> f32;

    /// Debounced sync mode switch. `true` routes sync to voice A.
    fn mode_switch(&self) -> bool;
}

/// A fixed set of raw readings.
///
/// # Example
///
/// ```rust
/// use twinosc_platform::{ControlFrame, ControlSource, CvChannel};
///
/// let frame = ControlFrame::new()
///     .with(CvChannel::TimbreA, 0.3)
///     .with_mode_switch(true);
/// assert_eq!(frame.read(CvChannel::TimbreA), 0.3);
/// assert_eq!(frame.read(CvChannel::TimbreB), 0.0);
/// assert!(frame.mode_switch());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ControlFrame {
    values: [f32; CvChannel::COUNT],
    mode_switch: bool,
}

impl ControlFrame {
    /// All channels at 0.0, switch off.
    pub const fn new() -> Self {
        Self {
            values: [0.0; CvChannel::COUNT],
            mode_switch: false,
        }
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, channel: CvChannel, value: f32) -> Self {
        self.set(channel, value);
        self
    }

    /// Builder form of [`set_mode_switch`](Self::set_mode_switch).
    pub fn with_mode_switch(mut self, on: bool) -> Self {
        self.mode_switch = on;
        self
    }

    /// Set a channel's raw reading.
    #[inline]
    pub fn set(&mut self, channel: CvChannel, value: f32) {
        self.values[channel.index()] = value;
    }

    /// Set the mode switch.
    #[inline]
    pub fn set_mode_switch(&mut self, on: bool) {
        self.mode_switch = on;
    }
}

impl ControlSource for ControlFrame {
    #[inline]
    fn read(&self, channel: CvChannel) -> f32 {
        self.values[channel.index()]
    }

    #[inline]
    fn mode_switch(&self) -> bool {
        self.mode_switch
    }
}
