//! Per-channel calibration of raw control readings.
//!
//! Converter readings are offset from their nominal zero by a small,
//! board-specific amount, and pitch inputs need a volts-to-semitones scale.
//! Each channel carries a [`ChannelCalibration`]:
//!
//! ```text
//! calibrated = (raw + offset) * scale
//! ```
//!
//! [`Calibration::factory`] holds the values measured on the reference
//! build. They are empirical zero-point corrections for that hardware, not
//! portable constants; load per-unit values through the settings file.

use crate::CvChannel;

/// Zero-point offset and scale for one channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelCalibration {
    /// Added to the raw reading.
    pub offset: f32,
    /// Multiplies the offset reading.
    pub scale: f32,
}

impl ChannelCalibration {
    /// Pass-through calibration.
    pub const IDENTITY: Self = Self::new(0.0, 1.0);

    /// Create a calibration entry.
    pub const fn new(offset: f32, scale: f32) -> Self {
        Self { offset, scale }
    }

    /// Apply to a raw reading.
    #[inline]
    pub fn apply(&self, raw: f32) -> f32 {
        (raw + self.offset) * self.scale
    }
}

impl Default for ChannelCalibration {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Calibration table for all [`CvChannel`]s.
///
/// # Example
///
/// ```rust
/// use twinosc_platform::{Calibration, ChannelCalibration, CvChannel};
///
/// let mut cal = Calibration::identity();
/// cal.set(CvChannel::CoarsePitch, ChannelCalibration::new(0.0, 60.0));
/// assert_eq!(cal.apply(CvChannel::CoarsePitch, 0.5), 30.0);
/// assert_eq!(cal.apply(CvChannel::Unison, 0.5), 0.5);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Calibration {
    channels: [ChannelCalibration; CvChannel::COUNT],
}

impl Calibration {
    /// Every channel passes through unchanged.
    pub const fn identity() -> Self {
        Self {
            channels: [ChannelCalibration::IDENTITY; CvChannel::COUNT],
        }
    }

    /// Values measured on the reference hardware.
    ///
    /// | Channel | Offset | Scale |
    /// |---------|--------|-------|
    /// | `CoarsePitch` | 0.02708 | 0.97 × 60 |
    /// | `FineTuneA` | 0.0226 | 0.98 × 60 |
    /// | `FineTuneB` | 0.02855 | 0.97 × 60 |
    /// | `SyncOffsetA` | 0.0225 | 1 |
    /// | `SyncOffsetB` | 0.0231 | 1 |
    /// | others | 0 | 1 |
    pub const fn factory() -> Self {
        let mut channels = [ChannelCalibration::IDENTITY; CvChannel::COUNT];
        channels[CvChannel::CoarsePitch.index()] = ChannelCalibration::new(0.02708, 0.97 * 60.0);
        channels[CvChannel::FineTuneA.index()] = ChannelCalibration::new(0.0226, 0.98 * 60.0);
        channels[CvChannel::FineTuneB.index()] = ChannelCalibration::new(0.02855, 0.97 * 60.0);
        channels[CvChannel::SyncOffsetA.index()] = ChannelCalibration::new(0.0225, 1.0);
        channels[CvChannel::SyncOffsetB.index()] = ChannelCalibration::new(0.0231, 1.0);
        Self { channels }
    }

    /// Calibration of one channel.
    #[inline]
    pub fn get(&self, channel: CvChannel) -> ChannelCalibration {
        self.channels[channel.index()]
    }

    /// Replace the calibration of one channel.
    pub fn set(&mut self, channel: CvChannel, calibration: ChannelCalibration) {
        self.channels[channel.index()] = calibration;
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, channel: CvChannel, calibration: ChannelCalibration) -> Self {
        self.set(channel, calibration);
        self
    }

    /// Calibrate a raw reading from `channel`.
    #[inline]
    pub fn apply(&self, channel: CvChannel, raw: f32) -> f32 {
        self.channels[channel.index()].apply(raw)
    }

    /// Iterate `(channel, calibration)` pairs in channel order.
    pub fn iter(&self) -> impl Iterator<Item = (CvChannel, ChannelCalibration)> + '_ {
        CvChannel::ALL.into_iter().zip(self.channels.iter().copied())
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self::factory()
    }
}
