//! Pitch and control-voltage math.
//!
//! All functions are allocation-free and suitable for `no_std`.
//!
//! # Pitch
//!
//! - [`note_to_freq`] - Fractional MIDI note numbers to Hz
//!
//! # Control Shaping
//!
//! - [`map_range`] - Linear map from a normalized control to `[min, max]`
//! - [`dead_zone`] - Symmetric dead zone (`|x| > threshold`, else 0)
//! - [`dead_zone_below`] - One-sided dead zone (`x > threshold`, else 0)
//! - [`clamp`] - Value limiting

use libm::powf;

/// Frequency of MIDI note 69 (A4) in Hz.
const A4_FREQ: f32 = 440.0;

/// MIDI note number of A4.
const A4_NOTE: f32 = 69.0;

/// Convert a (fractional) MIDI note number to frequency in Hz.
///
/// Equal temperament, A4 = 440 Hz. Fractional notes give the
/// corresponding in-between frequency, so glides and fine tuning
/// sweep continuously.
///
/// # Example
/// ```rust
/// use twinosc_core::note_to_freq;
///
/// assert!((note_to_freq(69.0) - 440.0).abs() < 1e-3);
/// assert!((note_to_freq(57.0) - 220.0).abs() < 1e-3);
/// ```
#[inline]
pub fn note_to_freq(note: f32) -> f32 {
    A4_FREQ * powf(2.0, (note - A4_NOTE) / 12.0)
}

/// Map a normalized control value onto `[min, max]`.
///
/// Linear, not clamped: `0.0 → min`, `1.0 → max`.
///
/// # Example
/// ```rust
/// use twinosc_core::map_range;
///
/// assert_eq!(map_range(0.5, 0.0, 24.0), 12.0);
/// assert_eq!(map_range(0.25, -1.0, 1.0), -0.5);
/// ```
#[inline]
pub fn map_range(value: f32, min: f32, max: f32) -> f32 {
    min + value * (max - min)
}

/// Symmetric dead zone: values with `|value| <= threshold` become exactly 0.
///
/// Values outside the zone pass through unchanged (no re-scaling).
#[inline]
pub fn dead_zone(value: f32, threshold: f32) -> f32 {
    if value.abs() > threshold { value } else { 0.0 }
}

/// One-sided dead zone: values `<= threshold` (including all negatives) become 0.
#[inline]
pub fn dead_zone_below(value: f32, threshold: f32) -> f32 {
    if value > threshold { value } else { 0.0 }
}

/// Clamp a value to `[min, max]`.
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}
