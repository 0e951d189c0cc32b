//! Banded interval quantizers.
//!
//! Two pure functions turn a single continuous control into a small set of
//! musical intervals. Both keep a continuous fine-tune region near zero and
//! then lock to fixed intervals further out, so exact intervals do not depend
//! on precise analog knob positioning.
//!
//! ## Unison detune ([`unison_detune`])
//!
//! ```text
//! value  < 0.1           → unison off
//! curve = (value - 0.1) / 0.9
//! curve in [0, 0.25]     → curve × 2 semitones (0 to 0.5, chorus region)
//! curve in (0.25, 0.5]   → 3 (minor third)
//! curve in (0.5, 0.75]   → 4 (major third)
//! curve in (0.75, 1]     → 5 (fourth)
//! ```
//!
//! ## Relative voice tuning ([`relative_tuning`])
//!
//! ```text
//! |value| <= 0.333       → value / 0.333 (±1 semitone)
//! |value| <= 0.666       → ±7 (fifth)
//! otherwise              → ±12 (octave)
//! ```

/// Unison control below this value disables the secondary sub-oscillator.
pub const UNISON_THRESHOLD: f32 = 0.1;

// Quartile edges of the unison curve on the raw control: 0.1 + 0.9 × {0.25, 0.5, 0.75}.
// Compared before rescaling so boundary inputs stay in their band.
const UNISON_FINE_EDGE: f32 = 0.325;
const UNISON_THIRD_EDGE: f32 = 0.55;
const UNISON_MAJOR_THIRD_EDGE: f32 = 0.775;

/// Boundary of the continuous region of [`relative_tuning`].
pub const RELATIVE_FINE_LIMIT: f32 = 0.333;

/// Boundary of the fifth region of [`relative_tuning`].
pub const RELATIVE_FIFTH_LIMIT: f32 = 0.666;

/// Map a unison control in `[0, 1]` to a detune interval.
///
/// Returns `None` when unison is disabled, otherwise the detune of the
/// secondary sub-oscillator in semitones. Values above 1.0 land in the top
/// band.
///
/// # Example
///
/// ```rust
/// use twinosc_synth::unison_detune;
///
/// assert_eq!(unison_detune(0.05), None);
/// assert_eq!(unison_detune(0.1), Some(0.0));
/// assert_eq!(unison_detune(0.55), Some(3.0));
/// assert_eq!(unison_detune(1.0), Some(5.0));
/// ```
#[inline]
pub fn unison_detune(value: f32) -> Option<f32> {
    if value.is_nan() || value < UNISON_THRESHOLD {
        return None;
    }

    let detune = if value <= UNISON_FINE_EDGE {
        let curve = (value - UNISON_THRESHOLD) / (1.0 - UNISON_THRESHOLD);
        curve * 2.0
    } else if value <= UNISON_THIRD_EDGE {
        3.0
    } else if value <= UNISON_MAJOR_THIRD_EDGE {
        4.0
    } else {
        5.0
    };
    Some(detune)
}

/// Map a bipolar control in `[-1, 1]` to an interval for the second voice.
///
/// The sign of the result follows the sign of the input.
///
/// # Example
///
/// ```rust
/// use twinosc_synth::relative_tuning;
///
/// assert!((relative_tuning(0.2) - 0.6006).abs() < 1e-3);
/// assert_eq!(relative_tuning(0.5), 7.0);
/// assert_eq!(relative_tuning(-0.9), -12.0);
/// ```
#[inline]
pub fn relative_tuning(value: f32) -> f32 {
    let magnitude = value.abs();
    if magnitude <= RELATIVE_FINE_LIMIT {
        value / RELATIVE_FINE_LIMIT
    } else if magnitude <= RELATIVE_FIFTH_LIMIT {
        7.0_f32.copysign(value)
    } else if magnitude.is_nan() {
        0.0
    } else {
        12.0_f32.copysign(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unison_below_threshold_is_off() {
        assert_eq!(unison_detune(0.0), None);
        assert_eq!(unison_detune(0.05), None);
        assert_eq!(unison_detune(0.0999), None);
        assert_eq!(unison_detune(-1.0), None);
        assert_eq!(unison_detune(f32::NAN), None);
    }

    #[test]
    fn unison_threshold_is_on_with_zero_detune() {
        assert_eq!(unison_detune(0.1), Some(0.0));
    }

    #[test]
    fn unison_fine_region_is_continuous() {
        // curve = 0.125 → 0.25 semitones
        let v = 0.1 + 0.9 * 0.125;
        let d = unison_detune(v).unwrap();
        assert!((d - 0.25).abs() < 1e-5, "got {d}");

        // Top of the fine region reaches half a semitone
        let top = unison_detune(0.325).unwrap();
        assert!((top - 0.5).abs() < 1e-4, "got {top}");
    }

    #[test]
    fn unison_bands() {
        assert_eq!(unison_detune(0.33), Some(3.0));
        assert_eq!(unison_detune(0.55), Some(3.0));
        assert_eq!(unison_detune(0.7), Some(4.0));
        assert_eq!(unison_detune(0.9), Some(5.0));
        assert_eq!(unison_detune(1.0), Some(5.0));
        assert_eq!(unison_detune(1.5), Some(5.0));
    }

    #[test]
    fn unison_detune_never_exceeds_a_fourth() {
        for i in 0..=1000 {
            let v = i as f32 / 1000.0;
            if let Some(d) = unison_detune(v) {
                assert!((0.0..=5.0).contains(&d), "{v} -> {d}");
            }
        }
    }

    #[test]
    fn relative_fine_region() {
        assert!((relative_tuning(0.2) - 0.2 / 0.333).abs() < 1e-6);
        assert!((relative_tuning(-0.2) + 0.2 / 0.333).abs() < 1e-6);
        assert_eq!(relative_tuning(0.0), 0.0);
        assert!((relative_tuning(0.333) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn relative_fifth_region() {
        assert_eq!(relative_tuning(0.5), 7.0);
        assert_eq!(relative_tuning(-0.5), -7.0);
        assert_eq!(relative_tuning(0.666), 7.0);
    }

    #[test]
    fn relative_octave_region() {
        assert_eq!(relative_tuning(0.9), 12.0);
        assert_eq!(relative_tuning(-0.9), -12.0);
        assert_eq!(relative_tuning(1.0), 12.0);
        assert_eq!(relative_tuning(-3.0), -12.0);
    }

    #[test]
    fn relative_nan_is_unison() {
        assert_eq!(relative_tuning(f32::NAN), 0.0);
    }
}
