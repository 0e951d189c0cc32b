//! Dual sub-oscillator unison voice.
//!
//! A [`Voice`] owns two [`ShapeOscillator`]s and derives all of their
//! parameters from four high-level controls:
//!
//! | Control | Effect |
//! |---------|--------|
//! | [`set_pitch`](Voice::set_pitch) | Primary at `note`, secondary at `note + detune` |
//! | [`set_timbre`](Voice::set_timbre) | Triangle to square morph, then pulse width sweep |
//! | [`set_sync_amount`](Voice::set_sync_amount) | Sync frequency from 1× to 9× the base |
//! | [`set_unison_amount`](Voice::set_unison_amount) | Secondary on/off and its detune interval |
//!
//! ## Timbre Mapping
//!
//! One control drives two coupled parameters:
//!
//! ```text
//! pulse_width = clamp(shape, 0.5, 1.0)
//! waveshape   = clamp(shape + 0.5, 0.0, 1.0)
//! ```
//!
//! In the lower half of the range the pulse width stays at 50% while the
//! waveshape crossfades from triangle toward square; in the upper half the
//! waveshape is pinned at the pulse and the pulse width narrows the square
//! from 50% toward 100%.
//!
//! ## Mixing
//!
//! Output is `primary × gain` with unison off and
//! `(primary + secondary) × gain` with unison on. The gain (default
//! [`DEFAULT_MIX_GAIN`]) is not auto-normalized between the two modes.

use crate::oscillator::{ShapeOscillator, VariableShapeOscillator};
use crate::tuning::unison_detune;
use twinosc_core::note_to_freq;

/// Number of sub-oscillators per voice.
pub const SUB_OSC_COUNT: usize = 2;

/// Default output gain applied to the summed sub-oscillators.
pub const DEFAULT_MIX_GAIN: f32 = 0.9;

/// Sync frequency at full sync amount, as a multiple above the base frequency.
pub const SYNC_RANGE: f32 = 8.0;

/// Parameters last pushed to one sub-oscillator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubOscillatorParams {
    /// Base frequency in Hz (> 0)
    pub frequency: f32,
    /// Pulse width (0.5 to 1.0)
    pub pulse_width: f32,
    /// Waveshape (0.0 to 1.0)
    pub waveshape: f32,
    /// Hard-sync frequency in Hz (>= `frequency`)
    pub sync_frequency: f32,
}

impl Default for SubOscillatorParams {
    fn default() -> Self {
        Self {
            frequency: 440.0,
            pulse_width: 0.5,
            waveshape: 0.0,
            sync_frequency: 440.0,
        }
    }
}

/// Two-layer oscillator voice with quantized unison detune.
///
/// ## Parameters
/// - `pitch`: Fractional MIDI note of the primary sub-oscillator
/// - `timbre`: Shape control (0.0 to 1.0)
/// - `sync_amount`: Hard-sync amount (0.0 to 1.0, negatives treated as 0)
/// - `unison_amount`: Unison control (0.0 to 1.0, off below 0.1)
/// - `mix_gain`: Output gain (default 0.9)
///
/// # Example
///
/// ```rust
/// use twinosc_synth::Voice;
///
/// let mut voice = Voice::new(48000.0);
/// voice.set_unison_amount(0.55); // minor third
/// voice.set_pitch(48.0);
/// voice.set_timbre(0.3);
/// voice.set_sync_amount(0.0);
///
/// assert!(voice.unison_enabled());
/// assert_eq!(voice.detune_semitones(), 3.0);
/// let sample = voice.advance();
/// assert!(sample.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct Voice<O = VariableShapeOscillator> {
    /// Primary and secondary oscillators
    oscillators: [O; SUB_OSC_COUNT],
    /// Mirror of the parameters pushed to each oscillator
    params: [SubOscillatorParams; SUB_OSC_COUNT],
    /// Whether the secondary oscillator contributes to the output
    unison_enabled: bool,
    /// Secondary detune in semitones (0 when unison is off)
    detune_semitones: f32,
    /// Output gain
    mix_gain: f32,
}

impl Voice<VariableShapeOscillator> {
    /// Create a voice backed by two [`VariableShapeOscillator`]s.
    pub fn new(sample_rate: f32) -> Self {
        Self::with_oscillators([
            VariableShapeOscillator::new(sample_rate),
            VariableShapeOscillator::new(sample_rate),
        ])
    }
}

impl<O: ShapeOscillator> Voice<O> {
    /// Create a voice around caller-supplied oscillators.
    ///
    /// Hard sync is enabled on both and the default parameters are pushed,
    /// so the voice is immediately renderable.
    pub fn with_oscillators(oscillators: [O; SUB_OSC_COUNT]) -> Self {
        let mut voice = Self {
            oscillators,
            params: [SubOscillatorParams::default(); SUB_OSC_COUNT],
            unison_enabled: false,
            detune_semitones: 0.0,
            mix_gain: DEFAULT_MIX_GAIN,
        };
        for (osc, params) in voice.oscillators.iter_mut().zip(voice.params.iter()) {
            osc.set_hard_sync(true);
            osc.set_frequency(params.frequency);
            osc.set_pulse_width(params.pulse_width);
            osc.set_waveshape(params.waveshape);
            osc.set_sync_frequency(params.sync_frequency);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!("voice created with {SUB_OSC_COUNT} sub-oscillators");

        voice
    }

    /// Set sample rate on both oscillators.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        for osc in &mut self.oscillators {
            osc.set_sample_rate(sample_rate);
        }
    }

    /// Set pitch as a fractional MIDI note.
    ///
    /// The primary plays `note`, the secondary `note + detune_semitones`.
    /// Sync frequencies are not touched; call
    /// [`set_sync_amount`](Self::set_sync_amount) afterwards.
    #[inline]
    pub fn set_pitch(&mut self, note: f32) {
        let freqs = [note_to_freq(note), note_to_freq(note + self.detune_semitones)];
        for ((osc, params), freq) in self
            .oscillators
            .iter_mut()
            .zip(self.params.iter_mut())
            .zip(freqs)
        {
            params.frequency = freq;
            osc.set_frequency(freq);
        }
    }

    /// Set timbre from a single shape control.
    ///
    /// `pulse_width = clamp(shape, 0.5, 1.0)`,
    /// `waveshape = clamp(shape + 0.5, 0.0, 1.0)`, for both sub-oscillators.
    #[inline]
    pub fn set_timbre(&mut self, shape: f32) {
        let pulse_width = shape.clamp(0.5, 1.0);
        let waveshape = (shape + 0.5).clamp(0.0, 1.0);
        for (osc, params) in self.oscillators.iter_mut().zip(self.params.iter_mut()) {
            params.pulse_width = pulse_width;
            params.waveshape = waveshape;
            osc.set_pulse_width(pulse_width);
            osc.set_waveshape(waveshape);
        }
    }

    /// Set hard-sync amount.
    ///
    /// `sync_frequency = frequency × (1 + 8 × max(sync, 0))` per
    /// sub-oscillator, so the sync frequency never drops below the base.
    #[inline]
    pub fn set_sync_amount(&mut self, sync: f32) {
        let ratio = 1.0 + SYNC_RANGE * sync.max(0.0);
        for (osc, params) in self.oscillators.iter_mut().zip(self.params.iter_mut()) {
            params.sync_frequency = params.frequency * ratio;
            osc.set_sync_frequency(params.sync_frequency);
        }
    }

    /// Set unison from a control in `[0, 1]`.
    ///
    /// Applies [`unison_detune`]; the new detune reaches the secondary's
    /// frequency on the next [`set_pitch`](Self::set_pitch).
    #[inline]
    pub fn set_unison_amount(&mut self, value: f32) {
        match unison_detune(value) {
            Some(detune) => {
                self.unison_enabled = true;
                self.detune_semitones = detune;
            }
            None => {
                self.unison_enabled = false;
                self.detune_semitones = 0.0;
            }
        }
    }

    /// Set the output gain.
    pub fn set_mix_gain(&mut self, gain: f32) {
        self.mix_gain = gain;
    }

    /// Output gain.
    pub fn mix_gain(&self) -> f32 {
        self.mix_gain
    }

    /// Whether the secondary sub-oscillator is audible.
    #[inline]
    pub fn unison_enabled(&self) -> bool {
        self.unison_enabled
    }

    /// Secondary detune in semitones (0 when unison is off).
    #[inline]
    pub fn detune_semitones(&self) -> f32 {
        self.detune_semitones
    }

    /// Parameters of the primary sub-oscillator.
    pub fn primary(&self) -> &SubOscillatorParams {
        &self.params[0]
    }

    /// Parameters of the secondary sub-oscillator.
    pub fn secondary(&self) -> &SubOscillatorParams {
        &self.params[1]
    }

    /// The underlying oscillators.
    pub fn oscillators(&self) -> &[O; SUB_OSC_COUNT] {
        &self.oscillators
    }

    /// Render one sample.
    ///
    /// The secondary oscillator is only advanced while unison is enabled.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        let [primary, secondary] = &mut self.oscillators;
        let sum = if self.unison_enabled {
            primary.advance() + secondary.advance()
        } else {
            primary.advance()
        };
        sum * self.mix_gain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Oscillator stub that records what it was given and outputs a constant.
    #[derive(Debug, Clone, Default)]
    struct Constant {
        level: f32,
        frequency: f32,
        sync_frequency: f32,
        hard_sync: bool,
        advances: usize,
    }

    impl ShapeOscillator for Constant {
        fn set_sample_rate(&mut self, _sample_rate: f32) {}
        fn set_frequency(&mut self, freq_hz: f32) {
            self.frequency = freq_hz;
        }
        fn set_pulse_width(&mut self, _pulse_width: f32) {}
        fn set_waveshape(&mut self, _waveshape: f32) {}
        fn set_sync_frequency(&mut self, freq_hz: f32) {
            self.sync_frequency = freq_hz;
        }
        fn set_hard_sync(&mut self, enabled: bool) {
            self.hard_sync = enabled;
        }
        fn advance(&mut self) -> f32 {
            self.advances += 1;
            self.level
        }
    }

    fn unit_voice() -> Voice<Constant> {
        let osc = Constant {
            level: 1.0,
            ..Constant::default()
        };
        Voice::with_oscillators([osc.clone(), osc])
    }

    #[test]
    fn hard_sync_enabled_on_creation() {
        let voice = unit_voice();
        assert!(voice.oscillators().iter().all(|o| o.hard_sync));
    }

    #[test]
    fn render_single_layer() {
        let mut voice = unit_voice();
        voice.set_unison_amount(0.0);
        assert!((voice.advance() - 0.9).abs() < 1e-6);
        assert_eq!(voice.oscillators()[1].advances, 0);
    }

    #[test]
    fn render_unison_sums_both_layers() {
        let mut voice = unit_voice();
        voice.set_unison_amount(0.5);
        assert!((voice.advance() - 1.8).abs() < 1e-6);
        assert_eq!(voice.oscillators()[1].advances, 1);
    }

    #[test]
    fn mix_gain_is_tunable() {
        let mut voice = unit_voice();
        voice.set_mix_gain(0.5);
        voice.set_unison_amount(1.0);
        assert!((voice.advance() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn timbre_lower_half() {
        let mut voice = Voice::new(48000.0);
        voice.set_timbre(0.3);
        for p in [voice.primary(), voice.secondary()] {
            assert_eq!(p.pulse_width, 0.5);
            assert!((p.waveshape - 0.8).abs() < 1e-6);
        }
    }

    #[test]
    fn timbre_upper_half() {
        let mut voice = Voice::new(48000.0);
        voice.set_timbre(0.9);
        for p in [voice.primary(), voice.secondary()] {
            assert!((p.pulse_width - 0.9).abs() < 1e-6);
            assert_eq!(p.waveshape, 1.0);
        }
    }

    #[test]
    fn timbre_out_of_range_is_clamped() {
        let mut voice = Voice::new(48000.0);
        voice.set_timbre(1.7);
        assert_eq!(voice.primary().pulse_width, 1.0);
        assert_eq!(voice.primary().waveshape, 1.0);
        voice.set_timbre(-2.0);
        assert_eq!(voice.primary().pulse_width, 0.5);
        assert_eq!(voice.primary().waveshape, 0.0);
    }

    #[test]
    fn pitch_without_unison_keeps_layers_in_tune() {
        let mut voice = unit_voice();
        voice.set_pitch(69.0);
        assert!((voice.primary().frequency - 440.0).abs() < 1e-3);
        assert!((voice.secondary().frequency - 440.0).abs() < 1e-3);
    }

    #[test]
    fn pitch_with_unison_detunes_secondary() {
        let mut voice = unit_voice();
        voice.set_unison_amount(1.0); // fourth
        voice.set_pitch(69.0);
        assert!((voice.primary().frequency - 440.0).abs() < 1e-3);
        let fourth = 440.0 * libm::powf(2.0, 5.0 / 12.0);
        assert!((voice.secondary().frequency - fourth).abs() < 1e-2);
        assert!((voice.oscillators()[1].frequency - fourth).abs() < 1e-2);
    }

    #[test]
    fn unison_off_resets_detune() {
        let mut voice = unit_voice();
        voice.set_unison_amount(0.9);
        assert_eq!(voice.detune_semitones(), 5.0);
        voice.set_unison_amount(0.05);
        assert!(!voice.unison_enabled());
        assert_eq!(voice.detune_semitones(), 0.0);
    }

    #[test]
    fn sync_frequency_scales_with_amount() {
        let mut voice = unit_voice();
        voice.set_pitch(57.0); // 220 Hz
        voice.set_sync_amount(0.5);
        assert!((voice.primary().sync_frequency - 220.0 * 5.0).abs() < 1e-2);
        voice.set_sync_amount(1.0);
        assert!((voice.primary().sync_frequency - 220.0 * 9.0).abs() < 1e-2);
        assert_eq!(
            voice.oscillators()[0].sync_frequency,
            voice.primary().sync_frequency
        );
    }

    #[test]
    fn negative_sync_equals_base_frequency() {
        let mut voice = unit_voice();
        voice.set_pitch(60.0);
        voice.set_sync_amount(-0.4);
        for p in [voice.primary(), voice.secondary()] {
            assert_eq!(p.sync_frequency, p.frequency);
        }
    }
}
