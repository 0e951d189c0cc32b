//! Per-sample orchestration of the two voices.
//!
//! [`TwinOscillator`] is the whole audio-rate control path of the module.
//! Once per output sample it reads every control channel, derives pitch,
//! timbre, sync and unison for both voices, and renders one stereo frame
//! (voice A left, voice B right).
//!
//! ## Pipeline
//!
//! The order is fixed; later steps depend on earlier ones:
//!
//! ```text
//! 1. bend    = dead_zone_below(PitchBend, 0.05) × 24
//! 2. coarse  = round(CoarsePitch)           → pitch-change event on change
//! 3. glide   = GlideFilter(coarse), time constant = sample_rate × GlideTime²
//! 4. fine    = dead_zone(FineTuneA, 0.2) + dead_zone(FineTuneB, 0.2)
//! 5. pitch_a = clamp(base_note + bend + glide + fine, 0, 127)
//!    pitch_b = clamp(pitch_a + relative_tuning(RelativeTune → -1..1), 0, 127)
//! 6. sync    = SyncAmount + SyncOffsetA + SyncOffsetB
//!    unison  = clamp(Unison, 0, 1)
//! 7. mode switch on  → sync to A, 0 to B
//!    mode switch off → 0 to A, sync to B
//! 8. per voice: pitch, timbre, sync, unison, then render
//! ```
//!
//! Every reading passes through the channel's [`Calibration`] first.
//!
//! Unison is applied after pitch, so a change in unison detune reaches the
//! secondary sub-oscillator's frequency on the following sample.

use crate::{Calibration, ControlSource, CvChannel, PitchIndicator};
use twinosc_core::{DEFAULT_GLIDE_RANGE, GlideFilter, clamp, dead_zone, dead_zone_below, map_range};
use twinosc_synth::{DEFAULT_MIX_GAIN, ShapeOscillator, VariableShapeOscillator, Voice, relative_tuning};

/// Pitch bend readings at or below this are treated as zero.
pub const PITCH_BEND_DEAD_ZONE: f32 = 0.05;

/// Pitch bend span in semitones at full scale.
pub const PITCH_BEND_RANGE: f32 = 24.0;

/// Fine-tune readings with magnitude at or below this (semitones) are zero.
pub const FINE_TUNE_DEAD_ZONE: f32 = 0.2;

/// Highest MIDI note either voice can reach.
pub const MAX_NOTE: f32 = 127.0;

/// Default pitch of voice A with every pitch input at zero (C2).
pub const DEFAULT_BASE_NOTE: f32 = 36.0;

/// Tunable constants of the orchestrator.
///
/// | Field | Default | Meaning |
/// |-------|---------|---------|
/// | `sample_rate` | 48000 | Output rate in Hz, also scales the glide time |
/// | `base_note` | 36 | MIDI note of voice A at zero pitch input |
/// | `glide_range` | 60 | Semitones covered by one glide time constant |
/// | `mix_gain` | 0.9 | Output gain of each voice |
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoreConfig {
    /// Sample rate in Hz.
    pub sample_rate: f32,
    /// MIDI note of voice A with all pitch inputs at zero.
    pub base_note: f32,
    /// Glide range in semitones.
    pub glide_range: f32,
    /// Voice output gain.
    pub mix_gain: f32,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48000.0,
            base_note: DEFAULT_BASE_NOTE,
            glide_range: DEFAULT_GLIDE_RANGE,
            mix_gain: DEFAULT_MIX_GAIN,
        }
    }
}

/// One output sample per channel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StereoFrame {
    /// Voice A.
    pub left: f32,
    /// Voice B.
    pub right: f32,
}

/// Which voice receives the sync amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SyncTarget {
    /// Mode switch on.
    VoiceA,
    /// Mode switch off.
    #[default]
    VoiceB,
}

impl SyncTarget {
    /// Routing selected by the mode switch.
    #[inline]
    pub const fn from_switch(on: bool) -> Self {
        if on { SyncTarget::VoiceA } else { SyncTarget::VoiceB }
    }
}

/// Values derived during the most recent [`TwinOscillator::process`] call.
///
/// All pitches are fractional MIDI notes; bend, fine tune and interval are
/// in semitones.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ParameterSnapshot {
    /// Pitch bend after dead zone and scaling.
    pub pitch_bend: f32,
    /// Rounded coarse pitch.
    pub quantized_pitch: i32,
    /// Glide output.
    pub glide: f32,
    /// First fine tune after dead zone.
    pub fine_tune_a: f32,
    /// Second fine tune after dead zone.
    pub fine_tune_b: f32,
    /// Voice A pitch.
    pub pitch_a: f32,
    /// Voice B pitch.
    pub pitch_b: f32,
    /// Quantized interval of voice B relative to voice A.
    pub interval_b: f32,
    /// Shared sync amount before routing.
    pub sync_amount: f32,
    /// Voice receiving the sync amount.
    pub sync_target: SyncTarget,
    /// Voice A timbre.
    pub timbre_a: f32,
    /// Voice B timbre.
    pub timbre_b: f32,
    /// Unison control after clamping.
    pub unison: f32,
}

/// Two-voice oscillator core driven by a [`ControlSource`].
///
/// Owns both voices, the glide filter, the calibration table and the
/// pitch-change indicator. [`process`](Self::process) does not allocate,
/// block or log.
///
/// # Example
///
/// ```rust
/// use twinosc_platform::{Calibration, ControlFrame, CoreConfig, CvChannel, SyncTarget, TwinOscillator};
///
/// let mut core = TwinOscillator::new(CoreConfig::default());
/// core.set_calibration(Calibration::identity());
///
/// let mut controls = ControlFrame::new()
///     .with(CvChannel::CoarsePitch, 12.0)
///     .with(CvChannel::RelativeTune, 0.5)
///     .with(CvChannel::SyncAmount, 0.25)
///     .with_mode_switch(true);
///
/// let mut left = [0.0; 64];
/// let mut right = [0.0; 64];
/// core.process_block(&mut controls, &mut left, &mut right);
///
/// let snap = core.snapshot();
/// assert_eq!(snap.pitch_a, 48.0);
/// assert_eq!(snap.pitch_b, 48.0);
/// assert_eq!(snap.sync_target, SyncTarget::VoiceA);
/// assert_eq!(core.indicator().take(), Some(12));
/// ```
#[derive(Debug)]
pub struct TwinOscillator<O = VariableShapeOscillator> {
    config: CoreConfig,
    calibration: Calibration,
    glide: GlideFilter,
    voice_a: Voice<O>,
    voice_b: Voice<O>,
    /// Rounded coarse pitch of the previous sample
    last_quantized_pitch: i32,
    indicator: PitchIndicator,
    snapshot: ParameterSnapshot,
}

impl TwinOscillator<VariableShapeOscillator> {
    /// Create a core with [`VariableShapeOscillator`] voices and factory calibration.
    pub fn new(config: CoreConfig) -> Self {
        Self::with_voices(
            config,
            Voice::new(config.sample_rate),
            Voice::new(config.sample_rate),
        )
    }
}

impl<O: ShapeOscillator> TwinOscillator<O> {
    /// Create a core around caller-supplied voices.
    ///
    /// `config` is applied to both voices.
    pub fn with_voices(config: CoreConfig, voice_a: Voice<O>, voice_b: Voice<O>) -> Self {
        let mut core = Self {
            config,
            calibration: Calibration::factory(),
            glide: GlideFilter::new(config.glide_range),
            voice_a,
            voice_b,
            last_quantized_pitch: 0,
            indicator: PitchIndicator::new(),
            snapshot: ParameterSnapshot::default(),
        };
        core.set_config(config);
        core
    }

    /// Apply a new configuration.
    ///
    /// Not real-time safe with tracing enabled.
    pub fn set_config(&mut self, config: CoreConfig) {
        self.config = config;
        self.glide.set_range(config.glide_range);
        for voice in [&mut self.voice_a, &mut self.voice_b] {
            voice.set_sample_rate(config.sample_rate);
            voice.set_mix_gain(config.mix_gain);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            sample_rate = config.sample_rate,
            base_note = config.base_note,
            glide_range = config.glide_range,
            mix_gain = config.mix_gain,
            "core configured"
        );
    }

    /// Change the sample rate of both voices and the glide time scale.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.set_config(CoreConfig {
            sample_rate,
            ..self.config
        });
    }

    /// Replace the calibration table.
    pub fn set_calibration(&mut self, calibration: Calibration) {
        self.calibration = calibration;

        #[cfg(feature = "tracing")]
        tracing::debug!("calibration updated");
    }

    /// Current calibration table.
    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Current configuration.
    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// Read every control once and render one stereo frame.
    pub fn process<S: ControlSource + ?Sized>(&mut self, source: &mut S) -> StereoFrame {
        source.poll();
        let cal = &self.calibration;
        let read = |channel: CvChannel| cal.apply(channel, source.read(channel));

        // 1. Bend
        let pitch_bend = map_range(
            dead_zone_below(read(CvChannel::PitchBend), PITCH_BEND_DEAD_ZONE),
            0.0,
            PITCH_BEND_RANGE,
        );

        // 2. Quantized coarse pitch
        let quantized_pitch = libm::roundf(read(CvChannel::CoarsePitch)) as i32;
        if quantized_pitch != self.last_quantized_pitch {
            self.last_quantized_pitch = quantized_pitch;
            self.indicator.raise(quantized_pitch);
        }

        // 3. Glide
        let glide_time = read(CvChannel::GlideTime).max(0.0);
        self.glide.set_target(quantized_pitch as f32);
        self.glide
            .set_time_constant(self.config.sample_rate * glide_time * glide_time);
        let glide = self.glide.advance();

        // 4. Fine tune
        let fine_tune_a = dead_zone(read(CvChannel::FineTuneA), FINE_TUNE_DEAD_ZONE);
        let fine_tune_b = dead_zone(read(CvChannel::FineTuneB), FINE_TUNE_DEAD_ZONE);

        // 5. Voice pitches
        let pitch_a = clamp(
            self.config.base_note + pitch_bend + glide + fine_tune_a + fine_tune_b,
            0.0,
            MAX_NOTE,
        );
        let interval_b = relative_tuning(map_range(read(CvChannel::RelativeTune), -1.0, 1.0));
        let pitch_b = clamp(pitch_a + interval_b, 0.0, MAX_NOTE);

        // 6. Shared and per-voice controls
        let sync_amount = read(CvChannel::SyncAmount)
            + read(CvChannel::SyncOffsetA)
            + read(CvChannel::SyncOffsetB);
        let timbre_a = read(CvChannel::TimbreA);
        let timbre_b = read(CvChannel::TimbreB);
        let unison = clamp(read(CvChannel::Unison), 0.0, 1.0);

        // 7. Sync routing
        let sync_target = SyncTarget::from_switch(source.mode_switch());
        let (sync_a, sync_b) = match sync_target {
            SyncTarget::VoiceA => (sync_amount, 0.0),
            SyncTarget::VoiceB => (0.0, sync_amount),
        };

        // 8. Apply and render
        apply_voice(&mut self.voice_a, pitch_a, timbre_a, sync_a, unison);
        apply_voice(&mut self.voice_b, pitch_b, timbre_b, sync_b, unison);

        self.snapshot = ParameterSnapshot {
            pitch_bend,
            quantized_pitch,
            glide,
            fine_tune_a,
            fine_tune_b,
            pitch_a,
            pitch_b,
            interval_b,
            sync_amount,
            sync_target,
            timbre_a,
            timbre_b,
            unison,
        };

        StereoFrame {
            left: self.voice_a.advance(),
            right: self.voice_b.advance(),
        }
    }

    /// Render a block, one [`process`](Self::process) call per sample.
    ///
    /// Processes `min(left.len(), right.len())` samples.
    pub fn process_block<S: ControlSource + ?Sized>(
        &mut self,
        source: &mut S,
        left: &mut [f32],
        right: &mut [f32],
    ) {
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let frame = self.process(source);
            *l = frame.left;
            *r = frame.right;
        }
    }

    /// Values derived during the last `process` call.
    pub fn snapshot(&self) -> ParameterSnapshot {
        self.snapshot
    }

    /// Pitch-change handoff for an indicator driver.
    pub fn indicator(&self) -> &PitchIndicator {
        &self.indicator
    }

    /// Rounded coarse pitch of the last processed sample.
    pub fn last_quantized_pitch(&self) -> i32 {
        self.last_quantized_pitch
    }

    /// Voice A (left output).
    pub fn voice_a(&self) -> &Voice<O> {
        &self.voice_a
    }

    /// Voice B (right output).
    pub fn voice_b(&self) -> &Voice<O> {
        &self.voice_b
    }

    /// The glide filter.
    pub fn glide(&self) -> &GlideFilter {
        &self.glide
    }
}

#[inline]
fn apply_voice<O: ShapeOscillator>(voice: &mut Voice<O>, pitch: f32, timbre: f32, sync: f32, unison: f32) {
    voice.set_pitch(pitch);
    voice.set_timbre(timbre);
    voice.set_sync_amount(sync);
    voice.set_unison_amount(unison);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ChannelCalibration, ControlFrame};

    fn identity_core() -> TwinOscillator {
        let mut core = TwinOscillator::new(CoreConfig::default());
        core.set_calibration(Calibration::identity());
        core
    }

    /// Controls with voice B in unison with voice A.
    fn centered() -> ControlFrame {
        ControlFrame::new().with(CvChannel::RelativeTune, 0.5)
    }

    #[test]
    fn base_note_with_all_inputs_at_zero() {
        let mut core = identity_core();
        core.process(&mut centered());
        let snap = core.snapshot();
        assert_eq!(snap.pitch_a, 36.0);
        assert_eq!(snap.pitch_b, 36.0);
        assert_eq!(snap.quantized_pitch, 0);
    }

    #[test]
    fn relative_tune_fifth_up() {
        let mut core = identity_core();
        let mut controls = ControlFrame::new()
            .with(CvChannel::CoarsePitch, 24.0)
            .with(CvChannel::RelativeTune, 0.75);
        core.process(&mut controls);
        let snap = core.snapshot();
        assert_eq!(snap.pitch_a, 60.0);
        assert_eq!(snap.interval_b, 7.0);
        assert_eq!(snap.pitch_b, 67.0);
    }

    #[test]
    fn relative_tune_at_zero_knob_is_octave_down() {
        let mut core = identity_core();
        let mut controls = ControlFrame::new().with(CvChannel::CoarsePitch, 24.0);
        core.process(&mut controls);
        assert_eq!(core.snapshot().pitch_b, 48.0);
    }

    #[test]
    fn coarse_pitch_is_rounded() {
        let mut core = identity_core();
        let mut controls = centered().with(CvChannel::CoarsePitch, 11.6);
        core.process(&mut controls);
        assert_eq!(core.snapshot().quantized_pitch, 12);
        assert_eq!(core.snapshot().pitch_a, 48.0);

        controls.set(CvChannel::CoarsePitch, 11.4);
        core.process(&mut controls);
        assert_eq!(core.snapshot().quantized_pitch, 11);
    }

    #[test]
    fn pitch_event_raised_once_per_change() {
        let mut core = identity_core();
        let mut controls = centered();

        core.process(&mut controls);
        assert_eq!(core.indicator().take(), None);

        controls.set(CvChannel::CoarsePitch, 7.0);
        core.process(&mut controls);
        core.process(&mut controls);
        assert_eq!(core.indicator().take(), Some(7));
        assert_eq!(core.indicator().take(), None);

        controls.set(CvChannel::CoarsePitch, 7.3);
        core.process(&mut controls);
        assert_eq!(core.indicator().take(), None);

        controls.set(CvChannel::CoarsePitch, 5.0);
        core.process(&mut controls);
        assert_eq!(core.indicator().take(), Some(5));
        assert_eq!(core.last_quantized_pitch(), 5);
    }

    #[test]
    fn zero_glide_time_is_instant() {
        let mut core = identity_core();
        let mut controls = centered().with(CvChannel::CoarsePitch, 30.0);
        core.process(&mut controls);
        assert_eq!(core.snapshot().glide, 30.0);
    }

    #[test]
    fn glide_time_slews_linearly() {
        let mut core = identity_core();
        // 48000 × 0.1² = 480 samples per 60 semitones → 0.125 per sample
        let mut controls = centered()
            .with(CvChannel::GlideTime, 0.1)
            .with(CvChannel::CoarsePitch, 12.0);

        core.process(&mut controls);
        assert!((core.snapshot().glide - 0.125).abs() < 1e-5);
        assert!((core.snapshot().pitch_a - 36.125).abs() < 1e-4);
        assert_eq!(core.glide().target(), 12.0);
        assert!((core.glide().step() - 0.125).abs() < 1e-6);
        assert!(!core.glide().is_settled());

        for _ in 0..200 {
            core.process(&mut controls);
        }
        assert_eq!(core.snapshot().glide, 12.0);
        assert!(core.glide().is_settled());
    }

    #[test]
    fn negative_glide_time_is_instant() {
        let mut core = identity_core();
        let mut controls = centered()
            .with(CvChannel::GlideTime, -0.5)
            .with(CvChannel::CoarsePitch, 12.0);
        core.process(&mut controls);
        assert_eq!(core.snapshot().glide, 12.0);
    }

    #[test]
    fn pitch_bend_dead_zone_and_scale() {
        let mut core = identity_core();
        let mut controls = centered().with(CvChannel::PitchBend, 0.04);
        core.process(&mut controls);
        assert_eq!(core.snapshot().pitch_bend, 0.0);

        controls.set(CvChannel::PitchBend, 0.5);
        core.process(&mut controls);
        assert_eq!(core.snapshot().pitch_bend, 12.0);
        assert_eq!(core.snapshot().pitch_a, 48.0);

        controls.set(CvChannel::PitchBend, -0.5);
        core.process(&mut controls);
        assert_eq!(core.snapshot().pitch_bend, 0.0);
    }

    #[test]
    fn fine_tune_dead_zone_is_independent() {
        let mut core = identity_core();
        let mut controls = centered()
            .with(CvChannel::FineTuneA, 0.15)
            .with(CvChannel::FineTuneB, -0.5);
        core.process(&mut controls);
        let snap = core.snapshot();
        assert_eq!(snap.fine_tune_a, 0.0);
        assert_eq!(snap.fine_tune_b, -0.5);
        assert_eq!(snap.pitch_a, 35.5);
    }

    #[test]
    fn pitches_are_clamped() {
        let mut core = identity_core();
        let mut controls = ControlFrame::new()
            .with(CvChannel::CoarsePitch, 200.0)
            .with(CvChannel::RelativeTune, 1.0);
        core.process(&mut controls);
        assert_eq!(core.snapshot().pitch_a, MAX_NOTE);
        assert_eq!(core.snapshot().pitch_b, MAX_NOTE);

        controls.set(CvChannel::CoarsePitch, -100.0);
        controls.set(CvChannel::RelativeTune, 0.0);
        core.process(&mut controls);
        assert_eq!(core.snapshot().pitch_a, 0.0);
        assert_eq!(core.snapshot().pitch_b, 0.0);
    }

    #[test]
    fn sync_routed_by_switch() {
        let mut core = identity_core();
        let mut controls = centered()
            .with(CvChannel::SyncAmount, 0.25)
            .with(CvChannel::SyncOffsetA, 0.125)
            .with(CvChannel::SyncOffsetB, 0.125);

        controls.set_mode_switch(true);
        core.process(&mut controls);
        assert_eq!(core.snapshot().sync_amount, 0.5);
        assert_eq!(core.snapshot().sync_target, SyncTarget::VoiceA);
        let a = core.voice_a().primary();
        let b = core.voice_b().primary();
        assert!((a.sync_frequency - a.frequency * 5.0).abs() < 1e-2);
        assert_eq!(b.sync_frequency, b.frequency);

        controls.set_mode_switch(false);
        core.process(&mut controls);
        assert_eq!(core.snapshot().sync_target, SyncTarget::VoiceB);
        let a = core.voice_a().primary();
        let b = core.voice_b().primary();
        assert_eq!(a.sync_frequency, a.frequency);
        assert!((b.sync_frequency - b.frequency * 5.0).abs() < 1e-2);
    }

    #[test]
    fn unison_is_clamped_and_shared() {
        let mut core = identity_core();
        let mut controls = centered().with(CvChannel::Unison, 1.5);
        core.process(&mut controls);
        assert_eq!(core.snapshot().unison, 1.0);
        assert!(core.voice_a().unison_enabled());
        assert!(core.voice_b().unison_enabled());
        assert_eq!(core.voice_a().detune_semitones(), 5.0);

        controls.set(CvChannel::Unison, -0.3);
        core.process(&mut controls);
        assert_eq!(core.snapshot().unison, 0.0);
        assert!(!core.voice_a().unison_enabled());
    }

    #[test]
    fn timbres_are_per_voice() {
        let mut core = identity_core();
        let mut controls = centered()
            .with(CvChannel::TimbreA, 0.2)
            .with(CvChannel::TimbreB, 0.8);
        core.process(&mut controls);
        assert_eq!(core.voice_a().primary().pulse_width, 0.5);
        assert!((core.voice_b().primary().pulse_width - 0.8).abs() < 1e-6);
    }

    #[test]
    fn calibration_is_applied_before_use() {
        let mut core = identity_core();
        core.set_calibration(
            Calibration::identity().with(CvChannel::CoarsePitch, ChannelCalibration::new(0.1, 10.0)),
        );
        let mut controls = centered().with(CvChannel::CoarsePitch, 0.9);
        core.process(&mut controls);
        assert_eq!(core.snapshot().quantized_pitch, 10);
    }

    #[test]
    fn factory_calibration_zero_point() {
        let mut core = TwinOscillator::new(CoreConfig::default());
        let mut controls = centered().with(CvChannel::CoarsePitch, -0.02708);
        core.process(&mut controls);
        assert_eq!(core.snapshot().quantized_pitch, 0);
    }

    #[test]
    fn output_is_bounded() {
        let mut core = identity_core();
        let mut controls = centered()
            .with(CvChannel::CoarsePitch, 24.0)
            .with(CvChannel::Unison, 1.0)
            .with(CvChannel::TimbreA, 0.7)
            .with(CvChannel::TimbreB, 0.1)
            .with(CvChannel::SyncAmount, 0.6);
        for _ in 0..4800 {
            let frame = core.process(&mut controls);
            assert!(frame.left.is_finite() && frame.left.abs() <= 2.5);
            assert!(frame.right.is_finite() && frame.right.abs() <= 2.5);
        }
    }

    #[test]
    fn process_block_fills_shorter_length() {
        let mut core = identity_core();
        let mut controls = centered().with(CvChannel::CoarsePitch, 24.0);
        let mut left = [f32::NAN; 32];
        let mut right = [f32::NAN; 16];
        core.process_block(&mut controls, &mut left, &mut right);
        assert!(right.iter().all(|s| s.is_finite()));
        assert!(left[..16].iter().all(|s| s.is_finite()));
        assert!(left[16..].iter().all(|s| s.is_nan()));
    }

    #[test]
    fn config_reaches_voices() {
        let mut core = TwinOscillator::new(CoreConfig {
            mix_gain: 0.5,
            base_note: 48.0,
            ..CoreConfig::default()
        });
        core.set_calibration(Calibration::identity());
        assert_eq!(core.voice_a().mix_gain(), 0.5);
        core.process(&mut centered());
        assert_eq!(core.snapshot().pitch_a, 48.0);

        core.set_sample_rate(96000.0);
        assert_eq!(core.config().sample_rate, 96000.0);
        assert_eq!(core.config().mix_gain, 0.5);
    }
}
