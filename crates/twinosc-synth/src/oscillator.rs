//! Band-limited variable-shape oscillator with hard sync.
//!
//! [`ShapeOscillator`] is the primitive a [`Voice`](crate::Voice) drives: it
//! takes a frequency, pulse width, waveshape and sync frequency and produces
//! one sample per [`advance`](ShapeOscillator::advance). The voice never looks
//! inside it, so hardware builds can wrap a vendor oscillator and tests can
//! substitute a fixed-output stub.
//!
//! [`VariableShapeOscillator`] is the reference implementation, using
//! PolyBLEP (Polynomial Band-Limited Step) to reduce aliasing on the pulse
//! edges.

use libm::floorf;

/// Euclidean remainder for f32, compatible with no_std.
#[inline]
fn rem_euclid_f32(a: f32, b: f32) -> f32 {
    let r = a - b * floorf(a / b);
    if r < 0.0 { r + b } else { r }
}

/// Oscillator primitive driven by a [`Voice`](crate::Voice).
///
/// Parameter ranges as supplied by the voice:
///
/// - `frequency`: Hz, > 0
/// - `pulse_width`: 0.5 to 1.0
/// - `waveshape`: 0.0 (variable-slope triangle/saw) to 1.0 (pulse)
/// - `sync_frequency`: Hz, >= `frequency`
pub trait ShapeOscillator {
    /// Set sample rate in Hz and recalculate phase increments.
    fn set_sample_rate(&mut self, sample_rate: f32);

    /// Set the fundamental (master) frequency in Hz.
    fn set_frequency(&mut self, freq_hz: f32);

    /// Set pulse width / slope position (0.0 to 1.0).
    fn set_pulse_width(&mut self, pulse_width: f32);

    /// Set waveshape crossfade (0.0 to 1.0).
    fn set_waveshape(&mut self, waveshape: f32);

    /// Set the synced (slave) frequency in Hz.
    fn set_sync_frequency(&mut self, freq_hz: f32);

    /// Enable or disable hard sync of the slave to the master.
    fn set_hard_sync(&mut self, enabled: bool);

    /// Generate the next sample.
    fn advance(&mut self) -> f32;
}

/// Variable-shape oscillator with master/slave hard sync.
///
/// Two phase accumulators run side by side. The master runs at
/// `frequency` and sets the perceived pitch; the slave runs at
/// `sync_frequency` and is what you hear. With hard sync enabled, the
/// slave restarts every time the master completes a cycle, producing the
/// classic sync sweep as `sync_frequency` rises above `frequency`. With
/// hard sync disabled, the slave follows the master directly.
///
/// The output crossfades between two shapes:
///
/// - **Slope** (`waveshape = 0`): rises over `pulse_width` of the cycle and
///   falls over the rest, sweeping triangle (0.5) to saw (1.0)
/// - **Pulse** (`waveshape = 1`): bipolar pulse with duty `pulse_width`,
///   PolyBLEP-corrected at both edges, sweeping square (0.5) toward a
///   narrow spike (1.0)
///
/// Sync resets are not band-limited.
///
/// # Example
///
/// ```rust
/// use twinosc_synth::{ShapeOscillator, VariableShapeOscillator};
///
/// let mut osc = VariableShapeOscillator::new(48000.0);
/// osc.set_frequency(110.0);
/// osc.set_sync_frequency(330.0);
/// osc.set_hard_sync(true);
/// osc.set_waveshape(1.0);
/// osc.set_pulse_width(1.0);
///
/// let sample = osc.advance();
/// assert!(sample.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct VariableShapeOscillator {
    /// Master phase [0.0, 1.0)
    master_phase: f32,
    /// Slave (audible) phase [0.0, 1.0)
    slave_phase: f32,
    /// Master phase increment per sample
    master_inc: f32,
    /// Slave phase increment per sample
    slave_inc: f32,
    /// Sample rate in Hz
    sample_rate: f32,
    /// Master frequency in Hz
    frequency: f32,
    /// Slave frequency in Hz
    sync_frequency: f32,
    /// Pulse duty / slope split point
    pulse_width: f32,
    /// Slope to pulse crossfade
    waveshape: f32,
    /// Whether the slave restarts on master wrap
    hard_sync: bool,
}

impl Default for VariableShapeOscillator {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl VariableShapeOscillator {
    /// Create a new oscillator with the given sample rate.
    ///
    /// Starts at 440 Hz, 50% pulse width, pure slope shape (triangle), hard sync off.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            master_phase: 0.0,
            slave_phase: 0.0,
            master_inc: 440.0 / sample_rate,
            slave_inc: 440.0 / sample_rate,
            sample_rate,
            frequency: 440.0,
            sync_frequency: 440.0,
            pulse_width: 0.5,
            waveshape: 0.0,
            hard_sync: false,
        }
    }

    /// Get master frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Get slave frequency in Hz.
    pub fn sync_frequency(&self) -> f32 {
        self.sync_frequency
    }

    /// Get pulse width.
    pub fn pulse_width(&self) -> f32 {
        self.pulse_width
    }

    /// Get waveshape.
    pub fn waveshape(&self) -> f32 {
        self.waveshape
    }

    /// Whether hard sync is enabled.
    pub fn hard_sync(&self) -> bool {
        self.hard_sync
    }

    /// Get current sample rate.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Master phase position.
    pub fn master_phase(&self) -> f32 {
        self.master_phase
    }

    /// Audible (slave) phase position.
    pub fn phase(&self) -> f32 {
        self.slave_phase
    }

    /// Reset both phases to 0.
    pub fn reset(&mut self) {
        self.master_phase = 0.0;
        self.slave_phase = 0.0;
    }

    #[inline]
    fn advance_phases(&mut self) {
        self.master_phase += self.master_inc;
        let wrapped = self.master_phase >= 1.0;
        if wrapped {
            self.master_phase -= 1.0;
        }

        if !self.hard_sync {
            self.slave_phase = self.master_phase;
            return;
        }

        if wrapped {
            // Restart at the sub-sample position where the master wrapped
            let ratio = if self.master_inc > 0.0 {
                self.slave_inc / self.master_inc
            } else {
                1.0
            };
            self.slave_phase = rem_euclid_f32(self.master_phase * ratio, 1.0);
        } else {
            self.slave_phase += self.slave_inc;
            if self.slave_phase >= 1.0 {
                self.slave_phase -= 1.0;
            }
        }
    }

    /// Naive variable-slope wave: rises over `[0, split)`, falls over `[split, 1)`.
    #[inline]
    fn slope(phase: f32, split: f32) -> f32 {
        if phase < split {
            -1.0 + 2.0 * phase / split
        } else {
            1.0 - 2.0 * (phase - split) / (1.0 - split)
        }
    }

    #[inline]
    fn pulse(phase: f32, duty: f32, dt: f32) -> f32 {
        let naive = if phase < duty { 1.0 } else { -1.0 };

        // PolyBLEP at rising edge (phase = 0)
        let blep1 = poly_blep(phase, dt);
        // PolyBLEP at falling edge (phase = duty)
        let blep2 = poly_blep(rem_euclid_f32(phase - duty + 1.0, 1.0), dt);

        naive + blep1 - blep2
    }

    #[inline]
    fn generate_sample(&self) -> f32 {
        let phase = self.slave_phase;
        let dt = if self.hard_sync {
            self.slave_inc
        } else {
            self.master_inc
        };

        let mut out = 0.0;
        if self.waveshape < 1.0 {
            // Keep the falling segment at least two samples long so the
            // saw end of the sweep stays bounded
            let max_split = (1.0 - 2.0 * dt).max(0.5);
            let split = self.pulse_width.clamp(0.5, max_split);
            out += (1.0 - self.waveshape) * Self::slope(phase, split);
        }
        if self.waveshape > 0.0 {
            let duty = self.pulse_width.clamp(0.01, 0.99);
            out += self.waveshape * Self::pulse(phase, duty, dt);
        }
        out
    }
}

impl ShapeOscillator for VariableShapeOscillator {
    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.master_inc = (self.frequency / sample_rate).min(0.5);
        self.slave_inc = (self.sync_frequency / sample_rate).min(0.5);
    }

    #[inline]
    fn set_frequency(&mut self, freq_hz: f32) {
        self.frequency = freq_hz.max(0.0);
        self.master_inc = (self.frequency / self.sample_rate).min(0.5);
    }

    #[inline]
    fn set_pulse_width(&mut self, pulse_width: f32) {
        self.pulse_width = pulse_width.clamp(0.0, 1.0);
    }

    #[inline]
    fn set_waveshape(&mut self, waveshape: f32) {
        self.waveshape = waveshape.clamp(0.0, 1.0);
    }

    #[inline]
    fn set_sync_frequency(&mut self, freq_hz: f32) {
        self.sync_frequency = freq_hz.max(0.0);
        self.slave_inc = (self.sync_frequency / self.sample_rate).min(0.5);
    }

    fn set_hard_sync(&mut self, enabled: bool) {
        self.hard_sync = enabled;
    }

    #[inline]
    fn advance(&mut self) -> f32 {
        let output = self.generate_sample();
        self.advance_phases();
        output
    }
}

/// 4th-order PolyBLEP correction.
///
/// C²-continuous degree-4 piecewise polynomial applied within two samples
/// on each side of a discontinuity. Roughly 50 dB of alias suppression.
///
/// Reference: Välimäki et al., "Antialiasing Oscillators", IEEE Signal
/// Processing Magazine, 2010.
///
/// # Arguments
/// * `t` - Current phase position in [0.0, 1.0)
/// * `dt` - Phase increment per sample
#[inline]
fn poly_blep(t: f32, dt: f32) -> f32 {
    const A4: f32 = -43.0 / 48.0;
    const A3: f32 = 7.0 / 6.0;
    const A2: f32 = 0.5;
    const A0: f32 = -1.0;
    const C: f32 = -11.0 / 48.0;

    if dt <= 0.0 {
        return 0.0;
    }

    let dt2 = 2.0 * dt;
    if t < dt2 {
        let n = t / dt;
        if n < 1.0 {
            let n2 = n * n;
            A4 * n2 * n2 + A3 * n2 * n + A2 * n2 + A0
        } else {
            let u = 2.0 - n;
            let u2 = u * u;
            C * u2 * u2
        }
    } else if t > 1.0 - dt2 {
        // Antisymmetric mirror before the discontinuity
        let n = (1.0 - t) / dt;
        if n < 1.0 {
            let n2 = n * n;
            -(A4 * n2 * n2 + A3 * n2 * n + A2 * n2 + A0)
        } else {
            let u = 2.0 - n;
            let u2 = u * u;
            -(C * u2 * u2)
        }
    } else {
        0.0
    }
}
