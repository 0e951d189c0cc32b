//! Glide (portamento) smoothing for stepped pitch.
//!
//! Quantized pitch jumps in whole semitones. [`GlideFilter`] turns those
//! steps into a continuous ramp so the oscillators slide between notes
//! instead of clicking from one to the next.
//!
//! ## Linear Slew
//!
//! Unlike a one-pole smoother, the glide moves at a constant rate: every
//! call to [`advance`](GlideFilter::advance) moves `current` toward `target`
//! by at most `step`, never overshooting. The step is independent of the
//! distance to travel:
//!
//! ```text
//! step = range / samples
//! ```
//!
//! where `range` is the largest jump the glide is expected to cover (the
//! full coarse pitch span) and `samples` is the caller-supplied time
//! constant. A full-range jump therefore takes `samples` advances; shorter
//! jumps arrive proportionally sooner.
//!
//! ## Usage
//!
//! ```rust
//! use twinosc_core::GlideFilter;
//!
//! let mut glide = GlideFilter::new(60.0);
//! glide.set_target(60.0);
//!
//! // The time constant may change every sample (glide knob)
//! for _ in 0..48000 {
//!     glide.set_time_constant(48000.0);
//!     glide.advance();
//! }
//! assert_eq!(glide.get(), 60.0);
//! ```

/// Default glide range in semitones (five octaves, the coarse pitch span).
pub const DEFAULT_GLIDE_RANGE: f32 = 60.0;

/// Constant-rate slew limiter with a control-dependent time constant.
///
/// `current` starts at 0.0. A time constant of zero (or less) makes the
/// step infinite, so the next [`advance`](Self::advance) lands exactly on
/// the target.
#[derive(Debug, Clone)]
pub struct GlideFilter {
    /// Smoothed value
    current: f32,
    /// Last requested value
    target: f32,
    /// Maximum movement per advance
    step: f32,
    /// Distance covered by one full time constant
    range: f32,
    /// Time constant the current step was computed from
    samples: f32,
}

impl GlideFilter {
    /// Create a glide covering `range` units per time constant.
    ///
    /// Starts at rest on 0.0 with an instant (infinite) step until
    /// [`set_time_constant`](Self::set_time_constant) is called.
    pub fn new(range: f32) -> Self {
        Self {
            current: 0.0,
            target: 0.0,
            step: f32::INFINITY,
            range: range.abs(),
            samples: 0.0,
        }
    }

    /// Record a new target. Has no effect on `current` until the next advance.
    #[inline]
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Set the time constant in samples for a full-range glide.
    ///
    /// Cheap to call every sample: the step is only recomputed when
    /// `samples` differs from the previous call.
    #[inline]
    pub fn set_time_constant(&mut self, samples: f32) {
        if samples == self.samples {
            return;
        }
        self.samples = samples;
        self.step = if samples > 0.0 {
            self.range / samples
        } else {
            f32::INFINITY
        };
    }

    /// Change the range covered by one time constant.
    pub fn set_range(&mut self, range: f32) {
        self.range = range.abs();
        let samples = self.samples;
        // Force recomputation with the new range
        self.samples = f32::NAN;
        self.set_time_constant(samples);

        #[cfg(feature = "tracing")]
        tracing::debug!(range = self.range, "glide range updated");
    }

    /// Move `current` toward `target` by at most one step and return it.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        let distance = self.target - self.current;
        if distance.abs() <= self.step {
            self.current = self.target;
        } else if distance > 0.0 {
            self.current += self.step;
        } else {
            self.current -= self.step;
        }
        self.current
    }

    /// Current smoothed value without advancing.
    #[inline]
    pub fn get(&self) -> f32 {
        self.current
    }

    /// Last requested target.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Per-advance increment currently in effect.
    #[inline]
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Range covered by one full time constant.
    #[inline]
    pub fn range(&self) -> f32 {
        self.range
    }

    /// True once `current` has reached `target`.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.current == self.target
    }

}

impl Default for GlideFilter {
    fn default() -> Self {
        Self::new(DEFAULT_GLIDE_RANGE)
    }
}
