//! Lock-free pitch-change handoff.
//!
//! The audio callback raises an event whenever the quantized coarse pitch
//! changes; a low-priority indicator driver (LED, display) polls for it
//! between callbacks. [`PitchIndicator`] is the single-writer/single-reader
//! channel between the two: an atomic flag plus an atomic pitch value.
//!
//! Missing an intermediate pitch is harmless: the reader only needs to know
//! that *something* changed and what the latest value is.
//!
//! # Example
//!
//! ```rust
//! use twinosc_platform::PitchIndicator;
//!
//! let indicator = PitchIndicator::new();
//!
//! // Audio side
//! indicator.raise(24);
//!
//! // Indicator side
//! assert_eq!(indicator.take(), Some(24));
//! assert_eq!(indicator.take(), None);
//! ```

use core::sync::atomic::{AtomicBool, AtomicI32, Ordering};

/// Pitch-change flag shared between the audio callback and an indicator driver.
///
/// `raise` is called only from the audio side and `take` only from the
/// indicator side. Both are wait-free and safe under a preemptive
/// scheduler; `PitchIndicator` can live in a `static`.
#[derive(Debug, Default)]
pub struct PitchIndicator {
    changed: AtomicBool,
    pitch: AtomicI32,
}

impl PitchIndicator {
    /// No pending event, pitch 0.
    pub const fn new() -> Self {
        Self {
            changed: AtomicBool::new(false),
            pitch: AtomicI32::new(0),
        }
    }

    /// Publish a new quantized pitch and flag the change.
    #[inline]
    pub fn raise(&self, pitch: i32) {
        self.pitch.store(pitch, Ordering::Relaxed);
        self.changed.store(true, Ordering::Release);
    }

    /// Consume a pending event, returning the latest pitch.
    ///
    /// Returns `None` if nothing changed since the last `take`.
    #[inline]
    pub fn take(&self) -> Option<i32> {
        if self.changed.swap(false, Ordering::Acquire) {
            Some(self.pitch.load(Ordering::Relaxed))
        } else {
            None
        }
    }

    /// True if an event is waiting.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.changed.load(Ordering::Acquire)
    }

    /// Most recently published pitch, without consuming the event.
    #[inline]
    pub fn last_pitch(&self) -> i32 {
        self.pitch.load(Ordering::Relaxed)
    }
}
