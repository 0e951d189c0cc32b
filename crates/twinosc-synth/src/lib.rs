//! Twinosc Synth - oscillators, voices, and interval quantizers
//!
//! This crate provides the synthesis side of the twinosc module: the
//! oscillator primitive a voice drives, the dual sub-oscillator unison
//! voice, and the banded quantizers that turn control voltages into
//! musical intervals.
//!
//! # Core Components
//!
//! ## Oscillators
//!
//! - [`ShapeOscillator`] - Primitive interface (frequency, pulse width,
//!   waveshape, sync frequency, hard sync, render)
//! - [`VariableShapeOscillator`] - Slope/PolyBLEP pulse oscillator with
//!   master/slave hard sync
//!
//! ```rust
//! use twinosc_synth::{ShapeOscillator, VariableShapeOscillator};
//!
//! let mut osc = VariableShapeOscillator::new(48000.0);
//! osc.set_frequency(220.0);
//! osc.set_waveshape(1.0);
//!
//! let sample = osc.advance();
//! ```
//!
//! ## Voice
//!
//! - [`Voice`] - Two sub-oscillators driven by pitch, timbre, sync and unison
//! - [`SubOscillatorParams`] - Parameters last pushed to one sub-oscillator
//!
//! ## Tuning Quantizers
//!
//! - [`unison_detune`] - Unison control to detune interval (or off)
//! - [`relative_tuning`] - Bipolar control to fine / fifth / octave interval
//!
//! ```rust
//! use twinosc_synth::{relative_tuning, unison_detune};
//!
//! assert_eq!(unison_detune(0.55), Some(3.0));
//! assert_eq!(relative_tuning(-0.9), -12.0);
//! ```
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! twinosc-synth = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod oscillator;
pub mod tuning;
pub mod voice;

// Re-export main types at crate root
pub use oscillator::{ShapeOscillator, VariableShapeOscillator};
pub use tuning::{relative_tuning, unison_detune};
pub use voice::{DEFAULT_MIX_GAIN, SUB_OSC_COUNT, SYNC_RANGE, SubOscillatorParams, Voice};

// Re-export commonly used items from twinosc-core
pub use twinosc_core::{GlideFilter, note_to_freq};
