//! Twinosc Core - pitch math and glide smoothing
//!
//! This crate provides the control-rate building blocks shared by the
//! twinosc oscillator module, designed for per-sample use inside a real-time
//! audio callback with zero allocation.
//!
//! # Core Abstractions
//!
//! ## Glide
//!
//! - [`GlideFilter`] - Linear slew from the last pitch to a new target, with a
//!   time constant that may change every sample
//!
//! ## Pitch and Control Math
//!
//! - [`note_to_freq`] - Equal-tempered pitch conversion
//! - [`map_range`] - Map a normalized control onto a parameter range
//! - [`dead_zone`] / [`dead_zone_below`] - Suppress control jitter around zero
//! - [`clamp`] - Value limiting
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible for embedded audio applications.
//! Disable the default `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! twinosc-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use twinosc_core::{GlideFilter, note_to_freq};
//!
//! let mut glide = GlideFilter::new(60.0);
//! glide.set_target(12.0);
//! glide.set_time_constant(480.0);
//!
//! let pitch = glide.advance();
//! assert!(pitch > 0.0 && pitch < 12.0);
//! let freq = note_to_freq(36.0 + pitch);
//! assert!(freq > 65.0);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod glide;
pub mod math;

pub use glide::{DEFAULT_GLIDE_RANGE, GlideFilter};
pub use math::{clamp, dead_zone, dead_zone_below, map_range, note_to_freq};
