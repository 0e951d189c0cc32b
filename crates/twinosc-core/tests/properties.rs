//! Property-based tests for twinosc-core.
//!
//! Tests glide monotonicity and convergence, and pitch conversion
//! ordering, using proptest for randomized input generation.

use proptest::prelude::*;
use twinosc_core::{GlideFilter, dead_zone, note_to_freq};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// For any start, target and nonzero time constant, repeated advances
    /// move monotonically toward the target and arrive within
    /// `ceil(distance / step) + 1` calls.
    #[test]
    fn glide_monotonic_and_converges(
        start in 0.0f32..127.0f32,
        target in 0.0f32..127.0f32,
        samples in 1.0f32..5000.0f32,
    ) {
        let mut glide = GlideFilter::new(60.0);
        glide.set_time_constant(0.0);
        glide.set_target(start);
        glide.advance();

        glide.set_time_constant(samples);
        glide.set_target(target);

        let bound = ((target - start).abs() / glide.step()).ceil() as usize + 1;
        let rising = target >= start;
        let mut prev = glide.get();

        for _ in 0..bound {
            let v = glide.advance();
            if rising {
                prop_assert!(v >= prev && v <= target, "rising: {} -> {} (target {})", prev, v, target);
            } else {
                prop_assert!(v <= prev && v >= target, "falling: {} -> {} (target {})", prev, v, target);
            }
            prev = v;
        }

        prop_assert_eq!(glide.get(), target);
    }

    /// A zero time constant lands on any target in one advance.
    #[test]
    fn glide_zero_time_constant_is_instant(
        start in -127.0f32..127.0f32,
        target in -127.0f32..127.0f32,
    ) {
        let mut glide = GlideFilter::new(60.0);
        glide.set_time_constant(0.0);
        glide.set_target(start);
        glide.advance();
        glide.set_target(target);
        prop_assert_eq!(glide.advance(), target);
    }

    /// Higher notes always map to higher frequencies.
    #[test]
    fn note_to_freq_is_increasing(a in 0.0f32..127.0f32, delta in 0.01f32..12.0f32) {
        prop_assert!(note_to_freq(a + delta) > note_to_freq(a));
    }

    /// The dead zone either zeroes a value or leaves it untouched.
    #[test]
    fn dead_zone_is_identity_or_zero(v in -2.0f32..2.0f32, t in 0.0f32..1.0f32) {
        let out = dead_zone(v, t);
        prop_assert!(out == 0.0 || out == v);
        if v.abs() > t {
            prop_assert_eq!(out, v);
        }
    }
}
