//! Pitch and phase math for voltage-controlled oscillators.
//!
//! Pitch follows the 1 V/octave convention: 0 V is middle C
//! ([`FREQ_C4`]) and every volt doubles the frequency.
//!
//! - [`wrap_phase`] - Fold a phase value back into `[0, 1)`
//! - [`volts_to_hz`] - Exponential pitch conversion
//! - [`clamp_to_nyquist`] - Keep a frequency between DC and half the sample rate
//! - [`semitones_to_volts`] - Convert a semitone offset to pitch volts

use libm::{exp2f, floorf};

/// Frequency of middle C (C4) in Hz; the 0 V reference.
pub const FREQ_C4: f32 = 261.625_58;

/// Frequency ratio of one equal-tempered semitone, `2^(1/12)`.
pub const FREQ_SEMITONE: f32 = 1.059_463_1;

/// Wraps a phase value into `[0, 1)` by subtracting its integer part.
///
/// Rounding can make `x - floor(x)` land exactly on 1.0 for tiny negative
/// inputs; that case folds to 0.0 so the result never leaves the interval.
///
/// # Example
/// ```rust
/// use polyvco_core::wrap_phase;
///
/// assert_eq!(wrap_phase(1.25), 0.25);
/// assert_eq!(wrap_phase(-0.25), 0.75);
/// assert!(wrap_phase(-1e-9) < 1.0);
/// ```
#[inline]
pub fn wrap_phase(x: f32) -> f32 {
    let wrapped = x - floorf(x);
    if wrapped >= 1.0 { 0.0 } else { wrapped }
}

/// Converts pitch in volts (1 V/oct, 0 V = C4) to frequency in Hz.
///
/// # Example
/// ```rust
/// use polyvco_core::{FREQ_C4, volts_to_hz};
///
/// assert!((volts_to_hz(0.0) - FREQ_C4).abs() < 1e-3);
/// assert!((volts_to_hz(1.0) - 2.0 * FREQ_C4).abs() < 1e-2);
/// ```
#[inline]
pub fn volts_to_hz(volts: f32) -> f32 {
    FREQ_C4 * exp2f(volts)
}

/// Converts a semitone offset to pitch volts.
#[inline]
pub fn semitones_to_volts(semitones: f32) -> f32 {
    semitones / 12.0
}

/// Clamps a frequency to `[0, sample_rate / 2]`.
///
/// NaN collapses to 0 Hz so a corrupt control signal stalls the oscillator
/// instead of poisoning its phase.
#[inline]
pub fn clamp_to_nyquist(freq: f32, sample_rate: f32) -> f32 {
    let nyquist = (sample_rate * 0.5).max(0.0);
    if freq.is_nan() {
        return 0.0;
    }
    freq.clamp(0.0, nyquist)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_phase_stays_in_unit_interval() {
        for &x in &[0.0, 0.5, 0.999_999_9, 1.0, 1.35, -0.1, -3.7, 12.25] {
            let w = wrap_phase(x);
            assert!((0.0..1.0).contains(&w), "wrap_phase({x}) = {w}");
        }
    }

    #[test]
    fn octave_doubles_frequency() {
        let f0 = volts_to_hz(-1.0);
        let f1 = volts_to_hz(0.0);
        let f2 = volts_to_hz(1.0);
        assert!((f1 / f0 - 2.0).abs() < 1e-4);
        assert!((f2 / f1 - 2.0).abs() < 1e-4);
    }

    #[test]
    fn semitone_ratio_matches_constant() {
        let ratio = volts_to_hz(semitones_to_volts(1.0)) / FREQ_C4;
        assert!((ratio - FREQ_SEMITONE).abs() < 1e-5);
    }

    #[test]
    fn nyquist_clamp() {
        assert_eq!(clamp_to_nyquist(30000.0, 44100.0), 22050.0);
        assert_eq!(clamp_to_nyquist(-5.0, 44100.0), 0.0);
        assert_eq!(clamp_to_nyquist(f32::NAN, 44100.0), 0.0);
        assert_eq!(clamp_to_nyquist(440.0, 44100.0), 440.0);
    }
}
