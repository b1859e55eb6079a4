//! Naive (aliased) waveform evaluators and the edges they produce.
//!
//! These are pure functions of phase. The oscillator adds the band-limiting
//! correction on top; everything here is the ideal continuous-time shape
//! sampled directly.
//!
//! | Waveform | Edge | Threshold | Jump |
//! |----------|------|-----------|------|
//! | Pulse | falling | `pulse_width` | −2 |
//! | Saw | reset | `0.5` | −2 |
//!
//! The pulse's rising edge at the phase wrap is left uncorrected.

use polyvco_core::wrap_phase;

/// Narrowest pulse width; keeps both pulse halves representable by the corrector.
pub const PULSE_WIDTH_MIN: f32 = 0.01;

/// Widest pulse width.
pub const PULSE_WIDTH_MAX: f32 = 1.0 - PULSE_WIDTH_MIN;

/// Ramp shape of the sawtooth.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SawShape {
    /// Ideal linear ramp, `2x − 1`.
    Linear,
    /// Exponential-discharge ramp of an analog core, `−shape(x)`.
    #[default]
    Analog,
}

impl SawShape {
    /// Evaluates the saw at oscillator `phase`.
    ///
    /// The ramp is offset by half a cycle so the reset edge sits at phase 0.5.
    #[inline]
    pub fn evaluate(self, phase: f32) -> f32 {
        let x = wrap_phase(phase + 0.5);
        match self {
            SawShape::Linear => 2.0 * x - 1.0,
            SawShape::Analog => -exp_curve(x),
        }
    }
}

/// Rational approximation of an exponential capacitor discharge,
/// normalised to `shape(0) = 1`, `shape(1) = −1`.
///
/// ```rust
/// use polyvco_synth::exp_curve;
///
/// assert_eq!(exp_curve(0.0), 1.0);
/// assert_eq!(exp_curve(1.0), -1.0);
/// ```
#[inline]
pub fn exp_curve(x: f32) -> f32 {
    (3.0 + x * (-13.0 + 5.0 * x)) / (3.0 + 2.0 * x)
}

/// Two-level pulse: `+1` while `phase < pulse_width`, `−1` after.
#[inline]
pub fn square(phase: f32, pulse_width: f32) -> f32 {
    if phase < pulse_width { 1.0 } else { -1.0 }
}

/// Clamps a pulse width into `[PULSE_WIDTH_MIN, PULSE_WIDTH_MAX]`; NaN maps to 0.5.
#[inline]
pub fn clamp_pulse_width(pulse_width: f32) -> f32 {
    if pulse_width.is_nan() {
        return 0.5;
    }
    pulse_width.clamp(PULSE_WIDTH_MIN, PULSE_WIDTH_MAX)
}

/// A waveform discontinuity the oscillator reports to its correctors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Edge {
    /// Pulse drops from +1 to −1 at the pulse width.
    PulseFall,
    /// Saw resets from +1 to −1 at phase 0.5.
    SawReset,
}

impl Edge {
    /// All edges, in detection order.
    pub const ALL: [Edge; 2] = [Edge::PulseFall, Edge::SawReset];

    /// Phase at which the edge occurs.
    #[inline]
    pub fn threshold(self, pulse_width: f32) -> f32 {
        match self {
            Edge::PulseFall => pulse_width,
            Edge::SawReset => 0.5,
        }
    }

    /// Signed height of the ideal jump.
    #[inline]
    pub const fn jump(self) -> f32 {
        match self {
            Edge::PulseFall | Edge::SawReset => -2.0,
        }
    }

    /// Returns `true` for the pulse edge.
    #[inline]
    pub const fn is_pulse(self) -> bool {
        matches!(self, Edge::PulseFall)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_is_two_level() {
        for i in 0..1000 {
            let phase = i as f32 / 1000.0;
            let v = square(phase, 0.3);
            assert!(v == 1.0 || v == -1.0);
            assert_eq!(v > 0.0, phase < 0.3);
        }
    }

    #[test]
    fn linear_saw_range() {
        for i in 0..1000 {
            let phase = i as f32 / 1000.0;
            let v = SawShape::Linear.evaluate(phase);
            assert!((-1.0..1.0).contains(&v), "saw({phase}) = {v}");
        }
    }

    #[test]
    fn saw_resets_at_half_cycle() {
        for shape in [SawShape::Linear, SawShape::Analog] {
            let before = shape.evaluate(0.4999);
            let after = shape.evaluate(0.5);
            assert!(before > 0.99, "{shape:?} before reset: {before}");
            assert_eq!(after, -1.0, "{shape:?} after reset");
        }
    }

    #[test]
    fn analog_curve_is_monotonic() {
        let mut prev = SawShape::Analog.evaluate(0.5);
        for i in 1..1000 {
            let phase = 0.5 + i as f32 / 1000.0;
            let v = SawShape::Analog.evaluate(phase);
            assert!(v > prev, "analog saw not rising at {phase}");
            prev = v;
        }
    }

    #[test]
    fn analog_curve_bows_above_linear() {
        // Halfway up the ramp the discharge curve has already passed zero
        let mid = SawShape::Analog.evaluate(0.0);
        assert!((mid - 0.5625).abs() < 1e-6, "mid-ramp = {mid}");
        assert!(mid > SawShape::Linear.evaluate(0.0));
    }

    #[test]
    fn pulse_width_clamp() {
        assert_eq!(clamp_pulse_width(0.0), PULSE_WIDTH_MIN);
        assert_eq!(clamp_pulse_width(1.0), PULSE_WIDTH_MAX);
        assert_eq!(clamp_pulse_width(0.25), 0.25);
        assert_eq!(clamp_pulse_width(f32::NAN), 0.5);
    }

    #[test]
    fn one_falling_edge_per_waveform() {
        assert_eq!(Edge::ALL.iter().filter(|e| e.is_pulse()).count(), 1);
        assert!(Edge::ALL.iter().all(|e| e.jump() == -2.0));
        assert_eq!(Edge::PulseFall.threshold(0.3), 0.3);
        assert_eq!(Edge::SawReset.threshold(0.3), 0.5);
    }
}
