//! Phase integration and sub-sample threshold-crossing detection.
//!
//! Each tick the integrator advances every lane by `delta = f · dt` cycles
//! and wraps the result into `[0, 1)`. The returned [`PhaseStep`] keeps the
//! phase before and after the advance so edge detection can locate the exact
//! instant a threshold was passed inside the just-elapsed sample interval.
//!
//! ## Crossing geometry
//!
//! In unwrapped coordinates the tick covers `(start, start + delta]`. A
//! waveform edge at phase `T` is crossed when either `T` or its next-cycle
//! image `T + 1` lies in that interval. The crossing fraction
//!
//! ```text
//! fraction = (T - start) / delta          ∈ (0, 1]
//! offset   = fraction - 1                 ∈ (-1, 0]
//! ```
//!
//! places the edge `-offset` samples before the current sample. The test
//! uses the same `start + delta` sum that produced the new phase, so
//! consecutive intervals tile the phase line exactly: an edge is reported
//! once, never twice, never skipped.
//!
//! `delta` is capped at [`MAX_PHASE_STEP`] cycles per sample so a single step
//! can never span more than one occurrence of any edge.

use polyvco_core::wrap_phase;

/// Largest phase increment per sample, in cycles.
pub const MAX_PHASE_STEP: f32 = 0.35;

/// Result of one [`PhaseIntegrator::advance`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseStep<const L: usize> {
    /// Phase before the advance, in `[0, 1)`.
    pub start: [f32; L],
    /// Phase increment applied this tick, in `[0, MAX_PHASE_STEP]`.
    pub delta: [f32; L],
    /// Phase after advance and wrap, in `[0, 1)`.
    pub phase: [f32; L],
}

impl<const L: usize> PhaseStep<L> {
    /// Crossing offset of `threshold` in `lane`, if crossed this tick.
    #[inline]
    pub fn crossing(&self, lane: usize, threshold: f32) -> Option<f32> {
        crossing_offset(self.start[lane], self.delta[lane], threshold)
    }
}

/// Sub-sample offset at which a phase step from `start` by `delta` crosses
/// `threshold`, or `None` if it does not.
///
/// The offset is in `(-1, 0]` samples relative to the end of the step. A zero
/// or invalid `delta` never crosses anything.
///
/// # Example
///
/// ```rust
/// use polyvco_synth::crossing_offset;
///
/// // 0.4 → 0.6 crosses 0.5 halfway through the sample
/// let offset = crossing_offset(0.4, 0.2, 0.5).unwrap();
/// assert!((offset + 0.5).abs() < 1e-6);
///
/// // 0.9 → 1.1 (wraps to 0.1) crosses the 0.0 edge at its next-cycle image
/// assert!(crossing_offset(0.9, 0.2, 0.0).is_some());
///
/// // A stalled oscillator never crosses
/// assert_eq!(crossing_offset(0.5, 0.0, 0.5), None);
/// ```
#[inline]
pub fn crossing_offset(start: f32, delta: f32, threshold: f32) -> Option<f32> {
    if delta <= 0.0 || delta.is_nan() {
        return None;
    }
    let end = start + delta;
    for edge in [threshold, threshold + 1.0] {
        if start < edge && edge <= end {
            let fraction = ((edge - start) / delta).clamp(f32::EPSILON, 1.0);
            return Some(fraction - 1.0);
        }
    }
    None
}

/// Per-lane phase accumulator.
///
/// # Example
///
/// ```rust
/// use polyvco_synth::PhaseIntegrator;
///
/// let mut phase: PhaseIntegrator<4> = PhaseIntegrator::new();
/// let step = phase.advance(1.0 / 48000.0, &[480.0, 0.0, 4800.0, 1e9]);
/// assert!((step.delta[0] - 0.01).abs() < 1e-6);
/// assert_eq!(step.delta[1], 0.0);
/// assert_eq!(step.delta[3], 0.35);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseIntegrator<const L: usize> {
    phase: [f32; L],
}

impl<const L: usize> Default for PhaseIntegrator<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const L: usize> PhaseIntegrator<L> {
    /// All lanes at phase 0.
    pub fn new() -> Self {
        Self { phase: [0.0; L] }
    }

    /// Current phase per lane.
    pub fn phase(&self) -> [f32; L] {
        self.phase
    }

    /// Sets the phase of every lane, wrapped into `[0, 1)`.
    pub fn set_phase(&mut self, phase: &[f32; L]) {
        for (p, &v) in self.phase.iter_mut().zip(phase.iter()) {
            *p = if v.is_finite() { wrap_phase(v) } else { 0.0 };
        }
    }

    /// Resets every lane to phase 0.
    pub fn reset(&mut self) {
        self.phase = [0.0; L];
    }

    /// Advances every lane by `frequency · dt` cycles.
    ///
    /// A non-positive or non-finite `dt` means no advance. Each lane's step is
    /// clamped to `[0, MAX_PHASE_STEP]`.
    #[inline]
    pub fn advance(&mut self, dt: f32, frequency: &[f32; L]) -> PhaseStep<L> {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        let start = self.phase;
        let mut delta = [0.0; L];
        for lane in 0..L {
            let d = frequency[lane] * dt;
            delta[lane] = if d.is_nan() {
                0.0
            } else {
                d.clamp(0.0, MAX_PHASE_STEP)
            };
            self.phase[lane] = wrap_phase(start[lane] + delta[lane]);
        }
        PhaseStep {
            start,
            delta,
            phase: self.phase,
        }
    }
}
