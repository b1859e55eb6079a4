//! Band-limited saw/pulse oscillator over a batch of voice lanes.
//!
//! Each tick the oscillator:
//!
//! 1. advances every lane's phase by `frequency · dt`
//! 2. locates the pulse-width edge and the saw reset crossed during the tick
//! 3. inserts each crossing of an active lane into that waveform's corrector
//!    at its sub-sample offset
//! 4. evaluates the naive waveforms at the new phase
//! 5. adds one sample of corrector output to each
//!
//! The pulse and the saw each own a corrector, so their corrections never mix.

use std::sync::Arc;

use polyvco_core::{
    DEFAULT_LANES, DiscontinuityCorrector, LaneMask, MAX_LANES, MinBlepGenerator, MinBlepKernel,
    one_hot,
};

use crate::phase::PhaseIntegrator;
use crate::waveform::{Edge, SawShape, clamp_pulse_width, square};

/// Polyphonic, anti-aliased saw and pulse oscillator for `L` voice lanes.
///
/// Lanes beyond [`active_lanes`](Self::active_lanes) keep running the same
/// arithmetic, but never report discontinuities, so their output is naive and
/// should be ignored.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use polyvco_core::MinBlepKernel;
/// use polyvco_synth::{SawShape, VoltageControlledOscillator};
///
/// let kernel = Arc::new(MinBlepKernel::standard()?);
/// let mut vco: VoltageControlledOscillator<4> = VoltageControlledOscillator::new(kernel);
/// vco.set_frequency([261.6, 329.6, 392.0, 0.0]);
/// vco.set_saw_shape(SawShape::Linear);
/// vco.set_active_lanes(3);
///
/// for _ in 0..256 {
///     vco.process(1.0 / 48000.0);
/// }
/// let saw = vco.saw();
/// assert!(saw[..3].iter().all(|s| s.abs() < 1.5));
/// # Ok::<(), polyvco_core::KernelError>(())
/// ```
#[derive(Debug, Clone)]
pub struct VoltageControlledOscillator<const L: usize, C = MinBlepGenerator<L>> {
    integrator: PhaseIntegrator<L>,
    frequency: [f32; L],
    pulse_width: [f32; L],
    saw_shape: SawShape,
    active: LaneMask,
    square_corrector: C,
    saw_corrector: C,
    square: [f32; L],
    saw: [f32; L],
}

/// Four-lane oscillator with minBLEP correction.
pub type Vco4 = VoltageControlledOscillator<DEFAULT_LANES>;

impl<const L: usize> VoltageControlledOscillator<L> {
    /// Creates an oscillator whose correctors share `kernel`.
    pub fn new(kernel: Arc<MinBlepKernel>) -> Self {
        Self::with_correctors(
            MinBlepGenerator::new(Arc::clone(&kernel)),
            MinBlepGenerator::new(kernel),
        )
    }
}

impl<const L: usize, C: DiscontinuityCorrector<L>> VoltageControlledOscillator<L, C> {
    /// Creates an oscillator with caller-supplied correctors for the pulse and
    /// the saw.
    ///
    /// All lanes start active at 0 Hz, phase 0, pulse width 0.5, analog saw.
    pub fn with_correctors(square_corrector: C, saw_corrector: C) -> Self {
        Self {
            integrator: PhaseIntegrator::new(),
            frequency: [0.0; L],
            pulse_width: [0.5; L],
            saw_shape: SawShape::default(),
            active: LaneMask::first(L.min(MAX_LANES)),
            square_corrector,
            saw_corrector,
            square: [0.0; L],
            saw: [0.0; L],
        }
    }

    /// Sets the per-lane frequency in Hz. Negative and NaN values stall the lane.
    pub fn set_frequency(&mut self, frequency: [f32; L]) {
        for (f, v) in self.frequency.iter_mut().zip(frequency) {
            *f = if v.is_nan() { 0.0 } else { v.max(0.0) };
        }
    }

    /// Per-lane frequency in Hz.
    pub fn frequency(&self) -> [f32; L] {
        self.frequency
    }

    /// Sets the per-lane pulse width, clamped to `[0.01, 0.99]`.
    pub fn set_pulse_width(&mut self, pulse_width: [f32; L]) {
        for (pw, v) in self.pulse_width.iter_mut().zip(pulse_width) {
            *pw = clamp_pulse_width(v);
        }
    }

    /// Per-lane pulse width.
    pub fn pulse_width(&self) -> [f32; L] {
        self.pulse_width
    }

    /// Selects the saw ramp shape for every lane.
    pub fn set_saw_shape(&mut self, shape: SawShape) {
        self.saw_shape = shape;
    }

    /// Current saw ramp shape.
    pub fn saw_shape(&self) -> SawShape {
        self.saw_shape
    }

    /// Enables the lowest `count` lanes, clamped to `1..=L`.
    pub fn set_active_lanes(&mut self, count: usize) {
        let count = count.clamp(1, L.clamp(1, MAX_LANES));
        self.active = LaneMask::first(count);
    }

    /// Number of lanes that report discontinuities.
    pub fn active_lanes(&self) -> usize {
        self.active.count()
    }

    /// Per-lane phase in `[0, 1)`.
    pub fn phase(&self) -> [f32; L] {
        self.integrator.phase()
    }

    /// Pulse output of the last tick, nominally `±1`.
    pub fn square(&self) -> [f32; L] {
        self.square
    }

    /// Saw output of the last tick, nominally in `[-1, 1]`.
    pub fn saw(&self) -> [f32; L] {
        self.saw
    }

    /// Corrector applied to the pulse.
    pub fn square_corrector(&self) -> &C {
        &self.square_corrector
    }

    /// Corrector applied to the saw.
    pub fn saw_corrector(&self) -> &C {
        &self.saw_corrector
    }

    /// Returns phases to 0, clears pending corrections and outputs.
    ///
    /// Frequency, pulse width, saw shape and active lanes are kept.
    pub fn reset(&mut self) {
        self.integrator.reset();
        self.square_corrector.reset();
        self.saw_corrector.reset();
        self.square = [0.0; L];
        self.saw = [0.0; L];
    }

    /// Advances one sample of `dt` seconds and updates [`saw`](Self::saw)
    /// and [`square`](Self::square).
    #[inline]
    pub fn process(&mut self, dt: f32) {
        let step = self.integrator.advance(dt, &self.frequency);

        for edge in Edge::ALL {
            let mut crossed = LaneMask::NONE;
            let mut offsets = [0.0; L];
            for lane in 0..L {
                if let Some(offset) = step.crossing(lane, edge.threshold(self.pulse_width[lane])) {
                    crossed.insert(lane);
                    offsets[lane] = offset;
                }
            }

            let crossed = crossed.intersection(self.active);
            if crossed.is_empty() {
                continue;
            }
            let corrector = if edge.is_pulse() {
                &mut self.square_corrector
            } else {
                &mut self.saw_corrector
            };
            for lane in crossed.iter() {
                corrector.insert_discontinuity(offsets[lane], one_hot(lane, edge.jump()));
            }
        }

        let square_correction = self.square_corrector.process();
        let saw_correction = self.saw_corrector.process();

        for lane in 0..L {
            let phase = step.phase[lane];
            self.square[lane] = square(phase, self.pulse_width[lane]) + square_correction[lane];
            self.saw[lane] = self.saw_shape.evaluate(phase) + saw_correction[lane];
        }
    }
}
