//! Minimum-phase band-limited step (minBLEP) correction.
//!
//! A naive digital sawtooth or pulse jumps between two levels inside a
//! single sample, which is equivalent to sampling an infinitely steep edge.
//! Everything above Nyquist folds back as aliasing. The minBLEP method
//! replaces each ideal edge with a band-limited step: at every discontinuity
//! the difference between the band-limited step and the ideal step is
//! added to the output over the next few samples.
//!
//! ## Kernel construction
//!
//! [`MinBlepKernel`] builds the step table once:
//!
//! 1. Symmetric sinc with `Z` zero crossings per side, sampled `O` times per
//!    sample period (`n = 2·Z·O` points)
//! 2. Blackman-Harris window
//! 3. Real cepstrum (`FFT → ln|X| → IFFT`) and folding of the anti-causal
//!    half onto the causal half, which keeps the magnitude response and
//!    makes the phase minimal
//! 4. `FFT → exp → IFFT` back to a minimum-phase impulse
//! 5. Running sum to turn the impulse into a step, normalised to end at 1.0
//!
//! A minimum-phase step concentrates its energy right after the edge, so the
//! correction needs no look-ahead: it starts at the current sample and lasts
//! `2·Z` samples.
//!
//! Reference: Brandt, "Hard Sync Without Aliasing", ICMC 2001.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use polyvco_core::{DiscontinuityCorrector, MinBlepGenerator, MinBlepKernel};
//!
//! let kernel = Arc::new(MinBlepKernel::new(16, 16).unwrap());
//! let mut blep: MinBlepGenerator<4> = MinBlepGenerator::new(kernel);
//!
//! // A falling edge of height 2 in lane 0, 0.3 samples before "now"
//! blep.insert_discontinuity(-0.3, [-2.0, 0.0, 0.0, 0.0]);
//! let correction = blep.process();
//! assert!(correction[0] > 0.0);
//! assert_eq!(correction[1], 0.0);
//! ```

use std::sync::Arc;

use libm::{cos, exp, log, sin};
use rustfft::FftPlanner;
use rustfft::num_complex::Complex;
use thiserror::Error;

use crate::corrector::DiscontinuityCorrector;

/// Default zero crossings per side of the sinc.
pub const DEFAULT_ZERO_CROSSINGS: usize = 16;

/// Default table oversampling factor.
pub const DEFAULT_OVERSAMPLE: usize = 16;

/// Upper bound on zero crossings per side.
pub const MAX_ZERO_CROSSINGS: usize = 64;

/// Upper bound on the table oversampling factor.
pub const MAX_OVERSAMPLE: usize = 64;

/// Errors raised while building a [`MinBlepKernel`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KernelError {
    /// Zero-crossing count outside `1..=MAX_ZERO_CROSSINGS`.
    #[error("zero crossings must be in 1..={max}, got {got}")]
    ZeroCrossings {
        /// Requested value.
        got: usize,
        /// Largest accepted value.
        max: usize,
    },

    /// Oversampling factor outside `1..=MAX_OVERSAMPLE`.
    #[error("oversample factor must be in 1..={max}, got {got}")]
    Oversample {
        /// Requested value.
        got: usize,
        /// Largest accepted value.
        max: usize,
    },

    /// `2·Z·O` is not a power of two.
    #[error("table size 2 x {zero_crossings} x {oversample} is not a power of two")]
    TableSize {
        /// Requested zero crossings.
        zero_crossings: usize,
        /// Requested oversampling factor.
        oversample: usize,
    },

    /// The reconstructed impulse did not integrate to a usable step.
    #[error("minimum-phase reconstruction produced a degenerate step (integral {0})")]
    Degenerate(f64),
}

/// Precomputed minimum-phase band-limited step table.
///
/// Immutable once built; share it between generators with [`Arc`].
#[derive(Debug, Clone)]
pub struct MinBlepKernel {
    zero_crossings: usize,
    oversample: usize,
    /// `2·Z·O` step samples followed by a 1.0 guard sample.
    step: Vec<f32>,
}

impl MinBlepKernel {
    /// Builds a kernel with `zero_crossings` sinc lobes per side, tabulated at
    /// `oversample` points per sample.
    ///
    /// # Errors
    ///
    /// Returns [`KernelError`] when either factor is out of range, the table
    /// size `2·Z·O` is not a power of two, or the reconstruction is
    /// numerically degenerate.
    pub fn new(zero_crossings: usize, oversample: usize) -> Result<Self, KernelError> {
        Self::check_geometry(zero_crossings, oversample)?;

        let n = 2 * zero_crossings * oversample;
        let impulse = min_phase_impulse(zero_crossings, n);

        let mut step = Vec::with_capacity(n + 1);
        let mut total = 0.0f64;
        for &sample in &impulse {
            total += sample;
            step.push(total);
        }
        if !total.is_finite() || total.abs() < 1e-12 {
            return Err(KernelError::Degenerate(total));
        }

        let norm = 1.0 / total;
        let mut step: Vec<f32> = step.into_iter().map(|s| (s * norm) as f32).collect();
        step.push(1.0);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            zero_crossings,
            oversample,
            taps = n,
            "minblep_kernel: built step table"
        );

        Ok(Self {
            zero_crossings,
            oversample,
            step,
        })
    }

    /// Checks kernel geometry without building the table.
    ///
    /// ```rust
    /// use polyvco_core::MinBlepKernel;
    ///
    /// assert!(MinBlepKernel::check_geometry(16, 16).is_ok());
    /// assert!(MinBlepKernel::check_geometry(12, 16).is_err());
    /// ```
    pub fn check_geometry(zero_crossings: usize, oversample: usize) -> Result<(), KernelError> {
        if zero_crossings == 0 || zero_crossings > MAX_ZERO_CROSSINGS {
            return Err(KernelError::ZeroCrossings {
                got: zero_crossings,
                max: MAX_ZERO_CROSSINGS,
            });
        }
        if oversample == 0 || oversample > MAX_OVERSAMPLE {
            return Err(KernelError::Oversample {
                got: oversample,
                max: MAX_OVERSAMPLE,
            });
        }
        if !(2 * zero_crossings * oversample).is_power_of_two() {
            return Err(KernelError::TableSize {
                zero_crossings,
                oversample,
            });
        }
        Ok(())
    }

    /// Kernel built with [`DEFAULT_ZERO_CROSSINGS`] and [`DEFAULT_OVERSAMPLE`].
    pub fn standard() -> Result<Self, KernelError> {
        Self::new(DEFAULT_ZERO_CROSSINGS, DEFAULT_OVERSAMPLE)
    }

    /// Zero crossings per side.
    pub fn zero_crossings(&self) -> usize {
        self.zero_crossings
    }

    /// Table points per sample period.
    pub fn oversample(&self) -> usize {
        self.oversample
    }

    /// Number of samples a single correction lasts (`2·Z`).
    pub fn support(&self) -> usize {
        2 * self.zero_crossings
    }

    /// The step table, including the trailing guard sample.
    pub fn step(&self) -> &[f32] {
        &self.step
    }

    /// Samples from an ideal edge until the band-limited step reaches half
    /// height, i.e. how late a corrected edge crosses zero.
    pub fn half_rise_delay(&self) -> f32 {
        let oversample = self.oversample as f32;
        if self.step[0] >= 0.5 {
            return 0.0;
        }
        for (i, pair) in self.step.windows(2).enumerate() {
            if pair[1] >= 0.5 {
                let frac = (0.5 - pair[0]) / (pair[1] - pair[0]);
                return (i as f32 + frac) / oversample;
            }
        }
        self.support() as f32
    }

    /// Step value at a fractional table index, linearly interpolated.
    ///
    /// Indices past the end read as 1.0 (the settled step).
    #[inline]
    pub fn step_at(&self, index: f32) -> f32 {
        if index <= 0.0 {
            return self.step[0];
        }
        let i = index as usize;
        let frac = index - i as f32;
        match (self.step.get(i), self.step.get(i + 1)) {
            (Some(&a), Some(&b)) => a + (b - a) * frac,
            (Some(&a), None) => a,
            _ => 1.0,
        }
    }
}

/// Normalised sinc, `sin(πx)/(πx)`.
fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        return 1.0;
    }
    let px = core::f64::consts::PI * x;
    sin(px) / px
}

/// Four-term Blackman-Harris window at normalised position `p ∈ [0, 1]`.
fn blackman_harris(p: f64) -> f64 {
    const A0: f64 = 0.35875;
    const A1: f64 = 0.48829;
    const A2: f64 = 0.14128;
    const A3: f64 = 0.01168;
    let w = 2.0 * core::f64::consts::PI * p;
    A0 - A1 * cos(w) + A2 * cos(2.0 * w) - A3 * cos(3.0 * w)
}

/// Minimum-phase version of a windowed sinc with `z` zero crossings per side
/// over `n` points, via the real cepstrum.
fn min_phase_impulse(z: usize, n: usize) -> Vec<f64> {
    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(n);
    let ifft = planner.plan_fft_inverse(n);
    let scale = 1.0 / n as f64;
    let last = (n - 1).max(1) as f64;

    let mut x: Vec<Complex<f64>> = (0..n)
        .map(|i| {
            let p = i as f64 / last;
            let t = -(z as f64) + 2.0 * z as f64 * p;
            Complex::new(sinc(t) * blackman_harris(p), 0.0)
        })
        .collect();

    // Real cepstrum; the epsilon keeps ln() away from spectral zeros
    fft.process(&mut x);
    for c in &mut x {
        *c = Complex::new(log(c.norm() + 1e-50), 0.0);
    }
    ifft.process(&mut x);
    for c in &mut x {
        *c *= scale;
    }

    // Fold anti-causal quefrencies onto the causal side
    for c in x.iter_mut().take(n / 2).skip(1) {
        *c *= 2.0;
    }
    for c in x.iter_mut().skip(n / 2 + 1) {
        *c = Complex::new(0.0, 0.0);
    }

    fft.process(&mut x);
    for c in &mut x {
        let magnitude = exp(c.re);
        *c = Complex::new(magnitude * cos(c.im), magnitude * sin(c.im));
    }
    ifft.process(&mut x);

    x.into_iter().map(|c| c.re * scale).collect()
}

/// Per-lane minBLEP correction generator for a batch of `L` voices.
///
/// Holds a ring buffer of `2·Z` frames. Each inserted discontinuity adds
/// `jump · (step − 1)` to the frames it overlaps; [`process`] pops one frame
/// per sample. The buffer is sized at construction and never reallocates.
///
/// [`process`]: DiscontinuityCorrector::process
#[derive(Debug, Clone)]
pub struct MinBlepGenerator<const L: usize> {
    kernel: Arc<MinBlepKernel>,
    buffer: Vec<[f32; L]>,
    pos: usize,
}

impl<const L: usize> MinBlepGenerator<L> {
    /// Creates a silent generator over a shared kernel.
    pub fn new(kernel: Arc<MinBlepKernel>) -> Self {
        let buffer = vec![[0.0; L]; kernel.support()];
        Self {
            kernel,
            buffer,
            pos: 0,
        }
    }

    /// The kernel this generator reads from.
    pub fn kernel(&self) -> &Arc<MinBlepKernel> {
        &self.kernel
    }

    /// Returns `true` if no correction is pending in any lane.
    pub fn is_idle(&self) -> bool {
        self.buffer.iter().flatten().all(|&v| v == 0.0)
    }
}

impl<const L: usize> DiscontinuityCorrector<L> for MinBlepGenerator<L> {
    fn insert_discontinuity(&mut self, offset: f32, jump: [f32; L]) {
        let in_range = offset > -1.0 && offset <= 0.0;
        if !in_range {
            return;
        }

        let len = self.buffer.len();
        let oversample = self.kernel.oversample as f32;
        for j in 0..len {
            let residual = self.kernel.step_at((j as f32 - offset) * oversample) - 1.0;
            let frame = &mut self.buffer[(self.pos + j) % len];
            for (acc, &x) in frame.iter_mut().zip(jump.iter()) {
                *acc += x * residual;
            }
        }
    }

    #[inline]
    fn process(&mut self) -> [f32; L] {
        let out = core::mem::replace(&mut self.buffer[self.pos], [0.0; L]);
        self.pos += 1;
        if self.pos == self.buffer.len() {
            self.pos = 0;
        }
        out
    }

    fn reset(&mut self) {
        for frame in &mut self.buffer {
            *frame = [0.0; L];
        }
        self.pos = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kernel() -> Arc<MinBlepKernel> {
        Arc::new(MinBlepKernel::standard().unwrap())
    }

    #[test]
    fn rejects_bad_geometry() {
        assert_eq!(
            MinBlepKernel::new(0, 16).unwrap_err(),
            KernelError::ZeroCrossings {
                got: 0,
                max: MAX_ZERO_CROSSINGS
            }
        );
        assert!(matches!(
            MinBlepKernel::new(16, 0),
            Err(KernelError::Oversample { got: 0, .. })
        ));
        assert!(MinBlepKernel::new(MAX_ZERO_CROSSINGS + 1, 4).is_err());
        assert_eq!(
            MinBlepKernel::new(12, 16).unwrap_err(),
            KernelError::TableSize {
                zero_crossings: 12,
                oversample: 16
            }
        );
    }

    #[test]
    fn step_rises_from_zero_to_one() {
        let k = kernel();
        let step = k.step();
        assert_eq!(step.len(), 2 * 16 * 16 + 1);
        assert!(step[0].abs() < 0.05, "step starts at {}", step[0]);
        assert!((step[step.len() - 2] - 1.0).abs() < 1e-5);
        assert_eq!(step[step.len() - 1], 1.0);
        assert!(step.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn step_settles_in_second_half() {
        let k = kernel();
        let half = k.step().len() / 2;
        for (i, &s) in k.step().iter().enumerate().skip(half) {
            assert!((s - 1.0).abs() < 0.05, "step[{i}] = {s}");
        }
    }

    #[test]
    fn half_rise_delay_is_a_few_samples() {
        let delay = kernel().half_rise_delay();
        assert!((2.0..4.0).contains(&delay), "delay = {delay}");
    }

    #[test]
    fn step_at_interpolates_and_saturates() {
        let k = kernel();
        let a = k.step()[10];
        let b = k.step()[11];
        assert!((k.step_at(10.5) - (a + b) * 0.5).abs() < 1e-6);
        assert_eq!(k.step_at(1e9), 1.0);
        assert_eq!(k.step_at(-3.0), k.step()[0]);
    }

    #[test]
    fn correction_drains_after_support() {
        let k = kernel();
        let support = k.support();
        let mut blep: MinBlepGenerator<4> = MinBlepGenerator::new(k);
        blep.insert_discontinuity(-0.5, [-2.0, 0.0, 2.0, 0.0]);
        assert!(!blep.is_idle());

        let first = blep.process();
        assert!(first[0] > 1.0, "falling edge starts near +2: {}", first[0]);
        assert!(first[2] < -1.0, "rising edge starts near -2: {}", first[2]);
        assert_eq!(first[1], 0.0);
        assert_eq!(first[3], 0.0);

        for _ in 1..support {
            blep.process();
        }
        assert!(blep.is_idle());
        assert_eq!(blep.process(), [0.0; 4]);
    }

    #[test]
    fn insertions_superpose() {
        let k = kernel();
        let mut a: MinBlepGenerator<2> = MinBlepGenerator::new(Arc::clone(&k));
        let mut b: MinBlepGenerator<2> = MinBlepGenerator::new(Arc::clone(&k));
        let mut both: MinBlepGenerator<2> = MinBlepGenerator::new(k);

        a.insert_discontinuity(-0.2, [-2.0, 1.0]);
        b.insert_discontinuity(-0.7, [2.0, -0.5]);
        both.insert_discontinuity(-0.2, [-2.0, 1.0]);
        both.insert_discontinuity(-0.7, [2.0, -0.5]);

        for _ in 0..40 {
            let x = a.process();
            let y = b.process();
            let z = both.process();
            for lane in 0..2 {
                assert!((x[lane] + y[lane] - z[lane]).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn out_of_range_offsets_are_ignored() {
        let mut blep: MinBlepGenerator<1> = MinBlepGenerator::new(kernel());
        blep.insert_discontinuity(-1.0, [-2.0]);
        blep.insert_discontinuity(0.25, [-2.0]);
        blep.insert_discontinuity(f32::NAN, [-2.0]);
        assert!(blep.is_idle());
    }

    #[test]
    fn reset_clears_pending_corrections() {
        let mut blep: MinBlepGenerator<1> = MinBlepGenerator::new(kernel());
        blep.insert_discontinuity(0.0, [-2.0]);
        blep.process();
        blep.reset();
        assert!(blep.is_idle());
        assert_eq!(blep.process(), [0.0]);
    }
}
