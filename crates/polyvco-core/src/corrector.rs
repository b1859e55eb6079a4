//! The seam between discontinuity detection and band-limiting.
//!
//! An oscillator that produces a naive (aliased) waveform knows exactly when
//! and by how much its ideal continuous-time waveform jumps. A
//! [`DiscontinuityCorrector`] turns those events into a per-sample correction
//! signal that, added to the naive waveform, approximates the band-limited
//! version.
//!
//! The contract is deliberately small so the oscillator never depends on the
//! kernel mechanics:
//!
//! 1. Any number of [`insert_discontinuity`](DiscontinuityCorrector::insert_discontinuity)
//!    calls for the current tick. Contributions superpose linearly.
//! 2. Exactly one [`process`](DiscontinuityCorrector::process) call per tick,
//!    after the insertions, even on ticks without events.
//!
//! Output depends only on that call history.

/// Per-lane discontinuity corrector for a batch of `L` voices.
pub trait DiscontinuityCorrector<const L: usize> {
    /// Registers a jump of height `jump[lane]` at `offset` samples relative
    /// to the current sample, `offset ∈ (-1, 0]`.
    ///
    /// Lanes without a discontinuity carry `0.0`. Offsets outside the
    /// interval are ignored.
    fn insert_discontinuity(&mut self, offset: f32, jump: [f32; L]);

    /// Returns the correction for the current sample and advances by one sample.
    fn process(&mut self) -> [f32; L];

    /// Discards all pending corrections.
    fn reset(&mut self);
}
