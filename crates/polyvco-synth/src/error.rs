//! Construction errors for the oscillator bank.

use polyvco_core::KernelError;
use thiserror::Error;

/// Errors raised while building a [`VcoBank`](crate::VcoBank).
///
/// Processing never fails; these are rejected once, at construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VcoError {
    /// Sample rate is zero, negative or not finite.
    #[error("sample rate must be positive and finite, got {0}")]
    InvalidSampleRate(f32),

    /// Requested polyphony is outside `1..=max`.
    #[error("polyphony must be in 1..={max}, got {got}")]
    Polyphony {
        /// Requested voice count.
        got: usize,
        /// Largest supported voice count.
        max: usize,
    },

    /// Lane width is outside `1..=max`.
    #[error("lane width must be in 1..={max}, got {got}")]
    LaneWidth {
        /// Requested lanes per oscillator.
        got: usize,
        /// Widest supported batch.
        max: usize,
    },

    /// The minBLEP kernel could not be built.
    #[error("kernel error: {0}")]
    Kernel(#[from] KernelError),
}
