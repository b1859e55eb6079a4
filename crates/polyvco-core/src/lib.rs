//! polyvco Core - DSP primitives for band-limited oscillators
//!
//! This crate holds the pieces of the oscillator that do not depend on any
//! particular waveform: lane bookkeeping for batched voices, pitch and phase
//! math, host parameter introspection, and the minBLEP discontinuity
//! corrector.
//!
//! # Core Abstractions
//!
//! ## Lanes
//!
//! - [`LaneMask`] - One bit per voice lane (SIMD movemask equivalent)
//! - [`one_hot`] - Route a per-lane value into a lane vector
//!
//! ## Band-Limiting
//!
//! - [`DiscontinuityCorrector`] - Insert/process contract between an
//!   oscillator and its anti-aliasing stage
//! - [`MinBlepKernel`] - Precomputed minimum-phase band-limited step table
//! - [`MinBlepGenerator`] - Per-lane ring buffer of pending corrections
//!
//! ## Parameters
//!
//! - [`ParameterInfo`] / [`ParamDescriptor`] - Host-discoverable controls
//!
//! ## Utilities
//!
//! - Pitch math: [`volts_to_hz`], [`semitones_to_volts`], [`clamp_to_nyquist`]
//! - Phase math: [`wrap_phase`]
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use polyvco_core::{DiscontinuityCorrector, MinBlepGenerator, MinBlepKernel, one_hot};
//!
//! let kernel = Arc::new(MinBlepKernel::standard()?);
//! let mut blep: MinBlepGenerator<4> = MinBlepGenerator::new(kernel);
//!
//! // Lane 2 jumped down by 2.0 a quarter sample ago
//! blep.insert_discontinuity(-0.25, one_hot(2, -2.0));
//! let correction = blep.process();
//! assert!(correction[2] > 0.0);
//! # Ok::<(), polyvco_core::KernelError>(())
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: Kernel tables and ring buffers are allocated at
//!   construction; the per-sample path never allocates
//! - **Deterministic**: Correction output depends only on the insert/process history
//! - **Eager validation**: Bad kernel geometry is rejected at construction

pub mod corrector;
pub mod lane;
pub mod math;
pub mod minblep;
pub mod param_info;

// Re-export main types at crate root
pub use corrector::DiscontinuityCorrector;
pub use lane::{DEFAULT_LANES, LaneMask, MAX_LANES, one_hot};
pub use math::{
    FREQ_C4, FREQ_SEMITONE, clamp_to_nyquist, semitones_to_volts, volts_to_hz, wrap_phase,
};
pub use minblep::{
    DEFAULT_OVERSAMPLE, DEFAULT_ZERO_CROSSINGS, KernelError, MAX_OVERSAMPLE, MAX_ZERO_CROSSINGS,
    MinBlepGenerator, MinBlepKernel,
};
pub use param_info::{ParamDescriptor, ParamId, ParamUnit, ParameterInfo};
