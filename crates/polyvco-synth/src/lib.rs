//! polyvco Synth - Polyphonic anti-aliased saw/pulse VCO
//!
//! This crate builds the oscillator on top of the primitives in
//! `polyvco-core`: phase integration with sub-sample edge detection, naive
//! waveform evaluation, minBLEP correction per waveform, and batching of
//! voices into fixed-width lanes.
//!
//! # Core Components
//!
//! ## Oscillator
//!
//! - [`VoltageControlledOscillator`] - Saw and pulse for `L` lanes, each
//!   waveform with its own [`DiscontinuityCorrector`](polyvco_core::DiscontinuityCorrector)
//! - [`PhaseIntegrator`] / [`crossing_offset`] - Phase advance and edge timing
//! - [`SawShape`] / [`Edge`] - Waveform shapes and their discontinuities
//!
//! ## Polyphony
//!
//! - [`VcoBank`] - Up to [`MAX_POLYPHONY`] voices in `L`-lane batches
//! - [`VcoControls`] - Tuning, pulse width and modulation depths
//! - [`VcoInputs`] / [`VcoOutputs`] - Per-tick CV in, ±5 V out
//!
//! # Example
//!
//! ```rust
//! use polyvco_synth::{SawShape, VcoBank, VcoInputs, VcoOutputs};
//!
//! let mut bank: VcoBank = VcoBank::with_defaults(44100.0)?;
//! bank.set_saw_shape(SawShape::Linear);
//! bank.controls_mut().set_pulse_width(0.25);
//!
//! let mut out = VcoOutputs::default();
//! let pitch = [0.0, 1.0];
//! for _ in 0..1024 {
//!     bank.process(&VcoInputs::new(bank.sample_time(), &pitch), &mut out);
//! }
//! assert_eq!(out.channels, 2);
//! # Ok::<(), polyvco_synth::VcoError>(())
//! ```
//!
//! # Real-Time Safety
//!
//! All buffers are allocated when a [`VcoBank`] or oscillator is built.
//! [`VcoBank::process`] never allocates, locks or fails: out-of-range
//! controls are clamped.

pub mod bank;
pub mod controls;
pub mod error;
pub mod oscillator;
pub mod phase;
pub mod waveform;

// Re-export main types at crate root
pub use bank::{
    MAX_POLYPHONY, OUTPUT_SCALE, VcoBank, VcoInputs, VcoOutput, VcoOutputs, active_lanes,
    batch_count, poly_voltage,
};
pub use controls::{
    PARAM_COARSE, PARAM_FINE, PARAM_FM_DEPTH, PARAM_PULSE_WIDTH, PARAM_PWM_DEPTH, VcoControls,
};
pub use error::VcoError;
pub use oscillator::{Vco4, VoltageControlledOscillator};
pub use phase::{MAX_PHASE_STEP, PhaseIntegrator, PhaseStep, crossing_offset};
pub use waveform::{
    Edge, PULSE_WIDTH_MAX, PULSE_WIDTH_MIN, SawShape, clamp_pulse_width, exp_curve, square,
};
