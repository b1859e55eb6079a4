//! Preset validation.
//!
//! Presets are plain data; nothing stops a hand-edited file from asking for
//! 40 voices or a coarse tune of 90 semitones. [`validate_preset`] checks
//! every field against the ranges the oscillator accepts and reports all
//! problems at once.
//!
//! # Example
//!
//! ```rust
//! use polyvco_config::{ValidationError, VcoPreset, validate_preset};
//!
//! let mut preset = VcoPreset::new("Wide");
//! assert!(validate_preset(&preset).is_ok());
//!
//! preset.controls.fine = 3.0;
//! preset.polyphony = 0;
//! let Err(ValidationError::Multiple(errors)) = validate_preset(&preset) else {
//!     panic!("expected two errors");
//! };
//! assert_eq!(errors.len(), 2);
//! ```

use polyvco_core::{KernelError, MinBlepKernel, ParameterInfo};
use polyvco_synth::{MAX_POLYPHONY, VcoControls};
use thiserror::Error;

use crate::preset::{ControlsConfig, VcoPreset};

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Control value out of range.
    #[error("parameter '{param}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Preset key of the control.
        param: String,
        /// The value that was out of range.
        value: f32,
        /// Minimum allowed value.
        min: f32,
        /// Maximum allowed value.
        max: f32,
    },

    /// Voice count outside `1..=max`.
    #[error("polyphony {got} out of range [1, {max}]")]
    Polyphony {
        /// Requested voice count.
        got: usize,
        /// Largest supported voice count.
        max: usize,
    },

    /// Sample rate is zero.
    #[error("sample rate must be positive, got {0}")]
    SampleRate(u32),

    /// Kernel geometry rejected.
    #[error("invalid kernel: {0}")]
    Kernel(#[from] KernelError),

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Checks one control against its descriptor, by preset key.
///
/// Unknown keys are accepted; NaN is always out of range.
pub fn validate_control(param: &str, value: f32) -> ValidationResult<()> {
    let controls = VcoControls::default();
    let Some(desc) = controls
        .find_param_by_name(param)
        .and_then(|index| controls.param_info(index))
    else {
        return Ok(());
    };
    if desc.contains(value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            param: desc.string_id.to_string(),
            value,
            min: desc.min,
            max: desc.max,
        })
    }
}

/// Checks every control in `controls`, collecting all failures.
pub fn validate_controls(controls: &ControlsConfig) -> ValidationResult<()> {
    let errors: Vec<_> = controls
        .entries()
        .into_iter()
        .filter_map(|(key, value)| validate_control(key, value).err())
        .collect();
    collect(errors)
}

/// Checks a whole preset: controls, polyphony, sample rate and kernel.
pub fn validate_preset(preset: &VcoPreset) -> ValidationResult<()> {
    let mut errors = Vec::new();

    if let Err(err) = validate_controls(&preset.controls) {
        match err {
            ValidationError::Multiple(inner) => errors.extend(inner),
            other => errors.push(other),
        }
    }
    if preset.polyphony == 0 || preset.polyphony > MAX_POLYPHONY {
        errors.push(ValidationError::Polyphony {
            got: preset.polyphony,
            max: MAX_POLYPHONY,
        });
    }
    if preset.sample_rate == 0 {
        errors.push(ValidationError::SampleRate(preset.sample_rate));
    }
    if let Err(err) =
        MinBlepKernel::check_geometry(preset.kernel.zero_crossings, preset.kernel.oversample)
    {
        errors.push(err.into());
    }

    collect(errors)
}

fn collect(mut errors: Vec<ValidationError>) -> ValidationResult<()> {
    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}
