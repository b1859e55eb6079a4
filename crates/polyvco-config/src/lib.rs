//! Presets for the polyvco oscillator bank.
//!
//! A preset captures everything needed to rebuild a [`VcoBank`]: the panel
//! controls, the saw shape, the maximum voice count, the sample rate and the
//! minBLEP kernel geometry. Presets are stored as TOML.
//!
//! # Features
//!
//! - **Preset files**: load and save [`VcoPreset`] as TOML
//! - **Validation**: range-check every field before building a bank
//! - **Factory presets**: built-in starting points
//!
//! # Example
//!
//! ```rust
//! use polyvco_config::{VcoPreset, get_factory_preset};
//! use polyvco_synth::{VcoInputs, VcoOutputs};
//!
//! let preset = get_factory_preset("pwm_strings").unwrap();
//! let mut bank = preset.build_bank().unwrap();
//!
//! let pitch = [0.0, 7.0 / 12.0];
//! let mut out = VcoOutputs::default();
//! let inputs = VcoInputs::new(bank.sample_time(), &pitch);
//! assert_eq!(bank.process(&inputs, &mut out), 2);
//!
//! let toml = VcoPreset::new("Mine").to_toml().unwrap();
//! assert!(toml.contains("name = \"Mine\""));
//! ```
//!
//! [`VcoBank`]: polyvco_synth::VcoBank

mod error;
mod preset;

/// Preset validation.
pub mod validation;

/// Factory presets bundled with the library.
pub mod factory_presets;

pub use error::ConfigError;
pub use factory_presets::{
    FACTORY_PRESET_NAMES, factory_preset_names, factory_presets, get_factory_preset,
    is_factory_preset, load_factory_preset,
};
pub use preset::{ControlsConfig, KernelConfig, SawShapeConfig, VcoPreset};
pub use validation::{
    ValidationError, ValidationResult, validate_control, validate_controls, validate_preset,
};
