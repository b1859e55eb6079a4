//! Preset file format and operations.

use std::path::Path;
use std::sync::Arc;

use polyvco_core::{MinBlepKernel, DEFAULT_OVERSAMPLE, DEFAULT_ZERO_CROSSINGS};
use polyvco_synth::{MAX_POLYPHONY, SawShape, VcoBank, VcoControls};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::validation::{ValidationResult, validate_preset};

/// Saw ramp shape as written in preset files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SawShapeConfig {
    /// Exponential-discharge ramp.
    #[default]
    Analog,
    /// Ideal linear ramp.
    Linear,
}

impl From<SawShapeConfig> for SawShape {
    fn from(shape: SawShapeConfig) -> Self {
        match shape {
            SawShapeConfig::Analog => SawShape::Analog,
            SawShapeConfig::Linear => SawShape::Linear,
        }
    }
}

impl From<SawShape> for SawShapeConfig {
    fn from(shape: SawShape) -> Self {
        match shape {
            SawShape::Analog => SawShapeConfig::Analog,
            SawShape::Linear => SawShapeConfig::Linear,
        }
    }
}

/// Panel control values stored in a preset. Missing keys take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    /// Coarse tuning in semitones, −54 to 54.
    pub coarse: f32,
    /// Fine tuning in semitones, −1 to 1.
    pub fine: f32,
    /// Base pulse width, 0.01 to 0.99.
    pub pulse_width: f32,
    /// FM depth, −1 to 1.
    pub fm_depth: f32,
    /// PWM depth, −1 to 1.
    pub pwm_depth: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self::from(&VcoControls::default())
    }
}

impl From<&VcoControls> for ControlsConfig {
    fn from(controls: &VcoControls) -> Self {
        Self {
            coarse: controls.coarse(),
            fine: controls.fine(),
            pulse_width: controls.base_pulse_width(),
            fm_depth: controls.fm_depth(),
            pwm_depth: controls.pwm_depth(),
        }
    }
}

impl ControlsConfig {
    /// `(preset key, value)` pairs in parameter order.
    pub fn entries(&self) -> [(&'static str, f32); 5] {
        [
            ("coarse", self.coarse),
            ("fine", self.fine),
            ("pulse_width", self.pulse_width),
            ("fm_depth", self.fm_depth),
            ("pwm_depth", self.pwm_depth),
        ]
    }
}

/// minBLEP kernel geometry stored in a preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    /// Sinc zero crossings per side.
    pub zero_crossings: usize,
    /// Table points per sample.
    pub oversample: usize,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            zero_crossings: DEFAULT_ZERO_CROSSINGS,
            oversample: DEFAULT_OVERSAMPLE,
        }
    }
}

/// Preset file format for the polyphonic VCO.
///
/// # TOML Format
///
/// ```toml
/// name = "Warm Lead"
/// description = "Slightly detuned analog saw"
/// sample_rate = 48000
/// polyphony = 16
/// saw_shape = "analog"
///
/// [controls]
/// coarse = 0.0
/// fine = 0.05
/// pulse_width = 0.5
/// fm_depth = 0.0
/// pwm_depth = 0.0
///
/// [kernel]
/// zero_crossings = 16
/// oversample = 16
/// ```
///
/// Every key except `name` is optional.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VcoPreset {
    /// Name of the preset.
    pub name: String,

    /// Optional description of the preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Sample rate the bank is built for (defaults to 48000).
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Maximum number of voices (defaults to 16).
    #[serde(default = "default_polyphony")]
    pub polyphony: usize,

    /// Saw ramp shape.
    #[serde(default)]
    pub saw_shape: SawShapeConfig,

    /// Panel control values.
    #[serde(default)]
    pub controls: ControlsConfig,

    /// Band-limiting kernel geometry.
    #[serde(default)]
    pub kernel: KernelConfig,
}

fn default_sample_rate() -> u32 {
    48000
}

fn default_polyphony() -> usize {
    MAX_POLYPHONY
}

impl VcoPreset {
    /// Create a preset with default settings.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            sample_rate: default_sample_rate(),
            polyphony: default_polyphony(),
            saw_shape: SawShapeConfig::default(),
            controls: ControlsConfig::default(),
            kernel: KernelConfig::default(),
        }
    }

    /// Create a preset with a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the sample rate.
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Set the maximum voice count.
    pub fn with_polyphony(mut self, polyphony: usize) -> Self {
        self.polyphony = polyphony;
        self
    }

    /// Set the saw ramp shape.
    pub fn with_saw_shape(mut self, shape: SawShape) -> Self {
        self.saw_shape = shape.into();
        self
    }

    /// Store the values of `controls`.
    pub fn with_controls(mut self, controls: &VcoControls) -> Self {
        self.controls = ControlsConfig::from(controls);
        self
    }

    /// Set the kernel geometry.
    pub fn with_kernel(mut self, zero_crossings: usize, oversample: usize) -> Self {
        self.kernel = KernelConfig {
            zero_crossings,
            oversample,
        };
        self
    }

    /// Load a preset from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let preset: VcoPreset = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), name = %preset.name, "loaded preset");
        Ok(preset)
    }

    /// Load a preset from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the preset to a TOML file, creating the parent directory if needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        tracing::debug!(path = %path.display(), name = %self.name, "saved preset");
        Ok(())
    }

    /// Convert the preset to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every field against the oscillator's accepted ranges.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_preset(self)
    }

    /// Panel controls with this preset's values, clamped into range.
    pub fn controls(&self) -> VcoControls {
        let mut controls = VcoControls::default();
        controls.set_coarse(self.controls.coarse);
        controls.set_fine(self.controls.fine);
        controls.set_pulse_width(self.controls.pulse_width);
        controls.set_fm_depth(self.controls.fm_depth);
        controls.set_pwm_depth(self.controls.pwm_depth);
        controls
    }

    /// Validate the preset and build a ready-to-run oscillator bank.
    pub fn build_bank(&self) -> Result<VcoBank, ConfigError> {
        if let Err(err) = self.validate() {
            tracing::warn!(name = %self.name, error = %err, "rejected preset");
            return Err(err.into());
        }

        let kernel = Arc::new(
            MinBlepKernel::new(self.kernel.zero_crossings, self.kernel.oversample)
                .map_err(polyvco_synth::VcoError::from)?,
        );
        let mut bank = VcoBank::new(self.sample_rate as f32, self.polyphony, kernel)?;
        bank.set_saw_shape(self.saw_shape.into());
        bank.set_controls(self.controls());

        tracing::debug!(
            name = %self.name,
            polyphony = self.polyphony,
            sample_rate = self.sample_rate,
            "built bank from preset"
        );
        Ok(bank)
    }
}

impl Default for VcoPreset {
    fn default() -> Self {
        Self::new("Untitled")
    }
}
