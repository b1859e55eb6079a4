//! Factory presets bundled with the polyvco library.
//!
//! These are embedded at compile time, so they are always available without
//! external files and serve as starting points for user presets.

use crate::{ConfigError, VcoPreset};

/// Array of factory preset names for external access.
pub static FACTORY_PRESET_NAMES: &[&str] = &["init", "analog_saw", "narrow_pulse", "pwm_strings"];

static FACTORY_PRESETS_TOML: &[(&str, &str)] = &[
    ("init", INIT_PRESET),
    ("analog_saw", ANALOG_SAW_PRESET),
    ("narrow_pulse", NARROW_PULSE_PRESET),
    ("pwm_strings", PWM_STRINGS_PRESET),
];

/// Initialization preset - every control at its default.
const INIT_PRESET: &str = r#"
name = "Init"
description = "Square pulse and analog saw, no modulation"
sample_rate = 48000
polyphony = 16
saw_shape = "analog"

[controls]
coarse = 0.0
fine = 0.0
pulse_width = 0.5
fm_depth = 0.0
pwm_depth = 0.0
"#;

/// Linear saw an octave down with slight detune.
const ANALOG_SAW_PRESET: &str = r#"
name = "Analog Saw"
description = "Bright linear ramp an octave down, slightly sharp"
sample_rate = 48000
polyphony = 8
saw_shape = "linear"

[controls]
coarse = -12.0
fine = 0.04
pulse_width = 0.5
fm_depth = 0.0
pwm_depth = 0.0
"#;

/// Thin nasal pulse with a touch of FM.
const NARROW_PULSE_PRESET: &str = r#"
name = "Narrow Pulse"
description = "Thin 10% pulse with light exponential FM"
sample_rate = 48000
polyphony = 16
saw_shape = "analog"

[controls]
coarse = 0.0
fine = 0.0
pulse_width = 0.1
fm_depth = 0.15
pwm_depth = 0.0
"#;

/// Deep pulse width modulation for ensemble pads.
const PWM_STRINGS_PRESET: &str = r#"
name = "PWM Strings"
description = "Pulse width swept by the PWM input for string-machine pads"
sample_rate = 48000
polyphony = 16
saw_shape = "analog"

[controls]
coarse = 0.0
fine = -0.02
pulse_width = 0.5
fm_depth = 0.0
pwm_depth = 0.8

[kernel]
zero_crossings = 16
oversample = 32
"#;

/// Get all factory presets.
///
/// # Example
///
/// ```rust
/// use polyvco_config::factory_presets;
///
/// for preset in factory_presets() {
///     println!("{}: {}", preset.name, preset.description.as_deref().unwrap_or(""));
/// }
/// ```
pub fn factory_presets() -> Vec<VcoPreset> {
    FACTORY_PRESETS_TOML
        .iter()
        .filter_map(|(_, toml)| VcoPreset::from_toml(toml).ok())
        .collect()
}

/// Get a factory preset by identifier or display name, case-insensitively.
///
/// # Example
///
/// ```rust
/// use polyvco_config::get_factory_preset;
///
/// let preset = get_factory_preset("PWM Strings").unwrap();
/// assert_eq!(preset.controls.pwm_depth, 0.8);
/// assert!(get_factory_preset("supersaw").is_none());
/// ```
pub fn get_factory_preset(name: &str) -> Option<VcoPreset> {
    let name_lower = name.to_lowercase();

    if let Some((_, toml)) = FACTORY_PRESETS_TOML
        .iter()
        .find(|(id, _)| id.to_lowercase() == name_lower)
    {
        return VcoPreset::from_toml(toml).ok();
    }

    factory_presets()
        .into_iter()
        .find(|preset| preset.name.to_lowercase() == name_lower)
}

/// Like [`get_factory_preset`], but a missing name is an error.
pub fn load_factory_preset(name: &str) -> Result<VcoPreset, ConfigError> {
    get_factory_preset(name).ok_or_else(|| ConfigError::PresetNotFound(name.to_string()))
}

/// Identifiers of all factory presets.
pub fn factory_preset_names() -> Vec<&'static str> {
    FACTORY_PRESETS_TOML.iter().map(|(name, _)| *name).collect()
}

/// Check if a name matches any factory preset (case-insensitive).
///
/// # Example
///
/// ```rust
/// use polyvco_config::is_factory_preset;
///
/// assert!(is_factory_preset("narrow_pulse"));
/// assert!(is_factory_preset("Narrow Pulse"));
/// assert!(!is_factory_preset("my_custom_preset"));
/// ```
pub fn is_factory_preset(name: &str) -> bool {
    get_factory_preset(name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use polyvco_synth::SawShape;

    #[test]
    fn test_factory_presets_load() {
        let presets = factory_presets();
        assert_eq!(presets.len(), FACTORY_PRESET_NAMES.len());

        let names: Vec<_> = presets.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Init", "Analog Saw", "Narrow Pulse", "PWM Strings"]);
    }

    #[test]
    fn test_get_factory_preset() {
        let preset = get_factory_preset("analog_saw").expect("analog_saw should exist");
        assert_eq!(preset.name, "Analog Saw");

        let preset = get_factory_preset("Narrow Pulse").expect("Narrow Pulse should exist");
        assert_eq!(preset.controls.pulse_width, 0.1);

        let preset = get_factory_preset("INIT").expect("INIT should exist");
        assert_eq!(preset, VcoPreset::new("Init").with_description(
            "Square pulse and analog saw, no modulation"
        ));

        assert!(get_factory_preset("nonexistent").is_none());
    }

    #[test]
    fn test_load_factory_preset() {
        assert!(load_factory_preset("pwm_strings").is_ok());
        let err = load_factory_preset("missing").unwrap_err();
        assert!(matches!(err, ConfigError::PresetNotFound(ref name) if name == "missing"));
    }

    #[test]
    fn test_factory_preset_names() {
        assert_eq!(factory_preset_names(), FACTORY_PRESET_NAMES);
    }

    #[test]
    fn test_all_factory_presets_valid() {
        for (id, toml) in FACTORY_PRESETS_TOML {
            let preset = VcoPreset::from_toml(toml)
                .unwrap_or_else(|e| panic!("factory preset '{id}' should parse: {e}"));
            assert!(preset.description.is_some(), "preset '{id}' should have a description");
            assert!(
                preset.validate().is_ok(),
                "preset '{id}' should validate: {:?}",
                preset.validate()
            );
        }
    }

    #[test]
    fn test_factory_presets_build() {
        for preset in factory_presets() {
            let bank = preset.build_bank().expect("factory preset should build");
            assert_eq!(bank.max_polyphony(), preset.polyphony);
            assert_eq!(bank.saw_shape(), SawShape::from(preset.saw_shape));
        }
    }
}
