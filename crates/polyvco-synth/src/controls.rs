//! Control-voltage to oscillator-parameter mapping.
//!
//! [`VcoControls`] holds the five panel controls of the VCO and turns
//! per-voice control voltages into a frequency and pulse width:
//!
//! ```text
//! pitch       = coarse/12 + fine/12 + cv + fm_cv · fm_depth      (volts, 1 V/oct)
//! frequency   = FREQ_C4 · 2^pitch, clamped to [0, sample_rate/2]
//! pulse_width = base + (pwm_cv / 10) · pwm_depth, clamped to [0.01, 0.99]
//! ```
//!
//! The panel controls are exposed to hosts through [`ParameterInfo`].

use polyvco_core::{
    ParamDescriptor, ParamId, ParamUnit, ParameterInfo, clamp_to_nyquist, semitones_to_volts,
    volts_to_hz,
};

use crate::waveform::{PULSE_WIDTH_MAX, PULSE_WIDTH_MIN, clamp_pulse_width};

/// Parameter index of the coarse tuning offset.
pub const PARAM_COARSE: usize = 0;
/// Parameter index of the fine tuning offset.
pub const PARAM_FINE: usize = 1;
/// Parameter index of the base pulse width.
pub const PARAM_PULSE_WIDTH: usize = 2;
/// Parameter index of the FM depth.
pub const PARAM_FM_DEPTH: usize = 3;
/// Parameter index of the PWM depth.
pub const PARAM_PWM_DEPTH: usize = 4;

/// Pulse-width CV full scale: 10 V sweeps the whole width at depth 1.
const PWM_FULL_SCALE_VOLTS: f32 = 10.0;

const PARAMS: [ParamDescriptor; 5] = [
    ParamDescriptor::new("Frequency", "Coarse", ParamUnit::Semitones, -54.0, 54.0, 0.0)
        .with_id(ParamId(0), "coarse"),
    ParamDescriptor::new("Fine frequency", "Fine", ParamUnit::Semitones, -1.0, 1.0, 0.0)
        .with_id(ParamId(1), "fine"),
    ParamDescriptor::new(
        "Pulse width",
        "PW",
        ParamUnit::Ratio,
        PULSE_WIDTH_MIN,
        PULSE_WIDTH_MAX,
        0.5,
    )
    .with_id(ParamId(2), "pulse_width"),
    ParamDescriptor::new("Frequency modulation", "FM", ParamUnit::Ratio, -1.0, 1.0, 0.0)
        .with_id(ParamId(3), "fm_depth"),
    ParamDescriptor::new("Pulse width modulation", "PWM", ParamUnit::Ratio, -1.0, 1.0, 0.0)
        .with_id(ParamId(4), "pwm_depth"),
];

/// Panel controls of the VCO.
///
/// Values are always inside their [`ParamDescriptor`] ranges; the setters and
/// [`ParameterInfo::set_param`] clamp.
///
/// # Example
///
/// ```rust
/// use polyvco_core::{FREQ_C4, ParameterInfo};
/// use polyvco_synth::{PARAM_COARSE, VcoControls};
///
/// let mut controls = VcoControls::default();
/// assert!((controls.frequency(0.0, 0.0, 48000.0) - FREQ_C4).abs() < 1e-2);
///
/// controls.set_param(PARAM_COARSE, 12.0);
/// assert!((controls.frequency(0.0, 0.0, 48000.0) - 2.0 * FREQ_C4).abs() < 1e-2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VcoControls {
    coarse: f32,
    fine: f32,
    pulse_width: f32,
    fm_depth: f32,
    pwm_depth: f32,
}

impl Default for VcoControls {
    fn default() -> Self {
        Self {
            coarse: PARAMS[PARAM_COARSE].default,
            fine: PARAMS[PARAM_FINE].default,
            pulse_width: PARAMS[PARAM_PULSE_WIDTH].default,
            fm_depth: PARAMS[PARAM_FM_DEPTH].default,
            pwm_depth: PARAMS[PARAM_PWM_DEPTH].default,
        }
    }
}

impl VcoControls {
    /// Controls at their defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Descriptor table for all controls, indexed by the `PARAM_*` constants.
    pub fn descriptors() -> &'static [ParamDescriptor] {
        &PARAMS
    }

    /// Coarse tuning in semitones.
    pub fn coarse(&self) -> f32 {
        self.coarse
    }

    /// Sets coarse tuning in semitones, clamped to ±54.
    pub fn set_coarse(&mut self, semitones: f32) {
        self.coarse = PARAMS[PARAM_COARSE].clamp(semitones);
    }

    /// Fine tuning in semitones.
    pub fn fine(&self) -> f32 {
        self.fine
    }

    /// Sets fine tuning in semitones, clamped to ±1.
    pub fn set_fine(&mut self, semitones: f32) {
        self.fine = PARAMS[PARAM_FINE].clamp(semitones);
    }

    /// Base pulse width.
    pub fn base_pulse_width(&self) -> f32 {
        self.pulse_width
    }

    /// Sets the base pulse width, clamped to `[0.01, 0.99]`.
    pub fn set_pulse_width(&mut self, pulse_width: f32) {
        self.pulse_width = PARAMS[PARAM_PULSE_WIDTH].clamp(pulse_width);
    }

    /// FM depth.
    pub fn fm_depth(&self) -> f32 {
        self.fm_depth
    }

    /// Sets the FM depth, clamped to ±1.
    pub fn set_fm_depth(&mut self, depth: f32) {
        self.fm_depth = PARAMS[PARAM_FM_DEPTH].clamp(depth);
    }

    /// PWM depth.
    pub fn pwm_depth(&self) -> f32 {
        self.pwm_depth
    }

    /// Sets the PWM depth, clamped to ±1.
    pub fn set_pwm_depth(&mut self, depth: f32) {
        self.pwm_depth = PARAMS[PARAM_PWM_DEPTH].clamp(depth);
    }

    /// Pitch in volts (1 V/oct, 0 V = C4) for one voice.
    #[inline]
    pub fn pitch_volts(&self, pitch_cv: f32, fm_cv: f32) -> f32 {
        semitones_to_volts(self.coarse)
            + semitones_to_volts(self.fine)
            + pitch_cv
            + fm_cv * self.fm_depth
    }

    /// Oscillator frequency in Hz for one voice, clamped to `[0, sample_rate/2]`.
    #[inline]
    pub fn frequency(&self, pitch_cv: f32, fm_cv: f32, sample_rate: f32) -> f32 {
        clamp_to_nyquist(volts_to_hz(self.pitch_volts(pitch_cv, fm_cv)), sample_rate)
    }

    /// Pulse width for one voice, clamped to `[0.01, 0.99]`.
    #[inline]
    pub fn pulse_width(&self, pwm_cv: f32) -> f32 {
        clamp_pulse_width(self.pulse_width + pwm_cv / PWM_FULL_SCALE_VOLTS * self.pwm_depth)
    }
}

impl ParameterInfo for VcoControls {
    fn param_count(&self) -> usize {
        PARAMS.len()
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        PARAMS.get(index).copied()
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            PARAM_COARSE => self.coarse,
            PARAM_FINE => self.fine,
            PARAM_PULSE_WIDTH => self.pulse_width,
            PARAM_FM_DEPTH => self.fm_depth,
            PARAM_PWM_DEPTH => self.pwm_depth,
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        match index {
            PARAM_COARSE => self.set_coarse(value),
            PARAM_FINE => self.set_fine(value),
            PARAM_PULSE_WIDTH => self.set_pulse_width(value),
            PARAM_FM_DEPTH => self.set_fm_depth(value),
            PARAM_PWM_DEPTH => self.set_pwm_depth(value),
            _ => {}
        }
    }
}
