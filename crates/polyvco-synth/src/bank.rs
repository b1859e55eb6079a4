//! Polyphonic VCO: voice batching, CV routing and output scaling.
//!
//! A [`VcoBank`] owns `ceil(max_polyphony / L)` oscillators of `L` lanes
//! each. Every tick it resolves the channel count from the pitch input,
//! maps each voice's control voltages to a frequency and pulse width, runs
//! the batches that carry voices, and writes ±5-unit samples for the
//! connected outputs.
//!
//! ## Voice layout
//!
//! Voice `c` lives in batch `c / L`, lane `c % L`. With 16 voices and 4 lanes:
//!
//! ```text
//! batch 0: voices  0..4    batch 2: voices  8..12
//! batch 1: voices  4..8    batch 3: voices 12..16
//! ```
//!
//! With 6 voices only batches 0 and 1 run, and batch 1 has 2 active lanes.

use std::sync::Arc;

use polyvco_core::{DEFAULT_LANES, MAX_LANES, MinBlepKernel};

use crate::controls::VcoControls;
use crate::error::VcoError;
use crate::oscillator::VoltageControlledOscillator;
use crate::waveform::SawShape;

/// Largest number of voices a bank can run.
pub const MAX_POLYPHONY: usize = 16;

/// Output amplitude for a full-scale waveform, in volts.
pub const OUTPUT_SCALE: f32 = 5.0;

/// Number of `lanes`-wide batches needed for `voices` voices.
///
/// ```rust
/// use polyvco_synth::batch_count;
///
/// assert_eq!(batch_count(16, 4), 4);
/// assert_eq!(batch_count(6, 4), 2);
/// assert_eq!(batch_count(1, 4), 1);
/// ```
#[inline]
pub fn batch_count(voices: usize, lanes: usize) -> usize {
    if lanes == 0 { 0 } else { voices.div_ceil(lanes) }
}

/// Active lanes in `batch` when `voices` voices are spread over
/// `lanes`-wide batches.
///
/// ```rust
/// use polyvco_synth::active_lanes;
///
/// assert_eq!(active_lanes(6, 0, 4), 4);
/// assert_eq!(active_lanes(6, 1, 4), 2);
/// assert_eq!(active_lanes(6, 2, 4), 0);
/// ```
#[inline]
pub fn active_lanes(voices: usize, batch: usize, lanes: usize) -> usize {
    voices.saturating_sub(batch * lanes).min(lanes)
}

/// Voltage of `channel` on a polyphonic input.
///
/// An unpatched (empty) input reads 0 V, a monophonic input is shared by
/// every channel, and channels past the end of a polyphonic input read 0 V.
#[inline]
pub fn poly_voltage(values: &[f32], channel: usize) -> f32 {
    match values {
        [] => 0.0,
        [value] => *value,
        _ => values.get(channel).copied().unwrap_or(0.0),
    }
}

/// Per-tick inputs to a [`VcoBank`].
#[derive(Debug, Clone, Copy, Default)]
pub struct VcoInputs<'a> {
    /// Elapsed time for this tick, in seconds.
    pub dt: f32,
    /// Pitch CV per voice (1 V/oct, 0 V = C4). Its length sets the channel count.
    pub pitch_cv: &'a [f32],
    /// FM CV per voice, scaled by the FM depth control.
    pub fm_cv: &'a [f32],
    /// PWM CV per voice, scaled by the PWM depth control.
    pub pwm_cv: &'a [f32],
}

impl<'a> VcoInputs<'a> {
    /// Inputs with only pitch patched.
    pub fn new(dt: f32, pitch_cv: &'a [f32]) -> Self {
        Self {
            dt,
            pitch_cv,
            fm_cv: &[],
            pwm_cv: &[],
        }
    }

    /// Patches the FM input.
    pub fn with_fm(mut self, fm_cv: &'a [f32]) -> Self {
        self.fm_cv = fm_cv;
        self
    }

    /// Patches the PWM input.
    pub fn with_pwm(mut self, pwm_cv: &'a [f32]) -> Self {
        self.pwm_cv = pwm_cv;
        self
    }
}

/// Per-tick outputs of a [`VcoBank`].
///
/// Only the first [`channels`](Self::channels) entries are meaningful.
/// Outputs marked disconnected are left untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VcoOutputs {
    /// Saw sample per voice, in volts.
    pub saw: [f32; MAX_POLYPHONY],
    /// Pulse sample per voice, in volts.
    pub pulse: [f32; MAX_POLYPHONY],
    /// Resolved channel count.
    pub channels: usize,
}

impl Default for VcoOutputs {
    fn default() -> Self {
        Self {
            saw: [0.0; MAX_POLYPHONY],
            pulse: [0.0; MAX_POLYPHONY],
            channels: 0,
        }
    }
}

/// Bank output jacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VcoOutput {
    /// Saw output.
    Saw,
    /// Pulse output.
    Pulse,
}

/// Polyphonic VCO built from `L`-lane oscillator batches.
///
/// # Example
///
/// ```rust
/// use polyvco_synth::{VcoBank, VcoInputs, VcoOutputs};
///
/// let mut bank: VcoBank = VcoBank::with_defaults(48000.0)?;
/// let mut out = VcoOutputs::default();
/// let chord = [0.0, 4.0 / 12.0, 7.0 / 12.0];
///
/// for _ in 0..480 {
///     let channels = bank.process(&VcoInputs::new(bank.sample_time(), &chord), &mut out);
///     assert_eq!(channels, 3);
/// }
/// assert!(out.saw[..3].iter().all(|v| v.abs() <= 7.5));
/// # Ok::<(), polyvco_synth::VcoError>(())
/// ```
#[derive(Debug, Clone)]
pub struct VcoBank<const L: usize = DEFAULT_LANES> {
    oscillators: Vec<VoltageControlledOscillator<L>>,
    controls: VcoControls,
    sample_rate: f32,
    max_polyphony: usize,
    channels: usize,
    saw_shape: SawShape,
    saw_connected: bool,
    pulse_connected: bool,
}

impl<const L: usize> VcoBank<L> {
    /// Creates a bank of up to `max_polyphony` voices sharing `kernel`.
    ///
    /// # Errors
    ///
    /// Returns [`VcoError`] when the sample rate is not positive, the
    /// polyphony is outside `1..=MAX_POLYPHONY`, or `L` is outside
    /// `1..=MAX_LANES`.
    pub fn new(
        sample_rate: f32,
        max_polyphony: usize,
        kernel: Arc<MinBlepKernel>,
    ) -> Result<Self, VcoError> {
        if L == 0 || L > MAX_LANES {
            return Err(VcoError::LaneWidth {
                got: L,
                max: MAX_LANES,
            });
        }
        validate_sample_rate(sample_rate)?;
        if max_polyphony == 0 || max_polyphony > MAX_POLYPHONY {
            return Err(VcoError::Polyphony {
                got: max_polyphony,
                max: MAX_POLYPHONY,
            });
        }

        let saw_shape = SawShape::Analog;
        let oscillators = (0..batch_count(max_polyphony, L))
            .map(|_| {
                let mut osc = VoltageControlledOscillator::new(Arc::clone(&kernel));
                osc.set_saw_shape(saw_shape);
                osc
            })
            .collect::<Vec<_>>();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            sample_rate,
            max_polyphony,
            lanes = L,
            batches = oscillators.len(),
            "vco_bank: allocated oscillators"
        );

        Ok(Self {
            oscillators,
            controls: VcoControls::default(),
            sample_rate,
            max_polyphony,
            channels: 1,
            saw_shape,
            saw_connected: true,
            pulse_connected: true,
        })
    }

    /// Creates a [`MAX_POLYPHONY`]-voice bank with the standard kernel.
    ///
    /// # Errors
    ///
    /// See [`new`](Self::new).
    pub fn with_defaults(sample_rate: f32) -> Result<Self, VcoError> {
        let kernel = Arc::new(MinBlepKernel::standard()?);
        Self::new(sample_rate, MAX_POLYPHONY, kernel)
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Duration of one sample in seconds.
    pub fn sample_time(&self) -> f32 {
        1.0 / self.sample_rate
    }

    /// Changes the sample rate used for the Nyquist clamp.
    ///
    /// # Errors
    ///
    /// Returns [`VcoError::InvalidSampleRate`] and keeps the old rate when
    /// `sample_rate` is not positive and finite.
    pub fn set_sample_rate(&mut self, sample_rate: f32) -> Result<(), VcoError> {
        validate_sample_rate(sample_rate)?;
        self.sample_rate = sample_rate;
        Ok(())
    }

    /// Largest channel count this bank accepts.
    pub fn max_polyphony(&self) -> usize {
        self.max_polyphony
    }

    /// Channel count resolved by the last [`process`](Self::process) call.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Panel controls.
    pub fn controls(&self) -> &VcoControls {
        &self.controls
    }

    /// Mutable panel controls.
    pub fn controls_mut(&mut self) -> &mut VcoControls {
        &mut self.controls
    }

    /// Replaces all panel controls.
    pub fn set_controls(&mut self, controls: VcoControls) {
        self.controls = controls;
    }

    /// Saw ramp shape of every voice.
    pub fn saw_shape(&self) -> SawShape {
        self.saw_shape
    }

    /// Sets the saw ramp shape of every voice.
    pub fn set_saw_shape(&mut self, shape: SawShape) {
        self.saw_shape = shape;
        for osc in &mut self.oscillators {
            osc.set_saw_shape(shape);
        }
    }

    /// Marks an output as patched or unpatched. Unpatched outputs are not written.
    pub fn set_output_connected(&mut self, output: VcoOutput, connected: bool) {
        match output {
            VcoOutput::Saw => self.saw_connected = connected,
            VcoOutput::Pulse => self.pulse_connected = connected,
        }
    }

    /// Returns `true` if `output` is patched.
    pub fn is_output_connected(&self, output: VcoOutput) -> bool {
        match output {
            VcoOutput::Saw => self.saw_connected,
            VcoOutput::Pulse => self.pulse_connected,
        }
    }

    /// The oscillator batches, voice `c` in batch `c / L`.
    pub fn oscillators(&self) -> &[VoltageControlledOscillator<L>] {
        &self.oscillators
    }

    /// Resets every oscillator's phase and pending corrections.
    pub fn reset(&mut self) {
        for osc in &mut self.oscillators {
            osc.reset();
        }
    }

    /// Runs one tick and returns the resolved channel count.
    ///
    /// The channel count is the pitch input's length clamped to
    /// `1..=max_polyphony`. Batches without voices are not advanced.
    pub fn process(&mut self, inputs: &VcoInputs<'_>, outputs: &mut VcoOutputs) -> usize {
        let channels = inputs.pitch_cv.len().clamp(1, self.max_polyphony);
        if channels != self.channels {
            #[cfg(feature = "tracing")]
            tracing::debug!(from = self.channels, to = channels, "vco_bank: channel count changed");
            self.channels = channels;
        }

        let batches = batch_count(channels, L);
        for (batch, osc) in self.oscillators.iter_mut().enumerate().take(batches) {
            let base = batch * L;
            let mut frequency = [0.0; L];
            let mut pulse_width = [0.0; L];
            for lane in 0..L {
                let channel = base + lane;
                frequency[lane] = self.controls.frequency(
                    poly_voltage(inputs.pitch_cv, channel),
                    poly_voltage(inputs.fm_cv, channel),
                    self.sample_rate,
                );
                pulse_width[lane] = self.controls.pulse_width(poly_voltage(inputs.pwm_cv, channel));
            }

            osc.set_frequency(frequency);
            osc.set_pulse_width(pulse_width);
            osc.set_active_lanes(active_lanes(channels, batch, L));
            osc.process(inputs.dt);

            let active = active_lanes(channels, batch, L);
            if self.saw_connected {
                let saw = osc.saw();
                for lane in 0..active {
                    outputs.saw[base + lane] = OUTPUT_SCALE * saw[lane];
                }
            }
            if self.pulse_connected {
                let square = osc.square();
                for lane in 0..active {
                    outputs.pulse[base + lane] = OUTPUT_SCALE * square[lane];
                }
            }
        }

        outputs.channels = channels;
        channels
    }
}

fn validate_sample_rate(sample_rate: f32) -> Result<(), VcoError> {
    if sample_rate.is_finite() && sample_rate > 0.0 {
        Ok(())
    } else {
        Err(VcoError::InvalidSampleRate(sample_rate))
    }
}
