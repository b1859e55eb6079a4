//! Integration tests for polyvco-synth.
//!
//! Drive the oscillator and the bank through their public APIs and check
//! edge accounting, output accuracy around discontinuities, and voice
//! batching end to end.

use std::sync::Arc;

use polyvco_core::{DiscontinuityCorrector, FREQ_C4, MinBlepKernel};
use polyvco_synth::{
    MAX_POLYPHONY, OUTPUT_SCALE, SawShape, VcoBank, VcoInputs, VcoOutputs,
    VoltageControlledOscillator, square,
};

// ----- helpers ---------------------------------------------------------------

/// Counts insertions per lane and sign; contributes no correction.
#[derive(Debug, Clone)]
struct CountingCorrector<const L: usize> {
    rising: [usize; L],
    falling: [usize; L],
    ticks: usize,
}

impl<const L: usize> DiscontinuityCorrector<L> for CountingCorrector<L> {
    fn insert_discontinuity(&mut self, offset: f32, jump: [f32; L]) {
        assert!(offset > -1.0 && offset <= 0.0, "offset {offset} out of range");
        for lane in 0..L {
            if jump[lane] > 0.0 {
                self.rising[lane] += 1;
            } else if jump[lane] < 0.0 {
                self.falling[lane] += 1;
            }
        }
    }

    fn process(&mut self) -> [f32; L] {
        self.ticks += 1;
        [0.0; L]
    }

    fn reset(&mut self) {
        *self = Self {
            rising: [0; L],
            falling: [0; L],
            ticks: 0,
        };
    }
}

fn counting_vco<const L: usize>() -> VoltageControlledOscillator<L, CountingCorrector<L>> {
    VoltageControlledOscillator::with_correctors(
        CountingCorrector {
            rising: [0; L],
            falling: [0; L],
            ticks: 0,
        },
        CountingCorrector {
            rising: [0; L],
            falling: [0; L],
            ticks: 0,
        },
    )
}

/// Indices at which `signal` goes from `>= 0` to `< 0`.
fn falling_zero_crossings(signal: &[f32]) -> Vec<usize> {
    signal
        .windows(2)
        .enumerate()
        .filter(|(_, w)| w[0] >= 0.0 && w[1] < 0.0)
        .map(|(i, _)| i + 1)
        .collect()
}

// ----- 1. Edge accounting ----------------------------------------------------

#[test]
fn one_cycle_reports_each_edge_once() {
    // 100 Hz at 44.1 kHz: 441 samples per cycle, falling edge at 220.5.
    // The wrap at sample 441 is not a square edge.
    let mut vco = counting_vco::<1>();
    vco.set_frequency([100.0]);
    vco.set_pulse_width([0.5]);
    let dt = 1.0 / 44100.0;

    for _ in 0..441 {
        vco.process(dt);
    }
    assert_eq!(vco.square_corrector().falling, [1]);
    assert_eq!(vco.square_corrector().rising, [0]);
    assert_eq!(vco.saw_corrector().falling, [1]);
    assert_eq!(vco.saw_corrector().rising, [0]);
}

#[test]
fn many_cycles_report_no_duplicates() {
    const CYCLES: usize = 25;
    let mut vco = counting_vco::<1>();
    vco.set_frequency([100.0]);
    let dt = 1.0 / 44100.0;

    for _ in 0..(441 * CYCLES + 100) {
        vco.process(dt);
    }
    assert_eq!(vco.square_corrector().falling, [CYCLES]);
    assert_eq!(vco.square_corrector().rising, [0]);
    assert_eq!(vco.saw_corrector().falling, [CYCLES]);
    assert_eq!(vco.square_corrector().ticks, 441 * CYCLES + 100);
}

#[test]
fn lanes_count_independently() {
    let mut vco = counting_vco::<4>();
    vco.set_frequency([100.0, 200.0, 400.0, 0.0]);
    let dt = 1.0 / 48000.0;

    // Just under one second, so no edge sits on the boundary
    for _ in 0..47_990 {
        vco.process(dt);
    }
    let falling = vco.square_corrector().falling;
    assert_eq!(falling, [100, 200, 400, 0]);
    assert_eq!(vco.saw_corrector().falling, [100, 200, 400, 0]);
}

// ----- 2. Output accuracy ----------------------------------------------------

#[test]
fn corrected_output_matches_naive_away_from_edges() {
    let kernel = Arc::new(MinBlepKernel::standard().unwrap());
    let support = kernel.support();
    let mut vco: VoltageControlledOscillator<2> = VoltageControlledOscillator::new(kernel);
    vco.set_frequency([100.0, 310.0]);
    vco.set_pulse_width([0.3, 0.5]);
    vco.set_saw_shape(SawShape::Linear);
    let dt = 1.0 / 48000.0;

    let mut last_square = [1.0f32; 2];
    let mut last_saw = [0.0f32; 2];
    let mut since_edge = [usize::MAX; 2];

    for n in 0..9600 {
        vco.process(dt);
        let phase = vco.phase();
        for lane in 0..2 {
            let naive_square = square(phase[lane], vco.pulse_width()[lane]);
            let naive_saw = SawShape::Linear.evaluate(phase[lane]);
            let edge = naive_square != last_square[lane] || naive_saw < last_saw[lane];
            since_edge[lane] = if edge { 0 } else { since_edge[lane].saturating_add(1) };
            last_square[lane] = naive_square;
            last_saw[lane] = naive_saw;

            if since_edge[lane] >= support {
                let sq = vco.square()[lane];
                let saw = vco.saw()[lane];
                assert!((sq - naive_square).abs() < 0.1, "lane {lane} tick {n}: square {sq}");
                assert!((saw - naive_saw).abs() < 0.1, "lane {lane} tick {n}: saw {saw}");
            }
        }
    }
}

#[test]
fn corrected_falling_edges_are_band_limited() {
    // On the tick a falling edge lands, the corrected pulse has barely started moving
    let kernel = Arc::new(MinBlepKernel::standard().unwrap());
    let mut vco: VoltageControlledOscillator<1> = VoltageControlledOscillator::new(kernel);
    vco.set_frequency([440.0]);
    let dt = 1.0 / 48000.0;

    let mut last_naive = 1.0f32;
    let mut falling = 0;
    let mut rising = 0;
    for _ in 0..4750 {
        vco.process(dt);
        let naive = square(vco.phase()[0], 0.5);
        let v = vco.square()[0];
        if naive < last_naive {
            falling += 1;
            assert!((v - naive).abs() > 0.5, "edge sample {v} already at {naive}");
            assert!(v > 0.0, "edge sample {v}");
        } else if naive > last_naive {
            // The wrap is a plain step
            rising += 1;
            assert_eq!(v, naive);
        }
        last_naive = naive;
    }
    assert_eq!(falling, 44);
    assert_eq!(rising, 43);
}

// ----- 3. Bank end to end ----------------------------------------------------

#[test]
fn middle_c_crosses_zero_on_schedule() {
    let sample_rate = 44100.0;
    let mut bank: VcoBank = VcoBank::with_defaults(sample_rate).unwrap();
    let delay = MinBlepKernel::standard().unwrap().half_rise_delay();
    let mut out = VcoOutputs::default();
    let pitch = [0.0];

    let mut saw = Vec::new();
    let mut pulse = Vec::new();
    saw.push(OUTPUT_SCALE * SawShape::Analog.evaluate(0.0));
    pulse.push(OUTPUT_SCALE);
    for _ in 0..1700 {
        let channels = bank.process(&VcoInputs::new(bank.sample_time(), &pitch), &mut out);
        assert_eq!(channels, 1);
        saw.push(out.saw[0]);
        pulse.push(out.pulse[0]);
    }

    let frequency = bank.oscillators()[0].frequency()[0];
    assert!((frequency - FREQ_C4).abs() < 1e-3, "frequency {frequency}");

    let period = sample_rate / FREQ_C4;
    let expected_first = period / 2.0 + delay;

    for (name, signal) in [("saw", &saw), ("pulse", &pulse)] {
        let crossings = falling_zero_crossings(signal);
        // 1700 samples hold ten periods
        assert_eq!(crossings.len(), 10, "{name}: {crossings:?}");
        for (k, &tick) in crossings.iter().enumerate() {
            let expected = expected_first + k as f32 * period;
            assert!(
                (tick as f32 - expected).abs() <= 1.0,
                "{name} crossing {k} at {tick}, expected {expected}"
            );
        }
    }
}

#[test]
fn voices_run_at_their_own_pitch() {
    let sample_rate = 48000.0;
    let mut bank: VcoBank = VcoBank::with_defaults(sample_rate).unwrap();
    let mut out = VcoOutputs::default();
    let pitch = [0.0, 1.0, -1.0, 0.5, 2.0, -2.0];

    let mut traces = vec![Vec::with_capacity(48_000); pitch.len()];
    for _ in 0..48_000 {
        bank.process(&VcoInputs::new(bank.sample_time(), &pitch), &mut out);
        for (trace, &v) in traces.iter_mut().zip(out.pulse.iter()) {
            trace.push(v);
        }
    }

    for (voice, (trace, &volts)) in traces.iter().zip(pitch.iter()).enumerate() {
        let expected = FREQ_C4 * 2.0f32.powf(volts);
        let cycles = falling_zero_crossings(trace).len() as f32;
        assert!(
            (cycles - expected).abs() <= 1.5,
            "voice {voice}: {cycles} cycles, expected {expected}"
        );
    }
}

#[test]
fn inactive_lanes_stay_naive() {
    let mut bank: VcoBank = VcoBank::with_defaults(48000.0).unwrap();
    let mut out = VcoOutputs::default();
    let pitch = [1.0; 6];

    for _ in 0..4800 {
        bank.process(&VcoInputs::new(bank.sample_time(), &pitch), &mut out);
        let osc = &bank.oscillators()[1];
        assert_eq!(osc.active_lanes(), 2);
        let phase = osc.phase();
        for lane in 2..4 {
            assert_eq!(osc.square()[lane], square(phase[lane], osc.pulse_width()[lane]));
        }
    }
    // Channels 6.. were never written
    assert!(out.pulse[6..MAX_POLYPHONY].iter().all(|&v| v == 0.0));
}

#[test]
fn reset_restarts_every_voice() {
    let mut bank: VcoBank = VcoBank::with_defaults(48000.0).unwrap();
    let mut out = VcoOutputs::default();
    let pitch = [0.0; 16];
    for _ in 0..1000 {
        bank.process(&VcoInputs::new(bank.sample_time(), &pitch), &mut out);
    }
    bank.reset();
    for osc in bank.oscillators() {
        assert_eq!(osc.phase(), [0.0; 4]);
    }
}
