//! Phase-accumulating sine oscillator.
//!
//! `SignalGeneratorSine2` in `NodeGraphOpSignalGenerator.cpp` couples FM and
//! PM convergence filters onto the phase accumulator; reproducing it
//! bit-for-bit is out of scope without running the filter's exact
//! fixed-point constants through the toolchain. This operation keeps the
//! architectural shape — `amplitude`/`frequency` inputs, a wrapped phase
//! accumulator, `update_rate`-driven frequency resampling via
//! [`sonido_core::BatchDriver`] — grounded on the simpler
//! `GraphSourceSine::ProcessSubGraph` in `NodeGraphOperations.cpp`
//! (`mPhase += deltaTime * freq; mPhase -= floor(mPhase); out = sin(2*pi*mPhase)`),
//! without its FM/PM modulation inputs.

use sonido_core::{BatchDriver, BoundsPreset, InputManager, NodeDataInit, Operation, OutputPort};

const TWO_PI: f32 = core::f32::consts::TAU;

#[derive(Debug, Clone)]
pub struct Sine2Operation {
    sample_rate: f32,
    phase: f32,
    driver: BatchDriver,
}

impl Sine2Operation {
    pub fn new(sample_rate: f32, update_rate: usize) -> Self {
        Self {
            sample_rate: sample_rate.max(1.0),
            phase: 0.0,
            driver: BatchDriver::new(update_rate),
        }
    }
}

impl Default for Sine2Operation {
    fn default() -> Self {
        Self::new(44_100.0, 64)
    }
}

impl Operation for Sine2Operation {
    fn default_data_init(&self) -> NodeDataInit {
        let mut init = NodeDataInit::default();
        init.push_input("Frequency", 440.0, BoundsPreset::Custom(0.0, 20_000.0));
        init.push_input("Amplitude", 1.0, BoundsPreset::ZeroOne);
        init.push_output("Out");
        init
    }

    fn reset(&mut self) {
        self.phase = 0.0;
        self.driver = BatchDriver::new(self.driver.update_rate());
    }

    fn process(
        &mut self,
        num_samples: usize,
        _num_cache_samples: i64,
        inputs: &mut InputManager,
        outputs: &mut [OutputPort],
    ) {
        let Some(out) = outputs.first_mut() else {
            return;
        };
        let buf = out.get_iterator_mut(num_samples, 1.0);
        let sample_rate = self.sample_rate;
        let phase = &mut self.phase;
        let rate = self.driver.update_rate();

        // The update rate only governs how the block is chunked here; unlike
        // a raw C buffer read, `InputManager` slots already resample their
        // source once per sample, so frequency and amplitude are both read
        // with `get_value_next` inside the per-sample closure rather than
        // snapshotted once per slow-update window.
        self.driver.batch_update(
            num_samples,
            || rate,
            |start, end, _tail| {
                for slot in &mut buf[start..end] {
                    let freq = inputs.get_value_next(0);
                    let amplitude = inputs.get_value_next(1);
                    *phase += freq / sample_rate;
                    *phase -= libm::floorf(*phase);
                    *slot = amplitude * libm::sinf(TWO_PI * *phase);
                }
            },
        );

        let last = buf.last().copied().unwrap_or(0.0);
        out.set_scalar(last);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sonido_core::InputSnapshot;

    #[test]
    fn stays_within_amplitude_bounds() {
        let mut op = Sine2Operation::new(1000.0, 8);
        let mut inputs = InputManager::new(2);
        inputs.batch_update(&[InputSnapshot::Scalar(100.0), InputSnapshot::Scalar(0.5)]);
        let mut outputs = [OutputPort::new("Out")];
        op.process(64, -1, &mut inputs, &mut outputs);
        for &v in outputs[0].get(64) {
            assert!(v.abs() <= 0.5 + 1e-4, "sample out of bounds: {v}");
        }
    }

    #[test]
    fn zero_frequency_holds_a_constant_value() {
        let mut op = Sine2Operation::new(1000.0, 8);
        let mut inputs = InputManager::new(2);
        inputs.batch_update(&[InputSnapshot::Scalar(0.0), InputSnapshot::Scalar(1.0)]);
        let mut outputs = [OutputPort::new("Out")];
        op.process(16, -1, &mut inputs, &mut outputs);
        let samples = outputs[0].get(16);
        let first = samples[0];
        for &v in samples {
            assert!((v - first).abs() < 1e-6);
        }
    }

    #[test]
    fn reset_rewinds_phase() {
        let mut op = Sine2Operation::new(1000.0, 8);
        let mut inputs = InputManager::new(2);
        inputs.batch_update(&[InputSnapshot::Scalar(100.0), InputSnapshot::Scalar(1.0)]);
        let mut outputs = [OutputPort::new("Out")];
        op.process(16, -1, &mut inputs, &mut outputs);
        op.reset();
        assert_eq!(op.phase, 0.0);
    }
}
