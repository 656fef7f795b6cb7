//! Running-sum accumulator ("symplectic" integral).
//!
//! Grounded on `NodeGraphOperations.cpp`'s `GraphNumericIntegral::ProcessSubGraph`
//! (`mOutput += inputs.at(0).Get(); outputs.at(0).mOutput = mOutput;`). Accumulates
//! its input sample by sample across calls to `process`, persisting the running
//! sum until `reset`.

use sonido_core::{BoundsPreset, InputManager, NodeDataInit, Operation, OutputPort};

#[derive(Debug, Clone, Default)]
pub struct IntegralOperation {
    accumulator: f32,
}

impl Operation for IntegralOperation {
    fn default_data_init(&self) -> NodeDataInit {
        let mut init = NodeDataInit::default();
        init.push_input("In", 0.0, BoundsPreset::Unbounded);
        init.push_output("Out");
        init
    }

    fn reset(&mut self) {
        self.accumulator = 0.0;
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
        for slot in buf.iter_mut() {
            self.accumulator += inputs.get_value_next(0);
            *slot = self.accumulator;
        }
        out.set_scalar(self.accumulator);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sonido_core::InputSnapshot;

    #[test]
    fn accumulates_across_process_calls() {
        let mut op = IntegralOperation::default();
        let mut inputs = InputManager::new(1);

        inputs.batch_update(&[InputSnapshot::Buffer {
            data: vec![1.0, 1.0],
            lod: 1.0,
        }]);
        let mut outputs = [OutputPort::new("Out")];
        op.process(2, -1, &mut inputs, &mut outputs);
        assert_eq!(outputs[0].get(2), &[1.0, 2.0]);

        inputs.batch_update(&[InputSnapshot::Buffer {
            data: vec![1.0, 1.0],
            lod: 1.0,
        }]);
        op.process(2, -1, &mut inputs, &mut outputs);
        assert_eq!(outputs[0].get(2), &[3.0, 4.0]);
    }

    #[test]
    fn reset_clears_the_accumulator() {
        let mut op = IntegralOperation::default();
        op.accumulator = 10.0;
        op.reset();
        assert_eq!(op.accumulator, 0.0);
    }

    /// Pinned regression value, traced to `NodeGraphSchemaTest.cpp`'s
    /// `NumericIntegral` test: 30 samples of a one-cycle sine (using the
    /// test's own truncated `oneRev = 2.0 * 3.14 / 30.0` phase step, not a
    /// full-precision `TAU`) accumulate to ≈0.00323.
    #[test]
    fn thirty_sine_samples_accumulate_to_the_pinned_value() {
        let one_rev = 2.0_f32 * 3.14_f32 / 30.0_f32;
        let signal: Vec<f32> = (0..30).map(|i| (2.0 * i as f32 * one_rev).sin()).collect();
        let mut op = IntegralOperation::default();
        let mut inputs = InputManager::new(1);
        inputs.batch_update(&[InputSnapshot::Buffer { data: signal, lod: 1.0 }]);
        let mut outputs = [OutputPort::new("Out")];
        op.process(30, -1, &mut inputs, &mut outputs);
        let acc = outputs[0].get(30)[29];
        assert!((acc - 0.00323272).abs() < 1e-4, "accumulator was {acc}");
    }
}
