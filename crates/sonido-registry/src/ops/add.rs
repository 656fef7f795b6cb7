//! Two-input adder.
//!
//! Grounded on `NodeGraphOperations.cpp`'s `GraphNumericAdd::ProcessSubGraph`
//! (`outputs.at(0).mOutput = inputs.at(0).Get() + inputs.at(1).Get();`) —
//! the simplest possible builtin, summing two inputs sample by sample.

use sonido_core::{BoundsPreset, InputManager, NodeDataInit, Operation, OutputPort};

#[derive(Debug, Clone, Default)]
pub struct AddOperation;

impl Operation for AddOperation {
    fn default_data_init(&self) -> NodeDataInit {
        let mut init = NodeDataInit::default();
        init.push_input("A", 0.0, BoundsPreset::Unbounded);
        init.push_input("B", 0.0, BoundsPreset::Unbounded);
        init.push_output("Sum");
        init
    }

    fn reset(&mut self) {}

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
        let mut last = 0.0;
        for slot in buf.iter_mut() {
            let a = inputs.get_value_next(0);
            let b = inputs.get_value_next(1);
            last = a + b;
            *slot = last;
        }
        out.set_scalar(last);
    }
}
