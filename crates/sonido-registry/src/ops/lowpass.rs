//! Two-pole resonant lowpass, driven by `cutoff`/`resonance` inputs.
//!
//! `original_source` carries two different `GraphFilterLowpass` classes:
//! `NodeGraphOpFilter.cpp`'s `ProcessSignal` (2x-oversampled, averages the
//! previous and current input sample) and `NodeGraphOperations.cpp`'s
//! `ProcessSubGraph` (single-rate, squares `cutoff` and folds `resonance`
//! into the feedback coefficient directly). This operation follows the
//! second: it sits in the same file as `GraphNumericAdd`/`GraphNumericIntegral`
//! and needs no oversampling buffer, matching this crate's simpler
//! state-per-node model. See `DESIGN.md` for the full discrepancy note.
//!
//! ```text
//! cutoff'  = cutoff * cutoff
//! rc       = 1 - resonance * cutoff'
//! state0' = rc * state0 - cutoff' * (state1 + input)
//! state1' = rc * state1 + cutoff' * state0'
//! out      = -state1'
//! ```

use sonido_core::{BoundsPreset, InputManager, NodeDataInit, Operation, OutputPort};

#[derive(Debug, Clone, Default)]
pub struct LowpassOperation {
    state0: f32,
    state1: f32,
}

impl Operation for LowpassOperation {
    fn default_data_init(&self) -> NodeDataInit {
        let mut init = NodeDataInit::default();
        init.push_input("Cutoff", 0.5, BoundsPreset::ZeroOne);
        init.push_input("Resonance", 0.5, BoundsPreset::ZeroOne);
        init.push_input("Signal", 0.0, BoundsPreset::Unbounded);
        init.push_output("Out");
        init
    }

    fn reset(&mut self) {
        self.state0 = 0.0;
        self.state1 = 0.0;
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
        let mut last = 0.0;
        for slot in buf.iter_mut() {
            let cutoff = inputs.get_value_next(0);
            let resonance = inputs.get_value_next(1);
            let signal = inputs.get_value_next(2);

            let cutoff_sq = cutoff * cutoff;
            let rc = 1.0 - resonance * cutoff_sq;
            self.state0 = rc * self.state0 - cutoff_sq * (self.state1 + signal);
            self.state1 = rc * self.state1 + cutoff_sq * self.state0;
            last = -self.state1;
            *slot = last;
        }
        out.set_scalar(last);
    }
}
