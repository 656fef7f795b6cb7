//! Identity pass-through operation used for a [`super::group::Group`]'s
//! implicit input/output boundary nodes.
//!
//! Grounded on `original_source`'s `GraphDataCopy`: a fixed number of named
//! inputs ("In 0".."In N-1") mirrored one-for-one onto named outputs
//! ("Out 0".."Out N-1").

#[cfg(not(feature = "std"))]
use alloc::{format, vec::Vec};

use super::ids::BoundsPreset;
use super::input_manager::InputManager;
use super::operation::{NodeDataInit, Operation};
use super::output_port::OutputPort;

/// Identity operation with `channels` inputs copied straight to `channels`
/// outputs, sample for sample.
#[derive(Debug, Clone)]
pub struct CopyOperation {
    channels: usize,
}

impl CopyOperation {
    pub fn new(channels: usize) -> Self {
        Self { channels }
    }
}

impl Operation for CopyOperation {
    fn default_data_init(&self) -> NodeDataInit {
        let mut init = NodeDataInit::default();
        for ch in 0..self.channels {
            init.push_input(format!("In {ch}"), 0.0, BoundsPreset::Unbounded);
            init.push_output(format!("Out {ch}"));
        }
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
        for ch in 0..self.channels.min(outputs.len()) {
            let buf = outputs[ch].get_iterator_mut(num_samples, 1.0);
            let mut last = 0.0;
            for slot in buf.iter_mut() {
                last = inputs.get_value_next(ch);
                *slot = last;
            }
            outputs[ch].set_scalar(last);
        }
    }
}
