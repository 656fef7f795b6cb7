//! Operation: pluggable per-node behavior.

#[cfg(not(feature = "std"))]
use alloc::{string::String, vec::Vec};

use super::input_manager::InputManager;
use super::output_port::OutputPort;

/// One input declaration emitted by [`Operation::default_data_init`].
///
/// Mirrors `original_source`'s per-input `NodeGraphOp` declaration vocabulary
/// (`DefaultDataInit` plus the `IsDataVisible`/`IsDataEditable` virtuals seen
/// on e.g. `GraphSourceConstants`): name, default, bounds, whether the slot
/// accepts an upstream patch cable at all (`is_constant`), how many scalars
/// it holds (`size`, for [`super::input_port::InputKind::ConstantArray`]
/// inputs), and whether a host UI should show/let the user edit it.
#[derive(Debug, Clone)]
pub struct InputSpec {
    pub name: String,
    pub default: f32,
    pub bounds: super::ids::BoundsPreset,
    pub is_constant: bool,
    pub size: usize,
    pub visible: bool,
    pub editable: bool,
}

/// One output declaration emitted by [`Operation::default_data_init`].
#[derive(Debug, Clone)]
pub struct OutputSpec {
    pub name: String,
}

/// Port declarations an operation registers once, at construction.
#[derive(Debug, Clone, Default)]
pub struct NodeDataInit {
    pub inputs: Vec<InputSpec>,
    pub outputs: Vec<OutputSpec>,
}

impl NodeDataInit {
    /// A patchable input: bindable to either a constant or an upstream link.
    pub fn push_input(&mut self, name: impl Into<String>, default: f32, bounds: super::ids::BoundsPreset) {
        self.inputs.push(InputSpec {
            name: name.into(),
            default,
            bounds,
            is_constant: false,
            size: 1,
            visible: true,
            editable: true,
        });
    }

    /// A constant-only input: the node forces its bound value through its
    /// own bounds every run (as `GraphSourceConstants::ProcessSubGraph`
    /// does) and [`super::group::Group::connect`] refuses to patch an
    /// upstream link onto it.
    pub fn push_constant_input(&mut self, name: impl Into<String>, default: f32, bounds: super::ids::BoundsPreset) {
        self.inputs.push(InputSpec {
            name: name.into(),
            default,
            bounds,
            is_constant: true,
            size: 1,
            visible: true,
            editable: true,
        });
    }

    pub fn push_output(&mut self, name: impl Into<String>) {
        self.outputs.push(OutputSpec { name: name.into() });
    }
}

/// Per-node behavior plugged into the generic [`super::node::Node`].
///
/// Implementations must not allocate beyond first-use buffer growth, sleep,
/// lock, or perform I/O from `process` — the audio thread calling it is
/// wait-free.
pub trait Operation: core::fmt::Debug {
    /// Declare this operation's inputs/outputs. Called once at construction.
    fn default_data_init(&self) -> NodeDataInit;

    /// Re-apply defaults and clear any filter/tween state.
    fn reset(&mut self);

    /// Once-per-UI-frame hook: MIDI polling, clock advance, device rebinding.
    /// Monotone in `tick_count`; the node guarantees this runs at most once
    /// per `tick_count`.
    fn tick(&mut self, tick_count: i64, elapsed_seconds: f32) {
        let _ = (tick_count, elapsed_seconds);
    }

    /// Produce `num_samples` into each output. `num_cache_samples` (-1 by
    /// default) lets an operation request a larger internal cache than the
    /// minimum output size without changing what it publishes.
    fn process(
        &mut self,
        num_samples: usize,
        num_cache_samples: i64,
        inputs: &mut InputManager,
        outputs: &mut [OutputPort],
    );
}
