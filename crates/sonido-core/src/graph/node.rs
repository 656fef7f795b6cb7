//! Node: ports, an embedded Operation, and a run-once-per-tick flag.

#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, string::String, vec::Vec};

use super::ids::{NodeId, TypeId};
use super::input_manager::{InputManager, InputSnapshot};
use super::input_port::InputPort;
use super::operation::Operation;
use super::output_port::OutputPort;

/// Classifies how a node participates in its [`super::group::Group`]'s
/// external interface (resolved from `original_source`'s `NodeType`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeRole {
    /// Processed only transitively, when something downstream pulls it.
    #[default]
    Default,
    /// An audio sink: evaluated unconditionally every `process_subgraph`.
    ExternalOutput,
    /// A visual/meter sink: same unconditional evaluation, UI-facing.
    ExternalVisualOutput,
    /// A group-boundary input: tracked separately so the host can push
    /// values into the graph from outside.
    ExternalInput,
}

/// A node in the graph: input/output ports, interpolation state, and the
/// embedded [`Operation`] that actually does the work.
#[derive(Debug)]
pub struct Node {
    id: NodeId,
    type_id: TypeId,
    name: String,
    role: NodeRole,
    inputs: Vec<InputPort>,
    outputs: Vec<OutputPort>,
    input_manager: InputManager,
    operation: Box<dyn Operation>,
    processed_this_tick: bool,
    last_tick_count: i64,
}

impl Node {
    pub(crate) fn new(
        id: NodeId,
        type_id: TypeId,
        name: impl Into<String>,
        role: NodeRole,
        mut operation: Box<dyn Operation>,
    ) -> Self {
        let init = operation.default_data_init();
        let inputs = init
            .inputs
            .iter()
            .map(|spec| {
                let mut port = InputPort::new(spec.name.clone());
                port.set_bounds(spec.bounds);
                port.set_constant(spec.default);
                port.set_locked(spec.is_constant);
                port.set_visible(spec.visible);
                port.set_editable(spec.editable);
                port.set_size(spec.size);
                port
            })
            .collect();
        let outputs = init
            .outputs
            .iter()
            .map(|spec| OutputPort::new(spec.name.clone()))
            .collect::<Vec<_>>();
        let input_manager = InputManager::new(init.inputs.len());
        operation.reset();
        Self {
            id,
            type_id,
            name: name.into(),
            role,
            inputs,
            outputs,
            input_manager,
            operation,
            processed_this_tick: false,
            last_tick_count: -1,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> NodeRole {
        self.role
    }

    pub fn inputs(&self) -> &[InputPort] {
        &self.inputs
    }

    pub fn inputs_mut(&mut self) -> &mut [InputPort] {
        &mut self.inputs
    }

    pub fn outputs(&self) -> &[OutputPort] {
        &self.outputs
    }

    pub fn outputs_mut(&mut self) -> &mut [OutputPort] {
        &mut self.outputs
    }

    pub fn input_manager_mut(&mut self) -> &mut InputManager {
        &mut self.input_manager
    }

    pub(crate) fn processed_this_tick(&self) -> bool {
        self.processed_this_tick
    }

    pub(crate) fn clear_process_flag(&mut self) {
        self.processed_this_tick = false;
    }

    /// Run this node's `Operation::process` given pre-resolved input
    /// snapshots, then mark it processed for this tick.
    pub(crate) fn run(&mut self, num_samples: usize, snapshots: &[InputSnapshot]) {
        self.input_manager.batch_update(snapshots);
        self.operation
            .process(num_samples, -1, &mut self.input_manager, &mut self.outputs);
        self.processed_this_tick = true;
    }

    /// Frame-idempotent tick: returns `false` without calling the operation
    /// if `tick_count <= last_tick_count`.
    pub(crate) fn tick_self(&mut self, tick_count: i64, elapsed_seconds: f32) -> bool {
        if tick_count <= self.last_tick_count {
            return false;
        }
        self.operation.tick(tick_count, elapsed_seconds);
        self.last_tick_count = tick_count;
        true
    }

    pub fn reset(&mut self) {
        self.operation.reset();
        self.input_manager.reset();
        self.processed_this_tick = false;
    }
}
