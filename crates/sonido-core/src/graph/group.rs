//! Group: the node arena plus its sentinel input/output boundary nodes.

#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, string::String, vec, vec::Vec};

use super::copy_op::CopyOperation;
use super::ids::{Channel, NodeId, TypeId};
use super::input_manager::InputSnapshot;
use super::node::{Node, NodeRole};
use super::operation::Operation;

/// A node arena with two implicit identity nodes forming its external
/// interface, and a set of output-sinks evaluated unconditionally every
/// `process_subgraph` (resolved from `original_source`'s `NodeGraphGroup`).
#[derive(Debug)]
pub struct Group {
    nodes: Vec<Option<Node>>,
    next_id: u32,
    input_node: NodeId,
    output_node: NodeId,
    external_output_nodes: Vec<NodeId>,
    external_input_nodes: Vec<NodeId>,
    last_tick_count: i64,
}

impl Group {
    /// Create an empty group with `num_inputs`/`num_outputs` boundary
    /// channels on its sentinel Copy nodes.
    pub fn new(num_inputs: usize, num_outputs: usize) -> Self {
        let mut group = Self {
            nodes: vec![None],
            next_id: 1,
            input_node: NodeId(0),
            output_node: NodeId(0),
            external_output_nodes: Vec::new(),
            external_input_nodes: Vec::new(),
            last_tick_count: -1,
        };
        let input_type = TypeId(0);
        let output_type = TypeId(0);
        group.input_node = group.insert_node(
            input_type,
            "Group Input",
            NodeRole::Default,
            Box::new(CopyOperation::new(num_inputs.max(1))),
        );
        group.output_node = group.insert_node(
            output_type,
            "Group Output",
            NodeRole::Default,
            Box::new(CopyOperation::new(num_outputs.max(1))),
        );
        group
    }

    fn insert_node(
        &mut self,
        type_id: TypeId,
        name: impl Into<String>,
        role: NodeRole,
        operation: Box<dyn Operation>,
    ) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        let node = Node::new(id, type_id, name, role, operation);
        if id.index() >= self.nodes.len() {
            self.nodes.resize_with(id.index() + 1, || None);
        }
        self.nodes[id.index()] = Some(node);
        match role {
            NodeRole::ExternalOutput | NodeRole::ExternalVisualOutput => {
                self.external_output_nodes.push(id);
            }
            NodeRole::ExternalInput => self.external_input_nodes.push(id),
            NodeRole::Default => {}
        }
        id
    }

    /// Create a new node of the given type, role, and behavior.
    pub fn new_node(
        &mut self,
        type_id: TypeId,
        name: impl Into<String>,
        role: NodeRole,
        operation: Box<dyn Operation>,
    ) -> NodeId {
        self.insert_node(type_id, name, role, operation)
    }

    /// The group's implicit input-boundary node id.
    pub fn input_node_id(&self) -> NodeId {
        self.input_node
    }

    /// The group's implicit output-boundary node id.
    pub fn output_node_id(&self) -> NodeId {
        self.output_node
    }

    /// Sink node ids (`ExternalOutput` / `ExternalVisualOutput`).
    pub fn external_output_nodes(&self) -> &[NodeId] {
        &self.external_output_nodes
    }

    /// `ExternalInput` node ids.
    pub fn external_input_nodes(&self) -> &[NodeId] {
        &self.external_input_nodes
    }

    /// Look up a node by id.
    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index()).and_then(|n| n.as_ref())
    }

    /// Look up a node mutably by id.
    pub fn get_node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index()).and_then(|n| n.as_mut())
    }

    /// `true` if `id` names a live node.
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.get_node(id).is_some()
    }

    /// All live node ids, in creation order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| n.as_ref().map(|_| NodeId(i as u32)))
    }

    /// Remove a node: drops it from the sink/external-input lists, detaches
    /// it from every other node's inputs (dangling links become `Empty`),
    /// then removes it from the arena.
    pub fn remove_node(&mut self, id: NodeId) -> bool {
        if !self.contains_node(id) {
            return false;
        }
        self.external_output_nodes.retain(|&n| n != id);
        self.external_input_nodes.retain(|&n| n != id);
        for slot in &mut self.nodes {
            if let Some(node) = slot {
                if node.id() == id {
                    continue;
                }
                for input in node.inputs_mut() {
                    if input.upstream().is_some_and(|(n, _)| n == id) {
                        input.clear();
                    }
                }
            }
        }
        self.nodes[id.index()] = None;
        true
    }

    /// Does `start` transitively depend on `target` through its existing
    /// upstream links? Used to refuse connections that would form a cycle.
    fn can_reach(&self, start: NodeId, target: NodeId) -> bool {
        let mut stack = vec![start];
        let mut visited = Vec::new();
        while let Some(id) = stack.pop() {
            if id == target {
                return true;
            }
            if visited.contains(&id) {
                continue;
            }
            visited.push(id);
            if let Some(node) = self.get_node(id) {
                for input in node.inputs() {
                    if let Some((up, _)) = input.upstream() {
                        stack.push(up);
                    }
                }
            }
        }
        false
    }

    /// Connect `(src, src_ch)` to `(dst, dst_ch)`. Fails (`false`, no state
    /// change) if either channel is out of range, the destination port is
    /// already occupied, or the link would create a cycle.
    pub fn connect(&mut self, src: NodeId, src_ch: Channel, dst: NodeId, dst_ch: Channel) -> bool {
        let Some(src_node) = self.get_node(src) else {
            return false;
        };
        if src_ch as usize >= src_node.outputs().len() {
            return false;
        }
        let Some(dst_node) = self.get_node(dst) else {
            return false;
        };
        if dst_ch as usize >= dst_node.inputs().len() {
            return false;
        }
        if !dst_node.inputs()[dst_ch as usize].is_empty() {
            return false;
        }
        if self.can_reach(src, dst) {
            return false;
        }
        let Some(dst_node) = self.get_node_mut(dst) else {
            return false;
        };
        dst_node.inputs_mut()[dst_ch as usize].connect(src, src_ch)
    }

    /// Disconnect whatever is bound to `(dst, dst_ch)`.
    pub fn disconnect(&mut self, dst: NodeId, dst_ch: Channel) -> bool {
        let Some(node) = self.get_node_mut(dst) else {
            return false;
        };
        let Some(input) = node.inputs_mut().get_mut(dst_ch as usize) else {
            return false;
        };
        if input.is_empty() {
            return false;
        }
        input.clear();
        true
    }

    /// Once-per-UI-frame tick over every node, frame-idempotent and
    /// respecting upstream-before-downstream order.
    pub fn tick(&mut self, tick_count: i64, elapsed_seconds: f32) {
        if tick_count <= self.last_tick_count {
            return;
        }
        let ids: Vec<NodeId> = self.node_ids().collect();
        for id in ids {
            self.tick_node(id, tick_count, elapsed_seconds);
        }
        self.last_tick_count = tick_count;
    }

    fn tick_node(&mut self, id: NodeId, tick_count: i64, elapsed_seconds: f32) {
        let Some(node) = self.get_node(id) else {
            return;
        };
        // Already-ticked nodes return immediately inside `tick_self`, but we
        // still need to recurse into upstream nodes first.
        let upstream: Vec<NodeId> = node.inputs().iter().filter_map(|i| i.upstream()).map(|(n, _)| n).collect();
        for up in upstream {
            self.tick_node(up, tick_count, elapsed_seconds);
        }
        if let Some(node) = self.get_node_mut(id) {
            node.tick_self(tick_count, elapsed_seconds);
        }
    }

    /// Clear every node's `processed_this_tick` flag.
    pub fn clear_process_flags(&mut self) {
        for slot in &mut self.nodes {
            if let Some(node) = slot {
                node.clear_process_flag();
            }
        }
    }

    /// Evaluate `num_samples` of audio: clears process flags, then pulls
    /// every sink (`ExternalOutput`/`ExternalVisualOutput`) plus the group's
    /// own output-boundary node.
    pub fn process_subgraph(&mut self, num_samples: usize) {
        self.clear_process_flags();
        let output_node = self.output_node;
        let sinks: Vec<NodeId> = self
            .external_output_nodes
            .iter()
            .copied()
            .chain(core::iter::once(output_node))
            .collect();
        for sink in sinks {
            self.process_operation(sink, num_samples);
        }
    }

    /// Diamond-safe recursive pull: upstream nodes are fully processed
    /// before `id` runs, and `id` runs at most once per `process_subgraph`.
    fn process_operation(&mut self, id: NodeId, num_samples: usize) {
        let Some(node) = self.get_node(id) else {
            return;
        };
        if node.processed_this_tick() {
            return;
        }
        let upstream: Vec<NodeId> = node.inputs().iter().filter_map(|i| i.upstream()).map(|(n, _)| n).collect();
        for up in upstream {
            self.process_operation(up, num_samples);
        }
        let snapshots = self.collect_input_snapshots(id, num_samples);
        if let Some(node) = self.get_node_mut(id) {
            node.run(num_samples, &snapshots);
        }
    }

    /// Resolve every input on `id` into an owned snapshot for this `process`
    /// call. `Upstream` inputs read their producer's LOD buffer (growing it
    /// and logging a `BufferUnderPoll` warning if a larger size is now
    /// needed); everything else resolves to a local scalar.
    fn collect_input_snapshots(&mut self, id: NodeId, num_samples: usize) -> Vec<InputSnapshot> {
        let Some(node) = self.get_node(id) else {
            return Vec::new();
        };
        // Resolve bindings first so we're not holding a borrow of `node`
        // while we go fetch each upstream's output (a different node).
        enum Binding {
            Upstream(NodeId, Channel),
            Local(f32),
        }
        let bindings: Vec<Binding> = node
            .inputs()
            .iter()
            .map(|input| match input.upstream() {
                Some((src, ch)) => Binding::Upstream(src, ch),
                None => Binding::Local(input.local_scalar()),
            })
            .collect();

        bindings
            .into_iter()
            .map(|binding| match binding {
                Binding::Upstream(src, ch) => {
                    let Some(src_node) = self.get_node_mut(src) else {
                        return InputSnapshot::Scalar(0.0);
                    };
                    let Some(out) = src_node.outputs_mut().get_mut(ch as usize) else {
                        return InputSnapshot::Scalar(0.0);
                    };
                    let lod = out.lod();
                    let data = out.get(num_samples.max(1)).to_vec();
                    InputSnapshot::Buffer { data, lod }
                }
                Binding::Local(v) => InputSnapshot::Scalar(v),
            })
            .collect()
    }

    /// Reset every node: re-applies operation defaults, clears filter state.
    pub fn reset_all(&mut self) {
        for slot in &mut self.nodes {
            if let Some(node) = slot {
                node.reset();
            }
        }
        self.last_tick_count = -1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ids::BoundsPreset;
    use crate::graph::input_manager::InputManager;
    use crate::graph::operation::NodeDataInit;

    /// Two-input adder, local to this test module — `sonido-core` can't
    /// depend on `sonido-registry`'s builtin catalog, so `process_subgraph`
    /// needs its own minimal multi-node fixture.
    #[derive(Debug, Clone, Default)]
    struct AddOp;

    impl Operation for AddOp {
        fn default_data_init(&self) -> NodeDataInit {
            let mut init = NodeDataInit::default();
            init.push_input("A", 0.0, BoundsPreset::Unbounded);
            init.push_input("B", 0.0, BoundsPreset::Unbounded);
            init.push_output("Sum");
            init
        }

        fn reset(&mut self) {}

        fn process(&mut self, num_samples: usize, _cache: i64, inputs: &mut InputManager, outputs: &mut [super::super::output_port::OutputPort]) {
            let out = &mut outputs[0];
            let buf = out.get_iterator_mut(num_samples, 1.0);
            let mut last = 0.0;
            for slot in buf.iter_mut() {
                last = inputs.get_value_next(0) + inputs.get_value_next(1);
                *slot = last;
            }
            out.set_scalar(last);
        }
    }

    /// An operation with one constant-only input, to exercise
    /// [`InputSpec::is_constant`](super::super::operation::InputSpec).
    #[derive(Debug, Clone, Default)]
    struct LockedInputOp;

    impl Operation for LockedInputOp {
        fn default_data_init(&self) -> NodeDataInit {
            let mut init = NodeDataInit::default();
            init.push_constant_input("Mode", 0.0, BoundsPreset::Unbounded);
            init.push_output("Out");
            init
        }

        fn reset(&mut self) {}

        fn process(&mut self, num_samples: usize, _cache: i64, inputs: &mut InputManager, outputs: &mut [super::super::output_port::OutputPort]) {
            let out = &mut outputs[0];
            let buf = out.get_iterator_mut(num_samples, 1.0);
            for slot in buf.iter_mut() {
                *slot = inputs.get_value_next(0);
            }
        }
    }

    #[test]
    fn process_subgraph_pulls_constants_through_an_add_node() {
        let mut group = Group::new(0, 1);
        let add = group.new_node(TypeId(1), "Add", NodeRole::Default, Box::new(AddOp));
        group.get_node_mut(add).unwrap().inputs_mut()[0].set_constant(1.8);
        group.get_node_mut(add).unwrap().inputs_mut()[1].set_constant(2.3);

        let output = group.output_node_id();
        assert!(group.connect(add, 0, output, 0));

        group.process_subgraph(1);
        let result = group.get_node_mut(output).unwrap().outputs_mut()[0].get(1)[0];
        assert!((result - 4.1).abs() < 1e-4);
    }

    #[test]
    fn process_subgraph_runs_a_diamond_dependency_only_once() {
        // add1 -> add2 (both of add2's inputs), diamond-shaped: add2 must pull
        // add1 exactly once even though two of its inputs point at it.
        let mut group = Group::new(0, 1);
        let add1 = group.new_node(TypeId(1), "Add1", NodeRole::Default, Box::new(AddOp));
        group.get_node_mut(add1).unwrap().inputs_mut()[0].set_constant(1.0);
        group.get_node_mut(add1).unwrap().inputs_mut()[1].set_constant(1.0);

        let add2 = group.new_node(TypeId(1), "Add2", NodeRole::Default, Box::new(AddOp));
        assert!(group.connect(add1, 0, add2, 0));
        assert!(group.connect(add1, 0, add2, 1));

        let output = group.output_node_id();
        assert!(group.connect(add2, 0, output, 0));

        group.process_subgraph(1);
        let result = group.get_node_mut(output).unwrap().outputs_mut()[0].get(1)[0];
        assert!((result - 4.0).abs() < 1e-6, "expected 2.0 + 2.0, got {result}");
    }

    #[test]
    fn connect_is_refused_onto_a_constant_only_input() {
        let mut group = Group::new(0, 1);
        let source = group.new_node(TypeId(1), "Src", NodeRole::Default, Box::new(AddOp));
        let locked = group.new_node(TypeId(2), "Locked", NodeRole::Default, Box::new(LockedInputOp));
        assert!(!group.connect(source, 0, locked, 0));
        assert!(group.get_node(locked).unwrap().inputs()[0].is_empty());
    }

    #[test]
    fn reset_all_clears_node_state_across_the_group() {
        let mut group = Group::new(0, 1);
        let add = group.new_node(TypeId(1), "Add", NodeRole::Default, Box::new(AddOp));
        group.get_node_mut(add).unwrap().inputs_mut()[0].set_constant(5.0);
        group.get_node_mut(add).unwrap().inputs_mut()[1].set_constant(5.0);
        group.process_subgraph(1);
        group.reset_all();
        // Constants survive reset (only filter/tween state is cleared) —
        // re-running without reconnecting still produces the same sum.
        group.process_subgraph(1);
        let out = group.get_node(add).unwrap().outputs()[0].get(1)[0];
        assert!((out - 10.0).abs() < 1e-6);
    }
}
