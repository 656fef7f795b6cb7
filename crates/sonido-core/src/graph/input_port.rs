//! Input Port: polymorphic input — empty / constant / external value /
//! constant array / upstream output.

#[cfg(not(feature = "std"))]
use alloc::{rc::Rc, string::String, vec::Vec};
#[cfg(feature = "std")]
use std::rc::Rc;

use core::cell::Cell;

use super::ids::{BoundsPreset, Channel, NodeId};

/// A safe stand-in for the source's borrowed `float*` external input.
///
/// The source model (`Input::mInputFloat`) is a raw pointer the graph never
/// owns and which must outlive the node. Raw pointers are unsound to expose
/// in a safe API and this workspace denies `unsafe_code`, so the external
/// value is shared via `Rc<Cell<f32>>` instead: the host holds a clone and
/// writes through it; the node reads through its own clone. Same borrowed-not-owned
/// contract, expressed without raw pointers.
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalValue(Rc<Cell<f32>>);

impl ExternalValue {
    /// Create a new shared external value, initialized to `value`.
    pub fn new(value: f32) -> Self {
        Self(Rc::new(Cell::new(value)))
    }

    /// Read the current value.
    pub fn get(&self) -> f32 {
        self.0.get()
    }

    /// Write a new value (called by the host, not the graph).
    pub fn set(&self, value: f32) {
        self.0.set(value);
    }
}

/// Tagged polymorphic input kind.
#[derive(Debug, Clone, PartialEq)]
pub enum InputKind {
    /// No input bound; reads as `0.0`.
    Empty,
    /// A fixed scalar, clamped to the port's bounds on set.
    Constant(f32),
    /// A value owned and mutated outside the graph.
    ValuePtr(ExternalValue),
    /// A node-owned array, typically used for per-sample custom data.
    ConstantArray(Vec<f32>),
    /// A link to an upstream node's output channel.
    Upstream { node: NodeId, out_channel: Channel },
}

/// A node's input slot: its current binding plus clamp bounds.
#[derive(Debug, Clone)]
pub struct InputPort {
    kind: InputKind,
    bound_min: f32,
    bound_max: f32,
    name: Option<String>,
    locked: bool,
    visible: bool,
    editable: bool,
    size: usize,
}

impl InputPort {
    /// Create an empty, unbounded input port.
    pub fn new(name: impl Into<String>) -> Self {
        let (min, max) = BoundsPreset::Unbounded.range();
        Self {
            kind: InputKind::Empty,
            bound_min: min,
            bound_max: max,
            name: Some(name.into()),
            locked: false,
            visible: true,
            editable: true,
            size: 1,
        }
    }

    /// Declared width for a [`InputKind::ConstantArray`] binding (set by
    /// [`super::node::Node::new`] from [`super::operation::InputSpec::size`]).
    /// [`Self::set_constant_array`] pads/truncates to this length.
    pub fn set_size(&mut self, size: usize) {
        self.size = size.max(1);
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Mark this port constant-only (set by [`super::node::Node::new`] from
    /// the operation's [`super::operation::InputSpec::is_constant`]). A
    /// locked port still accepts [`Self::set_constant`]; only
    /// [`Self::connect`] is refused.
    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    /// `true` if this port refuses upstream links.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// UI hint: should a host show this input at all.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_editable(&mut self, editable: bool) {
        self.editable = editable;
    }

    /// UI hint: should a host let the user type a constant into this input.
    pub fn is_editable(&self) -> bool {
        self.editable
    }

    /// The port's display name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Current binding.
    pub fn kind(&self) -> &InputKind {
        &self.kind
    }

    /// `true` if nothing is bound to this port.
    pub fn is_empty(&self) -> bool {
        matches!(self.kind, InputKind::Empty)
    }

    /// If bound to an upstream node, its `(node, out_channel)`.
    pub fn upstream(&self) -> Option<(NodeId, Channel)> {
        match self.kind {
            InputKind::Upstream { node, out_channel } => Some((node, out_channel)),
            _ => None,
        }
    }

    /// Clear the binding back to `Empty`.
    pub fn clear(&mut self) {
        self.kind = InputKind::Empty;
    }

    /// Bind a clamped constant value.
    pub fn set_constant(&mut self, value: f32) {
        self.kind = InputKind::Constant(self.clamp(value));
    }

    /// Bind an owned constant array, padded with `0.0` or truncated to this
    /// port's declared [`Self::size`].
    pub fn set_constant_array(&mut self, data: &[f32]) {
        let mut owned = data.to_vec();
        owned.resize(self.size, 0.0);
        self.kind = InputKind::ConstantArray(owned);
    }

    /// Bind an externally-owned scalar.
    pub fn set_external(&mut self, value: ExternalValue) {
        self.kind = InputKind::ValuePtr(value);
    }

    /// Bind an upstream link. Fails silently (`false`) if the port is
    /// constant-only ([`Self::is_locked`]) or already occupied — rejected
    /// interactive patch-cabling is a normal UI event, not an error.
    pub fn connect(&mut self, node: NodeId, out_channel: Channel) -> bool {
        if self.locked || !self.is_empty() {
            return false;
        }
        self.kind = InputKind::Upstream { node, out_channel };
        true
    }

    /// Set clamp bounds from a preset or explicit `(min, max)`.
    pub fn set_bounds(&mut self, preset: BoundsPreset) {
        let (min, max) = preset.range();
        self.bound_min = min;
        self.bound_max = max;
        if let InputKind::Constant(v) = self.kind {
            self.kind = InputKind::Constant(self.clamp(v));
        }
    }

    /// Current `(min, max)` clamp bounds.
    pub fn bounds(&self) -> (f32, f32) {
        (self.bound_min, self.bound_max)
    }

    /// Clamp `value` to this port's bounds.
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.bound_min, self.bound_max)
    }

    /// Resolve to a scalar for `Constant` / `ValuePtr` / `ConstantArray[0]`
    /// bindings. Panics if called on an `Upstream` binding — those are read
    /// through the group (see `Group::read_input`).
    pub fn local_scalar(&self) -> f32 {
        let raw = match &self.kind {
            InputKind::Empty => 0.0,
            InputKind::Constant(v) => *v,
            InputKind::ValuePtr(ext) => ext.get(),
            InputKind::ConstantArray(buf) => buf.first().copied().unwrap_or(0.0),
            InputKind::Upstream { .. } => {
                unreachable!("upstream inputs are resolved through the group")
            }
        };
        self.clamp(raw)
    }
}
