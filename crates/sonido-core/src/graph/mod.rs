//! The node-graph processing core: arena, ports, operations, and the
//! pull-based evaluator that ties them together.
//!
//! A [`Group`] owns an arena of [`Node`]s, each wrapping a pluggable
//! [`Operation`]. Evaluation is pull-based: [`Group::process_subgraph`] walks
//! backward from sinks, running each node's upstream dependencies before the
//! node itself, at most once per block (diamond-dependency safety).

pub mod batching;
pub mod copy_op;
pub mod ids;
pub mod input_manager;
pub mod input_port;
pub mod iterator;
pub mod node;
pub mod operation;
pub mod output_port;

mod group;

pub use batching::BatchDriver;
pub use copy_op::CopyOperation;
pub use group::Group;
pub use ids::{BoundsPreset, Channel, NodeId, Source, TypeId};
pub use input_manager::{InputManager, InputSnapshot, InterpMode};
pub use input_port::{ExternalValue, InputKind, InputPort};
pub use iterator::{SmoothedIterator, ValueIterator, MIN_RWA_CONVERGENCE, RWA_DAMPING};
pub use node::{Node, NodeRole};
pub use operation::{InputSpec, NodeDataInit, Operation, OutputSpec};
pub use output_port::OutputPort;
