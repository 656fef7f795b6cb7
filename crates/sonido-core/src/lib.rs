//! Sonido Core - node-graph processing engine for audio/control DSP
//!
//! This crate provides the pull-based dataflow graph that evaluates a patch
//! of DSP operations: a [`graph::Group`] owns an arena of [`graph::Node`]s,
//! each wrapping a pluggable [`graph::Operation`]. Evaluation walks backward
//! from sinks, running each node's upstream dependencies before the node
//! itself runs, at most once per block.
//!
//! # Core Abstractions
//!
//! ## The Graph
//!
//! - [`graph::Group`] - node arena, connection/cycle policy, pull evaluation
//! - [`graph::Node`] - ports + an embedded [`graph::Operation`]
//! - [`graph::Operation`] - pluggable per-node behavior
//! - [`graph::InputPort`] / [`graph::OutputPort`] - polymorphic input, LOD'd output
//! - [`graph::InputManager`] - per-input interpolation (sampled / RWA / tween)
//! - [`graph::ValueIterator`] / [`graph::SmoothedIterator`] - LOD-aware read cursors
//!
//! ## Shared Utilities
//!
//! - [`math::flush_denormal`] - subnormal guard for feedback accumulators
//!   (RWA filters, tween states)
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible for embedded hosts. Disable the default
//! `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! sonido-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: no locks, no I/O, no sleeping inside `Operation::process`
//! - **No `unsafe`**: the workspace denies `unsafe_code`; cyclic-pointer-style
//!   graph evaluation is done via per-block owned snapshots instead of raw
//!   pointers or self-referential borrows
//! - **No dependencies on std**: pure `no_std` with `libm` for math

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod graph;
pub mod math;

pub use graph::{
    BatchDriver, BoundsPreset, Channel, CopyOperation, ExternalValue, Group, InputKind,
    InputManager, InputPort, InputSnapshot, InterpMode, Node, NodeDataInit, NodeId, NodeRole,
    Operation, OutputPort, Source, SmoothedIterator, TypeId, ValueIterator,
};
pub use math::flush_denormal;
