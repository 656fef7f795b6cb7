//! Builtin operation catalog.
//!
//! These aren't handed to us as a struct list anywhere; concrete operations
//! just need to exist for the graph to be exercisable, so they're implemented
//! here and registered into the [`crate::Schema`]'s type table. Each is
//! grounded on
//! `original_source/packages/nodegraph/source/common/NodeGraphOperations.cpp`
//! unless noted otherwise.

mod add;
mod integral;
mod lowpass;
mod sine2;

pub use add::AddOperation;
pub use integral::IntegralOperation;
pub use lowpass::LowpassOperation;
pub use sine2::Sine2Operation;
