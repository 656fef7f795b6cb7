//! Configuration and serialization for the sonido node graph.
//!
//! - [`topology`]: the JSON topology format — saves/loads a
//!   [`sonido_registry::ArchiveData`] snapshot of a [`sonido_registry::Schema`].
//! - [`GraphDefaults`]: a small TOML settings file (bounds preset aliases,
//!   default LOD) layered beneath the JSON topology.
//! - [`paths`]: platform-specific directories for saved graphs/config.

mod defaults;
mod error;

/// Platform-specific paths for saved graphs and configuration.
pub mod paths;

/// Topology JSON serializer.
pub mod topology;

pub use defaults::{BoundsAlias, GraphDefaults};
pub use error::ConfigError;
