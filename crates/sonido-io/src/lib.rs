//! Host loop and audio device I/O for the sonido node graph.
//!
//! - [`host_loop`]: drives a [`sonido_registry::Schema`] the way a real host
//!   does — `tick` once per UI frame, `process_subgraph` once per audio
//!   block — and documents the MIDI event / audio ring contracts as traits
//!   without implementing the platform back-ends they name (those stay out
//!   of scope here).
//! - [`backend`]/[`cpal_backend`]: a pluggable `AudioBackend` trait plus a
//!   default cpal implementation, used to bind a real device to the ring
//!   traits in `host_loop`.
//! - [`stream`]: cpal device enumeration helpers.

/// Pluggable audio backend trait.
pub mod backend;
/// Default cpal-based `AudioBackend`.
pub mod cpal_backend;
/// Host loop driver and MIDI/audio-ring trait contracts.
pub mod host_loop;
mod stream;

pub use backend::{AudioBackend, BackendStreamConfig, StreamHandle};
pub use cpal_backend::CpalBackend;
pub use stream::{default_device, list_devices};

/// Audio device information.
#[derive(Debug, Clone)]
pub struct AudioDevice {
    pub name: String,
    pub is_input: bool,
    pub is_output: bool,
    pub default_sample_rate: u32,
}

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Audio stream setup or runtime error.
    #[error("Audio stream error: {0}")]
    Stream(String),

    /// No audio device available on the system.
    #[error("No audio device available")]
    NoDevice,

    /// The requested audio device was not found.
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
