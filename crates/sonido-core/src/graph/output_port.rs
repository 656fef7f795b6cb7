//! Output Port: a scalar or a lazily-allocated LOD buffer, tracking
//! whether it was polled this UI frame for cheap downstream-pruning.

#[cfg(not(feature = "std"))]
use alloc::{string::String, vec::Vec};

use core::cell::Cell;

#[cfg(feature = "tracing")]
use tracing::debug;

/// A node's output slot.
///
/// `get(min_size)` lazily allocates `ceil(min_size / lod)` slots the first
/// time a consumer asks for more than a scalar, and grows (never shrinks)
/// the buffer if a later request needs more room than the producer
/// configured this tick (logged as `BufferUnderPoll`; recovered locally).
#[derive(Debug)]
pub struct OutputPort {
    scalar: f32,
    buffer: Option<Vec<f32>>,
    lod: f32,
    polled: Cell<bool>,
    name: Option<String>,
}

impl OutputPort {
    /// Create an output port with the given display name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            scalar: 0.0,
            buffer: None,
            lod: 1.0,
            polled: Cell::new(false),
            name: Some(name.into()),
        }
    }

    /// The port's display name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Current LOD (samples-per-step) the producer last configured.
    pub fn lod(&self) -> f32 {
        self.lod
    }

    /// `true` if any consumer has accessed this port since the last
    /// [`reset_poll_state`](Self::reset_poll_state).
    pub fn polled(&self) -> bool {
        self.polled.get()
    }

    /// Clear the polled flag. Called by the schema between UI frames, not
    /// between audio blocks.
    pub fn reset_poll_state(&mut self) {
        self.polled.set(false);
    }

    /// Write the scalar form of this output (used by operations with no
    /// per-sample buffer, e.g. a constant-producing node).
    pub fn set_scalar(&mut self, value: f32) {
        self.scalar = value;
    }

    /// Obtain the write buffer for this tick's `process`, allocating or
    /// growing it to `ceil(min_size / lod)` slots. `lod` must be in
    /// `[1.0, min_size]`; the producer calls this once per `process`.
    pub fn get_iterator_mut(&mut self, min_size: usize, lod: f32) -> &mut [f32] {
        let min_size = min_size.max(1);
        self.lod = lod.clamp(1.0, min_size as f32);
        let slots = ((min_size as f32) / self.lod).ceil() as usize;
        let buf = self.buffer.get_or_insert_with(Vec::new);
        if buf.len() < slots {
            buf.resize(slots, self.scalar);
        }
        &mut buf[..slots]
    }

    /// Read access for a consumer requesting `min_size` samples worth of
    /// buffer. Marks `polled`. Grows the buffer (with a debug-level warning)
    /// if the producer configured fewer slots than this request needs.
    pub fn get(&mut self, min_size: usize) -> &[f32] {
        self.polled.set(true);
        if min_size <= 1 {
            return core::slice::from_ref(&self.scalar);
        }
        let slots = ((min_size as f32) / self.lod).ceil() as usize;
        match &mut self.buffer {
            Some(buf) if buf.len() >= slots => buf.as_slice(),
            Some(buf) => {
                #[cfg(feature = "tracing")]
                debug!(
                    requested = slots,
                    available = buf.len(),
                    "BufferUnderPoll: growing output buffer"
                );
                buf.resize(slots, self.scalar);
                buf.as_slice()
            }
            None => {
                self.buffer = Some(alloc_filled(slots, self.scalar));
                self.buffer.as_deref().unwrap_or(&[])
            }
        }
    }

    /// Read the scalar form, marking `polled`.
    pub fn get_scalar(&self) -> f32 {
        self.polled.set(true);
        self.scalar
    }
}

#[cfg(not(feature = "std"))]
fn alloc_filled(len: usize, value: f32) -> Vec<f32> {
    let mut v = Vec::with_capacity(len);
    v.resize(len, value);
    v
}

#[cfg(feature = "std")]
fn alloc_filled(len: usize, value: f32) -> Vec<f32> {
    vec![value; len]
}
