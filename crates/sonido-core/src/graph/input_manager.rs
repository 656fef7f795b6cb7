//! Input Manager: per-input interpolation state.
//!
//! Holds one slot per operation-declared input, plus *virtual* slots at
//! indices beyond the declared input count for operation-internal
//! interpolators (e.g. an envelope's attack/release targets). Each slot owns
//! its working data rather than borrowing a [`super::iterator::ValueIterator`]
//! across calls — `batch_update` hands each slot a fresh snapshot every
//! `process`, so the slot keeps its own `(position, increment)` pair and
//! steps it inline using the same rule `ValueIterator` uses, rather than
//! embedding a self-referential borrow.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use super::iterator::{rwa_coeff, step_increment, MIN_RWA_CONVERGENCE, RWA_DAMPING};
use crate::math::flush_denormal;

/// One value snapshot resolved for an input this `process` call — either a
/// constant scalar or a cloned buffer of samples at some LOD.
#[derive(Debug, Clone)]
pub enum InputSnapshot {
    /// A constant for the whole block.
    Scalar(f32),
    /// `len` samples at the given LOD (samples-per-slot).
    Buffer { data: Vec<f32>, lod: f32 },
}

/// Interpolation mode for an input slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpMode {
    /// Zero-order hold at the source's LOD, no smoothing.
    Sampled,
    /// First-order smoothing, time constant driven by source LOD.
    SampledRwa,
    /// Zero-order hold into an owned array.
    ConstantArray,
    /// Cubic/ease tween over a sample count.
    CustomInterpTween,
    /// Same as `CustomInterpTween`, duration specified in milliseconds.
    CustomInterpTweenMs,
    /// First-order IIR with a millisecond-specified time constant.
    CustomInterpRwaMs,
}

#[derive(Debug, Clone)]
struct Slot {
    mode: InterpMode,
    update_rate: usize,
    duration_samples: f32,
    data: Vec<f32>,
    position: f32,
    increment: f32,
    rwa_state: f32,
    rwa_coeff: f32,
    tween_from: f32,
    tween_to: f32,
    tween_step: f32,
    tween_progress: f32,
    current: f32,
}

impl Slot {
    fn new(mode: InterpMode) -> Self {
        Self {
            mode,
            update_rate: 256,
            duration_samples: 0.0,
            data: Vec::new(),
            position: 0.0,
            increment: 1.0,
            rwa_state: 0.0,
            rwa_coeff: 0.0,
            tween_from: 0.0,
            tween_to: 0.0,
            tween_step: 1.0,
            tween_progress: 1.0,
            current: 0.0,
        }
    }
}

/// Per-input interpolation state for a single node.
#[derive(Debug, Clone)]
pub struct InputManager {
    slots: Vec<Slot>,
}

impl InputManager {
    /// Create a manager with `num_inputs` slots, all defaulting to `Sampled`.
    pub fn new(num_inputs: usize) -> Self {
        Self {
            slots: (0..num_inputs).map(|_| Slot::new(InterpMode::Sampled)).collect(),
        }
    }

    /// Declare an extra, operation-internal slot and return its index.
    pub fn declare_virtual_slot(&mut self, mode: InterpMode) -> usize {
        self.slots.push(Slot::new(mode));
        self.slots.len() - 1
    }

    /// Change a slot's interpolation mode (e.g. to opt an input into RWA
    /// smoothing or a ms-based tween).
    pub fn set_mode(&mut self, slot: usize, mode: InterpMode) {
        if let Some(s) = self.slots.get_mut(slot) {
            s.mode = mode;
        }
    }

    /// Reset all slots to their initial (unfiltered, zero) state.
    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            slot.data.clear();
            slot.position = 0.0;
            slot.rwa_state = 0.0;
            slot.current = 0.0;
            slot.tween_progress = 1.0;
        }
    }

    /// Called at the start of `process`: binds each slot's source data for
    /// this block without advancing anything.
    pub fn batch_update(&mut self, snapshots: &[InputSnapshot]) {
        for (slot, snap) in self.slots.iter_mut().zip(snapshots) {
            match slot.mode {
                InterpMode::Sampled | InterpMode::SampledRwa => {
                    let (data, lod) = match snap {
                        InputSnapshot::Buffer { data, lod } => (data.clone(), *lod),
                        InputSnapshot::Scalar(v) => (vec![*v], 1.0),
                    };
                    slot.increment = step_increment(lod);
                    slot.position = slot.increment * 0.5;
                    slot.data = data;
                    if slot.mode == InterpMode::SampledRwa {
                        let ticks = MIN_RWA_CONVERGENCE.max(1.0 / slot.increment);
                        slot.rwa_coeff = rwa_coeff(ticks, RWA_DAMPING);
                    }
                }
                InterpMode::ConstantArray => {
                    if let InputSnapshot::Buffer { data, .. } = snap {
                        slot.data = data.clone();
                        slot.position = 0.0;
                        slot.increment = 1.0;
                    }
                }
                // Tween/ms-RWA slots are operation-driven; batch_update does
                // not rebind them (resolved from original_source's
                // `NodeInput::ProcessUpdate`, which leaves INTERPOLATED_MS
                // alone here).
                InterpMode::CustomInterpTween
                | InterpMode::CustomInterpTweenMs
                | InterpMode::CustomInterpRwaMs => {}
            }
        }
    }

    /// Called once per "slow update" window: retargets RWA slots from
    /// the upstream scalar and sets the filter's convergence to `update_rate`
    /// samples. `CustomInterpTweenMs`/`CustomInterpRwaMs` are **not** touched
    /// here — the operation must call [`set_target`](Self::set_target)
    /// itself (resolved from `original_source`'s `NodeInput::NodeUpdate`,
    /// which explicitly skips `CUSTOM_VALUE_INTERP_MS`).
    pub fn node_update(&mut self, update_rate: usize) {
        for slot in &mut self.slots {
            if slot.mode == InterpMode::SampledRwa {
                slot.update_rate = update_rate;
                let ticks = MIN_RWA_CONVERGENCE.max(update_rate as f32);
                slot.rwa_coeff = rwa_coeff(ticks, RWA_DAMPING);
            }
        }
    }

    /// Operation-controlled retarget for tween/RWA-ms slots.
    pub fn set_target(&mut self, slot: usize, value: f32) {
        if let Some(s) = self.slots.get_mut(slot) {
            match s.mode {
                InterpMode::CustomInterpTween | InterpMode::CustomInterpTweenMs => {
                    s.tween_from = s.current;
                    s.tween_to = value;
                    s.tween_progress = 0.0;
                }
                InterpMode::CustomInterpRwaMs => {
                    s.tween_to = value;
                }
                _ => {}
            }
        }
    }

    /// Set the tween/RWA-ms duration. `samples` is the duration expressed in
    /// samples; callers with a millisecond duration convert via
    /// [`crate::math::ms_to_samples`] first.
    pub fn set_duration(&mut self, slot: usize, samples: f32) {
        if let Some(s) = self.slots.get_mut(slot) {
            s.duration_samples = samples.max(1.0);
            match s.mode {
                InterpMode::CustomInterpTween | InterpMode::CustomInterpTweenMs => {
                    s.tween_step = 1.0 / s.duration_samples;
                }
                InterpMode::CustomInterpRwaMs => {
                    s.rwa_coeff = rwa_coeff(s.duration_samples, RWA_DAMPING);
                }
                _ => {}
            }
        }
    }

    /// Read the slot's next value, advancing its internal step.
    pub fn get_value_next(&mut self, slot: usize) -> f32 {
        let Some(s) = self.slots.get_mut(slot) else {
            return 0.0;
        };
        s.current = match s.mode {
            InterpMode::Sampled | InterpMode::ConstantArray => {
                let idx = (s.position as usize).min(s.data.len().saturating_sub(1));
                let v = s.data.get(idx).copied().unwrap_or(0.0);
                s.position += s.increment;
                v
            }
            InterpMode::SampledRwa => {
                let idx = (s.position as usize).min(s.data.len().saturating_sub(1));
                let target = s.data.get(idx).copied().unwrap_or(0.0);
                s.position += s.increment;
                s.rwa_state = flush_denormal(target + s.rwa_coeff * (s.rwa_state - target));
                s.rwa_state
            }
            InterpMode::CustomInterpTween | InterpMode::CustomInterpTweenMs => {
                if s.tween_progress >= 1.0 {
                    s.tween_to
                } else {
                    let t = s.tween_progress;
                    let eased = t * t * (3.0 - 2.0 * t); // smoothstep
                    s.tween_progress = (s.tween_progress + s.tween_step).min(1.0);
                    s.tween_from + (s.tween_to - s.tween_from) * eased
                }
            }
            InterpMode::CustomInterpRwaMs => {
                s.rwa_state = flush_denormal(s.tween_to + s.rwa_coeff * (s.rwa_state - s.tween_to));
                s.rwa_state
            }
        };
        s.current
    }

    /// Peek the slot's current output without advancing.
    pub fn get_value(&self, slot: usize) -> f32 {
        self.slots.get(slot).map(|s| s.current).unwrap_or(0.0)
    }

    /// Number of slots (declared inputs plus any virtual ones).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// `true` if there are no slots at all.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
