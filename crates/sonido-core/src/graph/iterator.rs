//! Value Iterator and Smoothed Iterator: LOD-aware per-sample read cursors.
//!
//! A value iterator walks a producer's output buffer at a fixed step of
//! `1/lod` per consumer sample, zero-order-holding whichever slot the
//! accumulator currently points at. The accumulator is warm-started by half
//! a step so that whole-integer LODs still hit every slot without rounding
//! bias at the boundaries (resolved from `original_source`'s
//! `NodeDataIterator`, which warmstarts `mIndex = mIncrement * 0.5f`).

use crate::math::flush_denormal;
use libm::expf;

/// Minimum RWA convergence window, in samples, regardless of source LOD.
///
/// Resolved from `original_source`'s `NodeDataIteratorRwa::Reset`:
/// `SetConvergenceInTicks(max2(4.0f, stepsPerIncrement), 0.35f)`.
pub const MIN_RWA_CONVERGENCE: f32 = 4.0;

/// Damping factor applied to the smoothed iterator's one-pole coefficient.
pub const RWA_DAMPING: f32 = 0.35;

/// Step increment (in source-buffer slots) for one lod-`lod` consumer sample.
#[inline]
pub fn step_increment(lod: f32) -> f32 {
    1.0 / lod.max(1.0)
}

/// One-pole coefficient that converges over `ticks` samples, shaped by `damping`.
#[inline]
pub fn rwa_coeff(ticks: f32, damping: f32) -> f32 {
    expf(-(1.0 - damping) / ticks.max(1.0))
}

/// Strided, zero-order-hold read cursor over a producer's LOD buffer.
#[derive(Debug, Clone)]
pub struct ValueIterator<'a> {
    data: &'a [f32],
    increment: f32,
    position: f32,
}

impl<'a> ValueIterator<'a> {
    /// Build an iterator over `data`, stepping `1/lod` slots per sample.
    ///
    /// `lod` is the producer's samples-per-step (`1.0` means one slot per
    /// consumer sample). The read cursor is warm-started half a step in.
    pub fn new(data: &'a [f32], lod: f32) -> Self {
        let increment = step_increment(lod);
        Self {
            data,
            increment,
            position: increment * 0.5,
        }
    }

    /// Samples-per-increment, i.e. the LOD this iterator was built with.
    pub fn steps_per_increment(&self) -> f32 {
        1.0 / self.increment
    }

    /// Read the next value and advance the cursor.
    pub fn next_value(&mut self) -> f32 {
        let idx = (self.position as usize).min(self.data.len().saturating_sub(1));
        let v = self.data.get(idx).copied().unwrap_or(0.0);
        self.position += self.increment;
        v
    }
}

impl<'a> Iterator for ValueIterator<'a> {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.data.is_empty() {
            return None;
        }
        Some(self.next_value())
    }
}

/// Wraps a [`ValueIterator`] with a first-order IIR toward each streamed
/// target, giving audible-range smoothing when the source runs at a coarse LOD.
#[derive(Debug, Clone)]
pub struct SmoothedIterator<'a> {
    inner: ValueIterator<'a>,
    state: f32,
    coeff: f32,
}

impl<'a> SmoothedIterator<'a> {
    /// Wrap `inner`, auto-choosing the time constant from its LOD.
    pub fn new(inner: ValueIterator<'a>) -> Self {
        let ticks = MIN_RWA_CONVERGENCE.max(inner.steps_per_increment());
        let coeff = rwa_coeff(ticks, RWA_DAMPING);
        Self {
            inner,
            state: 0.0,
            coeff,
        }
    }

    /// Read the next smoothed value and advance both the cursor and the filter.
    pub fn next_value(&mut self) -> f32 {
        let target = self.inner.next_value();
        self.state = flush_denormal(target + self.coeff * (self.state - target));
        self.state
    }

    /// Peek the current filter output without advancing.
    pub fn current(&self) -> f32 {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_iterator_lod_one_hits_every_slot() {
        let data = [1.0, 2.0, 3.0, 4.0];
        let mut it = ValueIterator::new(&data, 1.0);
        let out: Vec<f32> = (0..4).map(|_| it.next_value()).collect();
        assert_eq!(out, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn value_iterator_lod_two_holds_each_slot_twice() {
        let data = [1.0, 2.0];
        let mut it = ValueIterator::new(&data, 2.0);
        let out: Vec<f32> = (0..4).map(|_| it.next_value()).collect();
        assert_eq!(out, vec![1.0, 1.0, 2.0, 2.0]);
    }

    #[test]
    fn value_iterator_clamps_past_buffer_end() {
        let data = [5.0, 6.0];
        let mut it = ValueIterator::new(&data, 1.0);
        for _ in 0..10 {
            it.next_value();
        }
        assert_eq!(it.next_value(), 6.0);
    }

    #[test]
    fn smoothed_iterator_converges_to_constant_target() {
        let data = [1.0; 64];
        let it = ValueIterator::new(&data, 1.0);
        let mut smoothed = SmoothedIterator::new(it);
        let mut last = 0.0;
        for _ in 0..64 {
            last = smoothed.next_value();
        }
        assert!((last - 1.0).abs() < 1e-3, "expected convergence, got {last}");
    }

    #[test]
    fn smoothed_iterator_coarser_lod_converges_slower() {
        let data = [1.0; 8];
        let fast = ValueIterator::new(&data, 1.0);
        let slow = ValueIterator::new(&data, 32.0);
        let mut fast = SmoothedIterator::new(fast);
        let mut slow = SmoothedIterator::new(slow);
        for _ in 0..4 {
            fast.next_value();
            slow.next_value();
        }
        assert!(fast.current() > slow.current());
    }
}
