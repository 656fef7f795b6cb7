//! Batching clock: sub-block "slow update" scheduling.
//!
//! Splits a sample range into subranges at the moments a per-operation update
//! counter reaches zero, invoking a slow-update callback at each boundary and
//! a per-sample callback between boundaries. The residual counter carries
//! across calls so the fast (per-sample) path never loses accuracy while the
//! slow path runs at a coarser, operation-declared rate (resolved from
//! `original_source`'s `BatchUpdate`, which captures the same two closures as
//! `on_slow_update`/`on_samples` here).

/// Drives repeated calls to [`batch_update`] by holding the carried state
/// (`update_rate`, `samples_until_update`) between `process` calls.
#[derive(Debug, Clone, Copy)]
pub struct BatchDriver {
    update_rate: usize,
    samples_until_update: usize,
}

impl BatchDriver {
    /// Create a driver that fires its first slow update after `update_rate`
    /// samples.
    pub fn new(update_rate: usize) -> Self {
        let update_rate = update_rate.max(1);
        Self {
            update_rate,
            samples_until_update: update_rate,
        }
    }

    /// Current update rate (samples between slow updates).
    pub fn update_rate(&self) -> usize {
        self.update_rate
    }

    /// Samples remaining until the next slow update fires.
    pub fn samples_until_update(&self) -> usize {
        self.samples_until_update
    }

    /// Process `[0, num_samples)`, calling `on_slow_update` at each boundary
    /// (it returns the next `update_rate`) and `on_samples(sub_start,
    /// sub_end, is_tail)` for every subrange in between. `is_tail` is `true`
    /// for the final subrange in this call, whether or not it lands exactly
    /// on a boundary.
    pub fn batch_update(
        &mut self,
        num_samples: usize,
        mut on_slow_update: impl FnMut() -> usize,
        mut on_samples: impl FnMut(usize, usize, bool),
    ) {
        let mut cursor = 0usize;
        while cursor < num_samples {
            if self.samples_until_update == 0 {
                self.update_rate = on_slow_update().max(1);
                self.samples_until_update = self.update_rate;
            }
            let remaining_in_block = num_samples - cursor;
            let step = self.samples_until_update.min(remaining_in_block);
            let sub_start = cursor;
            let sub_end = cursor + step;
            cursor = sub_end;
            self.samples_until_update -= step;
            let is_tail = cursor >= num_samples;
            on_samples(sub_start, sub_end, is_tail);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_slow_update_exactly_at_boundaries() {
        let mut driver = BatchDriver::new(4);
        let mut slow_calls = 0;
        let mut subranges = Vec::new();
        driver.batch_update(
            10,
            || {
                slow_calls += 1;
                4
            },
            |s, e, tail| subranges.push((s, e, tail)),
        );
        // boundaries at 4, 8 within 10 samples: subranges [0,4) [4,8) [8,10)
        assert_eq!(subranges, vec![(0, 4, false), (4, 8, false), (8, 10, true)]);
        assert_eq!(slow_calls, 2); // boundaries at sample 4 and sample 8
    }

    #[test]
    fn carries_residual_across_calls() {
        let mut driver = BatchDriver::new(6);
        let mut subranges = Vec::new();
        driver.batch_update(4, || 6, |s, e, tail| subranges.push((s, e, tail)));
        assert_eq!(subranges, vec![(0, 4, true)]);
        assert_eq!(driver.samples_until_update(), 2);

        subranges.clear();
        driver.batch_update(4, || 6, |s, e, tail| subranges.push((s, e, tail)));
        // Residual 2 samples finish the old window, then a fresh 6 starts.
        assert_eq!(subranges, vec![(0, 2, false), (2, 4, true)]);
    }

    #[test]
    fn slow_update_can_change_the_rate() {
        let mut driver = BatchDriver::new(2);
        let rates = [2usize, 8, 2];
        let mut idx = 0;
        let mut subranges = Vec::new();
        driver.batch_update(
            12,
            || {
                let r = rates[idx.min(rates.len() - 1)];
                idx += 1;
                r
            },
            |s, e, tail| subranges.push((s, e, tail)),
        );
        // First window [0,2) runs out the initial rate=2; the slow update at
        // sample 2 re-picks rate=2 (one more short window), then the slow
        // update at sample 4 picks rate=8, covering the rest of the block.
        assert_eq!(subranges, vec![(0, 2, false), (2, 4, false), (4, 12, true)]);
    }
}
