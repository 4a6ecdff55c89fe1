use alloc::vec::Vec;

use crate::prefix::PrefixSums;

/// Row height used when no usable estimate exists.
pub const DEFAULT_ITEM_HEIGHT: u32 = 40;

/// Per-item sizes along the scroll axis, estimated until measured.
///
/// Offsets are cumulative and maintained incrementally: a measurement updates the prefix sums
/// in `O(log n)` rather than assuming a uniform row height.
#[derive(Clone, Debug)]
pub struct ItemSizes {
    estimate: u32,
    sizes: Vec<u32>,
    measured: Vec<bool>,
    sums: PrefixSums,
    measured_total: u64,
    measured_nonzero: usize,
}

impl ItemSizes {
    /// Creates an empty size table. An `estimate` of zero falls back to [`DEFAULT_ITEM_HEIGHT`].
    pub fn new(estimate: u32) -> Self {
        Self {
            estimate: usable_estimate(estimate),
            sizes: Vec::new(),
            measured: Vec::new(),
            sums: PrefixSums::default(),
            measured_total: 0,
            measured_nonzero: 0,
        }
    }

    pub fn count(&self) -> usize {
        self.sizes.len()
    }

    pub fn estimate(&self) -> u32 {
        self.estimate
    }

    /// Grows or shrinks the table. Surviving measurements are kept; new items use the estimate.
    pub fn set_count(&mut self, count: usize) {
        let prev = self.sizes.len();
        if count == prev {
            return;
        }
        if count < prev {
            for i in count..prev {
                if self.measured[i] {
                    self.forget_measurement(self.sizes[i]);
                }
            }
            self.sizes.truncate(count);
            self.measured.truncate(count);
        } else {
            self.sizes.resize(count, self.estimate);
            self.measured.resize(count, false);
        }
        vdebug!(prev, count, "ItemSizes::set_count");
        self.sums = PrefixSums::build(&self.sizes);
    }

    /// Records the measured size of `index` and returns how much its size changed.
    pub fn measure(&mut self, index: usize, size: u32) -> i64 {
        let Some(&cur) = self.sizes.get(index) else {
            return 0;
        };
        if self.measured[index] {
            self.forget_measurement(cur);
        }
        self.measured[index] = true;
        self.measured_total = self.measured_total.saturating_add(u64::from(size));
        if size > 0 {
            self.measured_nonzero += 1;
        }
        if cur == size {
            return 0;
        }
        self.sizes[index] = size;
        let delta = i64::from(size) - i64::from(cur);
        self.sums.update(index, delta);
        vtrace!(index, size, delta, "ItemSizes::measure");
        delta
    }

    /// Drops all measurements and restores estimates.
    pub fn reset_measurements(&mut self) {
        self.sizes.fill(self.estimate);
        self.measured.fill(false);
        self.measured_total = 0;
        self.measured_nonzero = 0;
        self.sums = PrefixSums::build(&self.sizes);
    }

    fn forget_measurement(&mut self, size: u32) {
        self.measured_total = self.measured_total.saturating_sub(u64::from(size));
        if size > 0 {
            self.measured_nonzero = self.measured_nonzero.saturating_sub(1);
        }
    }

    pub fn is_measured(&self, index: usize) -> bool {
        self.measured.get(index).copied().unwrap_or(false)
    }

    pub fn size_of(&self, index: usize) -> Option<u32> {
        self.sizes.get(index).copied()
    }

    /// Offset of the start of `index` from the start of the list.
    ///
    /// `index == count` yields the total size.
    pub fn start_of(&self, index: usize) -> u64 {
        self.sums.sum_before(index)
    }

    pub fn total(&self) -> u64 {
        self.sums.total()
    }

    /// The item covering `offset`, clamped to the last item. `None` when empty.
    pub fn index_at(&self, offset: u64) -> Option<usize> {
        let count = self.count();
        if count == 0 {
            return None;
        }
        Some(self.sums.count_within(offset).min(count - 1))
    }

    /// Typical row height for capacity planning.
    ///
    /// The average of nonzero measured sizes when any exist, otherwise the estimate. Never zero.
    pub fn typical_size(&self) -> u32 {
        if self.measured_nonzero == 0 {
            return self.estimate;
        }
        let avg = self.measured_total / self.measured_nonzero as u64;
        u32::try_from(avg).unwrap_or(u32::MAX).max(1)
    }
}

fn usable_estimate(estimate: u32) -> u32 {
    if estimate == 0 {
        DEFAULT_ITEM_HEIGHT
    } else {
        estimate
    }
}
