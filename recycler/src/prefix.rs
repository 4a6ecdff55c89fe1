use alloc::vec::Vec;

/// Binary indexed tree over per-item pixel sizes.
///
/// Answers "where does item `i` start" and "which item covers offset `y`" in `O(log n)`,
/// and absorbs a single measured size change in `O(log n)` without rebuilding offsets.
#[derive(Clone, Debug, Default)]
pub(crate) struct PrefixSums {
    nodes: Vec<u64>, // 1-based, nodes[0] unused
    total: u64,
    top_bit: usize,
}

impl PrefixSums {
    /// Builds the tree from item sizes in `O(n)`.
    pub(crate) fn build(sizes: &[u32]) -> Self {
        let len = sizes.len();
        let mut nodes = alloc::vec![0u64; len + 1];
        let mut total = 0u64;
        for (i, &size) in sizes.iter().enumerate() {
            let node = i + 1;
            let size = u64::from(size);
            total = total.saturating_add(size);
            nodes[node] = nodes[node].saturating_add(size);
            let parent = node + low_bit(node);
            if parent <= len {
                nodes[parent] = nodes[parent].saturating_add(nodes[node]);
            }
        }
        Self {
            nodes,
            total,
            top_bit: top_bit(len),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    pub(crate) fn total(&self) -> u64 {
        self.total
    }

    /// Shifts the size of item `index` by `delta` pixels.
    pub(crate) fn update(&mut self, index: usize, delta: i64) {
        let len = self.len();
        if index >= len || delta == 0 {
            return;
        }
        self.total = apply_delta(self.total, delta);
        let mut node = index + 1;
        while node <= len {
            self.nodes[node] = apply_delta(self.nodes[node], delta);
            node += low_bit(node);
        }
    }

    /// Sum of the sizes of items `0..count`.
    pub(crate) fn sum_before(&self, count: usize) -> u64 {
        let mut node = count.min(self.len());
        let mut sum = 0u64;
        while node > 0 {
            sum = sum.saturating_add(self.nodes[node]);
            node &= node - 1;
        }
        sum
    }

    /// Number of leading items whose combined size is `<= offset`.
    ///
    /// For an offset inside the list this is the index of the item covering it.
    pub(crate) fn count_within(&self, mut offset: u64) -> usize {
        let len = self.len();
        let mut node = 0usize;
        let mut step = self.top_bit;
        while step != 0 {
            let next = node + step;
            if next <= len && self.nodes[next] <= offset {
                offset -= self.nodes[next];
                node = next;
            }
            step >>= 1;
        }
        node
    }
}

fn apply_delta(value: u64, delta: i64) -> u64 {
    if delta >= 0 {
        value.saturating_add(delta.unsigned_abs())
    } else {
        debug_assert!(
            value >= delta.unsigned_abs(),
            "prefix sum underflow (value={value}, delta={delta})"
        );
        value.saturating_sub(delta.unsigned_abs())
    }
}

fn low_bit(i: usize) -> usize {
    i & i.wrapping_neg()
}

fn top_bit(len: usize) -> usize {
    if len == 0 {
        0
    } else {
        1usize << (usize::BITS - 1 - len.leading_zeros())
    }
}
