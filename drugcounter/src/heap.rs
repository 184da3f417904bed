//! # Bounded Top-K Heap
//!
//! An array-backed binary min-heap that keeps the K highest-ranked entries
//! seen so far. The root is always the next entry to evict, so when a push
//! overflows the capacity, popping the root drops the weakest entry.
//!
//! Ranking comes from [`EvictionOrder`] rather than [`Ord`]. The drug ranking
//! needs "lower cost first, then later name first", which is not the natural
//! ordering of either field.

/// Strict ordering used to pick the eviction candidate
pub trait EvictionOrder {
    /// `true` when `self` should leave the heap before `other`
    fn evicts_before(&self, other: &Self) -> bool;
}

/// Binary min-heap bounded at `limit` entries
#[derive(Debug, Clone)]
pub struct TopKHeap<T> {
    entries: Vec<T>,
    limit: Option<usize>,
}

impl<T: EvictionOrder> TopKHeap<T> {
    /// Heap that keeps at most `limit` entries, or every entry when `None`
    pub fn new(limit: Option<usize>) -> Self {
        Self { entries: Vec::new(), limit }
    }

    /// Insert an entry, evicting the current minimum if the limit is exceeded
    pub fn push(&mut self, entry: T) {
        self.entries.push(entry);
        self.sift_up(self.entries.len() - 1);

        if let Some(k) = self.limit {
            if self.entries.len() > k {
                self.pop();
            }
        }
    }

    /// Remove and return the entry that evicts first
    pub fn pop(&mut self) -> Option<T> {
        if self.entries.is_empty() {
            return None;
        }
        let last = self.entries.len() - 1;
        self.entries.swap(0, last);
        let root = self.entries.pop();
        self.sift_down(0);
        root
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drain every entry, highest-ranked first
    ///
    /// Popping yields ascending eviction order; the result is that sequence
    /// reversed.
    pub fn into_descending(mut self) -> Vec<T> {
        let mut drained = Vec::with_capacity(self.entries.len());
        while let Some(entry) = self.pop() {
            drained.push(entry);
        }
        drained.reverse();
        drained
    }

    fn sift_up(&mut self, mut child: usize) {
        while child > 0 {
            let parent = (child - 1) / 2;
            if !self.entries[child].evicts_before(&self.entries[parent]) {
                break;
            }
            self.entries.swap(child, parent);
            child = parent;
        }
    }

    fn sift_down(&mut self, mut node: usize) {
        let len = self.entries.len();
        loop {
            let left = 2 * node + 1;
            let right = left + 1;

            let left_smaller = left < len && self.entries[left].evicts_before(&self.entries[node]);
            let right_smaller = right < len && self.entries[right].evicts_before(&self.entries[node]);

            let next = match (left_smaller, right_smaller) {
                (true, true) => {
                    if self.entries[left].evicts_before(&self.entries[right]) {
                        left
                    } else {
                        right
                    }
                }
                (true, false) => left,
                (false, true) => right,
                (false, false) => break,
            };

            self.entries.swap(node, next);
            node = next;
        }
    }

    #[cfg(test)]
    fn holds_heap_property(&self) -> bool {
        (1..self.entries.len()).all(|i| !self.entries[i].evicts_before(&self.entries[(i - 1) / 2]))
    }
}
