//! Bounded sample history: a fixed-capacity FIFO ring with overwrite-on-full,
//! and the mutex-guarded shared handle the producer and render path agree on.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::record::Sample;

/// Fixed-capacity FIFO of samples.
///
/// When full, a push evicts exactly the oldest sample. Eviction is index
/// arithmetic inside `VecDeque`; stored samples are never shifted in bulk.
/// Insertion order is the logical order; timestamps are assumed
/// non-decreasing but not enforced here.
#[derive(Debug, Clone)]
pub struct SampleRing {
    samples: VecDeque<Sample>,
    capacity: usize,
}

impl SampleRing {
    /// A ring holding at most `capacity` samples (`capacity >= 1`,
    /// validated by [`crate::config::ScopeConfig`]).
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest when at capacity. Never fails.
    pub fn push(&mut self, sample: Sample) {
        if self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    /// Contents in insertion order.
    pub fn snapshot(&self) -> Vec<Sample> {
        self.samples.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Shared handle to a [`SampleRing`].
///
/// The producer is the sole writer; the render path only takes snapshots.
/// Both operations hold the lock for at most O(capacity) and never perform
/// I/O or sleep while holding it, so a snapshot can never observe a sample
/// with mixed old/new fields.
#[derive(Clone)]
pub struct SharedRing {
    inner: Arc<Mutex<SampleRing>>,
    generation: Arc<AtomicU64>,
}

impl SharedRing {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SampleRing::new(capacity))),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Producer side: insert one sample and bump the data generation.
    pub fn push(&self, sample: Sample) {
        {
            let mut ring = self.inner.lock().unwrap();
            ring.push(sample);
        }
        self.generation.fetch_add(1, Ordering::Release);
    }

    /// Render side: a self-consistent copy of the current contents in
    /// insertion order.
    pub fn snapshot(&self) -> Vec<Sample> {
        self.inner.lock().unwrap().snapshot()
    }

    /// Monotone counter incremented once per accepted sample. Hosts compare
    /// generations to learn whether a repaint is worthwhile.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.inner.lock().unwrap().is_full()
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().unwrap().capacity()
    }
}
