//! Size-keyed pixel buffer pool.
//!
//! Repeated passes over same-sized frames (video, live preview) request the
//! same buffer lengths again and again. [`BufferPool`] keeps released buffers
//! in per-size stacks and hands the most recently released one back out,
//! zero-filled, instead of allocating.
//!
//! ## Design
//!
//! - **Exact-size buckets**: a buffer is only reused for a request of its
//!   exact length.
//! - **Bounded retention**: each bucket holds at most `max_per_bucket`
//!   buffers; extra releases are dropped, so retained memory is bounded by
//!   `sum(size * max_per_bucket)`.
//! - **Single writer**: every mutating method takes `&mut self`. Parallel
//!   workers each own a pool.
//!
//! ## Usage
//!
//! ```
//! use stipple_core::BufferPool;
//!
//! let mut pool = BufferPool::new();
//! let buf = pool.acquire(64).unwrap();
//! pool.release(buf);
//!
//! // Released on every exit path, including `?` and panics
//! let zeros = pool
//!     .with_buffer(64, |buf| {
//!         Ok::<_, stipple_core::DitherError>(buf.iter().filter(|&&b| b == 0).count())
//!     })
//!     .unwrap();
//! assert_eq!(zeros, 64);
//! assert_eq!(pool.stats().reused, 1);
//! ```

use std::collections::{BTreeMap, HashMap};
use std::ops::{Deref, DerefMut};

use serde::Serialize;

use crate::api::DitherError;

/// Default number of buffers retained per size.
pub const DEFAULT_MAX_PER_BUCKET: usize = 4;

/// Allocation counters and per-size occupancy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    /// Buffers created because no pooled buffer of that size was available.
    pub allocated: u64,
    /// Buffers served from a bucket.
    pub reused: u64,
    /// Buffers handed back through `release`.
    pub released: u64,
    /// Released or trimmed buffers discarded because a bucket was full.
    pub dropped: u64,
    /// Acquired but not yet released.
    pub outstanding: u64,
    /// Retained buffer count keyed by buffer size in bytes.
    pub buckets: BTreeMap<usize, usize>,
}

/// Reusable byte buffers keyed by exact length.
#[derive(Debug)]
pub struct BufferPool {
    buckets: HashMap<usize, Vec<Vec<u8>>>,
    max_per_bucket: usize,
    allocated: u64,
    reused: u64,
    released: u64,
    dropped: u64,
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new()
    }
}

impl BufferPool {
    /// Create an empty pool retaining [`DEFAULT_MAX_PER_BUCKET`] per size.
    pub fn new() -> Self {
        Self::with_max_per_bucket(DEFAULT_MAX_PER_BUCKET)
    }

    /// Create an empty pool with a custom retention cap.
    pub fn with_max_per_bucket(max_per_bucket: usize) -> Self {
        Self {
            buckets: HashMap::new(),
            max_per_bucket,
            allocated: 0,
            reused: 0,
            released: 0,
            dropped: 0,
        }
    }

    /// Current retention cap.
    #[inline]
    pub fn max_per_bucket(&self) -> usize {
        self.max_per_bucket
    }

    /// Get a zero-filled buffer of exactly `size` bytes.
    ///
    /// Pops the most recently released buffer of that size when one is
    /// pooled, otherwise allocates. Fails with
    /// [`DitherError::ZeroSizedBuffer`] for `size == 0`.
    pub fn acquire(&mut self, size: usize) -> Result<Vec<u8>, DitherError> {
        if size == 0 {
            return Err(DitherError::ZeroSizedBuffer);
        }

        if let Some(bucket) = self.buckets.get_mut(&size) {
            if let Some(buffer) = bucket.pop() {
                if bucket.is_empty() {
                    self.buckets.remove(&size);
                }
                self.reused += 1;
                return Ok(buffer);
            }
        }

        self.allocated += 1;
        Ok(vec![0u8; size])
    }

    /// Return a buffer for reuse.
    ///
    /// The contents are zeroed before the buffer is stored. When its bucket
    /// is already full the buffer is dropped instead.
    pub fn release(&mut self, mut buffer: Vec<u8>) {
        let size = buffer.len();
        if size == 0 {
            tracing::debug!("Ignoring release of empty buffer");
            return;
        }
        self.released += 1;

        let retained = self.buckets.get(&size).map_or(0, Vec::len);
        if retained >= self.max_per_bucket {
            self.dropped += 1;
            return;
        }
        buffer.fill(0);
        self.buckets.entry(size).or_default().push(buffer);
    }

    /// Change the retention cap, trimming existing buckets to it.
    ///
    /// Trimming keeps the most recently released buffers.
    pub fn configure(&mut self, max_per_bucket: usize) {
        self.max_per_bucket = max_per_bucket;

        let mut trimmed = 0usize;
        for bucket in self.buckets.values_mut() {
            if bucket.len() > max_per_bucket {
                let excess = bucket.len() - max_per_bucket;
                bucket.drain(..excess);
                trimmed += excess;
            }
        }
        self.buckets.retain(|_, bucket| !bucket.is_empty());

        if trimmed > 0 {
            self.dropped += trimmed as u64;
            tracing::debug!(max_per_bucket, trimmed, "Trimmed buffer pool");
        }
    }

    /// Snapshot of counters and bucket occupancy.
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            allocated: self.allocated,
            reused: self.reused,
            released: self.released,
            dropped: self.dropped,
            outstanding: (self.allocated + self.reused).saturating_sub(self.released),
            buckets: self
                .buckets
                .iter()
                .filter(|(_, bucket)| !bucket.is_empty())
                .map(|(&size, bucket)| (size, bucket.len()))
                .collect(),
        }
    }

    /// Total bytes currently held in buckets.
    pub fn retained_bytes(&self) -> usize {
        self.buckets
            .iter()
            .map(|(&size, bucket)| size * bucket.len())
            .sum()
    }

    /// Drop every retained buffer and reset all counters.
    pub fn clear(&mut self) {
        self.buckets.clear();
        self.allocated = 0;
        self.reused = 0;
        self.released = 0;
        self.dropped = 0;
    }

    /// Acquire a buffer that is released when the guard goes out of scope.
    pub fn lease(&mut self, size: usize) -> Result<Lease<'_>, DitherError> {
        let buffer = self.acquire(size)?;
        Ok(Lease {
            pool: self,
            buffer: Some(buffer),
        })
    }

    /// Run `f` over a pooled buffer of `size` bytes.
    ///
    /// The buffer goes back to the pool whether `f` returns `Ok`, returns
    /// `Err`, or panics.
    pub fn with_buffer<R, E, F>(&mut self, size: usize, f: F) -> Result<R, E>
    where
        F: FnOnce(&mut [u8]) -> Result<R, E>,
        E: From<DitherError>,
    {
        let mut lease = self.lease(size)?;
        f(&mut lease)
    }
}

/// A pooled buffer that returns itself to its pool on drop.
///
/// Dereferences to the buffer bytes. Use [`Lease::into_inner`] to keep the
/// buffer beyond the guard's scope.
#[derive(Debug)]
pub struct Lease<'p> {
    pool: &'p mut BufferPool,
    buffer: Option<Vec<u8>>,
}

impl Lease<'_> {
    /// Detach the buffer from the guard without releasing it.
    ///
    /// The pool keeps counting it as outstanding until it is released.
    pub fn into_inner(mut self) -> Vec<u8> {
        self.buffer.take().unwrap_or_default()
    }
}

impl Deref for Lease<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.buffer.as_deref().unwrap_or_default()
    }
}

impl DerefMut for Lease<'_> {
    fn deref_mut(&mut self) -> &mut [u8] {
        self.buffer.as_deref_mut().unwrap_or_default()
    }
}

impl Drop for Lease<'_> {
    fn drop(&mut self) {
        if let Some(buffer) = self.buffer.take() {
            self.pool.release(buffer);
        }
    }
}
