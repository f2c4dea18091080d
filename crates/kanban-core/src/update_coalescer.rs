#![forbid(unsafe_code)]

//! Keyed batching for bursty layout updates.
//!
//! Layout observation fires for every re-layout of every mounted element,
//! far more often than geometry actually changes. Applying each event to the
//! board state would recompute drag placement on every frame for every
//! element. [`ThrottledDebouncedProcessor`] collects `key -> value` updates
//! and hands them to a batch handler in one call.
//!
//! # Design
//!
//! - **Last write wins** per key within a batch.
//! - **Throttled submits** (a drag is active) never flush inline. They arm a
//!   deadline at `now` when at least `throttle_interval` has passed since the
//!   previous flush, and at `last_flush + throttle_interval` otherwise.
//!   Submits arriving before the host polls merge into the same batch, and
//!   at most one flush happens per interval.
//! - **Debounced submits** (the UI is settling) restart a `debounce_delay`
//!   timer; the batch is flushed once no further submits arrive.
//!
//! The processor owns no thread. Deadlines are serviced by calling
//! [`poll`](ThrottledDebouncedProcessor::poll) from the host's tick loop;
//! [`next_deadline`](ThrottledDebouncedProcessor::next_deadline) tells the
//! host when the next tick is needed. All time-dependent entry points have an
//! `_at` variant taking an explicit [`Instant`] for deterministic tests.
//!
//! # Usage
//!
//! ```
//! use std::sync::{Arc, Mutex};
//! use std::time::Duration;
//! use kanban_core::update_coalescer::{CoalescerConfig, ThrottledDebouncedProcessor};
//! use web_time::Instant;
//!
//! let batches = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&batches);
//! let t0 = Instant::now();
//! let mut processor = ThrottledDebouncedProcessor::new_at(
//!     CoalescerConfig::default(),
//!     move |batch| sink.lock().unwrap().push(batch),
//!     t0,
//! );
//!
//! processor.submit_at("a", 1, false, t0);
//! processor.submit_at("a", 2, false, t0 + Duration::from_millis(5));
//! assert!(!processor.poll(t0 + Duration::from_millis(100)));
//! assert!(processor.poll(t0 + Duration::from_millis(205)));
//!
//! let batches = batches.lock().unwrap();
//! assert_eq!(batches.len(), 1);
//! assert_eq!(batches[0].get("a"), Some(&2));
//! ```

use std::fmt;
use std::hash::Hash;
use std::time::Duration;

use ahash::AHashMap;
use web_time::Instant;

/// Default minimum spacing between throttled flushes (one 60 Hz frame).
pub const DEFAULT_THROTTLE_INTERVAL: Duration = Duration::from_millis(16);

/// Default quiet period before a debounced flush.
pub const DEFAULT_DEBOUNCE_DELAY: Duration = Duration::from_millis(200);

/// Timing parameters for [`ThrottledDebouncedProcessor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoalescerConfig {
    /// Minimum time between flushes while throttling (default: 16ms).
    pub throttle_interval: Duration,
    /// Quiet period before flushing while debouncing (default: 200ms).
    pub debounce_delay: Duration,
}

impl Default for CoalescerConfig {
    fn default() -> Self {
        Self {
            throttle_interval: DEFAULT_THROTTLE_INTERVAL,
            debounce_delay: DEFAULT_DEBOUNCE_DELAY,
        }
    }
}

/// Receives one flushed batch.
pub type BatchHandler<K, V> = Box<dyn FnMut(AHashMap<K, V>) + Send>;

/// Throttling/debouncing batcher keyed by element id.
///
/// # Thread Safety
///
/// Not internally synchronized. Wrap it in a lock (or own it from a single
/// task) when submits arrive from several threads. The handler runs on the
/// thread that triggered the flush.
pub struct ThrottledDebouncedProcessor<K, V> {
    config: CoalescerConfig,
    pending: AHashMap<K, V>,
    handler: BatchHandler<K, V>,
    last_flush: Instant,
    throttle_deadline: Option<Instant>,
    debounce_deadline: Option<Instant>,
    flush_count: u64,
}

impl<K, V> fmt::Debug for ThrottledDebouncedProcessor<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThrottledDebouncedProcessor")
            .field("config", &self.config)
            .field("pending", &self.pending.len())
            .field("throttle_deadline", &self.throttle_deadline)
            .field("debounce_deadline", &self.debounce_deadline)
            .field("flush_count", &self.flush_count)
            .finish()
    }
}

impl<K: Eq + Hash, V> ThrottledDebouncedProcessor<K, V> {
    /// Create a processor that delivers batches to `handler`.
    pub fn new<F>(config: CoalescerConfig, handler: F) -> Self
    where
        F: FnMut(AHashMap<K, V>) + Send + 'static,
    {
        Self::new_at(config, handler, Instant::now())
    }

    /// Create a processor whose throttle window starts at `now`.
    pub fn new_at<F>(config: CoalescerConfig, handler: F, now: Instant) -> Self
    where
        F: FnMut(AHashMap<K, V>) + Send + 'static,
    {
        Self {
            config,
            pending: AHashMap::new(),
            handler: Box::new(handler),
            last_flush: now,
            throttle_deadline: None,
            debounce_deadline: None,
            flush_count: 0,
        }
    }

    /// Queue `value` for `key` using the wall clock.
    pub fn submit(&mut self, key: K, value: V, is_throttling: bool) {
        self.submit_at(key, value, is_throttling, Instant::now());
    }

    /// Queue `value` for `key` at time `now`.
    ///
    /// Overwrites any queued value for the same key. Delivery always happens
    /// from [`poll`](Self::poll) or [`process_now`](Self::process_now).
    pub fn submit_at(&mut self, key: K, value: V, is_throttling: bool, now: Instant) {
        self.pending.insert(key, value);

        if is_throttling {
            let earliest = self.last_flush + self.config.throttle_interval;
            self.throttle_deadline.get_or_insert(earliest.max(now));
        } else {
            self.debounce_deadline = Some(now + self.config.debounce_delay);
        }
    }

    /// Service expired deadlines. Returns `true` if a batch was flushed.
    pub fn poll(&mut self, now: Instant) -> bool {
        let due = |deadline: Option<Instant>| deadline.is_some_and(|d| now >= d);
        if due(self.throttle_deadline) || due(self.debounce_deadline) {
            self.flush_at(now)
        } else {
            false
        }
    }

    /// Earliest armed deadline, if any.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.throttle_deadline, self.debounce_deadline) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Flush the pending batch immediately.
    ///
    /// No-op (returns `false`) when nothing is pending.
    pub fn process_now(&mut self) -> bool {
        self.flush_at(Instant::now())
    }

    /// Disarm all timers. Pending values stay queued until the next flush.
    pub fn cancel(&mut self) {
        self.throttle_deadline = None;
        self.debounce_deadline = None;
    }

    /// Number of distinct keys waiting for the next flush.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Total number of batches delivered to the handler.
    #[must_use]
    pub fn flush_count(&self) -> u64 {
        self.flush_count
    }

    #[must_use]
    pub fn config(&self) -> CoalescerConfig {
        self.config
    }

    fn flush_at(&mut self, now: Instant) -> bool {
        self.throttle_deadline = None;
        self.debounce_deadline = None;
        if self.pending.is_empty() {
            return false;
        }

        let batch = std::mem::take(&mut self.pending);
        self.last_flush = now;
        self.flush_count = self.flush_count.saturating_add(1);

        #[cfg(feature = "tracing")]
        tracing::trace!(
            target: "kanban.coalescer",
            batch_len = batch.len(),
            flush_count = self.flush_count,
            "flushing coalesced batch"
        );

        (self.handler)(batch);
        true
    }
}
