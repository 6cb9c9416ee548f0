// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trailing-edge debouncer for re-render and pick-surface rebuilds.
//!
//! Requests are coalesced into a pending set. Each request pushes the deadline out to
//! `last request + quiet_period`; once a tick observes that the deadline has passed, the
//! whole set is flushed at once. Callers pass `now` explicitly so the behaviour can be
//! driven with synthetic instants.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use tracing::trace;

/// Debounce settings.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Time without new requests before pending work is flushed.
    pub quiet_period: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            quiet_period: Duration::from_millis(50),
        }
    }
}

fn duration_since_or_zero(now: Instant, earlier: Instant) -> Duration {
    now.checked_duration_since(earlier).unwrap_or(Duration::ZERO)
}

/// Coalescing queue with a fixed quiet period.
#[derive(Clone, Debug)]
pub struct Debouncer<K> {
    config: SchedulerConfig,
    pending: BTreeSet<K>,
    last_request: Option<Instant>,
}

impl<K: Ord> Debouncer<K> {
    /// Create an idle debouncer.
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            pending: BTreeSet::new(),
            last_request: None,
        }
    }

    /// Queue `key` and restart the quiet period.
    pub fn request_at(&mut self, key: K, now: Instant) {
        self.pending.insert(key);
        self.last_request = Some(now);
    }

    /// Queue several keys at once.
    pub fn request_all_at(&mut self, keys: impl IntoIterator<Item = K>, now: Instant) {
        let mut any = false;
        for key in keys {
            self.pending.insert(key);
            any = true;
        }
        if any {
            self.last_request = Some(now);
        }
    }

    /// Whether work is queued.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Time left before a tick at `now` would flush, `None` when idle.
    pub fn time_until_flush(&self, now: Instant) -> Option<Duration> {
        let last = self.last_request.filter(|_| self.has_pending())?;
        Some(
            self.config
                .quiet_period
                .saturating_sub(duration_since_or_zero(now, last)),
        )
    }

    /// Flush the pending set if the quiet period has elapsed.
    pub fn tick_at(&mut self, now: Instant) -> Option<Vec<K>> {
        if self.time_until_flush(now)? > Duration::ZERO {
            return None;
        }
        self.last_request = None;
        let flushed: Vec<K> = core::mem::take(&mut self.pending).into_iter().collect();
        trace!(count = flushed.len(), "debounce flush");
        Some(flushed)
    }

    /// Drop all pending work.
    pub fn cancel(&mut self) {
        self.pending.clear();
        self.last_request = None;
    }
}
