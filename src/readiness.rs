// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Deferred readiness: pending lookups polled until their value appears.
//!
//! There is no generic way to subscribe to arbitrary host graph mutation,
//! so the engine re-resolves pending paths on a fixed cadence. A pending
//! entry either resolves (callback fires exactly once, entry dropped) or
//! stays pending forever; there is no timeout and no failure state.

use crate::accessor::AccessorSnapshot;

use core::mem;
use core::time::Duration;
use std::collections::BTreeSet;

/// One-shot callback fired when a pending lookup first resolves.
pub type ReadyCallback = Box<dyn FnOnce(AccessorSnapshot)>;

/// Default delay between polling ticks: as fast as the host scheduler
/// reasonably allows.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(1);

/// A record id awaiting first availability.
pub(crate) struct PendingEntry {
    pub(crate) id: u64,
    pub(crate) callback: ReadyCallback,
}

/// Pending-entry set and tick state machine.
///
/// The engine owns scheduling state only; the sweep itself is driven by
/// [`Broker::tick`](crate::Broker::tick), which holds the registry and
/// the context graphs. The split keeps user callbacks out of any
/// internal borrow.
pub struct ReadinessEngine {
    pending: Vec<PendingEntry>,
    // ids of the batch currently being swept; an id is pending at most
    // once even while its entry is out of `pending` mid-tick
    in_flight: BTreeSet<u64>,
    paused: bool,
    in_tick: bool,
    interval: Duration,
}

impl Default for ReadinessEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadinessEngine {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            in_flight: BTreeSet::new(),
            paused: false,
            in_tick: false,
            interval: DEFAULT_TICK_INTERVAL,
        }
    }

    /// Queue a callback for `id`. Declined if the id is already pending;
    /// nothing is evaluated until the next tick.
    pub(crate) fn schedule(&mut self, id: u64, callback: ReadyCallback) -> bool {
        if self.is_scheduled(id) {
            return false;
        }
        self.pending.push(PendingEntry { id, callback });
        true
    }

    /// Whether `id` is pending, including an entry that is mid-sweep and
    /// not yet resolved.
    pub fn is_scheduled(&self, id: u64) -> bool {
        self.in_flight.contains(&id) || self.pending.iter().any(|e| e.id == id)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Stop ticks from doing work. Pending entries survive.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Take the pending batch for one sweep. `None` while paused or when
    /// a sweep is already running; a callback that calls back into the
    /// broker cannot re-enter the tick.
    pub(crate) fn begin_tick(&mut self) -> Option<Vec<PendingEntry>> {
        if self.paused || self.in_tick {
            return None;
        }
        self.in_tick = true;
        let batch = mem::take(&mut self.pending);
        self.in_flight = batch.iter().map(|e| e.id).collect();
        Some(batch)
    }

    /// Mark a batch entry as resolved (or dropped). Its id has left the
    /// pending set and may be scheduled again, even within this sweep.
    pub(crate) fn mark_resolved(&mut self, id: u64) {
        self.in_flight.remove(&id);
    }

    /// Return unresolved entries. Entries scheduled by callbacks during
    /// the sweep queue up behind them and are first evaluated on the
    /// next tick.
    pub(crate) fn end_tick(&mut self, mut still_pending: Vec<PendingEntry>) {
        still_pending.append(&mut self.pending);
        self.pending = still_pending;
        self.in_flight.clear();
        self.in_tick = false;
    }
}

/// Host-provided "wait roughly this long between ticks" primitive.
///
/// Returning `false` stops the polling driver; the engine never decides
/// on its own to give up on a pending entry.
pub trait TickTimer {
    fn wait(&mut self, interval: Duration) -> bool;
}

/// Wall-clock timer backed by `std::thread::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SleepTimer;

impl TickTimer for SleepTimer {
    fn wait(&mut self, interval: Duration) -> bool {
        std::thread::sleep(interval);
        true
    }
}

/// Timer that allows a fixed number of ticks and then stops the driver.
/// Lets tests drive polling deterministically, without wall-clock time.
#[derive(Debug, Clone)]
pub struct CountdownTimer {
    ticks_left: usize,
}

impl CountdownTimer {
    pub const fn new(ticks: usize) -> Self {
        Self { ticks_left: ticks }
    }
}

impl TickTimer for CountdownTimer {
    fn wait(&mut self, _interval: Duration) -> bool {
        if self.ticks_left == 0 {
            return false;
        }
        self.ticks_left -= 1;
        true
    }
}
