// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::accessor::{AccessTarget, AccessorSnapshot};
use crate::context::Context;
use crate::path;
use crate::readiness::{ReadinessEngine, TickTimer};
use crate::registry::PropertyRegistry;
use crate::value::Value;

use core::cell::RefCell;
use core::time::Duration;
use std::rc::Rc;

/// The property broker.
///
/// Owns the registry, the readiness engine and a process-wide default
/// context, and hands out [`AccessorSnapshot`]s. Cloning a broker is
/// cheap and aliases the same state, so snapshots and callbacks can keep
/// a handle without lifetime plumbing.
///
/// Everything runs on the calling thread; the only suspension is a
/// deferred [`when_ready`](AccessorSnapshot::when_ready) callback, which
/// resumes on a later [`tick`](Broker::tick).
#[derive(Clone)]
pub struct Broker {
    registry: Rc<RefCell<PropertyRegistry>>,
    engine: Rc<RefCell<ReadinessEngine>>,
    global: Context,
}

impl Default for Broker {
    fn default() -> Self {
        Self::new()
    }
}

impl Broker {
    /// A broker with an empty global context.
    pub fn new() -> Self {
        Self::with_global(Context::new())
    }

    /// A broker resolving path accesses against `global` when no
    /// explicit context is given. The root is opaque to the broker.
    pub fn with_global(global: Context) -> Self {
        Self {
            registry: Rc::new(RefCell::new(PropertyRegistry::new())),
            engine: Rc::new(RefCell::new(ReadinessEngine::new())),
            global,
        }
    }

    pub const fn global(&self) -> &Context {
        &self.global
    }

    /// Resolve a path against the global context, or re-view an existing
    /// record by id.
    ///
    /// A path access always creates a fresh record, even for a path seen
    /// before; an id access never does. Empty or whitespace-only paths
    /// and unknown ids yield `None`.
    pub fn access(&self, target: impl Into<AccessTarget>) -> Option<AccessorSnapshot> {
        match target.into() {
            AccessTarget::Path(p) => self.access_in(&p, &self.global),
            AccessTarget::Id(id) => {
                let record = self.registry.borrow().lookup(id)?;
                Some(AccessorSnapshot::new(&record, self.clone()))
            }
        }
    }

    /// Resolve `path` against an explicit context, without extension,
    /// and record the lookup.
    pub fn access_in(&self, path: &str, context: &Context) -> Option<AccessorSnapshot> {
        if !path::is_valid(path) {
            return None;
        }
        let value = context.resolve(path);
        let record = self
            .registry
            .borrow_mut()
            .register(value, path.into(), context.clone());
        Some(AccessorSnapshot::new(&record, self.clone()))
    }

    /// Queue `callback` to fire when the record's path first resolves.
    /// Declined (`false`) for an unknown id or an id that is already
    /// pending. Nothing is evaluated before the next tick.
    pub fn schedule(&self, id: u64, callback: impl FnOnce(AccessorSnapshot) + 'static) -> bool {
        if !self.registry.borrow().contains(id) {
            return false;
        }
        self.engine.borrow_mut().schedule(id, Box::new(callback))
    }

    /// One sweep over the pending entries. Each entry's path is
    /// re-resolved against its context; entries whose value appeared are
    /// updated, removed and their callback fired exactly once. Returns
    /// the number of callbacks fired.
    ///
    /// Re-entrant calls (a callback calling back into the broker) and
    /// calls while paused do nothing.
    pub fn tick(&self) -> usize {
        let Some(batch) = self.engine.borrow_mut().begin_tick() else {
            return 0;
        };

        let mut fired = 0;
        let mut still_pending = Vec::with_capacity(batch.len());
        for entry in batch {
            // Records are never deleted, but the registry may have been
            // cleared under a long-lived pending entry.
            let Some(record) = self.registry.borrow().lookup(entry.id) else {
                self.engine.borrow_mut().mark_resolved(entry.id);
                continue;
            };
            let (path, context) = {
                let r = record.borrow();
                (r.path_shared(), r.context().clone())
            };
            let resolved = context.resolve(&path);
            if resolved.is_undefined() {
                still_pending.push(entry);
                continue;
            }
            record.borrow_mut().set_value(resolved);
            // The id leaves the pending set before its callback runs, so
            // the callback itself may defer it again.
            self.engine.borrow_mut().mark_resolved(entry.id);
            // All borrows are released before user code runs.
            let snapshot = AccessorSnapshot::new(&record, self.clone());
            (entry.callback)(snapshot);
            fired += 1;
        }

        self.engine.borrow_mut().end_tick(still_pending);
        fired
    }

    /// Drive ticks at the configured cadence until no pending entries
    /// remain or the timer stops. While paused the timer keeps firing
    /// but ticks do no work. Returns the number of callbacks fired.
    pub fn poll(&self, timer: &mut dyn TickTimer) -> usize {
        let mut fired = 0;
        while self.pending_len() > 0 {
            if !timer.wait(self.tick_interval()) {
                break;
            }
            fired += self.tick();
        }
        fired
    }

    pub fn pause(&self) {
        self.engine.borrow_mut().pause();
    }

    pub fn resume(&self) {
        self.engine.borrow_mut().resume();
    }

    pub fn is_paused(&self) -> bool {
        self.engine.borrow().is_paused()
    }

    pub fn pending_len(&self) -> usize {
        self.engine.borrow().pending_len()
    }

    pub fn set_tick_interval(&self, interval: Duration) {
        self.engine.borrow_mut().set_interval(interval);
    }

    pub fn tick_interval(&self) -> Duration {
        self.engine.borrow().interval()
    }

    /// Number of records issued so far.
    pub fn record_count(&self) -> usize {
        self.registry.borrow().len()
    }

    /// Current value held by a record.
    pub(crate) fn live_value(&self, id: u64) -> Option<Value> {
        self.registry
            .borrow()
            .lookup(id)
            .map(|r| r.borrow().value().clone())
    }

    /// Re-resolve a record's path with extension and store the result in
    /// the record. `None` for unknown ids or extension blocked by a
    /// primitive.
    pub(crate) fn extend_record(&self, id: u64, fill: Value) -> Option<Value> {
        let record = self.registry.borrow().lookup(id)?;
        let (path, context) = {
            let r = record.borrow();
            (r.path_shared(), r.context().clone())
        };
        let resolved = context.extend(&path, fill).ok()?;
        record.borrow_mut().set_value(resolved.clone());
        Some(resolved)
    }
}
