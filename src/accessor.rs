// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::broker::Broker;
use crate::registry::RecordRef;
use crate::value::{Kind, Value};

use core::fmt;
use std::rc::Rc;

use anyhow::Result;

/// What [`Broker::access`] is asked to resolve: a dotted path, or the id
/// of a previously issued record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessTarget {
    Path(String),
    Id(u64),
}

impl From<&str> for AccessTarget {
    fn from(path: &str) -> Self {
        AccessTarget::Path(path.to_owned())
    }
}

impl From<String> for AccessTarget {
    fn from(path: String) -> Self {
        AccessTarget::Path(path)
    }
}

impl From<u64> for AccessTarget {
    fn from(id: u64) -> Self {
        AccessTarget::Id(id)
    }
}

/// Caller-owned view of a property record at a point in time.
///
/// The value is a detached copy: mutating it never changes the record or
/// the context graph it was resolved from. Operations that act on live
/// state (`extend`, `invoke`, `when_ready`) go back through the broker
/// to the record itself.
#[derive(Clone)]
pub struct AccessorSnapshot {
    id: u64,
    path: Rc<str>,
    value: Value,
    kind: Kind,
    broker: Broker,
}

impl fmt::Debug for AccessorSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("AccessorSnapshot")
            .field("id", &self.id)
            .field("path", &self.path)
            .field("kind", &self.kind)
            .field("value", &self.value)
            .finish()
    }
}

impl AccessorSnapshot {
    pub(crate) fn new(record: &RecordRef, broker: Broker) -> Self {
        let r = record.borrow();
        Self {
            id: r.id(),
            path: r.path_shared(),
            value: r.value().clone(),
            kind: r.kind(),
            broker,
        }
    }

    pub const fn id(&self) -> u64 {
        self.id
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Run-time category of the value captured by this snapshot.
    pub const fn kind(&self) -> Kind {
        self.kind
    }

    /// The captured value; [`Value::Undefined`] when the path had not
    /// resolved at capture time.
    pub const fn value(&self) -> &Value {
        &self.value
    }

    /// Mutable access to the captured value. The copy is detached;
    /// nothing here reaches the record or the context graph.
    pub fn value_mut(&mut self) -> &mut Value {
        &mut self.value
    }

    /// The captured value, or `default` when it is absent.
    pub fn value_or(&self, default: Value) -> Value {
        match &self.value {
            Value::Undefined => default,
            v => v.clone(),
        }
    }

    /// Re-resolve the path with extension, filling missing segments with
    /// empty objects.
    pub fn extend(&mut self) -> Value {
        self.extend_with(Value::new_object())
    }

    /// Re-resolve the path with extension. Missing intermediate segments
    /// become empty objects and a free final slot receives `fill`; an
    /// already-present value is returned unchanged, never overwritten.
    /// The live record is updated in place; extension blocked by a
    /// primitive is reported as [`Value::Undefined`].
    pub fn extend_with(&mut self, fill: Value) -> Value {
        match self.broker.extend_record(self.id, fill) {
            Some(resolved) => {
                self.kind = resolved.kind();
                self.value = resolved.clone();
                resolved
            }
            None => Value::Undefined,
        }
    }

    /// Call the record's current value with the given receiver and
    /// arguments. `None` when the value is not invocable; no call is
    /// performed in that case.
    pub fn invoke(&self, receiver: &Value, args: &[Value]) -> Option<Result<Value>> {
        match self.broker.live_value(self.id) {
            Some(Value::Function(f)) => Some(f.call(receiver, args)),
            _ => None,
        }
    }

    /// [`invoke`](Self::invoke) with arguments supplied one by one.
    pub fn invoke_with(
        &self,
        receiver: &Value,
        args: impl IntoIterator<Item = Value>,
    ) -> Option<Result<Value>> {
        let args: Vec<Value> = args.into_iter().collect();
        self.invoke(receiver, &args)
    }

    /// Whether the record currently holds a value.
    pub fn is_ready(&self) -> bool {
        !matches!(self.broker.live_value(self.id), None | Some(Value::Undefined))
    }

    /// Run `callback` once the record's value is available.
    ///
    /// Already available: the callback runs synchronously with a fresh
    /// snapshot and the result is `true`. Otherwise the callback is
    /// handed to the readiness engine and fires at most once, on the
    /// first tick that finds a value; the result is `false` (not yet
    /// ready).
    ///
    /// An id is pending at most once: deferring an id that is already
    /// pending drops `callback` and leaves the earlier deferral in
    /// effect. Callers that need to observe the decline go through
    /// [`Broker::schedule`] directly.
    pub fn when_ready(&self, callback: impl FnOnce(AccessorSnapshot) + 'static) -> bool {
        if self.is_ready() {
            if let Some(snapshot) = self.broker.access(self.id) {
                callback(snapshot);
            }
            return true;
        }
        self.broker.schedule(self.id, callback);
        false
    }
}
