// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Id-keyed store of property lookup events.
//!
//! Every resolution performed through the broker leaves a record behind,
//! retrievable by its id for the lifetime of the registry. Records are
//! lookup events, not a per-path cache: the same path resolved twice
//! yields two records with distinct ids.

use crate::context::Context;
use crate::value::{Kind, Value};

use core::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Shared handle to a property record.
pub type RecordRef = Rc<RefCell<PropertyRecord>>;

/// One resolved (or attempted) lookup.
#[derive(Debug)]
pub struct PropertyRecord {
    id: u64,
    path: Rc<str>,
    context: Context,
    value: Value,
    kind: Kind,
}

impl PropertyRecord {
    pub const fn id(&self) -> u64 {
        self.id
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub(crate) fn path_shared(&self) -> Rc<str> {
        Rc::clone(&self.path)
    }

    pub const fn context(&self) -> &Context {
        &self.context
    }

    /// Last known resolved value; [`Value::Undefined`] until one appears.
    pub const fn value(&self) -> &Value {
        &self.value
    }

    pub const fn kind(&self) -> Kind {
        self.kind
    }

    /// Replace the value and recompute its kind. Id, path and context
    /// never change after creation.
    pub(crate) fn set_value(&mut self, value: Value) {
        self.kind = value.kind();
        self.value = value;
    }
}

/// Unbounded id-to-record map with a monotonically increasing id counter.
///
/// No eviction: the broker targets short-lived sessions, and stable
/// id-based re-lookup is worth more than reclaiming records. Embedders
/// with unbounded lookup volume should hold that trade-off against their
/// own lifetime expectations.
#[derive(Debug, Default)]
pub struct PropertyRegistry {
    records: BTreeMap<u64, RecordRef>,
    next_id: u64,
}

impl PropertyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a lookup, assigning the next id. Ids start at 0 and are
    /// never reused.
    pub fn register(&mut self, value: Value, path: Rc<str>, context: Context) -> RecordRef {
        let id = self.next_id;
        self.next_id += 1;
        let record = Rc::new(RefCell::new(PropertyRecord {
            id,
            path,
            context,
            kind: value.kind(),
            value,
        }));
        self.records.insert(id, Rc::clone(&record));
        record
    }

    /// Retrieve a record by id, if it was ever issued.
    pub fn lookup(&self, id: u64) -> Option<RecordRef> {
        self.records.get(&id).cloned()
    }

    pub fn contains(&self, id: u64) -> bool {
        self.records.contains_key(&id)
    }

    /// Replace a record's value (and recompute its kind) in place.
    /// Returns false for an unknown id.
    pub fn update(&self, id: u64, value: Value) -> bool {
        match self.records.get(&id) {
            Some(record) => {
                record.borrow_mut().set_value(value);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drop all records. The id counter is not rewound: ids are never
    /// reissued, even across a clear.
    pub fn clear(&mut self) {
        self.records.clear();
    }
}
