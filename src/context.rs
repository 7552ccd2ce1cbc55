// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::path::{self, PathError};
use crate::value::Value;

use core::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;

/// Shared, mutable root of a host object graph.
///
/// Cloning a `Context` aliases the same graph: property records keep the
/// graph by reference, and host code is free to populate it between
/// polling ticks. The broker never assumes any particular shape for the
/// root; any [`Value`] tree works.
#[derive(Debug, Clone)]
pub struct Context {
    root: Rc<RefCell<Value>>,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    /// An empty object root.
    pub fn new() -> Self {
        Self::from_value(Value::new_object())
    }

    pub fn from_value(root: Value) -> Self {
        Self {
            root: Rc::new(RefCell::new(root)),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(Self::from_value(Value::from_json_str(json)?))
    }

    #[cfg(feature = "yaml")]
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(Self::from_value(Value::from_yaml_str(yaml)?))
    }

    /// Snapshot of the current root. Cheap: values are copy-on-write.
    pub fn root(&self) -> Value {
        self.root.borrow().clone()
    }

    pub fn set_root(&self, root: Value) {
        *self.root.borrow_mut() = root;
    }

    /// Run `f` with mutable access to the root.
    pub fn with_root_mut<R>(&self, f: impl FnOnce(&mut Value) -> R) -> R {
        f(&mut self.root.borrow_mut())
    }

    /// Whether two contexts alias the same graph.
    pub fn same_graph(&self, other: &Context) -> bool {
        Rc::ptr_eq(&self.root, &other.root)
    }

    /// Resolve `path` against this graph without creating anything.
    pub fn resolve(&self, path: &str) -> Value {
        path::resolve(&self.root.borrow(), path).clone()
    }

    /// Resolve `path`, creating missing segments; a free final slot
    /// receives `fill`, an occupied one is returned unchanged.
    pub fn extend(&self, path: &str, fill: Value) -> Result<Value, PathError> {
        path::extend(&mut self.root.borrow_mut(), path, fill)
    }

    /// Place `value` at `path`, creating missing segments and replacing
    /// whatever the final slot holds. Host-side graph population.
    pub fn set(&self, path: &str, value: Value) -> Result<(), PathError> {
        if !path::is_valid(path) {
            return Err(PathError::Empty);
        }
        let segments = path::split(path);
        let mut root = self.root.borrow_mut();
        let slot = path::make_or_get_mut(&mut root, path, &segments)?;
        *slot = value;
        Ok(())
    }
}
