// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Dotted-path resolution over [`Value`] graphs.
//!
//! A path is a `.`-separated sequence of field names. Resolution walks the
//! graph one segment at a time; extension lazily creates missing segments.
//! The resolver itself carries no state.

use crate::value::{Kind, Value};

use std::rc::Rc;

/// Error raised when a path cannot be lazily extended.
///
/// Expected absence is never an error; this only covers paths the caller
/// asked the broker to create.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PathError {
    /// The path is empty or whitespace-only.
    #[error("path is empty or whitespace-only")]
    Empty,
    /// A non-container value sits in the middle of the path.
    #[error("cannot extend '{path}': segment '{segment}' is blocked by a {kind} value")]
    NotExtensible {
        path: String,
        segment: String,
        kind: Kind,
    },
}

/// A path is usable if it contains anything besides whitespace.
/// Callers reject invalid paths before the resolver runs.
pub fn is_valid(path: &str) -> bool {
    !path.trim().is_empty()
}

/// Split a dotted path into its segments.
pub fn split(path: &str) -> Vec<&str> {
    path.split('.').collect()
}

/// Resolve `path` against `root` without creating anything.
///
/// The walk stops at the first segment that is missing or that sits under
/// a non-container value; both cases yield [`Value::Undefined`], the way
/// host property access does.
pub fn resolve<'a>(root: &'a Value, path: &str) -> &'a Value {
    let mut node = root;
    for segment in path.split('.') {
        node = &node[segment];
        if node.is_undefined() {
            return &Value::Undefined;
        }
    }
    node
}

/// Walk `segments` under `root`, creating missing steps, and return the
/// slot at the end of the path.
///
/// Missing intermediate segments become fresh empty objects; a missing
/// final segment is left as [`Value::Undefined`] so the caller decides
/// what to place there. Existing values are never replaced. Extending
/// through a primitive fails.
pub fn make_or_get_mut<'a>(
    root: &'a mut Value,
    path: &str,
    segments: &[&str],
) -> Result<&'a mut Value, PathError> {
    if segments.is_empty() {
        return Ok(root);
    }

    if root.is_undefined() {
        *root = Value::new_object();
    }

    let key = Value::String(segments[0].into());
    match root {
        Value::Object(map) => {
            let map = Rc::make_mut(map);
            let child = map.entry(key).or_insert(Value::Undefined);
            make_or_get_mut(child, path, &segments[1..])
        }
        other => Err(PathError::NotExtensible {
            path: path.to_owned(),
            segment: segments[0].to_owned(),
            kind: other.kind(),
        }),
    }
}

/// Resolve `path` against `root`, creating missing segments.
///
/// If the final slot is free it receives `fill`; an already-present value
/// is returned unchanged, never overwritten.
pub fn extend(root: &mut Value, path: &str, fill: Value) -> Result<Value, PathError> {
    if !is_valid(path) {
        return Err(PathError::Empty);
    }
    let segments = split(path);
    let slot = make_or_get_mut(root, path, &segments)?;
    if slot.is_undefined() {
        *slot = fill;
    }
    Ok(slot.clone())
}
