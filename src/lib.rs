// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

// Use README.md as crate documentation.
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

mod accessor;
mod broker;
mod context;
mod number;
mod path;
mod readiness;
mod registry;
mod value;

pub use accessor::{AccessTarget, AccessorSnapshot};
pub use broker::Broker;
pub use context::Context;
pub use number::Number;
pub use path::PathError;
pub use readiness::{
    CountdownTimer, ReadinessEngine, ReadyCallback, SleepTimer, TickTimer, DEFAULT_TICK_INTERVAL,
};
pub use registry::{PropertyRecord, PropertyRegistry, RecordRef};
pub use value::{HostFn, Kind, NativeFn, Value};

#[cfg(test)]
mod tests;
