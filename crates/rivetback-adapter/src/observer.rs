#![forbid(unsafe_code)]

//! Change registration along a key-path.
//!
//! The model layer does not bubble: a change on `a.b.c` is only announced by
//! `c` itself. To let a binding on `"b.c.d"` react when any link of the chain
//! is replaced, the same callback is registered on every level of the walk:
//!
//! ```text
//! subscribe(a, "b.c.d", f)
//!   a: change:b
//!   b: change:c
//!   c: change:d
//! ```
//!
//! If the terminal attribute currently holds a [`Collection`], only the
//! collection's `add remove reset` channel is used and no intermediate
//! levels are registered.
//!
//! # Invariants
//!
//! 1. Subscribe and unsubscribe compute the same registration set for the
//!    same model state, so unsubscribing with the same [`Callback`] handle
//!    removes everything subscribing added.
//! 2. Non-model targets are ignored without error.
//!
//! # Failure Modes
//!
//! - **Stale chain**: the registration set is computed from the current
//!   attribute values. If an intermediate model was replaced between
//!   subscribe and unsubscribe, listeners on the replaced model stay behind.

use rivetback_model::events::event_names;
use rivetback_model::{Callback, Collection, Model, Value, change_event};
use tracing::{debug, trace};

use crate::error::AdapterResult;
use crate::keypath;
use crate::target::Target;

/// Event channel used when the bound attribute holds a collection.
pub const COLLECTION_EVENTS: &str = "add remove reset";

/// Direction of a registration pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    On,
    Off,
}

impl Action {
    fn on_model(self, model: &Model, events: &str, callback: &Callback) -> usize {
        match self {
            Self::On => {
                model.on(events, callback);
                event_names(events).count()
            }
            Self::Off => model.off(events, callback),
        }
    }

    fn on_collection(self, collection: &Collection, events: &str, callback: &Callback) -> usize {
        match self {
            Self::On => {
                collection.on(events, callback);
                event_names(events).count()
            }
            Self::Off => collection.off(events, callback),
        }
    }
}

/// Register `callback` for changes to `keypath` under `target`.
///
/// # Errors
///
/// Propagates resolution errors.
pub fn subscribe(target: Target<'_>, keypath: &str, callback: &Callback) -> AdapterResult<()> {
    observe(Action::On, target, keypath, callback).map(drop)
}

/// Remove what [`subscribe`] registered for the same arguments.
///
/// # Errors
///
/// Propagates resolution errors.
pub fn unsubscribe(target: Target<'_>, keypath: &str, callback: &Callback) -> AdapterResult<()> {
    observe(Action::Off, target, keypath, callback).map(drop)
}

/// Apply `action` to every event source `keypath` depends on.
///
/// Returns the number of registrations added (`On`) or removed (`Off`).
///
/// # Errors
///
/// Propagates resolution errors.
pub fn observe(
    action: Action,
    target: Target<'_>,
    keypath: &str,
    callback: &Callback,
) -> AdapterResult<usize> {
    let Target::Model(root) = target else {
        trace!(?action, keypath, kind = target.kind(), "ignoring non-model target");
        return Ok(0);
    };

    let levels = keypath::trace(root, keypath)?;
    let Some((terminal, intermediate)) = levels.split_last() else {
        return Ok(0);
    };

    let touched = match terminal.model.get(&terminal.key) {
        Value::Collection(collection) => {
            action.on_collection(&collection, COLLECTION_EVENTS, callback)
        }
        _ => {
            let mut touched =
                action.on_model(&terminal.model, &change_event(&terminal.key), callback);
            if terminal.model.cid() != root.cid() {
                for level in intermediate {
                    touched += action.on_model(&level.model, &change_event(&level.key), callback);
                }
            }
            touched
        }
    };

    debug!(?action, keypath, root = %root.cid(), touched, "updated change listeners");
    Ok(touched)
}
