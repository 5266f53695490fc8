#![forbid(unsafe_code)]

//! Named event channels shared by [`Model`](crate::Model) and
//! [`Collection`](crate::Collection).
//!
//! # Design
//!
//! Listeners are stored per event name as strong [`Callback`] handles.
//! Registration is explicit: the handle passed to [`Listeners::on`] is the
//! identity used by [`Listeners::off`], so callers must keep the same `Rc`
//! around to deregister. Two callbacks with identical bodies are different
//! listeners.
//!
//! Event name arguments may hold several names separated by whitespace
//! (`"add remove reset"`); each name gets its own registration.
//!
//! # Failure Modes
//!
//! - **Listener leak**: deregistering with a different `Rc` than the one
//!   registered is a silent no-op and leaves the original listener in place.

use std::collections::HashMap;
use std::rc::Rc;

use crate::value::Value;

/// A listener callback. Identity is the `Rc` allocation.
pub type Callback = Rc<dyn Fn(&Event)>;

/// Wrap a closure as a [`Callback`].
pub fn callback(f: impl Fn(&Event) + 'static) -> Callback {
    Rc::new(f)
}

/// Whether two callback handles refer to the same listener.
#[must_use]
pub fn same_callback(a: &Callback, b: &Callback) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

/// A delivered event.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// The single event name this delivery was registered under,
    /// e.g. `change:title` or `reset`.
    pub name: String,
    /// Payload. Depends on the event kind.
    pub value: Value,
}

impl Event {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Name of the per-attribute change event for `key`.
#[must_use]
pub fn change_event(key: &str) -> String {
    format!("change:{key}")
}

/// Split a whitespace-delimited event list into individual names.
pub fn event_names(events: &str) -> impl Iterator<Item = &str> {
    events.split_whitespace()
}

/// Listener lists keyed by event name.
#[derive(Default)]
pub struct Listeners {
    by_name: HashMap<String, Vec<Callback>>,
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut counts: Vec<(&str, usize)> = self
            .by_name
            .iter()
            .map(|(name, list)| (name.as_str(), list.len()))
            .collect();
        counts.sort_unstable();
        f.debug_map().entries(counts).finish()
    }
}

impl Listeners {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for every name in `events`.
    pub fn on(&mut self, events: &str, callback: &Callback) {
        for name in event_names(events) {
            self.by_name
                .entry(name.to_string())
                .or_default()
                .push(Rc::clone(callback));
        }
    }

    /// Remove every registration of `callback` for every name in `events`.
    ///
    /// Returns the number of registrations removed.
    pub fn off(&mut self, events: &str, callback: &Callback) -> usize {
        let mut removed = 0;
        for name in event_names(events) {
            let Some(list) = self.by_name.get_mut(name) else {
                continue;
            };
            let before = list.len();
            list.retain(|cb| !same_callback(cb, callback));
            removed += before - list.len();
            if list.is_empty() {
                self.by_name.remove(name);
            }
        }
        removed
    }

    /// Number of listeners registered under a single event name.
    #[must_use]
    pub fn count(&self, name: &str) -> usize {
        self.by_name.get(name).map_or(0, Vec::len)
    }

    /// Total registrations across all names.
    #[must_use]
    pub fn total(&self) -> usize {
        self.by_name.values().map(Vec::len).sum()
    }

    /// Snapshot the listeners for `name` in registration order.
    ///
    /// Callers invoke the snapshot after releasing any borrow on the owner,
    /// so callbacks are free to read or mutate it.
    #[must_use]
    pub fn snapshot(&self, name: &str) -> Vec<Callback> {
        self.by_name.get(name).cloned().unwrap_or_default()
    }
}

/// Invoke a snapshot of listeners with one event.
pub(crate) fn dispatch(listeners: &[Callback], event: &Event) {
    for cb in listeners {
        cb(event);
    }
}
