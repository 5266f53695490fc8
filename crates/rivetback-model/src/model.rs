#![forbid(unsafe_code)]

//! Observable attribute record.
//!
//! # Design
//!
//! [`Model`] wraps an attribute map in shared, reference-counted storage
//! (`Rc<RefCell<..>>`). Cloning a `Model` yields another handle to the
//! **same** record. Every model gets a process-unique [`Cid`] at creation
//! that never changes; handle equality compares that identity, not contents.
//!
//! When [`Model::set`] changes an attribute (by `PartialEq`), listeners of
//! `change:<key>` fire first, then listeners of `change`, each in
//! registration order.
//!
//! # Failure Modes
//!
//! - **Re-entrant mutation**: listeners are snapshotted before dispatch and
//!   run outside the borrow, so a listener may call `get`/`set` on the model
//!   that notified it. A listener that unconditionally sets a different
//!   value on the same attribute loops forever.
//! - **Cycles**: a model that (transitively) holds itself is never freed.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::events::{Callback, Event, Listeners, change_event, dispatch};
use crate::value::Value;

static NEXT_CID: AtomicU64 = AtomicU64::new(1);

/// Identity token of a model, stable for its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cid(u64);

impl Cid {
    fn next() -> Self {
        Self(NEXT_CID.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

struct ModelInner {
    cid: Cid,
    attributes: BTreeMap<String, Value>,
    listeners: Listeners,
}

/// A shared, observable attribute record.
///
/// # Invariants
///
/// 1. `cid` never changes and no two live models share one.
/// 2. Attributes are only read and written through `get`/`set`/`unset`.
/// 3. `set(k, v)` where `v == get(k)` is a no-op (no events).
/// 4. `change:<key>` is delivered before `change`.
pub struct Model {
    inner: Rc<RefCell<ModelInner>>,
}

// Manual Clone: shares the same Rc.
impl Clone for Model {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl PartialEq for Model {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Model {
    // Attribute values are left out: nested models may form cycles.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Model")
            .field("cid", &inner.cid)
            .field("keys", &inner.attributes.keys().collect::<Vec<_>>())
            .field("listeners", &inner.listeners.total())
            .finish()
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl Model {
    /// Create an empty model with a fresh identity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(ModelInner {
                cid: Cid::next(),
                attributes: BTreeMap::new(),
                listeners: Listeners::new(),
            })),
        }
    }

    /// Create a model with initial attributes. No events fire.
    pub fn with_attributes<K, I>(attributes: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let model = Self::new();
        model
            .inner
            .borrow_mut()
            .attributes
            .extend(attributes.into_iter().map(|(k, v)| (k.into(), v)));
        model
    }

    #[must_use]
    pub fn cid(&self) -> Cid {
        self.inner.borrow().cid
    }

    /// Read an attribute. Missing attributes read as [`Value::Null`].
    #[must_use]
    pub fn get(&self, key: &str) -> Value {
        self.inner
            .borrow()
            .attributes
            .get(key)
            .cloned()
            .unwrap_or_default()
    }

    /// Whether the attribute is present and not null.
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.inner
            .borrow()
            .attributes
            .get(key)
            .is_some_and(|v| !v.is_null())
    }

    /// Attribute names in sorted order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.inner.borrow().attributes.keys().cloned().collect()
    }

    /// Write an attribute and notify listeners if the value changed.
    ///
    /// Returns whether the value changed.
    pub fn set(&self, key: &str, value: impl Into<Value>) -> bool {
        let value = value.into();
        {
            let mut inner = self.inner.borrow_mut();
            if inner.attributes.get(key) == Some(&value) {
                return false;
            }
            inner.attributes.insert(key.to_string(), value.clone());
        }
        self.notify_change(key, value);
        true
    }

    /// Remove an attribute, notifying with a null value if it was present.
    pub fn unset(&self, key: &str) -> bool {
        let removed = self.inner.borrow_mut().attributes.remove(key);
        if removed.is_none() {
            return false;
        }
        self.notify_change(key, Value::Null);
        true
    }

    /// Register `callback` for each whitespace-separated name in `events`.
    pub fn on(&self, events: &str, callback: &Callback) {
        self.inner.borrow_mut().listeners.on(events, callback);
    }

    /// Deregister `callback` from each name in `events`.
    ///
    /// Returns the number of registrations removed; an unknown callback
    /// removes nothing.
    pub fn off(&self, events: &str, callback: &Callback) -> usize {
        self.inner.borrow_mut().listeners.off(events, callback)
    }

    /// Number of listeners registered under one event name.
    #[must_use]
    pub fn listener_count(&self, event: &str) -> usize {
        self.inner.borrow().listeners.count(event)
    }

    /// Deliver an arbitrary event to its listeners.
    pub fn trigger(&self, event: &str, value: Value) {
        let listeners = self.inner.borrow().listeners.snapshot(event);
        dispatch(&listeners, &Event::new(event, value));
    }

    /// Attributes as a JSON object.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let attributes = self.inner.borrow().attributes.clone();
        serde_json::Value::Object(
            attributes
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }

    fn notify_change(&self, key: &str, value: Value) {
        let name = change_event(key);
        // Snapshot both lists before any listener runs.
        let (keyed, general) = {
            let inner = self.inner.borrow();
            (
                inner.listeners.snapshot(&name),
                inner.listeners.snapshot("change"),
            )
        };
        dispatch(&keyed, &Event::new(name, value));
        if !general.is_empty() {
            dispatch(&general, &Event::new("change", Value::Model(self.clone())));
        }
    }
}
