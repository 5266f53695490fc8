#![forbid(unsafe_code)]

//! Observable ordered set of models.
//!
//! A [`Collection`] holds models in insertion order and emits coarse
//! events: `add` and `remove` carry the affected model, `reset` carries the
//! new member list. Per-attribute changes on members are not forwarded.
//!
//! Besides its members a collection exposes plain properties, read and
//! written by name without events: the derived `length` and `models`, plus
//! any host-defined property stored with [`Collection::set_property`].

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::events::{Callback, Event, Listeners, dispatch};
use crate::model::Model;
use crate::value::Value;

/// Derived property holding the member count.
pub const LENGTH: &str = "length";
/// Derived property holding the member list.
pub const MODELS: &str = "models";

/// Errors from the model layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A derived collection property was assigned.
    ReadOnlyProperty(String),
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadOnlyProperty(name) => {
                write!(f, "collection property '{name}' is read-only")
            }
        }
    }
}

impl std::error::Error for ModelError {}

struct CollectionInner {
    models: Vec<Model>,
    properties: HashMap<String, Value>,
    listeners: Listeners,
}

/// A shared, observable list of models.
///
/// # Invariants
///
/// 1. A model appears at most once (by identity).
/// 2. `add` of a present model and `remove` of an absent one are no-ops.
/// 3. Every successful mutation emits exactly one event.
pub struct Collection {
    inner: Rc<RefCell<CollectionInner>>,
}

impl Clone for Collection {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl PartialEq for Collection {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Collection")
            .field("cids", &inner.models.iter().map(Model::cid).collect::<Vec<_>>())
            .field("listeners", &inner.listeners.total())
            .finish()
    }
}

impl Default for Collection {
    fn default() -> Self {
        Self::new()
    }
}

impl Collection {
    #[must_use]
    pub fn new() -> Self {
        Self::with_models(Vec::new())
    }

    /// Create a collection from initial members. No events fire; duplicate
    /// handles are dropped.
    #[must_use]
    pub fn with_models(models: Vec<Model>) -> Self {
        let mut unique: Vec<Model> = Vec::with_capacity(models.len());
        for model in models {
            if !unique.contains(&model) {
                unique.push(model);
            }
        }
        Self {
            inner: Rc::new(RefCell::new(CollectionInner {
                models: unique,
                properties: HashMap::new(),
                listeners: Listeners::new(),
            })),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().models.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Member at `index`, if any.
    #[must_use]
    pub fn at(&self, index: usize) -> Option<Model> {
        self.inner.borrow().models.get(index).cloned()
    }

    #[must_use]
    pub fn contains(&self, model: &Model) -> bool {
        self.inner.borrow().models.contains(model)
    }

    /// Members in order.
    #[must_use]
    pub fn models(&self) -> Vec<Model> {
        self.inner.borrow().models.clone()
    }

    /// Append a model and emit `add`. Returns false if already present.
    pub fn add(&self, model: Model) -> bool {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.models.contains(&model) {
                return false;
            }
            inner.models.push(model.clone());
        }
        self.emit("add", Value::Model(model));
        true
    }

    /// Remove a model and emit `remove`. Returns false if absent.
    pub fn remove(&self, model: &Model) -> bool {
        {
            let mut inner = self.inner.borrow_mut();
            let Some(pos) = inner.models.iter().position(|m| m == model) else {
                return false;
            };
            inner.models.remove(pos);
        }
        self.emit("remove", Value::Model(model.clone()));
        true
    }

    /// Replace all members and emit `reset` with the new list.
    pub fn reset(&self, models: Vec<Model>) {
        let fresh = Self::with_models(models).models();
        self.inner.borrow_mut().models = fresh.clone();
        self.emit("reset", Value::List(fresh.into_iter().map(Value::Model).collect()));
    }

    /// Read a plain property by name.
    ///
    /// `length` and `models` are derived from the members; anything else is
    /// looked up among host-defined properties and reads as null if unset.
    #[must_use]
    pub fn property(&self, name: &str) -> Value {
        match name {
            LENGTH => Value::Int(i64::try_from(self.len()).unwrap_or(i64::MAX)),
            MODELS => self.models_value(),
            _ => self
                .inner
                .borrow()
                .properties
                .get(name)
                .cloned()
                .unwrap_or_default(),
        }
    }

    /// Assign a plain property. No events fire.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::ReadOnlyProperty`] for `length` and `models`.
    pub fn set_property(&self, name: &str, value: Value) -> Result<(), ModelError> {
        if matches!(name, LENGTH | MODELS) {
            return Err(ModelError::ReadOnlyProperty(name.to_string()));
        }
        self.inner
            .borrow_mut()
            .properties
            .insert(name.to_string(), value);
        Ok(())
    }

    /// Members as a plain list of model values.
    #[must_use]
    pub fn models_value(&self) -> Value {
        Value::List(self.models().into_iter().map(Value::Model).collect())
    }

    /// Register `callback` for each whitespace-separated name in `events`.
    pub fn on(&self, events: &str, callback: &Callback) {
        self.inner.borrow_mut().listeners.on(events, callback);
    }

    /// Deregister `callback` from each name in `events`.
    pub fn off(&self, events: &str, callback: &Callback) -> usize {
        self.inner.borrow_mut().listeners.off(events, callback)
    }

    #[must_use]
    pub fn listener_count(&self, event: &str) -> usize {
        self.inner.borrow().listeners.count(event)
    }

    /// Members as a JSON array of objects.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Array(self.models().iter().map(Model::to_json).collect())
    }

    fn emit(&self, name: &str, value: Value) {
        let listeners = self.inner.borrow().listeners.snapshot(name);
        dispatch(&listeners, &Event::new(name, value));
    }
}
