#![forbid(unsafe_code)]

//! The four-operation surface handed to the binder.
//!
//! The binder calls every operation with whatever object a binding is
//! attached to, so targets are classified first:
//!
//! | Target     | subscribe / unsubscribe | read / publish                 |
//! |------------|-------------------------|--------------------------------|
//! | Model      | key-path observation    | key-path accessor              |
//! | Collection | ignored                 | plain collection property      |
//! | Other      | ignored                 | [`AdapterError::NotAModel`]    |
//!
//! A model attribute that holds a collection is read back as the plain list
//! of its members, since the binder iterates lists, not collections.

use rivetback_model::{Callback, Value};
use tracing::trace;

use crate::accessor;
use crate::error::{AdapterError, AdapterResult};
use crate::observer;
use crate::target::Target;

/// The contract a binder drives.
pub trait Adapter {
    /// Start delivering changes of `keypath` under `obj` to `callback`.
    fn subscribe(&self, obj: &Value, keypath: &str, callback: &Callback) -> AdapterResult<()>;

    /// Stop what `subscribe` started for the same arguments.
    fn unsubscribe(&self, obj: &Value, keypath: &str, callback: &Callback) -> AdapterResult<()>;

    /// Current value of `keypath` under `obj`.
    fn read(&self, obj: &Value, keypath: &str) -> AdapterResult<Value>;

    /// Write `value` to `keypath` under `obj`.
    fn publish(&self, obj: &Value, keypath: &str, value: Value) -> AdapterResult<()>;
}

/// [`Adapter`] over [`rivetback_model`] models and collections.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelAdapter;

impl ModelAdapter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Adapter for ModelAdapter {
    fn subscribe(&self, obj: &Value, keypath: &str, callback: &Callback) -> AdapterResult<()> {
        observer::subscribe(Target::from(obj), keypath, callback)
    }

    fn unsubscribe(&self, obj: &Value, keypath: &str, callback: &Callback) -> AdapterResult<()> {
        observer::unsubscribe(Target::from(obj), keypath, callback)
    }

    fn read(&self, obj: &Value, keypath: &str) -> AdapterResult<Value> {
        match Target::from(obj) {
            Target::Collection(collection) => Ok(collection.property(keypath)),
            Target::Model(model) => match accessor::read(model, keypath)? {
                Value::Collection(collection) => {
                    trace!(keypath, "unwrapping collection into member list");
                    Ok(collection.models_value())
                }
                value => Ok(value),
            },
            target @ Target::Other(_) => Err(AdapterError::NotAModel {
                operation: "read",
                found: target.kind(),
            }),
        }
    }

    fn publish(&self, obj: &Value, keypath: &str, value: Value) -> AdapterResult<()> {
        match Target::from(obj) {
            Target::Collection(collection) => collection
                .set_property(keypath, value)
                .map_err(AdapterError::from),
            Target::Model(model) => accessor::write(model, keypath, value),
            target @ Target::Other(_) => Err(AdapterError::NotAModel {
                operation: "publish",
                found: target.kind(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rivetback_model::{Collection, Model, ModelError, callback};
    use std::cell::Cell;
    use std::rc::Rc;

    fn counter() -> (Rc<Cell<u32>>, Callback) {
        let count = Rc::new(Cell::new(0u32));
        let count_clone = Rc::clone(&count);
        let cb = callback(move |_| count_clone.set(count_clone.get() + 1));
        (count, cb)
    }

    #[test]
    fn read_collection_property_directly() {
        let coll = Collection::with_models(vec![Model::new(), Model::new(), Model::new()]);
        let adapter = ModelAdapter::new();
        let value = adapter.read(&Value::Collection(coll), "length").unwrap();
        assert_eq!(value, Value::Int(3));
    }

    #[test]
    fn dotted_name_on_collection_is_not_resolved() {
        let coll = Collection::new();
        coll.set_property("a.b", Value::from("literal")).unwrap();
        let adapter = ModelAdapter::new();
        let obj = Value::Collection(coll);
        assert_eq!(adapter.read(&obj, "a.b").unwrap(), Value::from("literal"));
    }

    #[test]
    fn read_collection_attribute_as_member_list() {
        let m1 = Model::new();
        let m2 = Model::new();
        let items = Collection::with_models(vec![m1.clone(), m2.clone()]);
        let root = Model::with_attributes([("items", Value::Collection(items))]);

        let value = ModelAdapter.read(&Value::Model(root), "items").unwrap();
        assert_eq!(value, Value::List(vec![Value::Model(m1), Value::Model(m2)]));
    }

    #[test]
    fn publish_collection_property() {
        let coll = Collection::new();
        let obj = Value::Collection(coll.clone());
        ModelAdapter.publish(&obj, "page", Value::Int(2)).unwrap();
        assert_eq!(coll.property("page"), Value::Int(2));

        let err = ModelAdapter.publish(&obj, "length", Value::Int(9)).unwrap_err();
        assert_eq!(
            err,
            AdapterError::Model(ModelError::ReadOnlyProperty("length".into()))
        );
    }

    #[test]
    fn publish_then_read_model_path() {
        let inner = Model::new();
        let root = Value::Model(Model::with_attributes([("inner", Value::Model(inner))]));
        ModelAdapter.publish(&root, "inner.name", Value::from("x")).unwrap();
        assert_eq!(ModelAdapter.read(&root, "inner.name").unwrap(), Value::from("x"));
    }

    #[test]
    fn read_and_publish_reject_other_targets() {
        let scalar = Value::Int(4);
        assert_eq!(
            ModelAdapter.read(&scalar, "x").unwrap_err(),
            AdapterError::NotAModel {
                operation: "read",
                found: "int"
            }
        );
        assert!(matches!(
            ModelAdapter.publish(&Value::Null, "x", Value::Null),
            Err(AdapterError::NotAModel { operation: "publish", found: "null" })
        ));
    }

    #[test]
    fn subscribe_on_collection_target_is_noop() {
        let coll = Collection::new();
        let (count, cb) = counter();
        let obj = Value::Collection(coll.clone());
        ModelAdapter.subscribe(&obj, "length", &cb).unwrap();
        ModelAdapter.unsubscribe(&obj, "length", &cb).unwrap();
        coll.add(Model::new());
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn subscribe_through_facade_fires() {
        let model = Model::new();
        let (count, cb) = counter();
        let obj = Value::Model(model.clone());
        ModelAdapter.subscribe(&obj, "n", &cb).unwrap();
        model.set("n", 1);
        assert_eq!(count.get(), 1);

        ModelAdapter.unsubscribe(&obj, "n", &cb).unwrap();
        model.set("n", 2);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn usable_as_trait_object() {
        let adapter: Box<dyn Adapter> = Box::new(ModelAdapter::new());
        let model = Value::Model(Model::with_attributes([("k", Value::Bool(true))]));
        assert_eq!(adapter.read(&model, "k").unwrap(), Value::Bool(true));
    }
}
