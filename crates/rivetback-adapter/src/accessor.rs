#![forbid(unsafe_code)]

//! Attribute get/set through a key-path.

use rivetback_model::{Model, Value};

use crate::error::AdapterResult;
use crate::keypath::resolve;

/// Read the attribute `keypath` names, relative to `model`.
///
/// # Errors
///
/// Propagates resolution errors.
pub fn read(model: &Model, keypath: &str) -> AdapterResult<Value> {
    let root = resolve(model, keypath, None)?;
    Ok(root.owner.get(&root.final_key))
}

/// Write the attribute `keypath` names. The owning model emits its own
/// change events.
///
/// # Errors
///
/// Propagates resolution errors.
pub fn write(model: &Model, keypath: &str, value: Value) -> AdapterResult<()> {
    let root = resolve(model, keypath, None)?;
    root.owner.set(&root.final_key, value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rivetback_model::callback;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn read_write_nested() {
        let c = Model::with_attributes([("d", Value::Int(5))]);
        let b = Model::with_attributes([("c", Value::Model(c.clone()))]);
        let a = Model::with_attributes([("b", Value::Model(b))]);

        assert_eq!(read(&a, "b.c.d").unwrap(), Value::Int(5));
        write(&a, "b.c.d", Value::Int(9)).unwrap();
        assert_eq!(read(&a, "b.c.d").unwrap(), Value::Int(9));
        assert_eq!(c.get("d"), Value::Int(9));
    }

    #[test]
    fn read_missing_leaf_is_null() {
        let a = Model::new();
        assert_eq!(read(&a, "nothing").unwrap(), Value::Null);
    }

    #[test]
    fn write_notifies_owner_only() {
        let inner = Model::new();
        let outer = Model::with_attributes([("inner", Value::Model(inner.clone()))]);

        let count = Rc::new(Cell::new(0u32));
        let count_clone = Rc::clone(&count);
        let cb = callback(move |_| count_clone.set(count_clone.get() + 1));
        inner.on("change:x", &cb);
        outer.on("change", &cb);

        write(&outer, "inner.x", Value::from("y")).unwrap();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn write_through_scalar_fails() {
        let a = Model::with_attributes([("b", Value::Int(1))]);
        assert!(write(&a, "b.c", Value::Null).is_err());
        assert_eq!(a.get("b"), Value::Int(1));
    }
}
