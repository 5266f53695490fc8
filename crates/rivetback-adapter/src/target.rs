#![forbid(unsafe_code)]

//! Classification of the objects the binder hands to the adapter.

use rivetback_model::{Collection, Model, Value};

/// What kind of object an adapter call was made on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Target<'a> {
    Model(&'a Model),
    Collection(&'a Collection),
    /// Anything else: scalars, plain lists, null.
    Other(&'a Value),
}

impl Target<'_> {
    /// Kind name of the underlying value.
    #[must_use]
    pub fn kind(self) -> &'static str {
        match self {
            Self::Model(_) => "model",
            Self::Collection(_) => "collection",
            Self::Other(value) => value.kind(),
        }
    }
}

impl<'a> From<&'a Value> for Target<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            Value::Model(model) => Self::Model(model),
            Value::Collection(collection) => Self::Collection(collection),
            other => Self::Other(other),
        }
    }
}

impl<'a> From<&'a Model> for Target<'a> {
    fn from(model: &'a Model) -> Self {
        Self::Model(model)
    }
}

impl<'a> From<&'a Collection> for Target<'a> {
    fn from(collection: &'a Collection) -> Self {
        Self::Collection(collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_values() {
        let model = Value::Model(Model::new());
        let coll = Value::Collection(Collection::new());
        let text = Value::from("x");

        assert!(matches!(Target::from(&model), Target::Model(_)));
        assert!(matches!(Target::from(&coll), Target::Collection(_)));
        assert!(matches!(Target::from(&text), Target::Other(_)));
        assert_eq!(Target::from(&text).kind(), "string");
        assert_eq!(Target::from(&Value::Null).kind(), "null");
    }
}
