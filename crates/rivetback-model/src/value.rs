#![forbid(unsafe_code)]

//! Attribute values.
//!
//! A [`Value`] is whatever a model attribute can hold: scalars, plain lists,
//! or handles to nested [`Model`]s and [`Collection`]s. Model and collection
//! variants are shared handles, so cloning a `Value` never deep-copies a
//! nested record and equality on them is identity.

use serde_json::{Map, Number};

use crate::collection::Collection;
use crate::model::Model;

/// A model attribute value.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    /// Missing or explicitly cleared.
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// A plain ordered sequence. Carries no events.
    List(Vec<Value>),
    Model(Model),
    Collection(Collection),
}

impl Value {
    /// Short name of the variant, used in error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
            Self::List(_) => "list",
            Self::Model(_) => "model",
            Self::Collection(_) => "collection",
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_model(&self) -> Option<&Model> {
        match self {
            Self::Model(m) => Some(m),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_collection(&self) -> Option<&Collection> {
        match self {
            Self::Collection(c) => Some(c),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Build a value tree from JSON.
    ///
    /// Objects become [`Model`]s. Non-empty arrays whose elements are all
    /// objects become [`Collection`]s; every other array becomes a
    /// [`Value::List`]. Integers that fit `i64` become [`Value::Int`].
    #[must_use]
    pub fn from_json(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Self::Str(s.clone()),
            serde_json::Value::Array(items) => {
                if !items.is_empty() && items.iter().all(serde_json::Value::is_object) {
                    let models = items.iter().filter_map(object_to_model).collect();
                    Self::Collection(Collection::with_models(models))
                } else {
                    Self::List(items.iter().map(Self::from_json).collect())
                }
            }
            serde_json::Value::Object(_) => {
                object_to_model(json).map_or(Self::Null, Self::Model)
            }
        }
    }

    /// Serialise to JSON. Models become objects and collections arrays.
    ///
    /// Non-finite floats serialise as `null`. A model graph containing a
    /// cycle recurses without bound.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Int(n) => serde_json::Value::Number((*n).into()),
            Self::Float(f) => {
                Number::from_f64(*f).map_or(serde_json::Value::Null, serde_json::Value::Number)
            }
            Self::Str(s) => serde_json::Value::String(s.clone()),
            Self::List(items) => serde_json::Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Model(m) => m.to_json(),
            Self::Collection(c) => c.to_json(),
        }
    }
}

fn object_to_model(json: &serde_json::Value) -> Option<Model> {
    let object: &Map<String, serde_json::Value> = json.as_object()?;
    Some(Model::with_attributes(
        object
            .iter()
            .map(|(key, value)| (key.clone(), Value::from_json(value))),
    ))
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

impl From<Model> for Value {
    fn from(m: Model) -> Self {
        Self::Model(m)
    }
}

impl From<Collection> for Value {
    fn from(c: Collection) -> Self {
        Self::Collection(c)
    }
}
