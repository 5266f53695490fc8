#![forbid(unsafe_code)]

//! Adapter error type.

use std::fmt;

use rivetback_model::ModelError;

/// Errors raised by adapter operations.
///
/// Nothing is caught or retried internally; every error reaches the caller
/// of the adapter operation unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    /// An intermediate key-path segment did not hold a model.
    Unresolvable {
        /// The full key-path being resolved.
        keypath: String,
        /// The segment whose value could not be descended into.
        segment: String,
        /// Zero-based hop index of `segment`.
        depth: usize,
        /// Kind of the value found there.
        found: &'static str,
    },
    /// `read`/`publish` on a target that is neither a model nor a collection.
    NotAModel {
        operation: &'static str,
        found: &'static str,
    },
    /// The model layer rejected the operation.
    Model(ModelError),
}

impl fmt::Display for AdapterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unresolvable {
                keypath,
                segment,
                depth,
                found,
            } => write!(
                f,
                "cannot resolve '{keypath}': segment '{segment}' at depth {depth} holds {found}, not a model"
            ),
            Self::NotAModel { operation, found } => {
                write!(f, "{operation} needs a model or collection, got {found}")
            }
            Self::Model(err) => write!(f, "model error: {err}"),
        }
    }
}

impl std::error::Error for AdapterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Model(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ModelError> for AdapterError {
    fn from(err: ModelError) -> Self {
        Self::Model(err)
    }
}

/// Result alias for adapter operations.
pub type AdapterResult<T> = Result<T, AdapterError>;
