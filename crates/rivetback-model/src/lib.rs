#![forbid(unsafe_code)]

//! Observable models and collections for rivetback.
//!
//! This crate is the model layer the adapter observes. It provides:
//!
//! - [`Model`]: a shared attribute record with an identity token and
//!   `change:<attr>` / `change` events.
//! - [`Collection`]: a shared ordered list of models with `add`, `remove`
//!   and `reset` events and plain properties.
//! - [`Value`]: the attribute value type, including nested models and
//!   collections, with a JSON bridge.
//!
//! # Architecture
//!
//! Handles use `Rc<RefCell<..>>` for single-threaded shared ownership.
//! Listeners are held strongly and removed explicitly with `off` using the
//! same [`Callback`] handle that was passed to `on`.
//!
//! # Invariants
//!
//! 1. Attribute writes that do not change the value emit nothing.
//! 2. Listeners run in registration order, outside any internal borrow.
//! 3. Model nesting does not bubble: a change on a nested model is only
//!    seen by that model's own listeners.

pub mod collection;
pub mod events;
pub mod model;
pub mod value;

pub use collection::{Collection, ModelError};
pub use events::{Callback, Event, Listeners, callback, change_event, same_callback};
pub use model::{Cid, Model};
pub use value::Value;
