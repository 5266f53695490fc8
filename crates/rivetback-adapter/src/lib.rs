#![forbid(unsafe_code)]

//! Key-path data-binding adapter for rivetback models.
//!
//! # Role
//!
//! A template binder knows four things about data: how to subscribe to a
//! value, unsubscribe, read it and publish a new one. This crate implements
//! that contract over [`rivetback_model`] models and collections, addressing
//! nested attributes with dotted key-paths such as `"author.address.city"`.
//!
//! # Components
//!
//! - [`keypath`]: walks a key-path to the model owning its last segment.
//! - [`accessor`]: get/set through a key-path.
//! - [`observer`]: change registration on every level of a key-path, since
//!   the model layer does not bubble nested changes.
//! - [`facade`]: the [`Adapter`] trait and [`ModelAdapter`].
//! - [`config`]: [`AdapterOptions`] and [`configure`].
//!
//! # Example
//!
//! ```
//! use rivetback_adapter::{AdapterOptions, configure};
//! use rivetback_model::{Model, Value, callback};
//!
//! let city = Model::with_attributes([("name", Value::from("Oslo"))]);
//! let user = Value::Model(Model::with_attributes([("city", Value::Model(city.clone()))]));
//!
//! let config = configure(AdapterOptions::default());
//! let adapter = config.adapter();
//! assert_eq!(adapter.read(&user, "city.name").unwrap(), Value::from("Oslo"));
//!
//! let on_change = callback(|event| println!("{}", event.name));
//! adapter.subscribe(&user, "city.name", &on_change).unwrap();
//! city.set("name", "Bergen");
//! adapter.unsubscribe(&user, "city.name", &on_change).unwrap();
//! ```

pub mod accessor;
pub mod config;
pub mod error;
pub mod facade;
pub mod keypath;
pub mod observer;
pub mod target;

pub use config::{AdapterOptions, BindingConfig, DEFAULT_PREFIX, configure};
pub use error::{AdapterError, AdapterResult};
pub use facade::{Adapter, ModelAdapter};
pub use keypath::{KeyPath, Level, ResolvedRoot, resolve};
pub use observer::{Action, COLLECTION_EVENTS};
pub use target::Target;
