#![forbid(unsafe_code)]

//! Binder registration.
//!
//! The host builds an [`AdapterOptions`], calls [`configure`] once at start-up
//! and hands the returned [`BindingConfig`] to its binder. Nothing here is
//! global; reconfiguring means building a new `BindingConfig`.
//!
//! # Environment
//!
//! [`AdapterOptions::from_env`] reads:
//!
//! - `RIVETBACK_PREFIX`: attribute prefix (blank values are ignored).
//! - `RIVETBACK_PRELOAD_DATA`: `1`, `true` or `TRUE` to preload values before
//!   the first render; anything else disables it.

use std::fmt;

use tracing::info;

use crate::facade::{Adapter, ModelAdapter};

/// Attribute prefix used when none is configured.
pub const DEFAULT_PREFIX: &str = "rv";

const ENV_PREFIX: &str = "RIVETBACK_PREFIX";
const ENV_PRELOAD_DATA: &str = "RIVETBACK_PRELOAD_DATA";

/// Options the binder reads when the adapter is registered.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AdapterOptions {
    /// Prefix of binding attributes, e.g. `rv` for `rv-text`.
    pub prefix: String,
    /// Whether the binder reads every bound value before the first render.
    pub preload_data: bool,
}

impl Default for AdapterOptions {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            preload_data: false,
        }
    }
}

impl AdapterOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn with_preload_data(mut self, preload_data: bool) -> Self {
        self.preload_data = preload_data;
        self
    }

    /// Defaults overridden by the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by a custom environment lookup.
    #[must_use]
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut options = Self::default();
        if let Some(prefix) = get_env(ENV_PREFIX).filter(|p| !p.trim().is_empty()) {
            options.prefix = prefix.trim().to_string();
        }
        if let Some(value) = get_env(ENV_PRELOAD_DATA) {
            options.preload_data = env_flag(&value);
        }
        options
    }
}

fn env_flag(value: &str) -> bool {
    matches!(value, "1" | "true" | "TRUE")
}

/// A registered adapter configuration, ready for the binder.
pub struct BindingConfig {
    prefix: String,
    preload_data: bool,
    adapter: Box<dyn Adapter>,
}

impl fmt::Debug for BindingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingConfig")
            .field("prefix", &self.prefix)
            .field("preload_data", &self.preload_data)
            .finish_non_exhaustive()
    }
}

impl BindingConfig {
    /// Pair `options` with an arbitrary adapter.
    pub fn new(options: AdapterOptions, adapter: impl Adapter + 'static) -> Self {
        Self {
            prefix: options.prefix,
            preload_data: options.preload_data,
            adapter: Box::new(adapter),
        }
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    #[must_use]
    pub fn preload_data(&self) -> bool {
        self.preload_data
    }

    #[must_use]
    pub fn adapter(&self) -> &dyn Adapter {
        self.adapter.as_ref()
    }

    /// Full attribute name for a binder directive: `text` -> `rv-text`.
    #[must_use]
    pub fn binding_attribute(&self, directive: &str) -> String {
        format!("{}-{directive}", self.prefix)
    }

    /// Directive named by a binding attribute, if it carries this prefix.
    #[must_use]
    pub fn directive<'a>(&self, attribute: &'a str) -> Option<&'a str> {
        attribute
            .strip_prefix(self.prefix.as_str())?
            .strip_prefix('-')
            .filter(|directive| !directive.is_empty())
    }
}

/// Build the binder configuration backed by [`ModelAdapter`].
#[must_use]
pub fn configure(options: AdapterOptions) -> BindingConfig {
    info!(
        prefix = %options.prefix,
        preload_data = options.preload_data,
        "configured model adapter"
    );
    BindingConfig::new(options, ModelAdapter::new())
}
