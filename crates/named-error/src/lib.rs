// SPDX-License-Identifier: MIT OR Apache-2.0
//! Errors raised by symbolic name.
//!
//! A [`NamedError`] carries a `name` and a set of [`MessageParams`]. Its
//! message is not written at the raise site: the name is looked up in a
//! [`MessageCatalog`] the first time the message is read, and the registered
//! [`MessageProducer`] either returns fixed text or formats one from the
//! parameters. When that lookup or formatting fails, the error reports an
//! [`ExceptionalError`] instead of a blank message.
//!
//! ```
//! use named_error::{ExceptionalError, MessageCatalog, NamedError};
//! use std::sync::LazyLock;
//!
//! fn greet(err: &NamedError) -> Result<String, ExceptionalError> {
//!     Ok(format!("Hello, {}", err.get_param_str("who")?))
//! }
//!
//! static MESSAGES: LazyLock<MessageCatalog> = LazyLock::new(|| {
//!     MessageCatalog::builder()
//!         .static_message("static_error", "Something happened")
//!         .formatter("greeting", greet)
//!         .build()
//! });
//!
//! let err = NamedError::new(&MESSAGES, "greeting").with_param("who", "world");
//! assert_eq!(err.message(), "Hello, world");
//! ```
#![deny(unsafe_code)]
#![warn(missing_docs)]

mod catalog;
mod config;
mod exceptional;
mod params;

pub use catalog::{FormatFn, MessageCatalog, MessageCatalogBuilder, MessageProducer};
pub use config::{CatalogConfig, ConfigError};
pub use exceptional::{EXCEPTIONAL_PREFIX, ExceptionalError, REENTRANT_MESSAGE};
pub use params::MessageParams;

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::{Mutex, MutexGuard, OnceLock};
use std::thread::{self, ThreadId};

use crate::exceptional::REENTRANT;
use tracing::{debug, warn};

/// Outcome of the one-time message resolution.
#[derive(Debug)]
struct Resolved {
    text: String,
    meta: Option<ExceptionalError>,
}

/// Clears the resolving thread on exit, including when a producer panics.
struct ResolvingGuard<'a>(&'a Mutex<Option<ThreadId>>);

impl Drop for ResolvingGuard<'_> {
    fn drop(&mut self) {
        *lock(self.0) = None;
    }
}

fn lock(m: &Mutex<Option<ThreadId>>) -> MutexGuard<'_, Option<ThreadId>> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ---------------------------------------------------------------------------
// NamedError
// ---------------------------------------------------------------------------

/// An error identified by name, with a lazily resolved message.
///
/// Without a name it behaves like a plain message error. With a name, the
/// message comes from the producer registered under that name in the error's
/// catalog; an explicit message is then ignored.
pub struct NamedError {
    name: String,
    params: MessageParams,
    explicit_message: Option<String>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
    catalog: &'static MessageCatalog,
    resolved: OnceLock<Resolved>,
    resolving: Mutex<Option<ThreadId>>,
}

impl NamedError {
    /// Error named `name`, resolved against `catalog`.
    pub fn new(catalog: &'static MessageCatalog, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: MessageParams::new(),
            explicit_message: None,
            source: None,
            catalog,
            resolved: OnceLock::new(),
            resolving: Mutex::new(None),
        }
    }

    /// Unnamed error with a literal message.
    pub fn plain(message: impl Into<String>) -> Self {
        Self::new(MessageCatalog::empty(), "").with_message(message)
    }

    /// Add one message parameter. See [`MessageParams::with`].
    pub fn with_param(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        self.params = std::mem::take(&mut self.params).with(key, value);
        self
    }

    /// Replace the whole parameter store.
    pub fn with_params(mut self, params: MessageParams) -> Self {
        self.params = params;
        self
    }

    /// Set the literal message used when the error has no name.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.explicit_message = Some(message.into());
        self
    }

    /// Attach an underlying cause.
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Wrap `self` in `Err`, for `return err.raise();` or `err.raise()?`.
    pub fn raise<T>(self) -> Result<T, Self> {
        Err(self)
    }

    /// The error's name; empty when unnamed.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Catalog the name is resolved against.
    pub fn catalog(&self) -> &'static MessageCatalog {
        self.catalog
    }

    /// The resolved message, or the meta-error when resolution failed.
    ///
    /// Computed on first call and cached. A producer that reads the message
    /// of the error it is formatting gets [`ExceptionalError::Reentrant`].
    pub fn try_message(&self) -> Result<&str, &ExceptionalError> {
        let Some(resolved) = self.resolved() else {
            return Err(&REENTRANT);
        };
        match &resolved.meta {
            Some(meta) => Err(meta),
            None => Ok(&resolved.text),
        }
    }

    /// The resolved message. When resolution failed this is the text of the
    /// [`ExceptionalError`], which starts with [`EXCEPTIONAL_PREFIX`].
    pub fn message(&self) -> &str {
        self.resolved().map_or(REENTRANT_MESSAGE, |r| r.text.as_str())
    }

    /// The meta-error raised while resolving the message, if any.
    pub fn meta_error(&self) -> Option<&ExceptionalError> {
        match self.resolved() {
            Some(resolved) => resolved.meta.as_ref(),
            None => Some(&REENTRANT),
        }
    }

    /// Whether resolving the message failed.
    pub fn is_exceptional(&self) -> bool {
        self.meta_error().is_some()
    }

    /// `None` when called from inside this error's own producer.
    fn resolved(&self) -> Option<&Resolved> {
        if let Some(resolved) = self.resolved.get() {
            return Some(resolved);
        }
        let current = thread::current().id();
        if *lock(&self.resolving) == Some(current) {
            warn!(target: "named_error", name = %self.name, "message read while being resolved");
            return None;
        }
        // Other threads block in `get_or_init` until the producer finishes.
        Some(self.resolved.get_or_init(|| {
            *lock(&self.resolving) = Some(current);
            let _guard = ResolvingGuard(&self.resolving);
            match self.resolve() {
                Ok(text) => Resolved { text, meta: None },
                Err(meta) => {
                    warn!(target: "named_error", name = %self.name, error = %meta, "message resolution failed");
                    Resolved {
                        text: meta.to_string(),
                        meta: Some(meta),
                    }
                }
            }
        }))
    }

    fn resolve(&self) -> Result<String, ExceptionalError> {
        if self.name.is_empty() {
            return Ok(self.explicit_message.clone().unwrap_or_default());
        }
        let producer = self.catalog.resolve(&self.name)?;
        let text = producer.produce(self)?;
        debug!(target: "named_error", name = %self.name, static_message = producer.is_static(), "resolved message");
        Ok(text)
    }

    // -- parameter access ---------------------------------------------------

    /// The parameter store.
    pub fn params(&self) -> &MessageParams {
        &self.params
    }

    /// Value for `key`; fails with [`ExceptionalError::MissingParam`].
    pub fn get_param(&self, key: &str) -> Result<&Value, ExceptionalError> {
        self.params.get(key)
    }

    /// Values for `keys`, in request order.
    pub fn get_params(&self, keys: &[&str]) -> Result<Vec<&Value>, ExceptionalError> {
        self.params.get_many(keys)
    }

    /// Value of the last of `keys`; all of them must exist.
    pub fn get_last_param(&self, keys: &[&str]) -> Result<Option<&Value>, ExceptionalError> {
        self.params.get_last(keys)
    }

    /// Value for `key` rendered for display.
    pub fn get_param_str(&self, key: &str) -> Result<String, ExceptionalError> {
        self.params.get_str(key)
    }

    /// All key/value pairs.
    pub fn all_params(&self) -> Vec<(&str, &Value)> {
        self.params.all()
    }

    /// All parameter keys.
    pub fn param_keys(&self) -> Vec<&str> {
        self.params.keys()
    }

    /// All parameter values.
    pub fn param_values(&self) -> Vec<&Value> {
        self.params.values()
    }

    /// Whether `key` was supplied.
    pub fn param_exists(&self, key: &str) -> bool {
        self.params.exists(key)
    }

    /// Whether `key` was supplied with a non-null value.
    pub fn param_is_defined(&self, key: &str) -> bool {
        self.params.is_defined(key)
    }

    /// Whether no parameters were supplied.
    pub fn params_is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl fmt::Debug for NamedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("NamedError");
        if !self.name.is_empty() {
            d.field("name", &self.name);
        }
        if let Some(ref msg) = self.explicit_message {
            d.field("explicit_message", msg);
        }
        if !self.params.is_empty() {
            d.field("params", &self.params);
        }
        if let Some(ref src) = self.source {
            d.field("source", &src.to_string());
        }
        d.finish()
    }
}

impl fmt::Display for NamedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for NamedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Return early with a [`NamedError`].
///
/// ```
/// use named_error::{MessageCatalog, NamedError, bail_named};
/// use std::sync::LazyLock;
///
/// static MESSAGES: LazyLock<MessageCatalog> = LazyLock::new(|| {
///     MessageCatalog::builder().static_message("empty", "nothing to do").build()
/// });
///
/// fn run(items: &[u32]) -> Result<u32, NamedError> {
///     if items.is_empty() {
///         bail_named!(&MESSAGES, "empty", "len" => items.len());
///     }
///     Ok(items.iter().sum())
/// }
///
/// assert_eq!(run(&[]).unwrap_err().message(), "nothing to do");
/// ```
#[macro_export]
macro_rules! bail_named {
    ($catalog:expr, $name:expr $(, $key:expr => $value:expr)* $(,)?) => {
        return ::core::result::Result::Err(
            $crate::NamedError::new($catalog, $name)
                $(.with_param($key, $value))*
                .into(),
        )
    };
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
