// SPDX-License-Identifier: MIT OR Apache-2.0
//! Name → message-producer registry.
//!
//! An application builds one [`MessageCatalog`] per error family, usually in a
//! `LazyLock` static, and raises [`NamedError`]s against it.

use std::collections::BTreeMap;
use std::fmt;

use crate::NamedError;
use crate::config::{CatalogConfig, ConfigError};
use crate::exceptional::ExceptionalError;

/// Signature of a parameterised message producer.
pub type FormatFn = fn(&NamedError) -> Result<String, ExceptionalError>;

/// What a registered name turns into.
#[derive(Clone)]
pub enum MessageProducer {
    /// A fixed message.
    Static(String),
    /// A routine that renders the message from the error's parameters.
    Format(FormatFn),
}

impl MessageProducer {
    /// Produce the message for `err`.
    pub fn produce(&self, err: &NamedError) -> Result<String, ExceptionalError> {
        match self {
            Self::Static(text) => Ok(text.clone()),
            Self::Format(f) => f(err),
        }
    }

    /// `true` for [`MessageProducer::Static`].
    pub fn is_static(&self) -> bool {
        matches!(self, Self::Static(_))
    }
}

impl fmt::Debug for MessageProducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(text) => f.debug_tuple("Static").field(text).finish(),
            Self::Format(_) => f.write_str("Format(..)"),
        }
    }
}

/// Immutable mapping from error name to [`MessageProducer`].
#[derive(Debug, Clone, Default)]
pub struct MessageCatalog {
    producers: BTreeMap<String, MessageProducer>,
}

static EMPTY: MessageCatalog = MessageCatalog {
    producers: BTreeMap::new(),
};

impl MessageCatalog {
    /// Start building a catalog.
    pub fn builder() -> MessageCatalogBuilder {
        MessageCatalogBuilder::default()
    }

    /// Shared catalog with no entries, used by unnamed errors.
    pub fn empty() -> &'static MessageCatalog {
        &EMPTY
    }

    /// Look up the producer registered for `name`.
    pub fn resolve(&self, name: &str) -> Result<&MessageProducer, ExceptionalError> {
        self.producers
            .get(name)
            .ok_or_else(|| ExceptionalError::UnknownName {
                name: name.to_string(),
            })
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.producers.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.producers.keys().map(String::as_str)
    }

    /// Number of registered names.
    pub fn len(&self) -> usize {
        self.producers.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.producers.is_empty()
    }
}

/// Builder for [`MessageCatalog`]. Later registrations replace earlier ones.
#[derive(Debug, Default)]
pub struct MessageCatalogBuilder {
    producers: BTreeMap<String, MessageProducer>,
}

impl MessageCatalogBuilder {
    /// Register a fixed message under `name`.
    pub fn static_message(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.producers
            .insert(name.into(), MessageProducer::Static(text.into()));
        self
    }

    /// Register a formatting routine under `name`.
    pub fn formatter(mut self, name: impl Into<String>, f: FormatFn) -> Self {
        self.producers.insert(name.into(), MessageProducer::Format(f));
        self
    }

    /// Merge the static messages declared in `config`.
    ///
    /// With `strict = true` in the config, a name that is already registered
    /// is rejected instead of replaced.
    pub fn with_config(mut self, config: &CatalogConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        for (name, text) in &config.messages {
            if config.strict && self.producers.contains_key(name) {
                return Err(ConfigError::Conflict { name: name.clone() });
            }
            self.producers
                .insert(name.clone(), MessageProducer::Static(text.clone()));
        }
        Ok(self)
    }

    /// Finish building.
    pub fn build(self) -> MessageCatalog {
        MessageCatalog {
            producers: self.producers,
        }
    }
}
