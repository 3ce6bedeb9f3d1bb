// SPDX-License-Identifier: MIT OR Apache-2.0
//! Declarative static messages loaded from TOML text.
//!
//! ```toml
//! strict = true
//!
//! [messages]
//! static_error = "Something happened"
//! not_ready = "The service is not ready yet"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Errors raised while parsing or applying a [`CatalogConfig`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The text could not be parsed as TOML of the expected shape.
    #[error("failed to parse catalog config: {reason}")]
    ParseError {
        /// Human-readable parse error detail.
        reason: String,
    },

    /// Semantic validation failed (one or more problems).
    #[error("catalog config validation failed: {reasons:?}")]
    ValidationError {
        /// Individual validation failure messages.
        reasons: Vec<String>,
    },

    /// A strict config tried to replace an already registered name.
    #[error("message '{name}' is already registered")]
    Conflict {
        /// The clashing name.
        name: String,
    },
}

/// Static messages declared outside of code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Reject names that are already registered instead of replacing them.
    #[serde(default)]
    pub strict: bool,

    /// `name = "message"` pairs.
    #[serde(default)]
    pub messages: BTreeMap<String, String>,
}

impl CatalogConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config =
            toml::from_str::<CatalogConfig>(content).map_err(|e| ConfigError::ParseError {
                reason: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every name is an identifier and every message non-empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();
        for (name, text) in &self.messages {
            if !is_identifier(name) {
                errors.push(format!("invalid message name '{name}'"));
            }
            if text.trim().is_empty() {
                errors.push(format!("message '{name}' must not be empty"));
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::ValidationError { reasons: errors })
        }
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
