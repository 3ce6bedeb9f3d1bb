// SPDX-License-Identifier: MIT OR Apache-2.0
//! Failures of the naming mechanism itself.

/// Prefix shared by every [`ExceptionalError`] message.
pub const EXCEPTIONAL_PREFIX: &str = "An exception was raised while handling an exception";

/// Text of [`ExceptionalError::Reentrant`].
pub const REENTRANT_MESSAGE: &str = "An exception was raised while handling an exception: \
     message was read by its own producer while being resolved";

/// Raised when a named error cannot produce its own message.
///
/// This is distinct from the domain error being reported: it means the
/// error-reporting machinery is broken (a name with no producer, or a
/// producer that could not format its message).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExceptionalError {
    /// The error name has no producer in its catalog.
    #[error("{}: no message producer is registered for '{name}'", EXCEPTIONAL_PREFIX)]
    UnknownName {
        /// The name that failed to resolve.
        name: String,
    },

    /// A producer asked for a parameter that was not supplied.
    #[error("{}: required message parameter '{key}' is missing", EXCEPTIONAL_PREFIX)]
    MissingParam {
        /// The missing parameter key.
        key: String,
    },

    /// A producer rejected its input explicitly.
    #[error("{}: formatter for '{name}' failed: {reason}", EXCEPTIONAL_PREFIX)]
    Formatter {
        /// Name of the error being formatted.
        name: String,
        /// What went wrong.
        reason: String,
    },

    /// A producer read the message of the error it is formatting.
    #[error("{}", REENTRANT_MESSAGE)]
    Reentrant,
}

/// Shared instance handed out for re-entrant reads.
pub(crate) static REENTRANT: ExceptionalError = ExceptionalError::Reentrant;

impl ExceptionalError {
    /// Shorthand for [`ExceptionalError::Formatter`].
    pub fn formatter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Formatter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Short machine-readable tag for the variant.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnknownName { .. } => "UNKNOWN_NAME",
            Self::MissingParam { .. } => "MISSING_PARAM",
            Self::Formatter { .. } => "FORMATTER_FAILED",
            Self::Reentrant => "REENTRANT_READ",
        }
    }
}
