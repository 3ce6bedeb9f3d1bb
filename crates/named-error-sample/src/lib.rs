// SPDX-License-Identifier: MIT OR Apache-2.0
#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![warn(missing_docs)]

use named_error::{ExceptionalError, MessageCatalog, NamedError};
use serde::Serialize;
use std::sync::LazyLock;
use tracing::debug;

/// Name of the fixed-text sample error.
pub const STATIC_ERROR: &str = "static_error";
/// Name of the sample error formatted from the `foo` parameter.
pub const CUSTOMIZED_ERROR: &str = "customized_error";
/// Name of the error reported for a missing required parameter.
pub const MISSING_PARAMETER: &str = "missing_parameter";
/// Name of the sample error whose formatter validates its input first.
pub const CHECKED_ERROR: &str = "checked_error";

fn customized_error(err: &NamedError) -> Result<String, ExceptionalError> {
    Ok(format!("Something happened to {}", err.get_param_str("foo")?))
}

fn missing_parameter(err: &NamedError) -> Result<String, ExceptionalError> {
    let param = err.get_param_str("param")?;
    let name = err.get_param_str("for")?;
    Ok(format!("Missing required parameter '{param}' for '{name}'"))
}

/// Checks its input before formatting. A producer can only fail with an
/// [`ExceptionalError`], so the `missing_parameter` message is carried as the
/// failure reason.
fn checked_error(err: &NamedError) -> Result<String, ExceptionalError> {
    if !err.param_exists("foo") {
        let missing = SampleError::missing_parameter("foo", err.name());
        return Err(ExceptionalError::formatter(err.name(), missing.message()));
    }
    if !err.param_is_defined("foo") {
        return Err(ExceptionalError::formatter(
            err.name(),
            "parameter 'foo' must not be null",
        ));
    }
    Ok(format!("Checked failure on {}", err.get_param_str("foo")?))
}

/// Messages of the sample error family.
pub static SAMPLE_MESSAGES: LazyLock<MessageCatalog> = LazyLock::new(|| {
    MessageCatalog::builder()
        .static_message(STATIC_ERROR, "Something happened")
        .formatter(CUSTOMIZED_ERROR, customized_error)
        .formatter(MISSING_PARAMETER, missing_parameter)
        .formatter(CHECKED_ERROR, checked_error)
        .build()
});

/// Constructors for the sample error family.
pub struct SampleError;

impl SampleError {
    /// Error named `name` in the sample catalog.
    pub fn named(name: &str) -> NamedError {
        NamedError::new(&SAMPLE_MESSAGES, name)
    }

    /// `static_error`.
    pub fn static_error() -> NamedError {
        Self::named(STATIC_ERROR)
    }

    /// `customized_error` about `foo`.
    pub fn customized(foo: impl Serialize) -> NamedError {
        Self::named(CUSTOMIZED_ERROR).with_param("foo", foo)
    }

    /// `missing_parameter` for `param` required by the error named `for_name`.
    pub fn missing_parameter(param: &str, for_name: &str) -> NamedError {
        Self::named(MISSING_PARAMETER)
            .with_param("param", param)
            .with_param("for", for_name)
    }

    /// `checked_error` with the given parameters.
    pub fn checked(foo: Option<&str>) -> NamedError {
        Self::named(CHECKED_ERROR).with_param("foo", foo)
    }
}

/// Look up a record by id, failing with named errors.
///
/// Stands in for application code that raises by name: an empty id is a
/// `missing_parameter` error and an unknown id a `customized_error`.
pub fn find_record<'a>(records: &'a [(&'a str, &'a str)], id: &str) -> Result<&'a str, NamedError> {
    if id.is_empty() {
        return SampleError::missing_parameter("id", "find_record").raise();
    }
    debug!(target: "named_error_sample", id, "looking up record");
    records
        .iter()
        .find(|(k, _)| *k == id)
        .map(|(_, v)| *v)
        .ok_or_else(|| SampleError::customized(id))
}
