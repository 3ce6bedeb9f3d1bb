// SPDX-License-Identifier: MIT OR Apache-2.0
//! End-to-end scenarios for raising and handling named errors through the
//! sample error family.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Barrier, LazyLock};
use std::thread;
use std::time::Duration;

use named_error::{EXCEPTIONAL_PREFIX, ExceptionalError, MessageCatalog, MessageParams, NamedError};
use named_error_sample::{CUSTOMIZED_ERROR, STATIC_ERROR, SampleError, find_record};

// ── Pass-through ────────────────────────────────────────────────────────

#[test]
fn unnamed_error_keeps_supplied_message() {
    let err = NamedError::plain("plain old failure");
    assert_eq!(err.name(), "");
    assert_eq!(err.message(), "plain old failure");
    assert!(err.params_is_empty());
}

// ── Static messages ─────────────────────────────────────────────────────

#[test]
fn static_error_message() {
    let err = SampleError::static_error();
    assert_eq!(err.name(), STATIC_ERROR);
    assert!(err.message().starts_with("Something happened"));
}

#[test]
fn static_error_is_idempotent() {
    let err = SampleError::static_error();
    let first = err.message().to_string();
    for _ in 0..5 {
        assert_eq!(err.message(), first);
    }
    assert!(std::ptr::eq(err.message(), err.message()));
}

// ── Formatted messages ──────────────────────────────────────────────────

#[test]
fn customized_error_uses_params() {
    let err = SampleError::customized("bar");
    assert_eq!(err.name(), CUSTOMIZED_ERROR);
    assert!(err.message().starts_with("Something happened to bar"));
    assert_eq!(err.get_param_str("foo").unwrap(), "bar");
}

#[test]
fn customized_error_with_non_string_param() {
    let err = SampleError::customized(42);
    assert_eq!(err.message(), "Something happened to 42");
}

// ── Meta-errors ─────────────────────────────────────────────────────────

#[test]
fn customized_error_missing_foo_is_exceptional() {
    let err = SampleError::named(CUSTOMIZED_ERROR)
        .with_params(MessageParams::new().with("bar", "baz"));
    assert!(
        err.message()
            .starts_with("An exception was raised while handling an exception")
    );
    assert_eq!(
        err.try_message().unwrap_err(),
        &ExceptionalError::MissingParam { key: "foo".into() }
    );
    // The domain error itself is still intact.
    assert_eq!(err.name(), CUSTOMIZED_ERROR);
    assert_eq!(err.get_param_str("bar").unwrap(), "baz");
}

#[test]
fn unknown_name_is_exceptional() {
    let err = SampleError::named("not_declared_anywhere");
    assert!(err.is_exceptional());
    assert!(err.to_string().starts_with(EXCEPTIONAL_PREFIX));
    assert!(matches!(
        err.meta_error(),
        Some(ExceptionalError::UnknownName { name }) if name == "not_declared_anywhere"
    ));
}

#[test]
fn named_error_never_has_blank_message() {
    for err in [
        SampleError::static_error(),
        SampleError::customized("x"),
        SampleError::named(CUSTOMIZED_ERROR),
        SampleError::named("nope"),
        SampleError::checked(None),
    ] {
        assert!(!err.message().is_empty(), "{err:?}");
    }
}

// ── Parameter access ────────────────────────────────────────────────────

#[test]
fn multi_key_lookup_order_and_last() {
    let err = SampleError::named(STATIC_ERROR).with_params(
        MessageParams::new()
            .with("one", 1)
            .with("two", 2)
            .with("three", 3),
    );
    let vals = err.get_params(&["three", "one", "two"]).unwrap();
    assert_eq!(
        vals,
        vec![
            &serde_json::json!(3),
            &serde_json::json!(1),
            &serde_json::json!(2)
        ]
    );
    assert_eq!(
        err.get_last_param(&["three", "one"]).unwrap(),
        Some(&serde_json::json!(1))
    );
    assert_eq!(err.get_param("two").unwrap(), &serde_json::json!(2));
}

#[test]
fn present_but_null_param() {
    let err = SampleError::checked(None);
    assert!(err.param_exists("foo"));
    assert!(!err.param_is_defined("foo"));
    assert!(!err.params_is_empty());
}

// ── Raise / propagate / handle ──────────────────────────────────────────

fn layered(id: &str) -> Result<String, NamedError> {
    let records = [("k1", "v1")];
    let value = find_record(&records, id)?;
    Ok(value.to_uppercase())
}

#[test]
fn propagated_error_resolves_at_handler() {
    assert_eq!(layered("k1").unwrap(), "V1");
    let err = layered("k2").unwrap_err();
    assert_eq!(err.name(), CUSTOMIZED_ERROR);
    assert_eq!(err.message(), "Something happened to k2");
}

// ── Concurrent first reads ──────────────────────────────────────────────

static SLOW_CALLS: AtomicUsize = AtomicUsize::new(0);

fn slow_producer(err: &NamedError) -> Result<String, ExceptionalError> {
    SLOW_CALLS.fetch_add(1, Ordering::SeqCst);
    thread::sleep(Duration::from_millis(20));
    Ok(format!("slow {}", err.get_param_str("id")?))
}

static SLOW_MESSAGES: LazyLock<MessageCatalog> = LazyLock::new(|| {
    MessageCatalog::builder()
        .formatter("slow", slow_producer)
        .build()
});

#[test]
fn concurrent_first_reads_run_producer_once() {
    const READERS: usize = 8;
    let err = NamedError::new(&SLOW_MESSAGES, "slow").with_param("id", 9);
    let barrier = Barrier::new(READERS);
    let (err, barrier) = (&err, &barrier);

    let messages: Vec<String> = thread::scope(|s| {
        let handles: Vec<_> = (0..READERS)
            .map(|_| {
                s.spawn(move || {
                    barrier.wait();
                    err.message().to_string()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(SLOW_CALLS.load(Ordering::SeqCst), 1);
    assert!(messages.iter().all(|m| m == "slow 9"), "{messages:?}");
    assert!(!err.is_exceptional());
}
