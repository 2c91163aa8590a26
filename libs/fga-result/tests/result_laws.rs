#![allow(clippy::unwrap_used, clippy::expect_used)]

use fga_result::{Outcome, attempt};
use tracing_test::traced_test;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Failed(String);

fn half(v: i32) -> Outcome<i32, Failed> {
    if v % 2 == 0 {
        Outcome::Success(v / 2)
    } else {
        Outcome::Failure(Failed(format!("{v} is odd")))
    }
}

#[test]
fn then_on_success_equals_applying_the_step() {
    for v in [4, 7] {
        assert_eq!(Outcome::Success(v).then(half), half(v));
    }
}

#[test]
fn map_on_success_wraps_plain_value() {
    let out: Outcome<i32, Failed> = Outcome::Success(5).map(|v| v + 1);
    assert_eq!(out, Outcome::Success(6));
}

#[test]
fn then_on_failure_is_identity() {
    let failure: Outcome<i32, Failed> = Outcome::Failure(Failed("e".to_owned()));
    assert_eq!(failure.clone().then(half), failure);
    assert_eq!(failure.clone().map(|v| v * 10), failure);
}

#[test]
fn recover_on_failure_uses_callback_outcome() {
    let failure: Outcome<i32, Failed> = Outcome::Failure(Failed("e".to_owned()));
    let recovered: Outcome<i32, Failed> = failure.clone().recover(|_| Outcome::Success(0));
    assert_eq!(recovered, Outcome::Success(0));

    let still_failed: Outcome<i32, String> = failure.recover(|e| Outcome::Failure(e.0));
    assert_eq!(still_failed, Outcome::Failure("e".to_owned()));
}

#[test]
fn recover_on_success_is_identity() {
    let success: Outcome<i32, Failed> = Outcome::Success(3);
    let out: Outcome<i32, Failed> = success.clone().recover(|_| Outcome::Success(99));
    assert_eq!(out, Outcome::Success(3));
    assert_eq!(success.recover_value(|_| 99), Outcome::Success(3));
}

#[test]
fn into_result_on_failure_raises_the_error() {
    let failure: Outcome<i32, Failed> = Outcome::Failure(Failed("boom".to_owned()));
    assert_eq!(failure.into_result(), Err(Failed("boom".to_owned())));
}

#[test]
fn fluent_chain_without_branching() {
    let mut seen = Vec::new();
    let out = attempt(|| "8".parse::<i32>().map_err(|e| Failed(e.to_string())))
        .then(half)
        .then(half)
        .success(|v| seen.push(*v))
        .then(half)
        .failure(|_| seen.push(-1))
        .recover_value(|_| -1);

    assert_eq!(out, Outcome::Success(1));
    assert_eq!(seen, vec![2]);
}

#[test]
#[traced_test]
fn wrong_accessor_logs_before_panicking() {
    let failure: Outcome<i32, Failed> = Outcome::Failure(Failed("x".to_owned()));
    let caught = std::panic::catch_unwind(move || failure.val());
    assert!(caught.is_err());
    assert!(logs_contain("Outcome::val() called on a Failure"));
}
