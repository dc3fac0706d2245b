//! Verdicts for test bodies, checked against their expected failure.

use testcraft_core::{ExpectedFailure, InvocationError, TestResult};

pub const EXPECTED_NOT_RAISED: &str = "Expected exception not thrown";

/// Verdict for a body that returned normally.
pub fn judge_completed(name: &str, expected: Option<&ExpectedFailure>) -> TestResult {
    match expected {
        Some(_) => TestResult::fail_with_message(name, EXPECTED_NOT_RAISED),
        None => TestResult::pass(name),
    }
}

/// Verdict for a body that raised; only the root cause of `raised` is considered.
///
/// A root cause of the wrong kind is reported as-is. A matching kind with a different message
/// (compared case-insensitively) fails with a description of both messages.
pub fn judge_raised(name: &str, raised: &InvocationError, expected: Option<&ExpectedFailure>) -> TestResult {
    let root = raised.root_cause();
    let Some(expected) = expected else {
        return TestResult::fail(name, root);
    };

    if expected.kind().is_some_and(|kind| !kind.matches(root)) {
        return TestResult::fail(name, root);
    }

    if let Some(message) = expected.message() {
        let thrown = root.to_string();
        if message.to_lowercase() != thrown.to_lowercase() {
            return TestResult::fail_with_message(
                name,
                format!("Expected Message not correct. Expected {message}, message thrown {thrown}"),
            );
        }
    }

    TestResult::pass(name)
}
