//! Failure records and cause-chain helpers.
//!
//! Test code reports failure in two ways: by returning an `Err` or by panicking. Both end up as a
//! `std::error::Error` whose `source()` chain is walked to find the root cause, and both are
//! snapshotted into an owned [`FailureCause`] once a result is recorded.

use std::any::Any;
use std::error::Error;

use thiserror::Error;

/// Type-erased error crossing the registration boundary.
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Returns the innermost error of `err`'s `source()` chain (`err` itself when it has no source).
pub fn root_cause<'a>(err: &'a (dyn Error + 'static)) -> &'a (dyn Error + 'static) {
    let mut current = err;
    while let Some(next) = current.source() {
        current = next;
    }
    current
}

/// A panic raised by test code, converted into an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct Panicked {
    message: String,
    location: Option<String>,
    backtrace: Option<String>,
}

impl Panicked {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
            backtrace: None,
        }
    }

    /// Build from a `catch_unwind` payload. `panic!("..")` payloads are `&str` or `String`.
    pub fn from_payload(payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "Box<dyn Any>".to_string()
        };
        Self::new(message)
    }

    pub fn with_location(mut self, location: Option<String>) -> Self {
        self.location = location;
        self
    }

    pub fn with_backtrace(mut self, backtrace: Option<String>) -> Self {
        self.backtrace = backtrace;
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Location line followed by the captured backtrace, if either is known.
    pub fn trace(&self) -> Option<String> {
        match (&self.location, &self.backtrace) {
            (None, None) => None,
            (Some(location), None) => Some(format!("at {location}")),
            (None, Some(backtrace)) => Some(backtrace.clone()),
            (Some(location), Some(backtrace)) => Some(format!("at {location}\n{backtrace}")),
        }
    }
}

/// Wraps whatever a hook, test body or constructor raised.
///
/// The real failure is always the `source()`; callers match and report on [`root_cause`].
#[derive(Debug, Error)]
#[error("`{target}` raised an error")]
pub struct InvocationError {
    target: &'static str,
    #[source]
    source: BoxError,
}

impl InvocationError {
    pub fn new(target: &'static str, source: BoxError) -> Self {
        Self { target, source }
    }

    pub fn target(&self) -> &'static str {
        self.target
    }

    /// The error as raised, before unwrapping its own chain.
    pub fn raised(&self) -> &(dyn Error + 'static) {
        self.source.as_ref()
    }

    pub fn root_cause(&self) -> &(dyn Error + 'static) {
        root_cause(self.raised())
    }
}

/// A type-erased method was handed an instance of the wrong type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("fixture instance is not a `{expected}`")]
pub struct FixtureMismatch {
    pub expected: &'static str,
}

/// Owned snapshot of an error and its nested causes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureCause {
    message: String,
    trace: Option<String>,
    cause: Option<Box<FailureCause>>,
}

impl FailureCause {
    pub fn capture(err: &(dyn Error + 'static)) -> Self {
        Self {
            message: err.to_string(),
            trace: err.downcast_ref::<Panicked>().and_then(Panicked::trace),
            cause: err.source().map(|source| Box::new(Self::capture(source))),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn trace(&self) -> Option<&str> {
        self.trace.as_deref()
    }

    pub fn cause(&self) -> Option<&FailureCause> {
        self.cause.as_deref()
    }

    /// Nested causes, outermost first, excluding `self`.
    pub fn causes(&self) -> impl Iterator<Item = &FailureCause> {
        std::iter::successors(self.cause(), |c| c.cause())
    }
}
