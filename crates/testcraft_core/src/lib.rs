//! Shared vocabulary of the testcraft runner.
//!
//! - [`metadata`]: registration records (`TypeEntry`, `MethodDescriptor`, expected failures)
//! - [`failure`]: error wrappers, panic records and root-cause unwrapping
//! - [`result`]: `Outcome`, `TestResult` and the `ResultSet` aggregate
//!
//! This crate owns no execution or presentation logic; the `testcraft` crate drives it.

#![deny(clippy::unwrap_used)]

pub mod failure;
pub mod metadata;
pub mod result;

pub use failure::{BoxError, FailureCause, FixtureMismatch, InvocationError, Panicked, root_cause};
pub use metadata::{
    ConstructFn, ExpectedFailure, FailureKind, Fixture, FixtureDescriptor, InvokeFn, MethodDescriptor, MethodKind,
    TestReturn, TypeEntry, downcast_fixture, registered,
};
pub use result::{Outcome, ResultSet, TestResult};

/// Re-exported for macro-generated registration code.
pub use inventory;
