//! TestCraft: a minimal fixture-based unit-testing framework and runner
//!
//! Fixture types are registered at compile time with [`fixture`], discovered from the
//! link-time registry, executed one at a time and reported as a namespace tree.
//!
//! ## Layout
//!
//! - [`discovery`]: filters registered types down to constructible fixtures, in stable order
//! - [`engine`]: runs one fixture's hooks and tests, turning every error or panic into a result
//! - [`runner`]: drives discovery and execution, prints the report and the totals
//! - [`output`]: styled-text sinks (console, recording)
//! - [`harness`]: the `main` of a test binary (see [`main!`])
//! - [`cli`]: the `testcraft` launcher that runs a compiled test binary
//!
//! ## Panic Policy
//!
//! - **Production code**: use `Result` with `?`. The `cli` module enforces `#![deny(clippy::unwrap_used)]`.
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//! - **Test subjects**: panics raised by fixture code are caught by the engine and reported as failures.

// Lets macro-generated `::testcraft::` paths resolve inside this crate's own tests.
extern crate self as testcraft;

pub mod cli;
pub mod config;
pub mod discovery;
pub mod engine;
pub mod harness;
pub mod output;
pub mod runner;

pub use testcraft_core::inventory;
pub use testcraft_core::{
    BoxError, ExpectedFailure, FailureCause, FailureKind, Fixture, FixtureDescriptor, InvocationError, MethodDescriptor,
    MethodKind, Outcome, Panicked, ResultSet, TestResult, TestReturn, TypeEntry, downcast_fixture, root_cause,
};
pub use testcraft_derive::fixture;

pub use config::{ColorChoice, RunConfig};
pub use discovery::{Assembly, FixtureInstance};
pub use output::{ConsoleOutputProvider, OutputProvider, RecordingOutputProvider, Style};
pub use runner::{RunSummary, TestRunner};

/// Defines `main` for a test binary: runs every fixture linked into it and reports to stdout.
///
/// ```ignore
/// // tests/acceptance.rs, with `harness = false` for this target
/// testcraft::main!();
/// ```
#[macro_export]
macro_rules! main {
    () => {
        fn main() -> ::std::process::ExitCode {
            $crate::harness::run_linked()
        }
    };
}
