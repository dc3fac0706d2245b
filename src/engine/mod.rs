//! Execution engine: runs one fixture's hooks and tests and records a result per verdict.
//!
//! ```text
//! fixture_setup ── failed ──► one Fail "<Type>.FixtureSetup()", nothing else runs
//!      │
//!      ▼  for each test, in declaration order
//!   setup ── failed ──► Fail "<Type>.<test>.Setup()", skip body and teardown
//!      │
//!      ▼
//!   body ──► verdict (see `expectation`)
//!      │
//!      ▼
//!   teardown ── failed ──► extra Fail "<Type>.<test>.Teardown()"
//!      │
//!      ▼  after the last test
//! fixture_teardown ── failed ──► logged only
//! ```

pub mod expectation;
pub mod invoke;

use std::any::Any;
use std::fmt;

use testcraft_core::{FixtureDescriptor, MethodDescriptor, ResultSet, TestResult};

use crate::discovery::FixtureInstance;

use self::expectation::{judge_completed, judge_raised};
use self::invoke::invoke;

/// Step of a fixture run that can fail on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    FixtureSetup,
    Setup,
    Body,
    Teardown,
    FixtureTeardown,
}

impl Phase {
    /// Name a result recorded in this phase is reported under.
    pub fn result_name(self, fixture: &str, test: Option<&str>) -> String {
        let test = test.unwrap_or_default();
        match self {
            Phase::FixtureSetup => format!("{fixture}.FixtureSetup()"),
            Phase::FixtureTeardown => format!("{fixture}.FixtureTeardown()"),
            Phase::Setup => format!("{fixture}.{test}.Setup()"),
            Phase::Body => format!("{fixture}.{test}"),
            Phase::Teardown => format!("{fixture}.{test}.Teardown()"),
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::FixtureSetup => "fixture setup",
            Phase::Setup => "setup",
            Phase::Body => "body",
            Phase::Teardown => "teardown",
            Phase::FixtureTeardown => "fixture teardown",
        };
        f.write_str(s)
    }
}

/// Runs every test of `fixture`. Types without the fixture marker produce no results.
#[tracing::instrument(skip_all, fields(fixture = fixture.name()))]
pub fn run_tests_in_fixture(fixture: &mut FixtureInstance) -> ResultSet {
    let mut results = ResultSet::new();
    let entry = *fixture.entry();
    if !entry.is_fixture {
        return results;
    }

    let hooks = entry.descriptor();
    let instance = fixture.instance_mut();

    if let Some(hook) = hooks.fixture_setup {
        if let Err(err) = invoke(instance, hook) {
            tracing::debug!(phase = %Phase::FixtureSetup, error = %err.root_cause(), "fixture skipped");
            results.add(TestResult::fail(
                Phase::FixtureSetup.result_name(entry.name, None),
                err.root_cause(),
            ));
            return results;
        }
    }

    for test in &hooks.tests {
        run_test(instance, entry.name, &hooks, test, &mut results);
    }

    if let Some(hook) = hooks.fixture_teardown {
        if let Err(err) = invoke(instance, hook) {
            tracing::warn!(
                phase = %Phase::FixtureTeardown,
                result = %Phase::FixtureTeardown.result_name(entry.name, None),
                error = %err.root_cause(),
                "fixture teardown failed"
            );
        }
    }

    results
}

fn run_test(
    instance: &mut dyn Any,
    fixture: &str,
    hooks: &FixtureDescriptor,
    test: &MethodDescriptor,
    results: &mut ResultSet,
) {
    if let Some(setup) = hooks.setup {
        if let Err(err) = invoke(instance, setup) {
            tracing::debug!(test = test.name, phase = %Phase::Setup, "test skipped");
            results.add(TestResult::fail(
                Phase::Setup.result_name(fixture, Some(test.name)),
                err.root_cause(),
            ));
            return;
        }
    }

    let name = Phase::Body.result_name(fixture, Some(test.name));
    let verdict = match invoke(instance, test) {
        Ok(()) => judge_completed(&name, test.expected.as_ref()),
        Err(err) => judge_raised(&name, &err, test.expected.as_ref()),
    };
    tracing::debug!(test = test.name, outcome = %verdict.outcome(), "test finished");
    results.add(verdict);

    if let Some(teardown) = hooks.teardown {
        if let Err(err) = invoke(instance, teardown) {
            results.add(TestResult::fail(
                Phase::Teardown.result_name(fixture, Some(test.name)),
                err.root_cause(),
            ));
        }
    }
}
