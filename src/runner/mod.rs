//! Runner and reporter: runs every fixture of an assembly and prints the report tree.
//!
//! ```text
//! testcraft_sample
//!   given_a_sample_sut
//!     WhenSomethingElseIsCalled
//!       it_should_raise_an_expected_error: Pass
//!       it_should_raise_an_unexpected_error: Fail
//!
//!       An error was raised: buffer holds at most 4 items
//!
//! Stacktrace:
//! at crates/testcraft_sample/src/given_a_sample_sut.rs:23:17
//!
//!
//! Tests Run: 5
//! Passed: 3
//! Failed: 2
//! ```

pub mod namespace;

use testcraft_core::{FailureCause, Outcome, ResultSet, TestResult};

use crate::config::RunConfig;
use crate::discovery::{self, Assembly};
use crate::engine;
use crate::output::OutputProvider;

use self::namespace::NamespaceTracker;

/// Totals of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn record(&mut self, results: &ResultSet) {
        self.total += results.total();
        self.passed += results.passed();
        self.failed += results.failed();
    }

    /// `Fail` if anything failed, else `Pass` if anything passed, else `Unknown`.
    pub fn outcome(&self) -> Outcome {
        if self.failed > 0 {
            Outcome::Fail
        } else if self.passed > 0 {
            Outcome::Pass
        } else {
            Outcome::Unknown
        }
    }
}

pub struct TestRunner<O: OutputProvider> {
    output: O,
    config: RunConfig,
    namespaces: NamespaceTracker,
}

impl<O: OutputProvider> TestRunner<O> {
    pub fn new(output: O) -> Self {
        Self::with_config(output, RunConfig::default())
    }

    pub fn with_config(output: O, config: RunConfig) -> Self {
        Self {
            output,
            config,
            namespaces: NamespaceTracker::new(),
        }
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn into_output(self) -> O {
        self.output
    }

    /// Runs every fixture of `assembly` in discovery order, reporting as it goes.
    #[tracing::instrument(skip_all, fields(types = assembly.len()))]
    pub fn run_all_tests_in_assembly(&mut self, assembly: &Assembly) -> RunSummary {
        let mut summary = RunSummary::default();

        for mut fixture in discovery::discover(assembly) {
            for line in self.namespaces.enter(fixture.namespace()) {
                self.indent(line.depth);
                self.output.output_line(format_args!("{}", line.segment));
            }

            let results = engine::run_tests_in_fixture(&mut fixture);
            summary.record(&results);
            self.report_fixture(fixture.name(), &results);
        }

        tracing::debug!(total = summary.total, failed = summary.failed, "run finished");
        self.report_totals(&summary);
        summary
    }

    /// Prints one fixture's results at the current namespace depth.
    pub fn report_fixture(&mut self, fixture: &str, results: &ResultSet) {
        if results.is_empty() {
            return;
        }
        let depth = self.namespaces.depth();
        self.indent(depth);
        self.output.output_line(format_args!("{fixture}"));

        for result in results {
            self.report_result(fixture, result, depth + 1);
        }
    }

    fn report_result(&mut self, fixture: &str, result: &TestResult, depth: usize) {
        if result.outcome().is_pass() {
            self.output.set_style_pass();
        } else {
            self.output.set_style_fail();
        }

        self.indent(depth);
        self.output
            .output_line(format_args!("{}: {}", method_name(fixture, result.name()), result.outcome()));

        if result.outcome().is_fail() {
            let message = result.message().unwrap_or_default();
            self.output.blank_line();
            self.indent(depth);
            match result.cause() {
                Some(cause) => {
                    self.output.output_line(format_args!("An error was raised: {message}"));
                    self.output.blank_line();
                    if self.config.show_traces {
                        self.report_trace(cause);
                    }
                }
                None => {
                    self.output.output_line(format_args!("Message: {message}"));
                    self.output.blank_line();
                }
            }
        }

        self.output.reset_style();
    }

    fn report_trace(&mut self, cause: &FailureCause) {
        self.output.set_style_bad_label();
        self.output.output_line(format_args!("Stacktrace:"));
        self.output.reset_style();
        self.output.set_style_exception_stacktrace();
        self.trace_lines(cause.trace());

        for inner in cause.causes() {
            self.output.set_style_bad_label();
            self.output.output_line(format_args!("Inner exception:"));
            self.output.reset_style();
            self.output.set_style_exception_message();
            self.output.output_line(format_args!("{}", inner.message()));
            self.output.set_style_exception_stacktrace();
            self.trace_lines(inner.trace());
        }
    }

    fn trace_lines(&mut self, trace: Option<&str>) {
        match trace {
            Some(trace) => {
                for line in trace.lines() {
                    self.output.output_line(format_args!("{line}"));
                }
            }
            None => self.output.blank_line(),
        }
    }

    fn report_totals(&mut self, summary: &RunSummary) {
        match summary.outcome() {
            Outcome::Fail => self.output.set_style_fail(),
            Outcome::Pass => self.output.set_style_pass(),
            Outcome::Unknown => {}
        }

        self.output.blank_line();
        self.output.blank_line();
        self.output.output_line(format_args!("Tests Run: {}", summary.total));
        self.output.output_line(format_args!("Passed: {}", summary.passed));
        self.output.output_line(format_args!("Failed: {}", summary.failed));
        self.output.reset_style();
    }

    fn indent(&mut self, depth: usize) {
        let width = depth * self.config.indent_width;
        if width > 0 {
            self.output.output(&" ".repeat(width));
        }
    }
}

/// `"Fixture.method"` becomes `"method"`; hook pseudo-names keep their suffix.
fn method_name<'a>(fixture: &str, qualified: &'a str) -> &'a str {
    qualified
        .strip_prefix(fixture)
        .and_then(|rest| rest.strip_prefix('.'))
        .unwrap_or(qualified)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{RecordingOutputProvider, Style};
    use std::fmt;
    use testcraft_core::Panicked;

    #[derive(Debug)]
    struct Wrapped(Panicked);

    impl fmt::Display for Wrapped {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("while loading")
        }
    }

    impl std::error::Error for Wrapped {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            Some(&self.0)
        }
    }

    fn runner() -> TestRunner<RecordingOutputProvider> {
        TestRunner::new(RecordingOutputProvider::new())
    }

    #[test]
    fn test_method_name_strips_fixture() {
        assert_eq!(method_name("Db", "Db.reads"), "reads");
        assert_eq!(method_name("Db", "Db.reads.Setup()"), "reads.Setup()");
        assert_eq!(method_name("Db", "Other.reads"), "Other.reads");
    }

    #[test]
    fn test_summary_outcome_priority() {
        let mut summary = RunSummary::default();
        assert_eq!(summary.outcome(), Outcome::Unknown);
        summary.record(&ResultSet::from(TestResult::pass("A.a")));
        assert_eq!(summary.outcome(), Outcome::Pass);
        summary.record(&ResultSet::from(TestResult::fail_with_message("A.b", "no")));
        assert_eq!(summary.outcome(), Outcome::Fail);
        assert_eq!((summary.total, summary.passed, summary.failed), (2, 1, 1));
    }

    #[test]
    fn test_report_fixture_layout() {
        let mut runner = runner();
        let results: ResultSet = [
            TestResult::pass("Db.reads"),
            TestResult::fail_with_message("Db.writes", "Expected exception not thrown"),
        ]
        .into_iter()
        .collect();
        runner.report_fixture("Db", &results);

        let output = runner.into_output();
        assert_eq!(
            output.lines(),
            vec![
                "Db",
                "  reads: Pass",
                "  writes: Fail",
                "",
                "  Message: Expected exception not thrown",
                ""
            ]
        );
        assert_eq!(output.style_of_line("reads: Pass"), Some(Style::Pass));
        assert_eq!(output.style_of_line("writes: Fail"), Some(Style::Fail));
    }

    #[test]
    fn test_report_trace_sections() {
        let mut runner = runner();
        let panicked = Panicked::new("disk full").with_location(Some("src/store.rs:7:9".to_string()));
        let results = ResultSet::from(TestResult::fail("Store.saves", &Wrapped(panicked)));
        runner.report_fixture("Store", &results);

        let output = runner.into_output();
        assert_eq!(
            output.lines(),
            vec![
                "Store",
                "  saves: Fail",
                "",
                "  An error was raised: while loading",
                "",
                "Stacktrace:",
                "",
                "Inner exception:",
                "disk full",
                "at src/store.rs:7:9",
            ]
        );
        assert_eq!(output.style_of_line("Stacktrace:"), Some(Style::BadLabel));
        assert_eq!(output.style_of_line("disk full"), Some(Style::ExceptionMessage));
        assert_eq!(output.style_of_line("at src/store.rs"), Some(Style::ExceptionStacktrace));
    }

    #[test]
    fn test_traces_can_be_hidden() {
        let config = RunConfig::default().with_show_traces(false);
        let mut runner = TestRunner::with_config(RecordingOutputProvider::new(), config);
        let results = ResultSet::from(TestResult::fail("Store.saves", &Panicked::new("disk full")));
        runner.report_fixture("Store", &results);

        let output = runner.into_output();
        assert!(!output.transcript().contains("Stacktrace:"));
        assert!(output.transcript().contains("An error was raised: disk full"));
    }

    #[test]
    fn test_empty_assembly_reports_neutral_totals() {
        let mut runner = runner();
        let summary = runner.run_all_tests_in_assembly(&Assembly::default());
        assert_eq!(summary, RunSummary::default());

        let output = runner.into_output();
        assert_eq!(output.lines(), vec!["", "", "Tests Run: 0", "Passed: 0", "Failed: 0"]);
        assert!(!output.used_style(Style::Pass));
        assert!(!output.used_style(Style::Fail));
    }

    #[test]
    fn test_indent_width_is_configurable() {
        let config = RunConfig::default().with_indent_width(4);
        let mut runner = TestRunner::with_config(RecordingOutputProvider::new(), config);
        runner.report_fixture("Db", &ResultSet::from(TestResult::pass("Db.reads")));
        assert_eq!(runner.output().lines(), vec!["Db", "    reads: Pass"]);
    }
}
