//! Runs every fixture linked into this test binary through a recording runner.
//!
//! The fixtures mirror `crates/testcraft_sample`: five tests, three passing, two failing,
//! one of them by an unexpected panic, plus a fixture whose constructor fails.

use std::io;
use std::num::ParseIntError;

use testcraft::{Assembly, RecordingOutputProvider, RunSummary, Style, TestRunner};

mod given_a_sample_sut {
    use super::*;

    #[derive(Default)]
    pub struct WhenSomethingElseIsCalled;

    #[testcraft::fixture]
    impl WhenSomethingElseIsCalled {
        #[test]
        #[expected_failure(kind = std::io::Error)]
        fn it_should_raise_an_expected_error(&self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::NotFound, "settings.toml"))
        }

        #[test]
        fn it_should_raise_an_unexpected_error(&self) {
            panic!("internal buffer overflow");
        }
    }
}

mod given_a_parser {
    use super::*;

    #[derive(Default)]
    pub struct WhenParsing;

    #[testcraft::fixture]
    impl WhenParsing {
        #[test]
        fn it_reads_digits(&self) -> Result<(), ParseIntError> {
            assert_eq!("7".parse::<u8>()?, 7);
            Ok(())
        }

        #[test]
        #[expected_failure(kind = std::num::ParseIntError)]
        fn it_rejects_words(&self) -> Result<(), ParseIntError> {
            "seven".parse::<u8>().map(drop)
        }

        #[test]
        #[expected_failure(kind = std::num::ParseIntError)]
        fn it_rejects_large_numbers(&self) -> Result<(), ParseIntError> {
            "70".parse::<u8>().map(drop)
        }
    }

    pub struct WhenOffline;

    #[testcraft::fixture(new = Self::connect)]
    impl WhenOffline {
        fn connect() -> io::Result<Self> {
            Err(io::Error::new(io::ErrorKind::ConnectionRefused, "offline"))
        }

        #[test]
        fn it_is_never_run(&self) {}
    }
}

fn run() -> (RunSummary, RecordingOutputProvider) {
    let mut runner = TestRunner::new(RecordingOutputProvider::new());
    let summary = runner.run_all_tests_in_assembly(&Assembly::linked());
    (summary, runner.into_output())
}

#[test]
fn it_should_run_all_tests_in_the_given_assembly() {
    let (summary, output) = run();
    assert_eq!(summary.total, 5);
    assert!(output.lines().iter().any(|line| line == "Tests Run: 5"));
}

#[test]
fn it_should_show_the_correct_number_of_passing_tests() {
    let (summary, output) = run();
    assert_eq!(summary.passed, 3);
    assert!(output.lines().iter().any(|line| line == "Passed: 3"));
}

#[test]
fn it_should_show_the_correct_number_of_failing_tests() {
    let (summary, output) = run();
    assert_eq!(summary.failed, 2);
    assert!(output.lines().iter().any(|line| line == "Failed: 2"));
    assert_eq!(output.style_of_line("Failed: 2"), Some(Style::Fail));
}

#[test]
fn it_should_display_the_stacktrace_for_unexpected_errors() {
    let (_, output) = run();
    assert!(output.used_style(Style::ExceptionStacktrace));
    assert!(
        output
            .lines()
            .iter()
            .any(|line| line.trim() == "An error was raised: internal buffer overflow")
    );
    assert!(output.lines().iter().any(|line| line.starts_with("at ") && line.contains("assembly_run.rs")));
}

#[test]
fn it_should_skip_fixtures_that_cannot_be_constructed() {
    let (_, output) = run();
    assert!(!output.transcript().contains("WhenOffline"));
}
