//! CLI module for the testcraft launcher
//!
//! `testcraft <TEST_BINARY>` runs a compiled test binary (one built with `testcraft::main!()`),
//! forwarding the color mode and mirroring its exit code.
//!
//! ## Modules
//!
//! - `launch` - Path resolution, working directory selection and process spawning
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod launch;

use std::error::Error;
use std::fmt;
use std::process;

use clap::Parser;

use crate::config::{COLOR_ENV, ColorChoice};
use crate::harness;
use crate::output::{ConsoleOutputProvider, OutputProvider};

use self::launch::LaunchError;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
    /// Wrong invocation, nothing was run.
    pub const USAGE: ExitCode = ExitCode(2);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<LaunchError> for CliError {
    fn from(err: LaunchError) -> Self {
        let message = describe(&err);
        match err {
            LaunchError::ArgumentCount { .. } => Self::new(message, ExitCode::USAGE),
            _ => Self::failure(message),
        }
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// `err` followed by each of its sources, `: `-separated.
fn describe(err: &(dyn Error + 'static)) -> String {
    std::iter::successors(Some(err), |&e| e.source())
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(": ")
}

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Runs the fixtures of a compiled testcraft test binary
#[derive(Parser, Debug)]
#[command(name = "testcraft")]
#[command(version = VERSION)]
#[command(about = "Runs the fixtures of a compiled testcraft test binary", long_about = None)]
pub struct Cli {
    /// Test binary to run (exactly one)
    #[arg(value_name = "TEST_BINARY")]
    pub paths: Vec<String>,

    /// When to color the report
    #[arg(long, value_enum, env = COLOR_ENV, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Log debug output to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called.
pub fn run() {
    let cli = Cli::parse();
    harness::init_tracing(if cli.verbose { "debug" } else { "warn" });

    let mut console = ConsoleOutputProvider::stdout(cli.color);
    match execute(&cli, &mut console) {
        Ok(exit_code) => {
            if exit_code != ExitCode::SUCCESS {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                console.set_style_exception_message();
                console.output_line(format_args!("{}", e.message));
                console.reset_style();
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Resolve, announce and run the test binary; its exit code becomes ours.
fn execute(cli: &Cli, output: &mut impl OutputProvider) -> CliResult<ExitCode> {
    let path = launch::single_argument(&cli.paths)?;
    let target = launch::locate(path)?;

    output.output_line(format_args!("Attempting to run tests for {}", target.binary.display()));
    let code = launch::spawn(&target, cli.color)?;
    Ok(ExitCode(code))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::output::RecordingOutputProvider;

    #[test]
    fn test_cli_parse_binary() {
        let cli = Cli::try_parse_from(["testcraft", "target/debug/suite"]).unwrap();
        assert_eq!(cli.paths, vec!["target/debug/suite".to_string()]);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_parse_flags() {
        let cli = Cli::try_parse_from(["testcraft", "--color", "never", "-v", "suite"]).unwrap();
        assert_eq!(cli.color, ColorChoice::Never);
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_rejects_unknown_color() {
        assert!(Cli::try_parse_from(["testcraft", "--color", "sometimes", "suite"]).is_err());
    }

    #[test]
    fn test_wrong_argument_count_runs_nothing() {
        let cli = Cli::try_parse_from(["testcraft", "one", "two", "--color", "never"]).unwrap();
        let mut output = RecordingOutputProvider::new();

        let err = execute(&cli, &mut output).unwrap_err();
        assert_eq!(err.exit_code, ExitCode::USAGE);
        assert_eq!(err.message, "incorrect number of arguments: found 2, expected 1");
        assert!(output.events().is_empty());
    }

    #[test]
    fn test_missing_binary_is_a_failure() {
        let cli = Cli::try_parse_from(["testcraft", "testcraft-no-such-binary", "--color", "never"]).unwrap();
        let mut output = RecordingOutputProvider::new();

        let err = execute(&cli, &mut output).unwrap_err();
        assert_eq!(err.exit_code, ExitCode::FAILURE);
        assert!(err.message.starts_with("could not start"), "{}", err.message);
        assert!(output.transcript().starts_with("Attempting to run tests for "));
    }

    #[test]
    fn test_describe_includes_sources() {
        let err = LaunchError::Spawn {
            binary: "suite".into(),
            source: std::io::Error::other("permission denied"),
        };
        assert_eq!(describe(&err), "could not start `suite`: permission denied");
    }
}
