//! Entry point of a test binary.

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use crate::config::RunConfig;
use crate::discovery::Assembly;
use crate::output::ConsoleOutputProvider;
use crate::runner::{RunSummary, TestRunner};

/// Logs to stderr; `RUST_LOG` takes precedence over `default_filter`.
pub fn init_tracing(default_filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .try_init();
}

/// Runs every fixture linked into this binary. Used by [`crate::main!`].
pub fn run_linked() -> ExitCode {
    init_tracing("warn");
    run_assembly(&Assembly::linked(), RunConfig::from_env())
}

/// Runs `assembly` against the console.
pub fn run_assembly(assembly: &Assembly, config: RunConfig) -> ExitCode {
    let console = ConsoleOutputProvider::stdout(config.color);
    let mut runner = TestRunner::with_config(console, config);
    let summary = runner.run_all_tests_in_assembly(assembly);
    exit_code(&summary)
}

pub fn exit_code(summary: &RunSummary) -> ExitCode {
    if summary.failed > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
