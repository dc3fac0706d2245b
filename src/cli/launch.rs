//! Locating and starting a compiled test binary.
//!
//! A bare file name is looked up in the current directory. A path with separators also picks the
//! working directory of the run: every segment except the last two is kept (at least the first),
//! so `project/bin/tests` runs inside `project`. This mirrors how test binaries were historically
//! laid out next to their data and is fragile for other layouts.

use std::env;
use std::io;
use std::path::{MAIN_SEPARATOR_STR, Path, PathBuf};
use std::process::Command;

use thiserror::Error;

use crate::config::{COLOR_ENV, ColorChoice};

const SEPARATORS: [char; 2] = ['/', '\\'];

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("incorrect number of arguments: found {found}, expected 1")]
    ArgumentCount { found: usize },

    #[error("could not read the current directory")]
    CurrentDir(#[source] io::Error),

    #[error("cannot derive a working directory from `{path}`")]
    EmptyWorkingDirectory { path: String },

    #[error("could not switch to `{}`", dir.display())]
    WorkingDirectory {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not start `{}`", binary.display())]
    Spawn {
        binary: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("`{}` was terminated by a signal", binary.display())]
    Terminated { binary: PathBuf },
}

/// What to run, and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchTarget {
    /// Absolute path of the test binary
    pub binary: PathBuf,
    /// Directory to run in; `None` keeps the current one
    pub working_dir: Option<PathBuf>,
}

pub fn single_argument(args: &[String]) -> Result<&str, LaunchError> {
    match args {
        [path] => Ok(path),
        _ => Err(LaunchError::ArgumentCount { found: args.len() }),
    }
}

pub fn has_separator(path: &str) -> bool {
    path.contains(SEPARATORS)
}

/// Working directory for a path with separators; `None` if nothing is left.
pub fn working_directory_for(path: &str) -> Option<String> {
    let parts: Vec<&str> = path.split(SEPARATORS).collect();
    let keep = parts.len().saturating_sub(2).max(1);
    let dir = parts[..keep].join(MAIN_SEPARATOR_STR);
    (!dir.is_empty()).then_some(dir)
}

/// Resolves `path` against `cwd` without touching the filesystem.
pub fn resolve(path: &str, cwd: &Path) -> Result<LaunchTarget, LaunchError> {
    let binary = cwd.join(path);
    if !has_separator(path) {
        return Ok(LaunchTarget {
            binary,
            working_dir: None,
        });
    }

    let dir = working_directory_for(path).ok_or_else(|| LaunchError::EmptyWorkingDirectory {
        path: path.to_string(),
    })?;
    Ok(LaunchTarget {
        binary,
        working_dir: Some(cwd.join(dir)),
    })
}

/// Resolves `path` against the process's current directory.
pub fn locate(path: &str) -> Result<LaunchTarget, LaunchError> {
    let cwd = env::current_dir().map_err(LaunchError::CurrentDir)?;
    resolve(path, &cwd)
}

/// Runs the test binary with inherited stdio and returns its exit code.
#[tracing::instrument(skip_all, fields(binary = %target.binary.display()))]
pub fn spawn(target: &LaunchTarget, color: ColorChoice) -> Result<i32, LaunchError> {
    let mut command = Command::new(&target.binary);
    command.env(COLOR_ENV, color.as_str());

    if let Some(dir) = &target.working_dir {
        if !dir.is_dir() {
            return Err(LaunchError::WorkingDirectory {
                dir: dir.clone(),
                source: io::Error::new(io::ErrorKind::NotFound, "no such directory"),
            });
        }
        tracing::debug!(dir = %dir.display(), "switching working directory");
        command.current_dir(dir);
    }

    let status = command.status().map_err(|source| LaunchError::Spawn {
        binary: target.binary.clone(),
        source,
    })?;
    tracing::debug!(%status, "test binary exited");

    status.code().ok_or_else(|| LaunchError::Terminated {
        binary: target.binary.clone(),
    })
}
