// SPDX-License-Identifier: GPL-2.0-only

//! Run external commands synchronously, capturing their output.
//!
//! The only external program pkgpatch runs itself is `git`, but downstream
//! patch application and creation shell out to several tools, so the failure
//! policy is configurable: fail fast with the full command context, or log
//! the failure and hand back the captured output anyway.

use std::{
    path::Path,
    process::{Command, ExitStatus, Stdio},
};

#[derive(thiserror::Error, Debug)]
pub(crate) enum Error {
    #[error("could not execute `{command}` (cwd: {cwd}): {source}")]
    Launch {
        command: String,
        cwd: String,
        source: std::io::Error,
    },

    #[error("command failed: `{command}` (cwd: {cwd})\nstdout:\n{stdout}\nstderr:\n{stderr}")]
    Failed {
        command: String,
        cwd: String,
        stdout: String,
        stderr: String,
    },
}

/// What to do when the spawned command exits non-zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum OnError {
    /// Return an [`Error::Failed`] carrying the captured streams.
    #[default]
    Fail,

    /// Write the failure rendering to stderr and return the output.
    Log,
}

/// Options controlling a [`spawn_safe()`] invocation.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct SpawnOptions<'a> {
    /// Working directory for the spawned command.
    pub cwd: Option<&'a Path>,

    /// Failure policy for a non-zero exit.
    pub on_error: OnError,
}

/// Captured result of a completed command.
#[derive(Debug)]
pub(crate) struct SpawnOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

/// Run `command` to completion with stdout and stderr piped.
///
/// A command that cannot be launched is always an error. A command that exits
/// non-zero is handled according to [`SpawnOptions::on_error`]; with the
/// [`OnError::Log`] policy the captured output is returned so the caller can
/// inspect the exit status itself.
pub(crate) fn spawn_safe<I, S>(
    command: &str,
    args: I,
    options: SpawnOptions,
) -> Result<SpawnOutput, Error>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let args: Vec<String> = args
        .into_iter()
        .map(|arg| arg.as_ref().to_string())
        .collect();

    let mut child = Command::new(command);
    child.args(&args).stdin(Stdio::null());
    if let Some(cwd) = options.cwd {
        child.current_dir(cwd);
    }

    let command_line = render_command_line(command, &args);
    let cwd_display = options
        .cwd
        .map_or_else(|| String::from("."), |cwd| cwd.display().to_string());

    let output = child.output().map_err(|source| Error::Launch {
        command: command_line.clone(),
        cwd: cwd_display.clone(),
        source,
    })?;

    if !output.status.success() {
        let error = Error::Failed {
            command: command_line,
            cwd: cwd_display,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        match options.on_error {
            OnError::Fail => return Err(error),
            OnError::Log => eprintln!("{error}"),
        }
    }

    Ok(SpawnOutput {
        status: output.status,
        stdout: output.stdout,
        stderr: output.stderr,
    })
}

fn render_command_line(command: &str, args: &[String]) -> String {
    let mut command_line = String::from(command);
    for arg in args {
        command_line.push(' ');
        command_line.push_str(arg);
    }
    command_line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_both_streams() {
        let output = spawn_safe(
            "sh",
            ["-c", "echo out; echo err >&2"],
            SpawnOptions::default(),
        )
        .unwrap();
        assert!(output.status.success());
        assert_eq!(output.stdout, b"out\n");
        assert_eq!(output.stderr, b"err\n");
    }

    #[test]
    fn nonzero_exit_fails_fast() {
        let result = spawn_safe(
            "sh",
            ["-c", "echo partial; exit 3"],
            SpawnOptions::default(),
        );
        match result {
            Err(Error::Failed {
                command, stdout, ..
            }) => {
                assert!(command.starts_with("sh -c"));
                assert_eq!(stdout, "partial\n");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn nonzero_exit_returned_when_logging() {
        let output = spawn_safe(
            "sh",
            ["-c", "exit 3"],
            SpawnOptions {
                on_error: OnError::Log,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(output.status.code(), Some(3));
    }

    #[test]
    fn launch_failure_is_always_an_error() {
        let result = spawn_safe(
            "pkgpatch-no-such-command",
            ["--version"],
            SpawnOptions {
                on_error: OnError::Log,
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(Error::Launch { .. })));
    }

    #[test]
    fn runs_in_requested_cwd() {
        let dir = tempfile::tempdir().unwrap();
        let output = spawn_safe(
            "pwd",
            Vec::<&str>::new(),
            SpawnOptions {
                cwd: Some(dir.path()),
                ..Default::default()
            },
        )
        .unwrap();
        let reported = String::from_utf8(output.stdout).unwrap();
        assert_eq!(
            std::fs::canonicalize(reported.trim()).unwrap(),
            std::fs::canonicalize(dir.path()).unwrap()
        );
    }
}
