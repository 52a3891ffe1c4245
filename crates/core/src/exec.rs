//! Running external programs.

use crate::{Error, Result};
use std::ffi::OsStr;
use std::io::ErrorKind;
use std::process::Command;

/// Run `program` with `args` and return its stdout.
///
/// A program that cannot be found becomes `Error::ToolMissing`; a non-zero
/// exit becomes `Error::CommandError` carrying the exit code and stderr.
pub fn run<S: AsRef<OsStr>>(program: &OsStr, args: &[S]) -> Result<String> {
    let name = program.to_string_lossy();
    log::debug!(
        "Running: {} {}",
        name,
        args.iter()
            .map(|a| a.as_ref().to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    );

    let output = Command::new(program).args(args).output().map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            Error::ToolMissing(name.to_string())
        } else {
            Error::CommandError(format!("failed to start {}: {}", name, e))
        }
    })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let detail = if stderr.trim().is_empty() {
            stdout.trim().to_string()
        } else {
            stderr.trim().to_string()
        };
        return Err(Error::CommandError(format!(
            "{} exited with {}: {}",
            name,
            output
                .status
                .code()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "signal".to_string()),
            detail
        )));
    }

    log::debug!("{} output: {}", name, stdout.trim());
    Ok(stdout)
}
