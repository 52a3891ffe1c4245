//! `notebooklm` CLI implementation of the [`Studio`] trait.

use deck_core::decode::parse_json;
use deck_core::{exec, Error, Result, Studio};
use serde_json::Value;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Default program name looked up on PATH.
pub const DEFAULT_PROGRAM: &str = "notebooklm";

/// Drives the backend through its command-line client.
#[derive(Debug, Clone)]
pub struct NotebookCli {
    program: PathBuf,
}

impl Default for NotebookCli {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl NotebookCli {
    /// Use `program` as the client executable.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn run(&self, args: &[OsString]) -> Result<String> {
        exec::run(self.program.as_os_str(), args)
    }

    fn run_json(&self, args: &[OsString]) -> Result<Value> {
        let stdout = self.run(args)?;
        parse_json(&stdout)
    }
}

/// Build an argument list from mixed string and path pieces.
fn args<I, S>(pieces: I) -> Vec<OsString>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    pieces.into_iter().map(|p| p.as_ref().to_os_string()).collect()
}

impl Studio for NotebookCli {
    fn auth_check(&self) -> Result<()> {
        self.run(&args(["auth", "check"])).map(|_| ()).map_err(|e| match e {
            Error::CommandError(detail) => {
                log::debug!("notebooklm auth check rejected: {}", detail);
                Error::AuthMissing(detail)
            }
            other => other,
        })
    }

    fn list_workspaces(&self) -> Result<Value> {
        self.run_json(&args(["list", "--json"]))
    }

    fn create_workspace(&self, alias: &str, title: &str) -> Result<Value> {
        log::debug!("Creating notebook \"{}\" with alias {}", title, alias);
        self.run_json(&args(["create", title, "--alias", alias, "--json"]))
    }

    fn add_source(&self, workspace: &str, transcript: &Path) -> Result<Value> {
        self.run_json(&args([
            OsStr::new("source"),
            OsStr::new("add"),
            transcript.as_os_str(),
            OsStr::new("--notebook"),
            OsStr::new(workspace),
            OsStr::new("--json"),
        ]))
    }

    fn create_slide_deck(&self, workspace: &str, source: &str, prompt: &str) -> Result<()> {
        self.run(&args([
            "generate",
            "slide-deck",
            prompt,
            "--notebook",
            workspace,
            "--source",
            source,
            "--wait",
        ]))
        .map(|_| ())
    }

    fn download_slide_deck(&self, workspace: &str, dest: &Path) -> Result<()> {
        log::debug!("Downloading slide deck from {} to {}", workspace, dest.display());
        self.run(&args([
            OsStr::new("download"),
            OsStr::new("slide-deck"),
            dest.as_os_str(),
            OsStr::new("--format"),
            OsStr::new("pptx"),
            OsStr::new("--notebook"),
            OsStr::new(workspace),
        ]))
        .map(|_| ())
    }

    fn delete_source(&self, workspace: &str, source: &str) -> Result<()> {
        self.run(&args([
            "source",
            "delete",
            source,
            "--notebook",
            workspace,
            "--yes",
        ]))
        .map(|_| ())
    }
}
