//! Shallow git mirror of the transcript repository.

use deck_core::{exec, Error, Result, SourceMirror};
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::PathBuf;

/// Default program name looked up on PATH.
pub const DEFAULT_PROGRAM: &str = "git";

/// Keeps a local, depth-1 checkout in step with its remote.
#[derive(Debug, Clone)]
pub struct GitMirror {
    program: PathBuf,
    url: Option<String>,
    dir: PathBuf,
    subpath: PathBuf,
}

impl GitMirror {
    /// Mirror `url` into `dir`; transcripts live in `dir/subpath`.
    ///
    /// Without a URL an existing checkout is still refreshed from its own
    /// `origin`, but a missing one cannot be cloned.
    pub fn new(url: Option<String>, dir: impl Into<PathBuf>, subpath: impl Into<PathBuf>) -> Self {
        Self {
            program: PathBuf::from(DEFAULT_PROGRAM),
            url,
            dir: dir.into(),
            subpath: subpath.into(),
        }
    }

    /// Use a specific git executable.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    fn git(&self, args: &[&OsStr]) -> Result<String> {
        exec::run(self.program.as_os_str(), args).map_err(|e| match e {
            Error::CommandError(detail) => Error::MirrorError(detail),
            other => other,
        })
    }

    /// `git -C <dir> <args...>`
    fn git_in_mirror(&self, args: &[&str]) -> Result<String> {
        let mut full: Vec<OsString> = vec!["-C".into(), self.dir.as_os_str().to_os_string()];
        full.extend(args.iter().map(OsString::from));
        let refs: Vec<&OsStr> = full.iter().map(OsString::as_os_str).collect();
        self.git(&refs)
    }

    fn is_checkout(&self) -> bool {
        self.dir.join(".git").exists()
    }

    fn clone_fresh(&self) -> Result<()> {
        let url = self.url.as_deref().ok_or_else(|| {
            Error::MirrorError(format!(
                "{} is not a git checkout and no repository URL is configured",
                self.dir.display()
            ))
        })?;

        if let Some(parent) = self.dir.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        log::info!("Cloning {} into {}", url, self.dir.display());
        self.git(&[
            OsStr::new("clone"),
            OsStr::new("--depth"),
            OsStr::new("1"),
            OsStr::new(url),
            self.dir.as_os_str(),
        ])?;
        Ok(())
    }

    fn reset_to_remote(&self) -> Result<()> {
        log::info!("Updating {} to the latest remote head", self.dir.display());
        self.git_in_mirror(&["fetch", "--depth", "1", "origin"])?;
        self.git_in_mirror(&["reset", "--hard", "FETCH_HEAD"])?;
        self.git_in_mirror(&["clean", "-fd"])?;
        Ok(())
    }

    /// Directory holding the transcripts.
    pub fn transcripts_dir(&self) -> PathBuf {
        self.dir.join(&self.subpath)
    }
}

impl SourceMirror for GitMirror {
    fn refresh(&self) -> Result<PathBuf> {
        if self.is_checkout() {
            self.reset_to_remote()?;
        } else {
            self.clone_fresh()?;
        }

        let transcripts = self.transcripts_dir();
        if !transcripts.is_dir() {
            return Err(Error::MirrorMissing(transcripts));
        }
        Ok(transcripts)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::path::Path;
    use std::process::Command;

    fn git_available() -> bool {
        which::which(DEFAULT_PROGRAM).is_ok()
    }

    fn git(dir: &Path, args: &[&str]) {
        let status = Command::new("git")
            .arg("-C")
            .arg(dir)
            .args(args)
            .status()
            .unwrap();
        assert!(status.success(), "git {:?} failed", args);
    }

    /// A local repository with one commit containing `transcripts/a.txt`.
    fn upstream(root: &Path) -> PathBuf {
        let repo = root.join("upstream");
        fs::create_dir_all(repo.join("transcripts")).unwrap();
        fs::write(repo.join("transcripts/a.txt"), "Speaker 1: hi").unwrap();
        git(&repo, &["init", "-q"]);
        git(&repo, &["add", "."]);
        git(
            &repo,
            &[
                "-c",
                "user.name=test",
                "-c",
                "user.email=test@example.com",
                "commit",
                "-q",
                "-m",
                "init",
            ],
        );
        repo
    }

    #[test]
    fn test_clone_then_reset() {
        if !git_available() {
            return;
        }
        let root = tempfile::tempdir().unwrap();
        let repo = upstream(root.path());
        let url = format!("file://{}", repo.display());
        let mirror = GitMirror::new(Some(url), root.path().join("mirror"), "transcripts");

        let transcripts = mirror.refresh().unwrap();
        assert!(transcripts.join("a.txt").is_file());

        // Local divergence is discarded on the next refresh.
        fs::write(transcripts.join("a.txt"), "edited").unwrap();
        fs::write(transcripts.join("stray.txt"), "stray").unwrap();
        mirror.refresh().unwrap();
        assert_eq!(fs::read_to_string(transcripts.join("a.txt")).unwrap(), "Speaker 1: hi");
        assert!(!transcripts.join("stray.txt").exists());
    }

    #[test]
    fn test_missing_subpath_is_fatal() {
        if !git_available() {
            return;
        }
        let root = tempfile::tempdir().unwrap();
        let repo = upstream(root.path());
        let url = format!("file://{}", repo.display());
        let mirror = GitMirror::new(Some(url), root.path().join("mirror"), "minutes");

        assert!(matches!(mirror.refresh(), Err(Error::MirrorMissing(_))));
    }

    #[test]
    fn test_no_checkout_and_no_url() {
        let root = tempfile::tempdir().unwrap();
        let mirror = GitMirror::new(None, root.path().join("mirror"), "transcripts");
        assert!(matches!(mirror.refresh(), Err(Error::MirrorError(_))));
    }

    #[test]
    fn test_configured_program_is_used() {
        let root = tempfile::tempdir().unwrap();
        let mirror = GitMirror::new(
            Some("file:///nowhere".to_string()),
            root.path().join("mirror"),
            "transcripts",
        )
        .with_program("nonexistent_git_12345");

        let err = mirror.refresh().unwrap_err();
        assert!(matches!(err, Error::ToolMissing(ref m) if m.contains("nonexistent_git_12345")));
    }
}
