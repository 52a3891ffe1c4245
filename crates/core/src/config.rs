//! Run configuration.

use crate::{Error, Result};
use std::path::{Component, Path, PathBuf};

/// Default number of pipeline attempts per run.
pub const DEFAULT_MAX_ITEMS: usize = 15;

/// Settings for one batch run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Upper bound on items handed to the pipeline in one run.
    pub max_items: usize,

    /// Remote transcript repository. Only needed when the mirror is absent.
    pub repo_url: Option<String>,

    /// Local checkout of the transcript repository.
    pub mirror_dir: PathBuf,

    /// Directory inside the mirror that holds the transcripts.
    pub transcripts_subpath: PathBuf,

    /// Where primary (PPTX) artifacts are written.
    pub pptx_dir: PathBuf,

    /// Where secondary (PDF) artifacts are written.
    pub pdf_dir: PathBuf,

    /// Append-only CSV ledger.
    pub manifest_path: PathBuf,

    /// Alias used to find the backend workspace.
    pub workspace_alias: String,

    /// Display name given to the workspace when it has to be created.
    pub workspace_title: String,

    /// Output language of generated decks.
    pub language: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        let work = PathBuf::from("work");
        let out = work.join("out");
        Self {
            max_items: DEFAULT_MAX_ITEMS,
            repo_url: None,
            mirror_dir: work.join("transcripts-repo"),
            transcripts_subpath: PathBuf::from("transcripts"),
            pptx_dir: out.join("pptx"),
            pdf_dir: out.join("pdf"),
            manifest_path: out.join("manifest.csv"),
            workspace_alias: "transcript-decks".to_string(),
            workspace_title: "Transcript Decks".to_string(),
            language: "English".to_string(),
        }
    }
}

impl RunConfig {
    /// Directory scanned for transcripts once the mirror is up to date.
    pub fn transcripts_dir(&self) -> PathBuf {
        self.mirror_dir.join(&self.transcripts_subpath)
    }

    /// Reject values the run cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.workspace_alias.trim().is_empty() {
            return Err(Error::ConfigError("workspace alias is empty".into()));
        }
        if self.language.trim().is_empty() {
            return Err(Error::ConfigError("deck language is empty".into()));
        }
        if !is_contained(&self.transcripts_subpath) {
            return Err(Error::ConfigError(format!(
                "transcripts subpath must stay inside the mirror: {}",
                self.transcripts_subpath.display()
            )));
        }
        Ok(())
    }
}

/// True for a non-empty relative path with no `..` or root components.
fn is_contained(path: &Path) -> bool {
    let mut components = path.components().peekable();
    if components.peek().is_none() {
        return false;
    }
    components.all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
