//! Seams to the external tools the batch drives.
//!
//! Every call is blocking. Implementations live in the `deck-studio`,
//! `deck-tools` and `deck-pptx` crates.

use crate::types::DeckInfo;
use crate::Result;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Checks that every required external program is installed.
pub trait Preflight {
    /// Returns `Error::ToolMissing` naming the first absent tool.
    fn check(&self) -> Result<()>;
}

/// Local copy of the remote transcript repository.
pub trait SourceMirror {
    /// Clone or hard-reset the mirror, then return the transcripts directory.
    ///
    /// Returns `Error::MirrorMissing` if that directory is absent afterwards.
    fn refresh(&self) -> Result<PathBuf>;
}

/// The slide-generation backend.
///
/// Responses that carry identifiers are returned as raw JSON; callers decode
/// them with [`crate::decode`]. An unparsable response is reported as
/// `Error::DecodeError`, anything else the backend rejects as another variant.
pub trait Studio {
    /// Returns `Error::AuthMissing` when there is no usable login.
    fn auth_check(&self) -> Result<()>;

    /// All workspaces visible to the current login.
    fn list_workspaces(&self) -> Result<Value>;

    /// Create a workspace and return the backend's response.
    fn create_workspace(&self, alias: &str, title: &str) -> Result<Value>;

    /// Upload a transcript as a source and return the backend's response.
    fn add_source(&self, workspace: &str, transcript: &Path) -> Result<Value>;

    /// Start a slide-deck artifact from one source and wait for it.
    fn create_slide_deck(&self, workspace: &str, source: &str, prompt: &str) -> Result<()>;

    /// Download the latest slide deck as PPTX to `dest`.
    fn download_slide_deck(&self, workspace: &str, dest: &Path) -> Result<()>;

    /// Remove a source from the workspace.
    fn delete_source(&self, workspace: &str, source: &str) -> Result<()>;
}

/// Office document to PDF converter.
pub trait DocumentConverter {
    /// Convert `input` into `<out_dir>/<input stem>.pdf`.
    ///
    /// `Ok` only means the converter exited cleanly; callers must still check
    /// that the file exists.
    fn convert_to_pdf(&self, input: &Path, out_dir: &Path) -> Result<()>;
}

/// Reads basic facts from a downloaded deck.
pub trait DeckInspector {
    fn inspect(&self, deck: &Path) -> Result<DeckInfo>;
}
