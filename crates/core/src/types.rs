//! Domain types for transcripts, their deck artifacts, and ledger rows.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Characters that never belong in a deck name: controls and path separators.
static UNSAFE_NAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\x00-\x1F\x7F/\\]").unwrap());

/// Extension of the primary (office document) artifact.
pub const PRIMARY_EXT: &str = "pptx";

/// Extension of the secondary (portable document) artifact.
pub const SECONDARY_EXT: &str = "pdf";

/// Derive a deck name from a transcript path.
///
/// Only the final filename component survives, minus its extension. Both `/`
/// and `\` count as separators so a name smuggled in with either cannot point
/// outside the output directory. Returns `None` when nothing usable is left.
pub fn deck_name(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_string_lossy();
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or_default();
    let stem = Path::new(base).file_stem()?.to_string_lossy();

    let normalized: String = stem.nfc().collect();
    let cleaned = UNSAFE_NAME_CHARS.replace_all(&normalized, "");
    let cleaned = cleaned.trim();

    match cleaned {
        "" | "." | ".." => None,
        name => Some(name.to_string()),
    }
}

/// One transcript discovered in the source tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    /// Full path to the transcript.
    pub path: PathBuf,

    /// Name shared by both output artifacts.
    pub deck_name: String,

    /// Path relative to the transcripts root, for reporting.
    pub relpath: String,
}

impl WorkItem {
    /// Build a work item for `path` under `root`.
    ///
    /// Returns `None` when no deck name can be derived from the filename.
    pub fn new(root: &Path, path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let deck_name = deck_name(&path)?;
        let relpath = path
            .strip_prefix(root)
            .unwrap_or(&path)
            .to_string_lossy()
            .into_owned();

        Some(Self {
            path,
            deck_name,
            relpath,
        })
    }
}

/// The two output files produced for one deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPair {
    /// Primary (PPTX) artifact.
    pub pptx: PathBuf,

    /// Secondary (PDF) artifact.
    pub pdf: PathBuf,
}

impl ArtifactPair {
    /// Artifact paths for `deck_name` inside the two output directories.
    pub fn for_deck(pptx_dir: &Path, pdf_dir: &Path, deck_name: &str) -> Self {
        Self {
            pptx: pptx_dir.join(format!("{}.{}", deck_name, PRIMARY_EXT)),
            pdf: pdf_dir.join(format!("{}.{}", deck_name, SECONDARY_EXT)),
        }
    }

    /// A deck is complete when both files exist. Contents are not checked.
    pub fn is_complete(&self) -> bool {
        self.pptx.is_file() && self.pdf.is_file()
    }
}

/// Terminal status of one processing attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Both artifacts already existed.
    Skipped,
    /// The item stopped before a primary artifact was produced.
    Fail,
    /// The primary artifact exists but the secondary does not.
    Partial,
    /// Both artifacts were produced.
    Success,
}

impl Status {
    /// Ledger spelling of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Skipped => "skipped",
            Status::Fail => "fail",
            Status::Partial => "partial",
            Status::Success => "success",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the manifest ledger.
#[derive(Debug, Clone)]
pub struct ManifestRecord {
    /// When the outcome was recorded.
    pub timestamp: DateTime<Utc>,

    /// Transcript path relative to the transcripts root.
    pub transcript_relpath: String,

    /// Name shared by both artifacts.
    pub deck_name: String,

    /// Terminal status of the attempt.
    pub status: Status,

    /// Where the PPTX is (or would be) written.
    pub pptx_path: PathBuf,

    /// Where the PDF is (or would be) written.
    pub pdf_path: PathBuf,

    /// Short human-readable reason.
    pub message: String,
}

impl ManifestRecord {
    /// Record an outcome for `item` stamped with the current time.
    pub fn now(
        item: &WorkItem,
        artifacts: &ArtifactPair,
        status: Status,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            transcript_relpath: item.relpath.clone(),
            deck_name: item.deck_name.clone(),
            status,
            pptx_path: artifacts.pptx.clone(),
            pdf_path: artifacts.pdf.clone(),
            message: message.into(),
        }
    }
}

/// Status and message an item ended with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Terminal status.
    pub status: Status,

    /// Message written to the ledger.
    pub message: String,
}

impl Outcome {
    /// Outcome with an arbitrary status and message.
    pub fn new(status: Status, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Both artifacts were already on disk.
    pub fn skipped() -> Self {
        Self::new(Status::Skipped, "already exists")
    }

    /// The item stopped before a PPTX was produced.
    pub fn fail(message: impl Into<String>) -> Self {
        Self::new(Status::Fail, message)
    }

    /// The PPTX exists but no PDF was produced.
    pub fn partial(message: impl Into<String>) -> Self {
        Self::new(Status::Partial, message)
    }

    /// Both artifacts were produced.
    pub fn success() -> Self {
        Self::new(Status::Success, "ok")
    }
}

/// Basic facts read back from a downloaded deck.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeckInfo {
    /// Number of slides in presentation order.
    pub slide_count: usize,

    /// Text of the first slide's first shape, if any.
    pub title: Option<String>,
}

/// Totals reported at the end of a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    /// Items handed to the pipeline; bounded by the per-run cap.
    pub attempted: usize,
    /// Items bypassed because both artifacts already existed.
    pub skipped: usize,
    /// Items that ended with both artifacts.
    pub succeeded: usize,
    /// Items that ended with a PPTX but no PDF.
    pub partial: usize,
    /// Items that ended without a PPTX.
    pub failed: usize,
    /// Output directory for PPTX decks.
    pub pptx_dir: PathBuf,
    /// Output directory for PDF decks.
    pub pdf_dir: PathBuf,
    /// Manifest the run appended to.
    pub manifest: PathBuf,
}

impl RunSummary {
    /// Count one terminal status.
    pub fn tally(&mut self, status: Status) {
        match status {
            Status::Skipped => self.skipped += 1,
            Status::Fail => self.failed += 1,
            Status::Partial => self.partial += 1,
            Status::Success => self.succeeded += 1,
        }
    }
}
