//! Per-transcript conversion pipeline.
//!
//! Stages run in a fixed order and each one is a hard gate:
//!
//! ```text
//! skip-check -> register -> generate -> export -> transcode
//! ```
//!
//! A failure stops the item and becomes its ledger row; it never reaches the
//! caller as an error. The only error `process` returns is a ledger write
//! failure, which ends the whole run.

use crate::context::RunContext;
use crate::decode::IdDecoder;
use crate::traits::{DeckInspector, DocumentConverter, Studio};
use crate::types::{ArtifactPair, Outcome, Status, WorkItem};
use crate::{Error, Result};
use std::fmt;
use std::fs;
use std::io::ErrorKind;

/// Pipeline stage, used for progress logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Register,
    Generate,
    Export,
    Transcode,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Register => "register",
            Stage::Generate => "generate",
            Stage::Export => "export",
            Stage::Transcode => "transcode",
        };
        f.write_str(name)
    }
}

/// A source registered with the backend for one item.
///
/// Dropping it deletes the remote source, so every exit from the pipeline
/// cleans up. Deletion failures are logged and swallowed.
struct RegisteredSource<'a> {
    studio: &'a dyn Studio,
    workspace: &'a str,
    id: String,
}

impl Drop for RegisteredSource<'_> {
    fn drop(&mut self) {
        match self.studio.delete_source(self.workspace, &self.id) {
            Ok(()) => log::debug!("Deleted source {}", self.id),
            Err(e) => log::warn!("Could not delete source {}: {}", self.id, e),
        }
    }
}

/// Drives one work item through the conversion stages.
pub struct Pipeline<'a> {
    studio: &'a dyn Studio,
    converter: &'a dyn DocumentConverter,
    inspector: Option<&'a dyn DeckInspector>,
    prompt: String,
    decoder: IdDecoder,
}

impl<'a> Pipeline<'a> {
    /// Create a pipeline that sends `prompt` with every generation request.
    pub fn new(
        studio: &'a dyn Studio,
        converter: &'a dyn DocumentConverter,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            studio,
            converter,
            inspector: None,
            prompt: prompt.into(),
            decoder: IdDecoder::source(),
        }
    }

    /// Read back each exported deck and log what it contains.
    pub fn with_inspector(mut self, inspector: &'a dyn DeckInspector) -> Self {
        self.inspector = Some(inspector);
        self
    }

    /// Process one item and append its terminal row to the ledger.
    pub fn process(&self, ctx: &mut RunContext, item: &WorkItem) -> Result<Status> {
        let artifacts = ctx.artifacts_for(item);

        let outcome = if artifacts.is_complete() {
            Outcome::skipped()
        } else {
            self.convert(ctx.workspace(), item, &artifacts)
        };

        log_outcome(item, &outcome);
        ctx.record(item, &artifacts, &outcome)?;
        Ok(outcome.status)
    }

    /// Run the remote stages. The registered source is dropped, and so
    /// deleted, whichever return is taken.
    fn convert(&self, workspace: &str, item: &WorkItem, artifacts: &ArtifactPair) -> Outcome {
        let source = match self.register(workspace, item) {
            Ok(source) => source,
            Err(outcome) => return outcome,
        };

        log::info!("[{}] {}", Stage::Generate, item.deck_name);
        if let Err(e) = self
            .studio
            .create_slide_deck(workspace, &source.id, &self.prompt)
        {
            log::debug!("Generation failed for {}: {}", item.relpath, e);
            return Outcome::fail("studio create failed");
        }

        log::info!("[{}] {}", Stage::Export, item.deck_name);
        if let Err(e) = self.export(workspace, artifacts) {
            log::debug!("Export failed for {}: {}", item.relpath, e);
            return Outcome::fail("pptx download failed");
        }

        self.inspect(artifacts);

        log::info!("[{}] {}", Stage::Transcode, item.deck_name);
        self.transcode(item, artifacts)
    }

    fn register<'s>(
        &'s self,
        workspace: &'s str,
        item: &WorkItem,
    ) -> std::result::Result<RegisteredSource<'s>, Outcome> {
        log::info!("[{}] {}", Stage::Register, item.relpath);

        let response = self.studio.add_source(workspace, &item.path).map_err(|e| {
            log::debug!("Source add failed for {}: {}", item.relpath, e);
            match e {
                Error::DecodeError(_) => Outcome::fail("source id unparsable"),
                _ => Outcome::fail("source add failed"),
            }
        })?;

        let id = self.decoder.decode(&response).map_err(|e| {
            log::debug!("Source id missing for {}: {}", item.relpath, e);
            Outcome::fail("source id unparsable")
        })?;

        log::debug!("Registered {} as source {}", item.relpath, id);
        Ok(RegisteredSource {
            studio: self.studio,
            workspace,
            id,
        })
    }

    fn export(&self, workspace: &str, artifacts: &ArtifactPair) -> Result<()> {
        if let Some(parent) = artifacts.pptx.parent() {
            fs::create_dir_all(parent)?;
        }
        // A deck left by an earlier partial run must not pass for this download.
        match fs::remove_file(&artifacts.pptx) {
            Ok(()) => log::debug!("Removed stale {}", artifacts.pptx.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        self.studio.download_slide_deck(workspace, &artifacts.pptx)?;
        if !artifacts.pptx.is_file() {
            return Err(Error::BackendError(format!(
                "download reported success but {} is missing",
                artifacts.pptx.display()
            )));
        }
        Ok(())
    }

    fn inspect(&self, artifacts: &ArtifactPair) {
        let Some(inspector) = self.inspector else {
            return;
        };
        match inspector.inspect(&artifacts.pptx) {
            Ok(info) => log::info!(
                "{} has {} slides{}",
                artifacts.pptx.display(),
                info.slide_count,
                info.title
                    .map(|t| format!(", titled \"{}\"", t))
                    .unwrap_or_default()
            ),
            Err(e) => log::warn!("Could not read back {}: {}", artifacts.pptx.display(), e),
        }
    }

    fn transcode(&self, item: &WorkItem, artifacts: &ArtifactPair) -> Outcome {
        let pdf_dir = artifacts
            .pdf
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_default();

        let converted = fs::create_dir_all(&pdf_dir)
            .map_err(Error::from)
            .and_then(|_| self.converter.convert_to_pdf(&artifacts.pptx, &pdf_dir));

        match converted {
            Ok(()) if artifacts.pdf.is_file() => Outcome::success(),
            Ok(()) => Outcome::partial("pdf convert produced no output"),
            Err(e) => {
                log::debug!("PDF conversion failed for {}: {}", item.relpath, e);
                Outcome::partial("pdf conversion failed (pptx kept)")
            }
        }
    }
}

/// One console line per terminal outcome, at a level matching its status.
pub(crate) fn log_outcome(item: &WorkItem, outcome: &Outcome) {
    match outcome.status {
        Status::Success | Status::Skipped => {
            log::info!("{}: {} ({})", item.relpath, outcome.status, outcome.message)
        }
        Status::Partial => {
            log::warn!("{}: {} ({})", item.relpath, outcome.status, outcome.message)
        }
        Status::Fail => {
            log::error!("{}: {} ({})", item.relpath, outcome.status, outcome.message)
        }
    }
}
