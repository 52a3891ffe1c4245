//! Per-run state threaded through the orchestrator and the pipeline.

use crate::config::RunConfig;
use crate::ledger::Manifest;
use crate::types::{ArtifactPair, ManifestRecord, Outcome, RunSummary, WorkItem};
use crate::Result;
use std::path::PathBuf;

/// Everything one run mutates: the ledger, the attempt counter and the tally.
#[derive(Debug)]
pub struct RunContext {
    manifest: Manifest,
    workspace: String,
    pptx_dir: PathBuf,
    pdf_dir: PathBuf,
    max_items: usize,
    attempted: usize,
    summary: RunSummary,
}

impl RunContext {
    /// Start a run against `workspace` with a fresh counter.
    pub fn new(config: &RunConfig, manifest: Manifest, workspace: impl Into<String>) -> Self {
        let summary = RunSummary {
            pptx_dir: config.pptx_dir.clone(),
            pdf_dir: config.pdf_dir.clone(),
            manifest: manifest.path().to_path_buf(),
            ..RunSummary::default()
        };
        Self {
            manifest,
            workspace: workspace.into(),
            pptx_dir: config.pptx_dir.clone(),
            pdf_dir: config.pdf_dir.clone(),
            max_items: config.max_items,
            attempted: 0,
            summary,
        }
    }

    /// Backend workspace identifier for this run.
    pub fn workspace(&self) -> &str {
        &self.workspace
    }

    /// Output paths for an item's deck.
    pub fn artifacts_for(&self, item: &WorkItem) -> ArtifactPair {
        ArtifactPair::for_deck(&self.pptx_dir, &self.pdf_dir, &item.deck_name)
    }

    /// True once the per-run cap has been used up.
    pub fn cap_reached(&self) -> bool {
        self.attempted >= self.max_items
    }

    /// Count one pipeline invocation, whatever its outcome.
    pub fn count_attempt(&mut self) {
        self.attempted += 1;
        self.summary.attempted = self.attempted;
    }

    /// Append the item's terminal row to the ledger and tally it.
    pub fn record(
        &mut self,
        item: &WorkItem,
        artifacts: &ArtifactPair,
        outcome: &Outcome,
    ) -> Result<()> {
        let record = ManifestRecord::now(item, artifacts, outcome.status, &outcome.message);
        self.manifest.append(&record)?;
        self.summary.tally(outcome.status);
        Ok(())
    }

    /// Finish the run and hand back its totals.
    pub fn into_summary(self) -> RunSummary {
        self.summary
    }
}
