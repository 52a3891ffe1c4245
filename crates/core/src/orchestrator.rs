//! Batch orchestration: preconditions, discovery, the capped item loop and
//! the run summary.

use crate::config::RunConfig;
use crate::context::RunContext;
use crate::decode::{decode_workspace_list, IdDecoder};
use crate::discovery::discover;
use crate::ledger::Manifest;
use crate::pipeline::{log_outcome, Pipeline};
use crate::prompt::DeckPrompt;
use crate::traits::{DeckInspector, DocumentConverter, Preflight, SourceMirror, Studio};
use crate::types::{Outcome, RunSummary};
use crate::{Error, Result};
use std::fs;

/// The external collaborators a run talks to.
#[derive(Clone, Copy)]
pub struct Toolchain<'a> {
    pub preflight: &'a dyn Preflight,
    pub mirror: &'a dyn SourceMirror,
    pub studio: &'a dyn Studio,
    pub converter: &'a dyn DocumentConverter,
    pub inspector: Option<&'a dyn DeckInspector>,
}

/// Runs one batch from preconditions to summary.
pub struct Orchestrator<'a> {
    config: &'a RunConfig,
    tools: Toolchain<'a>,
}

impl<'a> Orchestrator<'a> {
    pub fn new(config: &'a RunConfig, tools: Toolchain<'a>) -> Self {
        Self { config, tools }
    }

    /// Run the batch.
    ///
    /// Errors returned here are run-aborting: missing tools, missing login,
    /// a missing transcript directory, workspace resolution, or a ledger write
    /// failure. Per-item failures only show up in the ledger and the summary.
    pub fn run(&self) -> Result<RunSummary> {
        let config = self.config;
        config.validate()?;

        self.tools.preflight.check()?;
        self.tools.studio.auth_check()?;

        for dir in [&config.pptx_dir, &config.pdf_dir] {
            fs::create_dir_all(dir)?;
        }
        let manifest = Manifest::ensure(&config.manifest_path)?;

        let root = self.tools.mirror.refresh()?;
        if !root.is_dir() {
            return Err(Error::MirrorMissing(root));
        }

        let workspace = resolve_workspace(
            self.tools.studio,
            &config.workspace_alias,
            &config.workspace_title,
        )?;

        let mut ctx = RunContext::new(config, manifest, workspace);

        let items = discover(&root);
        if items.is_empty() {
            log::info!("No transcripts found under {}", root.display());
            return Ok(ctx.into_summary());
        }
        log::info!("Found {} transcripts under {}", items.len(), root.display());

        let prompt = DeckPrompt::new().with_language(&config.language).render();
        let mut pipeline = Pipeline::new(self.tools.studio, self.tools.converter, prompt);
        if let Some(inspector) = self.tools.inspector {
            pipeline = pipeline.with_inspector(inspector);
        }

        for (index, item) in items.iter().enumerate() {
            if ctx.cap_reached() {
                log::info!(
                    "Reached the limit of {} items; {} left for a later run",
                    config.max_items,
                    items.len() - index
                );
                break;
            }

            let artifacts = ctx.artifacts_for(item);
            if artifacts.is_complete() {
                let outcome = Outcome::skipped();
                log_outcome(item, &outcome);
                ctx.record(item, &artifacts, &outcome)?;
                continue;
            }

            pipeline.process(&mut ctx, item)?;
            ctx.count_attempt();
        }

        Ok(ctx.into_summary())
    }
}

/// Find the workspace carrying `alias`, creating it if none does.
pub fn resolve_workspace(studio: &dyn Studio, alias: &str, title: &str) -> Result<String> {
    let listing = studio.list_workspaces()?;
    let entries = decode_workspace_list(&listing)?;

    if let Some(entry) = entries
        .into_iter()
        .find(|entry| entry.alias.as_deref() == Some(alias))
    {
        match &entry.title {
            Some(title) => log::info!("Using workspace {} \"{}\" ({})", alias, title, entry.id),
            None => log::info!("Using workspace {} ({})", alias, entry.id),
        }
        return Ok(entry.id);
    }

    log::info!("Creating workspace {} ({})", alias, title);
    let created = studio.create_workspace(alias, title)?;
    IdDecoder::workspace()
        .decode(&created)
        .map_err(|e| Error::WorkspaceError(format!("created workspace {} has no id: {}", alias, e)))
}
