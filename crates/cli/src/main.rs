//! Batch runner: mirror the transcripts, generate a deck for each new one,
//! and record every outcome in the manifest.

use anyhow::{Context, Result};
use clap::Parser;
use deck_core::{Orchestrator, RunConfig, RunSummary, Toolchain, DEFAULT_MAX_ITEMS};
use deck_pptx::PptxInspector;
use deck_studio::NotebookCli;
use deck_tools::{GitMirror, SofficeConverter, ToolCheck};
use std::path::PathBuf;

/// Generate slide decks (PPTX and PDF) from text transcripts.
#[derive(Parser, Debug)]
#[command(name = "deck-batch")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Maximum number of transcripts to attempt in this run
    #[arg(long, env = "MAX_ITEMS", default_value_t = DEFAULT_MAX_ITEMS)]
    max_items: usize,

    /// Transcript repository to clone when the mirror does not exist yet
    #[arg(long, env = "TRANSCRIPTS_REPO_URL")]
    repo_url: Option<String>,

    /// Local checkout of the transcript repository
    #[arg(long, env = "TRANSCRIPTS_MIRROR_DIR", default_value = "work/transcripts-repo")]
    mirror_dir: PathBuf,

    /// Directory inside the mirror that holds the transcripts
    #[arg(long, env = "TRANSCRIPTS_SUBPATH", default_value = "transcripts")]
    transcripts_subpath: PathBuf,

    /// Output directory for PPTX decks
    #[arg(long, env = "PPTX_OUT_DIR", default_value = "work/out/pptx")]
    pptx_dir: PathBuf,

    /// Output directory for PDF decks
    #[arg(long, env = "PDF_OUT_DIR", default_value = "work/out/pdf")]
    pdf_dir: PathBuf,

    /// Append-only CSV manifest
    #[arg(long = "manifest", env = "MANIFEST_PATH", default_value = "work/out/manifest.csv")]
    manifest_path: PathBuf,

    /// Alias of the notebook that receives the transcripts
    #[arg(long, env = "NOTEBOOK_ALIAS", default_value = "transcript-decks")]
    notebook_alias: String,

    /// Title used when the notebook has to be created
    #[arg(long, env = "NOTEBOOK_TITLE", default_value = "Transcript Decks")]
    notebook_title: String,

    /// Language of the generated decks
    #[arg(long, env = "DECK_LANGUAGE", default_value = "English")]
    language: String,

    /// git executable
    #[arg(long, env = "GIT_BIN", default_value = "git")]
    git_bin: PathBuf,

    /// notebooklm executable
    #[arg(long, env = "NOTEBOOKLM_BIN", default_value = "notebooklm")]
    notebooklm_bin: PathBuf,

    /// LibreOffice executable
    #[arg(long, env = "SOFFICE_BIN", default_value = "soffice")]
    soffice_bin: PathBuf,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn to_config(&self) -> RunConfig {
        RunConfig {
            max_items: self.max_items,
            repo_url: self.repo_url.clone().filter(|url| !url.trim().is_empty()),
            mirror_dir: self.mirror_dir.clone(),
            transcripts_subpath: self.transcripts_subpath.clone(),
            pptx_dir: self.pptx_dir.clone(),
            pdf_dir: self.pdf_dir.clone(),
            manifest_path: self.manifest_path.clone(),
            workspace_alias: self.notebook_alias.clone(),
            workspace_title: self.notebook_title.clone(),
            language: self.language.clone(),
        }
    }
}

fn main() {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    let config = args.to_config();

    let preflight = ToolCheck::new()
        .require("git", &args.git_bin)
        .require("soffice", &args.soffice_bin)
        .require("notebooklm", &args.notebooklm_bin);
    let mirror = GitMirror::new(
        config.repo_url.clone(),
        &config.mirror_dir,
        &config.transcripts_subpath,
    )
    .with_program(&args.git_bin);
    let studio = NotebookCli::new(&args.notebooklm_bin);
    let converter = SofficeConverter::new(&args.soffice_bin);
    let inspector = PptxInspector::new();

    let tools = Toolchain {
        preflight: &preflight,
        mirror: &mirror,
        studio: &studio,
        converter: &converter,
        inspector: Some(&inspector),
    };

    let summary = match Orchestrator::new(&config, tools).run() {
        Ok(summary) => summary,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(e.exit_code());
        }
    };

    if let Err(e) = report(&summary, args.json) {
        log::error!("{:#}", e);
        std::process::exit(deck_core::EXIT_FAILURE);
    }
}

/// Print the end-of-run summary.
fn report(summary: &RunSummary, json: bool) -> Result<()> {
    if json {
        let text = serde_json::to_string_pretty(summary).context("Failed to encode summary")?;
        println!("{}", text);
        return Ok(());
    }

    println!("Attempted:  {}", summary.attempted);
    println!("Succeeded:  {}", summary.succeeded);
    println!("Partial:    {}", summary.partial);
    println!("Failed:     {}", summary.failed);
    println!("Skipped:    {}", summary.skipped);
    println!("PPTX decks: {}", summary.pptx_dir.display());
    println!("PDF decks:  {}", summary.pdf_dir.display());
    println!("Manifest:   {}", summary.manifest.display());
    Ok(())
}
