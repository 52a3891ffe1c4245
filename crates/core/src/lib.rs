//! Core of the transcript-to-slide-deck batch: domain types, the manifest
//! ledger, transcript discovery, the per-item conversion pipeline and the
//! batch orchestrator.

pub mod config;
pub mod context;
pub mod decode;
pub mod discovery;
pub mod error;
pub mod exec;
pub mod ledger;
pub mod orchestrator;
pub mod pipeline;
pub mod prompt;
pub mod traits;
pub mod types;

pub use config::{RunConfig, DEFAULT_MAX_ITEMS};
pub use context::RunContext;
pub use error::{Error, Result, EXIT_FAILURE, EXIT_MISSING_AUTH, EXIT_MISSING_TOOL};
pub use ledger::{Manifest, MANIFEST_HEADER};
pub use orchestrator::{Orchestrator, Toolchain};
pub use pipeline::Pipeline;
pub use prompt::DeckPrompt;
pub use traits::{DeckInspector, DocumentConverter, Preflight, SourceMirror, Studio};
pub use types::{
    ArtifactPair, DeckInfo, ManifestRecord, Outcome, RunSummary, Status, WorkItem,
};
