//! Error types for the transcript-to-deck batch.

use std::path::PathBuf;
use thiserror::Error;

/// Exit code when a required external tool is not installed.
pub const EXIT_MISSING_TOOL: i32 = 2;

/// Exit code when the generation backend has no usable login.
pub const EXIT_MISSING_AUTH: i32 = 3;

/// Exit code for every other run-aborting failure.
pub const EXIT_FAILURE: i32 = 1;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while running a batch.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read or write a local file.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A required external program is not on PATH.
    #[error("Required tool not found: {0}")]
    ToolMissing(String),

    /// The generation backend reports no valid login.
    #[error("Backend authentication missing: {0}")]
    AuthMissing(String),

    /// The transcript directory is absent after refreshing the mirror.
    #[error("Transcript directory missing after refresh: {}", .0.display())]
    MirrorMissing(PathBuf),

    /// Cloning or resetting the transcript mirror failed.
    #[error("Mirror refresh failed: {0}")]
    MirrorError(String),

    /// The manifest could not be created or appended to.
    #[error("Manifest write failed: {0}")]
    ManifestError(String),

    /// An external command exited unsuccessfully.
    #[error("Command failed: {0}")]
    CommandError(String),

    /// The generation backend rejected a request.
    #[error("Backend error: {0}")]
    BackendError(String),

    /// A backend response did not match any accepted shape.
    #[error("Unparsable backend response: {0}")]
    DecodeError(String),

    /// The target workspace could not be found or created.
    #[error("Workspace error: {0}")]
    WorkspaceError(String),

    /// A configuration value is unusable.
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// ZIP archive error (for PPTX inspection).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML parsing error (for PPTX inspection).
    #[error("XML parsing error: {0}")]
    XmlError(String),
}

impl Error {
    /// Process exit code for a run that ends with this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::ToolMissing(_) => EXIT_MISSING_TOOL,
            Error::AuthMissing(_) => EXIT_MISSING_AUTH,
            _ => EXIT_FAILURE,
        }
    }
}
