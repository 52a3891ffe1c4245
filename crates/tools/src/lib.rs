//! Adapters for the external programs a batch needs besides the backend:
//! the office converter, the git mirror of the transcripts, and the check
//! that all of them are installed.

mod git;
mod preflight;
mod soffice;

pub use git::GitMirror;
pub use preflight::{ToolCheck, ToolInfo};
pub use soffice::SofficeConverter;
