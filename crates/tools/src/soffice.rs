//! LibreOffice headless conversion to PDF.

use deck_core::{exec, DocumentConverter, Result};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Default program name looked up on PATH.
pub const DEFAULT_PROGRAM: &str = "soffice";

/// Converts office documents with `soffice --headless`.
#[derive(Debug, Clone)]
pub struct SofficeConverter {
    program: PathBuf,
}

impl Default for SofficeConverter {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl SofficeConverter {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl DocumentConverter for SofficeConverter {
    fn convert_to_pdf(&self, input: &Path, out_dir: &Path) -> Result<()> {
        exec::run(
            self.program.as_os_str(),
            &[
                OsStr::new("--headless"),
                OsStr::new("--convert-to"),
                OsStr::new("pdf"),
                OsStr::new("--outdir"),
                out_dir.as_os_str(),
                input.as_os_str(),
            ],
        )
        .map(|_| ())
    }
}
