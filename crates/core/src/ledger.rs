//! Append-only CSV manifest of every processing attempt.
//!
//! The ledger is write-only from the batch's point of view: nothing reads it
//! back to decide what to do. Idempotency comes from the artifacts on disk.

use crate::types::ManifestRecord;
use crate::{Error, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Header row written once, when the manifest is first created.
pub const MANIFEST_HEADER: &str =
    "timestamp_utc,transcript_relpath,deck_name,status,pptx_path,pdf_path,message";

/// Handle to an open manifest file.
#[derive(Debug)]
pub struct Manifest {
    path: PathBuf,
    file: File,
}

impl Manifest {
    /// Open the manifest at `path`, creating it (and its parent directory)
    /// with a header row if it does not exist yet.
    ///
    /// Existing content is never touched. If the last row was cut off before
    /// its newline, one is added so the next row starts on its own line.
    pub fn ensure(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                Error::ManifestError(format!("cannot create {}: {}", parent.display(), e))
            })?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(path)
            .map_err(|e| Error::ManifestError(format!("cannot open {}: {}", path.display(), e)))?;

        let len = file
            .metadata()
            .map_err(|e| Error::ManifestError(format!("cannot stat {}: {}", path.display(), e)))?
            .len();

        if len == 0 {
            writeln!(file, "{}", MANIFEST_HEADER).map_err(|e| {
                Error::ManifestError(format!("cannot write header to {}: {}", path.display(), e))
            })?;
            log::debug!("Created manifest {}", path.display());
        } else {
            let terminated = ends_with_newline(&mut file).map_err(|e| {
                Error::ManifestError(format!("cannot read {}: {}", path.display(), e))
            })?;
            if !terminated {
                log::warn!("Manifest {} ends mid-row, terminating it", path.display());
                writeln!(file).map_err(|e| {
                    Error::ManifestError(format!("cannot append to {}: {}", path.display(), e))
                })?;
            }
        }

        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    /// Location of the manifest file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one row. A failure here is fatal for the run.
    pub fn append(&mut self, record: &ManifestRecord) -> Result<()> {
        let line = format_row(record);
        self.file
            .write_all(line.as_bytes())
            .and_then(|_| self.file.flush())
            .map_err(|e| {
                Error::ManifestError(format!("cannot append to {}: {}", self.path.display(), e))
            })
    }
}

/// True when the last byte of a non-empty file is `\n`.
fn ends_with_newline(file: &mut File) -> std::io::Result<bool> {
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

/// Render one record as a CSV line, including the trailing newline.
fn format_row(record: &ManifestRecord) -> String {
    format!(
        "{},{},{},{},{},{},{}\n",
        record.timestamp.format("%Y-%m-%dT%H:%M:%SZ"),
        quote(&record.transcript_relpath),
        quote(&record.deck_name),
        record.status,
        quote(&record.pptx_path.to_string_lossy()),
        quote(&record.pdf_path.to_string_lossy()),
        quote(&record.message),
    )
}

/// Wrap a field in double quotes, doubling any quote inside it.
fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
