//! Transcript discovery.

use crate::types::WorkItem;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extension of the transcripts picked up by a run.
pub const TRANSCRIPT_EXT: &str = "txt";

/// List every transcript under `root`, sorted by raw path bytes.
///
/// Only `.txt` files count; subtitle formats and anything else are ignored.
/// The byte-wise sort keeps the processing order identical on every machine,
/// whatever the locale. A missing or empty root gives an empty list.
pub fn discover(root: &Path) -> Vec<WorkItem> {
    let mut paths: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_transcript(path))
        .collect();

    paths.sort_by(|a, b| a.as_os_str().as_encoded_bytes().cmp(b.as_os_str().as_encoded_bytes()));

    paths
        .into_iter()
        .filter_map(|path| {
            let item = WorkItem::new(root, &path);
            if item.is_none() {
                log::warn!("No usable deck name for {}, ignoring it", path.display());
            }
            item
        })
        .collect()
}

/// Check whether a path has the transcript extension.
fn is_transcript(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(TRANSCRIPT_EXT))
        .unwrap_or(false)
}
