//! Decoding of backend JSON responses.
//!
//! The backend is not consistent about where it puts identifiers. Each
//! decoder carries an ordered list of the shapes it accepts and tries them in
//! turn; a response matching none of them is an explicit error, never an
//! empty identifier.

use crate::{Error, Result};
use serde_json::Value;

/// Keys that may carry a source identifier.
const SOURCE_ID_KEYS: &[&str] = &["id", "source_id"];

/// Keys that may carry a workspace identifier.
const WORKSPACE_ID_KEYS: &[&str] = &["id", "notebook_id"];

/// Wrapper objects a source identifier may be nested under.
const SOURCE_WRAPPERS: &[&str] = &["source", "item", "data", "result"];

/// Wrapper objects a workspace identifier may be nested under.
const WORKSPACE_WRAPPERS: &[&str] = &["notebook", "item", "data", "result"];

/// Keys a workspace list may be wrapped under.
const LIST_WRAPPERS: &[&str] = &["items", "notebooks"];

/// Parse command output as JSON.
pub fn parse_json(text: &str) -> Result<Value> {
    serde_json::from_str(text.trim())
        .map_err(|e| Error::DecodeError(format!("not JSON ({}): {}", e, excerpt(text))))
}

/// Where an identifier was found in a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdShape {
    /// `{"<key>": ...}`
    Flat(&'static str),
    /// `{"<wrapper>": {"<key>": ...}}`
    Nested {
        wrapper: &'static str,
        key: &'static str,
    },
}

impl IdShape {
    fn extract(self, value: &Value) -> Option<String> {
        let field = match self {
            IdShape::Flat(key) => value.get(key)?,
            IdShape::Nested { wrapper, key } => value.get(wrapper)?.get(key)?,
        };
        id_string(field)
    }
}

/// Ordered set of accepted identifier shapes.
#[derive(Debug, Clone)]
pub struct IdDecoder {
    shapes: Vec<IdShape>,
}

impl IdDecoder {
    /// Flat keys first, then every key under every wrapper, in list order.
    pub fn new(keys: &[&'static str], wrappers: &[&'static str]) -> Self {
        let flat = keys.iter().map(|&key| IdShape::Flat(key));
        let nested = wrappers
            .iter()
            .flat_map(move |&wrapper| keys.iter().map(move |&key| IdShape::Nested { wrapper, key }));
        Self {
            shapes: flat.chain(nested).collect(),
        }
    }

    /// Decoder for source-add responses.
    pub fn source() -> Self {
        Self::new(SOURCE_ID_KEYS, SOURCE_WRAPPERS)
    }

    /// Decoder for workspace-create responses.
    pub fn workspace() -> Self {
        Self::new(WORKSPACE_ID_KEYS, WORKSPACE_WRAPPERS)
    }

    /// Extract the identifier and the shape it matched.
    pub fn decode_with_shape(&self, value: &Value) -> Result<(String, IdShape)> {
        self.shapes
            .iter()
            .find_map(|&shape| shape.extract(value).map(|id| (id, shape)))
            .ok_or_else(|| Error::DecodeError(format!("no identifier in {}", excerpt_value(value))))
    }

    /// Extract the identifier.
    pub fn decode(&self, value: &Value) -> Result<String> {
        self.decode_with_shape(value).map(|(id, _)| id)
    }
}

/// One workspace as listed by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceEntry {
    /// Backend identifier.
    pub id: String,
    /// Alias used to find the workspace again.
    pub alias: Option<String>,
    /// Display name.
    pub title: Option<String>,
}

/// Decode a workspace listing: a bare array, or an array under `items` or
/// `notebooks`. Entries without an identifier are dropped.
pub fn decode_workspace_list(value: &Value) -> Result<Vec<WorkspaceEntry>> {
    let entries = match value {
        Value::Array(entries) => entries,
        Value::Object(map) => LIST_WRAPPERS
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_array))
            .ok_or_else(|| {
                Error::DecodeError(format!("no workspace list in {}", excerpt_value(value)))
            })?,
        _ => {
            return Err(Error::DecodeError(format!(
                "no workspace list in {}",
                excerpt_value(value)
            )))
        }
    };

    Ok(entries
        .iter()
        .filter_map(|entry| {
            let id = WORKSPACE_ID_KEYS
                .iter()
                .find_map(|key| entry.get(*key).and_then(id_string));
            if id.is_none() {
                log::debug!("Ignoring workspace entry without id: {}", excerpt_value(entry));
            }
            Some(WorkspaceEntry {
                id: id?,
                alias: entry.get("alias").and_then(Value::as_str).map(str::to_string),
                title: entry.get("title").and_then(Value::as_str).map(str::to_string),
            })
        })
        .collect())
}

/// Identifiers may be strings or integers. Empty strings do not count.
fn id_string(field: &Value) -> Option<String> {
    match field {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn excerpt_value(value: &Value) -> String {
    excerpt(&value.to_string())
}

/// First 200 characters of some text, for error messages.
fn excerpt(text: &str) -> String {
    let text = text.trim();
    match text.char_indices().nth(200) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
