//! Fake collaborators and a scratch workspace for pipeline and orchestrator
//! tests.

#![allow(dead_code)]

use deck_core::{
    DeckInfo, DeckInspector, DocumentConverter, Error, Preflight, Result, RunConfig,
    SourceMirror, Studio, Toolchain,
};
use serde_json::{json, Value};
use std::cell::{Cell, RefCell};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A call made against the fake backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    AuthCheck,
    ListWorkspaces,
    CreateWorkspace { alias: String, title: String },
    AddSource(PathBuf),
    CreateSlideDeck { workspace: String, source: String },
    Download(PathBuf),
    DeleteSource(String),
}

/// How the fake backend answers a source upload.
#[derive(Debug, Clone)]
pub enum AddSource {
    /// `{"id": "src-N"}`
    Flat,
    /// `{"source": {"source_id": "src-N"}}`
    Nested,
    /// The command itself fails.
    Fails,
    /// The command succeeds but the response has no identifier.
    NoId,
}

pub struct FakeStudio {
    pub authenticated: bool,
    pub workspaces: Value,
    pub add_source: AddSource,
    pub fail_generate: bool,
    pub fail_download: bool,
    pub download_writes_nothing: bool,
    pub fail_delete: bool,
    pub calls: RefCell<Vec<Call>>,
    pub next_id: Cell<usize>,
}

impl Default for FakeStudio {
    fn default() -> Self {
        Self {
            authenticated: true,
            workspaces: json!([{"id": "nb-1", "alias": "transcript-decks", "title": "Transcript Decks"}]),
            add_source: AddSource::Flat,
            fail_generate: false,
            fail_download: false,
            download_writes_nothing: false,
            fail_delete: false,
            calls: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }
}

impl FakeStudio {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Calls that touch a source or artifact, ignoring workspace setup.
    pub fn item_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| {
                !matches!(
                    c,
                    Call::AuthCheck | Call::ListWorkspaces | Call::CreateWorkspace { .. }
                )
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| pred(c)).count()
    }

    fn push(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

impl Studio for FakeStudio {
    fn auth_check(&self) -> Result<()> {
        self.push(Call::AuthCheck);
        if self.authenticated {
            Ok(())
        } else {
            Err(Error::AuthMissing("not logged in".into()))
        }
    }

    fn list_workspaces(&self) -> Result<Value> {
        self.push(Call::ListWorkspaces);
        Ok(self.workspaces.clone())
    }

    fn create_workspace(&self, alias: &str, title: &str) -> Result<Value> {
        self.push(Call::CreateWorkspace {
            alias: alias.into(),
            title: title.into(),
        });
        Ok(json!({"notebook": {"id": "nb-new"}}))
    }

    fn add_source(&self, _workspace: &str, transcript: &Path) -> Result<Value> {
        self.push(Call::AddSource(transcript.to_path_buf()));
        let n = self.next_id.get() + 1;
        self.next_id.set(n);
        let id = format!("src-{}", n);
        match self.add_source {
            AddSource::Flat => Ok(json!({ "id": id })),
            AddSource::Nested => Ok(json!({"source": {"source_id": id}})),
            AddSource::Fails => Err(Error::CommandError("upload rejected".into())),
            AddSource::NoId => Ok(json!({"status": "ok"})),
        }
    }

    fn create_slide_deck(&self, workspace: &str, source: &str, _prompt: &str) -> Result<()> {
        self.push(Call::CreateSlideDeck {
            workspace: workspace.into(),
            source: source.into(),
        });
        if self.fail_generate {
            Err(Error::BackendError("quota exceeded".into()))
        } else {
            Ok(())
        }
    }

    fn download_slide_deck(&self, _workspace: &str, dest: &Path) -> Result<()> {
        self.push(Call::Download(dest.to_path_buf()));
        if self.fail_download {
            return Err(Error::CommandError("no artifact".into()));
        }
        if !self.download_writes_nothing {
            fs::write(dest, b"PK\x03\x04 fake deck")?;
        }
        Ok(())
    }

    fn delete_source(&self, _workspace: &str, source: &str) -> Result<()> {
        self.push(Call::DeleteSource(source.into()));
        if self.fail_delete {
            Err(Error::CommandError("delete refused".into()))
        } else {
            Ok(())
        }
    }
}

/// How the fake converter behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convert {
    Writes,
    NoOutput,
    Fails,
}

pub struct FakeConverter {
    pub mode: Convert,
    pub calls: RefCell<Vec<PathBuf>>,
}

impl FakeConverter {
    pub fn new(mode: Convert) -> Self {
        Self {
            mode,
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl DocumentConverter for FakeConverter {
    fn convert_to_pdf(&self, input: &Path, out_dir: &Path) -> Result<()> {
        self.calls.borrow_mut().push(input.to_path_buf());
        match self.mode {
            Convert::Writes => {
                let stem = input.file_stem().unwrap_or_default().to_string_lossy();
                fs::write(out_dir.join(format!("{}.pdf", stem)), b"%PDF-1.7")?;
                Ok(())
            }
            Convert::NoOutput => Ok(()),
            Convert::Fails => Err(Error::CommandError("soffice crashed".into())),
        }
    }
}

pub struct FakeInspector {
    pub fails: bool,
    pub calls: Cell<usize>,
}

impl DeckInspector for FakeInspector {
    fn inspect(&self, _deck: &Path) -> Result<DeckInfo> {
        self.calls.set(self.calls.get() + 1);
        if self.fails {
            Err(Error::ZipError("not a zip".into()))
        } else {
            Ok(DeckInfo {
                slide_count: 9,
                title: Some("Weekly sync".into()),
            })
        }
    }
}

#[derive(Default)]
pub struct FakePreflight {
    pub missing: Option<String>,
}

impl Preflight for FakePreflight {
    fn check(&self) -> Result<()> {
        match &self.missing {
            Some(tool) => Err(Error::ToolMissing(tool.clone())),
            None => Ok(()),
        }
    }
}

pub struct FakeMirror {
    pub root: PathBuf,
    pub refreshes: Cell<usize>,
}

impl SourceMirror for FakeMirror {
    fn refresh(&self) -> Result<PathBuf> {
        self.refreshes.set(self.refreshes.get() + 1);
        if self.root.is_dir() {
            Ok(self.root.clone())
        } else {
            Err(Error::MirrorMissing(self.root.clone()))
        }
    }
}

/// Scratch directory laid out like a real run.
pub struct Fixture {
    pub dir: TempDir,
    pub config: RunConfig,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let config = RunConfig {
            mirror_dir: root.join("mirror"),
            pptx_dir: root.join("out").join("pptx"),
            pdf_dir: root.join("out").join("pdf"),
            manifest_path: root.join("out").join("manifest.csv"),
            ..RunConfig::default()
        };
        fs::create_dir_all(config.transcripts_dir()).unwrap();
        Self { dir, config }
    }

    pub fn with_max_items(mut self, max: usize) -> Self {
        self.config.max_items = max;
        self
    }

    /// Write a transcript at `rel` under the transcripts directory.
    pub fn add_transcript(&self, rel: &str) -> PathBuf {
        let path = self.config.transcripts_dir().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "Speaker 1: Budget is 1.2M for Q3.\n").unwrap();
        path
    }

    /// Put both artifacts for `deck` in place.
    pub fn complete(&self, deck: &str) {
        fs::create_dir_all(&self.config.pptx_dir).unwrap();
        fs::create_dir_all(&self.config.pdf_dir).unwrap();
        fs::write(self.config.pptx_dir.join(format!("{}.pptx", deck)), b"pptx").unwrap();
        fs::write(self.config.pdf_dir.join(format!("{}.pdf", deck)), b"pdf").unwrap();
    }

    pub fn mirror(&self) -> FakeMirror {
        FakeMirror {
            root: self.config.transcripts_dir(),
            refreshes: Cell::new(0),
        }
    }

    pub fn manifest_text(&self) -> String {
        fs::read_to_string(&self.config.manifest_path).unwrap_or_default()
    }

    /// Data rows of the manifest, split into fields.
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.manifest_text()
            .lines()
            .skip(1)
            .map(parse_csv_line)
            .collect()
    }
}

pub fn toolchain<'a>(
    preflight: &'a FakePreflight,
    mirror: &'a FakeMirror,
    studio: &'a FakeStudio,
    converter: &'a FakeConverter,
) -> Toolchain<'a> {
    Toolchain {
        preflight,
        mirror,
        studio,
        converter,
        inspector: None,
    }
}

/// Split one manifest line into fields, undoing the quote escaping.
pub fn parse_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}

/// Column positions in a manifest row.
pub const RELPATH: usize = 1;
pub const DECK: usize = 2;
pub const STATUS: usize = 3;
pub const PPTX: usize = 4;
pub const PDF: usize = 5;
pub const MESSAGE: usize = 6;
