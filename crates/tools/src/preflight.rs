//! Checks that required programs are on PATH.

use deck_core::{Error, Preflight, Result};
use std::path::PathBuf;

/// Lookup result for one tool.
#[derive(Debug, Clone)]
pub struct ToolInfo {
    /// Name shown to the user.
    pub name: String,
    /// Program looked up.
    pub program: PathBuf,
    /// Resolved executable, if found.
    pub path: Option<PathBuf>,
}

/// The set of programs a run cannot do without.
#[derive(Debug, Clone, Default)]
pub struct ToolCheck {
    tools: Vec<(String, PathBuf)>,
}

impl ToolCheck {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `program`, reported as `name` when missing.
    pub fn require(mut self, name: impl Into<String>, program: impl Into<PathBuf>) -> Self {
        self.tools.push((name.into(), program.into()));
        self
    }

    /// Look up every required tool.
    pub fn inspect(&self) -> Vec<ToolInfo> {
        self.tools
            .iter()
            .map(|(name, program)| ToolInfo {
                name: name.clone(),
                program: program.clone(),
                path: which::which(program).ok(),
            })
            .collect()
    }
}

impl Preflight for ToolCheck {
    fn check(&self) -> Result<()> {
        for tool in self.inspect() {
            match &tool.path {
                Some(path) => log::debug!("Found {} at {}", tool.name, path.display()),
                None => {
                    return Err(Error::ToolMissing(format!(
                        "{} ({})",
                        tool.name,
                        tool.program.display()
                    )))
                }
            }
        }
        Ok(())
    }
}
