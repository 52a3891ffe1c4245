//! Generation backend adapter for the `notebooklm` command-line tool.

mod notebooklm;

pub use notebooklm::NotebookCli;
