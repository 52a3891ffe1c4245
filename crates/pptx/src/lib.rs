//! Read-only inspection of generated PPTX (Office Open XML) decks.

mod inspector;

pub use inspector::PptxInspector;
