// PDF generation pipeline: sanitize -> render -> compile, with a
// programmatic fallback builder behind the orchestrator.

pub mod compiler;
pub mod fallback;
pub mod generator;
pub mod renderer;
pub mod sanitizer;
pub mod templates;

pub use generator::{PdfError, PdfGenerator};
