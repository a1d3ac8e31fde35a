//! PDF generation orchestrator.
//!
//! Two ordered attempts: sanitize → render → compile with the external LaTeX
//! toolchain, then the programmatic fallback builder. Any primary-path error
//! (binary missing, render error, compile failure, timeout) is recovered here
//! and logged; only a fallback failure escapes, as the single terminal error
//! the HTTP layer turns into a 500. The result is always either complete PDF
//! bytes or that error — never a partial or empty stream.

use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use crate::models::resume::ResumeRecord;
use crate::pdf::compiler::{self, CompileError, COMPILER_CANDIDATES, COMPILE_TIMEOUT};
use crate::pdf::fallback;
use crate::pdf::renderer::{self, RenderError};

#[derive(Debug, Error)]
pub enum PdfError {
    /// Both the primary compiler and the fallback builder failed.
    #[error("PDF generation failed: {0}")]
    Generation(String),
}

/// Errors internal to the primary attempt. Never surfaced past `generate`.
#[derive(Debug, Error)]
enum PrimaryError {
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Compile(#[from] CompileError),
}

/// Injected, explicitly-owned generator instance. Compiler candidates are
/// configurable so tests can force the fallback path.
#[derive(Debug, Clone)]
pub struct PdfGenerator {
    compiler_candidates: Vec<String>,
    compile_timeout: Duration,
}

impl Default for PdfGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfGenerator {
    pub fn new() -> Self {
        PdfGenerator {
            compiler_candidates: COMPILER_CANDIDATES.iter().map(|s| s.to_string()).collect(),
            compile_timeout: COMPILE_TIMEOUT,
        }
    }

    #[cfg(test)]
    pub fn with_candidates(candidates: Vec<String>, compile_timeout: Duration) -> Self {
        PdfGenerator {
            compiler_candidates: candidates,
            compile_timeout,
        }
    }

    /// Generates a PDF for `record`, preferring the LaTeX toolchain and
    /// falling back to the programmatic builder on any primary failure.
    pub async fn generate(
        &self,
        template_name: &str,
        record: &ResumeRecord,
        is_premium: bool,
    ) -> Result<Vec<u8>, PdfError> {
        match compiler::find_compiler(&self.compiler_candidates) {
            Some(binary) => {
                match self
                    .try_primary(&binary, template_name, record, is_premium)
                    .await
                {
                    Ok(bytes) => {
                        info!(
                            template = template_name,
                            bytes = bytes.len(),
                            "primary compiler produced PDF"
                        );
                        return Ok(bytes);
                    }
                    // Routine: compile and render errors are expected fallback
                    // triggers, not bugs.
                    Err(e) => warn!("primary PDF path failed, using fallback builder: {e}"),
                }
            }
            None => info!("no LaTeX compiler discoverable on PATH, using fallback builder"),
        }

        let record = record.clone();
        let bytes = tokio::task::spawn_blocking(move || fallback::build(&record, is_premium))
            .await
            .map_err(|e| PdfError::Generation(format!("fallback task panicked: {e}")))?
            .map_err(|e| PdfError::Generation(e.to_string()))?;

        if bytes.is_empty() {
            return Err(PdfError::Generation(
                "fallback builder produced an empty document".to_string(),
            ));
        }

        info!(bytes = bytes.len(), "fallback builder produced PDF");
        Ok(bytes)
    }

    async fn try_primary(
        &self,
        binary: &std::path::Path,
        template_name: &str,
        record: &ResumeRecord,
        is_premium: bool,
    ) -> Result<Vec<u8>, PrimaryError> {
        let source = renderer::render(template_name, record, is_premium)?;
        let bytes = compiler::compile(binary, &source, self.compile_timeout).await?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::PersonalInfo;

    fn sample_record() -> ResumeRecord {
        ResumeRecord {
            personal_info: PersonalInfo {
                name: "A&B <C>".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn generator_without_compiler() -> PdfGenerator {
        PdfGenerator::with_candidates(
            vec!["definitely-not-a-real-latex-binary".to_string()],
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn test_generate_falls_back_when_compiler_unavailable() {
        let bytes = generator_without_compiler()
            .generate("classic", &sample_record(), false)
            .await
            .unwrap();
        assert!(!bytes.is_empty());
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_generate_falls_back_on_unknown_template() {
        // Even with a discoverable "compiler", a render error must divert to
        // the fallback rather than surface. `sh` stands in as a binary that
        // exists on PATH.
        let generator =
            PdfGenerator::with_candidates(vec!["sh".to_string()], Duration::from_secs(5));
        let bytes = generator
            .generate("no-such-template", &sample_record(), true)
            .await
            .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_generate_never_returns_empty_bytes() {
        let bytes = generator_without_compiler()
            .generate("classic", &ResumeRecord::default(), true)
            .await
            .unwrap();
        assert!(!bytes.is_empty());
    }

    #[tokio::test]
    async fn test_fallback_composition_is_idempotent() {
        // Byte-level PDF output embeds a creation timestamp, so idempotence
        // is asserted on the deterministic composition step.
        let record = sample_record();
        let first = fallback::compose(&record, false);
        let second = fallback::compose(&record, false);
        assert_eq!(first, second);
    }
}
