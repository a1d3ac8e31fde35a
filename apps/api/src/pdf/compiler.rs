//! Primary document compiler: shells out to a LaTeX toolchain.
//!
//! Every call gets its own uniquely named temporary directory (removed on all
//! exit paths by the `TempDir` guard, including timeout) so concurrent
//! requests never collide. A `CompileError` here is routine, not a bug — the
//! orchestrator treats it as the trigger for the fallback builder.

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

/// Compiler binaries to probe, in order of preference.
pub const COMPILER_CANDIDATES: &[&str] = &["pdflatex", "xelatex"];

/// Wall-clock bound for a single compiler invocation.
pub const COMPILE_TIMEOUT: Duration = Duration::from_secs(60);

const SOURCE_FILE: &str = "resume.tex";
const OUTPUT_FILE: &str = "resume.pdf";

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("failed to spawn {binary}: {source}")]
    Spawn {
        binary: String,
        source: std::io::Error,
    },

    #[error("{binary} exited with code {code:?}; log:\n{log}")]
    Failed {
        binary: String,
        code: Option<i32>,
        log: String,
    },

    #[error("{binary} timed out after {seconds}s")]
    TimedOut { binary: String, seconds: u64 },

    #[error("{binary} succeeded but produced no output file; log:\n{log}")]
    MissingOutput { binary: String, log: String },

    #[error("io error in compile working directory: {0}")]
    Io(#[from] std::io::Error),
}

/// Scans PATH for the first discoverable candidate binary.
///
/// The orchestrator uses this to skip the primary path entirely when no
/// toolchain is installed, instead of paying a spawn failure per request.
pub fn find_compiler(candidates: &[String]) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    for candidate in candidates {
        for dir in std::env::split_paths(&path_var) {
            let full = dir.join(candidate);
            if full.is_file() {
                return Some(full);
            }
        }
    }
    None
}

/// Compiles LaTeX `source` into PDF bytes using `binary`.
///
/// Runs in non-interactive halt-on-error mode inside a scoped temp dir and
/// enforces `timeout`. The child is killed if the timeout fires.
pub async fn compile(
    binary: &Path,
    source: &str,
    timeout: Duration,
) -> Result<Vec<u8>, CompileError> {
    let workdir = tempfile::Builder::new()
        .prefix("tailorcv-render-")
        .tempdir()?;
    tokio::fs::write(workdir.path().join(SOURCE_FILE), source).await?;

    let binary_name = binary.display().to_string();
    debug!("compiling resume source with {binary_name}");

    let output = Command::new(binary)
        .args(["-interaction=nonstopmode", "-halt-on-error", SOURCE_FILE])
        .current_dir(workdir.path())
        .kill_on_drop(true)
        .output();

    let output = tokio::time::timeout(timeout, output)
        .await
        .map_err(|_| CompileError::TimedOut {
            binary: binary_name.clone(),
            seconds: timeout.as_secs(),
        })?
        .map_err(|source| CompileError::Spawn {
            binary: binary_name.clone(),
            source,
        })?;

    let log = format!(
        "{}\n{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );

    if !output.status.success() {
        return Err(CompileError::Failed {
            binary: binary_name,
            code: output.status.code(),
            log,
        });
    }

    match tokio::fs::read(workdir.path().join(OUTPUT_FILE)).await {
        Ok(bytes) if !bytes.is_empty() => Ok(bytes),
        _ => Err(CompileError::MissingOutput {
            binary: binary_name,
            log,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_compiler_misses_nonexistent_binary() {
        let candidates = vec!["definitely-not-a-real-latex-binary".to_string()];
        assert!(find_compiler(&candidates).is_none());
    }

    #[test]
    fn test_find_compiler_locates_binary_on_path() {
        // `sh` exists on any unix PATH this service runs on.
        let candidates = vec!["sh".to_string()];
        let found = find_compiler(&candidates).expect("sh should be on PATH");
        assert!(found.ends_with("sh"));
    }

    #[tokio::test]
    async fn test_compile_with_missing_binary_fails_to_spawn() {
        let err = compile(
            Path::new("/nonexistent/pdflatex"),
            r"\documentclass{article}\begin{document}x\end{document}",
            Duration::from_secs(5),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CompileError::Spawn { .. }));
    }

    #[tokio::test]
    async fn test_compile_nonzero_exit_carries_log() {
        // `false` exits 1 without producing output; the error must be Failed.
        let candidates = vec!["false".to_string()];
        let Some(binary) = find_compiler(&candidates) else {
            return; // no /bin/false in this environment, nothing to assert
        };
        let err = compile(&binary, "irrelevant", Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, CompileError::Failed { .. }));
    }
}
