use crate::diagnostic::{Diagnostic, DiagnosticSource};
use crate::options::Options;
use std::io::Write;
use std::process::Command;
use tracing::debug;

/// What one validation strategy concluded.
enum Verdict {
    /// The strategy could not run in this environment; try the next one.
    /// This is never surfaced as a content error.
    Unavailable,
    Valid,
    Invalid(Diagnostic),
}

trait Strategy {
    fn name(&self) -> &'static str;
    fn check(&self, content: &str) -> Verdict;
}

/// External linter invoked as a subprocess over a temp-file copy of the
/// content. The tool's verdict is its exit status; its output becomes the
/// diagnostic message verbatim.
struct LintTool {
    bin: String,
}

impl Strategy for LintTool {
    fn name(&self) -> &'static str {
        "lint-tool"
    }

    fn check(&self, content: &str) -> Verdict {
        let mut file = match tempfile::NamedTempFile::new() {
            Ok(f) => f,
            Err(e) => {
                debug!(error = %e, "cannot stage temp file for lint tool");
                return Verdict::Unavailable;
            }
        };
        if file.write_all(content.as_bytes()).is_err() || file.flush().is_err() {
            return Verdict::Unavailable;
        }

        let output = match Command::new(&self.bin).arg(file.path()).output() {
            Ok(o) => o,
            Err(e) => {
                debug!(tool = %self.bin, error = %e, "lint tool unavailable");
                return Verdict::Unavailable;
            }
        };
        if output.status.success() {
            return Verdict::Valid;
        }

        let mut message = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            if !message.is_empty() {
                message.push('\n');
            }
            message.push_str(stderr.trim());
        }
        if message.is_empty() {
            message = format!("{} reported invalid JSON ({})", self.bin, output.status);
        }
        Verdict::Invalid(Diagnostic::new(DiagnosticSource::JsonValidator, message).scrape_position())
    }
}

/// Built-in parser. Always available.
struct Builtin;

impl Strategy for Builtin {
    fn name(&self) -> &'static str {
        "builtin"
    }

    fn check(&self, content: &str) -> Verdict {
        match serde_json::from_str::<serde_json::Value>(content) {
            Ok(_) => Verdict::Valid,
            Err(e) => {
                let mut diag = Diagnostic::new(
                    DiagnosticSource::JsonValidator,
                    format!("JSON parse error: {}", e),
                );
                if e.line() > 0 {
                    diag = diag.with_position(e.line() as u32, e.column() as u32);
                }
                Verdict::Invalid(diag)
            }
        }
    }
}

/// Ordered list of validation strategies; the first available one wins and
/// its verdict alone is used. Strategy outputs are never merged.
pub struct Validator {
    strategies: Vec<Box<dyn Strategy>>,
}

impl Validator {
    /// Preferred external tool first, built-in parser as fallback.
    pub fn new(opts: &Options) -> Self {
        Self::with_tool(opts.lint_tool.clone())
    }

    /// Like [`Validator::new`] with an explicit tool binary. Pointing this
    /// at a binary that does not exist exercises the fallback path.
    pub fn with_tool(bin: impl Into<String>) -> Self {
        Self {
            strategies: vec![Box::new(LintTool { bin: bin.into() }), Box::new(Builtin)],
        }
    }

    /// Built-in parser only; no subprocess is ever spawned.
    pub fn builtin_only() -> Self {
        Self {
            strategies: vec![Box::new(Builtin)],
        }
    }

    pub fn validate(&self, content: &str) -> Result<(), Diagnostic> {
        for strategy in &self.strategies {
            match strategy.check(content) {
                Verdict::Unavailable => {
                    debug!(strategy = strategy.name(), "validation strategy unavailable");
                }
                Verdict::Valid => {
                    debug!(strategy = strategy.name(), "content is valid JSON");
                    return Ok(());
                }
                Verdict::Invalid(diag) => {
                    debug!(strategy = strategy.name(), %diag, "content is invalid");
                    return Err(diag);
                }
            }
        }
        // The built-in strategy never reports Unavailable, so this only runs
        // if the list was constructed empty; parse directly rather than guess.
        match (Builtin).check(content) {
            Verdict::Invalid(diag) => Err(diag),
            _ => Ok(()),
        }
    }
}
