use crate::diagnostic::{Diagnostic, DiagnosticSource};
use crate::options::Options;
use std::io::Write;
use std::process::{Command, Stdio};
use tracing::debug;

/// Compile-only check that asks "does this text parse as another language's
/// source?". A failure is a secondary signal for the prompt, never a gate;
/// the JSON validator's verdict decides the loop.
pub trait SyntaxProbe {
    fn probe(&self, content: &str) -> Result<(), Diagnostic>;
}

/// Detects the "ran a JSON file as a Python script" accident by compiling
/// the content with a Python interpreter. `compile()` parses without
/// executing, so the probed file can never run.
pub struct PythonProbe {
    interpreter: String,
}

const COMPILE_SNIPPET: &str = "import sys; compile(sys.stdin.read(), '<json>', 'exec')";

impl PythonProbe {
    pub fn new(opts: &Options) -> Self {
        Self::with_interpreter(opts.probe_interpreter.clone())
    }

    pub fn with_interpreter(bin: impl Into<String>) -> Self {
        Self {
            interpreter: bin.into(),
        }
    }
}

impl SyntaxProbe for PythonProbe {
    fn probe(&self, content: &str) -> Result<(), Diagnostic> {
        let mut child = match Command::new(&self.interpreter)
            .arg("-c")
            .arg(COMPILE_SNIPPET)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(c) => c,
            Err(e) => {
                // Missing interpreter degrades to "no signal".
                debug!(interpreter = %self.interpreter, error = %e, "probe unavailable");
                return Ok(());
            }
        };

        if let Some(mut stdin) = child.stdin.take() {
            // A failed write means the interpreter went away early; the
            // wait below picks up whatever it had to say.
            let _ = stdin.write_all(content.as_bytes());
        }

        let output = match child.wait_with_output() {
            Ok(o) => o,
            Err(e) => {
                debug!(error = %e, "probe did not finish");
                return Ok(());
            }
        };
        if output.status.success() {
            debug!("content compiles as python, no probe signal");
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let message = stderr.trim();
        if message.is_empty() {
            return Ok(());
        }
        Err(Diagnostic::new(DiagnosticSource::SyntaxProbe, message).scrape_position())
    }
}
