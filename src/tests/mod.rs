use crate::diagnostic::Diagnostic;
use crate::error::SuggestError;
use crate::mend::Mender;
use crate::options::Options;
use crate::probe::SyntaxProbe;
use crate::suggest::{FixSource, FixSuggestion};
use crate::validate::Validator;
use std::cell::Cell;
use std::rc::Rc;

// Shared test doubles.

/// Probe with no signal, so loop tests never depend on an interpreter
/// being installed on the host.
struct NoProbe;

impl SyntaxProbe for NoProbe {
    fn probe(&self, _content: &str) -> Result<(), Diagnostic> {
        Ok(())
    }
}

/// Fix source scripted by a closure over the 1-based call number. Counts
/// calls so tests can assert how much service quota a scenario consumes.
struct ScriptedFixes<F> {
    calls: Rc<Cell<u32>>,
    script: F,
}

impl<F> ScriptedFixes<F>
where
    F: Fn(u32, &str, &[Diagnostic]) -> Result<FixSuggestion, SuggestError>,
{
    fn new(script: F) -> (Self, Rc<Cell<u32>>) {
        let calls = Rc::new(Cell::new(0));
        (
            Self {
                calls: Rc::clone(&calls),
                script,
            },
            calls,
        )
    }
}

impl<F> FixSource for ScriptedFixes<F>
where
    F: Fn(u32, &str, &[Diagnostic]) -> Result<FixSuggestion, SuggestError>,
{
    fn request_fix(
        &self,
        content: &str,
        diagnostics: &[Diagnostic],
    ) -> Result<FixSuggestion, SuggestError> {
        let call = self.calls.get() + 1;
        self.calls.set(call);
        (self.script)(call, content, diagnostics)
    }
}

/// Mender over the built-in validator and a silent probe.
fn test_mender(max_iterations: u32, fixes: Box<dyn FixSource>) -> Mender {
    let opts = Options {
        max_iterations,
        ..Options::default()
    };
    Mender::with_parts(opts, Validator::builtin_only(), Box::new(NoProbe), fixes)
}

mod suggestion_parsing;
mod validation;
