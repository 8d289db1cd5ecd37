use crate::apply::apply_fix;
use crate::diagnostic::Diagnostic;
use crate::error::SuggestError;
use crate::options::Options;
use crate::probe::{PythonProbe, SyntaxProbe};
use crate::suggest::FixSource;
use crate::validate::Validator;
use tracing::{debug, info, warn};

/// Terminal state of a repair run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The content parses as valid JSON.
    Success,
    /// The iteration budget ran out with the content still invalid.
    Exhausted,
    /// The loop stopped early.
    Aborted(AbortReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortReason {
    /// The fix service call failed. An identical retry would only burn
    /// quota, so the loop stops immediately.
    Service(String),
    /// Two consecutive iterations produced no content change.
    Stagnant,
}

/// What a repair run did, and the content it ended on.
#[derive(Debug, Clone)]
pub struct MendReport {
    pub outcome: Outcome,
    /// Validation passes run.
    pub iterations: u32,
    /// Fixes that actually changed the content.
    pub fixes_applied: u32,
    /// The JSON validator's verdict from the last failed validation.
    pub last_diagnostic: Option<Diagnostic>,
    /// Final working content: the repaired text on success, the last
    /// attempt otherwise. Callers decide whether to persist it.
    pub content: String,
}

const STAGNATION_LIMIT: u32 = 2;

/// The repair loop: validate, probe, request a fix, apply, repeat.
///
/// Owns the working content for the whole run; nothing else mutates it, and
/// it only ever changes through the applier's output.
pub struct Mender {
    opts: Options,
    validator: Validator,
    probe: Box<dyn SyntaxProbe>,
    fixes: Box<dyn FixSource>,
}

impl Mender {
    pub fn new(opts: Options, fixes: Box<dyn FixSource>) -> Self {
        let validator = Validator::new(&opts);
        let probe = Box::new(PythonProbe::new(&opts));
        Self {
            opts,
            validator,
            probe,
            fixes,
        }
    }

    /// Full control over the collaborators; the tests script them.
    pub fn with_parts(
        opts: Options,
        validator: Validator,
        probe: Box<dyn SyntaxProbe>,
        fixes: Box<dyn FixSource>,
    ) -> Self {
        Self {
            opts,
            validator,
            probe,
            fixes,
        }
    }

    pub fn run(&self, mut content: String) -> MendReport {
        let mut stagnant = 0u32;
        let mut fixes_applied = 0u32;
        let mut iterations = 0u32;
        let mut last_diagnostic: Option<Diagnostic> = None;

        for iteration in 1..=self.opts.max_iterations {
            iterations = iteration;

            let diag = match self.validator.validate(&content) {
                Ok(()) => {
                    info!(iteration, fixes_applied, "content is valid JSON");
                    return MendReport {
                        outcome: Outcome::Success,
                        iterations,
                        fixes_applied,
                        last_diagnostic,
                        content,
                    };
                }
                Err(diag) => diag,
            };
            debug!(iteration, %diag, "validation failed");
            last_diagnostic = Some(diag.clone());

            // Detection order matters to the prompt: validator verdict
            // first, probe signal second.
            let mut diagnostics = vec![diag];
            if let Err(probe_diag) = self.probe.probe(&content) {
                debug!(%probe_diag, "foreign syntax detected");
                diagnostics.push(probe_diag);
            }

            let fix = match self.fixes.request_fix(&content, &diagnostics) {
                Ok(fix) => fix,
                Err(SuggestError::Service(msg)) => {
                    warn!(error = %msg, "fix service failed, aborting");
                    return MendReport {
                        outcome: Outcome::Aborted(AbortReason::Service(msg)),
                        iterations,
                        fixes_applied,
                        last_diagnostic,
                        content,
                    };
                }
                Err(SuggestError::MalformedResponse(msg)) => {
                    warn!(iteration, error = %msg, "unusable fix suggestion");
                    stagnant += 1;
                    if stagnant >= STAGNATION_LIMIT {
                        return self.abort_stagnant(iterations, fixes_applied, last_diagnostic, content);
                    }
                    continue;
                }
            };

            let (next, changed) = apply_fix(&content, &fix);
            if changed {
                stagnant = 0;
                fixes_applied += 1;
                content = next;
            } else {
                stagnant += 1;
                debug!(iteration, stagnant, "fix changed nothing");
                if stagnant >= STAGNATION_LIMIT {
                    return self.abort_stagnant(iterations, fixes_applied, last_diagnostic, content);
                }
            }
        }

        info!(
            iterations,
            fixes_applied, "iteration budget exhausted, content still invalid"
        );
        MendReport {
            outcome: Outcome::Exhausted,
            iterations,
            fixes_applied,
            last_diagnostic,
            content,
        }
    }

    fn abort_stagnant(
        &self,
        iterations: u32,
        fixes_applied: u32,
        last_diagnostic: Option<Diagnostic>,
        content: String,
    ) -> MendReport {
        warn!(iterations, "no progress across consecutive fixes, aborting");
        MendReport {
            outcome: Outcome::Aborted(AbortReason::Stagnant),
            iterations,
            fixes_applied,
            last_diagnostic,
            content,
        }
    }
}
