pub mod apply;
pub mod cli;
pub mod diagnostic;
pub mod error;
pub mod mend;
pub mod options;
pub mod probe;
pub mod suggest;
pub mod validate;

pub use apply::apply_fix;
pub use diagnostic::{Diagnostic, DiagnosticSource};
pub use error::{MendError, SuggestError};
pub use mend::{AbortReason, MendReport, Mender, Outcome};
pub use options::Options;
pub use probe::{PythonProbe, SyntaxProbe};
pub use suggest::{FixSource, FixSuggestion, OpenAiFixSource, RegexFlags};
pub use validate::Validator;

use std::fs;
use std::path::Path;

/// Run the repair loop over in-memory content with the default
/// collaborators. The service credential is read from the environment.
pub fn mend_str(content: impl Into<String>, opts: &Options) -> Result<MendReport, MendError> {
    let fixes = OpenAiFixSource::from_env(opts)?;
    Ok(Mender::new(opts.clone(), Box::new(fixes)).run(content.into()))
}

/// Repair a file on disk: read once, loop over an in-memory copy, write
/// back only on success. Failed runs never touch the file, so an
/// interrupted process cannot corrupt the original.
pub fn mend_file(path: impl AsRef<Path>, opts: &Options) -> Result<MendReport, MendError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let report = mend_str(content, opts)?;
    if report.outcome == Outcome::Success {
        fs::write(path, &report.content)?;
    }
    Ok(report)
}

#[cfg(test)]
mod tests;
