use crate::suggest::{FixSuggestion, RegexFlags};
use regex::RegexBuilder;
use std::borrow::Cow;
use tracing::{debug, warn};

/// Apply a fix to the working content.
///
/// Total function: a pattern that does not compile or does not match
/// reports `changed = false` with the input passed through untouched, so
/// the loop detects stagnation instead of crashing.
pub fn apply_fix(content: &str, fix: &FixSuggestion) -> (String, bool) {
    match fix {
        FixSuggestion::FullReplacement { content: new } => {
            let changed = new != content;
            debug!(changed, "applied full replacement");
            (new.clone(), changed)
        }
        FixSuggestion::Regex {
            pattern,
            replacement,
            flags,
        } => apply_regex(content, pattern, replacement, *flags),
    }
}

fn apply_regex(
    content: &str,
    pattern: &str,
    replacement: &str,
    flags: RegexFlags,
) -> (String, bool) {
    let re = match RegexBuilder::new(pattern)
        .case_insensitive(flags.case_insensitive)
        .multi_line(flags.multiline)
        .dot_matches_new_line(flags.dot_matches_new_line)
        .build()
    {
        Ok(re) => re,
        Err(e) => {
            warn!(pattern, error = %e, "suggested pattern does not compile");
            return (content.to_string(), false);
        }
    };

    let replaced = if flags.replace_all {
        re.replace_all(content, replacement)
    } else {
        re.replace(content, replacement)
    };
    match replaced {
        Cow::Borrowed(_) => {
            debug!(pattern, "pattern matched nothing");
            (content.to_string(), false)
        }
        Cow::Owned(new) => {
            // A substitution can still reproduce the input byte for byte.
            let changed = new != content;
            debug!(pattern, changed, "applied regex fix");
            (new, changed)
        }
    }
}
