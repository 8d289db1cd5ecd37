use crate::error::SuggestError;
use crate::suggest::{FixSuggestion, RegexFlags, parse_suggestion, strip_markdown_fences};

#[test]
fn parses_regex_fix() {
    let fix = parse_suggestion(
        r#"{"pattern": ",\\s*\\}", "replacement": "}", "flags": ["replace_all"]}"#,
    )
    .expect("regex reply must parse");
    match fix {
        FixSuggestion::Regex {
            pattern,
            replacement,
            flags,
        } => {
            assert_eq!(pattern, r",\s*\}");
            assert_eq!(replacement, "}");
            assert!(flags.replace_all);
            assert!(!flags.case_insensitive);
        }
        other => panic!("expected a regex fix, got {:?}", other),
    }
}

#[test]
fn parses_full_replacement() {
    let fix = parse_suggestion(r#"{"content": "{\"a\": 1}"}"#).expect("replacement must parse");
    assert_eq!(
        fix,
        FixSuggestion::FullReplacement {
            content: "{\"a\": 1}".to_string()
        }
    );
}

#[test]
fn tolerates_markdown_fences() {
    let reply = "```json\n{\"content\": \"{}\"}\n```";
    let fix = parse_suggestion(reply).expect("fenced reply must parse");
    assert_eq!(
        fix,
        FixSuggestion::FullReplacement {
            content: "{}".to_string()
        }
    );
}

#[test]
fn tolerates_an_explanation_key() {
    let fix = parse_suggestion(r#"{"content": "{}", "explanation": "rewrote the file"}"#)
        .expect("explanation must not break parsing");
    assert!(matches!(fix, FixSuggestion::FullReplacement { .. }));
}

#[test]
fn both_variants_populated_is_malformed() {
    let err = parse_suggestion(r#"{"pattern": "x", "replacement": "y", "content": "{}"}"#)
        .expect_err("ambiguous reply must not parse");
    assert!(matches!(err, SuggestError::MalformedResponse(_)));
}

#[test]
fn neither_variant_populated_is_malformed() {
    let err = parse_suggestion(r#"{"explanation": "no idea"}"#)
        .expect_err("empty reply must not parse");
    assert!(matches!(err, SuggestError::MalformedResponse(_)));
}

#[test]
fn prose_reply_is_malformed() {
    let err = parse_suggestion("Sorry, I cannot fix this file.")
        .expect_err("prose must not parse");
    assert!(matches!(err, SuggestError::MalformedResponse(_)));
}

#[test]
fn regex_fix_without_replacement_is_malformed() {
    let err = parse_suggestion(r#"{"pattern": "x"}"#)
        .expect_err("pattern alone must not parse");
    assert!(matches!(err, SuggestError::MalformedResponse(_)));
}

#[test]
fn flag_names_accept_shorthands_and_ignore_unknowns() {
    let flags = RegexFlags::from_names(&["i", "multiline", "g", "sticky", "unicode_sets"]);
    assert!(flags.case_insensitive);
    assert!(flags.multiline);
    assert!(flags.replace_all);
    assert!(!flags.dot_matches_new_line);
}

#[test]
fn strip_fences_handles_all_shapes() {
    assert_eq!(strip_markdown_fences("{\"a\": 1}"), "{\"a\": 1}");
    assert_eq!(strip_markdown_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
    assert_eq!(strip_markdown_fences("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
    assert_eq!(strip_markdown_fences("  {\"a\": 1}\n```"), "{\"a\": 1}");
}
