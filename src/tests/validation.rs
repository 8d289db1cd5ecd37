use crate::diagnostic::DiagnosticSource;
use crate::validate::Validator;

#[test]
fn builtin_accepts_valid_json() {
    assert!(Validator::builtin_only().validate("{\"a\": 1}").is_ok());
    assert!(Validator::builtin_only().validate("[1, 2, 3]").is_ok());
    assert!(Validator::builtin_only().validate("null").is_ok());
}

#[test]
fn builtin_rejects_trailing_comma_with_position() {
    let diag = Validator::builtin_only()
        .validate("{\"a\": 1,}")
        .expect_err("trailing comma must not validate");
    assert_eq!(diag.source, DiagnosticSource::JsonValidator);
    assert!(!diag.message.is_empty());
    assert!(diag.position.is_some());
}

#[test]
fn builtin_rejects_single_quoted_keys() {
    let diag = Validator::builtin_only()
        .validate("{'a': 1}")
        .expect_err("single quotes must not validate");
    assert_eq!(diag.source, DiagnosticSource::JsonValidator);
}

#[test]
fn builtin_rejects_empty_input() {
    assert!(Validator::builtin_only().validate("").is_err());
}

#[test]
fn absent_tool_falls_back_to_builtin_verdict() {
    // Strategy choice must not change the shape of the diagnostic, only
    // which tool produced it; with the tool absent they are identical.
    let with_missing_tool = Validator::with_tool("jsonmend-no-such-linter");
    let builtin = Validator::builtin_only();

    let input = "{\"a\": 1,}";
    let a = with_missing_tool
        .validate(input)
        .expect_err("invalid input");
    let b = builtin.validate(input).expect_err("invalid input");
    assert_eq!(a, b);
}

#[test]
fn absent_tool_accepts_valid_json() {
    let validator = Validator::with_tool("jsonmend-no-such-linter");
    assert!(validator.validate("{\"ok\": true}").is_ok());
}
