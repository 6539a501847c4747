use super::*;

#[test]
fn builder_collects_parts() {
    let diag = Diagnostic::error(ErrorCode::E2003)
        .with_message("unsupported pattern expression: call expression")
        .with_label(Span::new(10, 20), "this pattern")
        .with_secondary_label(Span::new(0, 5), "in this match")
        .with_note("patterns must be literals, P helpers, arrays or objects")
        .with_suggestion("use P.when for predicates");

    assert!(diag.is_error());
    assert_eq!(diag.primary_span(), Some(Span::new(10, 20)));
    assert_eq!(diag.labels.len(), 2);
    assert_eq!(diag.notes.len(), 1);
    assert_eq!(diag.suggestions.len(), 1);
    assert_eq!(
        diag.to_string(),
        "error[E2003]: unsupported pattern expression: call expression"
    );
}

#[test]
fn as_warning_downgrades() {
    let diag = Diagnostic::error(ErrorCode::E2001).as_warning();
    assert!(diag.is_warning());
    assert!(!diag.is_error());
}

#[test]
fn no_primary_span_without_labels() {
    let diag = Diagnostic::error(ErrorCode::E9001).with_secondary_label(Span::new(1, 2), "x");
    assert_eq!(diag.primary_span(), None);
}

#[test]
fn internal_error_has_note() {
    let diag = internal_error(Span::DUMMY, "dangling id");
    assert_eq!(diag.code, ErrorCode::E9001);
    assert_eq!(diag.notes, vec!["this is a bug in pattyc".to_string()]);
}
