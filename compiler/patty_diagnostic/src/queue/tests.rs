use super::*;

fn error_at(code: ErrorCode, start: u32, message: &str) -> Diagnostic {
    Diagnostic::error(code)
        .with_message(message)
        .with_label(Span::new(start, start + 1), "here")
}

#[test]
fn flush_sorts_by_position() {
    let source = "let a = 1\nlet b = 2\nlet c = 3\n";
    let mut queue = DiagnosticQueue::new().with_source(source);
    queue.push(error_at(ErrorCode::E2003, 20, "third"));
    queue.push(error_at(ErrorCode::E2001, 0, "first"));
    queue.push(error_at(ErrorCode::E2002, 10, "second"));

    let messages: Vec<String> = queue.flush().into_iter().map(|d| d.message).collect();
    assert_eq!(messages, vec!["first", "second", "third"]);
    assert!(queue.is_empty());
    assert_eq!(queue.error_count(), 0);
}

#[test]
fn parser_errors_dedup_per_line() {
    let mut queue = DiagnosticQueue::new();
    assert!(queue.add(error_at(ErrorCode::E1001, 0, "a"), 3, 1));
    assert!(!queue.add(error_at(ErrorCode::E1002, 5, "b"), 3, 6));
    assert!(queue.add(error_at(ErrorCode::E1002, 9, "c"), 4, 1));
    assert_eq!(queue.len(), 2);
}

#[test]
fn match_errors_are_not_deduplicated() {
    let mut queue = DiagnosticQueue::new();
    assert!(queue.add(error_at(ErrorCode::E2003, 0, "a"), 1, 1));
    assert!(queue.add(error_at(ErrorCode::E2003, 4, "b"), 1, 5));
    assert_eq!(queue.error_count(), 2);
}

#[test]
fn error_limit() {
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig {
        error_limit: 2,
        deduplicate: false,
    });
    for i in 0..5 {
        queue.add(error_at(ErrorCode::E2001, i, "x"), i + 1, 1);
    }
    assert_eq!(queue.error_count(), 2);
    assert!(queue.limit_reached());
    // Warnings still get through.
    assert!(queue.add(Diagnostic::warning(ErrorCode::E2001), 9, 1));
    assert_eq!(queue.warning_count(), 1);
}

#[test]
fn emit_error_guarantees() {
    let mut queue = DiagnosticQueue::new();
    assert!(queue.has_errors().is_none());
    let _proof = queue.emit_error(Diagnostic::warning(ErrorCode::E3001));
    assert!(queue.has_errors().is_some());
    assert!(queue.peek().all(Diagnostic::is_error));
}

#[test]
fn too_many_errors_message() {
    let diag = too_many_errors(50, Span::new(1, 2));
    assert_eq!(diag.code, ErrorCode::E9002);
    assert_eq!(diag.message, "aborting after 50 errors");
}
