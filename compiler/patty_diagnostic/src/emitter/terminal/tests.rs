use super::*;
use crate::ErrorCode;
use patty_ir::Span;
use pretty_assertions::assert_eq;

fn render(emitter: TerminalEmitter<Vec<u8>>, diags: &[Diagnostic]) -> String {
    let mut emitter = emitter;
    emitter.emit_all(diags);
    emitter.flush();
    String::from_utf8_lossy(&emitter.into_inner()).into_owned()
}

#[test]
fn plain_output_without_source() {
    let emitter = TerminalEmitter::with_color_mode(Vec::new(), ColorMode::Never, false);
    let diag = Diagnostic::error(ErrorCode::E2001)
        .with_message("unrecognized chain operation `when`")
        .with_label(Span::new(4, 8), "not a match operation")
        .with_note("expected `with`, `otherwise`, `exhaustive` or `run`");

    assert_eq!(
        render(emitter, &[diag]),
        "error[E2001]: unrecognized chain operation `when`\n  \
         --> 4..8: not a match operation\n  \
         = note: expected `with`, `otherwise`, `exhaustive` or `run`\n\n"
    );
}

#[test]
fn source_snippet_with_caret() {
    let source = "let a = 1\nconst r = match(x).run()\n";
    let emitter = TerminalEmitter::with_color_mode(Vec::new(), ColorMode::Never, false)
        .with_source("input.ts", source);
    let diag = Diagnostic::warning(ErrorCode::E2002)
        .with_message("a match needs at least one `.with` clause")
        .with_label(Span::new(20, 25), "here");

    assert_eq!(
        render(emitter, &[diag]),
        "warning[E2002]: a match needs at least one `.with` clause\n  \
         --> input.ts:2:11\n    \
         |\n  \
         2 | const r = match(x).run()\n    \
         |           ^^^^^ here\n\n"
    );
}

#[test]
fn colors_wrap_severity() {
    let emitter = TerminalEmitter::with_color_mode(Vec::new(), ColorMode::Always, false);
    let out = render(emitter, &[Diagnostic::error(ErrorCode::E9001).with_message("x")]);
    assert!(out.starts_with("\x1b[1;31merror\x1b[0m"));
}

#[test]
fn summary_counts() {
    let mut emitter = TerminalEmitter::with_color_mode(Vec::new(), ColorMode::Never, false);
    emitter.emit_summary(2, 1);
    emitter.emit_summary(0, 1);
    emitter.emit_summary(0, 0);
    let out = String::from_utf8_lossy(&emitter.into_inner()).into_owned();
    assert_eq!(out, "error: 2 errors, 1 warning emitted\nwarning: 1 warning emitted\n");
}

#[test]
fn color_mode_resolution() {
    assert!(ColorMode::Auto.should_use_colors(true));
    assert!(!ColorMode::Auto.should_use_colors(false));
    assert!(ColorMode::Always.should_use_colors(false));
    assert!(!ColorMode::Never.should_use_colors(true));
}
