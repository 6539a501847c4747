use super::*;

#[test]
fn line_starts() {
    let source = "line1\nline2\nline3";
    let table = LineOffsetTable::build(source);
    assert_eq!(table.offset_to_line_col(source, 0), (1, 1));
    assert_eq!(table.offset_to_line_col(source, 6), (2, 1));
    assert_eq!(table.offset_to_line_col(source, 14), (3, 3));
    assert_eq!(table.line_count(), 3);
}

#[test]
fn offset_on_newline_belongs_to_its_line() {
    let source = "ab\ncd";
    assert_eq!(offset_to_line_col(source, 2), (1, 3));
    assert_eq!(offset_to_line_col(source, 3), (2, 1));
}

#[test]
fn columns_count_chars() {
    let source = "let é = 'x'";
    // 'é' is two bytes; the '=' sits at byte 7, character 6
    assert_eq!(offset_to_line_col(source, 7), (1, 7));
}

#[test]
fn line_text_strips_newline() {
    let source = "first\r\nsecond\n";
    let table = LineOffsetTable::build(source);
    assert_eq!(table.line_text(source, 1), "first");
    assert_eq!(table.line_text(source, 2), "second");
    assert_eq!(table.line_text(source, 9), "");
}

#[test]
fn span_start_lookup() {
    let source = "a\nmatch(x)";
    assert_eq!(span_to_line_col(source, Span::new(2, 10)), (2, 1));
}
