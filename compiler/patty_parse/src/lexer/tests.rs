use super::*;
use pretty_assertions::assert_eq;

fn lex_str(source: &str) -> (Vec<TokenKind>, StringInterner) {
    let interner = StringInterner::new();
    let kinds = lex(source, &interner).unwrap().kinds().collect();
    (kinds, interner)
}

fn num(value: f64) -> TokenKind {
    TokenKind::Num(value.to_bits())
}

#[test]
fn punctuation_longest_match() {
    let (kinds, interner) = lex_str("a?.b ?? c === d !== e ... => >>> ??=");
    let id = |s: &str| TokenKind::Ident(interner.intern(s));
    assert_eq!(
        kinds,
        vec![
            id("a"),
            TokenKind::QuestionDot,
            id("b"),
            TokenKind::QuestionQuestion,
            id("c"),
            TokenKind::EqEqEq,
            id("d"),
            TokenKind::NotEqEq,
            id("e"),
            TokenKind::Ellipsis,
            TokenKind::FatArrow,
            TokenKind::UShr,
            TokenKind::QuestionQuestionEq,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn keywords_vs_identifiers() {
    let (kinds, interner) = lex_str("let letter = typeof $x");
    assert_eq!(kinds[0], TokenKind::Let);
    assert_eq!(kinds[1], TokenKind::Ident(interner.intern("letter")));
    assert_eq!(kinds[3], TokenKind::TypeOf);
    assert_eq!(kinds[4], TokenKind::Ident(interner.intern("$x")));
}

#[test]
fn numbers() {
    let (kinds, interner) = lex_str("1 2.5 .5 1_000 0xff 0b101 1e3 10n");
    assert_eq!(
        kinds,
        vec![
            num(1.0),
            num(2.5),
            num(0.5),
            num(1000.0),
            num(255.0),
            num(5.0),
            num(1000.0),
            TokenKind::BigInt(interner.intern("10")),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn strings_are_cooked() {
    let (kinds, interner) = lex_str(r#"'it\'s' "a\tb" '\x41B\u{43}'"#);
    assert_eq!(
        kinds,
        vec![
            TokenKind::Str(interner.intern("it's")),
            TokenKind::Str(interner.intern("a\tb")),
            TokenKind::Str(interner.intern("ABC")),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn comments_are_skipped_and_mark_newlines() {
    let interner = StringInterner::new();
    let tokens = lex("a /* x */ b // tail\nc /* multi\nline */ d", &interner).unwrap();
    let flags: Vec<bool> = tokens.tokens.iter().map(|t| t.newline_before).collect();
    assert_eq!(flags, vec![false, false, true, true, false]);
}

#[test]
fn doc_comments_are_skipped() {
    let interner = StringInterner::new();
    let tokens = lex("/** doc\n * more **/\nconst a = 1; /***/ b /* / */ c", &interner).unwrap();
    let kinds: Vec<TokenKind> = tokens.tokens.iter().map(|t| t.kind).collect();
    assert_eq!(kinds.len(), 8, "{kinds:?}");
    assert_eq!(kinds[0], TokenKind::Const);
    assert!(tokens.tokens[0].newline_before);
    assert_eq!(kinds[5], TokenKind::Ident(interner.intern("b")));
    assert_eq!(kinds[6], TokenKind::Ident(interner.intern("c")));
    assert!(!tokens.tokens[6].newline_before);
}

#[test]
fn template_parts() {
    let interner = StringInterner::new();
    let source = "`<img src=\"${ src }\" alt=${ `n${i}` } />`";
    let tokens = lex(source, &interner).unwrap();
    assert_eq!(tokens.tokens[0].kind, TokenKind::Template(0));
    assert_eq!(tokens.tokens[1].kind, TokenKind::Eof);

    let parts = &tokens.templates[0];
    let quasis: Vec<&str> = parts
        .quasis
        .iter()
        .map(|(name, _)| interner.lookup(*name))
        .collect();
    assert_eq!(quasis, vec!["<img src=\"", "\" alt=", " />"]);

    let exprs: Vec<&str> = parts
        .exprs
        .iter()
        .map(|span| span.slice(source).unwrap())
        .collect();
    assert_eq!(exprs, vec![" src ", " `n${i}` "]);
}

#[test]
fn template_with_braces_and_strings_inside() {
    let interner = StringInterner::new();
    let source = "`${ {a: '}'}.a }`";
    let tokens = lex(source, &interner).unwrap();
    let span = tokens.templates[0].exprs[0];
    assert_eq!(span.slice(source), Some(" {a: '}'}.a "));
}

#[test]
fn lex_at_offsets_spans() {
    let interner = StringInterner::new();
    let tokens = lex_at("x + 1", 40, &interner).unwrap();
    assert_eq!(tokens.tokens[0].span, Span::new(40, 41));
    assert_eq!(tokens.tokens[2].span, Span::new(44, 45));
    assert_eq!(tokens.tokens[3].span, Span::new(45, 45));
}

#[test]
fn errors() {
    let interner = StringInterner::new();
    assert!(matches!(
        lex("'abc", &interner),
        Err(LexError::UnterminatedString { .. })
    ));
    assert!(matches!(
        lex("`abc ${x}", &interner),
        Err(LexError::UnterminatedTemplate { .. })
    ));
    assert!(matches!(
        lex("a /* b", &interner),
        Err(LexError::UnterminatedComment { .. })
    ));
    assert!(matches!(
        lex("a # b", &interner),
        Err(LexError::UnexpectedChar { ch: '#', .. })
    ));
    assert!(matches!(
        lex(r"'\u12'", &interner),
        Err(LexError::InvalidEscape { .. })
    ));
}
