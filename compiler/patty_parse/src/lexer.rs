//! Lexer built on logos, with string interning.
//!
//! `RawToken` is the logos-derived tokenizer output; [`lex`] converts it to
//! [`TokenKind`], cooking string escapes and splitting template literals.
//!
//! Template literal `${..}` bodies are not tokenized here. Their source
//! spans are recorded in [`TemplateParts`] and the parser lexes each one
//! with [`lex_at`] when it reaches the template.

mod template;

use logos::Logos;
use patty_ir::{Span, StringInterner};

use crate::error::LexError;
use crate::token::{TemplateParts, Token, TokenKind, TokenList};

pub(crate) use template::unescape;

fn lex_template(lex: &mut logos::Lexer<'_, RawToken>) -> bool {
    if let Some(len) = template::template_len(lex.remainder()) {
        lex.bump(len);
        true
    } else {
        lex.bump(lex.remainder().len());
        false
    }
}

/// Consumes a block comment through its closing `*/`. An unterminated
/// comment swallows the rest of the input and fails.
fn lex_block_comment(lex: &mut logos::Lexer<'_, RawToken>) -> bool {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            true
        }
        None => {
            lex.bump(lex.remainder().len());
            false
        }
    }
}

#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
enum RawToken {
    /// Dropped by [`lex_at`]; the gap it leaves still counts for
    /// `newline_before`.
    #[token("/*", lex_block_comment)]
    BlockComment,

    #[token("let")]
    Let,
    #[token("const")]
    Const,
    #[token("var")]
    Var,
    #[token("function")]
    Function,
    #[token("return")]
    Return,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,
    #[token("this")]
    This,
    #[token("typeof")]
    TypeOf,
    #[token("void")]
    Void,
    #[token("delete")]
    Delete,
    #[token("new")]
    New,
    #[token("import")]
    Import,
    #[token("await")]
    Await,
    #[token("while")]
    While,
    #[token("break")]
    Break,
    #[token("continue")]
    Continue,
    #[token("throw")]
    Throw,
    #[token("try")]
    Try,
    #[token("catch")]
    Catch,
    #[token("finally")]
    Finally,
    #[token("in")]
    In,
    #[token("instanceof")]
    InstanceOf,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("...")]
    Ellipsis,
    #[token("?.")]
    QuestionDot,
    #[token("?")]
    Question,
    #[token(":")]
    Colon,
    #[token("=>")]
    FatArrow,

    #[token("=")]
    Eq,
    #[token("==")]
    EqEq,
    #[token("===")]
    EqEqEq,
    #[token("!=")]
    NotEq,
    #[token("!==")]
    NotEqEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEq,
    #[token(">")]
    Gt,
    #[token(">=")]
    GtEq,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("**")]
    StarStar,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("!")]
    Bang,
    #[token("~")]
    Tilde,
    #[token("&")]
    Amp,
    #[token("&&")]
    AmpAmp,
    #[token("|")]
    Pipe,
    #[token("||")]
    PipePipe,
    #[token("^")]
    Caret,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token(">>>")]
    UShr,
    #[token("??")]
    QuestionQuestion,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("%=")]
    PercentEq,
    #[token("&&=")]
    AmpAmpEq,
    #[token("||=")]
    PipePipeEq,
    #[token("??=")]
    QuestionQuestionEq,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,

    #[regex(r"[0-9][0-9_]*(\.[0-9_]*)?([eE][+-]?[0-9]+)?")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9]+)?")]
    Decimal,
    #[regex(r"0[xX][0-9a-fA-F_]+")]
    Hex,
    #[regex(r"0[bB][01_]+")]
    Binary,
    #[regex(r"[0-9][0-9_]*n")]
    BigInt,

    #[regex(r#""([^"\\\n\r]|\\(.|\n))*""#)]
    #[regex(r"'([^'\\\n\r]|\\(.|\n))*'")]
    Str,
    #[regex(r#""([^"\\\n\r]|\\(.|\n))*"#)]
    #[regex(r"'([^'\\\n\r]|\\(.|\n))*")]
    UnterminatedStr,

    #[token("`", lex_template)]
    Template,

    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*")]
    Ident,
}

#[inline]
fn offset(base: u32, n: usize) -> u32 {
    base.saturating_add(u32::try_from(n).unwrap_or(u32::MAX))
}

/// Lex a whole source file.
pub fn lex(source: &str, interner: &StringInterner) -> Result<TokenList, LexError> {
    lex_at(source, 0, interner)
}

/// Lex `source`, which starts at byte `base` of the file. Spans are
/// file-relative.
#[tracing::instrument(level = "trace", skip_all, fields(base, len = source.len()))]
pub fn lex_at(source: &str, base: u32, interner: &StringInterner) -> Result<TokenList, LexError> {
    let mut out = TokenList::default();
    let mut lexer = RawToken::lexer(source);
    let mut prev_end = 0usize;

    while let Some(result) = lexer.next() {
        let range = lexer.span();
        let slice = lexer.slice();
        let span = Span::new(offset(base, range.start), offset(base, range.end));
        let newline_before = source
            .get(prev_end..range.start)
            .is_some_and(|gap| gap.contains(['\n', '\r', '\u{2028}', '\u{2029}']));

        let raw = result.map_err(|()| error_for(slice, span))?;
        if raw == RawToken::BlockComment {
            continue;
        }
        let kind = convert(raw, slice, span, interner, &mut out.templates)?;
        out.tokens.push(Token {
            kind,
            span,
            newline_before,
        });
        prev_end = range.end;
    }

    let end = offset(base, source.len());
    out.tokens.push(Token {
        kind: TokenKind::Eof,
        span: Span::new(end, end),
        newline_before: source
            .get(prev_end..)
            .is_some_and(|rest| rest.contains('\n')),
    });
    Ok(out)
}

#[cold]
fn error_for(slice: &str, span: Span) -> LexError {
    if slice.starts_with("/*") {
        return LexError::UnterminatedComment { span };
    }
    match slice.chars().next() {
        Some('"' | '\'') => LexError::UnterminatedString { span },
        Some('`') => LexError::UnterminatedTemplate { span },
        Some(ch) => LexError::UnexpectedChar { span, ch },
        None => LexError::UnexpectedChar { span, ch: '\0' },
    }
}

fn parse_radix(slice: &str, radix: u32, span: Span) -> Result<f64, LexError> {
    let digits: String = slice[2..].chars().filter(|&c| c != '_').collect();
    let n = u64::from_str_radix(&digits, radix).map_err(|_| LexError::InvalidNumber {
        span,
        text: slice.to_owned(),
    })?;
    #[expect(
        clippy::cast_precision_loss,
        reason = "number literals are IEEE doubles"
    )]
    let value = n as f64;
    Ok(value)
}

fn convert(
    raw: RawToken,
    slice: &str,
    span: Span,
    interner: &StringInterner,
    templates: &mut Vec<TemplateParts>,
) -> Result<TokenKind, LexError> {
    Ok(match raw {
        RawToken::BlockComment => return Err(LexError::UnterminatedComment { span }),
        RawToken::UnterminatedStr => return Err(LexError::UnterminatedString { span }),

        RawToken::Ident => TokenKind::Ident(interner.intern(slice)),
        RawToken::Str => {
            let cooked =
                unescape(&slice[1..slice.len() - 1]).ok_or(LexError::InvalidEscape { span })?;
            TokenKind::Str(interner.intern(&cooked))
        }
        RawToken::Decimal => {
            let text: String = slice.chars().filter(|&c| c != '_').collect();
            let value = text.parse::<f64>().map_err(|_| LexError::InvalidNumber {
                span,
                text: slice.to_owned(),
            })?;
            TokenKind::Num(value.to_bits())
        }
        RawToken::Hex => TokenKind::Num(parse_radix(slice, 16, span)?.to_bits()),
        RawToken::Binary => TokenKind::Num(parse_radix(slice, 2, span)?.to_bits()),
        RawToken::BigInt => {
            let digits: String = slice[..slice.len() - 1]
                .chars()
                .filter(|&c| c != '_')
                .collect();
            TokenKind::BigInt(interner.intern(&digits))
        }
        RawToken::Template => {
            let parts = template::split(slice, span, interner)?;
            let index = u32::try_from(templates.len()).unwrap_or(u32::MAX);
            templates.push(parts);
            TokenKind::Template(index)
        }

        RawToken::Let => TokenKind::Let,
        RawToken::Const => TokenKind::Const,
        RawToken::Var => TokenKind::Var,
        RawToken::Function => TokenKind::Function,
        RawToken::Return => TokenKind::Return,
        RawToken::If => TokenKind::If,
        RawToken::Else => TokenKind::Else,
        RawToken::True => TokenKind::True,
        RawToken::False => TokenKind::False,
        RawToken::Null => TokenKind::Null,
        RawToken::This => TokenKind::This,
        RawToken::TypeOf => TokenKind::TypeOf,
        RawToken::Void => TokenKind::Void,
        RawToken::Delete => TokenKind::Delete,
        RawToken::New => TokenKind::New,
        RawToken::Import => TokenKind::Import,
        RawToken::Await => TokenKind::Await,
        RawToken::While => TokenKind::While,
        RawToken::Break => TokenKind::Break,
        RawToken::Continue => TokenKind::Continue,
        RawToken::Throw => TokenKind::Throw,
        RawToken::Try => TokenKind::Try,
        RawToken::Catch => TokenKind::Catch,
        RawToken::Finally => TokenKind::Finally,
        RawToken::In => TokenKind::In,
        RawToken::InstanceOf => TokenKind::InstanceOf,

        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Dot => TokenKind::Dot,
        RawToken::Ellipsis => TokenKind::Ellipsis,
        RawToken::QuestionDot => TokenKind::QuestionDot,
        RawToken::Question => TokenKind::Question,
        RawToken::Colon => TokenKind::Colon,
        RawToken::FatArrow => TokenKind::FatArrow,

        RawToken::Eq => TokenKind::Eq,
        RawToken::EqEq => TokenKind::EqEq,
        RawToken::EqEqEq => TokenKind::EqEqEq,
        RawToken::NotEq => TokenKind::NotEq,
        RawToken::NotEqEq => TokenKind::NotEqEq,
        RawToken::Lt => TokenKind::Lt,
        RawToken::LtEq => TokenKind::LtEq,
        RawToken::Gt => TokenKind::Gt,
        RawToken::GtEq => TokenKind::GtEq,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::StarStar => TokenKind::StarStar,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Percent => TokenKind::Percent,
        RawToken::Bang => TokenKind::Bang,
        RawToken::Tilde => TokenKind::Tilde,
        RawToken::Amp => TokenKind::Amp,
        RawToken::AmpAmp => TokenKind::AmpAmp,
        RawToken::Pipe => TokenKind::Pipe,
        RawToken::PipePipe => TokenKind::PipePipe,
        RawToken::Caret => TokenKind::Caret,
        RawToken::Shl => TokenKind::Shl,
        RawToken::Shr => TokenKind::Shr,
        RawToken::UShr => TokenKind::UShr,
        RawToken::QuestionQuestion => TokenKind::QuestionQuestion,
        RawToken::PlusEq => TokenKind::PlusEq,
        RawToken::MinusEq => TokenKind::MinusEq,
        RawToken::StarEq => TokenKind::StarEq,
        RawToken::SlashEq => TokenKind::SlashEq,
        RawToken::PercentEq => TokenKind::PercentEq,
        RawToken::AmpAmpEq => TokenKind::AmpAmpEq,
        RawToken::PipePipeEq => TokenKind::PipePipeEq,
        RawToken::QuestionQuestionEq => TokenKind::QuestionQuestionEq,
        RawToken::PlusPlus => TokenKind::PlusPlus,
        RawToken::MinusMinus => TokenKind::MinusMinus,
    })
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
