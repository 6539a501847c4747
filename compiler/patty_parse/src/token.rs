//! Tokens produced by the lexer.

use patty_ir::{Name, Span};

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TokenKind {
    Ident(Name),
    Str(Name),
    /// `f64` bits.
    Num(u64),
    BigInt(Name),
    /// Index into [`TokenList::templates`].
    Template(u32),

    // Keywords
    Let,
    Const,
    Var,
    Function,
    Return,
    If,
    Else,
    True,
    False,
    Null,
    This,
    TypeOf,
    Void,
    Delete,
    New,
    Import,
    Await,
    While,
    Break,
    Continue,
    Throw,
    Try,
    Catch,
    Finally,
    In,
    InstanceOf,

    // Punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semicolon,
    Comma,
    Dot,
    Ellipsis,
    QuestionDot,
    Question,
    Colon,
    FatArrow,

    // Operators
    Eq,
    EqEq,
    EqEqEq,
    NotEq,
    NotEqEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    Percent,
    Bang,
    Tilde,
    Amp,
    AmpAmp,
    Pipe,
    PipePipe,
    Caret,
    Shl,
    Shr,
    UShr,
    QuestionQuestion,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    AmpAmpEq,
    PipePipeEq,
    QuestionQuestionEq,
    PlusPlus,
    MinusMinus,

    Eof,
}

impl TokenKind {
    /// Source text of a keyword token. Keywords are valid property names
    /// after `.` and as object keys.
    pub fn keyword_str(&self) -> Option<&'static str> {
        Some(match self {
            TokenKind::Let => "let",
            TokenKind::Const => "const",
            TokenKind::Var => "var",
            TokenKind::Function => "function",
            TokenKind::Return => "return",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Null => "null",
            TokenKind::This => "this",
            TokenKind::TypeOf => "typeof",
            TokenKind::Void => "void",
            TokenKind::Delete => "delete",
            TokenKind::New => "new",
            TokenKind::Import => "import",
            TokenKind::Await => "await",
            TokenKind::While => "while",
            TokenKind::Break => "break",
            TokenKind::Continue => "continue",
            TokenKind::Throw => "throw",
            TokenKind::Try => "try",
            TokenKind::Catch => "catch",
            TokenKind::Finally => "finally",
            TokenKind::In => "in",
            TokenKind::InstanceOf => "instanceof",
            _ => return None,
        })
    }

    /// Name used in "expected X, found Y" messages.
    pub fn display_name(&self) -> &'static str {
        if let Some(keyword) = self.keyword_str() {
            return keyword;
        }
        match self {
            TokenKind::Ident(_) => "identifier",
            TokenKind::Str(_) => "string",
            TokenKind::Num(_) => "number",
            TokenKind::BigInt(_) => "bigint",
            TokenKind::Template(_) => "template literal",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::Semicolon => ";",
            TokenKind::Comma => ",",
            TokenKind::Dot => ".",
            TokenKind::Ellipsis => "...",
            TokenKind::QuestionDot => "?.",
            TokenKind::Question => "?",
            TokenKind::Colon => ":",
            TokenKind::FatArrow => "=>",
            TokenKind::Eq => "=",
            TokenKind::EqEq => "==",
            TokenKind::EqEqEq => "===",
            TokenKind::NotEq => "!=",
            TokenKind::NotEqEq => "!==",
            TokenKind::Lt => "<",
            TokenKind::LtEq => "<=",
            TokenKind::Gt => ">",
            TokenKind::GtEq => ">=",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::StarStar => "**",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Bang => "!",
            TokenKind::Tilde => "~",
            TokenKind::Amp => "&",
            TokenKind::AmpAmp => "&&",
            TokenKind::Pipe => "|",
            TokenKind::PipePipe => "||",
            TokenKind::Caret => "^",
            TokenKind::Shl => "<<",
            TokenKind::Shr => ">>",
            TokenKind::UShr => ">>>",
            TokenKind::QuestionQuestion => "??",
            TokenKind::PlusEq => "+=",
            TokenKind::MinusEq => "-=",
            TokenKind::StarEq => "*=",
            TokenKind::SlashEq => "/=",
            TokenKind::PercentEq => "%=",
            TokenKind::AmpAmpEq => "&&=",
            TokenKind::PipePipeEq => "||=",
            TokenKind::QuestionQuestionEq => "??=",
            TokenKind::PlusPlus => "++",
            TokenKind::MinusMinus => "--",
            TokenKind::Eof => "end of file",
            _ => "token",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// A line terminator sits between this token and the previous one.
    /// Drives automatic semicolon insertion.
    pub newline_before: bool,
}

/// Pieces of one template literal.
#[derive(Clone, Debug, PartialEq)]
pub struct TemplateParts {
    /// Cooked text segments; always one more than `exprs`.
    pub quasis: Vec<(Name, Span)>,
    /// Source spans of the `${..}` expressions, re-lexed by the parser.
    pub exprs: Vec<Span>,
}

/// Lexer output. The last token is always `Eof`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TokenList {
    pub tokens: Vec<Token>,
    pub templates: Vec<TemplateParts>,
}

impl TokenList {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn kinds(&self) -> impl Iterator<Item = TokenKind> + '_ {
        self.tokens.iter().map(|t| t.kind)
    }
}
