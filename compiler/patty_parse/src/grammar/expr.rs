//! Expression productions.
//!
//! Precedence levels, loosest first: arrow / assignment, conditional,
//! binary operators (climbing by [`BinaryOp::precedence`]), unary,
//! postfix (member, index, call, optional chaining), primary.

use patty_diagnostic::ErrorCode;
use patty_ir::{
    AssignOp, BinaryOp, ExprId, ExprKind, ExprRange, Function, FunctionBody, FunctionId,
    FunctionKind, Name, Param, Prop, PropKey, PropKind, Span, UnaryOp,
};

use crate::cursor::Cursor;
use crate::lexer::lex_at;
use crate::token::TokenKind;
use crate::{ParseError, Parser};

fn binary_op(kind: TokenKind) -> Option<BinaryOp> {
    Some(match kind {
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Sub,
        TokenKind::Star => BinaryOp::Mul,
        TokenKind::Slash => BinaryOp::Div,
        TokenKind::Percent => BinaryOp::Mod,
        TokenKind::StarStar => BinaryOp::Exp,
        TokenKind::EqEq => BinaryOp::LooseEq,
        TokenKind::NotEq => BinaryOp::LooseNotEq,
        TokenKind::EqEqEq => BinaryOp::StrictEq,
        TokenKind::NotEqEq => BinaryOp::StrictNotEq,
        TokenKind::Lt => BinaryOp::Lt,
        TokenKind::LtEq => BinaryOp::LtEq,
        TokenKind::Gt => BinaryOp::Gt,
        TokenKind::GtEq => BinaryOp::GtEq,
        TokenKind::Amp => BinaryOp::BitAnd,
        TokenKind::Pipe => BinaryOp::BitOr,
        TokenKind::Caret => BinaryOp::BitXor,
        TokenKind::Shl => BinaryOp::Shl,
        TokenKind::Shr => BinaryOp::Shr,
        TokenKind::UShr => BinaryOp::UShr,
        TokenKind::In => BinaryOp::In,
        TokenKind::InstanceOf => BinaryOp::InstanceOf,
        TokenKind::AmpAmp => BinaryOp::And,
        TokenKind::PipePipe => BinaryOp::Or,
        TokenKind::QuestionQuestion => BinaryOp::Nullish,
        _ => return None,
    })
}

fn assign_op(kind: TokenKind) -> Option<AssignOp> {
    Some(match kind {
        TokenKind::Eq => AssignOp::Assign,
        TokenKind::PlusEq => AssignOp::Add,
        TokenKind::MinusEq => AssignOp::Sub,
        TokenKind::StarEq => AssignOp::Mul,
        TokenKind::SlashEq => AssignOp::Div,
        TokenKind::PercentEq => AssignOp::Mod,
        TokenKind::AmpAmpEq => AssignOp::And,
        TokenKind::PipePipeEq => AssignOp::Or,
        TokenKind::QuestionQuestionEq => AssignOp::Nullish,
        _ => return None,
    })
}

fn unary_op(kind: TokenKind) -> Option<UnaryOp> {
    Some(match kind {
        TokenKind::Bang => UnaryOp::Not,
        TokenKind::Minus => UnaryOp::Neg,
        TokenKind::Plus => UnaryOp::Plus,
        TokenKind::Tilde => UnaryOp::BitNot,
        TokenKind::TypeOf => UnaryOp::TypeOf,
        TokenKind::Void => UnaryOp::Void,
        TokenKind::Delete => UnaryOp::Delete,
        TokenKind::Await => UnaryOp::Await,
        _ => return None,
    })
}

impl Parser<'_> {
    /// Parse an assignment-level expression. The comma operator is not part
    /// of the accepted subset.
    pub fn parse_expr(&mut self) -> Result<ExprId, ParseError> {
        if let Some(is_async) = self.arrow_ahead() {
            return self.parse_arrow(is_async);
        }

        let start = self.span();
        let target = self.parse_conditional()?;
        let Some(op) = assign_op(self.kind()) else {
            return Ok(target);
        };
        match self.arena.expr_kind(target) {
            ExprKind::Ident(_) | ExprKind::Member { .. } | ExprKind::Index { .. } => {}
            other => {
                return Err(ParseError::new(
                    ErrorCode::E1005,
                    format!("invalid assignment target: {}", other.describe()),
                    self.arena.expr_span(target),
                ));
            }
        }
        self.cursor.advance();
        let value = self.parse_expr()?;
        Ok(self.arena.alloc(
            ExprKind::Assign { op, target, value },
            self.span_from(start),
        ))
    }

    // ── Arrow functions ─────────────────────────────────────────────

    /// `Some(is_async)` when the tokens ahead start an arrow function.
    fn arrow_ahead(&self) -> Option<bool> {
        let pos = self.cursor.position();
        let is_async = self.at_contextual("async")
            && !self.cursor.token_at(pos + 1).newline_before
            && matches!(
                self.cursor.peek_kind(1),
                TokenKind::Ident(_) | TokenKind::LParen
            );
        let head = if is_async { pos + 1 } else { pos };
        let arrow_at = match self.cursor.token_at(head).kind {
            TokenKind::Ident(_) => head + 1,
            TokenKind::LParen => self.cursor.matching_close(head)? + 1,
            _ => return None,
        };
        (self.cursor.token_at(arrow_at).kind == TokenKind::FatArrow).then_some(is_async)
    }

    fn parse_arrow(&mut self, is_async: bool) -> Result<ExprId, ParseError> {
        let start = self.span();
        if is_async {
            self.cursor.advance();
        }
        let params = if let TokenKind::Ident(name) = self.kind() {
            let span = self.cursor.advance().span;
            let target = self.arena.alloc_binding_ident(name, span);
            self.arena.alloc_list([Param {
                target,
                default: None,
                rest: false,
                span,
            }])
        } else {
            self.parse_params()?
        };
        self.expect(TokenKind::FatArrow)?;
        let body = if self.cursor.check(TokenKind::LBrace) {
            FunctionBody::Block(self.parse_block_body()?)
        } else {
            FunctionBody::Expr(self.parse_expr()?)
        };
        let span = self.span_from(start);
        let function = self.arena.alloc_function(Function {
            kind: FunctionKind::Arrow,
            name: None,
            params,
            body,
            is_async,
            is_generator: false,
            span,
        });
        Ok(self.arena.alloc(ExprKind::Function(function), span))
    }

    // ── Operators ───────────────────────────────────────────────────

    fn parse_conditional(&mut self) -> Result<ExprId, ParseError> {
        let start = self.span();
        let cond = self.parse_binary(0)?;
        if !self.cursor.eat(TokenKind::Question) {
            return Ok(cond);
        }
        let then_expr = self.parse_expr()?;
        self.expect(TokenKind::Colon)?;
        let else_expr = self.parse_expr()?;
        Ok(self.arena.alloc(
            ExprKind::Conditional {
                cond,
                then_expr,
                else_expr,
            },
            self.span_from(start),
        ))
    }

    fn parse_binary(&mut self, min_prec: u8) -> Result<ExprId, ParseError> {
        let start = self.span();
        let mut left = self.parse_unary()?;
        while let Some(op) = binary_op(self.kind()) {
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            self.cursor.advance();
            let next = if op.is_right_assoc() { prec } else { prec + 1 };
            let right = self.parse_binary(next)?;
            left = self
                .arena
                .alloc(ExprKind::Binary { op, left, right }, self.span_from(start));
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<ExprId, ParseError> {
        let start = self.span();
        if matches!(self.kind(), TokenKind::PlusPlus | TokenKind::MinusMinus) {
            return Err(self.unsupported("update expressions", start));
        }
        let Some(op) = unary_op(self.kind()) else {
            return self.parse_postfix();
        };
        self.cursor.advance();
        let operand = self.parse_unary()?;
        Ok(self
            .arena
            .alloc(ExprKind::Unary { op, operand }, self.span_from(start)))
    }

    // ── Postfix ─────────────────────────────────────────────────────

    fn parse_postfix(&mut self) -> Result<ExprId, ParseError> {
        let start = self.span();
        let mut expr = if self.cursor.check(TokenKind::New) {
            self.parse_new()?
        } else {
            self.parse_primary()?
        };

        loop {
            let token = self.cursor.current();
            expr = match token.kind {
                TokenKind::Dot => {
                    self.cursor.advance();
                    let (property, _) = self.property_name()?;
                    self.member(expr, property, false, start)
                }
                TokenKind::QuestionDot => {
                    self.cursor.advance();
                    match self.kind() {
                        TokenKind::LParen => {
                            let args = self.parse_args()?;
                            self.call(expr, args, true, start)
                        }
                        TokenKind::LBracket => self.parse_index(expr, true, start)?,
                        _ => {
                            let (property, _) = self.property_name()?;
                            self.member(expr, property, true, start)
                        }
                    }
                }
                TokenKind::LBracket => self.parse_index(expr, false, start)?,
                TokenKind::LParen => {
                    let args = self.parse_args()?;
                    self.call(expr, args, false, start)
                }
                TokenKind::Template(_) => {
                    return Err(self.unsupported("tagged templates", token.span));
                }
                TokenKind::PlusPlus | TokenKind::MinusMinus if !token.newline_before => {
                    return Err(self.unsupported("update expressions", token.span));
                }
                _ => return Ok(expr),
            };
        }
    }

    fn member(
        &mut self,
        object: ExprId,
        property: Name,
        optional: bool,
        start: Span,
    ) -> ExprId {
        self.arena.alloc(
            ExprKind::Member {
                object,
                property,
                optional,
            },
            self.span_from(start),
        )
    }

    fn call(
        &mut self,
        callee: ExprId,
        args: ExprRange,
        optional: bool,
        start: Span,
    ) -> ExprId {
        self.arena.alloc(
            ExprKind::Call {
                callee,
                args,
                optional,
            },
            self.span_from(start),
        )
    }

    fn parse_index(
        &mut self,
        object: ExprId,
        optional: bool,
        start: Span,
    ) -> Result<ExprId, ParseError> {
        self.expect(TokenKind::LBracket)?;
        let index = self.parse_expr()?;
        self.expect(TokenKind::RBracket)?;
        Ok(self.arena.alloc(
            ExprKind::Index {
                object,
                index,
                optional,
            },
            self.span_from(start),
        ))
    }

    /// `( args )`, with spread arguments.
    fn parse_args(&mut self) -> Result<ExprRange, ParseError> {
        self.expect(TokenKind::LParen)?;
        let mut args = Vec::new();
        while !self.cursor.check(TokenKind::RParen) {
            args.push(self.parse_element()?);
            if !self.cursor.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(self.arena.alloc_list(args))
    }

    /// An argument or array element: an expression or `...expr`.
    fn parse_element(&mut self) -> Result<ExprId, ParseError> {
        let start = self.span();
        if self.cursor.eat(TokenKind::Ellipsis) {
            let operand = self.parse_expr()?;
            return Ok(self
                .arena
                .alloc(ExprKind::Spread(operand), self.span_from(start)));
        }
        self.parse_expr()
    }

    /// `new Callee(args)`. The callee is a member chain without calls.
    fn parse_new(&mut self) -> Result<ExprId, ParseError> {
        let start = self.expect(TokenKind::New)?;
        let callee_start = self.span();
        let mut callee = if self.cursor.check(TokenKind::New) {
            self.parse_new()?
        } else {
            self.parse_primary()?
        };
        loop {
            callee = match self.kind() {
                TokenKind::Dot => {
                    self.cursor.advance();
                    let (property, _) = self.property_name()?;
                    self.member(callee, property, false, callee_start)
                }
                TokenKind::LBracket => self.parse_index(callee, false, callee_start)?,
                _ => break,
            };
        }
        let args = if self.cursor.check(TokenKind::LParen) {
            self.parse_args()?
        } else {
            ExprRange::EMPTY
        };
        Ok(self
            .arena
            .alloc(ExprKind::New { callee, args }, self.span_from(start)))
    }

    // ── Primary ─────────────────────────────────────────────────────

    fn parse_primary(&mut self) -> Result<ExprId, ParseError> {
        let token = self.cursor.current();
        let span = token.span;
        let kind = match token.kind {
            TokenKind::Ident(_)
                if self.at_contextual("async")
                    && self.cursor.peek_kind(1) == TokenKind::Function
                    && !self.cursor.token_at(self.cursor.position() + 1).newline_before =>
            {
                self.cursor.advance();
                let function = self.parse_function(FunctionKind::Expression, span, true)?;
                return Ok(self
                    .arena
                    .alloc(ExprKind::Function(function), self.span_from(span)));
            }
            TokenKind::Ident(name) => ExprKind::Ident(name),
            TokenKind::Str(name) => ExprKind::Str(name),
            TokenKind::Num(bits) => ExprKind::Num(bits),
            TokenKind::BigInt(name) => ExprKind::BigInt(name),
            TokenKind::True => ExprKind::Bool(true),
            TokenKind::False => ExprKind::Bool(false),
            TokenKind::Null => ExprKind::Null,
            TokenKind::This => ExprKind::This,
            TokenKind::Template(index) => return self.parse_template(index),
            TokenKind::LParen => {
                self.cursor.advance();
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                return Ok(inner);
            }
            TokenKind::LBracket => return self.parse_array(),
            TokenKind::LBrace => return self.parse_object(),
            TokenKind::Function => {
                let function = self.parse_function(FunctionKind::Expression, span, false)?;
                return Ok(self
                    .arena
                    .alloc(ExprKind::Function(function), self.span_from(span)));
            }
            TokenKind::Import => return Err(self.unsupported("dynamic import", span)),
            found => return Err(ParseError::expected("expression", &found, span)),
        };
        self.cursor.advance();
        Ok(self.arena.alloc(kind, span))
    }

    fn parse_template(&mut self, index: u32) -> Result<ExprId, ParseError> {
        let span = self.span();
        let parts = self.cursor.template(index).cloned().ok_or_else(|| {
            ParseError::new(ErrorCode::E9001, "template literal parts missing", span)
        })?;
        self.cursor.advance();

        let quasis: Vec<ExprId> = parts
            .quasis
            .iter()
            .map(|&(text, text_span)| self.arena.alloc(ExprKind::Str(text), text_span))
            .collect();

        let mut exprs = Vec::with_capacity(parts.exprs.len());
        for expr_span in parts.exprs {
            let text = expr_span.slice(self.source).ok_or_else(|| {
                ParseError::new(ErrorCode::E9001, "template span out of range", expr_span)
            })?;
            let tokens = lex_at(text, expr_span.start, self.interner)?;
            let outer = std::mem::replace(&mut self.cursor, Cursor::new(tokens));
            let parsed = self
                .parse_expr()
                .and_then(|expr| self.expect(TokenKind::Eof).map(|_| expr));
            self.cursor = outer;
            exprs.push(parsed?);
        }

        let quasis = self.arena.alloc_list(quasis);
        let exprs = self.arena.alloc_list(exprs);
        Ok(self.arena.alloc(ExprKind::Template { quasis, exprs }, span))
    }

    fn parse_array(&mut self) -> Result<ExprId, ParseError> {
        let start = self.expect(TokenKind::LBracket)?;
        let mut items = Vec::new();
        while !self.cursor.check(TokenKind::RBracket) {
            if self.cursor.check(TokenKind::Comma) {
                return Err(self.unsupported("array holes", self.span()));
            }
            items.push(self.parse_element()?);
            if !self.cursor.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBracket)?;
        let items = self.arena.alloc_list(items);
        Ok(self.arena.alloc(ExprKind::Array(items), self.span_from(start)))
    }

    fn parse_object(&mut self) -> Result<ExprId, ParseError> {
        let start = self.expect(TokenKind::LBrace)?;
        let mut props = Vec::new();
        while !self.cursor.check(TokenKind::RBrace) {
            props.push(self.parse_prop()?);
            if !self.cursor.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBrace)?;
        let props = self.arena.alloc_list(props);
        Ok(self.arena.alloc(ExprKind::Object(props), self.span_from(start)))
    }

    fn parse_prop(&mut self) -> Result<Prop, ParseError> {
        let start = self.span();
        if self.cursor.eat(TokenKind::Ellipsis) {
            let value = self.parse_expr()?;
            return Ok(Prop {
                kind: PropKind::Spread(value),
                span: self.span_from(start),
            });
        }

        let (key, shorthand_name) = self.parse_prop_key()?;
        let kind = match self.kind() {
            TokenKind::Colon => {
                self.cursor.advance();
                let value = self.parse_expr()?;
                PropKind::Init {
                    key,
                    value,
                    shorthand: false,
                }
            }
            TokenKind::LParen => {
                let function = self.parse_method(start)?;
                let value = self
                    .arena
                    .alloc(ExprKind::Function(function), self.span_from(start));
                PropKind::Init {
                    key,
                    value,
                    shorthand: false,
                }
            }
            _ => {
                let Some(name) = shorthand_name else {
                    return Err(ParseError::expected("`:`", &self.kind(), self.span()));
                };
                let value = self.arena.alloc(ExprKind::Ident(name), start);
                PropKind::Init {
                    key,
                    value,
                    shorthand: true,
                }
            }
        };
        Ok(Prop {
            kind,
            span: self.span_from(start),
        })
    }

    /// An object key. The second value is the key's name when it could
    /// also stand alone as a shorthand property.
    pub(crate) fn parse_prop_key(
        &mut self,
    ) -> Result<(PropKey, Option<Name>), ParseError> {
        match self.kind() {
            TokenKind::Ident(name) => {
                self.cursor.advance();
                Ok((PropKey::Ident(name), Some(name)))
            }
            TokenKind::Str(name) => {
                self.cursor.advance();
                Ok((PropKey::Str(name), None))
            }
            TokenKind::Num(bits) => {
                self.cursor.advance();
                Ok((PropKey::Num(bits), None))
            }
            TokenKind::LBracket => {
                self.cursor.advance();
                let key = self.parse_expr()?;
                self.expect(TokenKind::RBracket)?;
                Ok((PropKey::Computed(key), None))
            }
            _ => {
                let (name, _) = self.property_name()?;
                Ok((PropKey::Ident(name), None))
            }
        }
    }

    // ── Functions ───────────────────────────────────────────────────

    /// `function [*] [name] (params) { body }`, starting at `function`.
    pub(crate) fn parse_function(
        &mut self,
        kind: FunctionKind,
        start: Span,
        is_async: bool,
    ) -> Result<FunctionId, ParseError> {
        self.expect(TokenKind::Function)?;
        let is_generator = self.cursor.eat(TokenKind::Star);
        let name = match self.kind() {
            TokenKind::Ident(name) => {
                self.cursor.advance();
                Some(name)
            }
            _ if kind == FunctionKind::Declaration => {
                return Err(ParseError::new(
                    ErrorCode::E1004,
                    "expected function name",
                    self.span(),
                ));
            }
            _ => None,
        };
        let params = self.parse_params()?;
        let body = self.parse_block_body()?;
        Ok(self.arena.alloc_function(Function {
            kind,
            name,
            params,
            body: FunctionBody::Block(body),
            is_async,
            is_generator,
            span: self.span_from(start),
        }))
    }

    /// Method shorthand `key(params) { body }`, from the `(`.
    fn parse_method(&mut self, start: Span) -> Result<FunctionId, ParseError> {
        let params = self.parse_params()?;
        let body = self.parse_block_body()?;
        Ok(self.arena.alloc_function(Function {
            kind: FunctionKind::Expression,
            name: None,
            params,
            body: FunctionBody::Block(body),
            is_async: false,
            is_generator: false,
            span: self.span_from(start),
        }))
    }
}
