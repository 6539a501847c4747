//! Statement productions.

use patty_diagnostic::ErrorCode;
use patty_ir::{
    Declarator, FunctionKind, ImportKind, ImportSpecifier, Program, StmtId, StmtKind, StmtRange,
    VarKind,
};

use crate::token::TokenKind;
use crate::{ParseError, Parser};

impl Parser<'_> {
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut body = Vec::new();
        while !self.cursor.at_eof() {
            body.push(self.parse_statement()?);
        }
        Ok(Program {
            body: self.arena.alloc_list(body),
        })
    }

    /// `{ statements }`, returning the statement list.
    pub(crate) fn parse_block_body(&mut self) -> Result<StmtRange, ParseError> {
        self.expect(TokenKind::LBrace)?;
        let mut body = Vec::new();
        while !self.cursor.check(TokenKind::RBrace) {
            if self.cursor.at_eof() {
                return Err(ParseError::expected("`}`", &TokenKind::Eof, self.span()));
            }
            body.push(self.parse_statement()?);
        }
        self.expect(TokenKind::RBrace)?;
        Ok(self.arena.alloc_list(body))
    }

    pub fn parse_statement(&mut self) -> Result<StmtId, ParseError> {
        let start = self.span();
        let kind = match self.kind() {
            TokenKind::Let => self.parse_var_decl(VarKind::Let)?,
            TokenKind::Const => self.parse_var_decl(VarKind::Const)?,
            TokenKind::Var => self.parse_var_decl(VarKind::Var)?,
            TokenKind::Function => {
                StmtKind::FunctionDecl(self.parse_function(FunctionKind::Declaration, start, false)?)
            }
            TokenKind::Ident(_)
                if self.at_contextual("async")
                    && self.cursor.peek_kind(1) == TokenKind::Function
                    && !self.cursor.token_at(self.cursor.position() + 1).newline_before =>
            {
                self.cursor.advance();
                StmtKind::FunctionDecl(self.parse_function(FunctionKind::Declaration, start, true)?)
            }
            TokenKind::Ident(label) if self.cursor.peek_kind(1) == TokenKind::Colon => {
                self.cursor.advance();
                self.cursor.advance();
                let body = self.parse_statement()?;
                StmtKind::Labeled { label, body }
            }
            TokenKind::Return => {
                self.cursor.advance();
                let token = self.cursor.current();
                let value = match token.kind {
                    TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Eof => None,
                    _ if token.newline_before => None,
                    _ => Some(self.parse_expr()?),
                };
                self.end_statement()?;
                StmtKind::Return(value)
            }
            TokenKind::If => self.parse_if()?,
            TokenKind::LBrace => StmtKind::Block(self.parse_block_body()?),
            TokenKind::Break | TokenKind::Continue => self.parse_jump()?,
            TokenKind::Throw => {
                self.cursor.advance();
                if self.cursor.current().newline_before {
                    return Err(ParseError::new(
                        ErrorCode::E1001,
                        "illegal newline after `throw`",
                        self.span(),
                    ));
                }
                let value = self.parse_expr()?;
                self.end_statement()?;
                StmtKind::Throw(value)
            }
            TokenKind::Try => self.parse_try()?,
            TokenKind::While => {
                self.cursor.advance();
                self.expect(TokenKind::LParen)?;
                let cond = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                let body = self.parse_statement()?;
                StmtKind::While { cond, body }
            }
            TokenKind::Import if self.cursor.peek_kind(1) != TokenKind::LParen => {
                self.parse_import()?
            }
            TokenKind::Semicolon => {
                self.cursor.advance();
                StmtKind::Empty
            }
            _ => {
                let expr = self.parse_expr()?;
                self.end_statement()?;
                StmtKind::Expr(expr)
            }
        };
        Ok(self.arena.alloc_stmt_kind(kind, self.span_from(start)))
    }

    fn parse_var_decl(&mut self, kind: VarKind) -> Result<StmtKind, ParseError> {
        self.cursor.advance();
        let mut declarators = Vec::new();
        loop {
            let start = self.span();
            let target = self.parse_binding_target()?;
            let init = if self.cursor.eat(TokenKind::Eq) {
                Some(self.parse_expr()?)
            } else {
                None
            };
            if init.is_none() && kind == VarKind::Const {
                return Err(ParseError::new(
                    ErrorCode::E1001,
                    "missing initializer in `const` declaration",
                    self.span_from(start),
                ));
            }
            declarators.push(Declarator {
                target,
                init,
                span: self.span_from(start),
            });
            if !self.cursor.eat(TokenKind::Comma) {
                break;
            }
        }
        self.end_statement()?;
        Ok(StmtKind::VarDecl {
            kind,
            declarators: self.arena.alloc_list(declarators),
        })
    }

    fn parse_if(&mut self) -> Result<StmtKind, ParseError> {
        self.expect(TokenKind::If)?;
        self.expect(TokenKind::LParen)?;
        let cond = self.parse_expr()?;
        self.expect(TokenKind::RParen)?;
        let then_branch = self.parse_statement()?;
        let else_branch = if self.cursor.eat(TokenKind::Else) {
            Some(self.parse_statement()?)
        } else {
            None
        };
        Ok(StmtKind::If {
            cond,
            then_branch,
            else_branch,
        })
    }

    fn parse_jump(&mut self) -> Result<StmtKind, ParseError> {
        let is_break = self.cursor.advance().kind == TokenKind::Break;
        let token = self.cursor.current();
        let label = match token.kind {
            TokenKind::Ident(name) if !token.newline_before => {
                self.cursor.advance();
                Some(name)
            }
            _ => None,
        };
        self.end_statement()?;
        Ok(if is_break {
            StmtKind::Break(label)
        } else {
            StmtKind::Continue(label)
        })
    }

    fn parse_try(&mut self) -> Result<StmtKind, ParseError> {
        let start = self.expect(TokenKind::Try)?;
        let block = self.parse_block_body()?;
        let mut param = None;
        let mut handler = None;
        if self.cursor.eat(TokenKind::Catch) {
            if self.cursor.eat(TokenKind::LParen) {
                param = Some(self.parse_binding_target()?);
                self.expect(TokenKind::RParen)?;
            }
            handler = Some(self.parse_block_body()?);
        }
        let finalizer = if self.cursor.eat(TokenKind::Finally) {
            Some(self.parse_block_body()?)
        } else {
            None
        };
        if handler.is_none() && finalizer.is_none() {
            return Err(ParseError::new(
                ErrorCode::E1001,
                "`try` without `catch` or `finally`",
                self.span_from(start),
            ));
        }
        Ok(StmtKind::Try {
            block,
            param,
            handler,
            finalizer,
        })
    }

    /// `import` declarations: side-effect, default, namespace and named
    /// forms, optionally combined as `default, { .. }` or `default, * as ns`.
    fn parse_import(&mut self) -> Result<StmtKind, ParseError> {
        self.expect(TokenKind::Import)?;
        let mut specifiers = Vec::new();

        if let TokenKind::Str(source) = self.kind() {
            self.cursor.advance();
            self.end_statement()?;
            return Ok(StmtKind::Import {
                specifiers: self.arena.alloc_list(specifiers),
                source,
            });
        }

        if let TokenKind::Ident(local) = self.kind() {
            let span = self.cursor.advance().span;
            specifiers.push(ImportSpecifier {
                kind: ImportKind::Default,
                imported: self.interner.intern("default"),
                local,
                span,
            });
            if !self.cursor.eat(TokenKind::Comma) {
                return self.finish_import(specifiers);
            }
        }

        match self.kind() {
            TokenKind::Star => {
                let start = self.cursor.advance().span;
                self.expect_contextual("as")?;
                let (local, _) = self.expect_ident()?;
                specifiers.push(ImportSpecifier {
                    kind: ImportKind::Namespace,
                    imported: self.interner.intern("*"),
                    local,
                    span: self.span_from(start),
                });
            }
            TokenKind::LBrace => {
                self.cursor.advance();
                while !self.cursor.check(TokenKind::RBrace) {
                    let start = self.span();
                    let (imported, _) = match self.kind() {
                        TokenKind::Str(name) => (name, self.cursor.advance().span),
                        _ => self.property_name()?,
                    };
                    let local = if self.at_contextual("as") {
                        self.cursor.advance();
                        self.expect_ident()?.0
                    } else {
                        imported
                    };
                    specifiers.push(ImportSpecifier {
                        kind: ImportKind::Named,
                        imported,
                        local,
                        span: self.span_from(start),
                    });
                    if !self.cursor.eat(TokenKind::Comma) {
                        break;
                    }
                }
                self.expect(TokenKind::RBrace)?;
            }
            found => {
                return Err(ParseError::expected("import specifier", &found, self.span()));
            }
        }
        self.finish_import(specifiers)
    }

    fn finish_import(&mut self, specifiers: Vec<ImportSpecifier>) -> Result<StmtKind, ParseError> {
        self.expect_contextual("from")?;
        let source = match self.kind() {
            TokenKind::Str(name) => {
                self.cursor.advance();
                name
            }
            found => return Err(ParseError::expected("module specifier", &found, self.span())),
        };
        self.end_statement()?;
        Ok(StmtKind::Import {
            specifiers: self.arena.alloc_list(specifiers),
            source,
        })
    }

    fn expect_contextual(&mut self, word: &str) -> Result<(), ParseError> {
        if self.at_contextual(word) {
            self.cursor.advance();
            Ok(())
        } else {
            Err(ParseError::expected(
                &format!("`{word}`"),
                &self.kind(),
                self.span(),
            ))
        }
    }
}
