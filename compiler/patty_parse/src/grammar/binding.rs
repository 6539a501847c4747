//! Binding patterns and parameter lists.

use patty_diagnostic::ErrorCode;
use patty_ir::{
    BindingElem, BindingElemRange, BindingId, BindingKind, BindingPattern, BindingProp,
    BindingPropRange, ExprId, Param, ParamRange, PropKey,
};

use crate::token::TokenKind;
use crate::{ParseError, Parser};

impl Parser<'_> {
    /// An identifier, array pattern or object pattern.
    pub(crate) fn parse_binding_target(&mut self) -> Result<BindingId, ParseError> {
        let start = self.span();
        let kind = match self.kind() {
            TokenKind::Ident(name) => {
                self.cursor.advance();
                return Ok(self.arena.alloc_binding_ident(name, start));
            }
            TokenKind::LBracket => BindingKind::Array(self.parse_array_pattern()?),
            TokenKind::LBrace => BindingKind::Object(self.parse_object_pattern()?),
            found => return Err(ParseError::expected("binding pattern", &found, start)),
        };
        Ok(self.arena.alloc_binding(BindingPattern {
            kind,
            span: self.span_from(start),
        }))
    }

    fn parse_default(&mut self) -> Result<Option<ExprId>, ParseError> {
        if self.cursor.eat(TokenKind::Eq) {
            Ok(Some(self.parse_expr()?))
        } else {
            Ok(None)
        }
    }

    fn parse_array_pattern(&mut self) -> Result<BindingElemRange, ParseError> {
        self.expect(TokenKind::LBracket)?;
        let mut elems = Vec::new();
        while !self.cursor.check(TokenKind::RBracket) {
            if self.cursor.eat(TokenKind::Comma) {
                elems.push(BindingElem {
                    target: None,
                    default: None,
                    rest: false,
                });
                continue;
            }
            let rest = self.cursor.eat(TokenKind::Ellipsis);
            let target = self.parse_binding_target()?;
            let default = if rest { None } else { self.parse_default()? };
            elems.push(BindingElem {
                target: Some(target),
                default,
                rest,
            });
            if rest || !self.cursor.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBracket)?;
        Ok(self.arena.alloc_list(elems))
    }

    fn parse_object_pattern(&mut self) -> Result<BindingPropRange, ParseError> {
        self.expect(TokenKind::LBrace)?;
        let mut props = Vec::new();
        while !self.cursor.check(TokenKind::RBrace) {
            if self.cursor.eat(TokenKind::Ellipsis) {
                let (name, span) = self.expect_ident()?;
                let value = self.arena.alloc_binding_ident(name, span);
                props.push(BindingProp {
                    key: PropKey::Ident(name),
                    value,
                    default: None,
                    shorthand: true,
                    rest: true,
                });
                break;
            }

            let key_span = self.span();
            let (key, shorthand_name) = self.parse_prop_key()?;
            let (value, shorthand) = if self.cursor.eat(TokenKind::Colon) {
                (self.parse_binding_target()?, false)
            } else if let Some(name) = shorthand_name {
                (self.arena.alloc_binding_ident(name, key_span), true)
            } else {
                return Err(ParseError::expected("`:`", &self.kind(), self.span()));
            };
            let default = self.parse_default()?;
            props.push(BindingProp {
                key,
                value,
                default,
                shorthand,
                rest: false,
            });
            if !self.cursor.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBrace)?;
        Ok(self.arena.alloc_list(props))
    }

    /// `( params )`. A rest parameter must be last and has no default.
    pub(crate) fn parse_params(&mut self) -> Result<ParamRange, ParseError> {
        self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        while !self.cursor.check(TokenKind::RParen) {
            let start = self.span();
            let rest = self.cursor.eat(TokenKind::Ellipsis);
            let target = self.parse_binding_target()?;
            let default = self.parse_default()?;
            if rest && (default.is_some() || !self.cursor.check(TokenKind::RParen)) {
                return Err(ParseError::new(
                    ErrorCode::E1001,
                    "rest parameter must be last and cannot have a default",
                    self.span_from(start),
                ));
            }
            params.push(Param {
                target,
                default,
                rest,
                span: self.span_from(start),
            });
            if !self.cursor.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(self.arena.alloc_list(params))
    }
}
