//! Expression parsing with full operator precedence.
//!
//! Precedence (lowest → highest):
//! 6. `or`
//! 5. `and`
//! 4. `==`, `!=`, `<`, `>`, `<=`, `>=` (no chaining)
//! 3. `+`, `-`
//! 2. `*`, `/`, `%`
//! 1. unary `-`, `not`
//! 0. postfix: `.` (field access / method call), `(...)`, `[...]`

use sandscript_lexer::token::TokenKind;
use sandscript_types::ast::*;
use sandscript_types::{ErrorCode, ScriptError};

use crate::parser::{Parser, MAX_EXPR_DEPTH};

impl<'src> Parser<'src> {
    /// Parse an expression.
    pub(crate) fn parse_expression(&mut self) -> Result<Expr, ScriptError> {
        self.expr_depth += 1;
        if self.expr_depth > MAX_EXPR_DEPTH {
            self.expr_depth -= 1;
            return Err(self.error_at_current(
                ErrorCode::UNEXPECTED_TOKEN,
                format!("maximum expression nesting depth is {MAX_EXPR_DEPTH}"),
            ));
        }
        let result = self.parse_or();
        self.expr_depth -= 1;
        result
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Precedence Chain
    // ══════════════════════════════════════════════════════════════════════════

    /// `OrExpr = AndExpr { "or" AndExpr }`
    fn parse_or(&mut self) -> Result<Expr, ScriptError> {
        let mut left = self.parse_and()?;
        while self.eat(&TokenKind::Or) {
            let right = self.parse_and()?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    left: Box::new(left),
                    op: BinOp::Or,
                    right: Box::new(right),
                },
                span,
            );
        }
        Ok(left)
    }

    /// `AndExpr = CompExpr { "and" CompExpr }`
    fn parse_and(&mut self) -> Result<Expr, ScriptError> {
        let mut left = self.parse_comparison()?;
        while self.eat(&TokenKind::And) {
            let right = self.parse_comparison()?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    left: Box::new(left),
                    op: BinOp::And,
                    right: Box::new(right),
                },
                span,
            );
        }
        Ok(left)
    }

    /// `CompExpr = AddExpr [ CompOp AddExpr ]`
    ///
    /// Comparison operators do NOT chain: `a < b < c` is a parse error.
    fn parse_comparison(&mut self) -> Result<Expr, ScriptError> {
        let mut left = self.parse_add()?;
        if let Some(op) = self.comparison_op() {
            self.advance();
            let right = self.parse_add()?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                },
                span,
            );
            if self.comparison_op().is_some() {
                return Err(self.error_at_current(
                    ErrorCode::UNEXPECTED_TOKEN,
                    "comparison operators cannot be chained; use 'and' to combine: a < b and b < c",
                ));
            }
        }
        Ok(left)
    }

    fn comparison_op(&self) -> Option<BinOp> {
        match self.peek_kind() {
            TokenKind::EqEq => Some(BinOp::Eq),
            TokenKind::BangEq => Some(BinOp::NotEq),
            TokenKind::Less => Some(BinOp::Less),
            TokenKind::Greater => Some(BinOp::Greater),
            TokenKind::LessEq => Some(BinOp::LessEq),
            TokenKind::GreaterEq => Some(BinOp::GreaterEq),
            _ => None,
        }
    }

    /// `AddExpr = MulExpr { ("+" | "-") MulExpr }`
    fn parse_add(&mut self) -> Result<Expr, ScriptError> {
        let mut left = self.parse_mul()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_mul()?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                },
                span,
            );
        }
        Ok(left)
    }

    /// `MulExpr = UnaryExpr { ("*" | "/" | "%") UnaryExpr }`
    fn parse_mul(&mut self) -> Result<Expr, ScriptError> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                TokenKind::Percent => BinOp::Mod,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                },
                span,
            );
        }
        Ok(left)
    }

    /// `UnaryExpr = ("-" | "not") UnaryExpr | PostfixExpr`
    fn parse_unary(&mut self) -> Result<Expr, ScriptError> {
        let op = match self.peek_kind() {
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Not => Some(UnaryOp::Not),
            _ => None,
        };
        if let Some(op) = op {
            let op_token = self.advance();
            let operand = self.parse_unary()?;
            let span = op_token.span.merge(operand.span);
            return Ok(Expr::new(
                ExprKind::Unary {
                    op,
                    operand: Box::new(operand),
                },
                span,
            ));
        }
        self.parse_postfix()
    }

    /// Postfix chain: field access, method calls, indexing.
    fn parse_postfix(&mut self) -> Result<Expr, ScriptError> {
        let mut expr = self.parse_primary()?;
        loop {
            if self.eat(&TokenKind::Dot) {
                let name = self.parse_ident("after '.'")?;
                if self.check(&TokenKind::LParen) {
                    let (args, close_span) = self.parse_args()?;
                    let span = expr.span.merge(close_span);
                    expr = Expr::new(
                        ExprKind::MethodCall {
                            object: Box::new(expr),
                            method: name,
                            args,
                        },
                        span,
                    );
                } else {
                    let span = expr.span.merge(name.span);
                    expr = Expr::new(
                        ExprKind::FieldAccess {
                            object: Box::new(expr),
                            field: name,
                        },
                        span,
                    );
                }
            } else if self.eat(&TokenKind::LBracket) {
                let index = self.parse_expression()?;
                let close = self.expect(&TokenKind::RBracket, "to close index")?;
                let span = expr.span.merge(close.span);
                expr = Expr::new(
                    ExprKind::Index {
                        object: Box::new(expr),
                        index: Box::new(index),
                    },
                    span,
                );
            } else {
                break;
            }
        }
        Ok(expr)
    }

    /// Primary expressions: literals, identifiers, calls, grouping,
    /// list and record literals.
    fn parse_primary(&mut self) -> Result<Expr, ScriptError> {
        let token = self.peek().clone();
        match &token.kind {
            TokenKind::NumberLit(n) => {
                self.advance();
                Ok(Expr::new(ExprKind::NumberLit(*n), token.span))
            }
            TokenKind::StringLit(s) => {
                self.advance();
                Ok(Expr::new(ExprKind::StringLit(s.clone()), token.span))
            }
            TokenKind::True => {
                self.advance();
                Ok(Expr::new(ExprKind::BoolLit(true), token.span))
            }
            TokenKind::False => {
                self.advance();
                Ok(Expr::new(ExprKind::BoolLit(false), token.span))
            }
            TokenKind::Nil => {
                self.advance();
                Ok(Expr::new(ExprKind::NilLit, token.span))
            }
            TokenKind::Identifier(name) => {
                let name = name.clone();
                self.advance();
                if self.check(&TokenKind::LParen) {
                    let callee = Ident::new(name, token.span);
                    let (args, close_span) = self.parse_args()?;
                    let span = token.span.merge(close_span);
                    Ok(Expr::new(ExprKind::Call { callee, args }, span))
                } else {
                    Ok(Expr::new(ExprKind::Identifier(name), token.span))
                }
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect(&TokenKind::RParen, "to close grouping")?;
                Ok(inner)
            }
            TokenKind::LBracket => self.parse_list_literal(),
            TokenKind::LBrace => self.parse_record_literal(),
            TokenKind::Eof => Err(self.error_at_current(
                ErrorCode::UNEXPECTED_EOF,
                "expected an expression, got end of input",
            )),
            other => Err(self.error_at_current(
                ErrorCode::UNEXPECTED_TOKEN,
                format!("expected an expression, got '{other}'"),
            )),
        }
    }

    /// `[a, b, c]` — trailing comma allowed, newlines allowed inside.
    fn parse_list_literal(&mut self) -> Result<Expr, ScriptError> {
        let open = self.advance();
        let mut elems = Vec::new();
        self.skip_separators();
        while !self.check(&TokenKind::RBracket) {
            elems.push(self.parse_expression()?);
            self.skip_separators();
            if !self.eat(&TokenKind::Comma) {
                break;
            }
            self.skip_separators();
        }
        let close = self.expect(&TokenKind::RBracket, "to close list")?;
        Ok(Expr::new(
            ExprKind::ListLit(elems),
            open.span.merge(close.span),
        ))
    }

    /// `{name: expr, ...}` — trailing comma allowed, newlines allowed inside.
    fn parse_record_literal(&mut self) -> Result<Expr, ScriptError> {
        let open = self.advance();
        let mut fields = Vec::new();
        self.skip_separators();
        while !self.check(&TokenKind::RBrace) {
            let name = self.parse_ident("as record field")?;
            self.expect(&TokenKind::Colon, "after record field name")?;
            self.skip_separators();
            let value = self.parse_expression()?;
            fields.push((name, value));
            self.skip_separators();
            if !self.eat(&TokenKind::Comma) {
                break;
            }
            self.skip_separators();
        }
        let close = self.expect(&TokenKind::RBrace, "to close record")?;
        Ok(Expr::new(
            ExprKind::RecordLit(fields),
            open.span.merge(close.span),
        ))
    }

    /// `(arg, name=arg, ...)` — returns the args and the closing paren's
    /// span. Positional arguments may not follow named ones.
    fn parse_args(&mut self) -> Result<(Vec<Arg>, sandscript_types::Span), ScriptError> {
        self.expect(&TokenKind::LParen, "to open arguments")?;
        let mut args = Vec::new();
        let mut saw_named = false;
        self.skip_separators();
        while !self.check(&TokenKind::RParen) {
            let arg = self.parse_arg()?;
            if arg.name.is_some() {
                saw_named = true;
            } else if saw_named {
                return Err(self.error_at(
                    ErrorCode::UNEXPECTED_TOKEN,
                    "positional arguments may not follow named arguments",
                    arg.span,
                ));
            }
            args.push(arg);
            self.skip_separators();
            if !self.eat(&TokenKind::Comma) {
                break;
            }
            self.skip_separators();
        }
        let close = self.expect(&TokenKind::RParen, "to close arguments")?;
        Ok((args, close.span))
    }

    fn parse_arg(&mut self) -> Result<Arg, ScriptError> {
        // `name=expr` — a named argument
        if matches!(self.peek_kind(), TokenKind::Identifier(_))
            && self.look_ahead(1) == &TokenKind::Assign
        {
            let name = self.parse_ident("as argument name")?;
            self.advance(); // consume '='
            let value = self.parse_expression()?;
            let span = name.span.merge(value.span);
            return Ok(Arg {
                name: Some(name),
                value,
                span,
            });
        }
        let value = self.parse_expression()?;
        let span = value.span;
        Ok(Arg {
            name: None,
            value,
            span,
        })
    }
}
