//! Statement and block parsing.

use sandscript_lexer::token::TokenKind;
use sandscript_types::ast::*;
use sandscript_types::{ErrorCode, ScriptError};

use crate::parser::Parser;

impl<'src> Parser<'src> {
    /// Parse a single statement.
    pub(crate) fn parse_stmt(&mut self) -> Result<Stmt, ScriptError> {
        match self.peek_kind() {
            TokenKind::Import => self.parse_import(),
            TokenKind::Let => self.parse_let(),
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::For => self.parse_for(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Break => {
                let token = self.advance();
                Ok(Stmt::new(StmtKind::Break, token.span))
            }
            TokenKind::Continue => {
                let token = self.advance();
                Ok(Stmt::new(StmtKind::Continue, token.span))
            }
            // `name = expr` is a reassignment; anything else is an
            // expression statement.
            TokenKind::Identifier(_) if self.look_ahead(1) == &TokenKind::Assign => {
                self.parse_assign()
            }
            _ => {
                let expr = self.parse_expression()?;
                let span = expr.span;
                Ok(Stmt::new(StmtKind::Expr(expr), span))
            }
        }
    }

    /// `import NAME`
    fn parse_import(&mut self) -> Result<Stmt, ScriptError> {
        let import_token = self.advance();
        let module = self.parse_ident("after 'import'")?;
        let span = import_token.span.merge(module.span);
        Ok(Stmt::new(StmtKind::Import { module }, span))
    }

    /// `let NAME = expr`
    fn parse_let(&mut self) -> Result<Stmt, ScriptError> {
        let let_token = self.advance();
        let name = self.parse_ident("after 'let'")?;
        self.expect(&TokenKind::Assign, "in let binding")?;
        let value = self.parse_expression()?;
        let span = let_token.span.merge(value.span);
        Ok(Stmt::new(StmtKind::Let { name, value }, span))
    }

    /// `NAME = expr`
    fn parse_assign(&mut self) -> Result<Stmt, ScriptError> {
        let name = self.parse_ident("in assignment")?;
        self.expect(&TokenKind::Assign, "in assignment")?;
        let value = self.parse_expression()?;
        let span = name.span.merge(value.span);
        Ok(Stmt::new(StmtKind::Assign { name, value }, span))
    }

    /// `if cond { ... } [else if cond { ... }]* [else { ... }]`
    fn parse_if(&mut self) -> Result<Stmt, ScriptError> {
        let if_token = self.advance();
        let cond = self.parse_expression()?;
        let then_block = self.parse_block("after if condition")?;
        let mut span = if_token.span.merge(then_block.span);

        let else_block = if self.eat(&TokenKind::Else) {
            if self.check(&TokenKind::If) {
                // `else if` — nest the chained if as the sole statement
                // of the else block.
                let nested = self.parse_if()?;
                let nested_span = nested.span;
                span = span.merge(nested_span);
                Some(Block {
                    stmts: vec![nested],
                    span: nested_span,
                })
            } else {
                let block = self.parse_block("after 'else'")?;
                span = span.merge(block.span);
                Some(block)
            }
        } else {
            None
        };

        Ok(Stmt::new(
            StmtKind::If {
                cond,
                then_block,
                else_block,
            },
            span,
        ))
    }

    /// `while cond { ... }`
    fn parse_while(&mut self) -> Result<Stmt, ScriptError> {
        let while_token = self.advance();
        let cond = self.parse_expression()?;
        let body = self.parse_block("after while condition")?;
        let span = while_token.span.merge(body.span);
        Ok(Stmt::new(StmtKind::While { cond, body }, span))
    }

    /// `for NAME in expr { ... }`
    fn parse_for(&mut self) -> Result<Stmt, ScriptError> {
        let for_token = self.advance();
        let var = self.parse_ident("after 'for'")?;
        self.expect(&TokenKind::In, "in for loop")?;
        let iterable = self.parse_expression()?;
        let body = self.parse_block("after for iterable")?;
        let span = for_token.span.merge(body.span);
        Ok(Stmt::new(
            StmtKind::For {
                var,
                iterable,
                body,
            },
            span,
        ))
    }

    /// `return [expr]`
    fn parse_return(&mut self) -> Result<Stmt, ScriptError> {
        let return_token = self.advance();
        let value = if matches!(
            self.peek_kind(),
            TokenKind::Newline | TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Eof
        ) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        let span = value
            .as_ref()
            .map(|v| return_token.span.merge(v.span))
            .unwrap_or(return_token.span);
        Ok(Stmt::new(StmtKind::Return { value }, span))
    }

    /// `{ stmts... }` — separators between statements are newlines or
    /// semicolons; the braces may hug the same line.
    pub(crate) fn parse_block(&mut self, context: &str) -> Result<Block, ScriptError> {
        let open = self.expect(&TokenKind::LBrace, context)?;
        let mut stmts = Vec::new();
        self.skip_separators();
        while !self.check(&TokenKind::RBrace) {
            if self.at_end() {
                return Err(self.error_at_current(
                    ErrorCode::UNEXPECTED_EOF,
                    "unclosed block: expected '}'",
                ));
            }
            stmts.push(self.parse_stmt()?);
            self.expect_statement_end()?;
            self.skip_separators();
        }
        let close = self.expect(&TokenKind::RBrace, "to close block")?;
        Ok(Block {
            stmts,
            span: open.span.merge(close.span),
        })
    }

    /// Parse a plain identifier (rejecting keywords).
    pub(crate) fn parse_ident(&mut self, context: &str) -> Result<Ident, ScriptError> {
        match self.peek_kind() {
            TokenKind::Identifier(name) => {
                let name = name.clone();
                let token = self.advance();
                Ok(Ident::new(name, token.span))
            }
            other => Err(self.error_at_current(
                ErrorCode::UNEXPECTED_TOKEN,
                format!("expected a name {context}, got '{other}'"),
            )),
        }
    }
}
