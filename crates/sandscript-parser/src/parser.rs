//! Core parser infrastructure: token cursor, error construction, helpers.

use sandscript_lexer::token::{Token, TokenKind};
use sandscript_types::ast::Program;
use sandscript_types::{ErrorCode, ScriptError, SourceFile, Span};

/// Maximum expression nesting depth. Deeper scripts are rejected rather
/// than risking parser stack exhaustion on hostile input.
pub(crate) const MAX_EXPR_DEPTH: u32 = 32;

/// The Sandscript parser.
///
/// Consumes a token stream produced by the lexer and builds an AST.
/// Fail-fast: the first syntax error aborts the parse, since an
/// unparseable script is rejected outright.
pub struct Parser<'src> {
    /// The token stream.
    tokens: Vec<Token>,
    /// Current index into `tokens`.
    pos: usize,
    /// Source file for error context.
    source_file: &'src SourceFile,
    /// Current expression nesting depth.
    pub(crate) expr_depth: u32,
}

impl<'src> Parser<'src> {
    /// Create a new parser from a token stream and source file.
    pub fn new(tokens: Vec<Token>, source_file: &'src SourceFile) -> Self {
        Self {
            tokens,
            pos: 0,
            source_file,
            expr_depth: 0,
        }
    }

    /// Parse the whole token stream into a [`Program`].
    pub fn parse(mut self) -> Result<Program, ScriptError> {
        let mut stmts = Vec::new();
        self.skip_separators();
        let start = self.current_span();
        while !self.at_end() {
            stmts.push(self.parse_stmt()?);
            self.expect_statement_end()?;
        }
        let mut span = start;
        for stmt in &stmts {
            span = span.merge(stmt.span);
        }
        Ok(Program { stmts, span })
    }

    // ── Token Cursor ──────────────────────────────────────────────────────────

    /// Returns the current token without advancing.
    pub(crate) fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or_else(|| {
            self.tokens
                .last()
                .expect("token stream should end with Eof")
        })
    }

    /// Returns the kind of the current token.
    pub(crate) fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    /// Look ahead by `n` tokens from the current position.
    pub(crate) fn look_ahead(&self, n: usize) -> &TokenKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| &t.kind)
            .unwrap_or(&TokenKind::Eof)
    }

    /// Advance the cursor by one and return the consumed token.
    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    /// Returns the span of the current token.
    pub(crate) fn current_span(&self) -> Span {
        self.peek().span
    }

    /// Returns `true` if the current token is `Eof`.
    pub(crate) fn at_end(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    /// Check if the current token matches the given kind exactly.
    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        self.peek_kind() == kind
    }

    /// If the current token matches, advance and return `true`.
    pub(crate) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume the expected token or fail with an UNEXPECTED_TOKEN error.
    pub(crate) fn expect(&mut self, kind: &TokenKind, context: &str) -> Result<Token, ScriptError> {
        if self.check(kind) {
            Ok(self.advance())
        } else if self.at_end() {
            Err(self.error_at_current(
                ErrorCode::UNEXPECTED_EOF,
                format!("expected '{kind}' {context}, got end of input"),
            ))
        } else {
            Err(self.error_at_current(
                ErrorCode::UNEXPECTED_TOKEN,
                format!("expected '{kind}' {context}, got '{}'", self.peek_kind()),
            ))
        }
    }

    // ── Separators ────────────────────────────────────────────────────────────

    /// Skip all consecutive newline and semicolon tokens.
    pub(crate) fn skip_separators(&mut self) {
        while matches!(self.peek_kind(), TokenKind::Newline | TokenKind::Semicolon) {
            self.advance();
        }
    }

    /// Expect a statement terminator: newline, semicolon, `}` (left for the
    /// block parser to consume), or end of input.
    pub(crate) fn expect_statement_end(&mut self) -> Result<(), ScriptError> {
        if self.at_end() || self.check(&TokenKind::RBrace) {
            return Ok(());
        }
        if matches!(self.peek_kind(), TokenKind::Newline | TokenKind::Semicolon) {
            self.skip_separators();
            return Ok(());
        }
        Err(self.error_at_current(
            ErrorCode::UNEXPECTED_TOKEN,
            format!("expected end of statement, got '{}'", self.peek_kind()),
        ))
    }

    // ── Errors ────────────────────────────────────────────────────────────────

    /// Build an error pointing at the current token.
    pub(crate) fn error_at_current(
        &self,
        code: ErrorCode,
        message: impl Into<String>,
    ) -> ScriptError {
        self.error_at(code, message, self.current_span())
    }

    /// Build an error at a given span.
    pub(crate) fn error_at(
        &self,
        code: ErrorCode,
        message: impl Into<String>,
        span: Span,
    ) -> ScriptError {
        let source_line = self.source_file.line(span.line).unwrap_or("").to_string();
        ScriptError::new(&self.source_file.name, code, message, span, source_line)
    }
}
