//! Core Sandscript lexer — converts source text to a token stream.
//!
//! Untrusted scripts are rejected on the first malformed lexeme: the
//! lexer is fail-fast, since a script that cannot be tokenised cleanly
//! will never be executed anyway. Single-line comments (`#`) are
//! stripped. Newlines are emitted as tokens; the parser treats them as
//! statement separators.

use sandscript_types::{ErrorCode, ScriptError, SourceFile, Span};

use crate::token::{keyword_kind, Token, TokenKind};

/// The Sandscript lexer.
pub struct Lexer<'src> {
    /// The full source text as bytes.
    source: &'src [u8],
    /// Source file for error context.
    source_file: &'src SourceFile,
    /// Current byte offset into `source`.
    pos: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based).
    col: u32,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source file.
    pub fn new(source_file: &'src SourceFile) -> Self {
        Self {
            source: source_file.source.as_bytes(),
            source_file,
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    /// Lex the entire source into a token stream ending with `Eof`.
    ///
    /// Returns the first malformed lexeme as a [`ScriptError`] with a
    /// syntax error code.
    pub fn lex(mut self) -> Result<Vec<Token>, ScriptError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.scan_token()?;
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    // ─────────────────────────────────────────────────────────────
    // Character-level helpers
    // ─────────────────────────────────────────────────────────────

    fn peek(&self) -> Option<u8> {
        self.source.get(self.pos).copied()
    }

    fn peek_next(&self) -> Option<u8> {
        self.source.get(self.pos + 1).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let ch = self.source.get(self.pos).copied()?;
        self.pos += 1;
        if ch == b'\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn span_from(&self, start_line: u32, start_col: u32) -> Span {
        Span::new(
            start_line,
            start_col,
            self.line,
            self.col.saturating_sub(1).max(1),
        )
    }

    fn error(&self, code: ErrorCode, message: impl Into<String>, span: Span) -> ScriptError {
        let source_line = self.source_file.line(span.line).unwrap_or("").to_string();
        ScriptError::new(&self.source_file.name, code, message, span, source_line)
    }

    // ─────────────────────────────────────────────────────────────
    // Scanning
    // ─────────────────────────────────────────────────────────────

    fn scan_token(&mut self) -> Result<Token, ScriptError> {
        self.skip_spaces_and_comments();

        let start_line = self.line;
        let start_col = self.col;

        let Some(ch) = self.advance() else {
            return Ok(Token::new(TokenKind::Eof, Span::point(self.line, self.col)));
        };

        let kind = match ch {
            b'\n' => TokenKind::Newline,
            b'\r' => {
                // CRLF — consume the \n too if present
                if self.peek() == Some(b'\n') {
                    self.advance();
                }
                TokenKind::Newline
            }
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'[' => TokenKind::LBracket,
            b']' => TokenKind::RBracket,
            b'{' => TokenKind::LBrace,
            b'}' => TokenKind::RBrace,
            b'.' => TokenKind::Dot,
            b',' => TokenKind::Comma,
            b':' => TokenKind::Colon,
            b';' => TokenKind::Semicolon,
            b'+' => TokenKind::Plus,
            b'-' => TokenKind::Minus,
            b'*' => TokenKind::Star,
            b'/' => TokenKind::Slash,
            b'%' => TokenKind::Percent,
            b'=' => {
                if self.peek() == Some(b'=') {
                    self.advance();
                    TokenKind::EqEq
                } else {
                    TokenKind::Assign
                }
            }
            b'!' => {
                if self.peek() == Some(b'=') {
                    self.advance();
                    TokenKind::BangEq
                } else {
                    let span = self.span_from(start_line, start_col);
                    return Err(self.error(
                        ErrorCode::UNEXPECTED_CHAR,
                        "unexpected character '!'; use 'not' for negation",
                        span,
                    ));
                }
            }
            b'<' => {
                if self.peek() == Some(b'=') {
                    self.advance();
                    TokenKind::LessEq
                } else {
                    TokenKind::Less
                }
            }
            b'>' => {
                if self.peek() == Some(b'=') {
                    self.advance();
                    TokenKind::GreaterEq
                } else {
                    TokenKind::Greater
                }
            }
            b'"' => return self.scan_string(start_line, start_col),
            b'0'..=b'9' => return self.scan_number(ch, start_line, start_col),
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => return Ok(self.scan_word(ch, start_line, start_col)),
            other => {
                let span = self.span_from(start_line, start_col);
                return Err(self.error(
                    ErrorCode::UNEXPECTED_CHAR,
                    format!("unexpected character '{}'", other as char),
                    span,
                ));
            }
        };

        Ok(Token::new(kind, self.span_from(start_line, start_col)))
    }

    /// Skip spaces, tabs, and `#` comments (to end of line).
    fn skip_spaces_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(b' ') | Some(b'\t') => {
                    self.advance();
                }
                Some(b'#') => {
                    while let Some(ch) = self.peek() {
                        if ch == b'\n' || ch == b'\r' {
                            break;
                        }
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn scan_string(&mut self, start_line: u32, start_col: u32) -> Result<Token, ScriptError> {
        // Accumulate raw bytes; the source is valid UTF-8 and all escape
        // replacements are ASCII, so the final conversion cannot fail.
        let mut bytes = Vec::new();
        loop {
            match self.advance() {
                None | Some(b'\n') => {
                    let span = self.span_from(start_line, start_col);
                    return Err(self.error(
                        ErrorCode::UNCLOSED_STRING,
                        "unterminated string literal",
                        span,
                    ));
                }
                Some(b'"') => break,
                Some(b'\\') => {
                    let escape_line = self.line;
                    let escape_col = self.col.saturating_sub(1);
                    match self.advance() {
                        Some(b'n') => bytes.push(b'\n'),
                        Some(b't') => bytes.push(b'\t'),
                        Some(b'"') => bytes.push(b'"'),
                        Some(b'\\') => bytes.push(b'\\'),
                        other => {
                            let span = Span::point(escape_line, escape_col);
                            let shown = other.map(|c| (c as char).to_string()).unwrap_or_default();
                            return Err(self.error(
                                ErrorCode::INVALID_ESCAPE,
                                format!("invalid escape sequence '\\{shown}'"),
                                span,
                            ));
                        }
                    }
                }
                Some(byte) => bytes.push(byte),
            }
        }
        let value = String::from_utf8_lossy(&bytes).into_owned();
        Ok(Token::new(
            TokenKind::StringLit(value),
            self.span_from(start_line, start_col),
        ))
    }

    fn scan_number(
        &mut self,
        first: u8,
        start_line: u32,
        start_col: u32,
    ) -> Result<Token, ScriptError> {
        let mut text = String::new();
        text.push(first as char);
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                text.push(ch as char);
                self.advance();
            } else {
                break;
            }
        }
        // Fractional part — only if a digit follows the dot, so `1.upper()`
        // still lexes as a method call on `1`.
        if self.peek() == Some(b'.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            text.push('.');
            self.advance();
            while let Some(ch) = self.peek() {
                if ch.is_ascii_digit() {
                    text.push(ch as char);
                    self.advance();
                } else {
                    break;
                }
            }
        }
        let span = self.span_from(start_line, start_col);
        let value: f64 = text.parse().map_err(|_| {
            self.error(
                ErrorCode::INVALID_NUMBER,
                format!("invalid number literal '{text}'"),
                span,
            )
        })?;
        Ok(Token::new(TokenKind::NumberLit(value), span))
    }

    fn scan_word(&mut self, first: u8, start_line: u32, start_col: u32) -> Token {
        let mut word = String::new();
        word.push(first as char);
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == b'_' {
                word.push(ch as char);
                self.advance();
            } else {
                break;
            }
        }
        let span = self.span_from(start_line, start_col);
        let kind = keyword_kind(&word).unwrap_or(TokenKind::Identifier(word));
        Token::new(kind, span)
    }
}
