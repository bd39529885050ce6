//! Integration tests for the Sandscript lexer.

use sandscript_lexer::{Lexer, TokenKind};
use sandscript_types::{ErrorCode, SourceFile};

fn lex(source: &str) -> Vec<TokenKind> {
    let sf = SourceFile::new("script", source);
    Lexer::new(&sf)
        .lex()
        .expect("lexing should succeed")
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

fn lex_err(source: &str) -> sandscript_types::ScriptError {
    let sf = SourceFile::new("script", source);
    Lexer::new(&sf).lex().expect_err("lexing should fail")
}

// ══════════════════════════════════════════════════════════════════════════════
// Basics
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn empty_source_is_just_eof() {
    assert_eq!(lex(""), vec![TokenKind::Eof]);
}

#[test]
fn keywords_are_recognised() {
    let kinds = lex("import let if else while for in return break continue");
    assert_eq!(
        kinds,
        vec![
            TokenKind::Import,
            TokenKind::Let,
            TokenKind::If,
            TokenKind::Else,
            TokenKind::While,
            TokenKind::For,
            TokenKind::In,
            TokenKind::Return,
            TokenKind::Break,
            TokenKind::Continue,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn keywords_are_case_sensitive() {
    let kinds = lex("If WHILE Let");
    assert_eq!(kinds[0], TokenKind::Identifier("If".into()));
    assert_eq!(kinds[1], TokenKind::Identifier("WHILE".into()));
    assert_eq!(kinds[2], TokenKind::Identifier("Let".into()));
}

#[test]
fn identifiers_with_underscores() {
    let kinds = lex("total_lines _hidden x2");
    assert_eq!(kinds[0], TokenKind::Identifier("total_lines".into()));
    assert_eq!(kinds[1], TokenKind::Identifier("_hidden".into()));
    assert_eq!(kinds[2], TokenKind::Identifier("x2".into()));
}

// ══════════════════════════════════════════════════════════════════════════════
// Literals
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn integer_and_decimal_numbers() {
    let kinds = lex("42 3.14 0 0.5");
    assert_eq!(kinds[0], TokenKind::NumberLit(42.0));
    assert_eq!(kinds[1], TokenKind::NumberLit(3.14));
    assert_eq!(kinds[2], TokenKind::NumberLit(0.0));
    assert_eq!(kinds[3], TokenKind::NumberLit(0.5));
}

#[test]
fn number_dot_without_digit_is_method_call_shape() {
    let kinds = lex("3.abs()");
    assert_eq!(kinds[0], TokenKind::NumberLit(3.0));
    assert_eq!(kinds[1], TokenKind::Dot);
    assert_eq!(kinds[2], TokenKind::Identifier("abs".into()));
}

#[test]
fn string_literal() {
    let kinds = lex("\"hello world\"");
    assert_eq!(kinds[0], TokenKind::StringLit("hello world".into()));
}

#[test]
fn string_escapes() {
    let kinds = lex(r#""a\nb\tc\"d\\e""#);
    assert_eq!(kinds[0], TokenKind::StringLit("a\nb\tc\"d\\e".into()));
}

#[test]
fn unterminated_string_is_rejected() {
    let err = lex_err("\"no end");
    assert_eq!(err.code, ErrorCode::UNCLOSED_STRING);
}

#[test]
fn string_may_not_span_lines() {
    let err = lex_err("\"line one\nrest\"");
    assert_eq!(err.code, ErrorCode::UNCLOSED_STRING);
}

#[test]
fn invalid_escape_is_rejected() {
    let err = lex_err(r#""bad \q escape""#);
    assert_eq!(err.code, ErrorCode::INVALID_ESCAPE);
}

#[test]
fn bool_and_nil_literals() {
    let kinds = lex("true false nil");
    assert_eq!(
        kinds,
        vec![
            TokenKind::True,
            TokenKind::False,
            TokenKind::Nil,
            TokenKind::Eof
        ]
    );
}

// ══════════════════════════════════════════════════════════════════════════════
// Operators & punctuation
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn comparison_operators() {
    let kinds = lex("= == != < > <= >=");
    assert_eq!(
        kinds,
        vec![
            TokenKind::Assign,
            TokenKind::EqEq,
            TokenKind::BangEq,
            TokenKind::Less,
            TokenKind::Greater,
            TokenKind::LessEq,
            TokenKind::GreaterEq,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn arithmetic_operators() {
    let kinds = lex("+ - * / %");
    assert_eq!(
        kinds,
        vec![
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Percent,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn bare_bang_is_rejected() {
    let err = lex_err("!x");
    assert_eq!(err.code, ErrorCode::UNEXPECTED_CHAR);
}

#[test]
fn unknown_character_is_rejected() {
    let err = lex_err("let x = 1 @ 2");
    assert_eq!(err.code, ErrorCode::UNEXPECTED_CHAR);
    assert!(err.message.contains('@'));
}

// ══════════════════════════════════════════════════════════════════════════════
// Layout: newlines, semicolons, comments
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn newlines_are_tokens() {
    let kinds = lex("a\nb");
    assert_eq!(
        kinds,
        vec![
            TokenKind::Identifier("a".into()),
            TokenKind::Newline,
            TokenKind::Identifier("b".into()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn crlf_is_one_newline() {
    let kinds = lex("a\r\nb");
    assert_eq!(kinds.len(), 4);
    assert_eq!(kinds[1], TokenKind::Newline);
}

#[test]
fn semicolon_is_a_separator_token() {
    let kinds = lex("a; b");
    assert_eq!(kinds[1], TokenKind::Semicolon);
}

#[test]
fn comments_run_to_end_of_line() {
    let kinds = lex("let x = 1 # the whole tail # is ignored\nx");
    assert!(kinds.contains(&TokenKind::Newline));
    assert!(!kinds
        .iter()
        .any(|k| matches!(k, TokenKind::Identifier(s) if s == "ignored")));
}

#[test]
fn comment_only_line() {
    let kinds = lex("# nothing here\n");
    assert_eq!(kinds, vec![TokenKind::Newline, TokenKind::Eof]);
}

// ══════════════════════════════════════════════════════════════════════════════
// Spans
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn spans_track_lines_and_columns() {
    let sf = SourceFile::new("script", "let x = 1\nlet y = 2");
    let tokens = Lexer::new(&sf).lex().expect("lexing should succeed");
    // second `let` starts at line 2, column 1
    let second_let = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Let)
        .nth(1)
        .expect("two let tokens");
    assert_eq!(second_let.span.line, 2);
    assert_eq!(second_let.span.col, 1);
}

#[test]
fn error_carries_source_line() {
    let err = lex_err("let ok = 1\nlet bad = \"oops");
    assert_eq!(err.span.line, 2);
    assert_eq!(err.source_line, "let bad = \"oops");
}
