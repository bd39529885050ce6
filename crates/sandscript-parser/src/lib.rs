//! Sandscript parser: converts a token stream into an AST.

mod parse_expr;
mod parse_stmt;
mod parser;

pub use parser::Parser;

use sandscript_lexer::Lexer;
use sandscript_types::ast::Program;
use sandscript_types::{ScriptError, SourceFile};

/// Lex and parse a source file in one step.
///
/// The first malformed lexeme or syntax error aborts with a
/// [`ScriptError`] (a parse failure, distinct from a security
/// violation).
pub fn parse_source(source_file: &SourceFile) -> Result<Program, ScriptError> {
    let tokens = Lexer::new(source_file).lex()?;
    Parser::new(tokens, source_file).parse()
}
