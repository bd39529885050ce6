//! Shared types for the Sandscript engine.
//!
//! This crate defines the AST node types, source spans, and structured
//! error types used by the lexer, parser, and execution engine.

mod error;
mod span;
pub mod ast;

pub use error::{
    ErrorCategory, ErrorCode, ScriptError, Severity, ValidationReport, MAX_VIOLATIONS,
};
pub use span::{SourceFile, Span};

/// Result type used throughout the static phases.
pub type Result<T> = std::result::Result<T, ScriptError>;
