//! Runtime error types for the evaluator and the public fault taxonomy.

use sandscript_stdlib::{StdlibError, Value};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The classified kind of failure reported in an [`crate::ExecutionResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    /// Malformed script text — rejected before validation proper.
    ParseFailure,
    /// A security-policy denylist hit — rejected before any execution.
    SecurityViolation,
    /// Execution interrupted by the deadline guard.
    DeadlineExceeded,
    /// Any fault raised by the script's own logic mid-run.
    RuntimeFault,
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ParseFailure => write!(f, "parse failure"),
            Self::SecurityViolation => write!(f, "security violation"),
            Self::DeadlineExceeded => write!(f, "deadline exceeded"),
            Self::RuntimeFault => write!(f, "runtime fault"),
        }
    }
}

/// Evaluation error — runtime traps plus the control-flow sentinels the
/// evaluator uses internally (`Return`, `Break`, `Continue` never
/// escape a well-formed run loop).
#[derive(Debug, Clone, Error)]
pub enum EvalError {
    /// Division by zero, modulo by zero, non-finite results.
    #[error("arithmetic trap: {0}")]
    ArithmeticTrap(String),
    /// Operation applied to the wrong type.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),
    /// Unknown variable.
    #[error("undefined variable: {0}")]
    UndefinedVariable(String),
    /// Bare call that resolves to nothing callable.
    #[error("unknown function: {0}")]
    UnknownFunction(String),
    /// Import of a module the environment does not provide.
    #[error("unknown module: {0}")]
    UnknownModule(String),
    /// Field or index access on nil.
    #[error("nil access: {0}")]
    NilAccess(String),
    /// List or record index out of range.
    #[error("index out of range: {0}")]
    IndexOutOfRange(String),
    /// Builtin or standard-module call error.
    #[error("stdlib error: {0}")]
    Stdlib(#[from] StdlibError),
    /// The host executor rejected a command.
    #[error("command failed: {0}")]
    CommandFailed(String),
    /// The deadline guard's cancel flag was observed.
    #[error("execution cancelled by deadline")]
    Cancelled,
    /// Generic runtime error.
    #[error("runtime error: {0}")]
    Runtime(String),

    // ── Control-flow sentinels ───────────────────────────────────
    /// `return` statement (unwinds to the run loop).
    #[error("return outside of script")]
    Return(Value),
    /// `break` statement (unwinds to the nearest loop).
    #[error("break outside of loop")]
    Break,
    /// `continue` statement (unwinds to the nearest loop).
    #[error("continue outside of loop")]
    Continue,
}

/// Result alias for evaluator operations.
pub type EvalResult<T> = Result<T, EvalError>;
