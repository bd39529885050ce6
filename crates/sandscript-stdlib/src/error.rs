//! Error type for builtin and module calls.

use thiserror::Error;

/// An error raised by a builtin or standard-module function.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StdlibError {
    /// The module exists but has no function by this name.
    #[error("unknown function '{module}.{func}'")]
    UnknownFunction { module: String, func: String },
    /// Wrong argument count.
    #[error("{func} expects {expected} argument(s), got {got}")]
    WrongArgCount {
        func: String,
        expected: String,
        got: usize,
    },
    /// Wrong argument type or invalid argument value.
    #[error("{func}: {message}")]
    BadArgument { func: String, message: String },
}

impl StdlibError {
    pub fn bad_argument(func: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BadArgument {
            func: func.into(),
            message: message.into(),
        }
    }

    pub fn wrong_arg_count(func: impl Into<String>, expected: impl Into<String>, got: usize) -> Self {
        Self::WrongArgCount {
            func: func.into(),
            expected: expected.into(),
            got,
        }
    }
}

/// Result alias for stdlib operations.
pub type StdlibResult = Result<crate::Value, StdlibError>;
