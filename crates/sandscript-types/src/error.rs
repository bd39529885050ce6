use crate::Span;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Maximum number of violations stored in a report before capping.
pub const MAX_VIOLATIONS: usize = 20;

/// Error severity.
///
/// Security violations are `Error`; unknown-module references are the
/// one `Warning` case (suspicious but not auto-blocked).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Error category, determined by error code range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Syntax,
    Security,
}

/// Numeric error code (E100–E299).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ErrorCode(pub u16);

impl ErrorCode {
    // ── Syntax errors (E100–E199) ──
    pub const UNEXPECTED_TOKEN: Self = Self(100);
    pub const UNCLOSED_STRING: Self = Self(101);
    pub const INVALID_ESCAPE: Self = Self(102);
    pub const INVALID_NUMBER: Self = Self(103);
    pub const UNEXPECTED_EOF: Self = Self(104);
    pub const UNEXPECTED_CHAR: Self = Self(105);

    // ── Security violations (E200–E299) ──
    pub const DENIED_MODULE: Self = Self(200);
    pub const UNKNOWN_MODULE: Self = Self(201);
    pub const DENIED_CALL: Self = Self(202);
    pub const DENIED_ATTRIBUTE: Self = Self(203);

    /// Get the category for this error code.
    pub fn category(self) -> ErrorCategory {
        match self.0 {
            200..=299 => ErrorCategory::Security,
            _ => ErrorCategory::Syntax,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

/// A structured Sandscript error for the static phases (lexing, parsing,
/// validation).
///
/// Carries the exact source line so callers can render context without
/// re-reading the script.
#[derive(Debug, Clone, Serialize, Deserialize, Error)]
#[error("{span}: {code} [{category}] {message}")]
pub struct ScriptError {
    /// Name given to the script source (defaults to "script").
    pub file: String,
    /// Error code (e.g., E200).
    pub code: ErrorCode,
    /// Error severity.
    pub severity: Severity,
    /// Error category (derived from code).
    pub category: ErrorCategory,
    /// Human-readable message.
    pub message: String,
    /// Source location.
    #[serde(flatten)]
    pub span: Span,
    /// The exact source line for context.
    pub source_line: String,
    /// Optional fix suggestion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ScriptError {
    /// Create a new error.
    pub fn new(
        file: impl Into<String>,
        code: ErrorCode,
        message: impl Into<String>,
        span: Span,
        source_line: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            code,
            severity: Severity::Error,
            category: code.category(),
            message: message.into(),
            span,
            source_line: source_line.into(),
            suggestion: None,
        }
    }

    /// Downgrade to a warning.
    pub fn as_warning(mut self) -> Self {
        self.severity = Severity::Warning;
        self
    }

    /// Attach a fix suggestion.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax => write!(f, "syntax"),
            Self::Security => write!(f, "security"),
        }
    }
}

/// The outcome of validating one script against the security policy.
///
/// Empty `violations` means the script is eligible for execution,
/// regardless of how many warnings were collected. Produced fresh per
/// validation call; never cached across scripts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub violations: Vec<ScriptError>,
    pub warnings: Vec<ScriptError>,
    pub total_violations: usize,
    pub total_warnings: usize,
}

impl ValidationReport {
    /// Create an empty report (no violations, no warnings).
    pub fn empty() -> Self {
        Self {
            violations: Vec::new(),
            warnings: Vec::new(),
            total_violations: 0,
            total_warnings: 0,
        }
    }

    /// `true` if the script may be executed.
    pub fn passed(&self) -> bool {
        self.total_violations == 0
    }

    /// Add a violation, respecting the MAX_VIOLATIONS storage limit.
    pub fn push_violation(&mut self, violation: ScriptError) {
        if self.violations.len() < MAX_VIOLATIONS {
            self.violations.push(violation);
        }
        self.total_violations += 1;
    }

    /// Add a warning.
    pub fn push_warning(&mut self, warning: ScriptError) {
        self.warnings.push(warning.as_warning());
        self.total_warnings += 1;
    }

    /// One-line summary of all stored violations, for result messages.
    pub fn summary(&self) -> String {
        self.violations
            .iter()
            .map(|v| format!("{}: {}", v.span, v.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_categories() {
        assert_eq!(
            ErrorCode::UNEXPECTED_TOKEN.category(),
            ErrorCategory::Syntax
        );
        assert_eq!(ErrorCode::UNCLOSED_STRING.category(), ErrorCategory::Syntax);
        assert_eq!(ErrorCode::DENIED_MODULE.category(), ErrorCategory::Security);
        assert_eq!(
            ErrorCode::DENIED_ATTRIBUTE.category(),
            ErrorCategory::Security
        );
    }

    #[test]
    fn code_display() {
        assert_eq!(format!("{}", ErrorCode::DENIED_CALL), "E202");
        assert_eq!(format!("{}", ErrorCode::UNEXPECTED_TOKEN), "E100");
    }

    #[test]
    fn error_creation() {
        let err = ScriptError::new(
            "script",
            ErrorCode::DENIED_MODULE,
            "module 'os' is denied by the security policy",
            Span::point(2, 1),
            "import os",
        );
        assert_eq!(err.code, ErrorCode::DENIED_MODULE);
        assert_eq!(err.severity, Severity::Error);
        assert_eq!(err.category, ErrorCategory::Security);
    }

    #[test]
    fn warning_downgrade() {
        let warn = ScriptError::new(
            "script",
            ErrorCode::UNKNOWN_MODULE,
            "module 'maths' is not in the allowed set",
            Span::point(1, 1),
            "import maths",
        )
        .as_warning();
        assert_eq!(warn.severity, Severity::Warning);
    }

    #[test]
    fn error_json_serialization() {
        let err = ScriptError::new(
            "script",
            ErrorCode::DENIED_CALL,
            "call to 'open' is denied",
            Span::new(3, 5, 3, 9),
            "open(\"x\")",
        )
        .with_suggestion("use FILE.OPEN(name=...) instead");

        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"code\""));
        assert!(json.contains("\"line\""));
        assert!(json.contains("\"end_col\""));
        assert!(json.contains("\"suggestion\""));

        let back: ScriptError = serde_json::from_str(&json).unwrap();
        assert_eq!(back.code, err.code);
        assert_eq!(back.message, err.message);
    }

    #[test]
    fn report_violation_cap() {
        let mut report = ValidationReport::empty();
        for i in 0..25 {
            report.push_violation(ScriptError::new(
                "script",
                ErrorCode::DENIED_CALL,
                format!("violation {i}"),
                Span::point(i + 1, 1),
                "",
            ));
        }
        assert_eq!(report.violations.len(), MAX_VIOLATIONS);
        assert_eq!(report.total_violations, 25);
        assert!(!report.passed());
    }

    #[test]
    fn empty_report_passes() {
        let report = ValidationReport::empty();
        assert!(report.passed());
        assert_eq!(report.total_warnings, 0);
    }

    #[test]
    fn warnings_do_not_fail_validation() {
        let mut report = ValidationReport::empty();
        report.push_warning(ScriptError::new(
            "script",
            ErrorCode::UNKNOWN_MODULE,
            "module 'maths' is not in the allowed set",
            Span::point(1, 1),
            "import maths",
        ));
        assert!(report.passed());
        assert_eq!(report.warnings[0].severity, Severity::Warning);
    }

    #[test]
    fn summary_joins_violations() {
        let mut report = ValidationReport::empty();
        report.push_violation(ScriptError::new(
            "script",
            ErrorCode::DENIED_MODULE,
            "module 'os' is denied",
            Span::point(1, 1),
            "import os",
        ));
        report.push_violation(ScriptError::new(
            "script",
            ErrorCode::DENIED_CALL,
            "call to 'eval' is denied",
            Span::point(2, 1),
            "eval(\"1\")",
        ));
        let summary = report.summary();
        assert!(summary.contains("module 'os' is denied"));
        assert!(summary.contains("call to 'eval' is denied"));
    }
}
