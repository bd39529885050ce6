//! The orchestrator: validate → build environment → run under deadline
//! → package one structured result.
//!
//! Rejection happens before any environment is constructed, so a script
//! that fails parsing or validation is guaranteed zero side effects.
//! Runtime faults and deadline expiry are recovered here and surfaced
//! as structured results — script misbehavior never takes down the
//! hosting process.

use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use sandscript_stdlib::Value;
use sandscript_types::{ScriptError, SourceFile, ValidationReport};
use serde::Serialize;

use crate::command::{CommandExecutor, SimulatedExecutor};
use crate::deadline::{self, DeadlineError};
use crate::env::EnvironmentBuilder;
use crate::error::{EvalError, FaultKind};
use crate::evaluator::Evaluator;
use crate::output::OutputCollector;
use crate::policy::SecurityPolicy;
use crate::validator::SyntaxValidator;

/// Per-interpreter execution limits.
#[derive(Debug, Clone)]
pub struct ExecutionConfig {
    /// Hard wall-clock deadline per script.
    pub timeout: Duration,
    /// Maximum captured output lines per script.
    pub max_output_lines: usize,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_output_lines: 1000,
        }
    }
}

/// The structured outcome of one `execute` call — the only thing that
/// crosses the boundary back to the caller. Owns no external resources
/// and is fully serializable.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionResult {
    /// `true` only for a normal completion.
    pub success: bool,
    /// Captured output lines, in exact capture order.
    pub output: Vec<String>,
    /// `true` if output was dropped at the cap.
    pub truncated: bool,
    /// The script's explicit `return` value, if any.
    pub result: Option<Value>,
    /// Error message for failed runs.
    pub error: Option<String>,
    /// Classified failure kind for failed runs.
    pub error_kind: Option<FaultKind>,
    /// Final script-scope bindings.
    pub locals: BTreeMap<String, Value>,
}

impl ExecutionResult {
    fn completed(
        result: Option<Value>,
        output: Vec<String>,
        truncated: bool,
        locals: BTreeMap<String, Value>,
    ) -> Self {
        Self {
            success: true,
            output,
            truncated,
            result,
            error: None,
            error_kind: None,
            locals,
        }
    }

    fn rejected(kind: FaultKind, message: String) -> Self {
        Self {
            success: false,
            output: Vec::new(),
            truncated: false,
            result: None,
            error: Some(message),
            error_kind: Some(kind),
            locals: BTreeMap::new(),
        }
    }

    fn failed(
        kind: FaultKind,
        message: String,
        output: Vec<String>,
        truncated: bool,
        locals: BTreeMap<String, Value>,
    ) -> Self {
        Self {
            success: false,
            output,
            truncated,
            result: None,
            error: Some(message),
            error_kind: Some(kind),
            locals,
        }
    }
}

/// The sandboxed script interpreter.
///
/// One instance runs one script at a time; every `execute` call builds
/// a fresh collector and environment, so a shared instance may serve
/// sequential calls. For concurrent scripts, give each its own
/// interpreter — the policy and executor are `Arc`-shared and safe to
/// reuse read-only.
pub struct Interpreter {
    config: ExecutionConfig,
    validator: SyntaxValidator,
    executor: Arc<dyn CommandExecutor>,
}

impl Interpreter {
    /// Create an interpreter with the default policy and the simulated
    /// executor.
    pub fn new(config: ExecutionConfig) -> Self {
        Self {
            config,
            validator: SyntaxValidator::new(Arc::new(SecurityPolicy::default())),
            executor: Arc::new(SimulatedExecutor),
        }
    }

    /// Replace the security policy.
    pub fn with_policy(mut self, policy: Arc<SecurityPolicy>) -> Self {
        self.validator = SyntaxValidator::new(policy);
        self
    }

    /// Replace the command executor.
    pub fn with_executor(mut self, executor: Arc<dyn CommandExecutor>) -> Self {
        self.executor = executor;
        self
    }

    /// Validate without executing: same violations and warnings the
    /// execution path would produce, but no environment is ever
    /// constructed. A parse failure is the `Err` case, distinct from a
    /// security violation.
    pub fn validate_only(&self, script: &str) -> Result<ValidationReport, ScriptError> {
        let source = SourceFile::new("script", script);
        let program = sandscript_parser::parse_source(&source)?;
        Ok(self.validator.validate(&program, &source))
    }

    /// Execute a script to completion (or failure).
    pub fn execute(&self, script: &str) -> ExecutionResult {
        self.execute_with_bindings(script, BTreeMap::new())
    }

    /// Execute with extra caller-supplied bindings merged into the
    /// sandbox's global namespace.
    pub fn execute_with_bindings(
        &self,
        script: &str,
        bindings: BTreeMap<String, Value>,
    ) -> ExecutionResult {
        // ── Validating ──
        let source = SourceFile::new("script", script);
        let program = match sandscript_parser::parse_source(&source) {
            Ok(program) => program,
            Err(err) => {
                tracing::debug!(error = %err, "script rejected: parse failure");
                return ExecutionResult::rejected(FaultKind::ParseFailure, err.to_string());
            }
        };
        let report = self.validator.validate(&program, &source);
        if !report.passed() {
            tracing::debug!(
                violations = report.total_violations,
                warnings = report.total_warnings,
                "script rejected: security violation"
            );
            return ExecutionResult::rejected(FaultKind::SecurityViolation, report.summary());
        }

        // ── Building ──
        let collector = Arc::new(Mutex::new(OutputCollector::new(
            self.config.max_output_lines,
        )));
        let cancel = Arc::new(AtomicBool::new(false));
        let env = EnvironmentBuilder::new().with_bindings(bindings).build();
        let mut evaluator = Evaluator::new(
            env,
            Arc::clone(&cancel),
            Arc::clone(&collector),
            Arc::clone(&self.executor),
        );

        // ── Running ──
        let outcome = deadline::run_with_deadline(self.config.timeout, cancel, move || {
            let result = evaluator.run(&program);
            (result, evaluator.env.script_bindings().clone())
        });

        let (output, truncated) = collector
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .drain();

        match outcome {
            Ok((Ok(result), locals)) => {
                ExecutionResult::completed(result, output, truncated, locals)
            }
            // A worker that observed the cancel flag after the guard
            // already returned cannot reach here, but classify it as a
            // deadline fault anyway.
            Ok((Err(EvalError::Cancelled), locals)) => ExecutionResult::failed(
                FaultKind::DeadlineExceeded,
                EvalError::Cancelled.to_string(),
                output,
                truncated,
                locals,
            ),
            Ok((Err(fault), locals)) => {
                tracing::debug!(error = %fault, "script failed at runtime");
                ExecutionResult::failed(
                    FaultKind::RuntimeFault,
                    fault.to_string(),
                    output,
                    truncated,
                    locals,
                )
            }
            Err(err @ DeadlineError::Expired(_)) => ExecutionResult::failed(
                FaultKind::DeadlineExceeded,
                err.to_string(),
                output,
                truncated,
                BTreeMap::new(),
            ),
            Err(err) => ExecutionResult::failed(
                FaultKind::RuntimeFault,
                err.to_string(),
                output,
                truncated,
                BTreeMap::new(),
            ),
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(ExecutionConfig::default())
    }
}
