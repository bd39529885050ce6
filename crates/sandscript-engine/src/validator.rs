//! Static security validation: walks the AST against the policy before
//! any code runs.
//!
//! Validation is a pure function of the script — no mutation of the
//! policy, no side effects, safe to call concurrently across
//! independent scripts. A script with zero violations is eligible for
//! execution regardless of warning count.

use std::sync::Arc;

use sandscript_types::ast::*;
use sandscript_types::{ErrorCode, ScriptError, SourceFile, ValidationReport};

use crate::policy::SecurityPolicy;

/// Walks parsed scripts against a [`SecurityPolicy`].
#[derive(Debug, Clone)]
pub struct SyntaxValidator {
    policy: Arc<SecurityPolicy>,
}

impl SyntaxValidator {
    pub fn new(policy: Arc<SecurityPolicy>) -> Self {
        Self { policy }
    }

    /// The policy this validator enforces.
    pub fn policy(&self) -> &SecurityPolicy {
        &self.policy
    }

    /// Validate a parsed program. Produces a fresh report per call.
    pub fn validate(&self, program: &Program, source: &SourceFile) -> ValidationReport {
        let mut walker = Walker {
            policy: &self.policy,
            source,
            report: ValidationReport::empty(),
        };
        for stmt in &program.stmts {
            walker.walk_stmt(stmt);
        }
        walker.report
    }
}

struct Walker<'a> {
    policy: &'a SecurityPolicy,
    source: &'a SourceFile,
    report: ValidationReport,
}

impl<'a> Walker<'a> {
    fn walk_stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Import { module } => self.check_import(module),
            StmtKind::Let { value, .. } | StmtKind::Assign { value, .. } => self.walk_expr(value),
            StmtKind::If {
                cond,
                then_block,
                else_block,
            } => {
                self.walk_expr(cond);
                self.walk_block(then_block);
                if let Some(block) = else_block {
                    self.walk_block(block);
                }
            }
            StmtKind::While { cond, body } => {
                self.walk_expr(cond);
                self.walk_block(body);
            }
            StmtKind::For { iterable, body, .. } => {
                self.walk_expr(iterable);
                self.walk_block(body);
            }
            StmtKind::Return { value } => {
                if let Some(value) = value {
                    self.walk_expr(value);
                }
            }
            StmtKind::Break | StmtKind::Continue => {}
            StmtKind::Expr(expr) => self.walk_expr(expr),
        }
    }

    fn walk_block(&mut self, block: &Block) {
        for stmt in &block.stmts {
            self.walk_stmt(stmt);
        }
    }

    fn walk_expr(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::NumberLit(_)
            | ExprKind::StringLit(_)
            | ExprKind::BoolLit(_)
            | ExprKind::NilLit
            | ExprKind::Identifier(_) => {}
            ExprKind::ListLit(elems) => {
                for elem in elems {
                    self.walk_expr(elem);
                }
            }
            ExprKind::RecordLit(fields) => {
                for (_, value) in fields {
                    self.walk_expr(value);
                }
            }
            ExprKind::Call { callee, args } => {
                self.check_call(callee);
                self.walk_args(args);
            }
            ExprKind::MethodCall {
                object,
                method,
                args,
            } => {
                self.check_attribute(method);
                self.walk_expr(object);
                self.walk_args(args);
            }
            ExprKind::FieldAccess { object, field } => {
                self.check_attribute(field);
                self.walk_expr(object);
            }
            ExprKind::Index { object, index } => {
                self.walk_expr(object);
                self.walk_expr(index);
            }
            ExprKind::Binary { left, right, .. } => {
                self.walk_expr(left);
                self.walk_expr(right);
            }
            ExprKind::Unary { operand, .. } => self.walk_expr(operand),
        }
    }

    fn walk_args(&mut self, args: &[Arg]) {
        for arg in args {
            self.walk_expr(&arg.value);
        }
    }

    fn check_import(&mut self, module: &Ident) {
        if self.policy.is_denied_module(&module.name) {
            let finding = self.finding(
                ErrorCode::DENIED_MODULE,
                format!("module '{}' is denied by the security policy", module.name),
                module,
            );
            self.report.push_violation(finding);
        } else if !self.policy.is_allowed_module(&module.name) {
            let finding = self.finding(
                ErrorCode::UNKNOWN_MODULE,
                format!("module '{}' is not in the allowed set", module.name),
                module,
            );
            self.report.push_warning(finding);
        }
    }

    fn check_call(&mut self, callee: &Ident) {
        if self.policy.is_denied_call(&callee.name) {
            let mut finding = self.finding(
                ErrorCode::DENIED_CALL,
                format!("call to '{}' is denied by the security policy", callee.name),
                callee,
            );
            if callee.name == "open" {
                finding = finding.with_suggestion("use FILE.OPEN(name=...) instead");
            }
            self.report.push_violation(finding);
        }
    }

    fn check_attribute(&mut self, attr: &Ident) {
        if self.policy.is_denied_attribute(&attr.name) {
            let finding = self.finding(
                ErrorCode::DENIED_ATTRIBUTE,
                format!("attribute '{}' is denied by the security policy", attr.name),
                attr,
            );
            self.report.push_violation(finding);
        }
    }

    fn finding(&self, code: ErrorCode, message: String, at: &Ident) -> ScriptError {
        let source_line = self.source.line(at.span.line).unwrap_or("").to_string();
        ScriptError::new(&self.source.name, code, message, at.span, source_line)
    }
}
