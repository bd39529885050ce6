//! Core statement and expression evaluator.
//!
//! Walks AST nodes inside the restricted environment. Every effectful
//! capability is mediated: `print` routes into the output collector,
//! command-namespace verbs go through the host executor, and a tick
//! counter polls the deadline guard's cancel flag so a script cannot
//! outrun its deadline by staying busy.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use sandscript_stdlib::{builtins, modules, Value};
use sandscript_types::ast::*;

use crate::command::{CommandExecutor, CommandRequest};
use crate::env::Environment;
use crate::error::{EvalError, EvalResult};
use crate::output::OutputCollector;

/// Poll the cancel flag once per this many ticks.
const CANCEL_POLL_MASK: u64 = 0x3F;

/// The tree-walking evaluator for one script execution.
pub struct Evaluator {
    /// Variable environment (scoped).
    pub env: Environment,
    /// Tick counter driving cancel-flag polling.
    ticks: u64,
    /// Set by the deadline guard when the wall clock runs out.
    cancel: Arc<AtomicBool>,
    /// Destination for `print` output.
    output: Arc<Mutex<OutputCollector>>,
    /// Host-side implementation of the command namespaces.
    executor: Arc<dyn CommandExecutor>,
}

impl Evaluator {
    pub fn new(
        env: Environment,
        cancel: Arc<AtomicBool>,
        output: Arc<Mutex<OutputCollector>>,
        executor: Arc<dyn CommandExecutor>,
    ) -> Self {
        Self {
            env,
            ticks: 0,
            cancel,
            output,
            executor,
        }
    }

    /// Count one unit of work and poll the cancel flag periodically.
    fn tick(&mut self) -> EvalResult<()> {
        self.ticks += 1;
        if self.ticks & CANCEL_POLL_MASK == 0 && self.cancel.load(Ordering::Relaxed) {
            return Err(EvalError::Cancelled);
        }
        Ok(())
    }

    /// Run a whole program. Returns the script's explicit return value,
    /// if any.
    pub fn run(&mut self, program: &Program) -> EvalResult<Option<Value>> {
        for stmt in &program.stmts {
            match self.eval_stmt(stmt) {
                Ok(_) => {}
                Err(EvalError::Return(value)) => return Ok(Some(value)),
                Err(EvalError::Break) => {
                    return Err(EvalError::Runtime("break outside of loop".to_string()))
                }
                Err(EvalError::Continue) => {
                    return Err(EvalError::Runtime("continue outside of loop".to_string()))
                }
                Err(other) => return Err(other),
            }
        }
        Ok(None)
    }

    // ══════════════════════════════════════════════════════════════════════
    // Statement execution
    // ══════════════════════════════════════════════════════════════════════

    fn eval_stmt(&mut self, stmt: &Stmt) -> EvalResult<()> {
        self.tick()?;
        match &stmt.kind {
            StmtKind::Import { module } => self.eval_import(module),
            StmtKind::Let { name, value } => {
                let value = self.eval_expr(value)?;
                self.env.define(&name.name, value);
                Ok(())
            }
            StmtKind::Assign { name, value } => {
                let value = self.eval_expr(value)?;
                if !self.env.set(&name.name, value) {
                    return Err(EvalError::UndefinedVariable(name.name.clone()));
                }
                Ok(())
            }
            StmtKind::If {
                cond,
                then_block,
                else_block,
            } => {
                if self.eval_expr(cond)?.is_truthy() {
                    self.eval_block(then_block)
                } else if let Some(block) = else_block {
                    self.eval_block(block)
                } else {
                    Ok(())
                }
            }
            StmtKind::While { cond, body } => self.eval_while(cond, body),
            StmtKind::For {
                var,
                iterable,
                body,
            } => self.eval_for(var, iterable, body),
            StmtKind::Return { value } => {
                let value = match value {
                    Some(expr) => self.eval_expr(expr)?,
                    None => Value::Nil,
                };
                Err(EvalError::Return(value))
            }
            StmtKind::Break => Err(EvalError::Break),
            StmtKind::Continue => Err(EvalError::Continue),
            StmtKind::Expr(expr) => {
                self.eval_expr(expr)?;
                Ok(())
            }
        }
    }

    /// `import NAME` — modules are preloaded by the environment
    /// builder, so import only checks the name resolves to one.
    fn eval_import(&mut self, module: &Ident) -> EvalResult<()> {
        match self.env.get(&module.name) {
            Some(Value::Module(_)) => Ok(()),
            _ => Err(EvalError::UnknownModule(module.name.clone())),
        }
    }

    fn eval_block(&mut self, block: &Block) -> EvalResult<()> {
        for stmt in &block.stmts {
            self.eval_stmt(stmt)?;
        }
        Ok(())
    }

    fn eval_while(&mut self, cond: &Expr, body: &Block) -> EvalResult<()> {
        loop {
            self.tick()?;
            if !self.eval_expr(cond)?.is_truthy() {
                return Ok(());
            }
            match self.eval_block(body) {
                Ok(()) => {}
                Err(EvalError::Break) => return Ok(()),
                Err(EvalError::Continue) => continue,
                Err(other) => return Err(other),
            }
        }
    }

    fn eval_for(&mut self, var: &Ident, iterable: &Expr, body: &Block) -> EvalResult<()> {
        let iterable = self.eval_expr(iterable)?;
        let items = match iterable {
            Value::List(items) => items,
            other => {
                return Err(EvalError::TypeMismatch(format!(
                    "for loop requires a list, got {}",
                    other.type_name()
                )))
            }
        };

        self.env.push_scope();
        for item in items {
            self.tick()?;
            self.env.define(&var.name, item);
            match self.eval_block(body) {
                Ok(()) => {}
                Err(EvalError::Break) => break,
                Err(EvalError::Continue) => continue,
                Err(other) => {
                    self.env.pop_scope();
                    return Err(other);
                }
            }
        }
        self.env.pop_scope();
        Ok(())
    }

    // ══════════════════════════════════════════════════════════════════════
    // Expression evaluation
    // ══════════════════════════════════════════════════════════════════════

    fn eval_expr(&mut self, expr: &Expr) -> EvalResult<Value> {
        self.tick()?;
        match &expr.kind {
            ExprKind::NumberLit(n) => Ok(Value::Number(*n)),
            ExprKind::StringLit(s) => Ok(Value::String(s.clone())),
            ExprKind::BoolLit(b) => Ok(Value::Bool(*b)),
            ExprKind::NilLit => Ok(Value::Nil),

            ExprKind::ListLit(elems) => {
                let mut values = Vec::with_capacity(elems.len());
                for elem in elems {
                    values.push(self.eval_expr(elem)?);
                }
                Ok(Value::List(values))
            }
            ExprKind::RecordLit(fields) => {
                let mut record = BTreeMap::new();
                for (name, value) in fields {
                    let value = self.eval_expr(value)?;
                    record.insert(name.name.clone(), value);
                }
                Ok(Value::Record(record))
            }

            ExprKind::Identifier(name) => self
                .env
                .get(name)
                .cloned()
                .ok_or_else(|| EvalError::UndefinedVariable(name.clone())),

            ExprKind::Call { callee, args } => self.eval_call(callee, args),
            ExprKind::MethodCall {
                object,
                method,
                args,
            } => self.eval_method_call(object, method, args),
            ExprKind::FieldAccess { object, field } => self.eval_field_access(object, field),
            ExprKind::Index { object, index } => self.eval_index(object, index),

            ExprKind::Binary { left, op, right } => self.eval_binary(left, *op, right),
            ExprKind::Unary { op, operand } => self.eval_unary(*op, operand),
        }
    }

    // ── Calls ────────────────────────────────────────────────────────────

    /// Bare call: `print(...)` routes to the output collector; every
    /// other name must resolve to an intrinsic in the environment.
    fn eval_call(&mut self, callee: &Ident, args: &[Arg]) -> EvalResult<Value> {
        if callee.name == "print" {
            let values = self.eval_positional_args("print", args)?;
            return self.eval_print(values);
        }
        match self.env.get(&callee.name).cloned() {
            // An aliased `print` still routes into the collector.
            Some(Value::Builtin(name)) if name == "print" => {
                let values = self.eval_positional_args("print", args)?;
                self.eval_print(values)
            }
            Some(Value::Builtin(name)) => {
                let values = self.eval_positional_args(&name, args)?;
                Ok(builtins::call(&name, values)?)
            }
            Some(other) => Err(EvalError::TypeMismatch(format!(
                "'{}' is a {}, not a function",
                callee.name,
                other.type_name()
            ))),
            None => Err(EvalError::UnknownFunction(callee.name.clone())),
        }
    }

    /// The output primitive. Joins arguments with a space; never fails
    /// on any input — a poisoned collector lock degrades to dropping
    /// the line rather than crashing the script.
    fn eval_print(&mut self, values: Vec<Value>) -> EvalResult<Value> {
        let line = values
            .iter()
            .map(Value::display_string)
            .collect::<Vec<_>>()
            .join(" ");
        if let Ok(mut collector) = self.output.lock() {
            collector.capture(line);
        }
        Ok(Value::Nil)
    }

    /// `object.verb(args)` — dispatch on what the receiver is.
    fn eval_method_call(
        &mut self,
        object: &Expr,
        method: &Ident,
        args: &[Arg],
    ) -> EvalResult<Value> {
        let receiver = self.eval_expr(object)?;
        match receiver {
            // Command namespace: translate into one CommandRequest.
            Value::Namespace(ns) => self.dispatch_command(&ns, method, args),
            // Standard module: positional dispatch.
            Value::Module(module) => {
                let values = self.eval_positional_args(&method.name, args)?;
                Ok(modules::call(&module, &method.name, values)?)
            }
            // Method sugar on strings and lists: the receiver becomes
            // argument 0 of the matching module function.
            receiver @ (Value::String(_) | Value::List(_)) => {
                let module = match receiver {
                    Value::String(_) => "string",
                    _ => "list",
                };
                let mut values = vec![receiver];
                values.extend(self.eval_positional_args(&method.name, args)?);
                Ok(modules::call(module, &method.name, values)?)
            }
            other => Err(EvalError::TypeMismatch(format!(
                "cannot call method '{}' on {}",
                method.name,
                other.type_name()
            ))),
        }
    }

    /// Build and forward one command request. Named arguments keep
    /// their names; positional arguments are keyed `arg0`, `arg1`, …
    fn dispatch_command(&mut self, namespace: &str, verb: &Ident, args: &[Arg]) -> EvalResult<Value> {
        let mut params = BTreeMap::new();
        for (i, arg) in args.iter().enumerate() {
            let key = match &arg.name {
                Some(name) => name.name.clone(),
                None => format!("arg{i}"),
            };
            let value = self.eval_expr(&arg.value)?;
            params.insert(key, value);
        }
        let request = CommandRequest::new(namespace, &verb.name, params);
        self.executor
            .dispatch(request)
            .map_err(|e| EvalError::CommandFailed(e.to_string()))
    }

    /// Evaluate arguments for a callee that takes positional arguments
    /// only (intrinsics and module functions).
    fn eval_positional_args(&mut self, func: &str, args: &[Arg]) -> EvalResult<Vec<Value>> {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            if let Some(name) = &arg.name {
                return Err(EvalError::TypeMismatch(format!(
                    "'{func}' does not accept named arguments (got '{}')",
                    name.name
                )));
            }
            values.push(self.eval_expr(&arg.value)?);
        }
        Ok(values)
    }

    // ── Access ───────────────────────────────────────────────────────────

    fn eval_field_access(&mut self, object: &Expr, field: &Ident) -> EvalResult<Value> {
        let receiver = self.eval_expr(object)?;
        match &receiver {
            Value::Record(fields) => fields.get(&field.name).cloned().ok_or_else(|| {
                EvalError::Runtime(format!("record has no field '{}'", field.name))
            }),
            Value::Nil => Err(EvalError::NilAccess(format!(
                "cannot access field '{}' on nil",
                field.name
            ))),
            Value::Module(name) => Err(EvalError::TypeMismatch(format!(
                "module functions must be called: {name}.{}(...)",
                field.name
            ))),
            Value::Namespace(name) => Err(EvalError::TypeMismatch(format!(
                "command verbs must be called: {name}.{}(...)",
                field.name
            ))),
            other => Err(EvalError::TypeMismatch(format!(
                "cannot access field '{}' on {}",
                field.name,
                other.type_name()
            ))),
        }
    }

    fn eval_index(&mut self, object: &Expr, index: &Expr) -> EvalResult<Value> {
        let receiver = self.eval_expr(object)?;
        let index = self.eval_expr(index)?;
        match (&receiver, &index) {
            (Value::List(items), Value::Number(n)) => {
                let idx = *n;
                if idx.fract() != 0.0 || idx < 0.0 || idx as usize >= items.len() {
                    return Err(EvalError::IndexOutOfRange(format!(
                        "index {} for list of length {}",
                        sandscript_stdlib::format_number(idx),
                        items.len()
                    )));
                }
                Ok(items[idx as usize].clone())
            }
            (Value::Record(fields), Value::String(key)) => fields
                .get(key)
                .cloned()
                .ok_or_else(|| EvalError::Runtime(format!("record has no field '{key}'"))),
            (Value::Nil, _) => Err(EvalError::NilAccess("cannot index nil".to_string())),
            (receiver, index) => Err(EvalError::TypeMismatch(format!(
                "cannot index {} with {}",
                receiver.type_name(),
                index.type_name()
            ))),
        }
    }

    // ── Operators ────────────────────────────────────────────────────────

    fn eval_binary(&mut self, left: &Expr, op: BinOp, right: &Expr) -> EvalResult<Value> {
        // Short-circuit logical operators.
        if op == BinOp::And {
            let lv = self.eval_expr(left)?;
            return if !lv.is_truthy() {
                Ok(Value::Bool(false))
            } else {
                Ok(Value::Bool(self.eval_expr(right)?.is_truthy()))
            };
        }
        if op == BinOp::Or {
            let lv = self.eval_expr(left)?;
            return if lv.is_truthy() {
                Ok(Value::Bool(true))
            } else {
                Ok(Value::Bool(self.eval_expr(right)?.is_truthy()))
            };
        }

        let lv = self.eval_expr(left)?;
        let rv = self.eval_expr(right)?;

        match op {
            BinOp::Add => self.eval_add(&lv, &rv),
            BinOp::Sub => self.eval_arith(&lv, &rv, |a, b| a - b, "-"),
            BinOp::Mul => self.eval_arith(&lv, &rv, |a, b| a * b, "*"),
            BinOp::Div => {
                if let (Value::Number(a), Value::Number(b)) = (&lv, &rv) {
                    if *b == 0.0 {
                        return Err(EvalError::ArithmeticTrap("division by zero".into()));
                    }
                    let result = a / b;
                    if result.is_nan() || result.is_infinite() {
                        return Err(EvalError::ArithmeticTrap(
                            "division produced a non-finite number".into(),
                        ));
                    }
                    Ok(Value::Number(result))
                } else {
                    Err(EvalError::TypeMismatch(format!(
                        "cannot divide {} by {}",
                        lv.type_name(),
                        rv.type_name()
                    )))
                }
            }
            BinOp::Mod => {
                if let (Value::Number(a), Value::Number(b)) = (&lv, &rv) {
                    if *b == 0.0 {
                        return Err(EvalError::ArithmeticTrap("modulo by zero".into()));
                    }
                    Ok(Value::Number(a % b))
                } else {
                    Err(EvalError::TypeMismatch(format!(
                        "cannot modulo {} by {}",
                        lv.type_name(),
                        rv.type_name()
                    )))
                }
            }
            BinOp::Eq => Ok(Value::Bool(lv == rv)),
            BinOp::NotEq => Ok(Value::Bool(lv != rv)),
            BinOp::Less => self.eval_comparison(&lv, &rv, |o| o.is_lt()),
            BinOp::Greater => self.eval_comparison(&lv, &rv, |o| o.is_gt()),
            BinOp::LessEq => self.eval_comparison(&lv, &rv, |o| o.is_le()),
            BinOp::GreaterEq => self.eval_comparison(&lv, &rv, |o| o.is_ge()),
            BinOp::And | BinOp::Or => unreachable!("handled above"),
        }
    }

    fn eval_add(&self, lv: &Value, rv: &Value) -> EvalResult<Value> {
        match (lv, rv) {
            (Value::Number(a), Value::Number(b)) => {
                let result = a + b;
                if result.is_nan() || result.is_infinite() {
                    Err(EvalError::ArithmeticTrap(
                        "addition produced a non-finite number".into(),
                    ))
                } else {
                    Ok(Value::Number(result))
                }
            }
            (Value::String(a), Value::String(b)) => Ok(Value::String(format!("{a}{b}"))),
            (Value::List(a), Value::List(b)) => {
                let mut joined = a.clone();
                joined.extend(b.iter().cloned());
                Ok(Value::List(joined))
            }
            _ => Err(EvalError::TypeMismatch(format!(
                "cannot add {} and {}",
                lv.type_name(),
                rv.type_name()
            ))),
        }
    }

    fn eval_arith(
        &self,
        lv: &Value,
        rv: &Value,
        op: fn(f64, f64) -> f64,
        symbol: &str,
    ) -> EvalResult<Value> {
        if let (Value::Number(a), Value::Number(b)) = (lv, rv) {
            let result = op(*a, *b);
            if result.is_nan() || result.is_infinite() {
                Err(EvalError::ArithmeticTrap(format!(
                    "'{symbol}' produced a non-finite number"
                )))
            } else {
                Ok(Value::Number(result))
            }
        } else {
            Err(EvalError::TypeMismatch(format!(
                "cannot apply '{symbol}' to {} and {}",
                lv.type_name(),
                rv.type_name()
            )))
        }
    }

    fn eval_comparison(
        &self,
        lv: &Value,
        rv: &Value,
        accept: fn(std::cmp::Ordering) -> bool,
    ) -> EvalResult<Value> {
        let ordering = match (lv, rv) {
            (Value::Number(a), Value::Number(b)) => a.partial_cmp(b).ok_or_else(|| {
                EvalError::ArithmeticTrap("comparison with a non-finite number".into())
            })?,
            (Value::String(a), Value::String(b)) => a.cmp(b),
            _ => {
                return Err(EvalError::TypeMismatch(format!(
                    "cannot compare {} and {}",
                    lv.type_name(),
                    rv.type_name()
                )))
            }
        };
        Ok(Value::Bool(accept(ordering)))
    }

    fn eval_unary(&mut self, op: UnaryOp, operand: &Expr) -> EvalResult<Value> {
        let value = self.eval_expr(operand)?;
        match op {
            UnaryOp::Neg => match value {
                Value::Number(n) => Ok(Value::Number(-n)),
                other => Err(EvalError::TypeMismatch(format!(
                    "cannot negate {}",
                    other.type_name()
                ))),
            },
            UnaryOp::Not => Ok(Value::Bool(!value.is_truthy())),
        }
    }
}
