//! The restricted intrinsic-operation registry.
//!
//! This is the complete set of bare-name operations a script can call.
//! It is a fixed allowlist: arithmetic helpers, conversions, and
//! sequence utilities only. Nothing here touches the filesystem,
//! network, or process. `print` is listed for name reservation but is
//! intercepted by the evaluator, which owns output routing.

use crate::error::{StdlibError, StdlibResult};
use crate::value::Value;

/// Names of every intrinsic operation. These bindings are
/// non-overridable in the execution environment.
pub const NAMES: &[&str] = &[
    "print", "len", "str", "num", "abs", "min", "max", "range", "type_of",
];

/// Returns `true` if `name` is a registered intrinsic.
pub fn is_builtin(name: &str) -> bool {
    NAMES.contains(&name)
}

/// Invoke an intrinsic by name.
pub fn call(name: &str, args: Vec<Value>) -> StdlibResult {
    match name {
        "len" => len(args),
        "str" => to_str(args),
        "num" => to_num(args),
        "abs" => abs(args),
        "min" => min_max(args, "min", f64::min),
        "max" => min_max(args, "max", f64::max),
        "range" => range(args),
        "type_of" => type_of(args),
        other => Err(StdlibError::UnknownFunction {
            module: "builtins".to_string(),
            func: other.to_string(),
        }),
    }
}

fn one_arg(func: &str, mut args: Vec<Value>) -> Result<Value, StdlibError> {
    if args.len() != 1 {
        return Err(StdlibError::wrong_arg_count(func, "1", args.len()));
    }
    Ok(args.remove(0))
}

fn len(args: Vec<Value>) -> StdlibResult {
    let arg = one_arg("len", args)?;
    let n = match &arg {
        Value::String(s) => s.chars().count(),
        Value::List(items) => items.len(),
        Value::Record(fields) => fields.len(),
        other => {
            return Err(StdlibError::bad_argument(
                "len",
                format!("expected string, list, or record, got {}", other.type_name()),
            ))
        }
    };
    Ok(Value::Number(n as f64))
}

fn to_str(args: Vec<Value>) -> StdlibResult {
    let arg = one_arg("str", args)?;
    Ok(Value::String(arg.display_string()))
}

fn to_num(args: Vec<Value>) -> StdlibResult {
    let arg = one_arg("num", args)?;
    match &arg {
        Value::Number(_) => Ok(arg),
        Value::Bool(b) => Ok(Value::Number(if *b { 1.0 } else { 0.0 })),
        Value::String(s) => s.trim().parse::<f64>().map(Value::Number).map_err(|_| {
            StdlibError::bad_argument("num", format!("cannot parse '{s}' as a number"))
        }),
        other => Err(StdlibError::bad_argument(
            "num",
            format!("expected number, bool, or string, got {}", other.type_name()),
        )),
    }
}

fn abs(args: Vec<Value>) -> StdlibResult {
    match one_arg("abs", args)? {
        Value::Number(n) => Ok(Value::Number(n.abs())),
        other => Err(StdlibError::bad_argument(
            "abs",
            format!("expected number, got {}", other.type_name()),
        )),
    }
}

fn min_max(args: Vec<Value>, func: &str, pick: fn(f64, f64) -> f64) -> StdlibResult {
    if args.is_empty() {
        return Err(StdlibError::wrong_arg_count(func, "at least 1", 0));
    }
    let mut best: Option<f64> = None;
    for arg in &args {
        match arg {
            Value::Number(n) => best = Some(best.map_or(*n, |b| pick(b, *n))),
            other => {
                return Err(StdlibError::bad_argument(
                    func,
                    format!("expected numbers, got {}", other.type_name()),
                ))
            }
        }
    }
    Ok(Value::Number(best.unwrap_or(0.0)))
}

/// `range(n)` → `[0, 1, …, n-1]`; `range(lo, hi)` → `[lo, …, hi-1]`.
/// The result is capped at one million elements so a hostile script
/// cannot exhaust memory with a single call.
fn range(args: Vec<Value>) -> StdlibResult {
    const MAX_RANGE: i64 = 1_000_000;
    let mut bounds = Vec::with_capacity(args.len());
    for arg in &args {
        match arg {
            Value::Number(n) => bounds.push(*n as i64),
            other => {
                return Err(StdlibError::bad_argument(
                    "range",
                    format!("expected numbers, got {}", other.type_name()),
                ))
            }
        }
    }
    let (lo, hi) = match bounds.as_slice() {
        [hi] => (0i64, *hi),
        [lo, hi] => (*lo, *hi),
        _ => return Err(StdlibError::wrong_arg_count("range", "1 or 2", args.len())),
    };
    if hi.saturating_sub(lo) > MAX_RANGE {
        return Err(StdlibError::bad_argument(
            "range",
            format!("range too large (max {MAX_RANGE} elements)"),
        ));
    }
    Ok(Value::List(
        (lo..hi.max(lo)).map(|i| Value::Number(i as f64)).collect(),
    ))
}

fn type_of(args: Vec<Value>) -> StdlibResult {
    let arg = one_arg("type_of", args)?;
    Ok(Value::String(arg.type_name().to_string()))
}
