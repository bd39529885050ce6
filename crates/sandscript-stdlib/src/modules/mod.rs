//! The safe standard modules injected into every sandbox environment.
//!
//! This is a closed set: pure math, string and list utilities,
//! structured-data encoding, date/time, pseudo-random numbers, and
//! regular expressions. The dangerous surface (filesystem, network,
//! process, reflection) has no module here at all — the validator's
//! denylist is the first line of defence, this closed registry the
//! second.

pub mod json;
pub mod list;
pub mod math;
pub mod random;
pub mod regex;
pub mod string;
pub mod time;

use crate::error::{StdlibError, StdlibResult};
use crate::Value;

/// Names of every standard module, in binding order.
pub const NAMES: &[&str] = &["json", "list", "math", "random", "regex", "string", "time"];

/// Returns `true` if `name` is a standard module.
pub fn is_module(name: &str) -> bool {
    NAMES.contains(&name)
}

/// Dispatch `module.func(args)` to the right module.
pub fn call(module: &str, func: &str, args: Vec<Value>) -> StdlibResult {
    match module {
        "json" => json::call(func, args),
        "list" => list::call(func, args),
        "math" => math::call(func, args),
        "random" => random::call(func, args),
        "regex" => regex::call(func, args),
        "string" => string::call(func, args),
        "time" => time::call(func, args),
        other => Err(StdlibError::UnknownFunction {
            module: other.to_string(),
            func: func.to_string(),
        }),
    }
}

/// Shared helper: pull a string argument by position.
pub(crate) fn string_arg<'a>(
    func: &str,
    args: &'a [Value],
    idx: usize,
) -> Result<&'a str, StdlibError> {
    match args.get(idx) {
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(StdlibError::bad_argument(
            func,
            format!(
                "argument {} must be a string, got {}",
                idx + 1,
                other.type_name()
            ),
        )),
        None => Err(StdlibError::bad_argument(
            func,
            format!("missing argument {}", idx + 1),
        )),
    }
}

/// Shared helper: pull a number argument by position.
pub(crate) fn number_arg(func: &str, args: &[Value], idx: usize) -> Result<f64, StdlibError> {
    match args.get(idx) {
        Some(Value::Number(n)) => Ok(*n),
        Some(other) => Err(StdlibError::bad_argument(
            func,
            format!(
                "argument {} must be a number, got {}",
                idx + 1,
                other.type_name()
            ),
        )),
        None => Err(StdlibError::bad_argument(
            func,
            format!("missing argument {}", idx + 1),
        )),
    }
}

/// Shared helper: pull a list argument by position.
pub(crate) fn list_arg<'a>(
    func: &str,
    args: &'a [Value],
    idx: usize,
) -> Result<&'a [Value], StdlibError> {
    match args.get(idx) {
        Some(Value::List(items)) => Ok(items),
        Some(other) => Err(StdlibError::bad_argument(
            func,
            format!(
                "argument {} must be a list, got {}",
                idx + 1,
                other.type_name()
            ),
        )),
        None => Err(StdlibError::bad_argument(
            func,
            format!("missing argument {}", idx + 1),
        )),
    }
}

/// Shared helper: enforce an exact argument count.
pub(crate) fn expect_args(func: &str, args: &[Value], count: usize) -> Result<(), StdlibError> {
    if args.len() != count {
        return Err(StdlibError::wrong_arg_count(
            func,
            count.to_string(),
            args.len(),
        ));
    }
    Ok(())
}
