//! String utilities. Also backs method-call sugar on string values:
//! `"a b".split(" ")` dispatches here with the receiver as argument 0.

use super::{expect_args, number_arg, string_arg};
use crate::error::{StdlibError, StdlibResult};
use crate::Value;

pub fn call(func: &str, args: Vec<Value>) -> StdlibResult {
    match func {
        "length" => {
            expect_args(func, &args, 1)?;
            let s = string_arg(func, &args, 0)?;
            Ok(Value::Number(s.chars().count() as f64))
        }
        "upper" => map_str(func, &args, |s| s.to_uppercase()),
        "lower" => map_str(func, &args, |s| s.to_lowercase()),
        "trim" => map_str(func, &args, |s| s.trim().to_string()),
        "contains" => {
            expect_args(func, &args, 2)?;
            let s = string_arg(func, &args, 0)?;
            let needle = string_arg(func, &args, 1)?;
            Ok(Value::Bool(s.contains(needle)))
        }
        "starts_with" => {
            expect_args(func, &args, 2)?;
            let s = string_arg(func, &args, 0)?;
            let prefix = string_arg(func, &args, 1)?;
            Ok(Value::Bool(s.starts_with(prefix)))
        }
        "ends_with" => {
            expect_args(func, &args, 2)?;
            let s = string_arg(func, &args, 0)?;
            let suffix = string_arg(func, &args, 1)?;
            Ok(Value::Bool(s.ends_with(suffix)))
        }
        "replace" => {
            expect_args(func, &args, 3)?;
            let s = string_arg(func, &args, 0)?;
            let from = string_arg(func, &args, 1)?;
            let to = string_arg(func, &args, 2)?;
            Ok(Value::String(s.replace(from, to)))
        }
        "split" => {
            expect_args(func, &args, 2)?;
            let s = string_arg(func, &args, 0)?;
            let sep = string_arg(func, &args, 1)?;
            if sep.is_empty() {
                return Err(StdlibError::bad_argument(func, "separator must not be empty"));
            }
            Ok(Value::List(
                s.split(sep)
                    .map(|part| Value::String(part.to_string()))
                    .collect(),
            ))
        }
        "slice" => {
            expect_args(func, &args, 3)?;
            let s = string_arg(func, &args, 0)?;
            let chars: Vec<char> = s.chars().collect();
            let (start, end) = slice_bounds(func, &args, chars.len())?;
            Ok(Value::String(chars[start..end].iter().collect()))
        }
        "repeat" => {
            expect_args(func, &args, 2)?;
            let s = string_arg(func, &args, 0)?;
            let count = number_arg(func, &args, 1)?;
            if !(0.0..=10_000.0).contains(&count) {
                return Err(StdlibError::bad_argument(
                    func,
                    "repeat count must be between 0 and 10000",
                ));
            }
            Ok(Value::String(s.repeat(count as usize)))
        }
        other => Err(StdlibError::UnknownFunction {
            module: "string".to_string(),
            func: other.to_string(),
        }),
    }
}

fn map_str(func: &str, args: &[Value], op: impl Fn(&str) -> String) -> StdlibResult {
    expect_args(func, args, 1)?;
    Ok(Value::String(op(string_arg(func, args, 0)?)))
}

/// Clamp-and-validate `(start, end)` slice arguments against `len`.
pub(crate) fn slice_bounds(
    func: &str,
    args: &[Value],
    len: usize,
) -> Result<(usize, usize), StdlibError> {
    let start = number_arg(func, args, 1)?;
    let end = number_arg(func, args, 2)?;
    if start < 0.0 || end < 0.0 {
        return Err(StdlibError::bad_argument(func, "indices must be non-negative"));
    }
    let start = (start as usize).min(len);
    let end = (end as usize).min(len);
    if start > end {
        return Err(StdlibError::bad_argument(func, "start exceeds end"));
    }
    Ok((start, end))
}
