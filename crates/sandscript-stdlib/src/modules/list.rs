//! List utilities. Values are immutable: mutating operations return a
//! new list. Also backs method-call sugar on list values.

use super::{expect_args, list_arg, string_arg};
use crate::error::{StdlibError, StdlibResult};
use crate::Value;

pub fn call(func: &str, args: Vec<Value>) -> StdlibResult {
    match func {
        "length" => {
            expect_args(func, &args, 1)?;
            Ok(Value::Number(list_arg(func, &args, 0)?.len() as f64))
        }
        "contains" => {
            expect_args(func, &args, 2)?;
            let items = list_arg(func, &args, 0)?;
            Ok(Value::Bool(items.contains(&args[1])))
        }
        "push" => {
            expect_args(func, &args, 2)?;
            let mut items = list_arg(func, &args, 0)?.to_vec();
            items.push(args[1].clone());
            Ok(Value::List(items))
        }
        "first" => {
            expect_args(func, &args, 1)?;
            Ok(list_arg(func, &args, 0)?.first().cloned().unwrap_or(Value::Nil))
        }
        "last" => {
            expect_args(func, &args, 1)?;
            Ok(list_arg(func, &args, 0)?.last().cloned().unwrap_or(Value::Nil))
        }
        "reverse" => {
            expect_args(func, &args, 1)?;
            let mut items = list_arg(func, &args, 0)?.to_vec();
            items.reverse();
            Ok(Value::List(items))
        }
        "sort" => {
            expect_args(func, &args, 1)?;
            sort(func, list_arg(func, &args, 0)?)
        }
        "join" => {
            expect_args(func, &args, 2)?;
            let items = list_arg(func, &args, 0)?;
            let sep = string_arg(func, &args, 1)?;
            let parts: Vec<String> = items.iter().map(Value::display_string).collect();
            Ok(Value::String(parts.join(sep)))
        }
        "sum" => {
            expect_args(func, &args, 1)?;
            let mut total = 0.0;
            for item in list_arg(func, &args, 0)? {
                match item {
                    Value::Number(n) => total += n,
                    other => {
                        return Err(StdlibError::bad_argument(
                            func,
                            format!("expected numbers, got {}", other.type_name()),
                        ))
                    }
                }
            }
            Ok(Value::Number(total))
        }
        "slice" => {
            expect_args(func, &args, 3)?;
            let items = list_arg(func, &args, 0)?;
            let (start, end) = super::string::slice_bounds(func, &args, items.len())?;
            Ok(Value::List(items[start..end].to_vec()))
        }
        other => Err(StdlibError::UnknownFunction {
            module: "list".to_string(),
            func: other.to_string(),
        }),
    }
}

/// Sort a homogeneous list of numbers or strings.
fn sort(func: &str, items: &[Value]) -> StdlibResult {
    if items.is_empty() {
        return Ok(Value::List(Vec::new()));
    }
    match items[0] {
        Value::Number(_) => {
            let mut nums = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::Number(n) => nums.push(*n),
                    other => return Err(mixed(func, other)),
                }
            }
            nums.sort_by(f64::total_cmp);
            Ok(Value::List(nums.into_iter().map(Value::Number).collect()))
        }
        Value::String(_) => {
            let mut strs = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(s) => strs.push(s.clone()),
                    other => return Err(mixed(func, other)),
                }
            }
            strs.sort();
            Ok(Value::List(strs.into_iter().map(Value::String).collect()))
        }
        ref other => Err(StdlibError::bad_argument(
            func,
            format!("cannot sort a list of {}", other.type_name()),
        )),
    }
}

fn mixed(func: &str, got: &Value) -> StdlibError {
    StdlibError::bad_argument(
        func,
        format!("cannot sort a mixed list (found {})", got.type_name()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nums(values: &[f64]) -> Value {
        Value::List(values.iter().map(|n| Value::Number(*n)).collect())
    }

    #[test]
    fn push_returns_new_list() {
        let original = nums(&[1.0]);
        let pushed = call("push", vec![original.clone(), Value::Number(2.0)]).unwrap();
        assert_eq!(pushed, nums(&[1.0, 2.0]));
        assert_eq!(original, nums(&[1.0]));
    }

    #[test]
    fn first_last_on_empty_are_nil() {
        assert_eq!(call("first", vec![nums(&[])]), Ok(Value::Nil));
        assert_eq!(call("last", vec![nums(&[])]), Ok(Value::Nil));
    }

    #[test]
    fn sort_numbers_and_strings() {
        assert_eq!(
            call("sort", vec![nums(&[3.0, 1.0, 2.0])]),
            Ok(nums(&[1.0, 2.0, 3.0]))
        );
        let strs = Value::List(vec![
            Value::String("b".into()),
            Value::String("a".into()),
        ]);
        assert_eq!(
            call("sort", vec![strs]),
            Ok(Value::List(vec![
                Value::String("a".into()),
                Value::String("b".into())
            ]))
        );
    }

    #[test]
    fn sort_mixed_rejected() {
        let mixed = Value::List(vec![Value::Number(1.0), Value::String("a".into())]);
        assert!(call("sort", vec![mixed]).is_err());
    }

    #[test]
    fn join_stringifies() {
        let items = Value::List(vec![Value::Number(1.0), Value::String("a".into())]);
        assert_eq!(
            call("join", vec![items, Value::String(",".into())]),
            Ok(Value::String("1,a".into()))
        );
    }

    #[test]
    fn sum_rejects_non_numbers() {
        assert_eq!(call("sum", vec![nums(&[1.0, 2.5])]), Ok(Value::Number(3.5)));
        let bad = Value::List(vec![Value::String("x".into())]);
        assert!(call("sum", vec![bad]).is_err());
    }

    #[test]
    fn slice_list() {
        assert_eq!(
            call(
                "slice",
                vec![nums(&[1.0, 2.0, 3.0]), Value::Number(1.0), Value::Number(3.0)]
            ),
            Ok(nums(&[2.0, 3.0]))
        );
    }
}
