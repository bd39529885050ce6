//! Regular expressions backed by the `regex` crate.
//!
//! `regex` compiles patterns with a size limit and guarantees
//! linear-time matching, so hostile patterns cannot hang the sandbox
//! the way backtracking engines allow.

use super::{expect_args, string_arg};
use crate::error::{StdlibError, StdlibResult};
use crate::Value;
use regex::Regex;

/// Compiled-pattern size cap. Keeps pathological patterns from chewing
/// memory during compilation.
const PATTERN_SIZE_LIMIT: usize = 1 << 16;

pub fn call(func: &str, args: Vec<Value>) -> StdlibResult {
    match func {
        "matches" => {
            expect_args(func, &args, 2)?;
            let re = compile(func, string_arg(func, &args, 0)?)?;
            let text = string_arg(func, &args, 1)?;
            Ok(Value::Bool(re.is_match(text)))
        }
        "find" => {
            expect_args(func, &args, 2)?;
            let re = compile(func, string_arg(func, &args, 0)?)?;
            let text = string_arg(func, &args, 1)?;
            Ok(re
                .find(text)
                .map(|m| Value::String(m.as_str().to_string()))
                .unwrap_or(Value::Nil))
        }
        "find_all" => {
            expect_args(func, &args, 2)?;
            let re = compile(func, string_arg(func, &args, 0)?)?;
            let text = string_arg(func, &args, 1)?;
            Ok(Value::List(
                re.find_iter(text)
                    .map(|m| Value::String(m.as_str().to_string()))
                    .collect(),
            ))
        }
        "replace" => {
            expect_args(func, &args, 3)?;
            let re = compile(func, string_arg(func, &args, 0)?)?;
            let text = string_arg(func, &args, 1)?;
            let replacement = string_arg(func, &args, 2)?;
            Ok(Value::String(re.replace_all(text, replacement).into_owned()))
        }
        other => Err(StdlibError::UnknownFunction {
            module: "regex".to_string(),
            func: other.to_string(),
        }),
    }
}

fn compile(func: &str, pattern: &str) -> Result<Regex, StdlibError> {
    regex::RegexBuilder::new(pattern)
        .size_limit(PATTERN_SIZE_LIMIT)
        .build()
        .map_err(|e| StdlibError::bad_argument(func, format!("invalid pattern: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(text: &str) -> Value {
        Value::String(text.into())
    }

    #[test]
    fn matches_and_find() {
        assert_eq!(
            call("matches", vec![s(r"\d+"), s("abc 123")]),
            Ok(Value::Bool(true))
        );
        assert_eq!(call("find", vec![s(r"\d+"), s("abc 123")]), Ok(s("123")));
        assert_eq!(call("find", vec![s(r"\d+"), s("abc")]), Ok(Value::Nil));
    }

    #[test]
    fn find_all_collects() {
        assert_eq!(
            call("find_all", vec![s(r"\w+"), s("a b")]),
            Ok(Value::List(vec![s("a"), s("b")]))
        );
    }

    #[test]
    fn replace_all_occurrences() {
        assert_eq!(
            call("replace", vec![s(r"\d"), s("a1b2"), s("#")]),
            Ok(s("a#b#"))
        );
    }

    #[test]
    fn invalid_pattern_is_an_error() {
        assert!(call("matches", vec![s("("), s("x")]).is_err());
    }
}
