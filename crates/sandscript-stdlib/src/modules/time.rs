//! Date/time module backed by `chrono`. All times are UTC.

use super::{expect_args, number_arg, string_arg};
use crate::error::{StdlibError, StdlibResult};
use crate::Value;
use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use std::fmt::Write as _;

pub fn call(func: &str, args: Vec<Value>) -> StdlibResult {
    match func {
        "now" => {
            expect_args(func, &args, 0)?;
            Ok(Value::String(
                Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            ))
        }
        "timestamp" => {
            expect_args(func, &args, 0)?;
            Ok(Value::Number(Utc::now().timestamp() as f64))
        }
        "format" => {
            expect_args(func, &args, 2)?;
            let secs = number_arg(func, &args, 0)?;
            let fmt = string_arg(func, &args, 1)?;
            let when = timestamp_to_datetime(func, secs)?;
            // chrono panics on some malformed format strings when
            // formatting directly; go through the fallible writer.
            let mut out = String::new();
            write!(out, "{}", when.format(fmt))
                .map_err(|_| StdlibError::bad_argument(func, "invalid format string"))?;
            Ok(Value::String(out))
        }
        other => Err(StdlibError::UnknownFunction {
            module: "time".to_string(),
            func: other.to_string(),
        }),
    }
}

fn timestamp_to_datetime(func: &str, secs: f64) -> Result<DateTime<Utc>, StdlibError> {
    Utc.timestamp_opt(secs as i64, 0)
        .single()
        .ok_or_else(|| StdlibError::bad_argument(func, format!("timestamp {secs} out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_is_rfc3339() {
        let Value::String(now) = call("now", vec![]).unwrap() else {
            panic!("now should return a string");
        };
        assert!(now.ends_with('Z'));
        assert!(now.contains('T'));
    }

    #[test]
    fn timestamp_is_positive() {
        let Value::Number(ts) = call("timestamp", vec![]).unwrap() else {
            panic!("timestamp should return a number");
        };
        assert!(ts > 1_600_000_000.0);
    }

    #[test]
    fn format_known_instant() {
        let formatted = call(
            "format",
            vec![
                Value::Number(0.0),
                Value::String("%Y-%m-%d".into()),
            ],
        )
        .unwrap();
        assert_eq!(formatted, Value::String("1970-01-01".into()));
    }

    #[test]
    fn format_rejects_out_of_range() {
        assert!(call(
            "format",
            vec![Value::Number(1e18), Value::String("%Y".into())]
        )
        .is_err());
    }
}
