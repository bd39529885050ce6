//! Structured-data encoding backed by `serde_json`.
//!
//! Decoding can only ever produce plain data values (nil, bool, number,
//! string, list, record) — there is no format here that reconstructs
//! callable or host objects.

use super::{expect_args, string_arg};
use crate::error::{StdlibError, StdlibResult};
use crate::Value;

pub fn call(func: &str, args: Vec<Value>) -> StdlibResult {
    match func {
        "encode" => {
            expect_args(func, &args, 1)?;
            serde_json::to_string(&args[0].to_json())
                .map(Value::String)
                .map_err(|e| StdlibError::bad_argument(func, e.to_string()))
        }
        "pretty" => {
            expect_args(func, &args, 1)?;
            serde_json::to_string_pretty(&args[0].to_json())
                .map(Value::String)
                .map_err(|e| StdlibError::bad_argument(func, e.to_string()))
        }
        "decode" => {
            expect_args(func, &args, 1)?;
            let text = string_arg(func, &args, 0)?;
            let parsed: serde_json::Value = serde_json::from_str(text)
                .map_err(|e| StdlibError::bad_argument(func, format!("invalid JSON: {e}")))?;
            Ok(Value::from_json(parsed))
        }
        other => Err(StdlibError::UnknownFunction {
            module: "json".to_string(),
            func: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn encode_record() {
        let mut fields = BTreeMap::new();
        fields.insert("a".to_string(), Value::Number(1.0));
        let encoded = call("encode", vec![Value::Record(fields)]).unwrap();
        assert_eq!(encoded, Value::String("{\"a\":1.0}".into()));
    }

    #[test]
    fn decode_into_values() {
        let decoded = call("decode", vec![Value::String("[1, \"x\", null]".into())]).unwrap();
        assert_eq!(
            decoded,
            Value::List(vec![
                Value::Number(1.0),
                Value::String("x".into()),
                Value::Nil
            ])
        );
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(call("decode", vec![Value::String("{nope".into())]).is_err());
    }

    #[test]
    fn decode_round_trips_encode() {
        let original = Value::List(vec![Value::Bool(true), Value::String("hi".into())]);
        let encoded = call("encode", vec![original.clone()]).unwrap();
        let decoded = call("decode", vec![encoded]).unwrap();
        assert_eq!(original, decoded);
    }
}
