//! The Sandscript value model.
//!
//! Scripts only ever see these values. Callable surfaces (builtins,
//! modules, command namespaces) are represented as opaque name markers —
//! there are no function objects a script could introspect.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// A runtime value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The absent value.
    Nil,
    /// `true` / `false`.
    Bool(bool),
    /// All numbers are f64, like the surface syntax.
    Number(f64),
    /// UTF-8 text.
    String(String),
    /// Ordered sequence.
    List(Vec<Value>),
    /// String-keyed mapping (deterministically ordered).
    Record(BTreeMap<String, Value>),
    /// An intrinsic operation from the restricted registry, e.g. `len`.
    Builtin(String),
    /// A safe standard module, e.g. `math`.
    Module(String),
    /// A command namespace, e.g. `FILE`. Verb calls on it are forwarded
    /// to the host executor.
    Namespace(String),
}

impl Value {
    /// The type name shown in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::Record(_) => "record",
            Self::Builtin(_) => "builtin",
            Self::Module(_) => "module",
            Self::Namespace(_) => "namespace",
        }
    }

    /// Truthiness: nil and false are falsy; zero, the empty string, and
    /// empty collections are falsy; everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Nil => false,
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0,
            Self::String(s) => !s.is_empty(),
            Self::List(items) => !items.is_empty(),
            Self::Record(fields) => !fields.is_empty(),
            Self::Builtin(_) | Self::Module(_) | Self::Namespace(_) => true,
        }
    }

    /// The string `print` produces for this value: strings are shown
    /// raw, everything else uses the literal-like representation.
    pub fn display_string(&self) -> String {
        match self {
            Self::String(s) => s.clone(),
            other => other.repr_string(),
        }
    }

    /// Literal-like representation: strings are quoted, numbers drop a
    /// redundant `.0`, collections nest.
    pub fn repr_string(&self) -> String {
        match self {
            Self::Nil => "nil".to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Number(n) => format_number(*n),
            Self::String(s) => format!("\"{s}\""),
            Self::List(items) => {
                let inner: Vec<String> = items.iter().map(Value::repr_string).collect();
                format!("[{}]", inner.join(", "))
            }
            Self::Record(fields) => {
                let inner: Vec<String> = fields
                    .iter()
                    .map(|(k, v)| format!("{k}: {}", v.repr_string()))
                    .collect();
                format!("{{{}}}", inner.join(", "))
            }
            Self::Builtin(name) => format!("<builtin {name}>"),
            Self::Module(name) => format!("<module {name}>"),
            Self::Namespace(name) => format!("<namespace {name}>"),
        }
    }

    /// Convert to a `serde_json::Value`. Callable markers become their
    /// descriptive strings.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Nil => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Self::String(s) => serde_json::Value::String(s.clone()),
            Self::List(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Self::Record(fields) => serde_json::Value::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Self::Builtin(_) | Self::Module(_) | Self::Namespace(_) => {
                serde_json::Value::String(self.repr_string())
            }
        }
    }

    /// Build a value from decoded JSON.
    pub fn from_json(json: serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Nil,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(0.0)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(fields) => Value::Record(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, Value::from_json(v)))
                    .collect(),
            ),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_string())
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Nil => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => serializer.serialize_f64(*n),
            Self::String(s) => serializer.serialize_str(s),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Record(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (k, v) in fields {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            Self::Builtin(_) | Self::Module(_) | Self::Namespace(_) => {
                serializer.serialize_str(&self.repr_string())
            }
        }
    }
}

/// Format a number the way the surface syntax writes it: `42`, not `42.0`.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness() {
        assert!(!Value::Nil.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(!Value::Number(0.0).is_truthy());
        assert!(!Value::String(String::new()).is_truthy());
        assert!(!Value::List(vec![]).is_truthy());
        assert!(Value::Number(-1.0).is_truthy());
        assert!(Value::String("x".into()).is_truthy());
        assert!(Value::Module("math".into()).is_truthy());
    }

    #[test]
    fn display_strings_are_raw() {
        assert_eq!(Value::String("ok".into()).display_string(), "ok");
        assert_eq!(
            Value::List(vec![Value::String("a".into())]).display_string(),
            "[\"a\"]"
        );
    }

    #[test]
    fn number_formatting() {
        assert_eq!(format_number(42.0), "42");
        assert_eq!(format_number(3.5), "3.5");
        assert_eq!(format_number(-7.0), "-7");
    }

    #[test]
    fn record_repr_is_ordered() {
        let mut fields = BTreeMap::new();
        fields.insert("b".to_string(), Value::Number(2.0));
        fields.insert("a".to_string(), Value::Number(1.0));
        assert_eq!(Value::Record(fields).repr_string(), "{a: 1, b: 2}");
    }

    #[test]
    fn json_round_trip() {
        let mut fields = BTreeMap::new();
        fields.insert("n".to_string(), Value::Number(1.5));
        fields.insert("s".to_string(), Value::String("x".into()));
        fields.insert("l".to_string(), Value::List(vec![Value::Bool(true)]));
        let original = Value::Record(fields);
        let back = Value::from_json(original.to_json());
        assert_eq!(original, back);
    }

    #[test]
    fn callables_serialize_as_strings() {
        let json = serde_json::to_string(&Value::Namespace("FILE".into())).unwrap();
        assert_eq!(json, "\"<namespace FILE>\"");
    }

    #[test]
    fn nil_serializes_as_null() {
        let json = serde_json::to_string(&Value::Nil).unwrap();
        assert_eq!(json, "null");
    }
}
