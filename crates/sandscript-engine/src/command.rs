//! Command dispatch: the only path by which a script can affect the
//! outside world.
//!
//! The five namespaces are a fixed, statically enumerable set. A verb
//! call like `FILE.NEW(name="t.txt")` is translated into one opaque
//! [`CommandRequest`] and handed to the host-supplied executor; the
//! engine never interprets the request and never validates verb names —
//! the host is the authority on what verbs exist.

use std::collections::BTreeMap;

use sandscript_stdlib::Value;
use serde::Serialize;
use thiserror::Error;

/// The command namespaces exposed to scripts.
pub const NAMESPACES: &[&str] = &["FILE", "MESH", "PROMPT", "STATE", "LOG"];

/// One namespace-verb invocation, ready for the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandRequest {
    /// `"NAMESPACE.VERB"`, e.g. `"FILE.NEW"`.
    pub command: String,
    /// Named parameters. Positional arguments are keyed `arg0`, `arg1`, …
    /// so the request is always a mapping with deterministic order.
    pub params: BTreeMap<String, Value>,
}

impl CommandRequest {
    pub fn new(namespace: &str, verb: &str, params: BTreeMap<String, Value>) -> Self {
        Self {
            command: format!("{namespace}.{verb}"),
            params,
        }
    }
}

/// An error raised by the host executor. Propagates as a runtime fault
/// of the script that issued the command.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct CommandError(pub String);

impl CommandError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// The host-side implementation behind the command namespaces.
///
/// Called synchronously, once per verb invocation; may block. The
/// engine imposes no per-command timeout — only the script-wide
/// deadline.
pub trait CommandExecutor: Send + Sync {
    fn dispatch(&self, request: CommandRequest) -> Result<Value, CommandError>;
}

/// Default executor: echoes every request back as
/// `{command, params, status: "simulated"}` so the engine is fully
/// testable without a live host.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimulatedExecutor;

impl CommandExecutor for SimulatedExecutor {
    fn dispatch(&self, request: CommandRequest) -> Result<Value, CommandError> {
        let mut echo = BTreeMap::new();
        echo.insert("command".to_string(), Value::String(request.command));
        echo.insert("params".to_string(), Value::Record(request.params));
        echo.insert("status".to_string(), Value::String("simulated".to_string()));
        Ok(Value::Record(echo))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_joins_namespace_and_verb() {
        let req = CommandRequest::new("FILE", "NEW", BTreeMap::new());
        assert_eq!(req.command, "FILE.NEW");
    }

    #[test]
    fn simulated_executor_echoes() {
        let mut params = BTreeMap::new();
        params.insert("name".to_string(), Value::String("t.txt".into()));
        let req = CommandRequest::new("FILE", "NEW", params);

        let Value::Record(echo) = SimulatedExecutor.dispatch(req).unwrap() else {
            panic!("expected a record");
        };
        assert_eq!(echo.get("command"), Some(&Value::String("FILE.NEW".into())));
        assert_eq!(echo.get("status"), Some(&Value::String("simulated".into())));
        let Some(Value::Record(params)) = echo.get("params") else {
            panic!("expected params record");
        };
        assert_eq!(params.get("name"), Some(&Value::String("t.txt".into())));
    }

    #[test]
    fn request_serializes() {
        let req = CommandRequest::new("LOG", "INFO", BTreeMap::new());
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("\"LOG.INFO\""));
    }
}
