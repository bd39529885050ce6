//! The static security policy scripts are validated against.

use std::collections::BTreeSet;

/// Module names a script may never import.
const DENIED_MODULES: &[&str] = &[
    "env", "ffi", "file", "fs", "http", "io", "net", "os", "proc", "process", "reflect", "shell",
    "socket", "sys",
];

/// Modules known safe. Importing anything outside both sets produces a
/// warning, not a violation — unknown modules are suspicious but not
/// auto-blocked, so new safe modules do not break old policies.
const ALLOWED_MODULES: &[&str] = &["json", "list", "math", "random", "regex", "string", "time"];

/// Bare-name calls a script may never make: dynamic execution of code
/// as data, resource-handle opening, and environment introspection.
const DENIED_CALLS: &[&str] = &[
    "compile", "delattr", "eval", "exec", "getattr", "globals", "inspect", "locals", "open",
    "setattr", "spawn", "system",
];

/// Attribute names that expose execution machinery.
const DENIED_ATTRIBUTES: &[&str] = &[
    "__builtins__",
    "__class__",
    "__closure__",
    "__code__",
    "__dict__",
    "__globals__",
    "__import__",
    "__loader__",
    "__locals__",
    "__subclasses__",
];

/// The allow/deny rule set a script must satisfy before it runs.
///
/// Read-only after construction; share one instance across interpreters
/// via `Arc`. Built as a constructor parameter, never a global, so
/// tests can run isolated instances with different policies.
#[derive(Debug, Clone)]
pub struct SecurityPolicy {
    denied_modules: BTreeSet<String>,
    allowed_modules: BTreeSet<String>,
    denied_calls: BTreeSet<String>,
    denied_attributes: BTreeSet<String>,
}

impl SecurityPolicy {
    /// Build a policy from explicit sets.
    pub fn new(
        denied_modules: impl IntoIterator<Item = String>,
        allowed_modules: impl IntoIterator<Item = String>,
        denied_calls: impl IntoIterator<Item = String>,
        denied_attributes: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            denied_modules: denied_modules.into_iter().collect(),
            allowed_modules: allowed_modules.into_iter().collect(),
            denied_calls: denied_calls.into_iter().collect(),
            denied_attributes: denied_attributes.into_iter().collect(),
        }
    }

    pub fn is_denied_module(&self, name: &str) -> bool {
        self.denied_modules.contains(name)
    }

    pub fn is_allowed_module(&self, name: &str) -> bool {
        self.allowed_modules.contains(name)
    }

    pub fn is_denied_call(&self, name: &str) -> bool {
        self.denied_calls.contains(name)
    }

    /// Denied attributes combine the explicit set with a structural
    /// rule: any `__dunder__`-shaped name is reserved for machinery and
    /// never legitimate in a script.
    pub fn is_denied_attribute(&self, name: &str) -> bool {
        if name.starts_with("__") && name.ends_with("__") && name.len() > 4 {
            return true;
        }
        self.denied_attributes.contains(name)
    }
}

impl Default for SecurityPolicy {
    fn default() -> Self {
        Self::new(
            DENIED_MODULES.iter().map(|s| s.to_string()),
            ALLOWED_MODULES.iter().map(|s| s.to_string()),
            DENIED_CALLS.iter().map(|s| s.to_string()),
            DENIED_ATTRIBUTES.iter().map(|s| s.to_string()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_denies_the_dangerous_set() {
        let policy = SecurityPolicy::default();
        assert!(policy.is_denied_module("os"));
        assert!(policy.is_denied_module("fs"));
        assert!(policy.is_denied_call("eval"));
        assert!(policy.is_denied_call("open"));
        assert!(policy.is_denied_attribute("__globals__"));
    }

    #[test]
    fn allowed_and_unknown_are_distinct() {
        let policy = SecurityPolicy::default();
        assert!(policy.is_allowed_module("json"));
        assert!(!policy.is_allowed_module("maths"));
        assert!(!policy.is_denied_module("maths"));
    }

    #[test]
    fn dunder_rule_catches_unlisted_names() {
        let policy = SecurityPolicy::default();
        assert!(policy.is_denied_attribute("__reduce__"));
        assert!(!policy.is_denied_attribute("upper"));
        assert!(!policy.is_denied_attribute("_private"));
    }

    #[test]
    fn custom_policy_is_independent() {
        let policy = SecurityPolicy::new(
            ["mesh".to_string()],
            ["math".to_string()],
            [],
            [],
        );
        assert!(policy.is_denied_module("mesh"));
        assert!(!policy.is_denied_module("os"));
        assert!(!policy.is_denied_call("eval"));
    }
}
