//! The execution environment: scoped bindings plus the builder that
//! assembles the sandbox's global namespace.

use std::collections::BTreeMap;

use sandscript_stdlib::{builtins, modules, Value};

use crate::command::NAMESPACES;

/// A single scope level.
#[derive(Debug, Clone)]
struct Scope {
    bindings: BTreeMap<String, Value>,
}

impl Scope {
    fn new() -> Self {
        Self {
            bindings: BTreeMap::new(),
        }
    }
}

/// Scoped variable environment with push/pop semantics.
///
/// Scope 0 is the sandbox's global namespace (intrinsics, safe modules,
/// command namespaces, caller bindings); scope 1 is the script scope
/// whose final bindings are returned to the caller. Loop bodies push
/// further scopes. Lookups search innermost-out; `define` writes the
/// innermost scope; `set` updates the first enclosing scope that holds
/// the name but never reaches the globals — the sandbox surface is
/// immutable from inside a script.
#[derive(Debug, Clone)]
pub struct Environment {
    scopes: Vec<Scope>,
}

impl Environment {
    fn with_globals(globals: BTreeMap<String, Value>) -> Self {
        let mut env = Self {
            scopes: vec![Scope {
                bindings: globals,
            }],
        };
        env.push_scope(); // the script scope
        env
    }

    /// Push a new scope (loop bodies).
    pub fn push_scope(&mut self) {
        self.scopes.push(Scope::new());
    }

    /// Pop the innermost scope. The global and script scopes are never
    /// popped.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 2 {
            self.scopes.pop();
        }
    }

    /// Define a variable in the current (innermost) scope.
    pub fn define(&mut self, name: &str, value: Value) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.bindings.insert(name.to_string(), value);
        }
    }

    /// Look up a variable, searching from innermost to outermost scope.
    pub fn get(&self, name: &str) -> Option<&Value> {
        for scope in self.scopes.iter().rev() {
            if let Some(value) = scope.bindings.get(name) {
                return Some(value);
            }
        }
        None
    }

    /// Update a variable in the first scope that holds it, stopping
    /// short of the globals. Returns `false` if not found.
    pub fn set(&mut self, name: &str, value: Value) -> bool {
        for scope in self.scopes.iter_mut().skip(1).rev() {
            if scope.bindings.contains_key(name) {
                scope.bindings.insert(name.to_string(), value);
                return true;
            }
        }
        false
    }

    /// The script scope's bindings — what `ExecutionResult.locals`
    /// reports back to the caller.
    pub fn script_bindings(&self) -> &BTreeMap<String, Value> {
        &self.scopes[1].bindings
    }
}

/// Assembles the two-namespace environment for one execution.
///
/// The global namespace contains, in layering order: the intrinsic
/// registry, the safe standard modules, the command namespaces, and
/// finally any caller-supplied bindings. Caller bindings may shadow
/// module bindings but never an intrinsic-registry name — `print` and
/// friends are non-overridable.
#[derive(Debug, Default)]
pub struct EnvironmentBuilder {
    extra: BTreeMap<String, Value>,
}

impl EnvironmentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge caller-supplied bindings (applied last).
    pub fn with_bindings(mut self, bindings: BTreeMap<String, Value>) -> Self {
        self.extra.extend(bindings);
        self
    }

    /// Build a fresh environment. Never reused across executions.
    pub fn build(&self) -> Environment {
        let mut globals = BTreeMap::new();
        for name in builtins::NAMES {
            globals.insert(name.to_string(), Value::Builtin(name.to_string()));
        }
        for name in modules::NAMES {
            globals.insert(name.to_string(), Value::Module(name.to_string()));
        }
        for name in NAMESPACES {
            globals.insert(name.to_string(), Value::Namespace(name.to_string()));
        }
        for (name, value) in &self.extra {
            if builtins::is_builtin(name) {
                tracing::warn!(name, "ignoring caller binding that shadows an intrinsic");
                continue;
            }
            globals.insert(name.clone(), value.clone());
        }
        Environment::with_globals(globals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_injects_the_full_surface() {
        let env = EnvironmentBuilder::new().build();
        assert_eq!(env.get("len"), Some(&Value::Builtin("len".into())));
        assert_eq!(env.get("math"), Some(&Value::Module("math".into())));
        assert_eq!(env.get("FILE"), Some(&Value::Namespace("FILE".into())));
    }

    #[test]
    fn caller_bindings_may_shadow_modules_but_not_intrinsics() {
        let mut bindings = BTreeMap::new();
        bindings.insert("math".to_string(), Value::Number(1.0));
        bindings.insert("print".to_string(), Value::Number(2.0));
        bindings.insert("player".to_string(), Value::String("ada".into()));
        let env = EnvironmentBuilder::new().with_bindings(bindings).build();

        assert_eq!(env.get("math"), Some(&Value::Number(1.0)));
        assert_eq!(env.get("print"), Some(&Value::Builtin("print".into())));
        assert_eq!(env.get("player"), Some(&Value::String("ada".into())));
    }

    #[test]
    fn script_scope_shadows_globals_without_mutating_them() {
        let mut env = EnvironmentBuilder::new().build();
        env.define("math", Value::Number(9.0));
        assert_eq!(env.get("math"), Some(&Value::Number(9.0)));
        assert_eq!(env.script_bindings().get("math"), Some(&Value::Number(9.0)));
    }

    #[test]
    fn set_never_reaches_globals() {
        let mut env = EnvironmentBuilder::new().build();
        // `math` exists only in the globals, so a bare reassignment
        // reports "not found" rather than overwriting the module.
        assert!(!env.set("math", Value::Nil));
        assert_eq!(env.get("math"), Some(&Value::Module("math".into())));
    }

    #[test]
    fn loop_scopes_pop_cleanly() {
        let mut env = EnvironmentBuilder::new().build();
        env.define("kept", Value::Number(1.0));
        env.push_scope();
        env.define("gone", Value::Number(2.0));
        env.pop_scope();
        assert_eq!(env.get("kept"), Some(&Value::Number(1.0)));
        assert_eq!(env.get("gone"), None);
        assert!(!env.script_bindings().contains_key("gone"));
    }

    #[test]
    fn script_and_global_scopes_cannot_be_popped() {
        let mut env = EnvironmentBuilder::new().build();
        env.pop_scope();
        env.pop_scope();
        env.define("x", Value::Nil);
        assert_eq!(env.script_bindings().get("x"), Some(&Value::Nil));
    }
}
