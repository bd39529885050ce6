//! Sandscript execution engine.
//!
//! Accepts untrusted script text, statically rejects anything matching
//! the security policy before any code runs, executes the rest in a
//! deliberately impoverished environment under a hard wall-clock
//! deadline, and routes every outside-world effect through one
//! host-supplied command executor.
//!
//! ```
//! use sandscript_engine::{ExecutionConfig, Interpreter};
//!
//! let interpreter = Interpreter::new(ExecutionConfig::default());
//! let result = interpreter.execute("print(\"hello\")");
//! assert!(result.success);
//! assert_eq!(result.output, vec!["hello"]);
//! ```

mod command;
mod deadline;
mod env;
mod error;
mod evaluator;
mod interpreter;
mod output;
mod policy;
mod validator;

pub use command::{CommandError, CommandExecutor, CommandRequest, SimulatedExecutor, NAMESPACES};
pub use deadline::{run_with_deadline, DeadlineError};
pub use env::{Environment, EnvironmentBuilder};
pub use error::{EvalError, FaultKind};
pub use interpreter::{ExecutionConfig, ExecutionResult, Interpreter};
pub use output::OutputCollector;
pub use policy::SecurityPolicy;
pub use validator::SyntaxValidator;

// Re-export the value model — it appears in results and executor
// signatures.
pub use sandscript_stdlib::Value;
pub use sandscript_types::{ScriptError, ValidationReport};
