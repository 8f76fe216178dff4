mod builtin;
mod config;
mod context;
mod environment;
mod error;
mod interpreter;
mod parser;
mod value;

#[cfg(test)]
mod test_utils;

pub use config::{Options, UnboundNames, DEFAULT_MAX_DEPTH, MAX_NESTING};
pub use context::{run_source, Program};
pub use environment::Environment;
pub use error::{EvalError, SchemeError};
pub use interpreter::{EvaluationResult, Interpreter};
pub use parser::{parse, Node};
pub use value::{Function, Value};
