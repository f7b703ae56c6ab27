//! Tree-walking interpreter: values, runtime state and evaluation

mod error;
mod eval;
mod runtime;
mod scope;
mod value;

pub use error::{ErrorKind, InterpResult, RuntimeError};
pub use eval::{Flow, Interpreter, MAX_CALL_DEPTH};
pub use runtime::{Runtime, Subroutine};
pub use scope::ScopeStack;
pub use value::{FromValue, Value, ValueType};
