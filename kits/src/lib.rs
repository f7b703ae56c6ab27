//! kits: a small imperative scripting language
//!
//! Source text flows through the [`lexer`], the [`parser`] and the
//! tree-walking [`interp`]reter. [`Session`] glues the three together for
//! scripts and the [`repl`].

pub mod ast;
pub mod error;
pub mod interp;
pub mod lexer;
pub mod parser;
pub mod repl;
pub mod session;

pub use ast::{Node, Span};
pub use error::{CompileError, Error, Result};
pub use interp::{Interpreter, RuntimeError, Value};
pub use session::Session;
