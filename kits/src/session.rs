//! One lexer and one interpreter, fed source chunks

use crate::error::Error;
use crate::interp::{Interpreter, Value};
use crate::lexer::Lexer;
use crate::parser::Parser;

/// Long-lived state of a REPL or script run. Variables and subroutines
/// persist across [`Session::run`] calls until [`Session::reset`].
#[derive(Debug, Default)]
pub struct Session {
    lexer: Lexer,
    interpreter: Interpreter,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and evaluate each top-level unit of `source` in order.
    /// Returns the value of the last unit, `Void` for an empty chunk.
    pub fn run(&mut self, source: &str) -> Result<Value, Error> {
        self.lexer.reset(source)?;
        let mut last = Value::Void;
        let mut units = 0usize;
        while let Some(node) = Parser::new(&mut self.lexer).parse()? {
            last = self.interpreter.eval(&node)?;
            units += 1;
        }
        tracing::debug!(units, "evaluated chunk");
        Ok(last)
    }

    pub fn reset(&mut self) {
        self.interpreter.reset();
    }
}
