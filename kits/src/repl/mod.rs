//! REPL (Read-Eval-Print Loop)
//!
//! Lines are buffered until every `{` is closed, then the whole chunk is
//! handed to the [`Session`]. A blank line at the prompt exits.

use crate::error::{Error, report_error};
use crate::session::Session;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::path::PathBuf;

const PROMPT: &str = "> ";
const CONTINUATION_PROMPT: &str = ". ";
const HISTORY_FILE: &str = ".kits_history";

/// Brace state of a partially entered chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Balance {
    Balanced,
    /// This many `{` are still open
    Open(usize),
    /// A `}` with no matching `{`
    Unmatched,
}

/// Count braces outside string and char literals and `//` comments
pub fn brace_balance(source: &str) -> Balance {
    let mut depth = 0usize;
    let mut chars = source.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' | '\'' => {
                while let Some(inner) = chars.next() {
                    match inner {
                        '\\' => {
                            chars.next();
                        }
                        '\n' if c == '\'' => break,
                        q if q == c => break,
                        _ => {}
                    }
                }
            }
            '/' if chars.peek() == Some(&'/') => {
                for inner in chars.by_ref() {
                    if inner == '\n' {
                        break;
                    }
                }
            }
            '{' => depth += 1,
            '}' => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return Balance::Unmatched,
            },
            _ => {}
        }
    }
    if depth == 0 {
        Balance::Balanced
    } else {
        Balance::Open(depth)
    }
}

/// REPL state
pub struct Repl {
    editor: DefaultEditor,
    session: Session,
    history_path: Option<PathBuf>,
}

impl Repl {
    pub fn new() -> RlResult<Self> {
        let mut repl = Repl {
            editor: DefaultEditor::new()?,
            session: Session::new(),
            history_path: std::env::var_os("HOME").map(|home| PathBuf::from(home).join(HISTORY_FILE)),
        };
        if let Some(path) = &repl.history_path {
            let _ = repl.editor.load_history(path);
        }
        Ok(repl)
    }

    pub fn run(&mut self) -> RlResult<()> {
        println!("kits REPL {}", env!("CARGO_PKG_VERSION"));
        println!("Type :help for help; a blank line or :quit exits.\n");

        let mut buffer = String::new();
        loop {
            let prompt = if buffer.is_empty() { PROMPT } else { CONTINUATION_PROMPT };
            match self.editor.readline(prompt) {
                Ok(line) => {
                    if buffer.is_empty() {
                        let trimmed = line.trim();
                        if trimmed.is_empty() {
                            break;
                        }
                        if trimmed.starts_with(':') {
                            let _ = self.editor.add_history_entry(trimmed);
                            if self.handle_command(trimmed) {
                                break;
                            }
                            continue;
                        }
                    }

                    buffer.push_str(&line);
                    buffer.push('\n');
                    match brace_balance(&buffer) {
                        Balance::Open(_) => continue,
                        Balance::Unmatched => eprintln!("Error: unmatched '}}'"),
                        Balance::Balanced => {
                            let _ = self.editor.add_history_entry(buffer.trim_end());
                            self.eval_input(&buffer);
                        }
                    }
                    buffer.clear();
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    buffer.clear();
                }
                Err(ReadlineError::Eof) => break,
                Err(err) => {
                    eprintln!("Error: {err}");
                    break;
                }
            }
        }

        if let Some(path) = &self.history_path {
            let _ = self.editor.save_history(path);
        }
        Ok(())
    }

    /// Handle a `:command`. Returns true to exit.
    fn handle_command(&mut self, cmd: &str) -> bool {
        match cmd {
            ":quit" | ":q" | ":exit" => true,
            ":help" | ":h" | ":?" => {
                print_help();
                false
            }
            ":reset" => {
                self.session.reset();
                println!("Session reset.");
                false
            }
            _ => {
                println!("Unknown command: {cmd}");
                println!("Type :help for help.");
                false
            }
        }
    }

    fn eval_input(&mut self, source: &str) {
        match self.session.run(source) {
            Ok(value) => println!("{value}"),
            Err(Error::Compile(err)) => {
                if report_error("<repl>", source, &err).is_err() {
                    eprintln!("{err}");
                }
            }
            Err(Error::Runtime(err)) => eprintln!("{err}"),
        }
    }
}

fn print_help() {
    println!("kits REPL commands:");
    println!("  :help, :h, :?   Show this help");
    println!("  :quit, :q       Exit the REPL");
    println!("  :reset          Forget all variables and subroutines");
    println!();
    println!("Input spanning several lines is collected until its braces balance:");
    println!("  let x: double = 2;");
    println!("  subr sq(n: int): int {{ return n * n; }}");
    println!("  check (sq(3)) on case 9: x = 1.5; then x = 0;");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balanced_input() {
        assert_eq!(brace_balance("let x = 1;"), Balance::Balanced);
        assert_eq!(brace_balance("{ { } }"), Balance::Balanced);
    }

    #[test]
    fn test_open_braces() {
        assert_eq!(brace_balance("subr f() {"), Balance::Open(1));
        assert_eq!(brace_balance("{ {\n}"), Balance::Open(1));
    }

    #[test]
    fn test_unmatched_close() {
        assert_eq!(brace_balance("}"), Balance::Unmatched);
        assert_eq!(brace_balance("{ } }"), Balance::Unmatched);
    }

    #[test]
    fn test_braces_in_literals_are_ignored() {
        assert_eq!(brace_balance(r#"let s = "{";"#), Balance::Balanced);
        assert_eq!(brace_balance(r#"let s = "\"{";"#), Balance::Balanced);
        assert_eq!(brace_balance("let c = '}';"), Balance::Balanced);
        assert_eq!(brace_balance(r"let c = '\'';"), Balance::Balanced);
    }

    #[test]
    fn test_braces_in_comments_are_ignored() {
        assert_eq!(brace_balance("let x = 1; // {\n"), Balance::Balanced);
        assert_eq!(brace_balance("{ // }\n"), Balance::Open(1));
    }
}
