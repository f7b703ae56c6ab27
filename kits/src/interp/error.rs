//! Runtime errors for the interpreter

use std::fmt;

/// Runtime error during evaluation
#[derive(Debug, Clone)]
pub struct RuntimeError {
    pub kind: ErrorKind,
    pub message: String,
}

/// Kinds of runtime errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Undeclared identifier or subroutine
    Name,
    /// Operand kind mismatch, non-boolean condition
    Type,
    /// General contract violation: redeclaration, wrong argument count,
    /// bad assignment target
    Runtime,
    /// Division or modulo by an integral zero
    ZeroDivision,
    /// Construct that parses but has no evaluation semantics yet
    NotImplemented,
}

impl ErrorKind {
    pub fn name(self) -> &'static str {
        match self {
            ErrorKind::Name => "NameError",
            ErrorKind::Type => "TypeError",
            ErrorKind::Runtime => "RuntimeError",
            ErrorKind::ZeroDivision => "ZeroDivisionError",
            ErrorKind::NotImplemented => "NotImplementedError",
        }
    }
}

impl RuntimeError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        RuntimeError {
            kind,
            message: message.into(),
        }
    }

    pub fn undefined_variable(name: &str) -> Self {
        Self::new(ErrorKind::Name, format!("undefined variable: {name}"))
    }

    pub fn undefined_subroutine(name: &str) -> Self {
        Self::new(ErrorKind::Name, format!("undefined subroutine: {name}"))
    }

    pub fn unknown_type(name: &str) -> Self {
        Self::new(ErrorKind::Name, format!("unknown type: {name}"))
    }

    pub fn type_error(expected: &str, got: &str) -> Self {
        Self::new(
            ErrorKind::Type,
            format!("type error: expected {expected}, got {got}"),
        )
    }

    pub fn division_by_zero() -> Self {
        Self::new(ErrorKind::ZeroDivision, "division by zero")
    }

    pub fn arity_mismatch(name: &str, expected: usize, got: usize) -> Self {
        Self::new(
            ErrorKind::Runtime,
            format!("subroutine {name} expects {expected} argument(s), got {got}"),
        )
    }

    pub fn redeclaration(name: &str) -> Self {
        Self::new(
            ErrorKind::Runtime,
            format!("variable already declared in this scope: {name}"),
        )
    }

    pub fn invalid_assignment_target() -> Self {
        Self::new(ErrorKind::Runtime, "assignment target must be an identifier")
    }

    pub fn type_mismatch(declared: &str, got: &str) -> Self {
        Self::new(
            ErrorKind::Runtime,
            format!("type mismatch in initialization: declared {declared}, got {got}"),
        )
    }

    pub fn void_variable(name: &str) -> Self {
        Self::new(
            ErrorKind::Runtime,
            format!("variable {name} cannot hold a void value"),
        )
    }

    pub fn uninitialized(name: &str, ty: &str) -> Self {
        Self::new(
            ErrorKind::Runtime,
            format!("variable {name} of user-defined type {ty} must be initialized"),
        )
    }

    pub fn not_implemented(what: &str) -> Self {
        Self::new(
            ErrorKind::NotImplemented,
            format!("{what} evaluation is not implemented"),
        )
    }

    pub fn return_outside_subroutine() -> Self {
        Self::new(ErrorKind::Runtime, "return outside of subroutine")
    }

    pub fn stack_overflow() -> Self {
        Self::new(ErrorKind::Runtime, "stack overflow: too deep recursion")
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.name(), self.message)
    }
}

impl std::error::Error for RuntimeError {}

/// Result type for interpreter operations
pub type InterpResult<T> = Result<T, RuntimeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undefined_variable() {
        let err = RuntimeError::undefined_variable("foo");
        assert_eq!(err.kind, ErrorKind::Name);
        assert!(err.message.contains("foo"));
    }

    #[test]
    fn test_undefined_subroutine() {
        let err = RuntimeError::undefined_subroutine("bar");
        assert_eq!(err.kind, ErrorKind::Name);
        assert!(err.message.contains("bar"));
    }

    #[test]
    fn test_type_error() {
        let err = RuntimeError::type_error("numeric", "bool");
        assert_eq!(err.kind, ErrorKind::Type);
        assert!(err.message.contains("numeric"));
        assert!(err.message.contains("bool"));
    }

    #[test]
    fn test_division_by_zero() {
        let err = RuntimeError::division_by_zero();
        assert_eq!(err.kind, ErrorKind::ZeroDivision);
    }

    #[test]
    fn test_arity_mismatch() {
        let err = RuntimeError::arity_mismatch("add", 2, 3);
        assert_eq!(err.kind, ErrorKind::Runtime);
        assert!(err.message.contains("add"));
        assert!(err.message.contains("2"));
        assert!(err.message.contains("3"));
    }

    #[test]
    fn test_not_implemented() {
        let err = RuntimeError::not_implemented("struct declaration");
        assert_eq!(err.kind, ErrorKind::NotImplemented);
        assert!(err.message.starts_with("struct declaration"));
    }

    #[test]
    fn test_display_prefixes_kind() {
        assert_eq!(
            RuntimeError::division_by_zero().to_string(),
            "ZeroDivisionError: division by zero"
        );
        assert_eq!(
            RuntimeError::undefined_variable("x").to_string(),
            "NameError: undefined variable: x"
        );
    }

    #[test]
    fn test_kinds_are_distinct() {
        assert_ne!(
            RuntimeError::redeclaration("x").kind,
            RuntimeError::not_implemented("enum declaration").kind
        );
        assert_ne!(ErrorKind::Runtime, ErrorKind::Type);
    }
}
