//! Error types and diagnostic reporting

use crate::ast::{Position, Span};
use crate::interp::RuntimeError;
use thiserror::Error;

/// Result type for lexing and parsing
pub type Result<T> = std::result::Result<T, CompileError>;

/// Errors raised while turning source text into a syntax tree
#[derive(Debug, Clone, Error)]
pub enum CompileError {
    #[error("Lexer error at {pos}: {message}")]
    Lexer {
        message: String,
        span: Span,
        pos: Position,
    },

    #[error("Parse error at {pos}: {message}")]
    Parser {
        message: String,
        span: Span,
        pos: Position,
    },
}

impl CompileError {
    pub fn lexer(message: impl Into<String>, span: Span, pos: Position) -> Self {
        Self::Lexer {
            message: message.into(),
            span,
            pos,
        }
    }

    pub fn parser(message: impl Into<String>, span: Span, pos: Position) -> Self {
        Self::Parser {
            message: message.into(),
            span,
            pos,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::Lexer { span, .. } | Self::Parser { span, .. } => *span,
        }
    }

    pub fn position(&self) -> Position {
        match self {
            Self::Lexer { pos, .. } | Self::Parser { pos, .. } => *pos,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Lexer { message, .. } | Self::Parser { message, .. } => message,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Lexer { .. } => "Lexer",
            Self::Parser { .. } => "Parse",
        }
    }
}

/// Any failure while running a source chunk
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// Print a front-end error with the offending source highlighted
pub fn report_error(filename: &str, source: &str, error: &CompileError) -> std::io::Result<()> {
    use ariadne::{Color, Label, Report, ReportKind, Source};

    let span = error.span();
    Report::build(ReportKind::Error, (filename, span.start..span.end))
        .with_message(format!("{} error at {}", error.kind(), error.position()))
        .with_label(
            Label::new((filename, span.start..span.end))
                .with_message(error.message())
                .with_color(Color::Red),
        )
        .finish()
        .eprint((filename, Source::from(source)))
}
