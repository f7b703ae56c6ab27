//! Lexer: logos token table plus row/column tracking
//!
//! The [`Lexer`] hands out one token at a time with a single token of
//! lookahead ([`Lexer::current`]). Each scan restarts logos at the byte
//! offset where the previous token ended, so a lexer can be reused for any
//! number of source chunks through [`Lexer::reset`].

mod token;

pub use token::Token;

use logos::Logos;

use crate::ast::{Position, Span};
use crate::error::{CompileError, Result};
use crate::interp::Value;

/// A token together with its literal value, source text and location
#[derive(Debug, Clone, PartialEq)]
pub struct Lexeme {
    pub token: Token,
    /// Payload of literal tokens
    pub value: Option<Value>,
    pub text: String,
    pub span: Span,
    /// Row and column of the first character
    pub pos: Position,
}

impl Lexeme {
    /// Text shown in the token trace: the lexeme, or `<literal>`
    pub fn display_text(&self) -> &str {
        if self.value.is_some() {
            "<literal>"
        } else {
            &self.text
        }
    }
}

#[derive(Debug, Default)]
pub struct Lexer {
    source: String,
    offset: usize,
    pos: Position,
    current: Option<Lexeme>,
    /// Scan failure in place of the lookahead token
    pending: Option<CompileError>,
}

impl Lexer {
    /// Create a lexer over `source` with the first token already scanned
    pub fn new(source: &str) -> Result<Self> {
        let mut lexer = Lexer::default();
        lexer.reset(source)?;
        Ok(lexer)
    }

    /// Start over on a new source chunk and prime the lookahead token
    pub fn reset(&mut self, source: &str) -> Result<()> {
        self.source = source.to_string();
        self.offset = 0;
        self.pos = Position::default();
        self.current = None;
        self.pending = None;
        self.current = self.next_token()?;
        Ok(())
    }

    /// Scan the next token after the cursor. `Ok(None)` at end of input.
    pub fn next_token(&mut self) -> Result<Option<Lexeme>> {
        let rest = &self.source[self.offset..];
        let mut scanner = Token::lexer(rest);
        let Some(result) = scanner.next() else {
            for ch in rest.chars() {
                self.pos.step(ch);
            }
            self.offset = self.source.len();
            return Ok(None);
        };

        let range = scanner.span();
        for ch in rest[..range.start].chars() {
            self.pos.step(ch);
        }
        let start_pos = self.pos;
        let text = scanner.slice().to_string();
        for ch in text.chars() {
            self.pos.step(ch);
        }
        let span = Span::new(self.offset + range.start, self.offset + range.end);
        self.offset += range.end;

        match result {
            Ok(token) => Ok(Some(Lexeme {
                value: token.literal_value(),
                token,
                text,
                span,
                pos: start_pos,
            })),
            Err(()) => Err(CompileError::lexer(describe_error(&text), span, start_pos)),
        }
    }

    /// The lookahead token, `None` at end of input
    pub fn current(&self) -> Option<&Lexeme> {
        self.current.as_ref()
    }

    /// Consume the lookahead token and scan the one after it. A scan
    /// failure is held back as [`Lexer::pending_error`] and only raised
    /// once the parser reaches that position.
    pub fn advance(&mut self) -> Result<Option<Lexeme>> {
        if let Some(err) = &self.pending {
            return Err(err.clone());
        }
        let next = match self.next_token() {
            Ok(next) => next,
            Err(err) => {
                self.pending = Some(err);
                None
            }
        };
        let consumed = std::mem::replace(&mut self.current, next);
        if let Some(lexeme) = &consumed {
            tracing::trace!(
                target: "kits::tokens",
                "{} {} {}",
                lexeme.display_text(),
                lexeme.token.name(),
                lexeme.pos
            );
        }
        Ok(consumed)
    }

    /// The lexical error sitting where the lookahead token would be
    pub fn pending_error(&self) -> Option<&CompileError> {
        self.pending.as_ref()
    }

    /// No lookahead token and nothing left to report
    pub fn at_end(&self) -> bool {
        self.current.is_none() && self.pending.is_none()
    }

    /// Position of the lookahead token, or of the end of input
    pub fn position(&self) -> Position {
        self.current.as_ref().map_or(self.pos, |lexeme| lexeme.pos)
    }

    /// Span of the lookahead token, or an empty span at the end of input
    pub fn span(&self) -> Span {
        self.current
            .as_ref()
            .map_or(Span::point(self.source.len()), |lexeme| lexeme.span)
    }
}

fn describe_error(text: &str) -> String {
    match text.chars().next() {
        Some('"') => format!("malformed string literal: {text}"),
        Some('\'') => format!("malformed character literal: {text}"),
        Some(c) if c.is_ascii_digit() => format!("integer literal out of range: {text}"),
        _ => format!("unexpected character: {text:?}"),
    }
}

/// Tokenize a whole source text
pub fn tokenize(source: &str) -> Result<Vec<Lexeme>> {
    let mut lexer = Lexer::default();
    lexer.source = source.to_string();
    let mut lexemes = Vec::new();
    while let Some(lexeme) = lexer.next_token()? {
        lexemes.push(lexeme);
    }
    Ok(lexemes)
}
