//! Expression grammar
//!
//! Tiers from loosest to tightest binding:
//!
//! ```text
//! expr           := comparison (('&&' | '||') comparison)*
//! comparison     := bit_or (cmp_op bit_or)*        cmp_op: < <= > >= == !=
//! bit_or         := bit_xor ('|' bit_xor)*
//! bit_xor        := bit_and ('^' bit_and)*
//! bit_and        := additive ('&' additive)*
//! additive       := multiplicative (('+' | '-') multiplicative)*
//! multiplicative := unary (('*' | '/' | '%') unary)*
//! unary          := ('~' | '-' | '!') unary | power
//! power          := call ['**' unary]
//! call           := primary ('(' [expr (',' expr)*] ')')*
//! primary        := literal | ident | '(' expr ')'
//! ```

use super::Parser;
use crate::ast::{BinOp, Expr, UnOp};
use crate::error::Result;
use crate::lexer::Token;

impl Parser<'_> {
    pub(super) fn parse_expr(&mut self) -> Result<Expr> {
        let mut left = self.parse_comparison()?;
        loop {
            let op = match self.peek() {
                Some(Token::AmpAmp) => BinOp::And,
                Some(Token::PipePipe) => BinOp::Or,
                _ => break,
            };
            self.bump()?;
            let right = self.parse_comparison()?;
            left = Expr::binary(op, left, right);
        }
        Ok(left)
    }

    /// Comparisons share one left-associative tier: `a < b == c` is `(a < b) == c`
    fn parse_comparison(&mut self) -> Result<Expr> {
        let mut left = self.parse_bit_or()?;
        while let Some(op) = self.peek_binop_cmp() {
            self.bump()?;
            let right = self.parse_bit_or()?;
            left = Expr::binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_bit_or(&mut self) -> Result<Expr> {
        let mut left = self.parse_bit_xor()?;
        while self.eat(&Token::Pipe)? {
            let right = self.parse_bit_xor()?;
            left = Expr::binary(BinOp::BitOr, left, right);
        }
        Ok(left)
    }

    fn parse_bit_xor(&mut self) -> Result<Expr> {
        let mut left = self.parse_bit_and()?;
        while self.eat(&Token::Caret)? {
            let right = self.parse_bit_and()?;
            left = Expr::binary(BinOp::BitXor, left, right);
        }
        Ok(left)
    }

    fn parse_bit_and(&mut self) -> Result<Expr> {
        let mut left = self.parse_additive()?;
        while self.eat(&Token::Amp)? {
            let right = self.parse_additive()?;
            left = Expr::binary(BinOp::BitAnd, left, right);
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expr> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinOp::Add,
                Some(Token::Minus) => BinOp::Sub,
                _ => break,
            };
            self.bump()?;
            let right = self.parse_multiplicative()?;
            left = Expr::binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinOp::Mul,
                Some(Token::Slash) => BinOp::Div,
                Some(Token::Percent) => BinOp::Mod,
                _ => break,
            };
            self.bump()?;
            let right = self.parse_unary()?;
            left = Expr::binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        let op = match self.peek() {
            Some(Token::Tilde) => UnOp::BitNot,
            Some(Token::Minus) => UnOp::Neg,
            Some(Token::Bang) => UnOp::Not,
            _ => return self.parse_power(),
        };
        self.bump()?;
        let operand = self.parse_unary()?;
        Ok(Expr::unary(op, operand))
    }

    /// Right-associative: `2 ** 3 ** 2` is `2 ** (3 ** 2)`, `-2 ** 2` is `-(2 ** 2)`
    fn parse_power(&mut self) -> Result<Expr> {
        let base = self.parse_call()?;
        if self.eat(&Token::StarStar)? {
            let exponent = self.parse_unary()?;
            return Ok(Expr::binary(BinOp::Pow, base, exponent));
        }
        Ok(base)
    }

    fn parse_call(&mut self) -> Result<Expr> {
        let mut expr = self.parse_primary()?;
        while self.eat(&Token::LParen)? {
            let mut args = Vec::new();
            if !self.at(&Token::RParen) {
                args.push(self.parse_expr()?);
                while self.eat(&Token::Comma)? {
                    args.push(self.parse_expr()?);
                }
            }
            self.expect(&Token::RParen, "')'")?;
            expr = Expr::Call {
                callee: Box::new(expr),
                args,
            };
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        match self.peek() {
            Some(Token::LParen) => {
                self.bump()?;
                let inner = self.parse_expr()?;
                self.expect(&Token::RParen, "')'")?;
                Ok(inner)
            }
            Some(Token::Ident(_)) => Ok(Expr::Ident(self.bump()?.text)),
            Some(token) if token.is_literal() => {
                let lexeme = self.bump()?;
                match lexeme.value {
                    Some(value) => Ok(Expr::Literal(value)),
                    None => Err(self.unexpected("literal")),
                }
            }
            _ => Err(self.unexpected("expression")),
        }
    }

    fn peek_binop_cmp(&self) -> Option<BinOp> {
        match self.peek()? {
            Token::Lt => Some(BinOp::Lt),
            Token::LtEq => Some(BinOp::Le),
            Token::Gt => Some(BinOp::Gt),
            Token::GtEq => Some(BinOp::Ge),
            Token::EqEq => Some(BinOp::Eq),
            Token::NotEq => Some(BinOp::Ne),
            _ => None,
        }
    }
}
