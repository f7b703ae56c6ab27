//! Recursive-descent parser
//!
//! One token of lookahead, taken from [`Lexer::current`]. Each call to
//! [`Parser::parse`] consumes exactly one top-level unit: a declaration, a
//! statement, or a trailing expression at the end of the input. Errors are
//! reported at the first mismatch; there is no recovery.

mod expr;

#[cfg(test)]
mod tests;

use crate::ast::{
    AggregateDecl, Arm, BinOp, Block, CheckStmt, Decl, Expr, Field, Node, Param, Return, Stmt,
    SubrDecl, VarDecl,
};
use crate::error::{CompileError, Result};
use crate::interp::Value;
use crate::lexer::{Lexeme, Lexer, Token};

/// Parse a whole source text into its top-level units
pub fn parse(source: &str) -> Result<Vec<Node>> {
    let mut lexer = Lexer::new(source)?;
    let mut parser = Parser::new(&mut lexer);
    let mut nodes = Vec::new();
    while let Some(node) = parser.parse()? {
        nodes.push(node);
    }
    Ok(nodes)
}

pub struct Parser<'l> {
    lexer: &'l mut Lexer,
}

impl<'l> Parser<'l> {
    pub fn new(lexer: &'l mut Lexer) -> Self {
        Self { lexer }
    }

    /// Parse the next top-level unit. `Ok(None)` at end of input.
    pub fn parse(&mut self) -> Result<Option<Node>> {
        if let Some(err) = self.lexer.pending_error() {
            return Err(err.clone());
        }
        let Some(token) = self.peek() else {
            return Ok(None);
        };
        if token.starts_declaration() {
            return Ok(Some(Node::Decl(self.parse_decl()?)));
        }
        if starts_statement(token) {
            return Ok(Some(Node::Stmt(self.parse_stmt()?)));
        }

        let expr = self.parse_expr()?;
        if self.lexer.at_end() {
            return Ok(Some(Node::Expr(expr)));
        }
        Ok(Some(Node::Stmt(self.finish_expr_stmt(expr, true)?)))
    }

    // -----------------------------------------------------------------------
    // Statements
    // -----------------------------------------------------------------------

    fn parse_stmt(&mut self) -> Result<Stmt> {
        match self.peek() {
            Some(Token::Check) => self.parse_check(),
            Some(Token::Recheck) => self.parse_recheck(),
            Some(Token::LBrace) => Ok(Stmt::Block(self.parse_block()?)),
            Some(Token::If) => self.parse_if(),
            Some(Token::While) => self.parse_while(),
            Some(Token::For) => self.parse_for(),
            Some(Token::Return) => Ok(Stmt::Return(self.parse_return()?)),
            _ => {
                let expr = self.parse_expr()?;
                self.finish_expr_stmt(expr, false)
            }
        }
    }

    /// Turn a parsed expression into a statement: an optional assignment
    /// operator, then `;`. At top level the `;` may be left off before the
    /// end of input.
    fn finish_expr_stmt(&mut self, target: Expr, top_level: bool) -> Result<Stmt> {
        let expr = if let Some(op) = self.peek().and_then(assign_op) {
            self.bump()?;
            let value = self.parse_expr()?;
            Expr::binary(op, target, value)
        } else if self.eat(&Token::PlusPlus)? {
            Expr::binary(BinOp::AddAssign, target, Expr::Literal(Value::Int(1)))
        } else if self.eat(&Token::MinusMinus)? {
            Expr::binary(BinOp::SubAssign, target, Expr::Literal(Value::Int(1)))
        } else {
            target
        };

        if !(top_level && self.lexer.at_end()) {
            self.expect(&Token::Semi, "';'")?;
        }
        Ok(Stmt::Expr(expr))
    }

    fn parse_block(&mut self) -> Result<Block> {
        self.expect(&Token::LBrace, "'{'")?;
        let mut block = Block::default();
        loop {
            match self.peek() {
                Some(Token::RBrace) => break,
                None => return Err(self.unexpected("'}'")),
                Some(token) if token.starts_declaration() => {
                    if !block.stmts.is_empty() {
                        return Err(self.unexpected("statement (declarations must lead the block)"));
                    }
                    block.decls.push(self.parse_decl()?);
                }
                Some(_) => block.stmts.push(self.parse_stmt()?),
            }
        }
        self.bump()?;

        if matches!(block.stmts.last(), Some(Stmt::Return(_)))
            && let Some(Stmt::Return(ret)) = block.stmts.pop()
        {
            block.ret = Some(ret);
        }
        Ok(block)
    }

    fn parse_condition(&mut self) -> Result<Expr> {
        self.expect(&Token::LParen, "'('")?;
        let cond = self.parse_expr()?;
        self.expect(&Token::RParen, "')'")?;
        Ok(cond)
    }

    fn parse_if(&mut self) -> Result<Stmt> {
        self.bump()?;
        let cond = self.parse_condition()?;
        let then_branch = Box::new(self.parse_stmt()?);
        let else_branch = if self.eat(&Token::Else)? {
            Some(Box::new(self.parse_stmt()?))
        } else {
            None
        };
        Ok(Stmt::If {
            cond,
            then_branch,
            else_branch,
        })
    }

    fn parse_while(&mut self) -> Result<Stmt> {
        self.bump()?;
        let cond = self.parse_condition()?;
        let body = Box::new(self.parse_stmt()?);
        Ok(Stmt::While { cond, body })
    }

    fn parse_for(&mut self) -> Result<Stmt> {
        self.bump()?;
        self.expect(&Token::LParen, "'('")?;
        let binding = self.expect_ident()?;
        self.expect(&Token::Colon, "':'")?;
        let iterable = self.parse_expr()?;
        self.expect(&Token::RParen, "')'")?;
        let body = Box::new(self.parse_stmt()?);
        Ok(Stmt::ForEach {
            binding,
            iterable,
            body,
        })
    }

    fn parse_return(&mut self) -> Result<Return> {
        self.bump()?;
        let value = if self.at(&Token::Semi) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(&Token::Semi, "';'")?;
        Ok(Return { value })
    }

    /// `check (expr) only stmt` or `check (expr) on case..* [then stmt]`
    fn parse_check(&mut self) -> Result<Stmt> {
        self.bump()?;
        let scrutinee = self.parse_condition()?;

        if self.eat(&Token::Only)? {
            let body = self.parse_stmt()?;
            return Ok(Stmt::Check(CheckStmt {
                scrutinee,
                arms: vec![Arm {
                    pattern: None,
                    body,
                }],
                else_arm: None,
                first_match_only: true,
            }));
        }

        self.expect(&Token::On, "'on' or 'only'")?;
        let (arms, else_arm) = self.parse_arms()?;
        Ok(Stmt::Check(CheckStmt {
            scrutinee,
            arms,
            else_arm,
            first_match_only: false,
        }))
    }

    /// `recheck (expr) [on] case..* [then stmt]`
    fn parse_recheck(&mut self) -> Result<Stmt> {
        self.bump()?;
        let scrutinee = self.parse_condition()?;
        self.eat(&Token::On)?;
        let (arms, else_arm) = self.parse_arms()?;
        Ok(Stmt::Recheck(CheckStmt {
            scrutinee,
            arms,
            else_arm,
            first_match_only: false,
        }))
    }

    fn parse_arms(&mut self) -> Result<(Vec<Arm>, Option<Box<Stmt>>)> {
        if !self.at(&Token::Case) {
            return Err(self.unexpected("'case'"));
        }
        let mut arms = Vec::new();
        while self.eat(&Token::Case)? {
            let pattern = self.parse_expr()?;
            self.expect(&Token::Colon, "':'")?;
            let body = self.parse_stmt()?;
            arms.push(Arm {
                pattern: Some(pattern),
                body,
            });
        }
        let else_arm = if self.eat(&Token::Then)? {
            Some(Box::new(self.parse_stmt()?))
        } else {
            None
        };
        Ok((arms, else_arm))
    }

    // -----------------------------------------------------------------------
    // Declarations
    // -----------------------------------------------------------------------

    fn parse_decl(&mut self) -> Result<Decl> {
        match self.peek() {
            Some(Token::Let) => self.parse_let(),
            Some(Token::Subr) => Ok(Decl::Subr(self.parse_subr()?)),
            Some(Token::Struct) => {
                self.bump()?;
                Ok(Decl::Struct(self.parse_aggregate()?))
            }
            Some(Token::Union) => {
                self.bump()?;
                Ok(Decl::Union(self.parse_aggregate()?))
            }
            Some(Token::Enum) => self.parse_enum(),
            Some(Token::Tool) => self.parse_tool(),
            Some(Token::Kit) => self.parse_kit(),
            _ => Err(self.unexpected("declaration")),
        }
    }

    /// `let name [: type] [= expr];`
    fn parse_let(&mut self) -> Result<Decl> {
        self.bump()?;
        let name = self.expect_ident()?;
        let ty = if self.eat(&Token::Colon)? {
            Some(self.parse_type()?)
        } else {
            None
        };
        let init = if self.eat(&Token::Eq)? {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect(&Token::Semi, "';'")?;
        Ok(Decl::Var(VarDecl { name, ty, init }))
    }

    /// `subr name(a: int, b: int) [: type] { ... }`
    fn parse_subr(&mut self) -> Result<SubrDecl> {
        self.expect(&Token::Subr, "'subr'")?;
        let name = self.expect_ident()?;
        self.expect(&Token::LParen, "'('")?;
        let mut params = Vec::new();
        while !self.at(&Token::RParen) {
            let param = self.expect_ident()?;
            self.expect(&Token::Colon, "':'")?;
            let ty = self.parse_type()?;
            params.push(Param { name: param, ty });
            if !self.eat(&Token::Comma)? {
                break;
            }
        }
        self.expect(&Token::RParen, "')'")?;
        let ret_ty = if self.eat(&Token::Colon)? {
            self.parse_type()?
        } else {
            "void".to_string()
        };
        let body = self.parse_block()?;
        Ok(SubrDecl {
            name,
            ret_ty,
            params,
            body,
        })
    }

    /// `name { field: type; ... }`, after `struct` or `union`
    fn parse_aggregate(&mut self) -> Result<AggregateDecl> {
        let name = self.expect_ident()?;
        self.expect(&Token::LBrace, "'{'")?;
        let mut fields = Vec::new();
        while !self.eat(&Token::RBrace)? {
            let field = self.expect_ident()?;
            self.expect(&Token::Colon, "':'")?;
            let ty = self.parse_type()?;
            self.expect(&Token::Semi, "';'")?;
            fields.push(Field { name: field, ty });
        }
        Ok(AggregateDecl { name, fields })
    }

    fn parse_enum(&mut self) -> Result<Decl> {
        self.bump()?;
        let name = self.expect_ident()?;
        self.expect(&Token::LBrace, "'{'")?;
        let mut variants = vec![self.expect_ident()?];
        while self.eat(&Token::Comma)? {
            if self.at(&Token::RBrace) {
                break;
            }
            variants.push(self.expect_ident()?);
        }
        self.expect(&Token::RBrace, "'}'")?;
        Ok(Decl::Enum { name, variants })
    }

    fn parse_tool(&mut self) -> Result<Decl> {
        self.bump()?;
        let name = self.expect_ident()?;
        self.expect(&Token::LBrace, "'{'")?;
        let mut methods = Vec::new();
        while !self.eat(&Token::RBrace)? {
            methods.push(self.parse_subr()?);
        }
        Ok(Decl::Tool { name, methods })
    }

    fn parse_kit(&mut self) -> Result<Decl> {
        self.bump()?;
        let name = self.expect_ident()?;
        self.expect(&Token::LBrace, "'{'")?;
        let mut items = Vec::new();
        while !self.eat(&Token::RBrace)? {
            items.push(self.parse_decl()?);
        }
        Ok(Decl::Kit { name, items })
    }

    /// A type keyword or the name of a user type
    fn parse_type(&mut self) -> Result<String> {
        if let Some(name) = self.peek().and_then(Token::type_keyword) {
            self.bump()?;
            return Ok(name.to_string());
        }
        match self.peek() {
            Some(Token::Ident(_)) => self.expect_ident(),
            _ => Err(self.unexpected("type")),
        }
    }

    // -----------------------------------------------------------------------
    // Token utilities
    // -----------------------------------------------------------------------

    fn peek(&self) -> Option<&Token> {
        self.lexer.current().map(|lexeme| &lexeme.token)
    }

    fn at(&self, token: &Token) -> bool {
        self.peek() == Some(token)
    }

    /// Consume the lookahead token; end of input is an error
    fn bump(&mut self) -> Result<Lexeme> {
        match self.lexer.advance()? {
            Some(lexeme) => Ok(lexeme),
            None => Err(self.unexpected("more input")),
        }
    }

    fn eat(&mut self, token: &Token) -> Result<bool> {
        if self.at(token) {
            self.bump()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect(&mut self, token: &Token, expected: &str) -> Result<Lexeme> {
        if self.at(token) {
            self.bump()
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn expect_ident(&mut self) -> Result<String> {
        match self.peek() {
            Some(Token::Ident(_)) => Ok(self.bump()?.text),
            _ => Err(self.unexpected("identifier")),
        }
    }

    /// Error for a mismatch at the lookahead. A held-back lexical error at
    /// that position takes precedence.
    fn unexpected(&self, expected: &str) -> CompileError {
        if let Some(err) = self.lexer.pending_error() {
            return err.clone();
        }
        match self.lexer.current() {
            Some(lexeme) => CompileError::parser(
                format!(
                    "unexpected token {} '{}' at {}, expected {expected}",
                    lexeme.token.name(),
                    lexeme.text,
                    lexeme.pos
                ),
                lexeme.span,
                lexeme.pos,
            ),
            None => CompileError::parser(
                format!("unexpected end of input, expected {expected}"),
                self.lexer.span(),
                self.lexer.position(),
            ),
        }
    }
}

fn starts_statement(token: &Token) -> bool {
    matches!(
        token,
        Token::Check
            | Token::Recheck
            | Token::LBrace
            | Token::If
            | Token::While
            | Token::For
            | Token::Return
    )
}

fn assign_op(token: &Token) -> Option<BinOp> {
    match token {
        Token::Eq => Some(BinOp::Assign),
        Token::PlusEq => Some(BinOp::AddAssign),
        Token::MinusEq => Some(BinOp::SubAssign),
        Token::StarEq => Some(BinOp::MulAssign),
        Token::SlashEq => Some(BinOp::DivAssign),
        Token::AmpEq => Some(BinOp::AndAssign),
        Token::PipeEq => Some(BinOp::OrAssign),
        Token::CaretEq => Some(BinOp::XorAssign),
        _ => None,
    }
}
