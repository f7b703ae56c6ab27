//! Statement AST nodes

use serde::Serialize;

use super::{Decl, Expr};

/// Statement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Stmt {
    /// Expression evaluated for its value (assignments included)
    Expr(Expr),

    Block(Block),

    If {
        cond: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },

    While { cond: Expr, body: Box<Stmt> },

    /// `for (binding : iterable) body`; parsed only
    ForEach {
        binding: String,
        iterable: Expr,
        body: Box<Stmt>,
    },

    Return(Return),

    /// One-shot value dispatch
    Check(CheckStmt),

    /// Looping value dispatch
    Recheck(CheckStmt),
}

/// Tag of a [`Stmt`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StmtKind {
    Expr,
    Block,
    If,
    While,
    ForEach,
    Return,
    Check,
    Recheck,
}

impl Stmt {
    pub fn kind(&self) -> StmtKind {
        match self {
            Stmt::Expr(_) => StmtKind::Expr,
            Stmt::Block(_) => StmtKind::Block,
            Stmt::If { .. } => StmtKind::If,
            Stmt::While { .. } => StmtKind::While,
            Stmt::ForEach { .. } => StmtKind::ForEach,
            Stmt::Return(_) => StmtKind::Return,
            Stmt::Check(_) => StmtKind::Check,
            Stmt::Recheck(_) => StmtKind::Recheck,
        }
    }
}

/// `{ decls* stmts* [return] }`
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Block {
    /// Declarations leading the block
    pub decls: Vec<Decl>,
    pub stmts: Vec<Stmt>,
    /// A `return` closing the block
    pub ret: Option<Return>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Return {
    pub value: Option<Expr>,
}

/// Shared shape of `check` and `recheck`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckStmt {
    pub scrutinee: Expr,
    pub arms: Vec<Arm>,
    /// `then` arm, run when no case matched
    pub else_arm: Option<Box<Stmt>>,
    /// Set by `only`: stop after the first executed arm
    pub first_match_only: bool,
}

/// `case pattern : body`. An `only` arm has no pattern and always runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Arm {
    pub pattern: Option<Expr>,
    pub body: Stmt,
}
