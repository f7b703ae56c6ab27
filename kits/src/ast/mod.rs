//! Abstract Syntax Tree definitions
//!
//! Three node families: [`Expr`], [`Stmt`] and [`Decl`]. Every composite
//! node owns its children; the tree has no shared or back references.

mod decl;
mod expr;
mod span;
mod stmt;

pub use decl::*;
pub use expr::*;
pub use span::*;
pub use stmt::*;

use serde::Serialize;

/// One top-level unit produced by a single parser call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Node {
    Decl(Decl),
    Stmt(Stmt),
    Expr(Expr),
}

/// Tag of a [`Node`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NodeKind {
    Decl,
    Stmt,
    Expr,
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Decl(_) => NodeKind::Decl,
            Node::Stmt(_) => NodeKind::Stmt,
            Node::Expr(_) => NodeKind::Expr,
        }
    }
}

impl From<Decl> for Node {
    fn from(decl: Decl) -> Self {
        Node::Decl(decl)
    }
}

impl From<Stmt> for Node {
    fn from(stmt: Stmt) -> Self {
        Node::Stmt(stmt)
    }
}

impl From<Expr> for Node {
    fn from(expr: Expr) -> Self {
        Node::Expr(expr)
    }
}
