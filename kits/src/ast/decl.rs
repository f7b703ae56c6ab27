//! Declaration AST nodes

use serde::Serialize;

use super::{Block, Expr};

/// Declaration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Decl {
    Var(VarDecl),
    Subr(SubrDecl),
    Struct(AggregateDecl),
    Enum { name: String, variants: Vec<String> },
    Union(AggregateDecl),
    /// A named group of subroutines
    Tool { name: String, methods: Vec<SubrDecl> },
    /// A named group of declarations
    Kit { name: String, items: Vec<Decl> },
}

/// Tag of a [`Decl`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeclKind {
    Var,
    Subr,
    Struct,
    Enum,
    Union,
    Tool,
    Kit,
}

impl Decl {
    pub fn kind(&self) -> DeclKind {
        match self {
            Decl::Var(_) => DeclKind::Var,
            Decl::Subr(_) => DeclKind::Subr,
            Decl::Struct(_) => DeclKind::Struct,
            Decl::Enum { .. } => DeclKind::Enum,
            Decl::Union(_) => DeclKind::Union,
            Decl::Tool { .. } => DeclKind::Tool,
            Decl::Kit { .. } => DeclKind::Kit,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Decl::Var(v) => &v.name,
            Decl::Subr(s) => &s.name,
            Decl::Struct(a) | Decl::Union(a) => &a.name,
            Decl::Enum { name, .. } | Decl::Tool { name, .. } | Decl::Kit { name, .. } => name,
        }
    }
}

/// `let name [: ty] [= init];`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VarDecl {
    pub name: String,
    pub ty: Option<String>,
    pub init: Option<Expr>,
}

/// `subr name(params) [: ret_ty] body`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubrDecl {
    pub name: String,
    /// `void` when omitted
    pub ret_ty: String,
    pub params: Vec<Param>,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Param {
    pub name: String,
    pub ty: String,
}

/// Body of `struct` and `union`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateDecl {
    pub name: String,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub name: String,
    pub ty: String,
}
