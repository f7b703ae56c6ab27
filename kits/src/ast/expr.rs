//! Expression AST nodes

use serde::Serialize;

use crate::interp::Value;

/// Expression
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    /// Literal carrying the value produced by the lexer
    Literal(Value),

    /// Identifier reference
    Ident(String),

    /// Binary operation, assignment included
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Unary operation
    Unary { op: UnOp, operand: Box<Expr> },

    /// Call: callee followed by one argument list
    Call { callee: Box<Expr>, args: Vec<Expr> },
}

/// Tag of an [`Expr`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExprKind {
    Literal,
    Ident,
    Binary,
    Unary,
    Call,
}

impl Expr {
    pub fn kind(&self) -> ExprKind {
        match self {
            Expr::Literal(_) => ExprKind::Literal,
            Expr::Ident(_) => ExprKind::Ident,
            Expr::Binary { .. } => ExprKind::Binary,
            Expr::Unary { .. } => ExprKind::Unary,
            Expr::Call { .. } => ExprKind::Call,
        }
    }

    pub fn binary(op: BinOp, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn unary(op: UnOp, operand: Expr) -> Self {
        Expr::Unary {
            op,
            operand: Box::new(operand),
        }
    }
}

/// Binary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,

    // Bitwise
    BitAnd,
    BitOr,
    BitXor,

    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,

    // Logical
    And,
    Or,

    // Assignment
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    AndAssign,
    OrAssign,
    XorAssign,
}

impl BinOp {
    pub fn is_assignment(self) -> bool {
        self.compound_base().is_some() || self == BinOp::Assign
    }

    /// The operator a compound assignment applies, `x += y` -> `Add`
    pub fn compound_base(self) -> Option<BinOp> {
        match self {
            BinOp::AddAssign => Some(BinOp::Add),
            BinOp::SubAssign => Some(BinOp::Sub),
            BinOp::MulAssign => Some(BinOp::Mul),
            BinOp::DivAssign => Some(BinOp::Div),
            BinOp::AndAssign => Some(BinOp::BitAnd),
            BinOp::OrAssign => Some(BinOp::BitOr),
            BinOp::XorAssign => Some(BinOp::BitXor),
            _ => None,
        }
    }
}

impl std::fmt::Display for BinOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Pow => "**",
            BinOp::BitAnd => "&",
            BinOp::BitOr => "|",
            BinOp::BitXor => "^",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
            BinOp::Assign => "=",
            BinOp::AddAssign => "+=",
            BinOp::SubAssign => "-=",
            BinOp::MulAssign => "*=",
            BinOp::DivAssign => "/=",
            BinOp::AndAssign => "&=",
            BinOp::OrAssign => "|=",
            BinOp::XorAssign => "^=",
        };
        f.write_str(s)
    }
}

/// Unary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnOp {
    /// Arithmetic negation (`-`)
    Neg,
    /// Logical not (`!`)
    Not,
    /// Bitwise not (`~`)
    BitNot,
}

impl std::fmt::Display for UnOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnOp::Neg => write!(f, "-"),
            UnOp::Not => write!(f, "!"),
            UnOp::BitNot => write!(f, "~"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compound_base() {
        assert_eq!(BinOp::AddAssign.compound_base(), Some(BinOp::Add));
        assert_eq!(BinOp::XorAssign.compound_base(), Some(BinOp::BitXor));
        assert_eq!(BinOp::Assign.compound_base(), None);
        assert_eq!(BinOp::Add.compound_base(), None);
    }

    #[test]
    fn test_is_assignment() {
        assert!(BinOp::Assign.is_assignment());
        assert!(BinOp::DivAssign.is_assignment());
        assert!(!BinOp::Eq.is_assignment());
    }

    #[test]
    fn test_expr_kind() {
        let e = Expr::binary(BinOp::Add, Expr::Literal(Value::Int(1)), Expr::Ident("x".into()));
        assert_eq!(e.kind(), ExprKind::Binary);
        assert_eq!(Expr::unary(UnOp::Neg, Expr::Ident("y".into())).kind(), ExprKind::Unary);
    }
}
