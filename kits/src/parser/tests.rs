//! Parser tests

use crate::ast::{Decl, Expr, Node, Stmt};
use crate::error::CompileError;
use crate::interp::Value;
use crate::parser::parse;

/// Helper to parse a program into its top-level units
fn parse_program(source: &str) -> crate::Result<Vec<Node>> {
    parse(source)
}

/// Helper to parse and expect success
fn parse_ok(source: &str) -> Vec<Node> {
    parse_program(source).expect("Parse should succeed")
}

/// Helper to check if parsing fails
fn parse_fails(source: &str) -> bool {
    parse_program(source).is_err()
}

fn parse_err(source: &str) -> CompileError {
    parse_program(source).expect_err("Parse should fail")
}

/// Parse a single trailing expression and render it as an s-expression
fn shape(source: &str) -> String {
    let nodes = parse_ok(source);
    assert_eq!(nodes.len(), 1, "expected one unit in {source:?}");
    match &nodes[0] {
        Node::Expr(expr) | Node::Stmt(Stmt::Expr(expr)) => sexp(expr),
        other => panic!("Expected expression, got {other:?}"),
    }
}

fn sexp(expr: &Expr) -> String {
    match expr {
        Expr::Literal(v) => v.to_string(),
        Expr::Ident(name) => name.clone(),
        Expr::Binary { op, left, right } => format!("({op} {} {})", sexp(left), sexp(right)),
        Expr::Unary { op, operand } => format!("({op} {})", sexp(operand)),
        Expr::Call { callee, args } => {
            let mut s = format!("(call {}", sexp(callee));
            for arg in args {
                s.push(' ');
                s.push_str(&sexp(arg));
            }
            s.push(')');
            s
        }
    }
}

fn single_stmt(source: &str) -> Stmt {
    match parse_ok(source).pop() {
        Some(Node::Stmt(stmt)) => stmt,
        other => panic!("Expected statement, got {other:?}"),
    }
}

fn single_decl(source: &str) -> Decl {
    match parse_ok(source).pop() {
        Some(Node::Decl(decl)) => decl,
        other => panic!("Expected declaration, got {other:?}"),
    }
}

// ============================================
// Expressions
// ============================================

#[test]
fn test_parse_literals() {
    assert_eq!(parse_ok("42"), vec![Node::Expr(Expr::Literal(Value::Int(42)))]);
    assert_eq!(parse_ok("true"), vec![Node::Expr(Expr::Literal(Value::Bool(true)))]);
    assert_eq!(parse_ok("2.5"), vec![Node::Expr(Expr::Literal(Value::Float(2.5)))]);
    assert_eq!(parse_ok("'x'"), vec![Node::Expr(Expr::Literal(Value::Char('x')))]);
    assert_eq!(
        parse_ok(r#""a\tb""#),
        vec![Node::Expr(Expr::Literal(Value::Str("a\tb".into())))]
    );
}

#[test]
fn test_multiplicative_binds_tighter_than_additive() {
    assert_eq!(shape("1 + 2 * 3"), "(+ 1 (* 2 3))");
    assert_eq!(shape("(1 + 2) * 3"), "(* (+ 1 2) 3)");
    assert_eq!(shape("8 / 2 % 3"), "(% (/ 8 2) 3)");
}

#[test]
fn test_additive_is_left_associative() {
    assert_eq!(shape("1 - 2 - 3"), "(- (- 1 2) 3)");
}

#[test]
fn test_power_is_right_associative() {
    assert_eq!(shape("2 ** 3 ** 2"), "(** 2 (** 3 2))");
}

#[test]
fn test_unary_minus_applies_to_power() {
    assert_eq!(shape("-2 ** 2"), "(- (** 2 2))");
    assert_eq!(shape("2 ** -1"), "(** 2 (- 1))");
}

#[test]
fn test_unary_chain() {
    assert_eq!(shape("!!true"), "(! (! true))");
    assert_eq!(shape("~-x"), "(~ (- x))");
}

#[test]
fn test_bitwise_tiers() {
    assert_eq!(shape("a | b ^ c & d"), "(| a (^ b (& c d)))");
    assert_eq!(shape("1 + 2 & 3"), "(& (+ 1 2) 3)");
}

#[test]
fn test_comparison_below_bitwise() {
    assert_eq!(shape("a & 1 == 0"), "(== (& a 1) 0)");
    assert_eq!(shape("a < b == c"), "(== (< a b) c)");
}

#[test]
fn test_logical_below_comparison() {
    assert_eq!(shape("1 < 2 && 3 > 2"), "(&& (< 1 2) (> 3 2))");
    assert_eq!(shape("a || b && c"), "(&& (|| a b) c)");
}

#[test]
fn test_calls() {
    assert_eq!(shape("f()"), "(call f)");
    assert_eq!(shape("f(1, g(2), x + 1)"), "(call f 1 (call g 2) (+ x 1))");
    assert_eq!(shape("f(1)(2)"), "(call (call f 1) 2)");
    assert_eq!(shape("-f(2) ** 2"), "(- (** (call f 2) 2))");
}

#[test]
fn test_assignment_statements() {
    assert_eq!(shape("x = 1 + 2;"), "(= x (+ 1 2))");
    assert_eq!(shape("x += 2;"), "(+= x 2)");
    assert_eq!(shape("x ^= y;"), "(^= x y)");
}

#[test]
fn test_increment_desugars_to_compound_assignment() {
    assert_eq!(shape("x++;"), "(+= x 1)");
    assert_eq!(shape("x--;"), "(-= x 1)");
}

#[test]
fn test_trailing_expression_without_semicolon() {
    let nodes = parse_ok("x = 1; x + 1");
    assert!(matches!(nodes[0], Node::Stmt(Stmt::Expr(_))));
    assert!(matches!(nodes[1], Node::Expr(_)));
    assert_eq!(parse_ok("x = 1").len(), 1);
}

// ============================================
// Statements
// ============================================

#[test]
fn test_parse_if_else() {
    let Stmt::If {
        cond,
        then_branch,
        else_branch,
    } = single_stmt("if (x > 1) y = 1; else { y = 2; }")
    else {
        panic!("Expected if");
    };
    assert_eq!(sexp(&cond), "(> x 1)");
    assert!(matches!(*then_branch, Stmt::Expr(_)));
    assert!(matches!(else_branch.as_deref(), Some(Stmt::Block(_))));
}

#[test]
fn test_dangling_else_binds_to_nearest_if() {
    let Stmt::If {
        then_branch,
        else_branch,
        ..
    } = single_stmt("if (a) if (b) x = 1; else x = 2;")
    else {
        panic!("Expected if");
    };
    assert!(else_branch.is_none());
    assert!(matches!(*then_branch, Stmt::If { else_branch: Some(_), .. }));
}

#[test]
fn test_parse_while() {
    let Stmt::While { cond, body } = single_stmt("while (i < 10) i++;") else {
        panic!("Expected while");
    };
    assert_eq!(sexp(&cond), "(< i 10)");
    assert!(matches!(*body, Stmt::Expr(_)));
}

#[test]
fn test_parse_for_each() {
    let Stmt::ForEach {
        binding, iterable, ..
    } = single_stmt("for (item : items) { }")
    else {
        panic!("Expected for");
    };
    assert_eq!(binding, "item");
    assert_eq!(iterable, Expr::Ident("items".into()));
}

#[test]
fn test_block_splits_decls_stmts_and_return() {
    let Stmt::Block(block) = single_stmt("{ let a = 1; let b = 2; a = b; return a; }") else {
        panic!("Expected block");
    };
    assert_eq!(block.decls.len(), 2);
    assert_eq!(block.stmts.len(), 1);
    assert_eq!(block.ret.and_then(|r| r.value), Some(Expr::Ident("a".into())));
}

#[test]
fn test_return_in_middle_of_block_stays_a_statement() {
    let Stmt::Block(block) = single_stmt("{ return; x = 1; }") else {
        panic!("Expected block");
    };
    assert!(block.ret.is_none());
    assert!(matches!(block.stmts[0], Stmt::Return(ref r) if r.value.is_none()));
}

#[test]
fn test_decl_after_statement_in_block_fails() {
    assert!(parse_fails("{ x = 1; let y = 2; }"));
}

#[test]
fn test_parse_check_with_arms_and_else() {
    let Stmt::Check(check) = single_stmt("check (x) on case 1: y = 1; case 2: y = 2; then y = 0;")
    else {
        panic!("Expected check");
    };
    assert_eq!(check.scrutinee, Expr::Ident("x".into()));
    assert_eq!(check.arms.len(), 2);
    assert_eq!(check.arms[1].pattern, Some(Expr::Literal(Value::Int(2))));
    assert!(check.else_arm.is_some());
    assert!(!check.first_match_only);
}

#[test]
fn test_parse_check_only() {
    let Stmt::Check(check) = single_stmt("check (ready) only go();") else {
        panic!("Expected check");
    };
    assert!(check.first_match_only);
    assert_eq!(check.arms.len(), 1);
    assert!(check.arms[0].pattern.is_none());
    assert!(check.else_arm.is_none());
}

#[test]
fn test_parse_recheck_with_optional_on() {
    for source in ["recheck (n) on case 1: n = 2;", "recheck (n) case 1: n = 2;"] {
        let Stmt::Recheck(check) = single_stmt(source) else {
            panic!("Expected recheck in {source:?}");
        };
        assert_eq!(check.arms.len(), 1);
    }
}

#[test]
fn test_check_requires_a_case() {
    assert!(parse_fails("check (x) on then y = 1;"));
    assert!(parse_fails("check (x) y = 1;"));
}

// ============================================
// Declarations
// ============================================

#[test]
fn test_parse_let_forms() {
    let Decl::Var(v) = single_decl("let x;") else {
        panic!("Expected var");
    };
    assert_eq!((v.name.as_str(), v.ty, v.init), ("x", None, None));

    let Decl::Var(v) = single_decl("let y: double = 1 + 1;") else {
        panic!("Expected var");
    };
    assert_eq!(v.ty.as_deref(), Some("double"));
    assert_eq!(v.init.as_ref().map(sexp).as_deref(), Some("(+ 1 1)"));

    let Decl::Var(v) = single_decl("let p: Point;") else {
        panic!("Expected var");
    };
    assert_eq!(v.ty.as_deref(), Some("Point"));
}

#[test]
fn test_parse_subr() {
    let Decl::Subr(subr) = single_decl("subr add(a: int, b: long): long { return a + b; }") else {
        panic!("Expected subr");
    };
    assert_eq!(subr.name, "add");
    assert_eq!(subr.ret_ty, "long");
    let params: Vec<_> = subr
        .params
        .iter()
        .map(|p| format!("{}:{}", p.name, p.ty))
        .collect();
    assert_eq!(params, ["a:int", "b:long"]);
    assert!(subr.body.ret.is_some());
}

#[test]
fn test_subr_return_type_defaults_to_void() {
    let Decl::Subr(subr) = single_decl("subr noop() { }") else {
        panic!("Expected subr");
    };
    assert_eq!(subr.ret_ty, "void");
    assert!(subr.params.is_empty());
}

#[test]
fn test_parse_aggregates() {
    let Decl::Struct(s) = single_decl("struct Point { x: int; y: int; }") else {
        panic!("Expected struct");
    };
    assert_eq!(s.fields.len(), 2);
    assert!(matches!(single_decl("union U { i: int; f: float; }"), Decl::Union(_)));

    let Decl::Enum { variants, .. } = single_decl("enum Color { Red, Green, Blue, }") else {
        panic!("Expected enum");
    };
    assert_eq!(variants, ["Red", "Green", "Blue"]);
}

#[test]
fn test_parse_tool_and_kit() {
    let Decl::Tool { methods, .. } = single_decl("tool Shape { subr area(): double { return 0.0; } }")
    else {
        panic!("Expected tool");
    };
    assert_eq!(methods[0].name, "area");

    let Decl::Kit { name, items } = single_decl("kit geo { let origin = 0; struct P { x: int; } }")
    else {
        panic!("Expected kit");
    };
    assert_eq!(name, "geo");
    assert_eq!(items.len(), 2);
    assert_eq!(items[1].name(), "P");
}

// ============================================
// Errors
// ============================================

#[test]
fn test_error_names_the_offending_token() {
    let err = parse_err("let = 1;");
    assert!(matches!(err, CompileError::Parser { .. }));
    assert_eq!(
        err.message(),
        "unexpected token Eq '=' at 1:5, expected identifier"
    );
}

#[test]
fn test_error_at_end_of_input() {
    let err = parse_err("if (x) {");
    assert_eq!(err.message(), "unexpected end of input, expected '}'");
}

#[test]
fn test_missing_semicolon_inside_block() {
    let err = parse_err("{ x = 1 }");
    assert_eq!(
        err.message(),
        "unexpected token RBrace '}' at 1:9, expected ';'"
    );
}

#[test]
fn test_lexer_errors_propagate() {
    assert!(matches!(parse_err("x = @;"), CompileError::Lexer { .. }));
}

#[test]
fn test_lexer_error_fails_only_its_own_unit() {
    let mut lexer = crate::lexer::Lexer::new("x = 1; @").unwrap();
    let mut parser = crate::parser::Parser::new(&mut lexer);
    assert!(matches!(parser.parse(), Ok(Some(Node::Stmt(_)))));
    let err = parser.parse().unwrap_err();
    assert!(matches!(err, CompileError::Lexer { .. }));
    assert_eq!(err.position().to_string(), "1:8");
}

#[test]
fn test_lexer_error_after_trailing_expression() {
    assert!(matches!(parse_err("1 + 2 @"), CompileError::Lexer { .. }));
}

#[test]
fn test_statement_needs_semicolon_when_more_input_follows() {
    assert!(parse_fails("x = 1 y = 2"));
    assert!(parse_fails("let x = 1"));
}
