//! Tree-walking evaluator

use super::error::{InterpResult, RuntimeError};
use super::runtime::{Runtime, Subroutine};
use super::value::{Value, ValueType};
use crate::ast::{BinOp, Block, CheckStmt, Decl, Expr, Node, Return, Stmt, UnOp, VarDecl};

/// Maximum nesting of subroutine calls
pub const MAX_CALL_DEPTH: usize = 4096;

/// Stack growth parameters for deep recursion
const STACK_RED_ZONE: usize = 128 * 1024; // 128KB remaining triggers growth
const STACK_GROW_SIZE: usize = 4 * 1024 * 1024; // Grow by 4MB each time

/// Outcome of executing a statement. `Return` unwinds to the nearest
/// subroutine call and never travels through the error channel.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    Normal(Value),
    Return(Value),
}

/// The interpreter
#[derive(Debug, Default)]
pub struct Interpreter {
    runtime: Runtime,
    call_depth: usize,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn runtime_mut(&mut self) -> &mut Runtime {
        &mut self.runtime
    }

    /// Drop all variables, subroutines and user types
    pub fn reset(&mut self) {
        self.runtime.reset();
        self.call_depth = 0;
    }

    /// Evaluate one top-level unit
    pub fn eval(&mut self, node: &Node) -> InterpResult<Value> {
        match node {
            Node::Expr(expr) => self.eval_expr(expr),
            Node::Stmt(stmt) => match self.exec(stmt)? {
                Flow::Normal(value) => Ok(value),
                Flow::Return(_) => Err(RuntimeError::return_outside_subroutine()),
            },
            Node::Decl(decl) => {
                self.eval_decl(decl)?;
                Ok(Value::Void)
            }
        }
    }

    /// Run `f` inside a fresh scope, popping it on every exit path
    fn with_scope<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> InterpResult<T>,
    ) -> InterpResult<T> {
        self.runtime.push_scope();
        let result = f(self);
        self.runtime.pop_scope();
        result
    }

    // ---- expressions ----

    pub fn eval_expr(&mut self, expr: &Expr) -> InterpResult<Value> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || self.eval_expr_inner(expr))
    }

    fn eval_expr_inner(&mut self, expr: &Expr) -> InterpResult<Value> {
        match expr {
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Ident(name) => self.runtime.get(name),
            Expr::Binary { op, left, right } if op.is_assignment() => {
                self.eval_assign(*op, left, right)
            }
            Expr::Binary { op, left, right } => {
                let left = self.eval_expr(left)?;
                let right = self.eval_expr(right)?;
                apply_binary(*op, &left, &right)
            }
            Expr::Unary { op, operand } => {
                let value = self.eval_expr(operand)?;
                match op {
                    UnOp::Neg => value.neg(),
                    UnOp::Not => value.not(),
                    UnOp::BitNot => value.bit_not(),
                }
            }
            Expr::Call { callee, args } => {
                let name = self.callee_name(callee)?;
                let args = args
                    .iter()
                    .map(|arg| self.eval_expr(arg))
                    .collect::<InterpResult<Vec<_>>>()?;
                self.call_subroutine(&name, args)
            }
        }
    }

    fn eval_assign(&mut self, op: BinOp, target: &Expr, value: &Expr) -> InterpResult<Value> {
        let Expr::Ident(name) = target else {
            return Err(RuntimeError::invalid_assignment_target());
        };
        let value = self.eval_expr(value)?;
        let value = match op.compound_base() {
            Some(base) => apply_binary(base, &self.runtime.get(name)?, &value)?,
            None => value,
        };
        self.runtime.set(name, value.clone())?;
        Ok(value)
    }

    /// A bare identifier that is not a variable names a subroutine
    /// directly; any other callee must evaluate to a string.
    fn callee_name(&mut self, callee: &Expr) -> InterpResult<String> {
        if let Expr::Ident(name) = callee
            && !self.runtime.is_variable(name)
        {
            return Ok(name.clone());
        }
        match self.eval_expr(callee)? {
            Value::Str(name) => Ok(name),
            other => Err(RuntimeError::type_error(
                "string naming a subroutine",
                other.type_name(),
            )),
        }
    }

    pub fn call_subroutine(&mut self, name: &str, args: Vec<Value>) -> InterpResult<Value> {
        let subroutine = self.runtime.subroutine(name)?;
        if subroutine.params.len() != args.len() {
            return Err(RuntimeError::arity_mismatch(
                name,
                subroutine.params.len(),
                args.len(),
            ));
        }
        if self.call_depth >= MAX_CALL_DEPTH {
            return Err(RuntimeError::stack_overflow());
        }

        tracing::trace!(name, args = args.len(), depth = self.call_depth, "call");
        self.call_depth += 1;
        let result = self.with_scope(|this| {
            for (param, arg) in subroutine.params.iter().zip(args) {
                this.runtime.declare(&param.name, arg)?;
            }
            this.exec_block(&subroutine.body)
        });
        self.call_depth -= 1;

        match result? {
            Flow::Return(value) => Ok(value),
            Flow::Normal(_) => Ok(Value::Void),
        }
    }

    // ---- statements ----

    pub fn exec(&mut self, stmt: &Stmt) -> InterpResult<Flow> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || self.exec_inner(stmt))
    }

    fn exec_inner(&mut self, stmt: &Stmt) -> InterpResult<Flow> {
        match stmt {
            Stmt::Expr(expr) => Ok(Flow::Normal(self.eval_expr(expr)?)),
            Stmt::Block(block) => self.exec_block(block),
            Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => {
                if self.condition(cond)? {
                    self.exec(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.exec(else_branch)
                } else {
                    Ok(Flow::Normal(Value::Void))
                }
            }
            Stmt::While { cond, body } => {
                let mut last = Value::Void;
                while self.condition(cond)? {
                    match self.exec(body)? {
                        Flow::Normal(value) => last = value,
                        flow @ Flow::Return(_) => return Ok(flow),
                    }
                }
                Ok(Flow::Normal(last))
            }
            Stmt::ForEach { .. } => Err(RuntimeError::not_implemented("for-each loop")),
            Stmt::Return(ret) => self.exec_return(ret),
            Stmt::Check(check) => self.exec_check(check),
            Stmt::Recheck(check) => self.exec_recheck(check),
        }
    }

    fn exec_block(&mut self, block: &Block) -> InterpResult<Flow> {
        self.with_scope(|this| {
            for decl in &block.decls {
                this.eval_decl(decl)?;
            }
            let mut last = Value::Void;
            for stmt in &block.stmts {
                match this.exec(stmt)? {
                    Flow::Normal(value) => last = value,
                    flow @ Flow::Return(_) => return Ok(flow),
                }
            }
            match &block.ret {
                Some(ret) => this.exec_return(ret),
                None => Ok(Flow::Normal(last)),
            }
        })
    }

    fn exec_return(&mut self, ret: &Return) -> InterpResult<Flow> {
        let value = match &ret.value {
            Some(expr) => self.eval_expr(expr)?,
            None => Value::Void,
        };
        Ok(Flow::Return(value))
    }

    fn condition(&mut self, cond: &Expr) -> InterpResult<bool> {
        match self.eval_expr(cond)? {
            Value::Bool(b) => Ok(b),
            other => Err(RuntimeError::type_error("bool condition", other.type_name())),
        }
    }

    /// Run every arm whose pattern equals the scrutinee, or only the
    /// first in `only` mode. The `then` arm runs when nothing matched.
    fn exec_check(&mut self, check: &CheckStmt) -> InterpResult<Flow> {
        let scrutinee = self.eval_expr(&check.scrutinee)?;
        let mut result = Value::Void;
        let mut matched = false;
        for arm in &check.arms {
            if !self.arm_matches(arm.pattern.as_ref(), &scrutinee)? {
                continue;
            }
            matched = true;
            match self.exec(&arm.body)? {
                Flow::Normal(value) => result = value,
                flow @ Flow::Return(_) => return Ok(flow),
            }
            if check.first_match_only {
                break;
            }
        }
        if !matched && let Some(else_arm) = &check.else_arm {
            return self.exec(else_arm);
        }
        Ok(Flow::Normal(result))
    }

    /// Re-evaluate the scrutinee and rescan the arms until a scan matches
    /// nothing. The `then` arm runs once, on that final scan.
    fn exec_recheck(&mut self, check: &CheckStmt) -> InterpResult<Flow> {
        let mut result = Value::Void;
        loop {
            let scrutinee = self.eval_expr(&check.scrutinee)?;
            let mut matched = false;
            for arm in &check.arms {
                if !self.arm_matches(arm.pattern.as_ref(), &scrutinee)? {
                    continue;
                }
                matched = true;
                match self.exec(&arm.body)? {
                    Flow::Normal(value) => result = value,
                    flow @ Flow::Return(_) => return Ok(flow),
                }
                if check.first_match_only {
                    break;
                }
            }
            if matched {
                continue;
            }
            if let Some(else_arm) = &check.else_arm {
                match self.exec(else_arm)? {
                    Flow::Normal(value) => result = value,
                    flow @ Flow::Return(_) => return Ok(flow),
                }
            }
            return Ok(Flow::Normal(result));
        }
    }

    fn arm_matches(&mut self, pattern: Option<&Expr>, scrutinee: &Value) -> InterpResult<bool> {
        match pattern {
            Some(pattern) => Ok(self.eval_expr(pattern)? == *scrutinee),
            None => Ok(true),
        }
    }

    // ---- declarations ----

    fn eval_decl(&mut self, decl: &Decl) -> InterpResult<()> {
        match decl {
            Decl::Var(var) => self.eval_var_decl(var),
            Decl::Subr(subr) => {
                self.runtime.define_subroutine(Subroutine::from(subr));
                Ok(())
            }
            Decl::Struct(_) => Err(RuntimeError::not_implemented("struct declaration")),
            Decl::Enum { .. } => Err(RuntimeError::not_implemented("enum declaration")),
            Decl::Union(_) => Err(RuntimeError::not_implemented("union declaration")),
            Decl::Tool { .. } => Err(RuntimeError::not_implemented("tool declaration")),
            Decl::Kit { .. } => Err(RuntimeError::not_implemented("kit declaration")),
        }
    }

    fn eval_var_decl(&mut self, var: &VarDecl) -> InterpResult<()> {
        let value = match (&var.ty, &var.init) {
            (None, None) => Value::Int(0),
            (None, Some(init)) => match self.eval_expr(init)? {
                Value::Void => return Err(RuntimeError::void_variable(&var.name)),
                value => value,
            },
            (Some(ty), init) => self.typed_initializer(&var.name, ty, init.as_ref())?,
        };
        self.runtime.declare(&var.name, value)
    }

    /// Value for `let name: ty [= init]`: the zero value of `ty`, or the
    /// initializer after the implicit `int -> float/double` widening.
    fn typed_initializer(
        &mut self,
        name: &str,
        ty_name: &str,
        init: Option<&Expr>,
    ) -> InterpResult<Value> {
        let ty = self.runtime.resolve_type(ty_name)?;
        let Some(init) = init else {
            return match ty {
                ValueType::Void => Err(RuntimeError::void_variable(name)),
                ValueType::UserDefined => Err(RuntimeError::uninitialized(name, ty_name)),
                _ => ty
                    .zero_value()
                    .ok_or_else(|| RuntimeError::type_mismatch(ty_name, "void")),
            };
        };

        let value = self.eval_expr(init)?;
        if ty == ValueType::UserDefined {
            if matches!(&value, Value::UserDefined(got) if got == ty_name) {
                return Ok(value);
            }
            return Err(RuntimeError::type_mismatch(ty_name, value.type_name()));
        }
        let got = value.type_name().to_string();
        value
            .coerce_to(ty)
            .ok_or_else(|| RuntimeError::type_mismatch(ty_name, &got))
    }
}

/// Apply a non-assigning binary operator; compound assignments apply
/// their base operator and `=` yields the right operand.
fn apply_binary(op: BinOp, left: &Value, right: &Value) -> InterpResult<Value> {
    match op {
        BinOp::Add => left.add(right),
        BinOp::Sub => left.sub(right),
        BinOp::Mul => left.mul(right),
        BinOp::Div => left.div(right),
        BinOp::Mod => left.rem(right),
        BinOp::Pow => left.pow(right),
        BinOp::BitAnd => left.bit_and(right),
        BinOp::BitOr => left.bit_or(right),
        BinOp::BitXor => left.bit_xor(right),
        BinOp::Eq => Ok(Value::Bool(left == right)),
        BinOp::Ne => Ok(Value::Bool(left != right)),
        BinOp::Lt => left.lt(right),
        BinOp::Le => left.le(right),
        BinOp::Gt => left.gt(right),
        BinOp::Ge => left.ge(right),
        BinOp::And => left.and(right),
        BinOp::Or => left.or(right),
        assign => match assign.compound_base() {
            Some(base) => apply_binary(base, left, right),
            None => Ok(right.clone()),
        },
    }
}
