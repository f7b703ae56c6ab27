//! Runtime values for the interpreter
//!
//! A [`Value`] is a tagged union over the language's scalar types. The tag
//! is the enum discriminant, so it can never drift from the payload.
//! Operators are defined per operand combination and fail with a
//! `TypeError` for anything outside their domain.

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

use super::error::{InterpResult, RuntimeError};

/// Runtime value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Value {
    Int(i32),
    Short(i16),
    Long(i64),
    Float(f32),
    Double(f64),
    Bool(bool),
    Char(char),
    Str(String),
    /// Result of statements and declarations that produce nothing
    Void,
    /// Marker for a value of a user-declared aggregate type
    UserDefined(String),
}

/// The discriminant of a [`Value`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ValueType {
    Int,
    Short,
    Long,
    Float,
    Double,
    Bool,
    Char,
    Str,
    Void,
    UserDefined,
}

impl ValueType {
    /// Every built-in type reachable through a type keyword
    pub const BASIC: [ValueType; 9] = [
        ValueType::Int,
        ValueType::Short,
        ValueType::Long,
        ValueType::Float,
        ValueType::Double,
        ValueType::Bool,
        ValueType::Char,
        ValueType::Str,
        ValueType::Void,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ValueType::Int => "int",
            ValueType::Short => "short",
            ValueType::Long => "long",
            ValueType::Float => "float",
            ValueType::Double => "double",
            ValueType::Bool => "bool",
            ValueType::Char => "char",
            ValueType::Str => "string",
            ValueType::Void => "void",
            ValueType::UserDefined => "userdefined",
        }
    }

    /// Value bound by a typed declaration without initializer
    pub fn zero_value(self) -> Option<Value> {
        Some(match self {
            ValueType::Int => Value::Int(0),
            ValueType::Short => Value::Short(0),
            ValueType::Long => Value::Long(0),
            ValueType::Float => Value::Float(0.0),
            ValueType::Double => Value::Double(0.0),
            ValueType::Bool => Value::Bool(false),
            ValueType::Char => Value::Char('\0'),
            ValueType::Str => Value::Str(String::new()),
            ValueType::Void | ValueType::UserDefined => return None,
        })
    }

    pub fn is_numeric(self) -> bool {
        self.rank().is_some()
    }

    pub fn is_integral(self) -> bool {
        matches!(self, ValueType::Short | ValueType::Int | ValueType::Long)
    }

    /// Promotion rank: short < int < long < float < double
    fn rank(self) -> Option<u8> {
        match self {
            ValueType::Short => Some(0),
            ValueType::Int => Some(1),
            ValueType::Long => Some(2),
            ValueType::Float => Some(3),
            ValueType::Double => Some(4),
            _ => None,
        }
    }

    /// The common type two numeric operands are promoted to
    fn promote(self, other: ValueType) -> Option<ValueType> {
        let (a, b) = (self.rank()?, other.rank()?);
        Some(if a >= b { self } else { other })
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Native types a [`Value`] payload can be extracted into
pub trait FromValue: Sized {
    const TYPE: ValueType;

    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! impl_value_conversions {
    ($($native:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$native> for Value {
                fn from(v: $native) -> Self {
                    Value::$variant(v)
                }
            }

            impl FromValue for $native {
                const TYPE: ValueType = ValueType::$variant;

                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => Some(v.clone()),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_value_conversions! {
    i32 => Int,
    i16 => Short,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    bool => Bool,
    char => Char,
    String => Str,
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Int(_) => ValueType::Int,
            Value::Short(_) => ValueType::Short,
            Value::Long(_) => ValueType::Long,
            Value::Float(_) => ValueType::Float,
            Value::Double(_) => ValueType::Double,
            Value::Bool(_) => ValueType::Bool,
            Value::Char(_) => ValueType::Char,
            Value::Str(_) => ValueType::Str,
            Value::Void => ValueType::Void,
            Value::UserDefined(_) => ValueType::UserDefined,
        }
    }

    /// Get type name for error messages
    pub fn type_name(&self) -> &str {
        match self {
            Value::UserDefined(name) => name,
            other => other.value_type().name(),
        }
    }

    /// Extract the payload, failing if the active tag is not `T`'s
    pub fn get<T: FromValue>(&self) -> InterpResult<T> {
        T::from_value(self).ok_or_else(|| RuntimeError::type_error(T::TYPE.name(), self.type_name()))
    }

    /// Turn an `Int` into a `Float` in place; other tags are left alone
    pub fn promote_to_float(&mut self) {
        if let Value::Int(n) = *self {
            *self = Value::Float(n as f32);
        }
    }

    /// Convert to `target` if the value already has that type or the
    /// single implicit widening `int -> float/double` applies.
    pub fn coerce_to(self, target: ValueType) -> Option<Value> {
        match (self, target) {
            (v, t) if v.value_type() == t => Some(v),
            (Value::Int(n), ValueType::Float) => Some(Value::Float(n as f32)),
            (Value::Int(n), ValueType::Double) => Some(Value::Double(n as f64)),
            _ => None,
        }
    }

    /// True for an integral value equal to zero
    pub fn is_integral_zero(&self) -> bool {
        self.as_i64() == Some(0)
    }

    fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Short(n) => Some(n as i64),
            Value::Int(n) => Some(n as i64),
            Value::Long(n) => Some(n),
            _ => None,
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Float(x) => Some(x as f64),
            Value::Double(x) => Some(x),
            _ => self.as_i64().map(|n| n as f64),
        }
    }

    /// Narrow an i64 computation result back to an integral tag; wraps.
    fn from_integral(ty: ValueType, n: i64) -> Value {
        match ty {
            ValueType::Short => Value::Short(n as i16),
            ValueType::Int => Value::Int(n as i32),
            _ => Value::Long(n),
        }
    }

    fn from_floating(ty: ValueType, x: f64) -> Value {
        match ty {
            ValueType::Float => Value::Float(x as f32),
            _ => Value::Double(x),
        }
    }

    fn operand_error(&self, expected: &str, op: &str, other: &Value) -> RuntimeError {
        RuntimeError::type_error(
            expected,
            &format!("{} {op} {}", self.type_name(), other.type_name()),
        )
    }

    fn arith(
        &self,
        other: &Value,
        op: &str,
        int_op: fn(i64, i64) -> i64,
        float_op: fn(f64, f64) -> f64,
    ) -> InterpResult<Value> {
        let ty = self
            .value_type()
            .promote(other.value_type())
            .ok_or_else(|| self.operand_error("numeric", op, other))?;
        if ty.is_integral() {
            let (a, b) = (self.as_i64(), other.as_i64());
            let (Some(a), Some(b)) = (a, b) else {
                return Err(self.operand_error("numeric", op, other));
            };
            Ok(Value::from_integral(ty, int_op(a, b)))
        } else {
            let (Some(a), Some(b)) = (self.as_f64(), other.as_f64()) else {
                return Err(self.operand_error("numeric", op, other));
            };
            Ok(Value::from_floating(ty, float_op(a, b)))
        }
    }

    pub fn add(&self, other: &Value) -> InterpResult<Value> {
        self.arith(other, "+", i64::wrapping_add, |a, b| a + b)
    }

    pub fn sub(&self, other: &Value) -> InterpResult<Value> {
        self.arith(other, "-", i64::wrapping_sub, |a, b| a - b)
    }

    pub fn mul(&self, other: &Value) -> InterpResult<Value> {
        self.arith(other, "*", i64::wrapping_mul, |a, b| a * b)
    }

    pub fn div(&self, other: &Value) -> InterpResult<Value> {
        if self.value_type().is_numeric() && other.is_integral_zero() {
            return Err(RuntimeError::division_by_zero());
        }
        self.arith(other, "/", i64::wrapping_div, |a, b| a / b)
    }

    pub fn rem(&self, other: &Value) -> InterpResult<Value> {
        if self.value_type().is_numeric() && other.is_integral_zero() {
            return Err(RuntimeError::division_by_zero());
        }
        self.arith(other, "%", i64::wrapping_rem, |a, b| a % b)
    }

    /// `**` always yields a double
    pub fn pow(&self, other: &Value) -> InterpResult<Value> {
        match (self.as_f64(), other.as_f64()) {
            (Some(a), Some(b)) => Ok(Value::Double(a.powf(b))),
            _ => Err(self.operand_error("numeric", "**", other)),
        }
    }

    fn bitwise(
        &self,
        other: &Value,
        op: &str,
        int_op: fn(i64, i64) -> i64,
        bool_op: fn(bool, bool) -> bool,
    ) -> InterpResult<Value> {
        if let (Value::Bool(a), Value::Bool(b)) = (self, other) {
            return Ok(Value::Bool(bool_op(*a, *b)));
        }
        match (self.as_i64(), other.as_i64()) {
            (Some(a), Some(b)) => {
                // both integral, so promotion cannot fail
                let ty = self
                    .value_type()
                    .promote(other.value_type())
                    .unwrap_or(ValueType::Long);
                Ok(Value::from_integral(ty, int_op(a, b)))
            }
            _ => Err(self.operand_error("integral or bool", op, other)),
        }
    }

    pub fn bit_and(&self, other: &Value) -> InterpResult<Value> {
        self.bitwise(other, "&", |a, b| a & b, |a, b| a & b)
    }

    pub fn bit_or(&self, other: &Value) -> InterpResult<Value> {
        self.bitwise(other, "|", |a, b| a | b, |a, b| a | b)
    }

    pub fn bit_xor(&self, other: &Value) -> InterpResult<Value> {
        self.bitwise(other, "^", |a, b| a ^ b, |a, b| a ^ b)
    }

    pub fn and(&self, other: &Value) -> InterpResult<Value> {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(*a && *b)),
            _ => Err(self.operand_error("bool", "&&", other)),
        }
    }

    pub fn or(&self, other: &Value) -> InterpResult<Value> {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(*a || *b)),
            _ => Err(self.operand_error("bool", "||", other)),
        }
    }

    /// Ordering for `< <= > >=`. `None` means unordered (a NaN operand).
    fn compare(&self, other: &Value, op: &str) -> InterpResult<Option<Ordering>> {
        match (self, other) {
            (Value::Char(a), Value::Char(b)) => Ok(Some(a.cmp(b))),
            (Value::Str(a), Value::Str(b)) => Ok(Some(a.cmp(b))),
            _ => match (self.as_i64(), other.as_i64()) {
                (Some(a), Some(b)) => Ok(Some(a.cmp(&b))),
                _ => match (self.as_f64(), other.as_f64()) {
                    (Some(a), Some(b)) => Ok(a.partial_cmp(&b)),
                    _ => Err(self.operand_error("comparable operands", op, other)),
                },
            },
        }
    }

    pub fn lt(&self, other: &Value) -> InterpResult<Value> {
        let ord = self.compare(other, "<")?;
        Ok(Value::Bool(ord == Some(Ordering::Less)))
    }

    pub fn le(&self, other: &Value) -> InterpResult<Value> {
        let ord = self.compare(other, "<=")?;
        Ok(Value::Bool(matches!(ord, Some(Ordering::Less | Ordering::Equal))))
    }

    pub fn gt(&self, other: &Value) -> InterpResult<Value> {
        let ord = self.compare(other, ">")?;
        Ok(Value::Bool(ord == Some(Ordering::Greater)))
    }

    pub fn ge(&self, other: &Value) -> InterpResult<Value> {
        let ord = self.compare(other, ">=")?;
        Ok(Value::Bool(matches!(ord, Some(Ordering::Greater | Ordering::Equal))))
    }

    pub fn neg(&self) -> InterpResult<Value> {
        match *self {
            Value::Short(n) => Ok(Value::Short(n.wrapping_neg())),
            Value::Int(n) => Ok(Value::Int(n.wrapping_neg())),
            Value::Long(n) => Ok(Value::Long(n.wrapping_neg())),
            Value::Float(x) => Ok(Value::Float(-x)),
            Value::Double(x) => Ok(Value::Double(-x)),
            _ => Err(RuntimeError::type_error("numeric", self.type_name())),
        }
    }

    pub fn not(&self) -> InterpResult<Value> {
        match self {
            Value::Bool(b) => Ok(Value::Bool(!b)),
            _ => Err(RuntimeError::type_error("bool", self.type_name())),
        }
    }

    pub fn bit_not(&self) -> InterpResult<Value> {
        match *self {
            Value::Short(n) => Ok(Value::Short(!n)),
            Value::Int(n) => Ok(Value::Int(!n)),
            Value::Long(n) => Ok(Value::Long(!n)),
            _ => Err(RuntimeError::type_error("integral", self.type_name())),
        }
    }
}

fn write_float(f: &mut fmt::Formatter<'_>, x: f64, shortest: &dyn fmt::Display) -> fmt::Result {
    if x.is_finite() && x.fract() == 0.0 {
        write!(f, "{x:.1}")
    } else {
        write!(f, "{shortest}")
    }
}

fn write_escaped(f: &mut fmt::Formatter<'_>, text: &str, quote: char) -> fmt::Result {
    use fmt::Write;

    f.write_char(quote)?;
    for ch in text.chars() {
        match ch {
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            '\\' => f.write_str("\\\\")?,
            '\0' => f.write_str("\\0")?,
            c if c == quote => {
                f.write_char('\\')?;
                f.write_char(c)?;
            }
            c => f.write_char(c)?,
        }
    }
    f.write_char(quote)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Short(n) => write!(f, "{n}"),
            Value::Long(n) => write!(f, "{n}"),
            Value::Float(x) => write_float(f, *x as f64, x),
            Value::Double(x) => write_float(f, *x, x),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Char(c) => write_escaped(f, c.encode_utf8(&mut [0; 4]), '\''),
            Value::Str(s) => write_escaped(f, s, '"'),
            Value::Void => f.write_str("null"),
            Value::UserDefined(name) => write!(f, "<{name}>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::ErrorKind;

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Int(42).to_string(), "42");
        assert_eq!(Value::Long(-7).to_string(), "-7");
        assert_eq!(Value::Float(3.14).to_string(), "3.14");
        assert_eq!(Value::Double(2.0).to_string(), "2.0");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::Void.to_string(), "null");
        assert_eq!(Value::UserDefined("Point".into()).to_string(), "<Point>");
    }

    #[test]
    fn test_display_quotes_and_escapes() {
        assert_eq!(Value::Char('a').to_string(), "'a'");
        assert_eq!(Value::Char('\'').to_string(), r"'\''");
        assert_eq!(Value::Str("hi\n".into()).to_string(), r#""hi\n""#);
        assert_eq!(Value::Str("say \"x\"".into()).to_string(), r#""say \"x\"""#);
        assert_eq!(Value::Str("it's".into()).to_string(), r#""it's""#);
    }

    #[test]
    fn test_equality_compares_tag_and_payload() {
        assert_eq!(Value::Int(1), Value::Int(1));
        assert_ne!(Value::Int(1), Value::Long(1));
        assert_ne!(Value::Int(1), Value::Float(1.0));
        assert_ne!(Value::Char('1'), Value::Str("1".into()));
    }

    #[test]
    fn test_get_matching_tag() {
        assert_eq!(Value::Int(5).get::<i32>().unwrap(), 5);
        assert_eq!(Value::from("abc").get::<String>().unwrap(), "abc");
        assert!(Value::Bool(true).get::<bool>().unwrap());
    }

    #[test]
    fn test_get_mismatched_tag_is_type_error() {
        let err = Value::Int(5).get::<i64>().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Type);
        assert!(err.message.contains("long"));
    }

    #[test]
    fn test_promote_to_float() {
        let mut v = Value::Int(3);
        v.promote_to_float();
        assert_eq!(v, Value::Float(3.0));

        let mut s = Value::Short(3);
        s.promote_to_float();
        assert_eq!(s, Value::Short(3));
    }

    #[test]
    fn test_coerce_to() {
        assert_eq!(Value::Int(2).coerce_to(ValueType::Double), Some(Value::Double(2.0)));
        assert_eq!(Value::Int(2).coerce_to(ValueType::Int), Some(Value::Int(2)));
        assert_eq!(Value::Int(2).coerce_to(ValueType::Long), None);
        assert_eq!(Value::Bool(true).coerce_to(ValueType::Int), None);
    }

    #[test]
    fn test_integer_arithmetic() {
        assert_eq!(Value::Int(2).add(&Value::Int(3)).unwrap(), Value::Int(5));
        assert_eq!(Value::Int(5).div(&Value::Int(2)).unwrap(), Value::Int(2));
        assert_eq!(Value::Int(-7).rem(&Value::Int(2)).unwrap(), Value::Int(-1));
        assert_eq!(Value::Int(i32::MAX).add(&Value::Int(1)).unwrap(), Value::Int(i32::MIN));
    }

    #[test]
    fn test_promotion_takes_higher_rank() {
        assert_eq!(Value::Short(2).add(&Value::Int(3)).unwrap(), Value::Int(5));
        assert_eq!(Value::Int(2).mul(&Value::Long(3)).unwrap(), Value::Long(6));
        assert_eq!(Value::Long(1).add(&Value::Float(0.5)).unwrap(), Value::Float(1.5));
        assert_eq!(Value::Float(1.0).sub(&Value::Double(0.5)).unwrap(), Value::Double(0.5));
    }

    #[test]
    fn test_division_by_integral_zero() {
        for zero in [Value::Int(0), Value::Short(0), Value::Long(0)] {
            let err = Value::Int(5).div(&zero).unwrap_err();
            assert_eq!(err.kind, ErrorKind::ZeroDivision);
        }
        let err = Value::Double(1.0).rem(&Value::Int(0)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ZeroDivision);
    }

    #[test]
    fn test_division_by_float_zero_is_ieee() {
        let v = Value::Double(1.0).div(&Value::Double(0.0)).unwrap();
        assert_eq!(v, Value::Double(f64::INFINITY));
    }

    #[test]
    fn test_arithmetic_type_errors() {
        let err = Value::Bool(true).add(&Value::Int(1)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Type);
        assert!(err.message.contains("bool + int"));
        assert!(Value::from("a").add(&Value::from("b")).is_err());
        assert!(Value::Char('a').sub(&Value::Int(1)).is_err());
    }

    #[test]
    fn test_pow_yields_double() {
        assert_eq!(Value::Int(2).pow(&Value::Int(10)).unwrap(), Value::Double(1024.0));
        assert!(Value::Bool(true).pow(&Value::Int(2)).is_err());
    }

    #[test]
    fn test_bitwise() {
        assert_eq!(Value::Int(6).bit_and(&Value::Int(3)).unwrap(), Value::Int(2));
        assert_eq!(Value::Short(4).bit_or(&Value::Long(1)).unwrap(), Value::Long(5));
        assert_eq!(Value::Bool(true).bit_xor(&Value::Bool(true)).unwrap(), Value::Bool(false));
        assert!(Value::Float(1.0).bit_and(&Value::Int(1)).is_err());
        assert!(Value::Bool(true).bit_or(&Value::Int(1)).is_err());
    }

    #[test]
    fn test_logical_requires_bool() {
        assert_eq!(Value::Bool(true).and(&Value::Bool(false)).unwrap(), Value::Bool(false));
        assert_eq!(Value::Bool(false).or(&Value::Bool(true)).unwrap(), Value::Bool(true));
        assert_eq!(Value::Int(1).and(&Value::Bool(true)).unwrap_err().kind, ErrorKind::Type);
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(Value::Int(1).lt(&Value::Double(1.5)).unwrap(), Value::Bool(true));
        assert_eq!(Value::Char('b').ge(&Value::Char('a')).unwrap(), Value::Bool(true));
        assert_eq!(Value::from("abc").gt(&Value::from("abd")).unwrap(), Value::Bool(false));
        assert_eq!(Value::Long(3).le(&Value::Short(3)).unwrap(), Value::Bool(true));
        assert!(Value::from("a").lt(&Value::Int(1)).is_err());
    }

    #[test]
    fn test_unary() {
        assert_eq!(Value::Int(4).neg().unwrap(), Value::Int(-4));
        assert_eq!(Value::Bool(false).not().unwrap(), Value::Bool(true));
        assert_eq!(Value::Int(0).bit_not().unwrap(), Value::Int(-1));
        assert!(Value::Float(1.0).bit_not().is_err());
        assert!(Value::Int(1).not().is_err());
    }

    #[test]
    fn test_zero_values() {
        assert_eq!(ValueType::Double.zero_value(), Some(Value::Double(0.0)));
        assert_eq!(ValueType::Str.zero_value(), Some(Value::Str(String::new())));
        assert_eq!(ValueType::Void.zero_value(), None);
    }
}
