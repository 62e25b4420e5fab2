use super::ast::BinOp;
use super::error::{Error, ErrorKind};
use std::fmt;

/// Static type of a value expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Boolean,
    Integer,
    Float,
    String,
}

impl Type {
    fn is_numeric(self) -> bool {
        self == Type::Integer || self == Type::Float
    }

    /// Result type of `l op r`, or `None` if the operator does not apply.
    pub fn binary(op: BinOp, l: Type, r: Type) -> Option<Type> {
        use self::BinOp::*;
        match op {
            Eq | Ne if l == r => Some(Type::Boolean),
            And | Or if l == Type::Boolean && r == Type::Boolean => Some(Type::Boolean),
            Gt | Lt | Ge | Le if l.is_numeric() && r.is_numeric() => Some(Type::Boolean),
            Add | Sub | Mul | Div if l.is_numeric() && r.is_numeric() => {
                if l == Type::Float || r == Type::Float {
                    Some(Type::Float)
                } else {
                    Some(Type::Integer)
                }
            }
            Add if l == Type::String && r == Type::String => Some(Type::String),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Type::Boolean => "Boolean",
            Type::Integer => "Integer",
            Type::Float => "Float",
            Type::String => "String",
        };
        f.write_str(name)
    }
}

/// Runtime value held in the variable store.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    /// Result of reading a name that was never written, and of calls that
    /// produce nothing.
    Absent,
}

impl Value {
    pub fn as_bool(&self) -> Result<bool, Error> {
        match self {
            Value::Boolean(b) => Ok(*b),
            v => Err(mismatch(format!("expected Boolean, got {}", v))),
        }
    }

    pub fn into_string(self) -> Result<String, Error> {
        match self {
            Value::String(s) => Ok(s),
            v => Err(mismatch(format!("expected String, got {}", v))),
        }
    }

    /// Applies a binary operator to two evaluated operands.
    pub fn binary(op: BinOp, l: Value, r: Value) -> Result<Value, Error> {
        use self::BinOp::*;
        match op {
            Eq => return Ok(Value::Boolean(l == r)),
            Ne => return Ok(Value::Boolean(l != r)),
            And => return Ok(Value::Boolean(l.as_bool()? && r.as_bool()?)),
            Or => return Ok(Value::Boolean(l.as_bool()? || r.as_bool()?)),
            _ => {}
        }
        match (l, r) {
            (Value::Integer(a), Value::Integer(b)) => integer_binary(op, a, b),
            (Value::Integer(a), Value::Float(b)) => float_binary(op, a as f64, b),
            (Value::Float(a), Value::Integer(b)) => float_binary(op, a, b as f64),
            (Value::Float(a), Value::Float(b)) => float_binary(op, a, b),
            (Value::String(a), Value::String(b)) if op == Add => Ok(Value::String(a + &b)),
            (l, r) => Err(mismatch(format!("cannot apply '{}' to {} and {}", op, l, r))),
        }
    }
}

fn mismatch(message: String) -> Error {
    Error::from(ErrorKind::Mismatch(message))
}

fn integer_binary(op: BinOp, a: i64, b: i64) -> Result<Value, Error> {
    use self::BinOp::*;
    let v = match op {
        Add => Value::Integer(a.wrapping_add(b)),
        Sub => Value::Integer(a.wrapping_sub(b)),
        Mul => Value::Integer(a.wrapping_mul(b)),
        Div if b == 0 => return Err(Error::from(ErrorKind::DivisionByZero)),
        Div => Value::Integer(a.wrapping_div(b)),
        Gt => Value::Boolean(a > b),
        Lt => Value::Boolean(a < b),
        Ge => Value::Boolean(a >= b),
        Le => Value::Boolean(a <= b),
        Eq | Ne | And | Or => unreachable!("handled for all operand types"),
    };
    Ok(v)
}

fn float_binary(op: BinOp, a: f64, b: f64) -> Result<Value, Error> {
    use self::BinOp::*;
    let v = match op {
        Add => Value::Float(a + b),
        Sub => Value::Float(a - b),
        Mul => Value::Float(a * b),
        Div => Value::Float(a / b),
        Gt => Value::Boolean(a > b),
        Lt => Value::Boolean(a < b),
        Ge => Value::Boolean(a >= b),
        Le => Value::Boolean(a <= b),
        Eq | Ne | And | Or => unreachable!("handled for all operand types"),
    };
    Ok(v)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::String(s) => f.write_str(s),
            Value::Absent => f.write_str("<absent>"),
        }
    }
}
