use std::cmp::Ordering;

use crate::{error::EvalError, value::Value};


/// The fixed set of operators applied directly to host values. None of them is variadic:
/// `not` takes one operand, every other operator exactly two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HostOperator {
    Add,
    Sub,
    Mul,
    Pow,
    Div,
    Less,
    Greater,
    Equal,
    LessEq,
    GreaterEq,
    Not,
    And,
    Or,
    Mod,
}

#[derive(Debug, Clone, Copy)]
enum Number {
    Integer(i64),
    Float(f64),
}

impl Number {
    fn as_f64(self) -> f64 {
        match self {
            Self::Integer(value) => value as f64,
            Self::Float(value) => value,
        }
    }

    fn is_zero(self) -> bool {
        self.as_f64() == 0.0
    }
}

fn type_mismatch(operator: HostOperator, expected: &'static str, found: &Value<'_>) -> EvalError {
    EvalError::TypeMismatch {
        form: operator.name().to_owned(),
        expected,
        found: found.type_name().to_owned(),
    }
}

fn number(operator: HostOperator, value: &Value<'_>) -> Result<Number, EvalError> {
    match value {
        Value::Integer(value) => Ok(Number::Integer(*value)),
        Value::Float(value) => Ok(Number::Float(*value)),
        other => Err(type_mismatch(operator, "a number", other)),
    }
}

/// Integer power with two's-complement wrapping, by repeated squaring.
fn wrapping_pow(mut base: i64, mut exponent: u64) -> i64 {
    let mut result: i64 = 1;
    while exponent > 0 {
        if exponent & 1 == 1 {
            result = result.wrapping_mul(base);
        }
        base = base.wrapping_mul(base);
        exponent >>= 1;
    }
    result
}

/// Remainder carrying the sign of the divisor.
fn floored_mod_integer(a: i64, b: i64) -> i64 {
    let remainder = a.wrapping_rem(b);
    if remainder != 0 && (remainder < 0) != (b < 0) { remainder + b } else { remainder }
}

fn floored_mod_float(a: f64, b: f64) -> f64 {
    let remainder = a % b;
    if remainder != 0.0 && (remainder < 0.0) != (b < 0.0) { remainder + b } else { remainder }
}

fn arithmetic<'a>(
    operator: HostOperator,
    a: &Value<'a>,
    b: &Value<'a>,
    integer: impl Fn(i64, i64) -> i64,
    float: impl Fn(f64, f64) -> f64,
) -> Result<Value<'a>, EvalError> {
    Ok(match (number(operator, a)?, number(operator, b)?) {
        (Number::Integer(a), Number::Integer(b)) => Value::Integer(integer(a, b)),
        (a, b) => Value::Float(float(a.as_f64(), b.as_f64())),
    })
}

fn builtin_add<'a>(a: Value<'a>, b: Value<'a>) -> Result<Value<'a>, EvalError> {
    match (a, b) {
        (Value::String(mut a), Value::String(b)) => {
            a.push_str(&b);
            Ok(Value::String(a))
        }
        (Value::List(mut a), Value::List(b)) => {
            a.extend(b);
            Ok(Value::List(a))
        }
        (a, b) => arithmetic(HostOperator::Add, &a, &b, i64::wrapping_add, |a, b| a + b),
    }
}

fn builtin_pow<'a>(a: &Value<'a>, b: &Value<'a>) -> Result<Value<'a>, EvalError> {
    let operator = HostOperator::Pow;
    Ok(match (number(operator, a)?, number(operator, b)?) {
        (Number::Integer(base), Number::Integer(exponent)) if exponent >= 0 => {
            Value::Integer(wrapping_pow(base, exponent.unsigned_abs()))
        }
        (base, exponent) => Value::Float(base.as_f64().powf(exponent.as_f64())),
    })
}

fn builtin_div<'a>(a: &Value<'a>, b: &Value<'a>) -> Result<Value<'a>, EvalError> {
    let operator = HostOperator::Div;
    let (a, b) = (number(operator, a)?, number(operator, b)?);
    if b.is_zero() {
        return Err(EvalError::DivisionByZero { form: "/" });
    }
    Ok(Value::Float(a.as_f64() / b.as_f64()))
}

fn builtin_mod<'a>(a: &Value<'a>, b: &Value<'a>) -> Result<Value<'a>, EvalError> {
    let operator = HostOperator::Mod;
    let (a, b) = (number(operator, a)?, number(operator, b)?);
    if b.is_zero() {
        return Err(EvalError::DivisionByZero { form: "mod" });
    }
    Ok(match (a, b) {
        (Number::Integer(a), Number::Integer(b)) => Value::Integer(floored_mod_integer(a, b)),
        (a, b) => Value::Float(floored_mod_float(a.as_f64(), b.as_f64())),
    })
}

fn builtin_compare<'a>(
    operator: HostOperator,
    a: &Value<'a>,
    b: &Value<'a>,
    accept: impl Fn(Ordering) -> bool,
) -> Result<Value<'a>, EvalError> {
    let ordering = match (a, b) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::String(_), other) => return Err(type_mismatch(operator, "a string", other)),
        _ => match (number(operator, a)?, number(operator, b)?) {
            (Number::Integer(a), Number::Integer(b)) => Some(a.cmp(&b)),
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
        },
    };
    // NaN compares false against everything
    Ok(Value::Boolean(ordering.map_or(false, accept)))
}

impl HostOperator {
    pub(crate) fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "+" => Self::Add,
            "-" => Self::Sub,
            "*" => Self::Mul,
            "**" => Self::Pow,
            "/" => Self::Div,
            "<" => Self::Less,
            ">" => Self::Greater,
            "=" => Self::Equal,
            "<=" => Self::LessEq,
            ">=" => Self::GreaterEq,
            "not" => Self::Not,
            "and" => Self::And,
            "or" => Self::Or,
            "mod" => Self::Mod,
            _ => return None,
        })
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Pow => "**",
            Self::Div => "/",
            Self::Less => "<",
            Self::Greater => ">",
            Self::Equal => "=",
            Self::LessEq => "<=",
            Self::GreaterEq => ">=",
            Self::Not => "not",
            Self::And => "and",
            Self::Or => "or",
            Self::Mod => "mod",
        }
    }

    pub(crate) fn arity(self) -> usize {
        match self {
            Self::Not => 1,
            _ => 2,
        }
    }

    /// Applies the operator to already evaluated operands. The caller guarantees that
    /// `operands.len() == self.arity()`.
    pub(crate) fn apply<'a>(self, operands: Vec<Value<'a>>) -> Result<Value<'a>, EvalError> {
        let mut operands = operands.into_iter();
        let (Some(a), b) = (operands.next(), operands.next()) else {
            return Err(EvalError::malformed(self.name(), "missing operand"));
        };

        if self == Self::Not {
            return Ok(Value::Boolean(!a.is_truthy()));
        }
        let Some(b) = b else {
            return Err(EvalError::malformed(self.name(), "missing operand"));
        };

        match self {
            Self::Add => builtin_add(a, b),
            Self::Sub => arithmetic(self, &a, &b, i64::wrapping_sub, |a, b| a - b),
            Self::Mul => arithmetic(self, &a, &b, i64::wrapping_mul, |a, b| a * b),
            Self::Pow => builtin_pow(&a, &b),
            Self::Div => builtin_div(&a, &b),
            Self::Mod => builtin_mod(&a, &b),
            Self::Less => builtin_compare(self, &a, &b, Ordering::is_lt),
            Self::Greater => builtin_compare(self, &a, &b, Ordering::is_gt),
            Self::LessEq => builtin_compare(self, &a, &b, Ordering::is_le),
            Self::GreaterEq => builtin_compare(self, &a, &b, Ordering::is_ge),
            Self::Equal => Ok(Value::Boolean(a == b)),
            // Both operands were evaluated already; there is no short-circuit
            Self::And => Ok(if a.is_truthy() { b } else { a }),
            Self::Or => Ok(if a.is_truthy() { a } else { b }),
            Self::Not => unreachable!("handled above"),
        }
    }
}
