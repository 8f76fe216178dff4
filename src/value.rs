use core::fmt;
use std::rc::Rc;

use itertools::Itertools;

use crate::parser::Node;


/// A user-defined function. Immutable once installed; the body is borrowed from the
/// syntax tree and evaluated anew on every call.
#[derive(Debug)]
pub struct Function<'a> {
    pub(crate) name: &'a str,
    pub(crate) params: Vec<&'a str>,
    pub(crate) body: &'a [Node<'a>],
}

impl<'a> Function<'a> {
    pub fn new(name: &'a str, params: Vec<&'a str>, body: &'a [Node<'a>]) -> Self {
        Self { name, params, body }
    }

    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn params(&self) -> &[&'a str] {
        &self.params
    }
}

/// Values produced by evaluation. Lists are never shared: every list operation
/// allocates a fresh vector.
#[derive(Debug, Clone)]
pub enum Value<'a> {
    Integer(i64),
    Boolean(bool),
    Float(f64),
    String(String),
    List(Vec<Value<'a>>),
    /// An unresolved name echoed back by a failed lookup, or a quoted name.
    Symbol(String),
    Function(Rc<Function<'a>>),
}

impl<'a> Value<'a> {
    /// Only an explicit `#f` is false.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Self::Boolean(false))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "integer",
            Self::Boolean(_) => "boolean",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::Symbol(_) => "symbol",
            Self::Function(_) => "function",
        }
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Symbol(name.into())
    }

    pub fn empty_list() -> Self {
        Self::List(Vec::new())
    }

    /// How many lists deep the value goes; zero for anything but a list.
    pub fn nesting(&self) -> usize {
        match self {
            Self::List(values) => 1 + values.iter().map(Value::nesting).max().unwrap_or(0),
            _ => 0,
        }
    }
}

impl<'a> PartialEq for Value<'a> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Integer(a), Self::Float(b)) | (Self::Float(b), Self::Integer(a)) => *a as f64 == *b,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Symbol(a), Self::Symbol(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// The external representation written by `display`.
impl<'a> fmt::Display for Value<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        stacker::maybe_grow(32 * 1024, 1024 * 1024, || match self {
            Self::Integer(value) => write!(f, "{}", value),
            Self::Boolean(true) => write!(f, "#t"),
            Self::Boolean(false) => write!(f, "#f"),
            // Negative zero prints as `0`
            Self::Float(value) if *value == 0.0 => write!(f, "0"),
            Self::Float(value) if value.is_finite() && value.fract() == 0.0 => write!(f, "{:.0}", value),
            Self::Float(value) => write!(f, "{}", value),
            Self::String(value) | Self::Symbol(value) => f.write_str(value),
            Self::List(values) => write!(f, "({})", values.iter().join(" ")),
            Self::Function(_) => write!(f, "#<procedure>"),
        })
    }
}
