// Runtime value system for Sail
// Expression trees and evaluation results share this representation: the
// evaluator consumes parsed trees built from these values and produces them

use crate::runtime::environment::FrameId;
use itertools::Itertools;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A symbol, compared by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol(pub String);

impl Symbol {
    pub fn new(name: &str) -> Self {
        Symbol(name.to_string())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The canonical "nothing" result, also the empty list terminator
    Unit,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Symbol(Symbol),
    Pair(Rc<Pair>),
    Vector(Rc<RefCell<Vec<Value>>>),
    Primitive(Primitive),
    Closure(Rc<Closure>),
}

/// A cons cell. Proper lists are chains of pairs ending in `Unit`; any other
/// tail is legal as data but rejected where a proper operand list is required.
#[derive(Debug, PartialEq)]
pub struct Pair {
    pub head: Value,
    pub tail: Value,
}

/// A native operation registered by the host in the global frame.
#[derive(Clone)]
pub struct Primitive {
    pub name: String,
    pub func: Rc<dyn Fn(Vec<Value>) -> Result<Value, String>>,
}

impl fmt::Debug for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Primitive").field("name", &self.name).finish()
    }
}

impl PartialEq for Primitive {
    fn eq(&self, other: &Self) -> bool {
        // Compare primitives by registered name, not by function pointer
        self.name == other.name
    }
}

/// A user-defined function: parameter symbols, body expressions, and the
/// frame that was innermost when the `fn` form was evaluated.
#[derive(Debug)]
pub struct Closure {
    pub params: Vec<Symbol>,
    pub body: Vec<Value>,
    pub env: FrameId,
}

impl PartialEq for Closure {
    fn eq(&self, other: &Self) -> bool {
        // Closures compare by identity
        std::ptr::eq(self, other)
    }
}

impl Value {
    /// Exactly one value is falsy: the boolean false sentinel. `Unit`, `0`
    /// and the empty string are all truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Boolean(false))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Unit => "unit",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Pair(_) => "pair",
            Value::Vector(_) => "vector",
            Value::Primitive(_) => "primitive",
            Value::Closure(_) => "closure",
        }
    }

    pub fn symbol(name: &str) -> Value {
        Value::Symbol(Symbol::new(name))
    }

    pub fn string(s: &str) -> Value {
        Value::String(s.to_string())
    }

    pub fn pair(head: Value, tail: Value) -> Value {
        Value::Pair(Rc::new(Pair { head, tail }))
    }

    /// Build a proper list from elements.
    pub fn list(elements: Vec<Value>) -> Value {
        elements
            .into_iter()
            .rev()
            .fold(Value::Unit, |tail, head| Value::pair(head, tail))
    }

    pub fn vector(elements: Vec<Value>) -> Value {
        Value::Vector(Rc::new(RefCell::new(elements)))
    }

    /// Collect the elements of a proper list; `None` if the pair chain does
    /// not terminate in `Unit`.
    pub fn proper_list(&self) -> Option<Vec<Value>> {
        let mut elements = Vec::new();
        let mut value = self;
        loop {
            match value {
                Value::Unit => return Some(elements),
                Value::Pair(pair) => {
                    elements.push(pair.head.clone());
                    value = &pair.tail;
                }
                _ => return None,
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unit => write!(f, "()"),
            Value::Boolean(true) => write!(f, "#t"),
            Value::Boolean(false) => write!(f, "#f"),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Symbol(s) => write!(f, "{}", s),
            Value::Pair(_) => {
                write!(f, "(")?;
                let mut value = self;
                let mut first = true;
                loop {
                    match value {
                        Value::Pair(pair) => {
                            if !first {
                                write!(f, " ")?;
                            }
                            write!(f, "{}", pair.head)?;
                            first = false;
                            value = &pair.tail;
                        }
                        Value::Unit => break,
                        other => {
                            // Improper tail renders in dotted notation
                            write!(f, " . {}", other)?;
                            break;
                        }
                    }
                }
                write!(f, ")")
            }
            Value::Vector(v) => {
                write!(
                    f,
                    "[{}]",
                    v.borrow().iter().map(|item| item.to_string()).join(" ")
                )
            }
            Value::Primitive(p) => write!(f, "#<primitive:{}>", p.name),
            Value::Closure(_) => write!(f, "#<fn>"),
        }
    }
}
