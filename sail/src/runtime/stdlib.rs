// Sail standard library
// Native primitives over the core value model: arithmetic, comparison,
// pair/list and vector operations, and printing. Arity and type checking
// are each primitive's own contract, reported through its error channel.

use crate::runtime::evaluator::Evaluator;
use crate::runtime::values::Value;
use itertools::Itertools;

/// Loads the standard primitives into an evaluator's global frame.
pub struct StandardLibrary;

impl StandardLibrary {
    pub fn install(evaluator: &mut Evaluator) {
        Self::load_arithmetic(evaluator);
        Self::load_comparison(evaluator);
        Self::load_collections(evaluator);
        evaluator.define_primitive("not", Self::not);
        evaluator.define_primitive("print", Self::print);
    }

    fn load_arithmetic(evaluator: &mut Evaluator) {
        evaluator.define_primitive("+", Self::add);
        evaluator.define_primitive("-", Self::subtract);
        evaluator.define_primitive("*", Self::multiply);
        evaluator.define_primitive("/", Self::divide);
    }

    fn load_comparison(evaluator: &mut Evaluator) {
        evaluator.define_primitive("=", Self::equal);
        evaluator.define_primitive("<", |args| Self::compare("<", args, |o| o.is_lt()));
        evaluator.define_primitive(">", |args| Self::compare(">", args, |o| o.is_gt()));
        evaluator.define_primitive("<=", |args| Self::compare("<=", args, |o| o.is_le()));
        evaluator.define_primitive(">=", |args| Self::compare(">=", args, |o| o.is_ge()));
    }

    fn load_collections(evaluator: &mut Evaluator) {
        evaluator.define_primitive("pair", Self::pair);
        evaluator.define_primitive("head", Self::head);
        evaluator.define_primitive("tail", Self::tail);
        evaluator.define_primitive("list", |args| Ok(Value::list(args)));
        evaluator.define_primitive("vector", |args| Ok(Value::vector(args)));
        evaluator.define_primitive("vec-get", Self::vec_get);
        evaluator.define_primitive("vec-set!", Self::vec_set);
        evaluator.define_primitive("vec-len", Self::vec_len);
    }

    fn add(args: Vec<Value>) -> Result<Value, String> {
        let mut acc = Number::Int(0);
        for arg in &args {
            acc = acc.combine(number("+", arg)?, |a, b| a + b, |a, b| a + b);
        }
        Ok(acc.into_value())
    }

    fn subtract(args: Vec<Value>) -> Result<Value, String> {
        let (first, rest) = split_numeric("-", &args)?;
        if rest.is_empty() {
            // Unary minus negates
            return Ok(first.negate().into_value());
        }
        let mut acc = first;
        for arg in rest {
            acc = acc.combine(number("-", arg)?, |a, b| a - b, |a, b| a - b);
        }
        Ok(acc.into_value())
    }

    fn multiply(args: Vec<Value>) -> Result<Value, String> {
        let mut acc = Number::Int(1);
        for arg in &args {
            acc = acc.combine(number("*", arg)?, |a, b| a * b, |a, b| a * b);
        }
        Ok(acc.into_value())
    }

    fn divide(args: Vec<Value>) -> Result<Value, String> {
        let (first, rest) = split_numeric("/", &args)?;
        if rest.is_empty() {
            return Err("/ expects at least 2 arguments".to_string());
        }
        let mut acc = first;
        for arg in rest {
            let divisor = number("/", arg)?;
            if matches!(divisor, Number::Int(0)) {
                return Err("division by zero".to_string());
            }
            acc = acc.combine(divisor, |a, b| a / b, |a, b| a / b);
        }
        Ok(acc.into_value())
    }

    fn equal(args: Vec<Value>) -> Result<Value, String> {
        match args.as_slice() {
            [a, b] => Ok(Value::Boolean(a == b)),
            _ => Err("= expects 2 arguments".to_string()),
        }
    }

    fn compare<F>(operation: &str, args: Vec<Value>, accept: F) -> Result<Value, String>
    where
        F: Fn(std::cmp::Ordering) -> bool,
    {
        match args.as_slice() {
            [a, b] => {
                let (a, b) = (number(operation, a)?, number(operation, b)?);
                let ordering = a
                    .as_float()
                    .partial_cmp(&b.as_float())
                    .ok_or_else(|| format!("{} cannot order these numbers", operation))?;
                Ok(Value::Boolean(accept(ordering)))
            }
            _ => Err(format!("{} expects 2 arguments", operation)),
        }
    }

    fn not(args: Vec<Value>) -> Result<Value, String> {
        match args.as_slice() {
            [value] => Ok(Value::Boolean(!value.is_truthy())),
            _ => Err("not expects 1 argument".to_string()),
        }
    }

    fn pair(args: Vec<Value>) -> Result<Value, String> {
        match args.as_slice() {
            [head, tail] => Ok(Value::pair(head.clone(), tail.clone())),
            _ => Err("pair expects 2 arguments".to_string()),
        }
    }

    fn head(args: Vec<Value>) -> Result<Value, String> {
        match args.as_slice() {
            [Value::Pair(pair)] => Ok(pair.head.clone()),
            [other] => Err(format!("head expects a pair, got {}", other.type_name())),
            _ => Err("head expects 1 argument".to_string()),
        }
    }

    fn tail(args: Vec<Value>) -> Result<Value, String> {
        match args.as_slice() {
            [Value::Pair(pair)] => Ok(pair.tail.clone()),
            [other] => Err(format!("tail expects a pair, got {}", other.type_name())),
            _ => Err("tail expects 1 argument".to_string()),
        }
    }

    fn vec_get(args: Vec<Value>) -> Result<Value, String> {
        match args.as_slice() {
            [Value::Vector(items), Value::Integer(index)] => {
                let items = items.borrow();
                usize::try_from(*index)
                    .ok()
                    .and_then(|i| items.get(i).cloned())
                    .ok_or_else(|| format!("index {} out of bounds for length {}", index, items.len()))
            }
            _ => Err("vec-get expects (vector index)".to_string()),
        }
    }

    fn vec_set(args: Vec<Value>) -> Result<Value, String> {
        match args.as_slice() {
            [Value::Vector(items), Value::Integer(index), value] => {
                let mut items = items.borrow_mut();
                let length = items.len();
                let slot = usize::try_from(*index)
                    .ok()
                    .and_then(|i| items.get_mut(i))
                    .ok_or_else(|| format!("index {} out of bounds for length {}", index, length))?;
                *slot = value.clone();
                Ok(value.clone())
            }
            _ => Err("vec-set! expects (vector index value)".to_string()),
        }
    }

    fn vec_len(args: Vec<Value>) -> Result<Value, String> {
        match args.as_slice() {
            [Value::Vector(items)] => Ok(Value::Integer(items.borrow().len() as i64)),
            [other] => Err(format!("vec-len expects a vector, got {}", other.type_name())),
            _ => Err("vec-len expects 1 argument".to_string()),
        }
    }

    fn print(args: Vec<Value>) -> Result<Value, String> {
        println!("{}", args.iter().map(|arg| arg.to_string()).join(" "));
        Ok(Value::Unit)
    }
}

/// Numeric accumulator with integer-to-float promotion: a float anywhere in
/// the fold makes the result a float.
#[derive(Clone, Copy)]
enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    fn combine<I, F>(self, other: Number, int_op: I, float_op: F) -> Number
    where
        I: Fn(i64, i64) -> i64,
        F: Fn(f64, f64) -> f64,
    {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => Number::Int(int_op(a, b)),
            (a, b) => Number::Float(float_op(a.as_float(), b.as_float())),
        }
    }

    fn negate(self) -> Number {
        match self {
            Number::Int(n) => Number::Int(-n),
            Number::Float(f) => Number::Float(-f),
        }
    }

    fn as_float(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Float(f) => f,
        }
    }

    fn into_value(self) -> Value {
        match self {
            Number::Int(n) => Value::Integer(n),
            Number::Float(f) => Value::Float(f),
        }
    }
}

fn number(operation: &str, value: &Value) -> Result<Number, String> {
    match value {
        Value::Integer(n) => Ok(Number::Int(*n)),
        Value::Float(f) => Ok(Number::Float(*f)),
        other => Err(format!(
            "{} expects numbers, got {}",
            operation,
            other.type_name()
        )),
    }
}

fn split_numeric<'a>(operation: &str, args: &'a [Value]) -> Result<(Number, &'a [Value]), String> {
    let (first, rest) = args
        .split_first()
        .ok_or_else(|| format!("{} expects at least 1 argument", operation))?;
    Ok((number(operation, first)?, rest))
}
