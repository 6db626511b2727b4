// Sail evaluator - walks parsed expression trees and produces values

use crate::runtime::environment::{Environment, FrameId};
use crate::runtime::error::{EvalError, EvalResult};
use crate::runtime::values::{Closure, Pair, Primitive, Symbol, Value};
use log::{debug, trace};
use std::rc::Rc;

/// The closed set of syntactic forms whose operands are not uniformly
/// pre-evaluated.
const SPECIAL_FORMS: [&str; 7] = ["def", "set", "if", "while", "do", "fn", "quote"];

/// Tree-walking evaluator over the Sail value model.
///
/// Owns the frame arena; hosts register primitives in the global frame
/// before evaluating user expressions. Single-threaded and re-entrant: a
/// call to `evaluate` may recurse into `evaluate`/`apply` freely, and
/// independent evaluators share nothing.
pub struct Evaluator {
    pub env: Environment,
    depth: usize,
    max_depth: usize,
}

impl Evaluator {
    pub fn new() -> Self {
        Evaluator {
            env: Environment::new(),
            depth: 0,
            max_depth: 1000,
        }
    }

    /// Evaluator with a custom recursion bound. Depth counts nested
    /// `evaluate` calls: expression nesting plus active non-tail calls.
    pub fn with_recursion_limit(max_depth: usize) -> Self {
        Evaluator {
            env: Environment::new(),
            depth: 0,
            max_depth,
        }
    }

    /// The global frame, root of every scope chain in this evaluator.
    pub fn global(&self) -> FrameId {
        self.env.global()
    }

    /// Bind a native operation in the global frame. Arity and type checking
    /// are the primitive's own contract; failures travel through its string
    /// error channel and surface as `PrimitiveError`.
    pub fn define_primitive<F>(&mut self, name: &str, func: F)
    where
        F: Fn(Vec<Value>) -> Result<Value, String> + 'static,
    {
        let global = self.env.global();
        self.env.define(
            global,
            &Symbol::new(name),
            Value::Primitive(Primitive {
                name: name.to_string(),
                func: Rc::new(func),
            }),
        );
    }

    /// Evaluate a top-level program: each expression in order in a fresh
    /// frame derived from the global frame, returning the value of the last
    /// expression (`Unit` for an empty program).
    pub fn eval_program(&mut self, exprs: &[Value]) -> EvalResult<Value> {
        debug!("evaluating program of {} expressions", exprs.len());
        let frame = self.env.child(self.env.global());
        let mut result = Value::Unit;
        for expr in exprs {
            result = self.evaluate(expr, frame)?;
        }
        Ok(result)
    }

    /// Evaluate one expression in the scope chain rooted at `frame`.
    pub fn evaluate(&mut self, expr: &Value, frame: FrameId) -> EvalResult<Value> {
        if self.depth >= self.max_depth {
            return Err(EvalError::RecursionLimit(self.max_depth));
        }
        self.depth += 1;
        let result = self.eval_expr(expr, frame);
        self.depth -= 1;
        result
    }

    fn eval_expr(&mut self, expr: &Value, frame: FrameId) -> EvalResult<Value> {
        match expr {
            Value::Symbol(symbol) => self.env.lookup(frame, symbol),
            Value::Pair(pair) => self.eval_pair(pair, frame),
            // Numbers, strings, booleans, unit, vectors and callables
            // evaluate to themselves
            _ => Ok(expr.clone()),
        }
    }

    fn eval_pair(&mut self, pair: &Pair, frame: FrameId) -> EvalResult<Value> {
        if let Value::Symbol(head) = &pair.head {
            if SPECIAL_FORMS.contains(&head.0.as_str()) {
                return self.eval_special_form(&head.0, &pair.tail, frame);
            }
        }

        let operator = self.evaluate(&pair.head, frame)?;
        let operand_exprs = pair.tail.proper_list().ok_or_else(|| {
            EvalError::MalformedExpression("improper argument list in application".to_string())
        })?;

        // Operands evaluate eagerly, left to right; a failure aborts the
        // application with earlier side effects already committed
        let mut args = Vec::with_capacity(operand_exprs.len());
        for expr in &operand_exprs {
            args.push(self.evaluate(expr, frame)?);
        }

        self.apply(operator, args)
    }

    /// Apply a callable to already-evaluated arguments.
    pub fn apply(&mut self, callable: Value, args: Vec<Value>) -> EvalResult<Value> {
        match callable {
            Value::Primitive(primitive) => {
                trace!("invoking primitive {}", primitive.name);
                let result = (primitive.func)(args);
                result.map_err(|message| EvalError::PrimitiveError {
                    name: primitive.name,
                    message,
                })
            }
            Value::Closure(closure) => {
                if args.len() != closure.params.len() {
                    return Err(EvalError::ArityMismatch {
                        expected: closure.params.len(),
                        got: args.len(),
                    });
                }
                trace!("applying closure of {} parameters", closure.params.len());
                // Lexical scoping: the call frame descends from the captured
                // frame, not from the caller's
                let call_frame = self.env.child(closure.env);
                for (param, arg) in closure.params.iter().zip(args) {
                    self.env.define(call_frame, param, arg);
                }
                self.eval_body(&closure.body, call_frame)
            }
            other => Err(EvalError::NotCallable(other.type_name().to_string())),
        }
    }

    fn eval_special_form(&mut self, name: &str, tail: &Value, frame: FrameId) -> EvalResult<Value> {
        let operands = tail.proper_list().ok_or_else(|| {
            EvalError::MalformedExpression(format!("{}: improper operand list", name))
        })?;

        match name {
            "def" => self.eval_def(&operands, frame),
            "set" => self.eval_set(&operands, frame),
            "if" => self.eval_if(&operands, frame),
            "while" => self.eval_while(&operands, frame),
            "do" => self.eval_body(&operands, frame),
            "fn" => self.eval_fn(&operands, frame),
            "quote" => eval_quote(&operands),
            _ => unreachable!("dispatch covers every special form"),
        }
    }

    fn eval_def(&mut self, operands: &[Value], frame: FrameId) -> EvalResult<Value> {
        let (name, value_expr) = binding_operands("def", operands)?;
        let value = self.evaluate(value_expr, frame)?;
        self.env.define(frame, name, value.clone());
        Ok(value)
    }

    fn eval_set(&mut self, operands: &[Value], frame: FrameId) -> EvalResult<Value> {
        let (name, value_expr) = binding_operands("set", operands)?;
        let value = self.evaluate(value_expr, frame)?;
        self.env.set(frame, name, value.clone())?;
        Ok(value)
    }

    fn eval_if(&mut self, operands: &[Value], frame: FrameId) -> EvalResult<Value> {
        let (cond, then_branch, else_branch) = match operands {
            [cond, then_branch] => (cond, then_branch, None),
            [cond, then_branch, else_branch] => (cond, then_branch, Some(else_branch)),
            _ => {
                return Err(EvalError::MalformedExpression(
                    "if expects (cond then [else])".to_string(),
                ))
            }
        };

        // Exactly one branch is evaluated
        if self.evaluate(cond, frame)?.is_truthy() {
            self.evaluate(then_branch, frame)
        } else if let Some(else_branch) = else_branch {
            self.evaluate(else_branch, frame)
        } else {
            Ok(Value::Unit)
        }
    }

    fn eval_while(&mut self, operands: &[Value], frame: FrameId) -> EvalResult<Value> {
        let (cond, body) = operands.split_first().ok_or_else(|| {
            EvalError::MalformedExpression("while expects (cond body...)".to_string())
        })?;

        // An always-true condition loops indefinitely; bounding iteration is
        // the host's concern
        while self.evaluate(cond, frame)?.is_truthy() {
            for expr in body {
                self.evaluate(expr, frame)?;
            }
        }
        Ok(Value::Unit)
    }

    fn eval_body(&mut self, exprs: &[Value], frame: FrameId) -> EvalResult<Value> {
        let mut result = Value::Unit;
        for expr in exprs {
            result = self.evaluate(expr, frame)?;
        }
        Ok(result)
    }

    fn eval_fn(&mut self, operands: &[Value], frame: FrameId) -> EvalResult<Value> {
        let (params_expr, body) = operands.split_first().ok_or_else(|| {
            EvalError::MalformedExpression("fn expects (param-list body...)".to_string())
        })?;
        let params = param_symbols(params_expr)?;

        // The defining frame is captured by index, never copied
        Ok(Value::Closure(Rc::new(Closure {
            params,
            body: body.to_vec(),
            env: frame,
        })))
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

fn eval_quote(operands: &[Value]) -> EvalResult<Value> {
    match operands {
        [expr] => Ok(expr.clone()),
        _ => Err(EvalError::MalformedExpression(
            "quote expects exactly one operand".to_string(),
        )),
    }
}

fn binding_operands<'a>(form: &str, operands: &'a [Value]) -> EvalResult<(&'a Symbol, &'a Value)> {
    match operands {
        [Value::Symbol(name), value_expr] => Ok((name, value_expr)),
        _ => Err(EvalError::MalformedExpression(format!(
            "{} expects (name value-expr)",
            form
        ))),
    }
}

fn param_symbols(params: &Value) -> EvalResult<Vec<Symbol>> {
    let elements = match params {
        Value::Vector(items) => items.borrow().clone(),
        other => other.proper_list().ok_or_else(|| {
            EvalError::MalformedExpression("fn expects a parameter list".to_string())
        })?,
    };

    elements
        .iter()
        .map(|param| match param {
            Value::Symbol(symbol) => Ok(symbol.clone()),
            other => Err(EvalError::MalformedExpression(format!(
                "fn parameters must be symbols, got {}",
                other.type_name()
            ))),
        })
        .collect()
}
