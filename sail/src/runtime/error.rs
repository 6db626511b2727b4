// Error handling for the Sail runtime

use crate::runtime::values::Symbol;
use thiserror::Error;

pub type EvalResult<T> = Result<T, EvalError>;

/// Evaluation failures. All are recoverable at the call site of `evaluate`;
/// the evaluator performs no local recovery, and side effects committed
/// before the failing sub-expression are not rolled back.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// Symbol lookup or `set` target not found anywhere in the scope chain
    #[error("unbound symbol: {0}")]
    UnboundSymbol(Symbol),

    /// Operator position evaluated to a value that cannot be applied
    #[error("not callable: {0}")]
    NotCallable(String),

    /// Closure invoked with the wrong number of arguments
    #[error("arity mismatch: expected {expected}, got {got}")]
    ArityMismatch { expected: usize, got: usize },

    /// Special form operands do not match the required shape
    #[error("malformed expression: {0}")]
    MalformedExpression(String),

    /// Opaque failure surfaced from a native primitive, forwarded as-is
    #[error("primitive '{name}' failed: {message}")]
    PrimitiveError { name: String, message: String },

    /// Evaluator recursion bound exceeded
    #[error("recursion limit of {0} exceeded")]
    RecursionLimit(usize),
}
