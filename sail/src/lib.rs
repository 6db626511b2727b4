// Sail Evaluator Library
// Core evaluation engine for the Sail language: parsed expression trees in,
// values out. The reader, the full primitive library and any host surface
// (REPL, threading, graphics) are external collaborators.

pub mod runtime;

// Re-export the key components for embedding hosts.
pub use runtime::evaluator::Evaluator;
pub use runtime::{EvalError, EvalResult, FrameId, StandardLibrary, Symbol, Value};
