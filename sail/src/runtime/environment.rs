// Environment frames for variable bindings and scope management

use crate::runtime::error::{EvalError, EvalResult};
use crate::runtime::values::{Symbol, Value};
use std::collections::HashMap;

/// Index of a frame in the arena. Copyable; closures store one of these
/// instead of owning a reference into the scope chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(u32);

/// One scope level: bindings plus an optional parent frame.
#[derive(Debug, Default)]
struct Frame {
    bindings: HashMap<String, Value>,
    parent: Option<FrameId>,
}

/// Arena of frames forming the scope chain.
///
/// Every frame created during evaluation lives here; parent links are
/// indices, so any number of closures may share a frame without ownership
/// cycles. Frames form a DAG rooted at the global frame and live as long as
/// the arena itself.
#[derive(Debug)]
pub struct Environment {
    frames: Vec<Frame>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    /// Create an arena holding only the root/global frame.
    pub fn new() -> Self {
        Environment {
            frames: vec![Frame::default()],
        }
    }

    /// The root frame, ancestor of every chain in this arena.
    pub fn global(&self) -> FrameId {
        FrameId(0)
    }

    /// Create a new empty frame parented to `parent`.
    pub fn child(&mut self, parent: FrameId) -> FrameId {
        let id = FrameId(self.frames.len() as u32);
        self.frames.push(Frame {
            bindings: HashMap::new(),
            parent: Some(parent),
        });
        id
    }

    /// Look up a symbol from `frame` outward through the parent chain.
    pub fn lookup(&self, frame: FrameId, symbol: &Symbol) -> EvalResult<Value> {
        let mut current = Some(frame);
        while let Some(id) = current {
            let frame = &self.frames[id.0 as usize];
            if let Some(value) = frame.bindings.get(&symbol.0) {
                return Ok(value.clone());
            }
            current = frame.parent;
        }
        Err(EvalError::UnboundSymbol(symbol.clone()))
    }

    /// Bind a symbol in `frame` itself, shadowing any outer binding of the
    /// same name without altering it.
    pub fn define(&mut self, frame: FrameId, symbol: &Symbol, value: Value) {
        self.frames[frame.0 as usize]
            .bindings
            .insert(symbol.0.clone(), value);
    }

    /// Mutate the nearest existing binding of `symbol`, searching from
    /// `frame` outward. Fails if no frame in the chain binds it.
    pub fn set(&mut self, frame: FrameId, symbol: &Symbol, value: Value) -> EvalResult<()> {
        let mut current = Some(frame);
        while let Some(id) = current {
            let frame = &mut self.frames[id.0 as usize];
            if let Some(slot) = frame.bindings.get_mut(&symbol.0) {
                *slot = value;
                return Ok(());
            }
            current = frame.parent;
        }
        Err(EvalError::UnboundSymbol(symbol.clone()))
    }

    /// Check whether `frame` itself (not its parents) binds a symbol.
    pub fn contains(&self, frame: FrameId, symbol: &Symbol) -> bool {
        self.frames[frame.0 as usize]
            .bindings
            .contains_key(&symbol.0)
    }
}
