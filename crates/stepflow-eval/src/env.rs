//! The call stack: a stack of frames implementing lexical scoping.
//!
//! Lookups search from the innermost frame outwards, so inner declarations
//! shadow outer ones. Declarations only collide within the innermost frame.

use crate::error::WorkflowError;
use crate::value::{Bindings, Value};

/// Stack of name-to-value frames, innermost last.
#[derive(Debug, Default)]
pub struct CallStack {
    frames: Vec<Bindings>,
    pushes: usize,
    pops: usize,
}

impl CallStack {
    /// Create an empty stack with zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a new innermost frame seeded with `bindings`.
    pub fn push_frame(&mut self, bindings: Bindings) {
        self.frames.push(bindings);
        self.pushes += 1;
        tracing::trace!(depth = self.frames.len(), "push frame");
    }

    /// Remove and return the innermost frame.
    ///
    /// Returns `None` without counting a pop if the stack is already empty.
    pub fn pop_frame(&mut self) -> Option<Bindings> {
        let frame = self.frames.pop();
        if frame.is_some() {
            self.pops += 1;
            tracing::trace!(depth = self.frames.len(), "pop frame");
        } else {
            tracing::warn!("pop on empty call stack");
        }
        frame
    }

    /// Bind `name` in the innermost frame.
    ///
    /// Fails if the innermost frame already binds `name`, or if no frame
    /// is open.
    pub fn declare(&mut self, name: &str, value: Value) -> crate::Result<()> {
        let depth = self.frames.len();
        let Some(frame) = self.frames.last_mut() else {
            return Err(WorkflowError::no_active_frame(name));
        };
        if frame.contains_key(name) {
            return Err(WorkflowError::name_already_bound(name));
        }
        frame.insert(name.to_string(), value);
        tracing::trace!(name, depth, "declare");
        Ok(())
    }

    /// Find the innermost binding of `name`.
    pub fn lookup(&self, name: &str) -> crate::Result<&Value> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.get(name))
            .ok_or_else(|| WorkflowError::unbound_identifier(name))
    }

    /// Number of live frames.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Total frames pushed over this stack's lifetime.
    pub fn pushes(&self) -> usize {
        self.pushes
    }

    /// Total frames popped over this stack's lifetime.
    pub fn pops(&self) -> usize {
        self.pops
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_lookup_innermost_first() {
        let mut stack = CallStack::new();
        stack.push_frame(Bindings::new());
        stack.declare("x", Value::from(1)).unwrap();

        stack.push_frame(Bindings::new());
        stack.declare("x", Value::from(2)).unwrap();
        assert_eq!(stack.lookup("x").unwrap(), &Value::from(2));

        stack.pop_frame();
        assert_eq!(stack.lookup("x").unwrap(), &Value::from(1));
    }

    #[test]
    fn test_declare_collides_only_in_innermost_frame() {
        let mut stack = CallStack::new();
        stack.push_frame(Bindings::from([("x".to_string(), Value::from("arg"))]));

        let err = stack.declare("x", Value::from("again")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NameAlreadyBound);
        assert_eq!(stack.lookup("x").unwrap(), &Value::from("arg"));

        stack.push_frame(Bindings::new());
        assert!(stack.declare("x", Value::from("inner")).is_ok());
    }

    #[test]
    fn test_unbound_lookup() {
        let mut stack = CallStack::new();
        stack.push_frame(Bindings::new());
        let err = stack.lookup("missing").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnboundIdentifier);
    }

    #[test]
    fn test_push_pop_accounting() {
        let mut stack = CallStack::new();
        stack.push_frame(Bindings::new());
        stack.push_frame(Bindings::new());
        assert!(stack.pop_frame().is_some());
        assert!(stack.pop_frame().is_some());
        assert_eq!(stack.depth(), 0);
        assert_eq!(stack.pushes(), 2);
        assert_eq!(stack.pops(), 2);
    }

    #[test]
    fn test_pop_empty_stack_is_reported() {
        let mut stack = CallStack::new();
        stack.push_frame(Bindings::from([("x".to_string(), Value::from(1))]));

        let frame = stack.pop_frame().unwrap();
        assert_eq!(frame["x"], Value::from(1));
        assert_eq!(stack.pop_frame(), None);
        assert_eq!(stack.pops(), 1);
    }

    #[test]
    fn test_declare_without_frame_fails() {
        let mut stack = CallStack::new();
        let err = stack.declare("x", Value::from(1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoActiveFrame);
        assert_eq!(stack.depth(), 0);
        assert_eq!(stack.pushes(), 0);
        assert!(stack.lookup("x").is_err());
    }
}
