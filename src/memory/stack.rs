//! Call stack implementation
//!
//! This module provides the call stack for function execution:
//! - [`Stack`]: The call stack containing frames
//! - [`StackFrame`]: A single function's activation record
//! - [`Binding`]: A variable slot bound to its storage object
//!
//! A frame owns the objects bound in it. Closing a scope unbinds the
//! objects declared inside it and hands them back for release; popping the
//! frame hands back everything that is left.

use super::value::ObjectId;
use crate::parser::ast::SourceLocation;
use crate::semantic::SymbolId;

/// A slot bound to an object, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub slot: usize,
    pub symbol: SymbolId,
    pub object: ObjectId,
}

/// Stack frame for a function call
#[derive(Debug, Clone)]
pub struct StackFrame {
    pub function_name: String,
    pub call_site: Option<SourceLocation>, // Where the call was made
    slots: Vec<Option<ObjectId>>,
    bindings: Vec<Binding>,
    scope_marks: Vec<usize>,
}

impl StackFrame {
    pub fn new(function_name: String, call_site: Option<SourceLocation>, slot_count: usize) -> Self {
        StackFrame {
            function_name,
            call_site,
            slots: vec![None; slot_count],
            bindings: Vec::new(),
            scope_marks: Vec::new(),
        }
    }

    /// Enter a new scope
    pub fn push_scope(&mut self) {
        self.scope_marks.push(self.bindings.len());
    }

    /// Exit the current scope, returning the objects it declared
    pub fn pop_scope(&mut self) -> Vec<ObjectId> {
        let mark = self.scope_marks.pop().unwrap_or(0);
        self.unbind_from(mark)
    }

    /// Unbind everything, returning every object the frame still owns
    pub fn release_all(&mut self) -> Vec<ObjectId> {
        self.scope_marks.clear();
        self.unbind_from(0)
    }

    fn unbind_from(&mut self, mark: usize) -> Vec<ObjectId> {
        let mut released = Vec::with_capacity(self.bindings.len().saturating_sub(mark));
        for binding in self.bindings.drain(mark..).rev() {
            if let Some(slot) = self.slots.get_mut(binding.slot) {
                *slot = None;
            }
            released.push(binding.object);
        }
        released
    }

    /// Bind `slot` to a freshly allocated object in the current scope
    pub fn bind(&mut self, slot: usize, symbol: SymbolId, object: ObjectId) {
        if slot >= self.slots.len() {
            self.slots.resize(slot + 1, None);
        }
        self.slots[slot] = Some(object);
        self.bindings.push(Binding {
            slot,
            symbol,
            object,
        });
    }

    /// The object currently bound to `slot`
    pub fn slot(&self, slot: usize) -> Option<ObjectId> {
        self.slots.get(slot).copied().flatten()
    }

    /// Live bindings in declaration order (for snapshots)
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }
}

/// The call stack
#[derive(Debug, Clone, Default)]
pub struct Stack {
    frames: Vec<StackFrame>,
}

impl Stack {
    pub fn new() -> Self {
        Stack { frames: Vec::new() }
    }

    /// Push a new stack frame
    pub fn push_frame(&mut self, frame: StackFrame) {
        self.frames.push(frame);
    }

    /// Pop the top stack frame
    pub fn pop_frame(&mut self) -> Option<StackFrame> {
        self.frames.pop()
    }

    /// Get the current (top) frame
    pub fn current_frame(&self) -> Option<&StackFrame> {
        self.frames.last()
    }

    /// Get a mutable reference to the current frame
    pub fn current_frame_mut(&mut self) -> Option<&mut StackFrame> {
        self.frames.last_mut()
    }

    /// Get all frames (for UI display)
    pub fn frames(&self) -> &[StackFrame] {
        &self.frames
    }

    /// Get the depth of the call stack
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(serial: usize) -> ObjectId {
        ObjectId { serial, name: 0 }
    }

    #[test]
    fn test_scope_pop_unbinds_inner_declarations() {
        let mut frame = StackFrame::new("main".to_string(), None, 3);
        frame.push_scope();
        frame.bind(0, 10, id(100));
        frame.push_scope();
        frame.bind(1, 11, id(101));
        frame.bind(2, 12, id(102));

        assert_eq!(frame.pop_scope(), vec![id(102), id(101)]);
        assert_eq!(frame.slot(1), None);
        assert_eq!(frame.slot(0), Some(id(100)));
        assert_eq!(frame.bindings().len(), 1);
    }

    #[test]
    fn test_release_all() {
        let mut frame = StackFrame::new("f".to_string(), None, 2);
        frame.bind(0, 0, id(7));
        frame.push_scope();
        frame.bind(1, 1, id(8));

        assert_eq!(frame.release_all(), vec![id(8), id(7)]);
        assert!(frame.bindings().is_empty());
    }

    #[test]
    fn test_stack_frames() {
        let mut stack = Stack::new();
        stack.push_frame(StackFrame::new("main".to_string(), None, 0));
        stack.push_frame(StackFrame::new(
            "fac".to_string(),
            Some(SourceLocation::new(3, 5)),
            1,
        ));
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.current_frame().map(|f| f.function_name.as_str()), Some("fac"));
        stack.pop_frame();
        assert_eq!(stack.depth(), 1);
    }
}
