//! Pointer gestures (drag, resize) as explicit state
//!
//! A gesture owns a [`PointerCapture`] for its whole lifetime. The capture
//! stands in for the global pointer-move/pointer-up listeners the gesture
//! needs, and is released by `Drop`, so ending, cancelling, replacing or
//! dropping a gesture all release it exactly once.

use std::cell::Cell;
use std::rc::Rc;
use tracing::trace;

use crate::types::{Position, Size};

/// Which resize affordance started the gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeHandle {
    /// Bottom-right corner, resizes both axes
    Corner,
    /// Right edge, resizes width only
    Edge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    Drag,
    Resize(ResizeHandle),
}

/// Counts live pointer captures
#[derive(Debug, Clone, Default)]
pub struct CaptureRegistry {
    active: Rc<Cell<usize>>,
}

impl CaptureRegistry {
    pub fn acquire(&self) -> PointerCapture {
        self.active.set(self.active.get() + 1);
        trace!(active = self.active.get(), "Pointer capture acquired");
        PointerCapture {
            active: Rc::clone(&self.active),
        }
    }

    pub fn active(&self) -> usize {
        self.active.get()
    }
}

/// Scoped pointer listener registration
#[derive(Debug)]
pub struct PointerCapture {
    active: Rc<Cell<usize>>,
}

impl Drop for PointerCapture {
    fn drop(&mut self) {
        self.active.set(self.active.get().saturating_sub(1));
        trace!(active = self.active.get(), "Pointer capture released");
    }
}

/// An in-progress gesture on one item
#[derive(Debug)]
pub struct Gesture {
    pub target_id: String,
    pub kind: GestureKind,
    pub origin_position: Position,
    pub origin_size: Size,
    pub origin_pointer: Position,
    _capture: PointerCapture,
}

impl Gesture {
    pub fn new(
        target_id: String,
        kind: GestureKind,
        origin_position: Position,
        origin_size: Size,
        origin_pointer: Position,
        capture: PointerCapture,
    ) -> Self {
        Self {
            target_id,
            kind,
            origin_position,
            origin_size,
            origin_pointer,
            _capture: capture,
        }
    }

    /// Cumulative pointer travel since the gesture started
    pub fn travel(&self, pointer: Position) -> Position {
        pointer - self.origin_pointer
    }

    /// Item position implied by the pointer for a drag gesture
    pub fn dragged_position(&self, pointer: Position) -> Position {
        self.origin_position + self.travel(pointer)
    }

    /// Requested (unclamped) size for a resize gesture
    ///
    /// `current_height` is kept as-is for edge resizes.
    pub fn resized_size(&self, handle: ResizeHandle, pointer: Position, current_height: f32) -> Size {
        let travel = self.travel(pointer);
        match handle {
            ResizeHandle::Corner => Size::new(
                self.origin_size.width + travel.x,
                self.origin_size.height + travel.y,
            ),
            ResizeHandle::Edge => Size::new(self.origin_size.width + travel.x, current_height),
        }
    }
}
