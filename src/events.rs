//! Pointer events and per-kind subscriber slots

use crate::geometry::{Point, Rect};

/// A pointer sample in absolute (screen) coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub x: f32,
    pub y: f32,
    /// Screen rectangle occupied by the drawing surface when the event fired
    pub bounds: Rect,
}

impl PointerEvent {
    pub fn new(x: f32, y: f32, bounds: Rect) -> Self {
        Self { x, y, bounds }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn bounding_box(&self) -> Rect {
        self.bounds
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Move,
    Up,
}

pub type PointerCallback = Box<dyn FnMut(&PointerEvent)>;

/// One optional subscriber per pointer kind; registering again replaces the old one
#[derive(Default)]
pub struct Subscriptions {
    down: Option<PointerCallback>,
    moved: Option<PointerCallback>,
    up: Option<PointerCallback>,
}

impl Subscriptions {
    pub fn set(&mut self, kind: PointerKind, callback: PointerCallback) {
        *self.slot(kind) = Some(callback);
    }

    pub fn notify(&mut self, kind: PointerKind, event: &PointerEvent) {
        if let Some(callback) = self.slot(kind) {
            callback(event);
        }
    }

    fn slot(&mut self, kind: PointerKind) -> &mut Option<PointerCallback> {
        match kind {
            PointerKind::Down => &mut self.down,
            PointerKind::Move => &mut self.moved,
            PointerKind::Up => &mut self.up,
        }
    }
}

impl std::fmt::Debug for Subscriptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscriptions")
            .field("down", &self.down.is_some())
            .field("move", &self.moved.is_some())
            .field("up", &self.up.is_some())
            .finish()
    }
}
