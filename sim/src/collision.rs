use crate::{Bird, Pipe};

/// Axis-aligned rectangle, y grows downward
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// A rectangle without area never collides with anything
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Overlap test on half-open intervals: rectangles that only share an
    /// edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }

        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}

/// Check if a bird's hitbox overlaps either solid part of a pipe
pub fn collides(bird: &Bird, pipe: &Pipe, screen_height: f64) -> bool {
    let hitbox = bird.hitbox();
    pipe.hitboxes(screen_height)
        .iter()
        .any(|solid| hitbox.intersects(solid))
}
