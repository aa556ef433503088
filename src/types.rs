//! Geometry types shared by the board engine, export and GUI

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// Point on the board surface, top-left origin, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn from_tuple((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        Position::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Item dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn from_tuple((width, height): (f32, f32)) -> Self {
        Self { width, height }
    }

    /// Clamp both axes to at least `min`
    pub fn at_least(self, min: f32) -> Self {
        // f32::max returns `min` for NaN input, keeping the invariant intact
        Self {
            width: self.width.max(min),
            height: self.height.max(min),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_arithmetic() {
        let origin = Position::new(100.0, 100.0);
        let delta = Position::new(15.0, -30.0);
        assert_eq!(origin + delta, Position::new(115.0, 70.0));
        assert_eq!((origin + delta) - origin, delta);
    }

    #[test]
    fn test_size_at_least() {
        assert_eq!(Size::new(-20.0, 10.0).at_least(50.0), Size::new(50.0, 50.0));
        assert_eq!(Size::new(300.0, 49.9).at_least(50.0), Size::new(300.0, 50.0));
        assert_eq!(Size::new(f32::NAN, 80.0).at_least(50.0), Size::new(50.0, 80.0));
    }
}
