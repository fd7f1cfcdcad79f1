//! Components shared between the core and gameplay plugins.
//!
//! Gameplay code may define its own components; these are the ones the
//! renderable capability and the movement helpers agree on.

use glam::Vec2;

use crate::component::Component;

/// Where an entity is: which area, and its top-left position in that area.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub area: String,
    position: Vec2,
    last_position: Vec2,
}

impl Location {
    pub fn new(area: impl Into<String>, position: Vec2) -> Self {
        Self {
            area: area.into(),
            position,
            last_position: position,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Position before the most recent move
    pub fn last_position(&self) -> Vec2 {
        self.last_position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.last_position = self.position;
        self.position = position;
    }

    /// Undo the most recent move
    pub fn revert(&mut self) {
        self.position = self.last_position;
    }
}

impl Component for Location {
    const NAME: &'static str = "location";
}

/// Current velocity in units per second.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity(pub Vec2);

impl Component for Velocity {
    const NAME: &'static str = "velocity";
}

/// Top speed per axis in units per second.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Speed(pub Vec2);

impl Component for Speed {
    const NAME: &'static str = "speed";
}

/// Requested movement direction, each axis in `-1.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Movement(pub Vec2);

impl Component for Movement {
    const NAME: &'static str = "movement";
}

/// Facing direction, used to pick the sprite row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl Direction {
    /// Opposite facing
    pub fn reversed(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Unit vector in screen coordinates (y grows downwards)
    pub fn vector(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, -1.0),
            Direction::Down => Vec2::new(0.0, 1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Right => Vec2::new(1.0, 0.0),
        }
    }
}

impl Component for Direction {
    const NAME: &'static str = "direction";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AnimationAction {
    #[default]
    Idle,
    Walking,
    Running,
    Sitting,
}

/// Animation playback state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Animation {
    pub action: AnimationAction,
    /// Current frame index
    pub counter: usize,
    /// Time spent on the current frame
    pub timer: f32,
}

impl Animation {
    pub fn new(action: AnimationAction) -> Self {
        Self {
            action,
            ..Default::default()
        }
    }
}

impl Component for Animation {
    const NAME: &'static str = "animation";
}

/// Reference to a sprite sheet owned by the rendering layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    /// Asset key of the sheet
    pub sheet: String,
    /// Size of one frame in world units
    pub frame_size: Vec2,
}

impl Sprite {
    pub fn new(sheet: impl Into<String>, frame_size: Vec2) -> Self {
        Self {
            sheet: sheet.into(),
            frame_size,
        }
    }
}

impl Component for Sprite {
    const NAME: &'static str = "sprite";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_remembers_last_position() {
        let mut location = Location::new("town", Vec2::ZERO);
        location.set_position(Vec2::new(3.0, 4.0));
        assert_eq!(location.last_position(), Vec2::ZERO);
        location.revert();
        assert_eq!(location.position(), Vec2::ZERO);
    }

    #[test]
    fn direction_reverses() {
        assert_eq!(Direction::Left.reversed(), Direction::Right);
        assert_eq!(Direction::Up.vector() + Direction::Down.vector(), Vec2::ZERO);
    }
}
