//! Horizontal motion and facing.

use bevy::prelude::*;

/// Direction the character is looking.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// `-1.0` for left, `1.0` for right.
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    /// Facing implied by a horizontal input, or `None` when the input is neutral.
    pub fn from_input(horizontal: f32) -> Option<Self> {
        if horizontal > 0.0 {
            Some(Facing::Right)
        } else if horizontal < 0.0 {
            Some(Facing::Left)
        } else {
            None
        }
    }

    /// Turn toward `horizontal`; neutral input keeps the last direction.
    ///
    /// Returns `true` if the direction changed.
    pub fn update(&mut self, horizontal: f32) -> bool {
        match Self::from_input(horizontal) {
            Some(next) if next != *self => {
                *self = next;
                true
            }
            _ => false,
        }
    }
}

/// Velocity after applying horizontal input.
///
/// The X component is fully determined by input and speed. Y is passed
/// through: it belongs to jumps and to the physics engine's gravity.
#[inline]
pub fn resolve_velocity(horizontal: f32, move_speed: f32, velocity: Vec2) -> Vec2 {
    Vec2::new(horizontal * move_speed, velocity.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_velocity_is_input_times_speed() {
        let v = resolve_velocity(0.5, 7.0, Vec2::new(100.0, -3.0));
        assert_eq!(v, Vec2::new(3.5, -3.0));

        let v = resolve_velocity(0.0, 7.0, Vec2::new(100.0, 4.0));
        assert_eq!(v, Vec2::new(0.0, 4.0));

        let v = resolve_velocity(-1.0, 7.0, Vec2::ZERO);
        assert_eq!(v, Vec2::new(-7.0, 0.0));
    }

    #[test]
    fn facing_follows_sign() {
        let mut facing = Facing::Right;
        assert!(facing.update(-0.2));
        assert_eq!(facing, Facing::Left);
        assert_eq!(facing.sign(), -1.0);

        assert!(facing.update(1.0));
        assert_eq!(facing, Facing::Right);
        assert!(!facing.update(0.3));
    }

    #[test]
    fn facing_holds_on_neutral_input() {
        let mut facing = Facing::Left;
        let inputs = [0.0, -0.5, 0.0, 0.0, 0.8, 0.0, -0.0, -1.0, 0.0];
        let mut expected = Facing::Left;
        for h in inputs {
            facing.update(h);
            if let Some(dir) = Facing::from_input(h) {
                expected = dir;
            }
            assert_eq!(facing, expected, "h={h}");
        }
        assert_eq!(facing, Facing::Left);
    }
}
