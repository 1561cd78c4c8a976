//! Controller configuration components.
//!
//! Author-tuned parameters for a character: movement speed, jump force, the
//! size of the jump budget, and the geometry of the ground probe. These are
//! fixed when the character is spawned.

use bevy::prelude::*;

use crate::error::ConfigError;

/// Bitset of collision layers the ground probe is allowed to hit.
///
/// Bit `n` selects layer `n + 1`, matching Rapier's `Group::GROUP_1..GROUP_32`.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroundMask(pub u32);

impl Default for GroundMask {
    fn default() -> Self {
        Self::LAYER_1
    }
}

impl GroundMask {
    /// Matches nothing.
    pub const NONE: Self = Self(0);
    /// Matches every layer.
    pub const ALL: Self = Self(u32::MAX);
    /// The first collision layer (Rapier's default membership).
    pub const LAYER_1: Self = Self(1);

    /// Mask selecting a single 1-based layer. Out-of-range layers yield [`GroundMask::NONE`].
    pub fn layer(layer: u32) -> Self {
        match layer {
            1..=32 => Self(1 << (layer - 1)),
            _ => Self::NONE,
        }
    }

    /// Returns the mask with an additional 1-based layer selected.
    pub fn with_layer(self, layer: u32) -> Self {
        Self(self.0 | Self::layer(layer).0)
    }

    /// Raw bits.
    #[inline]
    pub fn bits(&self) -> u32 {
        self.0
    }

    /// Whether no layers are selected.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Whether a collider with the given layer memberships passes this mask.
    #[inline]
    pub fn matches(&self, memberships: u32) -> bool {
        self.0 & memberships != 0
    }
}

/// Geometry of the downward circle cast used for ground detection.
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub struct GroundSensorConfig {
    /// Radius of the swept circle.
    pub radius: f32,
    /// Offset of the probe origin from the character position along world Y.
    /// Usually negative, placing the probe near the feet.
    pub vertical_offset: f32,
    /// How far below the origin the circle travels.
    pub cast_distance: f32,
    /// Layers that count as ground.
    pub ground_mask: GroundMask,
}

impl Default for GroundSensorConfig {
    fn default() -> Self {
        Self {
            radius: 0.3,
            vertical_offset: -0.8,
            cast_distance: 0.5,
            ground_mask: GroundMask::default(),
        }
    }
}

impl GroundSensorConfig {
    /// Create a sensor with the given geometry and the default mask.
    pub fn new(radius: f32, vertical_offset: f32, cast_distance: f32) -> Self {
        Self {
            radius,
            vertical_offset,
            cast_distance,
            ..default()
        }
    }

    /// Builder: set the ground mask.
    pub fn with_mask(mut self, mask: GroundMask) -> Self {
        self.ground_mask = mask;
        self
    }

    /// Check the probe geometry.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(ConfigError::InvalidSensorRadius(self.radius));
        }
        if !self.vertical_offset.is_finite() {
            return Err(ConfigError::InvalidVerticalOffset(self.vertical_offset));
        }
        if !(self.cast_distance.is_finite() && self.cast_distance > 0.0) {
            return Err(ConfigError::InvalidCastDistance(self.cast_distance));
        }
        if self.ground_mask.is_empty() {
            return Err(ConfigError::EmptyGroundMask);
        }
        Ok(())
    }
}

/// Configuration parameters for the motion controller.
///
/// # Example
///
/// ```rust
/// use platformer_motion::prelude::*;
///
/// let config = MotionConfig::default()
///     .with_move_speed(9.0)
///     .with_max_jumps(3);
/// assert!(config.validate().is_ok());
///
/// let broken = MotionConfig::default().with_max_jumps(0);
/// assert!(broken.validate().is_err());
/// ```
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq)]
#[reflect(Component)]
pub struct MotionConfig {
    /// Horizontal speed at full input deflection (units/second).
    pub move_speed: f32,

    /// Vertical velocity assigned on every successful jump (units/second).
    pub jump_force: f32,

    /// Jumps available before the character has to land again.
    pub max_jumps: u32,

    /// Ground probe geometry.
    pub ground_sensor: GroundSensorConfig,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            move_speed: 7.0,
            jump_force: 10.0,
            max_jumps: 2,
            ground_sensor: GroundSensorConfig::default(),
        }
    }
}

impl MotionConfig {
    /// Standard double-jump player.
    pub fn player() -> Self {
        Self::default()
    }

    /// Player with three jumps.
    pub fn triple_jump() -> Self {
        Self {
            max_jumps: 3,
            ..default()
        }
    }

    /// Builder: set move speed.
    pub fn with_move_speed(mut self, speed: f32) -> Self {
        self.move_speed = speed;
        self
    }

    /// Builder: set jump force.
    pub fn with_jump_force(mut self, force: f32) -> Self {
        self.jump_force = force;
        self
    }

    /// Builder: set jump count.
    pub fn with_max_jumps(mut self, jumps: u32) -> Self {
        self.max_jumps = jumps;
        self
    }

    /// Builder: replace the whole ground sensor.
    pub fn with_ground_sensor(mut self, sensor: GroundSensorConfig) -> Self {
        self.ground_sensor = sensor;
        self
    }

    /// Builder: set only the ground mask.
    pub fn with_ground_mask(mut self, mask: GroundMask) -> Self {
        self.ground_sensor.ground_mask = mask;
        self
    }

    /// Reject values that would make runtime motion undefined.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.move_speed.is_finite() && self.move_speed > 0.0) {
            return Err(ConfigError::InvalidMoveSpeed(self.move_speed));
        }
        if !(self.jump_force.is_finite() && self.jump_force > 0.0) {
            return Err(ConfigError::InvalidJumpForce(self.jump_force));
        }
        if self.max_jumps == 0 {
            return Err(ConfigError::NoJumpsAllowed);
        }
        self.ground_sensor.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_authored_values() {
        let config = MotionConfig::default();
        assert_eq!(config.move_speed, 7.0);
        assert_eq!(config.jump_force, 10.0);
        assert_eq!(config.max_jumps, 2);
        assert_eq!(config.ground_sensor.radius, 0.3);
        assert_eq!(config.ground_sensor.vertical_offset, -0.8);
        assert_eq!(config.ground_sensor.cast_distance, 0.5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn triple_jump_preset() {
        assert_eq!(MotionConfig::triple_jump().max_jumps, 3);
    }

    #[test]
    fn zero_jumps_rejected() {
        let config = MotionConfig::default().with_max_jumps(0);
        assert_eq!(config.validate(), Err(ConfigError::NoJumpsAllowed));
    }

    #[test]
    fn negative_speed_rejected() {
        let config = MotionConfig::default().with_move_speed(-1.0);
        assert_eq!(config.validate(), Err(ConfigError::InvalidMoveSpeed(-1.0)));

        let config = MotionConfig::default().with_move_speed(0.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn non_finite_values_rejected() {
        let config = MotionConfig::default().with_jump_force(f32::NAN);
        assert!(matches!(config.validate(), Err(ConfigError::InvalidJumpForce(_))));

        let config = MotionConfig::default().with_ground_sensor(GroundSensorConfig::new(
            0.3,
            f32::INFINITY,
            0.5,
        ));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidVerticalOffset(_))
        ));
    }

    #[test]
    fn sensor_geometry_rejected() {
        let sensor = GroundSensorConfig::new(0.0, -0.8, 0.5);
        assert_eq!(sensor.validate(), Err(ConfigError::InvalidSensorRadius(0.0)));

        let sensor = GroundSensorConfig::new(0.3, -0.8, -0.5);
        assert_eq!(sensor.validate(), Err(ConfigError::InvalidCastDistance(-0.5)));
    }

    #[test]
    fn empty_mask_rejected() {
        let config = MotionConfig::default().with_ground_mask(GroundMask::NONE);
        assert_eq!(config.validate(), Err(ConfigError::EmptyGroundMask));
    }

    #[test]
    fn ground_mask_layers() {
        assert_eq!(GroundMask::layer(1), GroundMask::LAYER_1);
        assert_eq!(GroundMask::layer(3).bits(), 0b100);
        assert_eq!(GroundMask::layer(0), GroundMask::NONE);
        assert_eq!(GroundMask::layer(33), GroundMask::NONE);

        let mask = GroundMask::layer(1).with_layer(2);
        assert!(mask.matches(0b10));
        assert!(mask.matches(0b01));
        assert!(!mask.matches(0b100));
    }
}
