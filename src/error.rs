//! Error types.
//!
//! Only configuration and setup problems are errors. An exhausted jump budget
//! or a sensor that hits nothing are ordinary outcomes and never surface here.

use thiserror::Error;

/// A [`MotionConfig`](crate::config::MotionConfig) value that would produce
/// undefined motion at runtime.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Horizontal speed must be a positive, finite number.
    #[error("move_speed must be positive and finite, got {0}")]
    InvalidMoveSpeed(f32),

    /// Jump force must be a positive, finite number.
    #[error("jump_force must be positive and finite, got {0}")]
    InvalidJumpForce(f32),

    /// At least one jump must be allowed.
    #[error("max_jumps must be at least 1")]
    NoJumpsAllowed,

    /// The ground probe needs a real circle to sweep.
    #[error("ground sensor radius must be positive and finite, got {0}")]
    InvalidSensorRadius(f32),

    /// The ground probe needs somewhere to travel.
    #[error("ground sensor cast_distance must be positive and finite, got {0}")]
    InvalidCastDistance(f32),

    /// The sensor origin must be a real point.
    #[error("ground sensor vertical_offset must be finite, got {0}")]
    InvalidVerticalOffset(f32),

    /// A mask with no layers can never report ground.
    #[error("ground_mask selects no collision layers")]
    EmptyGroundMask,
}

/// Reasons a controller refuses to run.
///
/// These are detected on the controller's first tick and are not recoverable:
/// the character is skipped by the motion pipeline from then on.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ControllerError {
    /// The entity has no physics body the backend can read and write.
    #[error("entity {0} has no physics body for the motion controller to drive")]
    MissingPhysicsBody(bevy::prelude::Entity),

    /// The attached configuration failed validation.
    #[error("invalid motion config: {0}")]
    InvalidConfig(#[from] ConfigError),
}
