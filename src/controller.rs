//! The motion controller component.
//!
//! [`MotionController`] is the per-character state hub. Its [`step`] method is
//! the whole per-tick pipeline after ground sensing: budget reset, jump
//! consumption, horizontal resolution and facing. It is engine-agnostic, so it
//! can be driven by the Bevy systems in [`crate::systems`] or by any other
//! scheduler that owns a velocity.
//!
//! [`step`]: MotionController::step

use bevy::prelude::*;

use crate::config::MotionConfig;
use crate::error::ControllerError;
use crate::intent::JumpSource;
use crate::jump::JumpBudget;
use crate::motion::{resolve_velocity, Facing};
use crate::sensor::ProbeHit;

/// Lifecycle of a controller.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ControllerStatus {
    /// Spawned, not yet checked against its config and physics body.
    #[default]
    Pending,
    /// Running.
    Ready,
    /// Permanently disabled.
    Faulted(ControllerError),
}

/// What happened during one [`MotionController::step`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// The jump budget was refilled by landing.
    pub landed: bool,
    /// Jump requests that were honored.
    pub jumps_performed: u32,
    /// Jump requests dropped because the budget was exhausted.
    pub jumps_dropped: u32,
    /// Facing flipped.
    pub turned: bool,
}

/// Core character controller component.
///
/// # Example
///
/// ```rust
/// use bevy::prelude::*;
/// use platformer_motion::prelude::*;
///
/// let config = MotionConfig::default().with_jump_force(10.0);
/// let mut controller = MotionController::new(&config);
///
/// // Standing still on the floor, one jump request pending
/// controller.set_ground(Some(ProbeHit::new(0.0, Vec2::Y, Vec2::ZERO, None)));
/// let (velocity, outcome) =
///     controller.step(&config, 0.0, &[JumpSource::Button], Vec2::ZERO);
///
/// assert_eq!(velocity.y, 10.0);
/// assert_eq!(outcome.jumps_performed, 1);
/// assert_eq!(controller.jumps().used(), 1);
/// ```
#[derive(Component, Reflect, Debug, Clone, PartialEq)]
#[reflect(Component)]
pub struct MotionController {
    /// Whether the ground sensor reported contact this tick.
    grounded: bool,
    /// Raw probe hit from this tick.
    #[reflect(ignore)]
    ground: Option<ProbeHit>,
    jumps: JumpBudget,
    facing: Facing,
    /// Fused horizontal input used on the last tick.
    horizontal_input: f32,
    #[reflect(ignore)]
    status: ControllerStatus,
}

impl Default for MotionController {
    fn default() -> Self {
        Self::new(&MotionConfig::default())
    }
}

impl MotionController {
    /// Fresh controller: airborne until sensed, no jumps used, facing right.
    pub fn new(config: &MotionConfig) -> Self {
        Self {
            grounded: false,
            ground: None,
            jumps: JumpBudget::new(config.max_jumps),
            facing: Facing::default(),
            horizontal_input: 0.0,
            status: ControllerStatus::Pending,
        }
    }

    /// Builder: set the initial facing.
    pub fn with_facing(mut self, facing: Facing) -> Self {
        self.facing = facing;
        self
    }

    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// This tick's ground hit, if any.
    #[inline]
    pub fn ground(&self) -> Option<&ProbeHit> {
        self.ground.as_ref()
    }

    /// Entity under the character's feet.
    pub fn ground_entity(&self) -> Option<Entity> {
        self.ground.and_then(|hit| hit.entity)
    }

    #[inline]
    pub fn jumps(&self) -> &JumpBudget {
        &self.jumps
    }

    /// Mutable access to the budget, for power-ups and scripted refills.
    #[inline]
    pub fn jumps_mut(&mut self) -> &mut JumpBudget {
        &mut self.jumps
    }

    #[inline]
    pub fn facing(&self) -> Facing {
        self.facing
    }

    #[inline]
    pub fn horizontal_input(&self) -> f32 {
        self.horizontal_input
    }

    #[inline]
    pub fn status(&self) -> &ControllerStatus {
        &self.status
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.status == ControllerStatus::Ready
    }

    #[inline]
    pub fn is_faulted(&self) -> bool {
        matches!(self.status, ControllerStatus::Faulted(_))
    }

    pub(crate) fn set_status(&mut self, status: ControllerStatus) {
        self.status = status;
    }

    /// Store this tick's sensor result. Grounded state never carries over.
    pub fn set_ground(&mut self, hit: Option<ProbeHit>) {
        self.grounded = hit.is_some();
        self.ground = hit;
    }

    /// Reset check, then every jump request, then horizontal input.
    ///
    /// `velocity` is the value the physics engine reported for the previous
    /// tick; the returned velocity is what it should integrate next.
    pub fn step(
        &mut self,
        config: &MotionConfig,
        horizontal: f32,
        jump_requests: &[JumpSource],
        velocity: Vec2,
    ) -> (Vec2, TickOutcome) {
        let mut outcome = TickOutcome::default();
        let mut velocity = velocity;

        if self.jumps.max() != config.max_jumps {
            self.jumps.set_max(config.max_jumps);
        }

        // Reset must precede consumption so a jump taken this tick is kept.
        outcome.landed = self.jumps.reset_if_landed(self.grounded, velocity.y);

        for _ in jump_requests {
            if self.jumps.try_jump(&mut velocity, config.jump_force) {
                outcome.jumps_performed += 1;
            } else {
                outcome.jumps_dropped += 1;
            }
        }

        velocity = resolve_velocity(horizontal, config.move_speed, velocity);
        outcome.turned = self.facing.update(horizontal);
        self.horizontal_input = horizontal;

        (velocity, outcome)
    }
}
