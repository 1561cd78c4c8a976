//! Physics backend abstraction.
//!
//! The controller never touches a physics engine directly. A backend exposes
//! velocity read/write on entities and installs whatever systems it needs to
//! feed the ground sensor (see [`crate::sensor::ShapeCaster`]). Sensor systems
//! read the character position from `GlobalTransform`.

use bevy::prelude::*;

/// Trait for physics backend implementations.
///
/// All methods are static: the backend is a type-level choice made when the
/// plugin is added, e.g. `PlatformerControllerPlugin::<Rapier2dBackend>`.
pub trait CharacterPhysicsBackend: 'static + Send + Sync {
    /// The velocity component type used by this backend.
    type VelocityComponent: Component;

    /// Returns the plugin that sets up this backend, including its ground
    /// sensing system in [`MotionSet::Sensors`](crate::MotionSet::Sensors).
    fn plugin() -> impl Plugin;

    /// Whether the entity has a body this backend can drive.
    ///
    /// Controllers on entities without one are faulted on their first tick.
    /// The default only checks for the velocity component.
    fn has_body(world: &World, entity: Entity) -> bool {
        world.get::<Self::VelocityComponent>(entity).is_some()
    }

    /// Velocity integrated on the previous physics step.
    fn get_velocity(world: &World, entity: Entity) -> Vec2;

    /// Hand the new velocity to the physics engine for integration.
    fn set_velocity(world: &mut World, entity: Entity, velocity: Vec2);
}
