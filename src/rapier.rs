//! Rapier2D physics backend implementation.
//!
//! This module provides the physics backend for Bevy Rapier2D.
//! Enable with the `rapier2d` feature.

use bevy::prelude::*;
use bevy_rapier2d::geometry::Group;
use bevy_rapier2d::prelude::*;

use crate::backend::CharacterPhysicsBackend;
use crate::config::MotionConfig;
use crate::controller::MotionController;
use crate::sensor::{probe_ground, GroundProbe, ProbeHit, ShapeCaster};
use crate::MotionSet;

/// Rapier2D physics backend for the motion controller.
///
/// Velocity is read from and written to the [`Velocity`] component; Rapier
/// integrates it with gravity during its own step. Ground sensing is handled
/// by a dedicated system that receives `RapierContext` as a system parameter.
pub struct Rapier2dBackend;

impl CharacterPhysicsBackend for Rapier2dBackend {
    type VelocityComponent = Velocity;

    fn plugin() -> impl Plugin {
        Rapier2dBackendPlugin
    }

    fn has_body(world: &World, entity: Entity) -> bool {
        world.get::<RigidBody>(entity).is_some() && world.get::<Velocity>(entity).is_some()
    }

    fn get_velocity(world: &World, entity: Entity) -> Vec2 {
        world
            .get::<Velocity>(entity)
            .map(|v| v.linvel)
            .unwrap_or(Vec2::ZERO)
    }

    fn set_velocity(world: &mut World, entity: Entity, velocity: Vec2) {
        if let Some(mut vel) = world.get_mut::<Velocity>(entity) {
            vel.linvel = velocity;
        }
    }
}

/// Plugin that sets up Rapier2D-specific systems for the motion controller.
pub struct Rapier2dBackendPlugin;

impl Plugin for Rapier2dBackendPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            rapier_ground_detection.in_set(MotionSet::Sensors),
        );
    }
}

impl ShapeCaster for RapierContext<'_> {
    fn circle_cast(&self, probe: &GroundProbe) -> Option<ProbeHit> {
        let shape = Collider::ball(probe.radius);

        let mut filter = QueryFilter::default()
            .exclude_sensors()
            .groups(CollisionGroups::new(
                Group::ALL,
                Group::from_bits_truncate(probe.mask.bits()),
            ));
        if let Some(entity) = probe.exclude {
            filter = filter.exclude_rigid_body(entity);
        }

        self.cast_shape(
            probe.origin,
            0.0,
            probe.direction,
            &shape,
            ShapeCastOptions {
                max_time_of_impact: probe.max_distance,
                // Overlapping ground at the start of the sweep still counts
                stop_at_penetration: true,
                ..default()
            },
            filter,
        )
        .map(|(hit_entity, hit)| {
            let normal = hit.details.map(|d| d.normal1).unwrap_or(-probe.direction);
            let point = probe.origin + probe.direction * hit.time_of_impact;
            ProbeHit::new(hit.time_of_impact, normal, point, Some(hit_entity))
        })
    }
}

/// Rapier-specific ground detection system using a circle cast.
///
/// The probe is placed relative to the character's `GlobalTransform` and always
/// sweeps along world down, regardless of the body's rotation.
fn rapier_ground_detection(
    rapier_context: ReadRapierContext,
    mut q_controllers: Query<(Entity, &GlobalTransform, &MotionConfig, &mut MotionController)>,
) {
    let context = rapier_context.single().ok();

    for (entity, transform, config, mut controller) in &mut q_controllers {
        if !controller.is_ready() {
            continue;
        }

        let probe =
            GroundProbe::new(transform.translation().xy(), &config.ground_sensor).excluding(entity);
        let hit = probe_ground(context.as_ref(), &probe);
        controller.set_ground(hit);
    }
}

/// Bundle of Rapier2D physics components for a platformer character.
///
/// Pair it with a [`crate::PlatformerCharacterBundle`] and a [`Collider`].
///
/// # Example
///
/// ```ignore
/// use bevy::prelude::*;
/// use bevy_rapier2d::prelude::*;
/// use platformer_motion::prelude::*;
///
/// fn spawn_player(mut commands: Commands) -> Result {
///     commands.spawn((
///         Transform::from_xyz(0.0, 2.0, 0.0),
///         PlatformerCharacterBundle::new(MotionConfig::player())?,
///         Rapier2dCharacterBundle::new(),
///         Collider::capsule_y(0.5, 0.3),
///     ));
///     Ok(())
/// }
/// ```
///
/// # Defaults
///
/// - `rigid_body`: [`RigidBody::Dynamic`], so Rapier applies gravity and resolves contacts
/// - `velocity`: Zero velocity
/// - `locked_axes`: [`LockedAxes::ROTATION_LOCKED`], the character never tips over
#[derive(Bundle)]
pub struct Rapier2dCharacterBundle {
    /// The rigid body type. Should typically be [`RigidBody::Dynamic`] for characters.
    pub rigid_body: RigidBody,
    /// Current linear and angular velocity. Written by the controller, integrated by Rapier.
    pub velocity: Velocity,
    /// Which axes are locked.
    pub locked_axes: LockedAxes,
}

impl Default for Rapier2dCharacterBundle {
    fn default() -> Self {
        Self::new()
    }
}

impl Rapier2dCharacterBundle {
    /// Dynamic body with rotation locked.
    pub fn new() -> Self {
        Self {
            rigid_body: RigidBody::Dynamic,
            velocity: Velocity::default(),
            locked_axes: LockedAxes::ROTATION_LOCKED,
        }
    }

    /// Set the rigid body type.
    ///
    /// [`RigidBody::KinematicVelocityBased`] also works, but then nothing
    /// applies gravity and the character only moves vertically by jumping.
    pub fn with_body(mut self, body: RigidBody) -> Self {
        self.rigid_body = body;
        self
    }

    /// Set which axes are locked.
    pub fn with_locked_axes(mut self, axes: LockedAxes) -> Self {
        self.locked_axes = axes;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(RapierPhysicsPlugin::<NoUserData>::default());
        app.insert_resource(Time::<Fixed>::from_hz(60.0));
        app
    }

    #[test]
    fn rapier_backend_velocity() {
        let mut app = create_test_app();

        let entity = app
            .world_mut()
            .spawn((
                Transform::default(),
                RigidBody::Dynamic,
                Velocity::linear(Vec2::new(50.0, 30.0)),
            ))
            .id();

        let vel = Rapier2dBackend::get_velocity(app.world(), entity);
        assert!((vel.x - 50.0).abs() < 0.01);
        assert!((vel.y - 30.0).abs() < 0.01);

        Rapier2dBackend::set_velocity(app.world_mut(), entity, Vec2::new(7.0, 0.0));

        let vel = Rapier2dBackend::get_velocity(app.world(), entity);
        assert!((vel.x - 7.0).abs() < 0.01);
        assert!(vel.y.abs() < 0.01);
    }

    #[test]
    fn has_body_needs_rigid_body_and_velocity() {
        let mut app = create_test_app();
        let world = app.world_mut();

        let full = world.spawn((RigidBody::Dynamic, Velocity::default())).id();
        let no_velocity = world.spawn(RigidBody::Dynamic).id();
        let nothing = world.spawn(Transform::default()).id();

        assert!(Rapier2dBackend::has_body(app.world(), full));
        assert!(!Rapier2dBackend::has_body(app.world(), no_velocity));
        assert!(!Rapier2dBackend::has_body(app.world(), nothing));
    }

    #[test]
    fn rapier_character_bundle_creates_valid_entity() {
        let mut app = create_test_app();

        let entity = app
            .world_mut()
            .spawn((
                Transform::default(),
                Rapier2dCharacterBundle::new(),
                Collider::ball(0.5),
            ))
            .id();

        app.update();

        assert_eq!(
            app.world().get::<RigidBody>(entity),
            Some(&RigidBody::Dynamic)
        );
        assert!(app.world().get::<Velocity>(entity).is_some());
        assert_eq!(
            app.world().get::<LockedAxes>(entity),
            Some(&LockedAxes::ROTATION_LOCKED)
        );
        assert!(Rapier2dBackend::has_body(app.world(), entity));
    }
}
