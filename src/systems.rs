//! Core controller systems.
//!
//! These systems drive [`MotionController`] once per fixed tick. They are
//! generic over the physics backend so the same pipeline runs on Rapier or on
//! any other engine that implements [`CharacterPhysicsBackend`].

use bevy::prelude::*;

use crate::backend::CharacterPhysicsBackend;
use crate::config::MotionConfig;
use crate::controller::{ControllerStatus, MotionController};
use crate::error::ControllerError;
use crate::intent::MotionIntent;
use crate::sensor::GroundProbe;
use crate::state::{Airborne, Grounded};

/// Marker: keep `Sprite::flip_x` in sync with the controller's facing.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct FlipSpriteWithFacing;

/// Check newly spawned controllers against their config and physics body.
///
/// A controller that fails is faulted permanently and skipped by every other
/// system; the reason is logged once.
pub fn initialize_controllers<B: CharacterPhysicsBackend>(world: &mut World) {
    let pending: Vec<(Entity, MotionConfig)> = world
        .query::<(Entity, &MotionConfig, &MotionController)>()
        .iter(world)
        .filter(|(_, _, controller)| *controller.status() == ControllerStatus::Pending)
        .map(|(e, config, _)| (e, *config))
        .collect();

    for (entity, config) in pending {
        let status = match check_controller::<B>(world, entity, &config) {
            Ok(()) => {
                debug!(
                    "motion controller on {entity} ready: {} jumps, speed {}",
                    config.max_jumps, config.move_speed
                );
                ControllerStatus::Ready
            }
            Err(err) => {
                error!("motion controller on {entity} disabled: {err}");
                ControllerStatus::Faulted(err)
            }
        };

        if let Some(mut controller) = world.get_mut::<MotionController>(entity) {
            controller.set_status(status);
        }
    }
}

fn check_controller<B: CharacterPhysicsBackend>(
    world: &World,
    entity: Entity,
    config: &MotionConfig,
) -> Result<(), ControllerError> {
    config.validate()?;
    if !B::has_body(world, entity) {
        return Err(ControllerError::MissingPhysicsBody(entity));
    }
    Ok(())
}

/// Run the motion pipeline for every ready controller.
///
/// Ground has already been sensed by the backend. This drains the intent,
/// reads the previous velocity, steps the controller and writes the result
/// back for the physics engine to integrate.
pub fn apply_motion<B: CharacterPhysicsBackend>(world: &mut World) {
    // Faulted controllers never jump; requests queued directly on their intent are discarded.
    let faulted: Vec<Entity> = world
        .query::<(Entity, &MotionController, &MotionIntent)>()
        .iter(world)
        .filter(|(_, controller, intent)| controller.is_faulted() && intent.has_jump_request())
        .map(|(e, _, _)| e)
        .collect();
    for entity in faulted {
        if let Some(mut intent) = world.get_mut::<MotionIntent>(entity) {
            intent.clear_jump_requests();
        }
    }

    let entities: Vec<(Entity, MotionConfig)> = world
        .query::<(Entity, &MotionConfig, &MotionController)>()
        .iter(world)
        .filter(|(_, _, controller)| controller.is_ready())
        .map(|(e, config, _)| (e, *config))
        .collect();

    for (entity, config) in entities {
        let Some(mut intent) = world.get_mut::<MotionIntent>(entity) else {
            continue;
        };
        let horizontal = intent.fused_horizontal();
        let requests = intent.take_jump_requests();

        let velocity = B::get_velocity(world, entity);

        let Some(mut controller) = world.get_mut::<MotionController>(entity) else {
            continue;
        };
        let (new_velocity, outcome) = controller.step(&config, horizontal, &requests, velocity);

        if outcome.jumps_performed > 0 {
            debug!(
                "{entity} jumped x{} ({}/{} used)",
                outcome.jumps_performed,
                controller.jumps().used(),
                controller.jumps().max()
            );
        }
        if outcome.jumps_dropped > 0 {
            debug!(
                "{entity} dropped {} jump request(s), budget exhausted",
                outcome.jumps_dropped
            );
        }

        B::set_velocity(world, entity, new_velocity);
    }
}

/// Sync [`Grounded`]/[`Airborne`] markers with the controller.
pub fn sync_state_markers(
    mut commands: Commands,
    q_controllers: Query<(Entity, &MotionController, Has<Grounded>, Has<Airborne>)>,
) {
    for (entity, controller, has_grounded, has_airborne) in &q_controllers {
        if controller.is_grounded() && !has_grounded {
            commands.entity(entity).insert(Grounded).remove::<Airborne>();
        } else if !controller.is_grounded() && !has_airborne {
            commands.entity(entity).insert(Airborne).remove::<Grounded>();
        }
    }
}

/// Mirror facing onto sprites tagged with [`FlipSpriteWithFacing`].
pub fn sync_sprite_facing(
    mut q_sprites: Query<(&MotionController, &mut Sprite), With<FlipSpriteWithFacing>>,
) {
    for (controller, mut sprite) in &mut q_sprites {
        let flip = controller.facing().sign() < 0.0;
        if sprite.flip_x != flip {
            sprite.flip_x = flip;
        }
    }
}

/// Draw each ground probe's start and end circles.
///
/// Yellow while airborne, green while grounded.
pub fn draw_ground_probes(
    mut gizmos: Gizmos,
    q_controllers: Query<(&GlobalTransform, &MotionConfig, &MotionController)>,
) {
    for (transform, config, controller) in &q_controllers {
        let probe = GroundProbe::new(transform.translation().xy(), &config.ground_sensor);
        let color = if controller.is_grounded() {
            Color::srgb(0.2, 0.9, 0.3)
        } else {
            Color::srgb(1.0, 0.9, 0.1)
        };
        gizmos.circle_2d(probe.start(), probe.radius, color);
        gizmos.circle_2d(probe.end(), probe.radius, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::Facing;

    #[test]
    fn sprite_flips_with_facing() {
        let mut app = App::new();
        app.add_systems(Update, sync_sprite_facing);

        let controller = MotionController::new(&MotionConfig::default()).with_facing(Facing::Left);
        let tagged = app
            .world_mut()
            .spawn((controller.clone(), Sprite::default(), FlipSpriteWithFacing))
            .id();
        let untagged = app.world_mut().spawn((controller, Sprite::default())).id();
        app.update();

        assert!(app.world().get::<Sprite>(tagged).unwrap().flip_x);
        assert!(!app.world().get::<Sprite>(untagged).unwrap().flip_x);
    }
}
