//! # `platformer_motion`
//!
//! A 2D platformer character-motion controller with physics backend abstraction.
//!
//! Every fixed tick, each character:
//! 1. Sweeps a small circle downward to decide whether it is grounded
//! 2. Refills its jump budget if it is grounded and not rising
//! 3. Spends one jump per pending request, setting vertical velocity outright
//! 4. Fuses device and on-screen joystick input into one horizontal axis
//! 5. Sets horizontal velocity from that axis and turns to face it
//!
//! Gravity, collision response and integration are left to the physics
//! engine. Rapier2D is supported out of the box behind the `rapier2d` feature.
//!
//! ## Usage
//!
//! ```rust
//! use bevy::prelude::*;
//! use platformer_motion::prelude::*;
//!
//! let bundle = PlatformerCharacterBundle::new(MotionConfig::player()).unwrap();
//! assert_eq!(bundle.controller.jumps().max(), 2);
//!
//! // Spawn the bundle together with a physics body and collider.
//! ```

use bevy::prelude::*;

pub mod backend;
pub mod config;
pub mod controller;
pub mod error;
pub mod input;
pub mod intent;
pub mod jump;
pub mod motion;
pub mod sensor;
pub mod state;
pub mod systems;

#[cfg(feature = "rapier2d")]
pub mod rapier;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::backend::CharacterPhysicsBackend;
    pub use crate::config::{GroundMask, GroundSensorConfig, MotionConfig};
    pub use crate::controller::{ControllerStatus, MotionController, TickOutcome};
    pub use crate::error::{ConfigError, ControllerError};
    pub use crate::input::{
        InputBindings, JumpButton, JumpRequested, MoveAxisChanged, VirtualJoystick,
    };
    pub use crate::intent::{JumpSource, MotionIntent};
    pub use crate::jump::JumpBudget;
    pub use crate::motion::Facing;
    pub use crate::sensor::{GroundProbe, ProbeHit, ShapeCaster};
    pub use crate::state::{Airborne, Grounded};
    pub use crate::systems::FlipSpriteWithFacing;
    pub use crate::{MotionSet, PlatformerCharacterBundle, PlatformerControllerPlugin};

    #[cfg(feature = "rapier2d")]
    pub use crate::rapier::{Rapier2dBackend, Rapier2dCharacterBundle};
}

/// Phases of the per-tick pipeline, chained in this order in `FixedUpdate`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotionSet {
    /// Controller validation and input buffering.
    Input,
    /// Backend ground sensing.
    Sensors,
    /// Budget, jumps, horizontal velocity and facing.
    Motion,
    /// State markers.
    Sync,
}

/// Main plugin for the platformer controller.
///
/// Generic over a physics backend `B`, which supplies velocity access and the
/// ground sensing system.
///
/// # Examples
///
/// With Rapier2D backend:
/// ```rust,no_run
/// use bevy::prelude::*;
/// use bevy_rapier2d::prelude::*;
/// use platformer_motion::prelude::*;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
///     .add_plugins(PlatformerControllerPlugin::<Rapier2dBackend>::default())
///     .run();
/// ```
pub struct PlatformerControllerPlugin<B: backend::CharacterPhysicsBackend> {
    probe_gizmos: bool,
    _marker: std::marker::PhantomData<B>,
}

impl<B: backend::CharacterPhysicsBackend> Default for PlatformerControllerPlugin<B> {
    fn default() -> Self {
        Self {
            probe_gizmos: false,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<B: backend::CharacterPhysicsBackend> PlatformerControllerPlugin<B> {
    /// Draw every ground probe with gizmos. Needs `GizmoPlugin`.
    pub fn with_probe_gizmos(mut self) -> Self {
        self.probe_gizmos = true;
        self
    }
}

impl<B: backend::CharacterPhysicsBackend> Plugin for PlatformerControllerPlugin<B> {
    fn build(&self, app: &mut App) {
        // Register core types
        app.register_type::<config::MotionConfig>();
        app.register_type::<config::GroundSensorConfig>();
        app.register_type::<config::GroundMask>();
        app.register_type::<controller::MotionController>();
        app.register_type::<intent::MotionIntent>();
        app.register_type::<intent::JumpSource>();
        app.register_type::<jump::JumpBudget>();
        app.register_type::<motion::Facing>();
        app.register_type::<state::Grounded>();
        app.register_type::<state::Airborne>();
        app.register_type::<input::InputBindings>();
        app.register_type::<input::JumpButton>();
        app.register_type::<input::VirtualJoystick>();
        app.register_type::<systems::FlipSpriteWithFacing>();

        app.add_event::<input::MoveAxisChanged>();
        app.add_event::<input::JumpRequested>();

        // Add the physics backend plugin
        app.add_plugins(B::plugin());

        app.configure_sets(
            FixedUpdate,
            (
                MotionSet::Input,
                MotionSet::Sensors,
                MotionSet::Motion,
                MotionSet::Sync,
            )
                .chain(),
        );

        app.add_systems(
            FixedUpdate,
            (
                systems::initialize_controllers::<B>,
                input::buffer_input_events,
                input::poll_virtual_joysticks,
            )
                .chain()
                .in_set(MotionSet::Input),
        );
        app.add_systems(
            FixedUpdate,
            systems::apply_motion::<B>.in_set(MotionSet::Motion),
        );
        app.add_systems(
            FixedUpdate,
            systems::sync_state_markers.in_set(MotionSet::Sync),
        );

        // Device input is read every frame so press edges between ticks are kept
        app.add_systems(
            Update,
            (
                input::read_device_input,
                input::forward_jump_button_presses,
                systems::sync_sprite_facing,
            ),
        );

        if self.probe_gizmos {
            app.add_systems(Update, systems::draw_ground_probes);
        }
    }
}

/// Core components for a platformer character, minus the physics body.
#[derive(Bundle, Clone)]
pub struct PlatformerCharacterBundle {
    pub controller: controller::MotionController,
    pub config: config::MotionConfig,
    pub intent: intent::MotionIntent,
}

impl PlatformerCharacterBundle {
    /// Validate `config` and build the matching controller.
    pub fn new(config: config::MotionConfig) -> Result<Self, error::ConfigError> {
        config.validate()?;
        Ok(Self {
            controller: controller::MotionController::new(&config),
            config,
            intent: intent::MotionIntent::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MotionConfig;
    use crate::error::ConfigError;

    #[test]
    fn bundle_rejects_invalid_config() {
        let err = PlatformerCharacterBundle::new(MotionConfig::default().with_max_jumps(0));
        assert!(matches!(err, Err(ConfigError::NoJumpsAllowed)));
    }

    #[test]
    fn bundle_matches_config() {
        let bundle = PlatformerCharacterBundle::new(MotionConfig::triple_jump()).unwrap();
        assert_eq!(bundle.controller.jumps().max(), 3);
        assert!(!bundle.intent.has_jump_request());
    }
}
