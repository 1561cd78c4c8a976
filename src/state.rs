//! State marker components.
//!
//! Mirrors of the controller's grounded flag for use in query filters. They
//! are added and removed by [`crate::systems::sync_state_markers`] after each
//! tick and are never read by the controller itself.

use bevy::prelude::*;

/// Marker: the ground sensor found ground on the last tick.
///
/// # Example
///
/// ```rust
/// use bevy::prelude::*;
/// use platformer_motion::prelude::*;
///
/// fn dust_on_landing(q: Query<Entity, Added<Grounded>>) {
///     for _character in &q {
///         // spawn particles
///     }
/// }
/// ```
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Grounded;

/// Marker: the character is not on the ground. Mutually exclusive with [`Grounded`].
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Airborne;
