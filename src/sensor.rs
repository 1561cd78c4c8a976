//! Ground sensing.
//!
//! The ground sensor sweeps a small circle downward from just below the
//! character and reports whether anything on the ground layers was touched.
//! It keeps no state between ticks.

use bevy::prelude::*;

use crate::config::{GroundMask, GroundSensorConfig};

/// Result of a circle cast that touched a collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeHit {
    /// Distance travelled before contact. Zero when the probe starts overlapping.
    pub distance: f32,
    /// Surface normal at the contact.
    pub normal: Vec2,
    /// Center of the probe circle at the moment of contact.
    pub point: Vec2,
    /// Collider entity that was hit.
    pub entity: Option<Entity>,
}

impl ProbeHit {
    /// Create a hit result.
    pub fn new(distance: f32, normal: Vec2, point: Vec2, entity: Option<Entity>) -> Self {
        Self {
            distance,
            normal,
            point,
            entity,
        }
    }
}

/// A fully resolved ground probe for one character on one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundProbe {
    /// Circle center at the start of the sweep.
    pub origin: Vec2,
    /// Circle radius.
    pub radius: f32,
    /// Sweep direction, always world down.
    pub direction: Vec2,
    /// Maximum sweep distance.
    pub max_distance: f32,
    /// Layers that may be hit.
    pub mask: GroundMask,
    /// Body to ignore, normally the character itself.
    pub exclude: Option<Entity>,
}

impl GroundProbe {
    /// Build the probe for a character standing at `position`.
    pub fn new(position: Vec2, sensor: &GroundSensorConfig) -> Self {
        Self {
            origin: position + Vec2::new(0.0, sensor.vertical_offset),
            radius: sensor.radius,
            direction: Vec2::NEG_Y,
            max_distance: sensor.cast_distance,
            mask: sensor.ground_mask,
            exclude: None,
        }
    }

    /// Ignore the given body during the cast.
    pub fn excluding(mut self, entity: Entity) -> Self {
        self.exclude = Some(entity);
        self
    }

    /// Circle center where the sweep begins.
    #[inline]
    pub fn start(&self) -> Vec2 {
        self.origin
    }

    /// Circle center where the sweep ends.
    #[inline]
    pub fn end(&self) -> Vec2 {
        self.origin + self.direction * self.max_distance
    }
}

/// Anything that can sweep a circle through the collision world.
///
/// Implemented by physics backends. Returning `None` means nothing on the
/// probe's mask was touched.
pub trait ShapeCaster {
    fn circle_cast(&self, probe: &GroundProbe) -> Option<ProbeHit>;
}

/// Run the ground probe and return the hit, if any.
///
/// A missing caster (physics not available this tick) reports no ground.
pub fn probe_ground<C: ShapeCaster + ?Sized>(
    caster: Option<&C>,
    probe: &GroundProbe,
) -> Option<ProbeHit> {
    let Some(caster) = caster else {
        bevy::log::warn_once!("ground sensor has no physics world to query; reporting airborne");
        return None;
    };
    caster.circle_cast(probe)
}

/// Whether the character at `position` is touching ground.
pub fn sense<C: ShapeCaster + ?Sized>(
    caster: Option<&C>,
    position: Vec2,
    sensor: &GroundSensorConfig,
) -> bool {
    probe_ground(caster, &GroundProbe::new(position, sensor)).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Flat floor at a fixed height, on a fixed set of layers.
    struct FlatFloor {
        height: f32,
        layers: u32,
    }

    impl ShapeCaster for FlatFloor {
        fn circle_cast(&self, probe: &GroundProbe) -> Option<ProbeHit> {
            if !probe.mask.matches(self.layers) {
                return None;
            }
            let bottom = probe.origin.y - probe.radius;
            let gap = (bottom - self.height).max(0.0);
            (gap <= probe.max_distance).then(|| {
                ProbeHit::new(gap, Vec2::Y, probe.origin + probe.direction * gap, None)
            })
        }
    }

    #[test]
    fn probe_geometry_follows_config() {
        let sensor = GroundSensorConfig::new(0.3, -0.8, 0.5);
        let probe = GroundProbe::new(Vec2::new(2.0, 5.0), &sensor);

        assert_eq!(probe.start(), Vec2::new(2.0, 4.2));
        assert!((probe.end() - Vec2::new(2.0, 3.7)).length() < 1e-5);
        assert_eq!(probe.direction, Vec2::NEG_Y);
        assert!(probe.exclude.is_none());

        let entity = Entity::from_raw(7);
        assert_eq!(probe.excluding(entity).exclude, Some(entity));
    }

    #[test]
    fn floor_within_reach_is_ground() {
        let floor = FlatFloor { height: 0.0, layers: 1 };
        let sensor = GroundSensorConfig::new(0.3, -0.8, 0.5);

        // Probe bottom at 1.0 - 0.8 - 0.3 = -0.1: already overlapping.
        assert!(sense(Some(&floor), Vec2::new(0.0, 1.0), &sensor));
        // Probe bottom at 0.4, within the 0.5 sweep.
        assert!(sense(Some(&floor), Vec2::new(0.0, 1.5), &sensor));
        // Probe bottom at 0.9, out of reach.
        assert!(!sense(Some(&floor), Vec2::new(0.0, 2.0), &sensor));
    }

    #[test]
    fn mask_excludes_floor_layer() {
        let floor = FlatFloor { height: 0.0, layers: 0b10 };
        let sensor = GroundSensorConfig::new(0.3, -0.8, 0.5);

        assert!(!sense(Some(&floor), Vec2::new(0.0, 1.0), &sensor));

        let sensor = sensor.with_mask(GroundMask::layer(2));
        assert!(sense(Some(&floor), Vec2::new(0.0, 1.0), &sensor));
    }

    #[test]
    fn missing_physics_fails_closed() {
        let sensor = GroundSensorConfig::default();
        assert!(!sense::<FlatFloor>(None, Vec2::ZERO, &sensor));
    }
}
