//! Multi-jump budget.
//!
//! A character may jump `max` times before it has to land again. Landing
//! means the ground sensor reports contact while the character is not moving
//! upward, so a jump taken while the feet still touch the floor is not
//! refunded on the following tick.

use bevy::prelude::*;

/// Vertical speed at or below which a grounded character counts as landed.
///
/// Absorbs float noise at rest and lets the descending phase reset the budget.
pub const LANDING_VELOCITY_EPSILON: f32 = 0.01;

/// Bounded jump counter. Invariant: `used <= max`.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq)]
pub struct JumpBudget {
    used: u32,
    max: u32,
}

impl Default for JumpBudget {
    fn default() -> Self {
        Self::new(2)
    }
}

impl JumpBudget {
    /// Fresh budget with `max` jumps available.
    pub fn new(max: u32) -> Self {
        Self { used: 0, max }
    }

    /// Jumps taken since the last landing.
    #[inline]
    pub fn used(&self) -> u32 {
        self.used
    }

    /// Total jumps per airtime.
    #[inline]
    pub fn max(&self) -> u32 {
        self.max
    }

    /// Jumps still available.
    #[inline]
    pub fn remaining(&self) -> u32 {
        self.max - self.used
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.used >= self.max
    }

    /// Change the budget size, keeping the invariant.
    pub fn set_max(&mut self, max: u32) {
        self.max = max;
        self.used = self.used.min(max);
    }

    /// Mark `used` jumps as spent, clamped to the budget.
    pub fn set_used(&mut self, used: u32) {
        self.used = used.min(self.max);
    }

    /// Refill the budget if the character has landed.
    ///
    /// Returns `true` when the counter was reset this call.
    pub fn reset_if_landed(&mut self, grounded: bool, vertical_velocity: f32) -> bool {
        if grounded && vertical_velocity <= LANDING_VELOCITY_EPSILON {
            self.used = 0;
            true
        } else {
            false
        }
    }

    /// Spend one jump if available.
    ///
    /// On success the vertical velocity is replaced by `jump_force` and the
    /// horizontal velocity is left alone. Returns `false` without touching
    /// anything when the budget is exhausted.
    pub fn try_jump(&mut self, velocity: &mut Vec2, jump_force: f32) -> bool {
        if self.is_exhausted() {
            return false;
        }
        velocity.y = jump_force;
        self.used += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jump_sets_velocity_absolutely() {
        let mut budget = JumpBudget::new(2);
        let mut velocity = Vec2::new(3.0, 25.0);

        assert!(budget.try_jump(&mut velocity, 10.0));
        assert_eq!(velocity, Vec2::new(3.0, 10.0));
        assert_eq!(budget.used(), 1);

        velocity.y = -4.0;
        assert!(budget.try_jump(&mut velocity, 10.0));
        assert_eq!(velocity, Vec2::new(3.0, 10.0));
        assert_eq!(budget.used(), 2);
    }

    #[test]
    fn exhausted_budget_is_a_no_op() {
        let mut budget = JumpBudget::new(1);
        let mut velocity = Vec2::ZERO;
        assert!(budget.try_jump(&mut velocity, 10.0));

        velocity = Vec2::new(1.0, -2.0);
        assert!(!budget.try_jump(&mut velocity, 10.0));
        assert_eq!(velocity, Vec2::new(1.0, -2.0));
        assert_eq!(budget.used(), 1);
        assert!(budget.is_exhausted());
        assert_eq!(budget.remaining(), 0);
    }

    #[test]
    fn every_jump_below_budget_succeeds() {
        for max in 1..=5 {
            let mut budget = JumpBudget::new(max);
            for expected in 1..=max {
                let mut velocity = Vec2::ZERO;
                assert!(budget.try_jump(&mut velocity, 12.5));
                assert_eq!(velocity.y, 12.5);
                assert_eq!(budget.used(), expected);
            }
            let mut velocity = Vec2::ZERO;
            assert!(!budget.try_jump(&mut velocity, 12.5));
            assert_eq!(velocity.y, 0.0);
        }
    }

    #[test]
    fn grounded_and_settled_resets() {
        for used in 0..=3 {
            let mut budget = JumpBudget::new(3);
            budget.set_used(used);
            assert!(budget.reset_if_landed(true, 0.0));
            assert_eq!(budget.used(), 0);
        }

        let mut budget = JumpBudget::new(2);
        budget.set_used(2);
        assert!(budget.reset_if_landed(true, LANDING_VELOCITY_EPSILON));
        assert_eq!(budget.used(), 0);

        budget.set_used(2);
        assert!(budget.reset_if_landed(true, -8.0));
        assert_eq!(budget.used(), 0);
    }

    #[test]
    fn rising_or_airborne_does_not_reset() {
        let mut budget = JumpBudget::new(2);
        budget.set_used(1);

        assert!(!budget.reset_if_landed(true, 0.02));
        assert_eq!(budget.used(), 1);

        assert!(!budget.reset_if_landed(false, -5.0));
        assert_eq!(budget.used(), 1);
    }

    #[test]
    fn used_is_clamped_to_max() {
        let mut budget = JumpBudget::new(2);
        budget.set_used(9);
        assert_eq!(budget.used(), 2);

        budget.set_max(1);
        assert_eq!(budget.used(), 1);
        assert_eq!(budget.max(), 1);
    }
}
