//! Movement intent components.
//!
//! Intents hold what the player currently asks for. Input adapters write into
//! them whenever events arrive; the motion pipeline reads them once per fixed
//! tick. Horizontal axes are latched until changed, jump requests are drained.

use bevy::prelude::*;

/// Where a jump request came from.
///
/// Every origin funnels through [`MotionIntent::request_jump`], so the
/// controller never special-cases a device.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JumpSource {
    /// Keyboard key or gamepad button press.
    Button,
    /// On-screen touch control.
    Touch,
    /// Scripts, AI, replays or anything else.
    Other,
}

/// Combine the device axis and the on-screen joystick into one value.
///
/// The joystick overrides the device whenever it is deflected at all. This is
/// an override, not a blend: at most one source is expected to be driven.
#[inline]
pub fn fuse(device_axis: f32, joystick_axis: f32) -> f32 {
    if joystick_axis != 0.0 {
        joystick_axis
    } else {
        device_axis
    }
}

/// Buffered player input for one character.
///
/// # Example
///
/// ```rust
/// use platformer_motion::prelude::*;
///
/// let mut intent = MotionIntent::new();
/// intent.set_device_axis(0.5);
/// assert_eq!(intent.fused_horizontal(), 0.5);
///
/// // Joystick deflection takes over
/// intent.set_joystick_axis(-1.0);
/// assert_eq!(intent.fused_horizontal(), -1.0);
///
/// intent.request_jump(JumpSource::Touch);
/// assert_eq!(intent.take_jump_requests(), vec![JumpSource::Touch]);
/// assert!(!intent.has_jump_request());
/// ```
#[derive(Component, Reflect, Debug, Clone, Default, PartialEq)]
#[reflect(Component)]
pub struct MotionIntent {
    /// Last horizontal value from keyboard/gamepad (-1.0 = left, 1.0 = right).
    pub device_axis: f32,
    /// Last horizontal value from the on-screen joystick.
    pub joystick_axis: f32,
    /// Jump requests received since the last tick, in arrival order.
    pending_jumps: Vec<JumpSource>,
    /// A [`VirtualJoystick`](crate::input::VirtualJoystick) targeted this intent on the last poll.
    #[reflect(ignore)]
    pub(crate) joystick_attached: bool,
}

impl MotionIntent {
    /// Create an empty intent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Latch the device horizontal axis.
    pub fn set_device_axis(&mut self, value: f32) {
        self.device_axis = sanitize_axis(value);
    }

    /// Latch the joystick horizontal axis.
    pub fn set_joystick_axis(&mut self, value: f32) {
        self.joystick_axis = sanitize_axis(value);
    }

    /// Release both axes.
    pub fn clear_axes(&mut self) {
        self.device_axis = 0.0;
        self.joystick_axis = 0.0;
    }

    /// The single horizontal value the controller acts on this tick.
    #[inline]
    pub fn fused_horizontal(&self) -> f32 {
        fuse(self.device_axis, self.joystick_axis)
    }

    /// Queue a jump. Each call is one independent request.
    pub fn request_jump(&mut self, source: JumpSource) {
        self.pending_jumps.push(source);
    }

    /// Whether any jump is waiting for the next tick.
    pub fn has_jump_request(&self) -> bool {
        !self.pending_jumps.is_empty()
    }

    /// Number of queued requests.
    pub fn pending_jump_count(&self) -> usize {
        self.pending_jumps.len()
    }

    /// Drain all queued requests.
    pub fn take_jump_requests(&mut self) -> Vec<JumpSource> {
        std::mem::take(&mut self.pending_jumps)
    }

    /// Drop queued requests without acting on them.
    pub fn clear_jump_requests(&mut self) {
        self.pending_jumps.clear();
    }
}

/// Clamp to [-1, 1]; NaN counts as released.
fn sanitize_axis(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fuse_prefers_joystick_when_deflected() {
        let samples = [-1.0, -0.5, -0.01, 0.0, 0.01, 0.5, 1.0];
        for &device in &samples {
            for &joystick in &samples {
                let expected = if joystick != 0.0 { joystick } else { device };
                assert_eq!(fuse(device, joystick), expected, "d={device} j={joystick}");
            }
        }
    }

    #[test]
    fn negative_zero_joystick_is_neutral() {
        assert_eq!(fuse(0.7, -0.0), 0.7);
    }

    #[test]
    fn intent_new_is_neutral() {
        let intent = MotionIntent::new();
        assert_eq!(intent.device_axis, 0.0);
        assert_eq!(intent.joystick_axis, 0.0);
        assert_eq!(intent.fused_horizontal(), 0.0);
        assert!(!intent.has_jump_request());
    }

    #[test]
    fn axes_are_clamped() {
        let mut intent = MotionIntent::new();
        intent.set_device_axis(4.0);
        assert_eq!(intent.device_axis, 1.0);

        intent.set_joystick_axis(-3.0);
        assert_eq!(intent.joystick_axis, -1.0);

        intent.set_device_axis(f32::NAN);
        assert_eq!(intent.device_axis, 0.0);
    }

    #[test]
    fn axes_stay_latched_until_changed() {
        let mut intent = MotionIntent::new();
        intent.set_device_axis(0.5);
        assert_eq!(intent.fused_horizontal(), 0.5);
        assert_eq!(intent.fused_horizontal(), 0.5);

        intent.set_joystick_axis(-1.0);
        assert_eq!(intent.fused_horizontal(), -1.0);

        intent.set_joystick_axis(0.0);
        assert_eq!(intent.fused_horizontal(), 0.5);

        intent.clear_axes();
        assert_eq!(intent.fused_horizontal(), 0.0);
    }

    #[test]
    fn jump_requests_keep_every_source() {
        let mut intent = MotionIntent::new();
        intent.request_jump(JumpSource::Button);
        intent.request_jump(JumpSource::Touch);
        assert_eq!(intent.pending_jump_count(), 2);

        let taken = intent.take_jump_requests();
        assert_eq!(taken, vec![JumpSource::Button, JumpSource::Touch]);
        assert!(!intent.has_jump_request());
        assert!(intent.take_jump_requests().is_empty());
    }

    #[test]
    fn clear_jump_requests_discards() {
        let mut intent = MotionIntent::new();
        intent.request_jump(JumpSource::Other);
        intent.clear_jump_requests();
        assert!(!intent.has_jump_request());
    }
}
