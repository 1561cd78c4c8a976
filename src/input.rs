//! Input adapters.
//!
//! Raw input arrives asynchronously relative to the fixed tick. Everything in
//! this module turns it into [`MoveAxisChanged`] / [`JumpRequested`] events or
//! a polled [`VirtualJoystick`] value, and [`buffer_input_events`] folds those
//! into each character's [`MotionIntent`] at the start of the tick.
//!
//! Games with their own input layer can skip [`InputBindings`] and send the
//! events, or call [`MotionIntent::request_jump`] directly.

use bevy::prelude::*;

use crate::controller::MotionController;
use crate::intent::{JumpSource, MotionIntent};

/// The device horizontal axis of `entity` changed.
///
/// Sent on change, or when the intent no longer holds the current value. The
/// value stays latched in the intent until the next one.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct MoveAxisChanged {
    pub entity: Entity,
    pub value: f32,
}

/// A jump was requested for `entity`.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct JumpRequested {
    pub entity: Entity,
    pub source: JumpSource,
}

impl JumpRequested {
    pub fn new(entity: Entity, source: JumpSource) -> Self {
        Self { entity, source }
    }
}

/// On-screen stick. The controller polls `axis.x` every tick.
///
/// Lives on the UI entity; `target` is the character it steers.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct VirtualJoystick {
    pub target: Entity,
    /// Current deflection, each component in [-1, 1].
    pub axis: Vec2,
}

impl VirtualJoystick {
    pub fn new(target: Entity) -> Self {
        Self {
            target,
            axis: Vec2::ZERO,
        }
    }

    /// Update the deflection, clamped to the unit square.
    pub fn set_axis(&mut self, axis: Vec2) {
        self.axis = axis.clamp(Vec2::NEG_ONE, Vec2::ONE);
    }

    /// Return to center.
    pub fn release(&mut self) {
        self.axis = Vec2::ZERO;
    }
}

/// On-screen jump control. Every press of the UI node is one jump request.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct JumpButton {
    pub target: Entity,
}

/// Keyboard and gamepad bindings for a character.
#[derive(Component, Reflect, Debug, Clone)]
#[reflect(Component)]
pub struct InputBindings {
    pub left: Vec<KeyCode>,
    pub right: Vec<KeyCode>,
    pub jump: Vec<KeyCode>,
    /// Read the first connected gamepad as well.
    pub use_gamepad: bool,
    pub gamepad_jump: GamepadButton,
    /// Stick values with smaller magnitude read as zero.
    pub stick_deadzone: f32,
    /// Last axis value sent, for change detection.
    #[reflect(ignore)]
    last_axis: f32,
}

impl Default for InputBindings {
    fn default() -> Self {
        Self {
            left: vec![KeyCode::KeyA, KeyCode::ArrowLeft],
            right: vec![KeyCode::KeyD, KeyCode::ArrowRight],
            jump: vec![KeyCode::Space, KeyCode::KeyW, KeyCode::ArrowUp],
            use_gamepad: true,
            gamepad_jump: GamepadButton::South,
            stick_deadzone: 0.15,
            last_axis: 0.0,
        }
    }
}

impl InputBindings {
    /// Keyboard only.
    pub fn keyboard() -> Self {
        Self {
            use_gamepad: false,
            ..default()
        }
    }

    /// Horizontal axis from pressed keys: -1, 0 or 1.
    pub fn keyboard_axis(&self, keyboard: &ButtonInput<KeyCode>) -> f32 {
        let mut axis = 0.0;
        if keyboard.any_pressed(self.left.iter().copied()) {
            axis -= 1.0;
        }
        if keyboard.any_pressed(self.right.iter().copied()) {
            axis += 1.0;
        }
        axis
    }

    /// Stick value with the deadzone applied.
    pub fn stick_axis(&self, raw: f32) -> f32 {
        if raw.abs() < self.stick_deadzone {
            0.0
        } else {
            raw.clamp(-1.0, 1.0)
        }
    }
}

/// Read keyboard and gamepad into input events.
///
/// Keyboard wins over the stick when both are active, since both feed the
/// same device axis. Runs in `Update` so press edges are never missed between
/// fixed ticks.
pub fn read_device_input(
    keyboard: Option<Res<ButtonInput<KeyCode>>>,
    gamepads: Query<&Gamepad>,
    mut q_bindings: Query<(Entity, &mut InputBindings, Option<&MotionIntent>)>,
    mut axis_events: EventWriter<MoveAxisChanged>,
    mut jump_events: EventWriter<JumpRequested>,
) {
    let gamepad = gamepads.iter().next();

    for (entity, mut bindings, intent) in &mut q_bindings {
        let key_axis = keyboard
            .as_ref()
            .map(|k| bindings.keyboard_axis(k))
            .unwrap_or(0.0);
        let stick_axis = match gamepad {
            Some(pad) if bindings.use_gamepad => bindings.stick_axis(pad.left_stick().x),
            _ => 0.0,
        };
        let axis = if key_axis != 0.0 { key_axis } else { stick_axis };

        // Resend if the intent lost the latched value, e.g. after `clear_axes`
        let stale = intent.is_some_and(|intent| intent.device_axis != axis);
        if axis != bindings.last_axis || stale {
            bindings.last_axis = axis;
            axis_events.write(MoveAxisChanged {
                entity,
                value: axis,
            });
        }

        if let Some(keyboard) = keyboard.as_ref() {
            if keyboard.any_just_pressed(bindings.jump.iter().copied()) {
                jump_events.write(JumpRequested::new(entity, JumpSource::Button));
            }
        }
        if let Some(pad) = gamepad {
            if bindings.use_gamepad && pad.just_pressed(bindings.gamepad_jump) {
                jump_events.write(JumpRequested::new(entity, JumpSource::Button));
            }
        }
    }
}

/// Forward presses of [`JumpButton`] UI nodes, one request per press, no debouncing.
pub fn forward_jump_button_presses(
    q_buttons: Query<(&Interaction, &JumpButton), Changed<Interaction>>,
    mut jump_events: EventWriter<JumpRequested>,
) {
    for (interaction, button) in &q_buttons {
        if *interaction == Interaction::Pressed {
            jump_events.write(JumpRequested::new(button.target, JumpSource::Touch));
        }
    }
}

/// Fold buffered input events into intents.
///
/// Jump requests only queue up for characters whose controller is running;
/// anything else would never be drained.
pub fn buffer_input_events(
    mut axis_events: EventReader<MoveAxisChanged>,
    mut jump_events: EventReader<JumpRequested>,
    mut q_intents: Query<(&mut MotionIntent, Option<&MotionController>)>,
) {
    for event in axis_events.read() {
        match q_intents.get_mut(event.entity) {
            Ok((mut intent, _)) => intent.set_device_axis(event.value),
            Err(_) => debug!("axis change for {} has no motion intent", event.entity),
        }
    }

    for event in jump_events.read() {
        match q_intents.get_mut(event.entity) {
            Ok((mut intent, Some(controller))) if controller.is_ready() => {
                intent.request_jump(event.source)
            }
            Ok(_) => debug!(
                "jump request for {} dropped, no running motion controller",
                event.entity
            ),
            Err(_) => debug!("jump request for {} has no motion intent", event.entity),
        }
    }
}

/// Copy each virtual joystick's horizontal deflection into its target's intent.
///
/// A character whose joystick went away is released to 0, so a stick
/// despawned mid-drag cannot keep overriding the device axis.
pub fn poll_virtual_joysticks(
    q_joysticks: Query<&VirtualJoystick>,
    mut q_intents: Query<(Entity, &mut MotionIntent)>,
) {
    for (entity, mut intent) in &mut q_intents {
        match q_joysticks.iter().find(|joystick| joystick.target == entity) {
            Some(joystick) => {
                if intent.joystick_axis != joystick.axis.x {
                    intent.set_joystick_axis(joystick.axis.x);
                }
                if !intent.joystick_attached {
                    intent.joystick_attached = true;
                }
            }
            None if intent.joystick_attached => {
                intent.set_joystick_axis(0.0);
                intent.joystick_attached = false;
            }
            None => {}
        }
    }
}
