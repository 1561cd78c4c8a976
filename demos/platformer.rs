//! Platformer Example
//!
//! A playable scene with a floor, two platforms and on-screen controls.
//!
//! ## Controls
//! - **A/D** or **Left/Right**: Move horizontally
//! - **Space**, **W** or **Up**: Jump (double jump in the air)
//! - Gamepad left stick / South button
//! - Drag the circle in the bottom left: virtual joystick
//! - Click the square in the bottom right: jump button
//!
//! Ground probes are drawn as circles: yellow in the air, green on the ground.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use platformer_motion::prelude::*;

// ==================== Constants ====================

const PX_PER_M: f32 = 10.0; // Pixels per meter for Rapier

const PLAYER_HALF_HEIGHT: f32 = 8.0;
const PLAYER_RADIUS: f32 = 6.0;

const FLOOR_Y: f32 = -250.0;
const FLOOR_HALF_WIDTH: f32 = 500.0;
const WALL_THICKNESS: f32 = 20.0;

/// Drag distance in pixels that counts as full deflection.
const JOYSTICK_RANGE: f32 = 60.0;

// ==================== Main ====================

fn player_config() -> MotionConfig {
    MotionConfig::player()
        .with_move_speed(7.0 * PX_PER_M)
        .with_jump_force(10.0 * PX_PER_M)
        .with_ground_sensor(GroundSensorConfig::new(
            0.3 * PX_PER_M,
            -(PLAYER_HALF_HEIGHT + PLAYER_RADIUS) + 0.2 * PX_PER_M,
            0.5 * PX_PER_M,
        ))
}

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Platformer - Motion Controller Example".into(),
                resolution: (1280.0, 720.0).into(),
                ..default()
            }),
            ..default()
        }))
        // Physics
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(
            PX_PER_M,
        ))
        // Character controller
        .add_plugins(PlatformerControllerPlugin::<Rapier2dBackend>::default().with_probe_gizmos())
        .add_systems(Startup, setup)
        .run();
}

// ==================== Setup ====================

fn setup(mut commands: Commands) -> Result {
    commands.spawn(Camera2d);

    spawn_level(&mut commands);
    let player = spawn_player(&mut commands)?;
    spawn_touch_controls(&mut commands, player);

    commands.spawn((
        Text::new("A/D: Move | Space/W: Jump | Drag left circle: Joystick | Right square: Jump"),
        TextFont {
            font_size: 20.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(10.0),
            left: Val::Px(10.0),
            ..default()
        },
        Pickable::IGNORE,
    ));

    Ok(())
}

fn spawn_level(commands: &mut Commands) {
    let gray = Color::srgb(0.3, 0.3, 0.3);
    let green = Color::srgb(0.4, 0.5, 0.3);

    // Floor
    spawn_static_box(
        commands,
        Vec2::new(0.0, FLOOR_Y - WALL_THICKNESS / 2.0),
        Vec2::new(FLOOR_HALF_WIDTH, WALL_THICKNESS / 2.0),
        gray,
    );

    // Side walls
    for x in [-FLOOR_HALF_WIDTH, FLOOR_HALF_WIDTH] {
        spawn_static_box(
            commands,
            Vec2::new(x, FLOOR_Y + 200.0),
            Vec2::new(WALL_THICKNESS / 2.0, 200.0),
            gray,
        );
    }

    // Platforms
    spawn_static_box(commands, Vec2::new(-150.0, -130.0), Vec2::new(80.0, 8.0), green);
    spawn_static_box(commands, Vec2::new(150.0, -40.0), Vec2::new(80.0, 8.0), green);
}

fn spawn_static_box(commands: &mut Commands, position: Vec2, half_size: Vec2, color: Color) {
    commands.spawn((
        Sprite::from_color(color, half_size * 2.0),
        Transform::from_translation(position.extend(0.0)),
        RigidBody::Fixed,
        Collider::cuboid(half_size.x, half_size.y),
    ));
}

fn spawn_player(commands: &mut Commands) -> Result<Entity, ConfigError> {
    let size = Vec2::new(PLAYER_RADIUS * 2.0, (PLAYER_HALF_HEIGHT + PLAYER_RADIUS) * 2.0);

    let player = commands
        .spawn((
            Sprite::from_color(Color::srgb(0.2, 0.6, 0.9), size),
            FlipSpriteWithFacing,
            Transform::from_xyz(0.0, FLOOR_Y + 60.0, 1.0),
            PlatformerCharacterBundle::new(player_config())?,
            InputBindings::default(),
            Rapier2dCharacterBundle::new(),
            Collider::capsule_y(PLAYER_HALF_HEIGHT, PLAYER_RADIUS),
            Friction::coefficient(0.0),
        ))
        .id();

    Ok(player)
}

// ==================== Touch Controls ====================

fn spawn_touch_controls(commands: &mut Commands, player: Entity) {
    commands
        .spawn((
            VirtualJoystick::new(player),
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(40.0),
                bottom: Val::Px(40.0),
                width: Val::Px(120.0),
                height: Val::Px(120.0),
                ..default()
            },
            BorderRadius::MAX,
            BackgroundColor(Color::srgba(1.0, 1.0, 1.0, 0.15)),
        ))
        .observe(drag_joystick)
        .observe(release_joystick);

    commands.spawn((
        Button,
        JumpButton { target: player },
        Node {
            position_type: PositionType::Absolute,
            right: Val::Px(40.0),
            bottom: Val::Px(40.0),
            width: Val::Px(100.0),
            height: Val::Px(100.0),
            ..default()
        },
        BackgroundColor(Color::srgba(1.0, 1.0, 1.0, 0.15)),
    ));
}

fn drag_joystick(trigger: Trigger<Pointer<Drag>>, mut q_joysticks: Query<&mut VirtualJoystick>) {
    let Ok(mut joystick) = q_joysticks.get_mut(trigger.target()) else {
        return;
    };
    // Screen space grows downward
    let distance = trigger.event().distance;
    joystick.set_axis(Vec2::new(distance.x, -distance.y) / JOYSTICK_RANGE);
}

fn release_joystick(
    trigger: Trigger<Pointer<DragEnd>>,
    mut q_joysticks: Query<&mut VirtualJoystick>,
) {
    if let Ok(mut joystick) = q_joysticks.get_mut(trigger.target()) {
        joystick.release();
    }
}
