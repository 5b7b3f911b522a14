use bevy::prelude::*;
use bevy::render::camera::ClearColorConfig;

use crate::core::config::GameConfig;

/// Background behind both scenes.
pub const BACKGROUND: Color = Color::srgb(0.078, 0.082, 0.122);

/// Perspective camera that renders the greeting text first.
#[derive(Component)]
pub struct GreetingCamera;

/// Orthographic camera for balloons and particles, drawn over the 3D scene.
#[derive(Component)]
pub struct BalloonCamera;

#[derive(Component)]
pub struct GreetingLight;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(BACKGROUND))
            .add_systems(Startup, (setup_cameras, setup_lights))
            .add_systems(Update, sync_greeting_camera);
    }
}

pub fn perspective_for(cfg: &GameConfig) -> PerspectiveProjection {
    PerspectiveProjection {
        fov: cfg.greeting.fov_degrees.clamp(1.0, 179.0).to_radians(),
        near: 0.1,
        far: 1000.0,
        ..default()
    }
}

fn setup_cameras(mut commands: Commands, cfg: Res<GameConfig>) {
    commands.spawn((
        Name::new("GreetingCamera"),
        GreetingCamera,
        Camera3d::default(),
        Camera {
            order: 0,
            clear_color: ClearColorConfig::Custom(BACKGROUND),
            ..default()
        },
        Projection::Perspective(perspective_for(&cfg)),
        Transform::from_xyz(0.0, 0.0, cfg.greeting.camera_z),
    ));
    commands.spawn((
        Name::new("BalloonCamera"),
        BalloonCamera,
        Camera2d,
        Camera {
            order: 1,
            clear_color: ClearColorConfig::None,
            ..default()
        },
    ));
}

fn setup_lights(mut commands: Commands, cfg: Res<GameConfig>) {
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: cfg.greeting.ambient_brightness,
        ..default()
    });
    commands.spawn((
        Name::new("GreetingLight"),
        GreetingLight,
        PointLight {
            color: Color::WHITE,
            intensity: cfg.greeting.point_light_intensity,
            range: 100.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(10.0, 10.0, 10.0),
    ));
}

fn sync_greeting_camera(
    cfg: Res<GameConfig>,
    mut cameras: Query<(&mut Projection, &mut Transform), With<GreetingCamera>>,
    mut ambient: ResMut<AmbientLight>,
) {
    if !cfg.is_changed() {
        return;
    }
    for (mut projection, mut tf) in cameras.iter_mut() {
        *projection = Projection::Perspective(perspective_for(&cfg));
        tf.translation.z = cfg.greeting.camera_z;
    }
    ambient.brightness = cfg.greeting.ambient_brightness;
}
