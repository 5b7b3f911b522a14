use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::core::config::GameConfig;

pub struct PhysicsSetupPlugin; // our wrapper to configure Rapier for floating balloons

impl Plugin for PhysicsSetupPlugin {
    fn build(&self, app: &mut App) {
        let (ppm, debug) = app
            .world()
            .get_resource::<GameConfig>()
            .map(|c| (c.physics.pixels_per_meter, c.physics.rapier_debug))
            .unwrap_or((1.0, false));
        app.add_plugins((
            RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(ppm.max(f32::EPSILON)),
            RapierDebugRenderPlugin {
                enabled: debug,
                ..default()
            },
        ))
        .add_systems(Update, apply_gravity_from_config);
    }
}

/// Keeps Rapier's gravity in sync with `physics.gravity_y` (also after a config hot-reload).
/// RapierConfiguration lives on the context entity, so it is queried rather than taken as a resource.
fn apply_gravity_from_config(
    mut q_cfg: Query<&mut RapierConfiguration>,
    game_cfg: Res<GameConfig>,
) {
    let target = Vect::new(0.0, game_cfg.physics.gravity_y);
    for mut cfg in q_cfg.iter_mut() {
        if cfg.gravity != target {
            cfg.gravity = target;
            info!(target: "physics", "gravity set to ({:.1}, {:.1})", target.x, target.y);
        }
    }
}
