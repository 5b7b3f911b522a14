use bevy::prelude::*;

use crate::core::system::system_order::PrePhysicsSet;
use crate::core::viewport::ViewportPlugin;
#[cfg(feature = "debug")]
use crate::debug::DebugPlugin;
use crate::effects::{ParticlesPlugin, PopAudioPlugin};
use crate::gameplay::balloons::BalloonsPlugin;
use crate::interaction::input::pointer::{PointerInputSet, PointerPlugin};
use crate::interaction::session::auto_close::AutoClosePlugin;
use crate::interaction::session::config_hot_reload::ConfigHotReloadPlugin;
use crate::physics::boundaries::BoundariesPlugin;
use crate::physics::rapier::rapier_physics::PhysicsSetupPlugin;
use crate::rendering::camera::CameraPlugin;
use crate::rendering::greeting::GreetingPlugin;

/// Everything except the window/renderer plugins. Expects `GameConfig` to be
/// inserted before it is added.
pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(Update, PrePhysicsSet.after(PointerInputSet))
            .add_plugins((
                ViewportPlugin,
                CameraPlugin,
                PhysicsSetupPlugin,
                BoundariesPlugin,
                BalloonsPlugin,
                ParticlesPlugin,
                PopAudioPlugin,
                PointerPlugin,
                GreetingPlugin,
                ConfigHotReloadPlugin,
                AutoClosePlugin,
                #[cfg(feature = "debug")]
                DebugPlugin,
            ));
    }
}
