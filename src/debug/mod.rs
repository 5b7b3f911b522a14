//! Debug module: feature gated stats logging and the Rapier wireframe toggle.
//! Built only when compiled with `--features debug`.

#[cfg(feature = "debug")]
mod keys;
#[cfg(feature = "debug")]
mod logging;
#[cfg(feature = "debug")]
mod modes;
#[cfg(feature = "debug")]
mod stats;

#[cfg(feature = "debug")]
pub use modes::*;

#[cfg(feature = "debug")]
use bevy::prelude::*;

#[cfg(feature = "debug")]
pub struct DebugPlugin;

#[cfg(feature = "debug")]
impl Plugin for DebugPlugin {
    fn build(&self, app: &mut App) {
        use keys::{debug_key_input_system, sync_rapier_wireframe_system};
        use logging::debug_logging_system;
        use stats::debug_stats_collect_system;

        app.init_resource::<DebugState>()
            .init_resource::<DebugStats>()
            .add_systems(
                Update,
                (
                    debug_key_input_system,
                    sync_rapier_wireframe_system,
                    debug_stats_collect_system,
                    debug_logging_system,
                )
                    .chain(),
            );
    }
}
