#[cfg(feature = "debug")]
use bevy::prelude::*;

#[cfg(feature = "debug")]
#[derive(Resource, Debug)]
pub struct DebugState {
    pub wireframe: bool,
    pub logging: bool,
    pub log_interval: f32,
    pub time_accum: f32,
    pub frame_counter: u64,
}

/// Seeded from `physics.rapier_debug` and the `debug` config section.
#[cfg(feature = "debug")]
impl FromWorld for DebugState {
    fn from_world(world: &mut World) -> Self {
        let cfg = world
            .get_resource::<crate::core::config::GameConfig>()
            .cloned()
            .unwrap_or_default();
        Self {
            wireframe: cfg.physics.rapier_debug,
            logging: cfg.debug.stats_log,
            log_interval: cfg.debug.stats_interval.max(0.05),
            time_accum: 0.0,
            frame_counter: 0,
        }
    }
}

#[cfg(feature = "debug")]
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct DebugStats {
    pub fps: f32,
    pub frame_time_ms: f32,
    pub slots: usize,
    pub live_bodies: usize,
    pub particles: usize,
    pub pops: u32,
    pub respawns: u32,
}
