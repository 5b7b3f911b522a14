#[cfg(feature = "debug")]
use super::modes::{DebugState, DebugStats};
#[cfg(feature = "debug")]
use crate::effects::PopParticle;
#[cfg(feature = "debug")]
use crate::gameplay::balloons::{BalloonRegistry, PopStats};
#[cfg(feature = "debug")]
use bevy::prelude::*;

/// Exponential moving average, seeded by the first sample.
#[cfg(feature = "debug")]
fn smooth(prev: f32, sample: f32) -> f32 {
    if prev == 0.0 {
        sample
    } else {
        prev * 0.9 + sample * 0.1
    }
}

#[cfg(feature = "debug")]
pub fn debug_stats_collect_system(
    time: Res<Time>,
    mut state: ResMut<DebugState>,
    mut stats: ResMut<DebugStats>,
    registry: Res<BalloonRegistry>,
    pops: Res<PopStats>,
    q_particles: Query<(), With<PopParticle>>,
) {
    state.frame_counter += 1;
    let dt = time.delta_secs().max(1e-6);
    stats.fps = smooth(stats.fps, 1.0 / dt);
    stats.frame_time_ms = smooth(stats.frame_time_ms, dt * 1000.0);
    stats.slots = registry.len();
    stats.live_bodies = registry.live_bodies().count();
    stats.particles = q_particles.iter().count();
    stats.pops = pops.reached_top + pops.clicked;
    stats.respawns = pops.respawned;
}

#[cfg(all(test, feature = "debug"))]
mod tests {
    use super::smooth;

    #[test]
    fn smoothing_seeds_then_blends() {
        assert_eq!(smooth(0.0, 60.0), 60.0);
        assert!((smooth(60.0, 30.0) - 57.0).abs() < 1e-4);
    }
}
