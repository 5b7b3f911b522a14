use bevy::prelude::*;

use crate::core::config::GameConfig;
use crate::gameplay::balloons::{BalloonRegistry, PopStats};

#[derive(Resource, Deref, DerefMut)]
struct AutoCloseTimer(Timer);

/// Exits the app after `window.autoClose` seconds (disabled when <= 0).
pub struct AutoClosePlugin;

impl Plugin for AutoClosePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, arm_auto_close)
            .add_systems(Update, tick_auto_close);
    }
}

fn arm_auto_close(mut commands: Commands, cfg: Res<GameConfig>) {
    let secs = cfg.window.auto_close;
    if secs > 0.0 {
        info!(target: "session", "auto-close armed: exiting after {secs} seconds");
        commands.insert_resource(AutoCloseTimer(Timer::from_seconds(secs, TimerMode::Once)));
    }
}

fn tick_auto_close(
    time: Res<Time>,
    timer: Option<ResMut<AutoCloseTimer>>,
    registry: Option<Res<BalloonRegistry>>,
    stats: Option<Res<PopStats>>,
    mut exit: EventWriter<AppExit>,
) {
    let Some(mut timer) = timer else {
        return;
    };
    if !timer.tick(time.delta()).just_finished() {
        return;
    }
    let slots = registry.map(|r| r.len()).unwrap_or(0);
    let stats = stats.map(|s| *s).unwrap_or_default();
    info!(
        target: "session",
        "auto-close: {slots} slots, {} top pops, {} click pops, {} respawns; exiting",
        stats.reached_top, stats.clicked, stats.respawned
    );
    exit.write(AppExit::Success);
}
