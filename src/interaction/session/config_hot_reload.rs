use std::collections::HashMap;
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::core::config::GameConfig;

/// Files polled for changes, in layering order.
#[derive(Resource, Debug, Clone)]
pub struct ConfigReloadSettings {
    pub paths: Vec<PathBuf>,
    pub interval_secs: f32,
}

impl Default for ConfigReloadSettings {
    fn default() -> Self {
        Self {
            paths: vec![
                PathBuf::from("assets/config/game.ron"),
                PathBuf::from("assets/config/game.local.ron"),
            ],
            interval_secs: 0.5,
        }
    }
}

#[derive(Resource, Debug)]
struct ConfigReloadState {
    last_mod: HashMap<PathBuf, SystemTime>,
    timer: Timer,
}

impl Default for ConfigReloadState {
    fn default() -> Self {
        Self {
            last_mod: HashMap::new(),
            timer: Timer::from_seconds(0.5, TimerMode::Repeating),
        }
    }
}

/// Native only: re-reads the layered config when any file changes on disk.
/// Values are read by systems every frame, so most edits apply immediately;
/// the window size and title are pushed to the window here.
pub struct ConfigHotReloadPlugin;

impl Plugin for ConfigHotReloadPlugin {
    fn build(&self, app: &mut App) {
        #[cfg(not(target_arch = "wasm32"))]
        {
            app.init_resource::<ConfigReloadSettings>()
                .init_resource::<ConfigReloadState>()
                .add_systems(Update, poll_and_reload_config);
        }
        #[cfg(target_arch = "wasm32")]
        let _ = app;
    }
}

/// Marks every path whose modification time moved forward; returns whether any did.
fn refresh_mod_times(state: &mut ConfigReloadState, paths: &[PathBuf]) -> bool {
    let mut dirty = false;
    for path in paths {
        let Ok(modified) = std::fs::metadata(path).and_then(|m| m.modified()) else {
            continue;
        };
        let seen = state.last_mod.entry(path.clone()).or_insert(UNIX_EPOCH);
        if modified > *seen {
            *seen = modified;
            dirty = true;
        }
    }
    dirty
}

fn poll_and_reload_config(
    time: Res<Time>,
    settings: Res<ConfigReloadSettings>,
    mut state: ResMut<ConfigReloadState>,
    mut cfg: ResMut<GameConfig>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
) {
    let interval = settings.interval_secs.max(0.05);
    if (state.timer.duration().as_secs_f32() - interval).abs() > f32::EPSILON {
        state.timer.set_duration(Duration::from_secs_f32(interval));
    }
    if !state.timer.tick(time.delta()).finished() {
        return;
    }
    if !refresh_mod_times(&mut state, &settings.paths) {
        return;
    }
    let (next, _used, errors) = GameConfig::load_layered(settings.paths.iter());
    for e in errors {
        warn!(target: "config", "hot-reload: {e}");
    }
    if *cfg == next {
        return;
    }
    for w in next.validate() {
        warn!(target: "config", "hot-reload: {w}");
    }
    if let Ok(mut window) = windows.single_mut() {
        if window.width() != next.window.width || window.height() != next.window.height {
            window.resolution.set(next.window.width, next.window.height);
        }
        if window.title != next.window.title {
            window.title = next.window.title.clone();
        }
    }
    info!(target: "config", "hot-reload applied");
    *cfg = next;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mod_time_tracking_flags_first_sight_then_settles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.ron");
        std::fs::write(&path, "(window: (title: \"a\"))").unwrap();
        let mut state = ConfigReloadState::default();
        let paths = vec![path, dir.path().join("missing.ron")];
        assert!(refresh_mod_times(&mut state, &paths));
        assert!(!refresh_mod_times(&mut state, &paths));
    }
}
