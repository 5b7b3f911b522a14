use bevy::asset::LoadState;
use bevy::audio::{PlaybackMode, Volume};
use bevy::prelude::*;

use crate::core::config::GameConfig;
use crate::core::error::BalloonError;
use crate::core::system::system_order::PopEffectsSet;
use crate::gameplay::balloons::BalloonPopped;

/// Handle to the pop sample. `disabled` is set once for the session when the
/// sample cannot be loaded or audio is switched off in config.
#[derive(Resource, Debug, Default)]
pub struct PopSound {
    pub handle: Option<Handle<AudioSource>>,
    pub disabled: bool,
}

/// Marks a playing pop; the entity despawns itself when playback ends.
#[derive(Component)]
pub struct PopVoice;

pub struct PopAudioPlugin;

impl Plugin for PopAudioPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PopSound>()
            .add_systems(Startup, load_pop_sound)
            .add_systems(Update, watch_pop_sound_load)
            .add_systems(PostUpdate, play_pop_sounds.in_set(PopEffectsSet));
    }
}

fn load_pop_sound(
    mut sound: ResMut<PopSound>,
    cfg: Res<GameConfig>,
    asset_server: Option<Res<AssetServer>>,
) {
    if !cfg.audio.enabled {
        sound.disabled = true;
        info!(target: "audio", "pop sound disabled by config");
        return;
    }
    let Some(asset_server) = asset_server else {
        sound.disabled = true;
        return;
    };
    sound.handle = Some(asset_server.load(cfg.audio.pop_sound.clone()));
}

fn watch_pop_sound_load(
    mut sound: ResMut<PopSound>,
    cfg: Res<GameConfig>,
    asset_server: Option<Res<AssetServer>>,
) {
    if sound.disabled {
        return;
    }
    let (Some(handle), Some(asset_server)) = (sound.handle.as_ref(), asset_server) else {
        return;
    };
    if let Some(LoadState::Failed(reason)) = asset_server.get_load_state(handle.id()) {
        let err = BalloonError::AudioUnavailable {
            path: cfg.audio.pop_sound.clone(),
            reason: reason.to_string(),
        };
        warn!(target: "audio", "{err}; pops will be silent");
        sound.disabled = true;
        sound.handle = None;
    }
}

/// Whether another voice may start given how many are already playing.
#[inline]
pub fn voice_available(active: usize, max_concurrent: usize) -> bool {
    max_concurrent == 0 || active < max_concurrent
}

fn play_pop_sounds(
    mut commands: Commands,
    mut popped: EventReader<BalloonPopped>,
    sound: Res<PopSound>,
    cfg: Res<GameConfig>,
    voices: Query<(), With<PopVoice>>,
) {
    if sound.disabled {
        popped.clear();
        return;
    }
    let Some(handle) = sound.handle.as_ref() else {
        popped.clear();
        return;
    };
    let mut active = voices.iter().count();
    for _ in popped.read() {
        if !voice_available(active, cfg.audio.max_concurrent) {
            trace!(target: "audio", "pop voice limit reached ({active})");
            continue;
        }
        commands.spawn((
            PopVoice,
            AudioPlayer::new(handle.clone()),
            PlaybackSettings {
                mode: PlaybackMode::Despawn,
                volume: Volume::Linear(cfg.audio.volume.max(0.0)),
                ..default()
            },
        ));
        active += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlimited_voices_when_cap_is_zero() {
        assert!(voice_available(0, 0));
        assert!(voice_available(500, 0));
    }

    #[test]
    fn cap_limits_voices() {
        assert!(voice_available(2, 3));
        assert!(!voice_available(3, 3));
    }
}
