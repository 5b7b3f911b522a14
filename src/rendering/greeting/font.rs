use bevy::asset::LoadState;
use bevy::prelude::*;

use crate::core::config::GameConfig;
use crate::core::error::BalloonError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontSource {
    /// `greeting.font` from config.
    Configured,
    /// Bevy's embedded default font.
    Fallback,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontPhase {
    Idle,
    Loading,
    Ready,
    /// Both the configured and the fallback font are unusable; no text is shown.
    Failed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureAction {
    Retry,
    Fallback,
    GiveUp,
}

/// Seconds a reissued load may keep reporting the previous `Failed` state.
pub const RETRY_GRACE_SECS: f32 = 1.0;

/// A reload issued after a failure. Until it is seen loading (or the grace
/// period runs out) a `Failed` state still belongs to the previous attempt.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PendingRetry {
    pub since: Option<f32>,
    pub seen_loading: bool,
}

#[derive(Resource, Debug)]
pub struct GreetingFont {
    pub handle: Option<Handle<Font>>,
    pub source: FontSource,
    pub phase: FontPhase,
    pub retries: u32,
    /// Bumped every time a font becomes ready; mesh rebuilds key on it.
    pub revision: u32,
    pub pending_retry: Option<PendingRetry>,
}

impl Default for GreetingFont {
    fn default() -> Self {
        Self {
            handle: None,
            source: FontSource::Configured,
            phase: FontPhase::Idle,
            retries: 0,
            revision: 0,
            pending_retry: None,
        }
    }
}

impl GreetingFont {
    /// Decide how to recover from a failed load or parse.
    pub fn on_failure(&mut self, max_retries: u32) -> FailureAction {
        match self.source {
            FontSource::Configured if self.retries < max_retries => {
                self.retries += 1;
                self.pending_retry = Some(PendingRetry::default());
                FailureAction::Retry
            }
            FontSource::Configured => {
                self.pending_retry = None;
                self.source = FontSource::Fallback;
                self.handle = Some(Handle::default());
                self.phase = FontPhase::Loading;
                FailureAction::Fallback
            }
            FontSource::Fallback => {
                self.pending_retry = None;
                self.phase = FontPhase::Failed;
                self.handle = None;
                FailureAction::GiveUp
            }
        }
    }

    /// Track the reload issued by the last retry. Returns whether a `Failed`
    /// load state observed now counts as a fresh failure.
    pub fn observe_retry(&mut self, loading: bool, now: f32) -> bool {
        let Some(pending) = self.pending_retry.as_mut() else {
            return true;
        };
        let since = *pending.since.get_or_insert(now);
        if loading {
            pending.seen_loading = true;
            return false;
        }
        if pending.seen_loading || now - since >= RETRY_GRACE_SECS {
            self.pending_retry = None;
            return true;
        }
        false
    }

    pub fn mark_ready(&mut self) {
        self.pending_retry = None;
        self.phase = FontPhase::Ready;
        self.revision = self.revision.wrapping_add(1);
    }

    pub fn is_ready(&self) -> bool {
        self.phase == FontPhase::Ready
    }
}

pub(crate) fn start_font_load(
    mut font: ResMut<GreetingFont>,
    cfg: Res<GameConfig>,
    asset_server: Option<Res<AssetServer>>,
) {
    if !cfg.greeting.enabled {
        return;
    }
    match asset_server {
        Some(server) => {
            font.handle = Some(server.load(cfg.greeting.font.clone()));
            font.phase = FontPhase::Loading;
            info!(target: "greeting", "loading font '{}'", cfg.greeting.font);
        }
        None => {
            font.source = FontSource::Fallback;
            font.handle = Some(Handle::default());
            font.phase = FontPhase::Loading;
        }
    }
}

pub(crate) fn poll_font_load(
    mut font: ResMut<GreetingFont>,
    fonts: Res<Assets<Font>>,
    cfg: Res<GameConfig>,
    asset_server: Option<Res<AssetServer>>,
    time: Res<Time<Real>>,
) {
    if font.phase != FontPhase::Loading {
        return;
    }
    let Some(handle) = font.handle.clone() else {
        return;
    };
    if fonts.contains(&handle) {
        font.mark_ready();
        info!(target: "greeting", "font ready ({:?})", font.source);
        return;
    }
    let failure = match font.source {
        FontSource::Configured => {
            let state = asset_server
                .as_ref()
                .and_then(|s| s.get_load_state(handle.id()));
            let loading = matches!(state, Some(LoadState::Loading));
            let fresh = font.observe_retry(loading, time.elapsed_secs());
            match state {
                Some(LoadState::Failed(err)) if fresh => Some(err.to_string()),
                _ => None,
            }
        }
        FontSource::Fallback => Some("embedded font is not registered".to_string()),
    };
    let Some(reason) = failure else {
        return;
    };
    let err = BalloonError::FontLoad {
        path: cfg.greeting.font.clone(),
        reason,
    };
    recover_from_font_error(&mut font, &err, &cfg, asset_server.as_deref());
}

/// Shared by load failures and parse failures.
pub(crate) fn recover_from_font_error(
    font: &mut GreetingFont,
    err: &BalloonError,
    cfg: &GameConfig,
    asset_server: Option<&AssetServer>,
) {
    match font.on_failure(cfg.greeting.font_retry_attempts) {
        FailureAction::Retry => {
            warn!(target: "greeting", "{err}; retry {}/{}", font.retries, cfg.greeting.font_retry_attempts);
            if let Some(server) = asset_server {
                server.reload(cfg.greeting.font.clone());
            }
            font.phase = FontPhase::Loading;
        }
        FailureAction::Fallback => {
            warn!(target: "greeting", "{err}; falling back to the embedded font");
        }
        FailureAction::GiveUp => {
            warn!(target: "greeting", "{err}; greeting text disabled");
        }
    }
}
