#[cfg(feature = "debug")]
use super::modes::DebugState;
#[cfg(feature = "debug")]
use bevy::prelude::*;
#[cfg(feature = "debug")]
use bevy_rapier2d::render::DebugRenderContext;

/// F1 toggles the collider wireframe, F2 the periodic stats log.
#[cfg(feature = "debug")]
pub fn debug_key_input_system(keys: Option<Res<ButtonInput<KeyCode>>>, mut state: ResMut<DebugState>) {
    let Some(keys) = keys else {
        return;
    };
    if keys.just_pressed(KeyCode::F1) {
        state.wireframe = !state.wireframe;
        info!(target: "debug", "rapier wireframe {}", if state.wireframe { "on" } else { "off" });
    }
    if keys.just_pressed(KeyCode::F2) {
        state.logging = !state.logging;
    }
}

#[cfg(feature = "debug")]
pub fn sync_rapier_wireframe_system(
    state: Res<DebugState>,
    ctx: Option<ResMut<DebugRenderContext>>,
) {
    if !state.is_changed() {
        return;
    }
    if let Some(mut ctx) = ctx {
        ctx.enabled = state.wireframe;
    }
}

#[cfg(all(test, feature = "debug"))]
mod tests {
    use super::*;
    use crate::core::config::GameConfig;

    fn test_app(cfg: GameConfig) -> App {
        let mut app = App::new();
        app.insert_resource(cfg);
        app.init_resource::<ButtonInput<KeyCode>>();
        app.insert_resource(DebugRenderContext::default());
        app.init_resource::<DebugState>();
        app.add_systems(
            Update,
            (debug_key_input_system, sync_rapier_wireframe_system).chain(),
        );
        app
    }

    fn tap(app: &mut App, key: KeyCode) {
        app.world_mut().resource_mut::<ButtonInput<KeyCode>>().press(key);
        app.update();
        let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
        keys.release(key);
        keys.clear();
    }

    #[test]
    fn quiet_by_default() {
        let mut app = test_app(GameConfig::default());
        app.update();
        let state = app.world().resource::<DebugState>();
        assert!(!state.logging);
        assert!(!state.wireframe);
        assert!(!app.world().resource::<DebugRenderContext>().enabled);
    }

    #[test]
    fn stats_log_follows_config_and_f2() {
        let mut cfg = GameConfig::default();
        cfg.debug.stats_log = true;
        let mut app = test_app(cfg);
        app.update();
        assert!(app.world().resource::<DebugState>().logging);
        tap(&mut app, KeyCode::F2);
        assert!(!app.world().resource::<DebugState>().logging);
    }

    #[test]
    fn f1_toggles_rapier_wireframe() {
        let mut app = test_app(GameConfig::default());
        app.update();
        tap(&mut app, KeyCode::F1);
        assert!(app.world().resource::<DebugState>().wireframe);
        assert!(app.world().resource::<DebugRenderContext>().enabled);
        tap(&mut app, KeyCode::F1);
        assert!(!app.world().resource::<DebugRenderContext>().enabled);
    }
}
