use balloon_party::core::config::GameConfig;
use balloon_party::core::viewport::Viewport;
use balloon_party::rendering::greeting::{FontPhase, FontSource, GreetingFont, GreetingPlugin, GreetingText};
use bevy::prelude::*;

fn test_app(enabled: bool) -> App {
    let mut cfg = GameConfig::default();
    cfg.greeting.enabled = enabled;
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.insert_resource(cfg);
    app.insert_resource(Viewport::new(800.0, 600.0));
    app.init_resource::<Assets<Font>>();
    app.init_resource::<Assets<Mesh>>();
    app.init_resource::<Assets<StandardMaterial>>();
    // No asset server and no embedded font registered.
    app.add_plugins(GreetingPlugin);
    app
}

fn text_count(app: &mut App) -> usize {
    let world = app.world_mut();
    world.query::<&GreetingText>().iter(world).count()
}

#[test]
fn unusable_fonts_leave_scene_textless() {
    let mut app = test_app(true);
    for _ in 0..5 {
        app.update();
    }
    let font = app.world().resource::<GreetingFont>();
    assert_eq!(font.source, FontSource::Fallback);
    assert_eq!(font.phase, FontPhase::Failed);
    assert_eq!(text_count(&mut app), 0);
}

#[test]
fn disabled_greeting_never_loads() {
    let mut app = test_app(false);
    for _ in 0..3 {
        app.update();
    }
    assert_eq!(app.world().resource::<GreetingFont>().phase, FontPhase::Idle);
    assert_eq!(text_count(&mut app), 0);
}
