use balloon_party::core::config::GameConfig;
use balloon_party::core::viewport::Viewport;
use balloon_party::rendering::greeting::{FontSource, GreetingFont, GreetingPlugin, GreetingText};
use bevy::prelude::*;

const FONT: &[u8] = include_bytes!("../assets/fonts/FiraMono-Medium.ttf");

/// No asset server, so the greeting goes straight to the embedded-font slot,
/// which is filled here with a real font.
fn test_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.insert_resource(GameConfig::default());
    app.insert_resource(Viewport::new(800.0, 600.0));
    app.init_resource::<Assets<Font>>();
    app.init_resource::<Assets<Mesh>>();
    app.init_resource::<Assets<StandardMaterial>>();
    let font = Font::try_from_bytes(FONT.to_vec()).expect("fixture font parses");
    let _ = app
        .world_mut()
        .resource_mut::<Assets<Font>>()
        .insert(Handle::<Font>::default().id(), font);
    app.add_plugins(GreetingPlugin);
    app
}

fn texts(app: &mut App) -> Vec<(Entity, f32, Handle<Mesh>)> {
    let world = app.world_mut();
    world
        .query::<(Entity, &GreetingText, &Mesh3d)>()
        .iter(world)
        .map(|(e, t, m)| (e, t.width, m.0.clone()))
        .collect()
}

#[test]
fn text_is_built_once_font_is_ready() {
    let mut app = test_app();
    app.update();
    app.update();
    let font = app.world().resource::<GreetingFont>();
    assert!(font.is_ready());
    assert_eq!(font.source, FontSource::Fallback);

    let built = texts(&mut app);
    assert_eq!(built.len(), 1);
    assert!(built[0].1 > 0.0);

    // Nothing changed, nothing rebuilt.
    app.update();
    assert_eq!(texts(&mut app)[0].0, built[0].0);
}

#[test]
fn resize_replaces_text_mesh() {
    let mut app = test_app();
    app.update();
    app.update();
    let before = texts(&mut app);
    assert_eq!(before.len(), 1);
    let (old_entity, old_width, old_mesh) = before[0].clone();

    app.insert_resource(Viewport::new(400.0, 300.0));
    app.update();

    let after = texts(&mut app);
    assert_eq!(after.len(), 1, "exactly one greeting after resize");
    assert_ne!(after[0].0, old_entity);
    assert!(app.world().get_entity(old_entity).is_err());
    assert!(app.world().resource::<Assets<Mesh>>().get(&old_mesh).is_none());
    // Text size follows the smaller viewport side: 600 -> 300.
    assert!((after[0].1 - old_width * 0.5).abs() < old_width * 0.01);
}

#[test]
fn text_is_centred_horizontally() {
    let mut app = test_app();
    app.update();
    app.update();
    let world = app.world_mut();
    let (text, tf) = world
        .query::<(&GreetingText, &Transform)>()
        .single(world)
        .expect("one greeting");
    assert!((tf.translation.x + text.width * 0.5).abs() < 1e-6);
}
