use std::time::Duration;

use balloon_party::core::components::Balloon;
use balloon_party::core::config::GameConfig;
use balloon_party::core::viewport::Viewport;
use balloon_party::gameplay::balloons::spawn::initial_position;
use balloon_party::gameplay::balloons::{
    BalloonRegistry, BalloonSlot, BalloonsPlugin, PopCause, PopRequest, PopStats,
};
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

fn test_app(modify: impl FnOnce(&mut GameConfig)) -> App {
    let mut cfg = GameConfig::default();
    modify(&mut cfg);
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(50)));
    app.insert_resource(cfg);
    app.insert_resource(Viewport::new(1020.0, 600.0));
    app.init_resource::<Assets<Mesh>>();
    app.init_resource::<Assets<ColorMaterial>>();
    // No physics plugin: bodies stay where they are put.
    app.add_plugins(BalloonsPlugin);
    app
}

fn run(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}

fn balloon_count(app: &mut App) -> usize {
    let world = app.world_mut();
    world.query::<&Balloon>().iter(world).count()
}

fn body_of(app: &App, slot: usize) -> Option<Entity> {
    app.world().resource::<BalloonRegistry>().body(BalloonSlot(slot))
}

fn move_body(app: &mut App, body: Entity, y: f32) {
    let mut tf = app
        .world_mut()
        .get_mut::<Transform>(body)
        .expect("body has a transform");
    tf.translation.y = y;
}

#[test]
fn startup_batch_is_staggered_and_complete() {
    let mut app = test_app(|_| {});
    run(&mut app, 3);
    let early = app.world().resource::<BalloonRegistry>().len();
    assert!(early >= 1 && early < 15, "expected a partial batch, got {early}");

    // 15 balloons at 200 ms each needs ~2.8 s; 50 ms frames
    run(&mut app, 80);
    assert_eq!(app.world().resource::<BalloonRegistry>().len(), 15);
    assert_eq!(balloon_count(&mut app), 15);

    let vp = *app.world().resource::<Viewport>();
    let cfg = app.world().resource::<GameConfig>().balloons.clone();
    for i in 0..15 {
        let body = body_of(&app, i).expect("slot filled");
        let pos = app.world().get::<Transform>(body).unwrap().translation.truncate();
        let expected = initial_position(i, &vp, &cfg);
        assert!((pos - expected).length() < 1e-3, "slot {i} at {pos:?}, expected {expected:?}");
    }
}

#[test]
fn reaching_top_pops_once_and_respawns_in_same_slot() {
    let mut app = test_app(|c| c.balloons.initial_count = 1);
    run(&mut app, 2);
    let old = body_of(&app, 0).expect("first balloon");

    // 600 px tall viewport: top is +300, margin 100 -> threshold 200
    move_body(&mut app, old, 250.0);
    app.update();

    let new = body_of(&app, 0).expect("respawned");
    assert_ne!(old, new);
    assert!(app.world().get_entity(old).is_err(), "popped body must be despawned");
    assert_eq!(app.world().resource::<BalloonRegistry>().len(), 1);
    assert_eq!(balloon_count(&mut app), 1);
    assert_eq!(app.world().resource::<PopStats>().reached_top, 1);
    let record = app.world().resource::<BalloonRegistry>().get(BalloonSlot(0)).cloned().unwrap();
    assert_eq!(record.generation, 2);

    // respawned near the bottom, so nothing else pops
    let y = app.world().get::<Transform>(new).unwrap().translation.y;
    assert!(y < 0.0);
    run(&mut app, 10);
    assert_eq!(app.world().resource::<PopStats>().reached_top, 1);
    assert_eq!(body_of(&app, 0), Some(new));
}

#[test]
fn duplicate_requests_pop_a_slot_once_per_frame() {
    let mut app = test_app(|c| c.balloons.initial_count = 1);
    run(&mut app, 2);
    {
        let mut events = app.world_mut().resource_mut::<Events<PopRequest>>();
        for _ in 0..3 {
            events.send(PopRequest {
                slot: BalloonSlot(0),
                cause: PopCause::Clicked,
            });
        }
    }
    app.update();
    let stats = *app.world().resource::<PopStats>();
    assert_eq!(stats.clicked, 1);
    assert_eq!(stats.respawned, 1);
    assert_eq!(balloon_count(&mut app), 1);
}

#[test]
fn click_pop_without_respawn_leaves_slot_empty() {
    let mut app = test_app(|c| {
        c.balloons.initial_count = 1;
        c.interactions.respawn_after_click_pop = false;
    });
    run(&mut app, 2);
    app.world_mut()
        .resource_mut::<Events<PopRequest>>()
        .send(PopRequest {
            slot: BalloonSlot(0),
            cause: PopCause::Clicked,
        });
    app.update();
    assert_eq!(body_of(&app, 0), None);
    assert_eq!(balloon_count(&mut app), 0);
    assert_eq!(app.world().resource::<BalloonRegistry>().len(), 1);

    // popping an empty slot is a no-op
    app.world_mut()
        .resource_mut::<Events<PopRequest>>()
        .send(PopRequest {
            slot: BalloonSlot(0),
            cause: PopCause::Clicked,
        });
    app.update();
    assert_eq!(app.world().resource::<PopStats>().clicked, 1);
}
