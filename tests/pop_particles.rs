use std::time::Duration;

use balloon_party::core::config::GameConfig;
use balloon_party::core::viewport::Viewport;
use balloon_party::effects::{ParticlesPlugin, PopParticle};
use balloon_party::gameplay::balloons::{
    BalloonSlot, BalloonsPlugin, PopCause, PopRequest, SpawnBalloonRequest,
};
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

fn test_app() -> App {
    let mut cfg = GameConfig::default();
    cfg.balloons.initial_count = 0;
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(50)));
    app.insert_resource(cfg);
    app.insert_resource(Viewport::new(800.0, 600.0));
    app.init_resource::<Assets<Mesh>>();
    app.init_resource::<Assets<ColorMaterial>>();
    app.add_plugins((BalloonsPlugin, ParticlesPlugin));
    app
}

fn particle_count(app: &mut App) -> usize {
    let world = app.world_mut();
    world.query::<&PopParticle>().iter(world).count()
}

fn spawn_at(app: &mut App, x: f32, y: f32) {
    app.world_mut()
        .resource_mut::<Events<SpawnBalloonRequest>>()
        .send(SpawnBalloonRequest {
            position: Vec2::new(x, y),
        });
}

fn pop(app: &mut App, slot: usize) {
    app.world_mut()
        .resource_mut::<Events<PopRequest>>()
        .send(PopRequest {
            slot: BalloonSlot(slot),
            cause: PopCause::Clicked,
        });
}

#[test]
fn each_pop_bursts_thirty_particles_that_expire() {
    let mut app = test_app();
    spawn_at(&mut app, -100.0, 0.0);
    spawn_at(&mut app, 100.0, 0.0);
    app.update();
    assert_eq!(particle_count(&mut app), 0);

    pop(&mut app, 0);
    app.update();
    assert_eq!(particle_count(&mut app), 30);

    pop(&mut app, 1);
    app.update();
    assert_eq!(particle_count(&mut app), 60);

    // 1.5 s tween at 50 ms per frame, plus slack
    for _ in 0..40 {
        app.update();
    }
    assert_eq!(particle_count(&mut app), 0);
    assert!(app.world().resource::<Assets<ColorMaterial>>().len() <= 2 + 2);
}

#[test]
fn particles_start_at_pop_position_and_spread_within_range() {
    let mut app = test_app();
    spawn_at(&mut app, 40.0, -20.0);
    app.update();
    pop(&mut app, 0);
    app.update();

    let world = app.world_mut();
    let particles: Vec<PopParticle> = world.query::<&PopParticle>().iter(world).cloned().collect();
    assert_eq!(particles.len(), 30);
    for p in particles {
        assert_eq!(p.origin, Vec2::new(40.0, -20.0));
        assert!(p.offset.x.abs() <= 100.0 && p.offset.y.abs() <= 100.0);
        assert!((1.5 - p.duration).abs() < 1e-6);
    }
}
