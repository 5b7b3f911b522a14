use bevy::prelude::*;

use super::registry::{BalloonRegistry, BalloonSlot};
use super::spawn::{
    initial_position, respawn_position, spawn_balloon_body, spawn_new_balloon, BalloonAssets,
    BalloonBlueprint,
};
use crate::core::components::{Balloon, BalloonHue};
use crate::core::config::GameConfig;
use crate::core::viewport::Viewport;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PopCause {
    /// Floated into the top margin; always followed by a respawn.
    ReachedTop,
    /// Hit by a pointer press.
    Clicked,
}

/// Ask for the balloon in `slot` to pop. Requests for empty slots are ignored and
/// a slot pops at most once per frame no matter how many requests name it.
#[derive(Event, Debug, Clone, Copy)]
pub struct PopRequest {
    pub slot: BalloonSlot,
    pub cause: PopCause,
}

/// A body was removed from the world. Effects (particles, sound) listen for this.
#[derive(Event, Debug, Clone, Copy)]
pub struct BalloonPopped {
    pub slot: BalloonSlot,
    pub body: Entity,
    pub position: Vec2,
    pub hue: f32,
    pub cause: PopCause,
}

/// Create a balloon in a new slot at a world position.
#[derive(Event, Debug, Clone, Copy)]
pub struct SpawnBalloonRequest {
    pub position: Vec2,
}

#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct PopStats {
    pub reached_top: u32,
    pub clicked: u32,
    pub respawned: u32,
}

/// Releases the startup batch one balloon per `interval` seconds.
#[derive(Resource, Debug, Clone)]
pub struct StartupStagger {
    total: usize,
    interval: f32,
    released: usize,
    elapsed: f32,
}

impl StartupStagger {
    pub fn new(total: usize, interval_secs: f32) -> Self {
        Self {
            total,
            interval: interval_secs.max(0.0),
            released: 0,
            elapsed: 0.0,
        }
    }

    /// Advance the clock; returns the indices whose release time (`index * interval`) has passed.
    pub fn advance(&mut self, dt: f32) -> std::ops::Range<usize> {
        self.elapsed += dt.max(0.0);
        let due = if self.interval <= 0.0 {
            self.total
        } else {
            ((self.elapsed / self.interval).floor() as usize)
                .saturating_add(1)
                .min(self.total)
        };
        let start = self.released;
        self.released = due.max(start);
        start..self.released
    }

    pub fn released(&self) -> usize {
        self.released
    }

    pub fn is_finished(&self) -> bool {
        self.released >= self.total
    }
}

impl FromWorld for StartupStagger {
    fn from_world(world: &mut World) -> Self {
        let cfg = world.get_resource::<GameConfig>().cloned().unwrap_or_default();
        StartupStagger::new(cfg.balloons.initial_count, cfg.balloons.stagger_ms / 1000.0)
    }
}

#[inline]
pub fn reached_top(y: f32, viewport: &Viewport, margin: f32) -> bool {
    y > viewport.top() - margin
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn release_startup_balloons(
    mut commands: Commands,
    time: Res<Time>,
    mut stagger: ResMut<StartupStagger>,
    mut registry: ResMut<BalloonRegistry>,
    assets: Res<BalloonAssets>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    viewport: Res<Viewport>,
    cfg: Res<GameConfig>,
) {
    if stagger.is_finished() {
        return;
    }
    let due = stagger.advance(time.delta_secs());
    if due.is_empty() {
        return;
    }
    let mut rng = rand::thread_rng();
    for index in due {
        let position = initial_position(index, &viewport, &cfg.balloons);
        let slot = spawn_new_balloon(
            &mut commands,
            &mut registry,
            &assets,
            &mut materials,
            &cfg,
            position,
            &mut rng,
        );
        debug!(target: "balloons", "startup balloon {index} -> slot {}", slot.0);
    }
    if stagger.is_finished() {
        info!(target: "balloons", "startup batch complete: {} balloons", stagger.released());
    }
}

pub(crate) fn spawn_requested_balloons(
    mut commands: Commands,
    mut requests: EventReader<SpawnBalloonRequest>,
    mut registry: ResMut<BalloonRegistry>,
    assets: Res<BalloonAssets>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    cfg: Res<GameConfig>,
) {
    let mut rng = rand::thread_rng();
    for req in requests.read() {
        let slot = spawn_new_balloon(
            &mut commands,
            &mut registry,
            &assets,
            &mut materials,
            &cfg,
            req.position,
            &mut rng,
        );
        debug!(target: "balloons", "pointer balloon at ({:.0},{:.0}) -> slot {}", req.position.x, req.position.y, slot.0);
    }
}

/// Runs after every physics step; reads the *current* body of each slot.
pub(crate) fn check_top_boundary(
    registry: Res<BalloonRegistry>,
    viewport: Res<Viewport>,
    cfg: Res<GameConfig>,
    bodies: Query<&Transform, With<Balloon>>,
    mut requests: EventWriter<PopRequest>,
) {
    let margin = cfg.balloons.top_pop_margin;
    for (slot, body) in registry.live_bodies() {
        let Ok(tf) = bodies.get(body) else {
            continue;
        };
        if reached_top(tf.translation.y, &viewport, margin) {
            requests.write(PopRequest {
                slot,
                cause: PopCause::ReachedTop,
            });
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn process_pop_requests(
    mut commands: Commands,
    mut requests: EventReader<PopRequest>,
    mut registry: ResMut<BalloonRegistry>,
    bodies: Query<(&Transform, &BalloonHue), With<Balloon>>,
    assets: Res<BalloonAssets>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    viewport: Res<Viewport>,
    cfg: Res<GameConfig>,
    mut popped: EventWriter<BalloonPopped>,
    mut stats: ResMut<PopStats>,
) {
    let mut handled: Vec<BalloonSlot> = Vec::new();
    let mut rng = rand::thread_rng();
    for req in requests.read() {
        if handled.contains(&req.slot) {
            continue;
        }
        let Some(body) = registry.body(req.slot) else {
            continue;
        };
        handled.push(req.slot);

        match bodies.get(body) {
            Ok((tf, hue)) => {
                commands.entity(body).despawn();
                popped.write(BalloonPopped {
                    slot: req.slot,
                    body,
                    position: tf.translation.truncate(),
                    hue: hue.0,
                    cause: req.cause,
                });
            }
            Err(_) => {
                warn!(target: "balloons", "slot {} referenced missing body {body:?}; dropping it", req.slot.0);
            }
        }

        let respawn = match req.cause {
            PopCause::ReachedTop => {
                stats.reached_top += 1;
                true
            }
            PopCause::Clicked => {
                stats.clicked += 1;
                cfg.interactions.respawn_after_click_pop
            }
        };
        if respawn {
            let position =
                respawn_position(&viewport, &cfg.balloons, cfg.boundaries.thickness, &mut rng);
            let blueprint = BalloonBlueprint::roll(position, &cfg.balloons, &mut rng);
            let new_body =
                spawn_balloon_body(&mut commands, &assets, &mut materials, &cfg, req.slot, &blueprint);
            registry.replace_body(req.slot, new_body, blueprint.hue, blueprint.velocity);
            stats.respawned += 1;
        } else {
            registry.clear_body(req.slot);
        }
    }
}
