//! Balloon population: registry, spawning, the top-boundary check and pop/respawn.

pub mod lifecycle;
pub mod registry;
pub mod spawn;

use bevy::prelude::*;
use bevy_rapier2d::prelude::PhysicsSet;

use crate::core::system::system_order::{PopEffectsSet, PostPhysicsSet, PrePhysicsSet};
use lifecycle::{
    check_top_boundary, process_pop_requests, release_startup_balloons, spawn_requested_balloons,
};

pub use lifecycle::{
    BalloonPopped, PopCause, PopRequest, PopStats, SpawnBalloonRequest, StartupStagger,
};
pub use registry::{BalloonRecord, BalloonRegistry, BalloonSlot};
pub use spawn::{BalloonAssets, BalloonBlueprint};

pub struct BalloonsPlugin;

impl Plugin for BalloonsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<BalloonRegistry>()
            .init_resource::<BalloonAssets>()
            .init_resource::<StartupStagger>()
            .init_resource::<PopStats>()
            .add_event::<PopRequest>()
            .add_event::<BalloonPopped>()
            .add_event::<SpawnBalloonRequest>()
            .configure_sets(
                PostUpdate,
                (
                    PostPhysicsSet.after(PhysicsSet::Writeback),
                    PopEffectsSet.after(PostPhysicsSet),
                ),
            )
            .add_systems(
                Update,
                (
                    release_startup_balloons,
                    spawn_requested_balloons.after(PrePhysicsSet),
                ),
            )
            .add_systems(
                PostUpdate,
                (check_top_boundary, process_pop_requests)
                    .chain()
                    .in_set(PostPhysicsSet),
            );
    }
}
