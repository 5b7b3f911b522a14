//! Central system ordering labels to make update sequence explicit.
//! Stages (high-level):
//! 1. PrePhysics (`Update`): pointer handling, manual position overrides for dragged bodies
//! 2. Rapier (`PostUpdate`, handled by plugin)
//! 3. PostPhysics (`PostUpdate`, after Rapier writeback): top-boundary check, pop + respawn
//! 4. Effects (`PostUpdate`, after PostPhysics): particles & sound react to pops
use bevy::prelude::*;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct PrePhysicsSet;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct PostPhysicsSet;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct PopEffectsSet;
