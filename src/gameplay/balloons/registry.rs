//! Balloon population. Each slot is a stable balloon identity; the physics body
//! behind it is swapped on every respawn while the slot index stays put.

use bevy::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BalloonSlot(pub usize);

#[derive(Debug, Clone, PartialEq)]
pub struct BalloonRecord {
    /// Current physics body; `None` once popped without respawn.
    pub body: Option<Entity>,
    pub hue: f32,
    pub spawn_velocity: Vec2,
    /// Number of bodies this slot has had (1 after the first spawn).
    pub generation: u32,
}

#[derive(Resource, Debug, Default)]
pub struct BalloonRegistry {
    records: Vec<BalloonRecord>,
}

impl BalloonRegistry {
    /// Slot the next `insert` will occupy.
    pub fn next_slot(&self) -> BalloonSlot {
        BalloonSlot(self.records.len())
    }

    pub fn insert(&mut self, body: Entity, hue: f32, spawn_velocity: Vec2) -> BalloonSlot {
        let slot = self.next_slot();
        self.records.push(BalloonRecord {
            body: Some(body),
            hue,
            spawn_velocity,
            generation: 1,
        });
        slot
    }

    pub fn get(&self, slot: BalloonSlot) -> Option<&BalloonRecord> {
        self.records.get(slot.0)
    }

    pub fn body(&self, slot: BalloonSlot) -> Option<Entity> {
        self.get(slot).and_then(|r| r.body)
    }

    /// Install a fresh body in an existing slot, returning the body it replaced.
    pub fn replace_body(
        &mut self,
        slot: BalloonSlot,
        body: Entity,
        hue: f32,
        spawn_velocity: Vec2,
    ) -> Option<Entity> {
        let record = self.records.get_mut(slot.0)?;
        record.hue = hue;
        record.spawn_velocity = spawn_velocity;
        record.generation += 1;
        record.body.replace(body)
    }

    /// Detach the body from its slot (pop without respawn).
    pub fn clear_body(&mut self, slot: BalloonSlot) -> Option<Entity> {
        self.records.get_mut(slot.0)?.body.take()
    }

    pub fn slot_of(&self, body: Entity) -> Option<BalloonSlot> {
        self.records
            .iter()
            .position(|r| r.body == Some(body))
            .map(BalloonSlot)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BalloonSlot, &BalloonRecord)> {
        self.records
            .iter()
            .enumerate()
            .map(|(i, r)| (BalloonSlot(i), r))
    }

    /// Every slot that currently owns a body.
    pub fn live_bodies(&self) -> impl Iterator<Item = (BalloonSlot, Entity)> + '_ {
        self.iter().filter_map(|(s, r)| r.body.map(|b| (s, b)))
    }
}
