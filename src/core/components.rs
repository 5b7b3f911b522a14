use bevy::prelude::*;

use crate::gameplay::balloons::registry::BalloonSlot;

/// Physics body of a balloon. `slot` points back into `BalloonRegistry`.
#[derive(Component, Debug, Clone, Copy)]
pub struct Balloon {
    pub slot: BalloonSlot,
}

/// Collider radius (px).
#[derive(Component, Debug, Deref, DerefMut, Copy, Clone)]
pub struct BalloonRadius(pub f32);

/// Hue in degrees (0..360) used for the balloon fill.
#[derive(Component, Debug, Deref, Copy, Clone)]
pub struct BalloonHue(pub f32);

/// Tag component for the circle mesh child that draws a balloon.
#[derive(Component)]
pub struct BalloonVisual;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoundarySide {
    Top,
    Bottom,
    Left,
    Right,
}

/// Static wall keeping balloons on screen. Rebuilt on every resize.
#[derive(Component, Debug, Clone, Copy)]
pub struct Boundary {
    pub side: BoundarySide,
}
