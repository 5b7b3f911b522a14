//! Four static walls along the viewport edges. The whole set is thrown away and
//! rebuilt whenever the viewport changes size.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::core::components::{Boundary, BoundarySide};
use crate::core::config::GameConfig;
use crate::core::system::system_order::PrePhysicsSet;
use crate::core::viewport::Viewport;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryRect {
    pub side: BoundarySide,
    pub center: Vec2,
    pub half_extents: Vec2,
}

/// Wall rectangles centred on each viewport edge, `thickness` wide, spanning the full edge.
pub fn boundary_layout(viewport: &Viewport, thickness: f32) -> [BoundaryRect; 4] {
    let half = viewport.half();
    let t = thickness.max(1.0) * 0.5;
    [
        BoundaryRect {
            side: BoundarySide::Top,
            center: Vec2::new(0.0, half.y),
            half_extents: Vec2::new(half.x, t),
        },
        BoundaryRect {
            side: BoundarySide::Bottom,
            center: Vec2::new(0.0, -half.y),
            half_extents: Vec2::new(half.x, t),
        },
        BoundaryRect {
            side: BoundarySide::Left,
            center: Vec2::new(-half.x, 0.0),
            half_extents: Vec2::new(t, half.y),
        },
        BoundaryRect {
            side: BoundarySide::Right,
            center: Vec2::new(half.x, 0.0),
            half_extents: Vec2::new(t, half.y),
        },
    ]
}

/// Entities of the current wall set.
#[derive(Resource, Debug, Default)]
pub struct Boundaries {
    pub entities: Vec<Entity>,
    pub built_for: Option<Viewport>,
}

pub struct BoundariesPlugin;

impl Plugin for BoundariesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Boundaries>()
            .add_systems(Update, rebuild_boundaries.before(PrePhysicsSet));
    }
}

fn rebuild_boundaries(
    mut commands: Commands,
    viewport: Res<Viewport>,
    cfg: Res<GameConfig>,
    mut boundaries: ResMut<Boundaries>,
    stale: Query<Entity, With<Boundary>>,
) {
    if boundaries.built_for == Some(*viewport) {
        return;
    }
    for e in stale.iter() {
        commands.entity(e).despawn();
    }
    boundaries.entities.clear();
    for rect in boundary_layout(&viewport, cfg.boundaries.thickness) {
        let e = commands
            .spawn((
                Name::new(format!("Boundary:{:?}", rect.side)),
                Boundary { side: rect.side },
                RigidBody::Fixed,
                Collider::cuboid(rect.half_extents.x, rect.half_extents.y),
                Transform::from_translation(rect.center.extend(0.0)),
            ))
            .id();
        boundaries.entities.push(e);
    }
    boundaries.built_for = Some(*viewport);
    info!(target: "physics", "boundaries rebuilt for {}x{}", viewport.width, viewport.height);
}
