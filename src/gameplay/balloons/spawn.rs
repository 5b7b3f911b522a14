use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use rand::Rng;

use crate::core::components::{Balloon, BalloonHue, BalloonRadius, BalloonVisual};
use crate::core::config::{BalloonConfig, GameConfig};
use crate::core::viewport::Viewport;
use crate::gameplay::balloons::registry::{BalloonRegistry, BalloonSlot};

/// Shared unit circle for every balloon visual (scaled per balloon).
#[derive(Resource, Debug, Clone)]
pub struct BalloonAssets {
    pub circle: Handle<Mesh>,
}

impl FromWorld for BalloonAssets {
    fn from_world(world: &mut World) -> Self {
        let mut meshes = world.resource_mut::<Assets<Mesh>>();
        Self {
            circle: meshes.add(Mesh::from(Circle { radius: 0.5 })),
        }
    }
}

/// Everything random about a balloon, rolled before any entity exists.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BalloonBlueprint {
    pub position: Vec2,
    pub radius: f32,
    pub hue: f32,
    pub velocity: Vec2,
}

impl BalloonBlueprint {
    pub fn roll(position: Vec2, cfg: &BalloonConfig, rng: &mut impl Rng) -> Self {
        Self {
            position,
            radius: cfg.radius,
            hue: rng.gen_range(0.0..360.0),
            velocity: Vec2::new(cfg.vel_x_range.sample(rng), cfg.vel_y_range.sample(rng)),
        }
    }

    pub fn color(&self, cfg: &BalloonConfig) -> Color {
        Color::hsl(self.hue, cfg.saturation, cfg.lightness)
    }
}

/// World position of the `index`-th startup balloon: spread from the left edge,
/// `initial_height_offset` above the bottom.
pub fn initial_position(index: usize, viewport: &Viewport, cfg: &BalloonConfig) -> Vec2 {
    let divisor = cfg.spread_divisor.max(1.0);
    let page = Vec2::new(
        (index as f32 + 1.0) * (viewport.width / divisor),
        viewport.height - cfg.initial_height_offset,
    );
    viewport.page_to_world(page)
}

/// Random x along the bottom edge, lifted just clear of the bottom wall.
pub fn respawn_position(
    viewport: &Viewport,
    cfg: &BalloonConfig,
    wall_thickness: f32,
    rng: &mut impl Rng,
) -> Vec2 {
    let inset = cfg.radius + wall_thickness * 0.5;
    let half = viewport.half();
    let max_x = (half.x - inset).max(0.0);
    let x = if max_x > 0.0 {
        rng.gen_range(-max_x..max_x)
    } else {
        0.0
    };
    Vec2::new(x, viewport.bottom() + inset)
}

/// Spawn the physics body (+ visual child) described by `blueprint` for `slot`.
pub fn spawn_balloon_body(
    commands: &mut Commands,
    assets: &BalloonAssets,
    materials: &mut Assets<ColorMaterial>,
    cfg: &GameConfig,
    slot: BalloonSlot,
    blueprint: &BalloonBlueprint,
) -> Entity {
    let material = materials.add(blueprint.color(&cfg.balloons));
    let radius = blueprint.radius;
    commands
        .spawn((
            Name::new(format!("Balloon:{}", slot.0)),
            Balloon { slot },
            BalloonRadius(radius),
            BalloonHue(blueprint.hue),
            Transform::from_translation(blueprint.position.extend(10.0)),
            Visibility::Visible,
            RigidBody::Dynamic,
            Collider::ball(radius),
            Velocity::linear(blueprint.velocity),
            Restitution::coefficient(cfg.physics.restitution),
            Damping {
                linear_damping: 0.0,
                angular_damping: 0.0,
            },
        ))
        .with_children(|parent| {
            parent.spawn((
                BalloonVisual,
                Mesh2d(assets.circle.clone()),
                MeshMaterial2d(material),
                Transform::from_scale(Vec3::splat(radius * 2.0)),
            ));
        })
        .id()
}

/// Roll, spawn and register a balloon in a brand-new slot.
pub fn spawn_new_balloon(
    commands: &mut Commands,
    registry: &mut BalloonRegistry,
    assets: &BalloonAssets,
    materials: &mut Assets<ColorMaterial>,
    cfg: &GameConfig,
    position: Vec2,
    rng: &mut impl Rng,
) -> BalloonSlot {
    let blueprint = BalloonBlueprint::roll(position, &cfg.balloons, rng);
    let slot = registry.next_slot();
    let body = spawn_balloon_body(commands, assets, materials, cfg, slot, &blueprint);
    registry.insert(body, blueprint.hue, blueprint.velocity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blueprint_respects_config_ranges() {
        let cfg = BalloonConfig::default();
        let mut rng = rand::thread_rng();
        for _ in 0..200 {
            let bp = BalloonBlueprint::roll(Vec2::ZERO, &cfg, &mut rng);
            assert!((0.0..360.0).contains(&bp.hue));
            assert!(bp.velocity.x >= cfg.vel_x_range.min && bp.velocity.x < cfg.vel_x_range.max);
            // upward bias only (y-up world)
            assert!(bp.velocity.y >= 0.0 && bp.velocity.y < cfg.vel_y_range.max);
            assert_eq!(bp.radius, cfg.radius);
        }
    }

    #[test]
    fn initial_positions_spread_left_to_right_near_bottom() {
        let vp = Viewport::new(1020.0, 600.0);
        let cfg = BalloonConfig::default();
        let first = initial_position(0, &vp, &cfg);
        let second = initial_position(1, &vp, &cfg);
        // (i + 1) * (1020 / 51) = 20px from the left edge for the first balloon
        assert!((first.x - (-510.0 + 20.0)).abs() < 1e-4);
        assert!((second.x - first.x - 20.0).abs() < 1e-4);
        assert!((first.y - (-300.0 + 100.0)).abs() < 1e-4);
    }

    #[test]
    fn respawn_position_stays_inside_walls() {
        let vp = Viewport::new(400.0, 300.0);
        let cfg = BalloonConfig::default();
        let mut rng = rand::thread_rng();
        for _ in 0..200 {
            let p = respawn_position(&vp, &cfg, 20.0, &mut rng);
            assert!(p.x.abs() <= 200.0 - 40.0);
            assert!((p.y - (-150.0 + 40.0)).abs() < 1e-4);
        }
    }

    #[test]
    fn respawn_position_on_tiny_viewport_is_centered() {
        let vp = Viewport::new(50.0, 300.0);
        let cfg = BalloonConfig::default();
        let p = respawn_position(&vp, &cfg, 20.0, &mut rand::thread_rng());
        assert_eq!(p.x, 0.0);
    }
}
