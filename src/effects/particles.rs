use bevy::prelude::*;
use bevy::sprite::AlphaMode2d;
use rand::Rng;

use crate::core::config::{GameConfig, ParticleConfig};
use crate::core::system::system_order::PopEffectsSet;
use crate::gameplay::balloons::BalloonPopped;

/// Unit circle shared by every particle.
#[derive(Resource, Debug, Clone)]
pub struct ParticleAssets {
    pub dot: Handle<Mesh>,
}

impl FromWorld for ParticleAssets {
    fn from_world(world: &mut World) -> Self {
        let mut meshes = world.resource_mut::<Assets<Mesh>>();
        Self {
            dot: meshes.add(Mesh::from(Circle { radius: 0.5 })),
        }
    }
}

/// One fragment of a pop burst. Moves from `origin` to `origin + offset`,
/// fades out and scales from 1 to `end_scale` over `duration`, then despawns.
#[derive(Component, Debug, Clone)]
pub struct PopParticle {
    pub elapsed: f32,
    pub duration: f32,
    pub origin: Vec2,
    pub offset: Vec2,
    pub end_scale: f32,
    pub size: f32,
}

impl PopParticle {
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }

    /// Eased position, opacity and scale at the current progress.
    pub fn sample(&self) -> (Vec2, f32, f32) {
        let k = ease_out_quad(self.progress());
        let pos = self.origin + self.offset * k;
        let alpha = 1.0 - k;
        let scale = self.size * (1.0 + (self.end_scale - 1.0) * k);
        (pos, alpha, scale)
    }
}

/// Decelerating curve, fast at the start and settling at the end.
#[inline]
pub fn ease_out_quad(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Roll the tweens for one burst at `origin`.
pub fn roll_burst(origin: Vec2, cfg: &ParticleConfig, rng: &mut impl Rng) -> Vec<(PopParticle, f32)> {
    (0..cfg.count)
        .map(|_| {
            let offset = Vec2::new(
                rng.gen_range(-1.0..=1.0) * cfg.spread,
                rng.gen_range(-1.0..=1.0) * cfg.spread,
            );
            let hue = rng.gen_range(0.0..360.0);
            (
                PopParticle {
                    elapsed: 0.0,
                    duration: cfg.duration,
                    origin,
                    offset,
                    end_scale: cfg.scale_range.sample(rng),
                    size: cfg.size,
                },
                hue,
            )
        })
        .collect()
}

pub struct ParticlesPlugin;

impl Plugin for ParticlesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ParticleAssets>()
            .add_systems(PostUpdate, spawn_pop_bursts.in_set(PopEffectsSet))
            .add_systems(Update, animate_pop_particles);
    }
}

fn spawn_pop_bursts(
    mut commands: Commands,
    mut popped: EventReader<BalloonPopped>,
    assets: Res<ParticleAssets>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    cfg: Res<GameConfig>,
) {
    let mut rng = rand::thread_rng();
    for ev in popped.read() {
        let burst = roll_burst(ev.position, &cfg.particles, &mut rng);
        trace!(target: "effects", "burst of {} at ({:.0},{:.0})", burst.len(), ev.position.x, ev.position.y);
        for (particle, hue) in burst {
            let material = materials.add(ColorMaterial {
                color: Color::hsl(hue, cfg.balloons.saturation, cfg.balloons.lightness),
                alpha_mode: AlphaMode2d::Blend,
                ..default()
            });
            let (pos, _, scale) = particle.sample();
            commands.spawn((
                Name::new("PopParticle"),
                Mesh2d(assets.dot.clone()),
                MeshMaterial2d(material),
                Transform::from_translation(pos.extend(20.0)).with_scale(Vec3::splat(scale)),
                particle,
            ));
        }
    }
}

fn animate_pop_particles(
    mut commands: Commands,
    time: Res<Time>,
    mut q: Query<(
        Entity,
        &mut PopParticle,
        &mut Transform,
        &MeshMaterial2d<ColorMaterial>,
    )>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    let dt = time.delta_secs();
    for (e, mut particle, mut tf, mat) in q.iter_mut() {
        particle.elapsed += dt;
        if particle.is_finished() {
            materials.remove(&mat.0);
            commands.entity(e).despawn();
            continue;
        }
        let (pos, alpha, scale) = particle.sample();
        tf.translation.x = pos.x;
        tf.translation.y = pos.y;
        tf.scale = Vec3::splat(scale);
        if let Some(m) = materials.get_mut(&mat.0) {
            let c = m.color.to_srgba();
            m.color = Color::srgba(c.red, c.green, c.blue, alpha.clamp(0.0, 1.0));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ease_hits_endpoints() {
        assert_eq!(ease_out_quad(0.0), 0.0);
        assert_eq!(ease_out_quad(1.0), 1.0);
        assert!(ease_out_quad(0.5) > 0.5);
        assert_eq!(ease_out_quad(3.0), 1.0);
    }

    #[test]
    fn particle_ends_at_offset_transparent_and_rescaled() {
        let mut p = PopParticle {
            elapsed: 0.0,
            duration: 1.5,
            origin: Vec2::new(10.0, 10.0),
            offset: Vec2::new(50.0, -20.0),
            end_scale: 1.5,
            size: 5.0,
        };
        let (start, a0, s0) = p.sample();
        assert_eq!(start, Vec2::new(10.0, 10.0));
        assert_eq!(a0, 1.0);
        assert_eq!(s0, 5.0);
        p.elapsed = 1.5;
        assert!(p.is_finished());
        let (end, a1, s1) = p.sample();
        assert!((end - Vec2::new(60.0, -10.0)).length() < 1e-4);
        assert_eq!(a1, 0.0);
        assert!((s1 - 7.5).abs() < 1e-4);
    }

    #[test]
    fn burst_respects_count_and_spread() {
        let cfg = ParticleConfig::default();
        let burst = roll_burst(Vec2::ZERO, &cfg, &mut rand::thread_rng());
        assert_eq!(burst.len(), cfg.count);
        for (p, hue) in &burst {
            assert!(p.offset.x.abs() <= cfg.spread && p.offset.y.abs() <= cfg.spread);
            assert!(p.end_scale >= cfg.scale_range.min && p.end_scale <= cfg.scale_range.max);
            assert!((0.0..360.0).contains(hue));
        }
    }

    #[test]
    fn zero_duration_finishes_immediately() {
        let p = PopParticle {
            elapsed: 0.0,
            duration: 0.0,
            origin: Vec2::ZERO,
            offset: Vec2::ONE,
            end_scale: 1.0,
            size: 5.0,
        };
        assert!(p.is_finished());
    }
}
