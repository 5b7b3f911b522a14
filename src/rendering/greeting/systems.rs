use bevy::prelude::*;

use super::font::{recover_from_font_error, GreetingFont};
use super::mesh::{build_text_mesh, Bevel, ExtrudeSettings};
use crate::core::config::{GameConfig, GreetingConfig};
use crate::core::error::BalloonError;
use crate::core::viewport::Viewport;

#[derive(Component, Debug, Clone, Copy)]
pub struct GreetingText {
    pub width: f32,
}

/// Inputs the current text mesh was built from.
#[derive(Debug, Clone, PartialEq)]
struct GreetingKey {
    viewport: Viewport,
    revision: u32,
    text: String,
    shape: ExtrudeSettings,
}

#[derive(Resource, Debug, Default)]
pub struct GreetingBuild {
    key: Option<GreetingKey>,
}

/// Em size and extrusion depth in scene units for a viewport.
pub fn text_dimensions(viewport: &Viewport, cfg: &GreetingConfig) -> (f32, f32) {
    let size = viewport.min_side() * cfg.size_factor;
    (size, size * cfg.depth_factor)
}

pub fn extrude_settings(viewport: &Viewport, cfg: &GreetingConfig) -> ExtrudeSettings {
    let (size, depth) = text_dimensions(viewport, cfg);
    ExtrudeSettings {
        size,
        depth,
        curve_segments: cfg.curve_segments,
        bevel: cfg.bevel_enabled.then(|| Bevel {
            thickness: size * cfg.bevel_thickness_factor.max(0.0),
            size: size * cfg.bevel_size_factor.max(0.0),
            segments: cfg.bevel_segments,
        }),
    }
}

/// Vertical position of the text at wall-clock time `t`.
#[inline]
pub fn float_offset(t: f32, cfg: &GreetingConfig) -> f32 {
    (t * cfg.float_speed).sin() * cfg.float_amplitude + cfg.base_y
}

pub fn greeting_color(cfg: &GreetingConfig) -> Color {
    match Srgba::hex(&cfg.color) {
        Ok(c) => c.into(),
        Err(e) => {
            warn!(target: "greeting", "bad colour '{}': {e:?}; using orange", cfg.color);
            Color::srgb(1.0, 0.647, 0.0)
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn rebuild_greeting_mesh(
    mut commands: Commands,
    mut font: ResMut<GreetingFont>,
    fonts: Res<Assets<Font>>,
    viewport: Res<Viewport>,
    cfg: Res<GameConfig>,
    asset_server: Option<Res<AssetServer>>,
    mut build: ResMut<GreetingBuild>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    existing: Query<(Entity, &Mesh3d), With<GreetingText>>,
) {
    if !cfg.greeting.enabled {
        if build.key.take().is_some() {
            for (e, mesh) in existing.iter() {
                meshes.remove(&mesh.0);
                commands.entity(e).despawn();
            }
        }
        return;
    }
    if !font.is_ready() {
        return;
    }
    let key = GreetingKey {
        viewport: *viewport,
        revision: font.revision,
        text: cfg.greeting.text.clone(),
        shape: extrude_settings(&viewport, &cfg.greeting),
    };
    let shape = key.shape;
    if build.key.as_ref() == Some(&key) {
        return;
    }
    let Some(data) = font.handle.as_ref().and_then(|h| fonts.get(h)).map(|f| f.data.clone()) else {
        return;
    };
    build.key = Some(key);

    for (e, mesh) in existing.iter() {
        meshes.remove(&mesh.0);
        commands.entity(e).despawn();
    }

    let built = ab_glyph::FontRef::try_from_slice(&data)
        .map_err(|e| BalloonError::FontParse(e.to_string()))
        .and_then(|f| build_text_mesh(&f, &cfg.greeting.text, &shape));
    let extruded = match built {
        Ok(extruded) => extruded,
        Err(err @ BalloonError::FontParse(_)) => {
            recover_from_font_error(&mut font, &err, &cfg, asset_server.as_deref());
            return;
        }
        Err(err) => {
            warn!(target: "greeting", "{err}");
            return;
        }
    };

    let width = extruded.size.x;
    let depth = extruded.size.z;
    let tris = extruded.triangle_count();
    let mesh = meshes.add(extruded.into_mesh());
    let material = materials.add(StandardMaterial {
        base_color: greeting_color(&cfg.greeting),
        perceptual_roughness: 0.2,
        metallic: 0.1,
        reflectance: 0.8,
        ..default()
    });
    commands.spawn((
        Name::new("GreetingText"),
        GreetingText { width },
        Mesh3d(mesh),
        MeshMaterial3d(material),
        Transform::from_xyz(-width * 0.5, cfg.greeting.base_y, 0.0),
    ));
    info!(
        target: "greeting",
        "text mesh rebuilt: {tris} triangles, width {width:.3}, depth {depth:.3}"
    );
}

pub(crate) fn float_greeting_text(
    time: Res<Time<Real>>,
    cfg: Res<GameConfig>,
    mut q: Query<(&GreetingText, &mut Transform)>,
) {
    let y = float_offset(time.elapsed_secs(), &cfg.greeting);
    for (text, mut tf) in q.iter_mut() {
        tf.translation.x = -text.width * 0.5;
        tf.translation.y = y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimensions_follow_smaller_side() {
        let cfg = GreetingConfig::default();
        let (size, depth) = text_dimensions(&Viewport::new(1000.0, 500.0), &cfg);
        assert!((size - 0.15).abs() < 1e-6);
        assert!((depth - 0.0375).abs() < 1e-6);
    }

    #[test]
    fn bevel_scales_with_text_size() {
        let cfg = GreetingConfig::default();
        let shape = extrude_settings(&Viewport::new(1000.0, 500.0), &cfg);
        assert_eq!(shape.curve_segments, 12);
        let bevel = shape.bevel.expect("bevel on by default");
        assert!((bevel.thickness - 0.15 * 0.05).abs() < 1e-7);
        assert!((bevel.size - 0.15 * 0.03).abs() < 1e-7);

        let flat = GreetingConfig {
            bevel_enabled: false,
            ..default()
        };
        assert!(extrude_settings(&Viewport::new(1000.0, 500.0), &flat).bevel.is_none());
    }

    #[test]
    fn float_oscillates_around_base() {
        let cfg = GreetingConfig::default();
        assert!((float_offset(0.0, &cfg) - -0.5).abs() < 1e-6);
        let peak = float_offset(std::f32::consts::FRAC_PI_2, &cfg);
        assert!((peak - -0.2).abs() < 1e-6);
    }

    #[test]
    fn color_parses_hex_and_falls_back() {
        let cfg = GreetingConfig::default();
        let c = greeting_color(&cfg).to_srgba();
        assert!((c.red - 1.0).abs() < 1e-3 && (c.green - 0.647).abs() < 2e-3 && c.blue < 1e-3);
        let bad = GreetingConfig {
            color: "not-a-colour".into(),
            ..default()
        };
        let c = greeting_color(&bad).to_srgba();
        assert!((c.red - 1.0).abs() < 1e-3);
    }
}
