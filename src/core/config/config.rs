use bevy::prelude::*;
use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Debug, Deserialize, Resource, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub title: String,
    /// Automatically close the app after this many seconds. 0.0 (or omitted) = run indefinitely.
    #[serde(rename = "autoClose")]
    pub auto_close: f32,
}
impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            title: "Balloon Party".into(),
            auto_close: 0.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SpawnRange<T> {
    pub min: T,
    pub max: T,
}
impl<T: Default> Default for SpawnRange<T> {
    fn default() -> Self {
        Self {
            min: Default::default(),
            max: Default::default(),
        }
    }
}
impl SpawnRange<f32> {
    /// Uniform sample; degenerate or inverted ranges collapse to `min`.
    pub fn sample(&self, rng: &mut impl rand::Rng) -> f32 {
        if self.min < self.max {
            rng.gen_range(self.min..self.max)
        } else {
            self.min
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    /// World-space vertical acceleration (px/s^2, y-up). Positive = balloons float upward.
    pub gravity_y: f32,
    pub restitution: f32,
    pub pixels_per_meter: f32,
    pub rapier_debug: bool,
}
impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity_y: 50.0,
            restitution: 0.9,
            pixels_per_meter: 1.0,
            rapier_debug: false,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct BalloonConfig {
    pub radius: f32,
    /// Number of balloons released at startup.
    pub initial_count: usize,
    /// Delay between consecutive startup balloons (milliseconds).
    pub stagger_ms: f32,
    /// Startup balloons sit this far above the bottom edge (px).
    pub initial_height_offset: f32,
    /// Startup x = (index + 1) * (viewport width / spread_divisor), measured from the left edge.
    pub spread_divisor: f32,
    /// Horizontal drift at spawn (px/s).
    pub vel_x_range: SpawnRange<f32>,
    /// Upward speed at spawn (px/s, positive = up).
    pub vel_y_range: SpawnRange<f32>,
    /// A balloon pops once its centre is within this distance of the viewport top (px).
    pub top_pop_margin: f32,
    pub saturation: f32,
    pub lightness: f32,
}
impl Default for BalloonConfig {
    fn default() -> Self {
        Self {
            radius: 30.0,
            initial_count: 15,
            stagger_ms: 200.0,
            initial_height_offset: 100.0,
            spread_divisor: 51.0,
            vel_x_range: SpawnRange {
                min: -15.0,
                max: 15.0,
            },
            vel_y_range: SpawnRange {
                min: 0.0,
                max: 60.0,
            },
            top_pop_margin: 100.0,
            saturation: 1.0,
            lightness: 0.7,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct BoundaryConfig {
    pub thickness: f32,
}
impl Default for BoundaryConfig {
    fn default() -> Self {
        Self { thickness: 20.0 }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ParticleConfig {
    pub count: usize,
    /// Maximum outward offset on each axis (px); offsets are sampled in [-spread, spread].
    pub spread: f32,
    /// Seconds until a particle has fully faded and is removed.
    pub duration: f32,
    /// Particle diameter (px).
    pub size: f32,
    /// Final scale factor range reached at the end of the burst.
    pub scale_range: SpawnRange<f32>,
}
impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 30,
            spread: 100.0,
            duration: 1.5,
            size: 5.0,
            scale_range: SpawnRange { min: 0.5, max: 1.5 },
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AudioConfig {
    pub enabled: bool,
    pub pop_sound: String,
    pub volume: f32,
    /// Cap on simultaneously playing pop sounds. 0 = unlimited (sounds layer freely).
    pub max_concurrent: usize,
}
impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            pop_sound: "audio/pop.wav".into(),
            volume: 1.0,
            max_concurrent: 0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct InteractionConfig {
    /// Right mouse button grabs a balloon and pins it to the pointer while held.
    pub drag_enabled: bool,
    /// When false a clicked balloon leaves its slot empty instead of respawning at the bottom.
    pub respawn_after_click_pop: bool,
}
impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            drag_enabled: true,
            respawn_after_click_pop: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GreetingConfig {
    pub enabled: bool,
    pub text: String,
    /// Asset path of the TTF/OTF used for the extruded text.
    pub font: String,
    /// Reload attempts before falling back to the embedded default font.
    pub font_retry_attempts: u32,
    /// Em size in scene units per viewport pixel of min(width, height).
    pub size_factor: f32,
    /// Extrusion depth as a fraction of the em size.
    pub depth_factor: f32,
    /// Line segments per quadratic/cubic outline curve.
    pub curve_segments: u32,
    pub bevel_enabled: bool,
    /// Bevel depth along z, as a fraction of the em size.
    pub bevel_thickness_factor: f32,
    /// Outward bevel growth, as a fraction of the em size.
    pub bevel_size_factor: f32,
    pub bevel_segments: u32,
    pub base_y: f32,
    pub float_amplitude: f32,
    /// Angular speed of the float (radians per second).
    pub float_speed: f32,
    /// sRGB hex colour (e.g. "#ffa500").
    pub color: String,
    pub camera_z: f32,
    pub fov_degrees: f32,
    pub ambient_brightness: f32,
    pub point_light_intensity: f32,
}
impl Default for GreetingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            text: "Happy Birthday, Ciprian!".into(),
            font: "fonts/FiraMono-Medium.ttf".into(),
            font_retry_attempts: 2,
            size_factor: 0.0003,
            depth_factor: 0.25,
            curve_segments: 12,
            bevel_enabled: true,
            bevel_thickness_factor: 0.05,
            bevel_size_factor: 0.03,
            bevel_segments: 3,
            base_y: -0.5,
            float_amplitude: 0.3,
            float_speed: 1.0,
            color: "#ffa500".into(),
            camera_z: 5.0,
            fov_degrees: 75.0,
            ambient_brightness: 600.0,
            point_light_intensity: 2_000_000.0,
        }
    }
}

/// Diagnostics available with the `debug` feature.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Periodic `SIM` stats line; F2 toggles it at runtime.
    pub stats_log: bool,
    pub stats_interval: f32,
}
impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            stats_log: false,
            stats_interval: 1.0,
        }
    }
}

#[derive(Debug, Deserialize, Resource, Clone, PartialEq, Default)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowConfig,
    pub physics: PhysicsConfig,
    pub balloons: BalloonConfig,
    pub boundaries: BoundaryConfig,
    pub particles: ParticleConfig,
    pub audio: AudioConfig,
    pub interactions: InteractionConfig,
    pub greeting: GreetingConfig,
    pub debug: DebugConfig,
}

impl GameConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let data = fs::read_to_string(&path).map_err(|e| format!("read config: {e}"))?;
        Self::from_ron_str(&data)
    }

    pub fn from_ron_str(data: &str) -> Result<Self, String> {
        ron::from_str(data).map_err(|e| format!("parse RON: {e}"))
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<String>) {
        match Self::load_from_file(&path) {
            Ok(cfg) => (cfg, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Load multiple config layers, later files overriding earlier ones (deep merge of maps).
    /// Unreadable files are reported and skipped; returns (config, list_of_layer_paths_used, list_of_errors).
    pub fn load_layered<P, I>(paths: I) -> (Self, Vec<String>, Vec<String>)
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = P>,
    {
        use ron::value::Value;
        let mut merged: Option<Value> = None;
        let mut used = Vec::new();
        let mut errors = Vec::new();

        fn merge_value(base: &mut Value, overlay: Value) {
            match (base, overlay) {
                (Value::Map(bm), Value::Map(om)) => {
                    for (k, v) in om.into_iter() {
                        let mut incoming = Some(v);
                        for (ek, ev) in bm.iter_mut() {
                            if *ek == k {
                                if let Some(val) = incoming.take() {
                                    merge_value(ev, val);
                                }
                                break;
                            }
                        }
                        if let Some(val) = incoming {
                            bm.insert(k, val);
                        }
                    }
                }
                (b, o) => *b = o,
            }
        }

        for p in paths {
            let path_ref = p.as_ref();
            match fs::read_to_string(path_ref) {
                Ok(txt) => match ron::from_str::<Value>(&txt) {
                    Ok(val) => {
                        if let Some(cur) = &mut merged {
                            merge_value(cur, val);
                        } else {
                            merged = Some(val);
                        }
                        used.push(path_ref.display().to_string());
                    }
                    Err(e) => errors.push(format!("{}: parse error: {e}", path_ref.display())),
                },
                Err(e) => errors.push(format!("{}: read error: {e}", path_ref.display())),
            }
        }

        let Some(val) = merged else {
            return (GameConfig::default(), used, errors);
        };
        match val.into_rust::<GameConfig>() {
            Ok(cfg) => (cfg, used, errors),
            Err(e) => {
                errors.push(format!(
                    "failed to deserialize merged config; using defaults: {e}"
                ));
                (GameConfig::default(), used, errors)
            }
        }
    }

    /// Validate the configuration returning a list of human‑readable warning strings.
    /// These represent suspicious / potentially unintended values but are not hard errors.
    /// Call at startup and log each warning with `warn!`.
    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        if self.window.width <= 0.0 || self.window.height <= 0.0 {
            w.push("window dimensions must be > 0".into());
        }
        if self.window.auto_close < 0.0 {
            w.push(format!(
                "window.autoClose {} negative -> treated as disabled (should be >= 0)",
                self.window.auto_close
            ));
        }
        if self.physics.gravity_y <= 0.0 {
            w.push(format!(
                "physics.gravity_y is {}; balloons will not float upward",
                self.physics.gravity_y
            ));
        }
        if !(0.0..=1.5).contains(&self.physics.restitution) {
            w.push(format!(
                "physics.restitution {} outside recommended 0..1.5",
                self.physics.restitution
            ));
        }
        if self.physics.pixels_per_meter <= 0.0 {
            w.push("physics.pixels_per_meter must be > 0".into());
        }

        let b = &self.balloons;
        if b.radius <= 0.0 {
            w.push("balloons.radius must be > 0".into());
        }
        if b.initial_count == 0 {
            w.push("balloons.initial_count is 0; nothing spawns until clicked".into());
        }
        if b.stagger_ms < 0.0 {
            w.push("balloons.stagger_ms negative -> treated as 0".into());
        }
        if b.spread_divisor <= 0.0 {
            w.push("balloons.spread_divisor must be > 0".into());
        } else if (b.initial_count as f32) >= b.spread_divisor {
            w.push(format!(
                "balloons.initial_count {} >= spread_divisor {}; startup balloons run off the right edge",
                b.initial_count, b.spread_divisor
            ));
        }
        fn check_range_f32(w: &mut Vec<String>, label: &str, r: &SpawnRange<f32>) {
            if r.min > r.max {
                w.push(format!("{label} min ({}) greater than max ({})", r.min, r.max));
            }
        }
        check_range_f32(&mut w, "balloons.vel_x_range", &b.vel_x_range);
        check_range_f32(&mut w, "balloons.vel_y_range", &b.vel_y_range);
        if b.top_pop_margin < 0.0 {
            w.push("balloons.top_pop_margin negative; balloons can never pop at the top".into());
        }
        if !(0.0..=1.0).contains(&b.saturation) || !(0.0..=1.0).contains(&b.lightness) {
            w.push("balloons.saturation / lightness must lie in 0..1".into());
        }

        if self.boundaries.thickness <= 0.0 {
            w.push("boundaries.thickness must be > 0".into());
        }

        let p = &self.particles;
        if p.count == 0 {
            w.push("particles.count is 0; pops are invisible".into());
        }
        if p.duration <= 0.0 {
            w.push("particles.duration must be > 0".into());
        }
        if p.size <= 0.0 {
            w.push("particles.size must be > 0".into());
        }
        check_range_f32(&mut w, "particles.scale_range", &p.scale_range);

        if !(0.0..=2.0).contains(&self.audio.volume) {
            w.push(format!("audio.volume {} outside 0..2", self.audio.volume));
        }
        if self.audio.enabled && self.audio.pop_sound.trim().is_empty() {
            w.push("audio.pop_sound empty while audio.enabled".into());
        }

        let g = &self.greeting;
        if g.enabled {
            if g.text.trim().is_empty() {
                w.push("greeting.text is empty; nothing to render".into());
            }
            if g.size_factor <= 0.0 {
                w.push("greeting.size_factor must be > 0".into());
            }
            if g.curve_segments == 0 {
                w.push("greeting.curve_segments is 0; curves collapse to their endpoints".into());
            } else if g.curve_segments > 64 {
                w.push(format!(
                    "greeting.curve_segments {} very high; mesh will be heavy",
                    g.curve_segments
                ));
            }
            if g.bevel_enabled && (g.bevel_thickness_factor < 0.0 || g.bevel_size_factor < 0.0) {
                w.push("greeting bevel factors must be >= 0".into());
            }
            if g.depth_factor < 0.0 {
                w.push("greeting.depth_factor negative".into());
            }
            if Srgba::hex(&g.color).is_err() {
                w.push(format!("greeting.color '{}' is not a hex colour", g.color));
            }
            if !(1.0..=179.0).contains(&g.fov_degrees) {
                w.push(format!("greeting.fov_degrees {} outside 1..179", g.fov_degrees));
            }
        }
        if self.debug.stats_interval <= 0.0 {
            w.push("debug.stats_interval must be > 0".into());
        }
        w
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parse_sample_config() {
        let sample = r##"(
            window: (width: 800.0, height: 600.0, title: "Test"),
            physics: (gravity_y: 40.0, restitution: 0.8, pixels_per_meter: 1.0),
            balloons: (
                radius: 25.0,
                initial_count: 10,
                stagger_ms: 100.0,
                vel_x_range: (min: -10.0, max: 10.0),
                vel_y_range: (min: 5.0, max: 50.0),
            ),
            particles: (count: 12, duration: 1.0),
            audio: (enabled: false),
            greeting: (text: "Hi", color: "#00ff00"),
        )"##;
        let mut file = tempfile::NamedTempFile::new().expect("tmp file");
        file.write_all(sample.as_bytes()).unwrap();
        let cfg = GameConfig::load_from_file(file.path()).expect("parse config");
        assert_eq!(cfg.window.width, 800.0);
        assert_eq!(cfg.balloons.initial_count, 10);
        assert_eq!(cfg.balloons.radius, 25.0);
        assert_eq!(cfg.particles.count, 12);
        assert!(!cfg.audio.enabled);
        assert_eq!(cfg.greeting.text, "Hi");
        // untouched sections keep defaults
        assert_eq!(cfg.boundaries, BoundaryConfig::default());
        assert!(
            cfg.validate().is_empty(),
            "expected no validation warnings, got {:?}",
            cfg.validate()
        );
    }

    #[test]
    fn defaults_are_clean() {
        assert!(GameConfig::default().validate().is_empty());
    }

    #[test]
    fn validate_detects_warnings() {
        let mut bad = GameConfig::default();
        bad.window.width = -1.0;
        bad.physics.gravity_y = -9.8;
        bad.balloons.radius = 0.0;
        bad.balloons.initial_count = 60;
        bad.balloons.vel_x_range = SpawnRange { min: 5.0, max: 1.0 };
        bad.particles.duration = 0.0;
        bad.greeting.color = "orange".into();
        let joined = bad.validate().join(" | ");
        assert!(joined.contains("window dimensions must be > 0"));
        assert!(joined.contains("balloons will not float upward"));
        assert!(joined.contains("balloons.radius must be > 0"));
        assert!(joined.contains("run off the right edge"));
        assert!(joined.contains("balloons.vel_x_range min (5"));
        assert!(joined.contains("particles.duration must be > 0"));
        assert!(joined.contains("greeting.color 'orange'"));
    }

    #[test]
    fn load_or_default_missing_file() {
        let (cfg, err) = GameConfig::load_or_default("this/file/does/not/exist.ron");
        assert!(err.is_some());
        assert_eq!(cfg, GameConfig::default());
    }

    #[test]
    fn layered_merge_overrides() {
        let base = r"(
            window: (width: 900.0),
            balloons: (radius: 20.0, initial_count: 5),
        )";
        let override_one = r#"(
            window: (title: "Custom Title"),
            balloons: (initial_count: 8),
        )"#;
        let mut f1 = tempfile::NamedTempFile::new().unwrap();
        let mut f2 = tempfile::NamedTempFile::new().unwrap();
        f1.write_all(base.as_bytes()).unwrap();
        f2.write_all(override_one.as_bytes()).unwrap();
        let (cfg, used, errors) = GameConfig::load_layered([f1.path(), f2.path()]);
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
        assert_eq!(used.len(), 2);
        assert_eq!(cfg.window.width, 900.0);
        assert_eq!(cfg.window.title, "Custom Title");
        // nested map merged, not replaced
        assert_eq!(cfg.balloons.radius, 20.0);
        assert_eq!(cfg.balloons.initial_count, 8);
        assert_eq!(cfg.window.height, WindowConfig::default().height);
    }

    #[test]
    fn layered_missing_layer_reported() {
        let (cfg, used, errors) = GameConfig::load_layered(["does/not/exist.ron"]);
        assert!(used.is_empty());
        assert_eq!(errors.len(), 1);
        assert_eq!(cfg, GameConfig::default());
    }

    #[test]
    fn spawn_range_sample_handles_degenerate() {
        let mut rng = rand::thread_rng();
        let r = SpawnRange { min: 3.0, max: 3.0 };
        assert_eq!(r.sample(&mut rng), 3.0);
        let inverted = SpawnRange { min: 4.0, max: 1.0 };
        assert_eq!(inverted.sample(&mut rng), 4.0);
        let normal = SpawnRange { min: -1.0, max: 1.0 };
        let v = normal.sample(&mut rng);
        assert!((-1.0..1.0).contains(&v));
    }
}
