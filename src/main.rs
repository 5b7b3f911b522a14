use anyhow::Result;
use bevy::prelude::*;
use bevy::window::WindowResolution;

use balloon_party::{GameConfig, GamePlugin};

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::path::PathBuf;

    use clap::Parser;

    #[derive(Parser, Debug)]
    #[command(name = "balloon_party", about = "Floating balloons, pops and a 3D greeting")]
    pub struct Cli {
        /// Config layers, later files override earlier ones.
        #[arg(long = "config", value_name = "PATH")]
        pub config: Vec<PathBuf>,
        /// Override `balloons.initial_count`.
        #[arg(long)]
        pub balloons: Option<usize>,
        /// Exit after this many seconds.
        #[arg(long = "auto-close", value_name = "SECS")]
        pub auto_close: Option<f32>,
    }

    impl Cli {
        pub fn config_layers(&self) -> Vec<PathBuf> {
            if self.config.is_empty() {
                vec![
                    PathBuf::from("assets/config/game.ron"),
                    PathBuf::from("assets/config/game.local.ron"),
                ]
            } else {
                self.config.clone()
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn load_config() -> GameConfig {
    // Embedded base config; no local layer in the browser.
    const RAW: &str = include_str!("../assets/config/game.ron");
    GameConfig::from_ron_str(RAW).unwrap_or_else(|e| {
        warn!(target: "config", "embedded config parse failure: {e}; using defaults");
        GameConfig::default()
    })
}

#[cfg(not(target_arch = "wasm32"))]
fn load_config() -> GameConfig {
    use clap::Parser;

    let args = cli::Cli::parse();
    let (mut cfg, used, errors) = GameConfig::load_layered(args.config_layers());
    for e in errors {
        warn!(target: "config", "config load issue: {e}");
    }
    if used.is_empty() {
        info!(target: "config", "no config layers found; using defaults");
    } else {
        info!(target: "config", "config layers loaded: {used:?}");
    }
    if let Some(n) = args.balloons {
        cfg.balloons.initial_count = n;
    }
    if let Some(secs) = args.auto_close {
        cfg.window.auto_close = secs;
    }
    cfg
}

fn main() -> Result<()> {
    #[cfg(target_arch = "wasm32")]
    {
        balloon_party::platform::init_panic_hook();
        balloon_party::platform::check_webgpu_available()?;
    }

    let cfg = load_config();
    for w in cfg.validate() {
        warn!(target: "config", "config warning: {w}");
    }

    let window = Window {
        title: cfg.window.title.clone(),
        resolution: WindowResolution::new(cfg.window.width, cfg.window.height),
        resizable: true,
        #[cfg(target_arch = "wasm32")]
        fit_canvas_to_parent: true,
        ..default()
    };

    let exit = App::new()
        .insert_resource(cfg)
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(window),
            ..default()
        }))
        .add_plugins(GamePlugin)
        .run();
    if let AppExit::Error(code) = exit {
        anyhow::bail!("app exited with code {code}");
    }
    Ok(())
}
