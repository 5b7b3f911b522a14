pub mod app;
pub mod core;
pub mod debug;
pub mod effects;
pub mod gameplay;
pub mod interaction;
pub mod physics;
pub mod platform;
pub mod rendering;

// Curated re-exports
pub use app::game::GamePlugin;
pub use core::components::{Balloon, BalloonHue, BalloonRadius, Boundary, BoundarySide};
pub use core::config::{config::GameConfig, config::WindowConfig};
pub use core::error::BalloonError;
pub use core::viewport::Viewport;
pub use gameplay::balloons::{BalloonRegistry, BalloonSlot};
