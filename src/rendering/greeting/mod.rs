//! Floating 3D greeting: font loading with retry/fallback, an extruded text
//! mesh rebuilt on font readiness or resize, and a sinusoidal float.
pub mod font;
pub mod mesh;
pub mod systems;

use bevy::prelude::*;

pub use font::{FontPhase, FontSource, GreetingFont};
pub use systems::{GreetingBuild, GreetingText};

pub struct GreetingPlugin;

impl Plugin for GreetingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GreetingFont>()
            .init_resource::<GreetingBuild>()
            .add_systems(Startup, font::start_font_load)
            .add_systems(
                Update,
                (
                    font::poll_font_load,
                    systems::rebuild_greeting_mesh,
                    systems::float_greeting_text,
                )
                    .chain(),
            );
    }
}
