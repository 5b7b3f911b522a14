//! Logical size of the drawing surface plus conversions between page-style
//! coordinates (origin top-left, y down) and the 2D world (origin centre, y up).

use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};

use crate::core::config::GameConfig;

#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    #[inline]
    pub fn half(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.height * 0.5
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        -self.height * 0.5
    }

    #[inline]
    pub fn min_side(&self) -> f32 {
        self.width.min(self.height)
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    /// Page coordinates (top-left origin, y down) to world coordinates.
    pub fn page_to_world(&self, page: Vec2) -> Vec2 {
        Vec2::new(page.x - self.width * 0.5, self.height * 0.5 - page.y)
    }

    pub fn world_to_page(&self, world: Vec2) -> Vec2 {
        Vec2::new(world.x + self.width * 0.5, self.height * 0.5 - world.y)
    }
}

impl FromWorld for Viewport {
    fn from_world(world: &mut World) -> Self {
        let cfg = world.get_resource::<GameConfig>().cloned().unwrap_or_default();
        Viewport::new(cfg.window.width, cfg.window.height)
    }
}

pub struct ViewportPlugin;

impl Plugin for ViewportPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Viewport>()
            .add_systems(PreStartup, sync_viewport_from_window)
            .add_systems(First, track_window_resize);
    }
}

fn sync_viewport_from_window(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut viewport: ResMut<Viewport>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let next = Viewport::new(window.width(), window.height());
    viewport.set_if_neq(next);
}

fn track_window_resize(mut events: EventReader<WindowResized>, mut viewport: ResMut<Viewport>) {
    let Some(last) = events.read().last().cloned() else {
        return;
    };
    let next = Viewport::new(last.width, last.height);
    if viewport.set_if_neq(next) {
        info!(target: "viewport", "resized to {}x{}", next.width, next.height);
    }
}
