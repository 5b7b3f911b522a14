use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_rapier2d::prelude::*;

use crate::core::components::{Balloon, BalloonRadius};
use crate::core::config::GameConfig;
use crate::core::system::system_order::PrePhysicsSet;
use crate::core::viewport::Viewport;
use crate::gameplay::balloons::{
    BalloonRegistry, BalloonSlot, PopCause, PopRequest, SpawnBalloonRequest,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    /// Left mouse / touch: pop or create.
    Primary,
    /// Right mouse: grab and drag.
    Secondary,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerPhase {
    Pressed,
    Moved,
    Released,
}

/// Pointer activity already converted to world coordinates.
#[derive(Event, Debug, Clone, Copy)]
pub struct PointerAction {
    pub phase: PointerPhase,
    pub button: PointerButton,
    pub world: Vec2,
}

/// Balloon currently held by the pointer.
#[derive(Resource, Default, Debug)]
pub struct DragState {
    pub slot: Option<BalloonSlot>,
    pub body: Option<Entity>,
    pub target: Option<Vec2>,
}

impl DragState {
    pub fn release(&mut self) {
        self.slot = None;
        self.body = None;
        self.target = None;
    }

    pub fn is_active(&self) -> bool {
        self.body.is_some()
    }
}

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct PointerInputSet;

pub struct PointerPlugin;

impl Plugin for PointerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DragState>()
            .add_event::<PointerAction>()
            .add_systems(
                Update,
                (
                    read_pointer_input.in_set(PointerInputSet),
                    (handle_pointer_actions, pin_dragged_balloon)
                        .chain()
                        .after(PointerInputSet)
                        .in_set(PrePhysicsSet),
                ),
            );
    }
}

/// Nearest balloon whose circle contains `point`. Equal distances resolve to
/// the lowest slot.
pub fn pick_balloon<I>(point: Vec2, candidates: I) -> Option<(BalloonSlot, Entity)>
where
    I: IntoIterator<Item = (BalloonSlot, Entity, Vec2, f32)>,
{
    let mut best: Option<(BalloonSlot, Entity, f32)> = None;
    for (slot, entity, center, radius) in candidates {
        let d2 = center.distance_squared(point);
        if d2 > radius * radius {
            continue;
        }
        let better = match best {
            None => true,
            Some((best_slot, _, best_d2)) => d2 < best_d2 || (d2 == best_d2 && slot < best_slot),
        };
        if better {
            best = Some((slot, entity, d2));
        }
    }
    best.map(|(slot, entity, _)| (slot, entity))
}

fn read_pointer_input(
    buttons: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    windows: Query<&Window, With<PrimaryWindow>>,
    viewport: Res<Viewport>,
    mut last_cursor: Local<Option<Vec2>>,
    mut right_held: Local<bool>,
    mut out: EventWriter<PointerAction>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let mut emit = |phase, button, page: Vec2| {
        out.write(PointerAction {
            phase,
            button,
            world: viewport.page_to_world(page),
        });
    };

    for touch in touches.iter_just_pressed() {
        emit(PointerPhase::Pressed, PointerButton::Primary, touch.position());
    }
    for touch in touches.iter_just_released() {
        emit(PointerPhase::Released, PointerButton::Primary, touch.position());
    }

    let cursor = window.cursor_position();
    // Releases must land even when the cursor has left the window.
    let release_at = cursor.or(*last_cursor).unwrap_or_default();
    for (button, mapped) in [
        (MouseButton::Left, PointerButton::Primary),
        (MouseButton::Right, PointerButton::Secondary),
    ] {
        if let Some(cursor) = cursor {
            if buttons.just_pressed(button) {
                emit(PointerPhase::Pressed, mapped, cursor);
            }
        }
        if buttons.just_released(button) {
            emit(PointerPhase::Released, mapped, release_at);
        }
    }
    let held = buttons.pressed(MouseButton::Right);
    if *right_held && !held && !buttons.just_released(MouseButton::Right) {
        emit(PointerPhase::Released, PointerButton::Secondary, release_at);
    }
    *right_held = held;

    let Some(cursor) = cursor else {
        return;
    };
    if *last_cursor != Some(cursor) {
        *last_cursor = Some(cursor);
        if held {
            emit(PointerPhase::Moved, PointerButton::Secondary, cursor);
        }
    }
}

fn handle_pointer_actions(
    mut actions: EventReader<PointerAction>,
    registry: Res<BalloonRegistry>,
    bodies: Query<(&Transform, &BalloonRadius), With<Balloon>>,
    mut drag: ResMut<DragState>,
    cfg: Res<GameConfig>,
    mut pops: EventWriter<PopRequest>,
    mut spawns: EventWriter<SpawnBalloonRequest>,
) {
    for action in actions.read() {
        match (action.phase, action.button) {
            (PointerPhase::Pressed, PointerButton::Primary) => {
                let hit = pick_balloon(action.world, live_candidates(&registry, &bodies));
                match hit {
                    Some((slot, _)) => {
                        pops.write(PopRequest {
                            slot,
                            cause: PopCause::Clicked,
                        });
                    }
                    None => {
                        spawns.write(SpawnBalloonRequest {
                            position: action.world,
                        });
                    }
                }
            }
            (PointerPhase::Pressed, PointerButton::Secondary) => {
                if !cfg.interactions.drag_enabled {
                    continue;
                }
                if let Some((slot, body)) =
                    pick_balloon(action.world, live_candidates(&registry, &bodies))
                {
                    drag.slot = Some(slot);
                    drag.body = Some(body);
                    drag.target = Some(action.world);
                    debug!(target: "input", "grabbed slot {}", slot.0);
                }
            }
            (PointerPhase::Moved, PointerButton::Secondary) => {
                if drag.is_active() {
                    drag.target = Some(action.world);
                }
            }
            (PointerPhase::Released, PointerButton::Secondary) => {
                if let Some(slot) = drag.slot {
                    debug!(target: "input", "released slot {}", slot.0);
                }
                drag.release();
            }
            _ => {}
        }
    }
}

fn live_candidates(
    registry: &BalloonRegistry,
    bodies: &Query<(&Transform, &BalloonRadius), With<Balloon>>,
) -> Vec<(BalloonSlot, Entity, Vec2, f32)> {
    registry
        .live_bodies()
        .filter_map(|(slot, body)| {
            let (tf, radius) = bodies.get(body).ok()?;
            Some((slot, body, tf.translation.truncate(), radius.0))
        })
        .collect()
}

/// Holds the grabbed body at the pointer, overriding the simulation.
fn pin_dragged_balloon(
    mut drag: ResMut<DragState>,
    registry: Res<BalloonRegistry>,
    mut bodies: Query<(&mut Transform, &mut Velocity), With<Balloon>>,
) {
    let (Some(slot), Some(body), Some(target)) = (drag.slot, drag.body, drag.target) else {
        return;
    };
    // The body may have popped and been replaced since it was grabbed.
    if registry.body(slot) != Some(body) {
        drag.release();
        return;
    }
    let Ok((mut tf, mut vel)) = bodies.get_mut(body) else {
        drag.release();
        return;
    };
    tf.translation.x = target.x;
    tf.translation.y = target.y;
    vel.linvel = Vec2::ZERO;
    vel.angvel = 0.0;
}
