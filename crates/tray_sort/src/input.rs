use avian3d::prelude::*;
use bevy::prelude::*;
use tray_helpers::input::{
    PrimaryTouch, just_pressed_primary_position, just_released, pressed_screen_position,
    screen_ray,
};

use crate::GameState;
use crate::config::TrayConfig;
use crate::error::TraySortError;
use crate::gesture::{DragGesture, PointerEvent};
use crate::grid::GridPoints;
use crate::tray::TrayMotion;

const PICK_DISTANCE: f32 = 100.0;

/// Reads mouse and touch devices. The drag resolution itself lives in the core plugin.
pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            collect_pointer_events
                .before(resolve_drag)
                .run_if(in_state(GameState::Playing)),
        );
    }
}

/// A pointer event and, for presses, the body under the pointer.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct TrayPointerEvent {
    pub event: PointerEvent,
    pub hit: Option<Entity>,
}

/// Whether the pointer is over a UI node this frame.
#[derive(Resource, Debug, Default)]
pub struct PointerOverUi(pub bool);

/// The tray held by the single active pointer.
#[derive(Resource, Debug)]
pub struct ActiveDrag {
    pub tray: Option<Entity>,
    pub gesture: DragGesture,
}

impl FromWorld for ActiveDrag {
    fn from_world(world: &mut World) -> Self {
        let threshold = world
            .get_resource::<TrayConfig>()
            .map_or(TrayConfig::default().drag_threshold, |config| {
                config.drag_threshold
            });
        Self {
            tray: None,
            gesture: DragGesture::new(threshold),
        }
    }
}

pub fn update_pointer_over_ui(
    interactions: Query<&Interaction>,
    mut pointer_over_ui: ResMut<PointerOverUi>,
) {
    let over = interactions
        .iter()
        .any(|interaction| *interaction != Interaction::None);
    if pointer_over_ui.0 != over {
        pointer_over_ui.0 = over;
    }
}

pub fn collect_pointer_events(
    mouse_input: Res<ButtonInput<MouseButton>>,
    touch_input: Res<Touches>,
    windows: Query<&Window>,
    camera: Query<(&Camera, &GlobalTransform)>,
    spatial_query: SpatialQuery,
    mut primary: Local<PrimaryTouch>,
    mut pointer_events: EventWriter<TrayPointerEvent>,
) {
    if let Some(position) =
        just_pressed_primary_position(&mouse_input, &mut primary, &touch_input, &windows)
    {
        let hit = screen_ray(&camera, position).and_then(|ray| {
            spatial_query
                .cast_ray(
                    ray.origin,
                    ray.direction,
                    PICK_DISTANCE,
                    true,
                    &SpatialQueryFilter::default(),
                )
                .map(|hit| hit.entity)
        });
        pointer_events.send(TrayPointerEvent {
            event: PointerEvent::Down(position),
            hit,
        });
    } else if let Some(position) =
        pressed_screen_position(&mouse_input, &primary, &touch_input, &windows)
    {
        pointer_events.send(TrayPointerEvent {
            event: PointerEvent::Move(position),
            hit: None,
        });
    }

    if just_released(&mouse_input, &mut primary, &touch_input) {
        pointer_events.send(TrayPointerEvent {
            event: PointerEvent::Up,
            hit: None,
        });
    }
}

pub fn resolve_drag(
    mut pointer_events: EventReader<TrayPointerEvent>,
    pointer_over_ui: Res<PointerOverUi>,
    config: Res<TrayConfig>,
    grid: Option<Res<GridPoints>>,
    mut drag: ResMut<ActiveDrag>,
    mut trays: Query<&mut TrayMotion>,
) {
    for &TrayPointerEvent { event, hit } in pointer_events.read() {
        if pointer_over_ui.0 && event != PointerEvent::Up {
            continue;
        }

        match event {
            PointerEvent::Down(_) => {
                let Some((tray, mut motion)) =
                    hit.and_then(|entity| trays.get_mut(entity).ok().map(|m| (entity, m)))
                else {
                    continue;
                };

                drag.gesture = DragGesture::new(config.drag_threshold);
                drag.gesture.handle(event, !motion.is_snapped());
                if drag.gesture.is_armed() {
                    motion.arm();
                    drag.tray = Some(tray);
                }
            }
            PointerEvent::Move(_) => {
                let Some(tray) = drag.tray else {
                    continue;
                };
                let Ok(mut motion) = trays.get_mut(tray) else {
                    continue;
                };
                if motion.is_moving() {
                    continue;
                }
                let Some(grid) = grid.as_deref() else {
                    warn!("{}", TraySortError::MissingGridPoints(format!("{tray}")));
                    continue;
                };

                if let Some(intent) = drag.gesture.handle(event, false) {
                    if let Some(target) = motion.begin_move(intent, grid.points(), &config) {
                        debug!("Tray {tray} moving {intent} to {target}");
                    }
                }
            }
            PointerEvent::Up => {
                drag.gesture.handle(event, false);
                if let Some(tray) = drag.tray.take() {
                    if let Ok(mut motion) = trays.get_mut(tray) {
                        motion.disarm();
                    }
                }
            }
        }
    }
}
