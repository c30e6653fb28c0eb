use bevy::prelude::*;

pub mod config;
pub mod error;
pub mod gesture;
pub mod grid;
pub mod input;
pub mod level;
pub mod physics;
pub mod placement;
pub mod screen;
pub mod tray;

use config::{LevelSettings, TrayConfig};
use grid::{GridPoints, refresh_grid_points};
use input::{
    ActiveDrag, InputPlugin, PointerOverUi, TrayPointerEvent, resolve_drag, update_pointer_over_ui,
};
use level::LevelPlugin;
use physics::{PhysicsPlugin, advance_trays, resolve_collisions, sync_tray_transforms};
use placement::{AllTraysPlaced, TraySnapped, check_completion};
use screen::ScreenPlugin;
use tray::{TrayColor, TrayMotion};

#[derive(States, Default, Debug, Clone, PartialEq, Eq, Hash)]
pub enum GameState {
    #[default]
    Welcome,
    Playing,
    Won,
}

/// Tray rules: grid points, drag handling, motion, snapping and completion.
///
/// Independent of rendering and device input so it can run headless.
pub struct TraySortPlugin;

impl Plugin for TraySortPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .register_type::<TrayConfig>()
            .register_type::<LevelSettings>()
            .register_type::<TrayColor>()
            .register_type::<TrayMotion>()
            .init_resource::<TrayConfig>()
            .init_resource::<LevelSettings>()
            .init_resource::<GridPoints>()
            .init_resource::<PointerOverUi>()
            .init_resource::<ActiveDrag>()
            .add_event::<TraySnapped>()
            .add_event::<AllTraysPlaced>()
            .add_event::<TrayPointerEvent>()
            .add_systems(
                Update,
                (refresh_grid_points, update_pointer_over_ui, resolve_drag)
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            )
            // Motion and contacts are resolved on the fixed tick
            .add_systems(
                FixedUpdate,
                (
                    advance_trays,
                    resolve_collisions,
                    check_completion,
                    sync_tray_transforms,
                )
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

pub fn run() {
    tray_helpers::get_default_app(env!("CARGO_PKG_NAME"))
        .add_plugins(PhysicsPlugin)
        // .add_plugins(avian3d::prelude::PhysicsDebugPlugin::default()) // Shows colliders
        .add_plugins(TraySortPlugin)
        .add_plugins(InputPlugin)
        .add_plugins(LevelPlugin)
        .add_plugins(ScreenPlugin)
        .run();
}
