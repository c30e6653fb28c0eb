use bevy::prelude::*;

/// Tuning of tray motion and drag handling.
#[derive(Reflect, Resource, Debug, Clone)]
#[reflect(Resource)]
pub struct TrayConfig {
    /// Force pushing a moving tray toward its target, per unit mass
    pub move_force: f32,

    /// Speed cap of the integrator, world units per second
    pub max_speed: f32,

    /// Height of the plane grid points and moving trays live on
    pub fixed_y: f32,

    /// Pointer displacement (screen pixels) needed to emit a move
    pub drag_threshold: f32,

    /// Planar distance under which a tray is considered arrived
    pub arrival_tolerance: f32,

    /// Step used when no grid point lies in the drag direction
    pub fallback_step: f32,

    /// Minimum dot product between drag direction and direction to a grid point
    pub direction_cone: f32,

    /// Grid points closer than this are the one the tray sits on
    pub min_step: f32,

    /// Height a tray rests at once snapped into its slot
    pub placement_height: f32,

    /// Height a rejected tray is dropped back at
    pub revert_height: f32,
}

impl Default for TrayConfig {
    fn default() -> Self {
        Self {
            move_force: 300.0,
            max_speed: 8.0,
            fixed_y: 1.0,
            drag_threshold: 20.0,
            arrival_tolerance: 0.05,
            fallback_step: 2.0,
            direction_cone: 0.7,
            min_step: 0.1,
            placement_height: 1.0,
            revert_height: 0.1,
        }
    }
}

/// Board layout of a level.
#[derive(Reflect, Resource, Debug, Clone)]
#[reflect(Resource)]
pub struct LevelSettings {
    /// Number of tiles along X
    pub grid_size_x: u32,

    /// Number of tiles along Z
    pub grid_size_z: u32,

    /// Measured bounds of the tile template, `None` when it has nothing to measure
    pub tile_bounds: Option<Vec3>,

    /// Size of a tray body
    pub tray_size: Vec3,

    /// Thickness of the colored walls around the board
    pub wall_thickness: f32,

    /// Distance between a wall and the placement slot behind it
    pub slot_offset: f32,
}

impl Default for LevelSettings {
    fn default() -> Self {
        Self {
            grid_size_x: 2,
            grid_size_z: 2,
            tile_bounds: Some(Vec3::new(2.0, 0.2, 2.0)),
            tray_size: Vec3::new(0.9, 0.3, 0.9),
            wall_thickness: 0.2,
            slot_offset: 1.0,
        }
    }
}
