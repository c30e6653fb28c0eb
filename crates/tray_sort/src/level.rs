use avian3d::prelude::*;
use bevy::prelude::*;
use strum::IntoEnumIterator;
use tray_helpers::restart::{CleanupMarker, cleanup_marked_entities};

use crate::GameState;
use crate::config::{LevelSettings, TrayConfig};
use crate::grid::{Tile, TileTemplate, layout_tiles};
use crate::input::ActiveDrag;
use crate::placement::{PlacementSlot, PlacementTracker};
use crate::tray::{CandidateSlots, TrayColor, TrayMotion};

const WALL_HEIGHT: f32 = 1.0;

/// Starting sub-cell of each tray on the 2x2-per-tile grid, column then row.
const START_CELLS: [(TrayColor, UVec2); 4] = [
    (TrayColor::Red, UVec2::new(3, 2)),
    (TrayColor::Blue, UVec2::new(0, 2)),
    (TrayColor::Green, UVec2::new(1, 3)),
    (TrayColor::Yellow, UVec2::new(2, 0)),
];

pub struct LevelPlugin;

impl Plugin for LevelPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_camera)
            .add_systems(OnEnter(GameState::Playing), spawn_level)
            .add_systems(OnExit(GameState::Won), cleanup_marked_entities);
    }
}

#[derive(Component)]
pub struct Wall;

/// Sides of the board, each guarded by one colored wall.
#[derive(Debug, Clone, Copy)]
enum Side {
    West,
    East,
    North,
    South,
}

impl Side {
    const fn of(color: TrayColor) -> Self {
        match color {
            TrayColor::Red => Self::West,
            TrayColor::Blue => Self::East,
            TrayColor::Green => Self::North,
            TrayColor::Yellow => Self::South,
        }
    }

    const fn faces_x(self) -> bool {
        matches!(self, Self::West | Self::East)
    }

    const fn outward(self) -> Vec3 {
        match self {
            Self::West => Vec3::NEG_X,
            Self::East => Vec3::X,
            Self::North => Vec3::NEG_Z,
            Self::South => Vec3::Z,
        }
    }
}

/// Extent of the tiled area on the ground plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl BoardBounds {
    pub fn new(tile_size: Vec3, nx: u32, nz: u32) -> Self {
        let half = Vec2::new(tile_size.x, tile_size.z) / 2.0;
        Self {
            min: -half,
            max: Vec2::new(nx as f32 * tile_size.x, nz as f32 * tile_size.z) - half,
        }
    }

    pub fn center(&self) -> Vec3 {
        let center = (self.min + self.max) / 2.0;
        Vec3::new(center.x, 0.0, center.y)
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }
}

fn sub_cell_position(cell: UVec2, tile_size: Vec3, y: f32) -> Vec3 {
    Vec3::new(
        (cell.x as f32).mul_add(tile_size.x / 2.0, -tile_size.x / 4.0),
        y,
        (cell.y as f32).mul_add(tile_size.z / 2.0, -tile_size.z / 4.0),
    )
}

fn setup_camera(mut commands: Commands, settings: Res<LevelSettings>) {
    let tile_size = settings.tile_bounds.unwrap_or(Vec3::ONE);
    let center = BoardBounds::new(tile_size, settings.grid_size_x, settings.grid_size_z).center();

    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(center + Vec3::new(0.0, 14.0, 8.0)).looking_at(center, Vec3::Y),
    ));

    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(3.0, 10.0, 4.0).looking_at(center, Vec3::Y),
    ));
}

pub fn spawn_level(
    mut commands: Commands,
    settings: Res<LevelSettings>,
    config: Res<TrayConfig>,
    mut drag: ResMut<ActiveDrag>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    drag.tray = None;
    drag.gesture.release();

    let template = TileTemplate::new(settings.tile_bounds);
    let placements = match layout_tiles(&template, settings.grid_size_x, settings.grid_size_z) {
        Ok(placements) => placements,
        Err(err) => {
            warn!("Skipping grid generation: {err}");
            return;
        }
    };
    let Some(tile_size) = settings.tile_bounds else {
        return;
    };

    let tile_mesh = meshes.add(Cuboid::from_size(tile_size));
    let tile_material = materials.add(Color::srgb(0.75, 0.75, 0.78));
    for placement in &placements {
        commands.spawn((
            Name::new(placement.name.clone()),
            Tile { size: tile_size },
            Mesh3d(tile_mesh.clone()),
            MeshMaterial3d(tile_material.clone()),
            Transform::from_translation(placement.position),
            CleanupMarker,
        ));
    }

    let bounds = BoardBounds::new(tile_size, settings.grid_size_x, settings.grid_size_z);
    let center = bounds.center();
    let board = bounds.size();
    let thickness = settings.wall_thickness;

    let mut trays = Vec::new();
    for color in TrayColor::iter() {
        let side = Side::of(color);
        let outward = side.outward();
        // Distance from the board center to the wall middle, and the wall footprint
        let (reach, wall_size) = if side.faces_x() {
            (
                board.x / 2.0 + thickness / 2.0,
                Vec3::new(thickness, WALL_HEIGHT, thickness.mul_add(2.0, board.y)),
            )
        } else {
            (
                board.y / 2.0 + thickness / 2.0,
                Vec3::new(thickness.mul_add(2.0, board.x), WALL_HEIGHT, thickness),
            )
        };
        let wall_position = center + outward * reach + Vec3::Y * config.fixed_y;

        let material = materials.add(color.color());
        commands.spawn((
            Name::new(format!("{color} wall")),
            Wall,
            color,
            RigidBody::Static,
            Collider::cuboid(wall_size.x, wall_size.y, wall_size.z),
            Mesh3d(meshes.add(Cuboid::from_size(wall_size))),
            MeshMaterial3d(material.clone()),
            Transform::from_translation(wall_position),
            CleanupMarker,
        ));

        let slot_distance =
            reach + thickness / 2.0 + settings.slot_offset + settings.tray_size.x / 2.0;
        let slot_position = center + outward * slot_distance;
        let slot = commands
            .spawn((
                Name::new(format!("{color} slot")),
                PlacementSlot::new(color),
                Mesh3d(meshes.add(Cuboid::new(settings.tray_size.x, 0.02, settings.tray_size.z))),
                MeshMaterial3d(material.clone()),
                Transform::from_translation(slot_position),
                CleanupMarker,
            ))
            .id();

        let Some((_, cell)) = START_CELLS.iter().find(|(c, _)| *c == color) else {
            continue;
        };
        if cell.x >= settings.grid_size_x * 2 || cell.y >= settings.grid_size_z * 2 {
            warn!("{color} tray start {cell} is outside the board, not spawning it");
            continue;
        }
        let position = sub_cell_position(*cell, tile_size, config.fixed_y);
        let size = settings.tray_size;
        let tray = commands
            .spawn((
                Name::new(format!("{color} tray")),
                TrayMotion::new(position),
                color,
                CandidateSlots(vec![slot]),
                RigidBody::Kinematic,
                Collider::cuboid(size.x, size.y, size.z),
                Mesh3d(meshes.add(Cuboid::from_size(size))),
                MeshMaterial3d(material),
                Transform::from_translation(position),
                CleanupMarker,
            ))
            .id();
        trays.push(tray);
    }

    info!(
        "Spawned level with {} tiles and {} trays",
        placements.len(),
        trays.len()
    );
    commands.insert_resource(PlacementTracker::new(trays));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_bounds_cover_every_tile() {
        let bounds = BoardBounds::new(Vec3::new(2.0, 0.2, 2.0), 2, 3);
        assert_eq!(bounds.min, Vec2::new(-1.0, -1.0), "first tile edge");
        assert_eq!(bounds.max, Vec2::new(3.0, 5.0), "last tile edge");
        assert_eq!(bounds.center(), Vec3::new(1.0, 0.0, 2.0), "middle of the board");
    }

    #[test]
    fn sub_cells_match_grid_points() {
        let tile_size = Vec3::new(2.0, 0.2, 2.0);
        let points = crate::grid::grid_points(
            [crate::grid::TileBounds {
                center: Vec3::new(2.0, 0.0, 0.0),
                size: tile_size,
            }],
            1.0,
        );
        let cell = sub_cell_position(UVec2::new(3, 1), tile_size, 1.0);
        assert!(
            points.contains(&cell),
            "sub-cell (3, 1) is a grid point of tile (1, 0)"
        );
    }

    #[test]
    fn spawns_tiles_walls_slots_and_registered_trays() {
        let mut app = App::new();
        app.init_resource::<LevelSettings>()
            .init_resource::<TrayConfig>()
            .init_resource::<ActiveDrag>()
            .init_resource::<Assets<Mesh>>()
            .init_resource::<Assets<StandardMaterial>>()
            .add_systems(Update, spawn_level);
        app.update();

        let world = app.world_mut();
        let tiles = world.query::<&Tile>().iter(world).count();
        let walls = world.query::<(&Wall, &TrayColor)>().iter(world).count();
        let slots = world.query::<&PlacementSlot>().iter(world).count();
        let tray_entities: Vec<Entity> = world
            .query_filtered::<Entity, With<TrayMotion>>()
            .iter(world)
            .collect();

        assert_eq!(tiles, 4, "2 x 2 tiles");
        assert_eq!(walls, 4, "one wall per color");
        assert_eq!(slots, 4, "one slot per color");
        assert_eq!(tray_entities.len(), 4, "one tray per color");

        let tracker = world.resource::<PlacementTracker>();
        for tray in &tray_entities {
            assert!(tracker.trays().contains(tray), "tray {tray} registered");
        }
    }

    #[test]
    fn missing_tile_bounds_skip_the_level() {
        let mut app = App::new();
        app.insert_resource(LevelSettings {
            tile_bounds: None,
            ..LevelSettings::default()
        })
        .init_resource::<TrayConfig>()
        .init_resource::<ActiveDrag>()
        .init_resource::<Assets<Mesh>>()
        .init_resource::<Assets<StandardMaterial>>()
        .add_systems(Update, spawn_level);
        app.update();

        let world = app.world_mut();
        assert_eq!(
            world.query::<&Tile>().iter(world).count(),
            0,
            "no tiles without a footprint"
        );
        assert!(
            world.get_resource::<PlacementTracker>().is_none(),
            "no session registered"
        );
    }
}
