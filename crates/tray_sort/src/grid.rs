use bevy::prelude::*;

use crate::config::TrayConfig;
use crate::error::TraySortError;

/// World-space bounds of a placed tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileBounds {
    pub center: Vec3,
    pub size: Vec3,
}

/// The measurable part of the tile prefab.
#[derive(Debug, Clone, Copy, Default)]
pub struct TileTemplate {
    pub bounds: Option<Vec3>,
}

impl TileTemplate {
    pub const fn new(bounds: Option<Vec3>) -> Self {
        Self { bounds }
    }

    /// Footprint used to space tiles, validated to be positive on X and Z.
    pub fn footprint(&self) -> Result<Vec3, TraySortError> {
        let size = self.bounds.ok_or(TraySortError::MissingTileBounds)?;
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !valid(size.x) || !valid(size.z) {
            return Err(TraySortError::InvalidTileBounds {
                width: size.x,
                depth: size.z,
            });
        }
        Ok(size)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TilePlacement {
    pub name: String,
    pub index: UVec2,
    pub position: Vec3,
}

/// A tile of the board, sized by its measured bounds. Its center is the entity translation.
#[derive(Component, Debug, Clone, Copy)]
pub struct Tile {
    pub size: Vec3,
}

/// Number of tiles on an `nx` by `nz` board, counted without `u32` overflow.
const fn tile_count(nx: u32, nz: u32) -> usize {
    nx as usize * nz as usize
}

/// Lays `nx * nz` tiles edge to edge on the ground plane, x-major.
pub fn layout_tiles(
    template: &TileTemplate,
    nx: u32,
    nz: u32,
) -> Result<Vec<TilePlacement>, TraySortError> {
    let size = template.footprint()?;

    let mut placements = Vec::with_capacity(tile_count(nx, nz));
    for x in 0..nx {
        for z in 0..nz {
            placements.push(TilePlacement {
                name: format!("Tile_{x}_{z}"),
                index: UVec2::new(x, z),
                position: Vec3::new(x as f32 * size.x, 0.0, z as f32 * size.z),
            });
        }
    }
    Ok(placements)
}

/// Splits every tile into a 2x2 sub-grid and returns the sub-cell centers at `fixed_y`.
pub fn grid_points(tiles: impl IntoIterator<Item = TileBounds>, fixed_y: f32) -> Vec<Vec3> {
    let mut points = Vec::new();
    for tile in tiles {
        let quarter = tile.size / 4.0;
        for offset_x in [-quarter.x, quarter.x] {
            for offset_z in [-quarter.z, quarter.z] {
                points.push(Vec3::new(
                    tile.center.x + offset_x,
                    fixed_y,
                    tile.center.z + offset_z,
                ));
            }
        }
    }
    points
}

/// Last computed grid points, rebuilt only when the tiles change.
#[derive(Resource, Debug)]
pub struct GridPoints {
    points: Vec<Vec3>,
    dirty: bool,
}

impl Default for GridPoints {
    fn default() -> Self {
        Self {
            points: Vec::new(),
            dirty: true,
        }
    }
}

impl GridPoints {
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn rebuild(&mut self, tiles: impl IntoIterator<Item = TileBounds>, fixed_y: f32) {
        self.points = grid_points(tiles, fixed_y);
        self.dirty = false;
    }
}

pub fn refresh_grid_points(
    tiles: Query<(Ref<Tile>, Ref<Transform>)>,
    mut removed: RemovedComponents<Tile>,
    config: Res<TrayConfig>,
    mut grid: ResMut<GridPoints>,
) {
    let tiles_removed = removed.read().count() > 0;
    let tiles_changed = tiles
        .iter()
        .any(|(tile, transform)| tile.is_changed() || transform.is_changed());

    if !grid.is_dirty() && !tiles_removed && !tiles_changed && !config.is_changed() {
        return;
    }

    grid.rebuild(
        tiles.iter().map(|(tile, transform)| TileBounds {
            center: transform.translation,
            size: tile.size,
        }),
        config.fixed_y,
    );
    debug!("Rebuilt {} grid points", grid.points().len());
}
