use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TraySortError {
    #[error("Tile template has no measurable bounds")]
    MissingTileBounds,

    #[error("Tile template footprint must be positive, got {width} x {depth}")]
    InvalidTileBounds { width: f32, depth: f32 },

    #[error("No grid points available for tray {0}")]
    MissingGridPoints(String),

    #[error("Placement tracker is not set up, cannot check tray {0}")]
    MissingTracker(String),
}
