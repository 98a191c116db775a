use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TilePos {
    pub x: i32,
    pub y: i32,
}

impl TilePos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<[i32; 2]> for TilePos {
    fn from([x, y]: [i32; 2]) -> Self {
        Self { x, y }
    }
}

/// Source predicate of a portal: a single tile, or a span of columns on one row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PortalSource {
    Row {
        y: i32,
        #[serde(rename = "xRange")]
        x_range: [i32; 2],
    },
    Point {
        x: i32,
        y: i32,
    },
}

impl PortalSource {
    pub fn contains(&self, tile: TilePos) -> bool {
        match *self {
            PortalSource::Point { x, y } => tile.x == x && tile.y == y,
            PortalSource::Row {
                y,
                x_range: [min, max],
            } => tile.y == y && (min..=max).contains(&tile.x),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portal {
    pub from: PortalSource,
    pub to_map: String,
    pub to_position: [i32; 2],
}

impl Portal {
    pub fn destination(&self) -> TilePos {
        TilePos::from(self.to_position)
    }
}

/// Everything the client needs to enter a map. Replaced wholesale on every
/// transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapMeta {
    pub key: String,
    pub display_name: String,
    /// Tiled JSON holding the tile layer
    #[serde(default)]
    pub json_file: String,
    #[serde(default)]
    pub tileset_file: String,
    pub tile_width: u32,
    pub tile_height: u32,
    /// Map size in tiles; 0 means unbounded
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub start_position: [i32; 2],
    #[serde(default)]
    pub teleports: Vec<Portal>,
}

impl MapMeta {
    /// Pixel extent of the map, if its tile dimensions are known.
    pub fn pixel_bounds(&self) -> Option<(f32, f32)> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        // Server-supplied; the product can exceed u32
        Some((
            self.width as f32 * self.tile_width as f32,
            self.height as f32 * self.tile_height as f32,
        ))
    }
}
