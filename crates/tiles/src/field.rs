use std::collections::BTreeMap;

use glam::Vec3;
use roamfield_common::Aabb;

/// Largest tile coordinate magnitude on either axis. Neighbour coordinates of
/// a centered field stay representable around it.
pub const MAX_COORD: i32 = i32::MAX / 2;

/// Integer tile coordinate on the XZ plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    pub x: i32,
    pub z: i32,
}

impl TileCoord {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }
}

/// Fixed offset of a tile relative to the player's tile, in `[-half, half]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileOffset {
    pub dx: i32,
    pub dz: i32,
}

impl TileOffset {
    pub const CENTER: TileOffset = TileOffset { dx: 0, dz: 0 };

    pub fn new(dx: i32, dz: i32) -> Self {
        Self { dx, dz }
    }
}

/// Stable handle to a tile slot. Valid for the lifetime of its field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileHandle(pub u32);

/// One ground tile.
///
/// `position` is the min corner of the grid cell the tile currently covers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tile {
    pub offset: TileOffset,
    pub position: Vec3,
    pub size: f32,
}

impl Tile {
    /// Center of the covered cell, at ground height.
    pub fn center(&self) -> Vec3 {
        self.position + Vec3::new(self.size * 0.5, 0.0, self.size * 0.5)
    }

    /// Flat box over the covered cell.
    pub fn footprint(&self) -> Aabb {
        Aabb::new(
            self.position,
            self.position + Vec3::new(self.size, 0.0, self.size),
        )
    }

    /// Whether `p` falls in this tile's cell on the XZ plane (min edge
    /// inclusive, max edge exclusive, matching floor division).
    pub fn covers(&self, p: Vec3) -> bool {
        p.x >= self.position.x
            && p.x < self.position.x + self.size
            && p.z >= self.position.z
            && p.z < self.position.z + self.size
    }
}

/// Errors from tile field construction.
#[derive(Debug, thiserror::Error)]
pub enum TileFieldError {
    #[error("tile size must be finite and positive, got {0}")]
    InvalidTileSize(f32),
    #[error("tiles per axis must be odd and at least 1, got {0}")]
    InvalidTilesPerAxis(u32),
}

/// Fixed-size square of tiles that recenters on the player's cell.
///
/// Tiles are stored in a flat vector in row-major order (dx outer, dz inner).
/// The offset → handle map is built once in [`TileField::new`] and never
/// changes, so tile identity does not depend on insertion order.
#[derive(Debug, Clone)]
pub struct TileField {
    tile_size: f32,
    tiles_per_axis: u32,
    tiles: Vec<Tile>,
    index: BTreeMap<TileOffset, TileHandle>,
    center: TileCoord,
}

impl TileField {
    /// Build a field centered on tile (0, 0).
    pub fn new(tile_size: f32, tiles_per_axis: u32) -> Result<Self, TileFieldError> {
        if !tile_size.is_finite() || tile_size <= 0.0 {
            return Err(TileFieldError::InvalidTileSize(tile_size));
        }
        if tiles_per_axis == 0 || tiles_per_axis % 2 == 0 {
            return Err(TileFieldError::InvalidTilesPerAxis(tiles_per_axis));
        }

        let half = (tiles_per_axis / 2) as i32;
        let mut tiles = Vec::with_capacity((tiles_per_axis * tiles_per_axis) as usize);
        let mut index = BTreeMap::new();
        for dx in -half..=half {
            for dz in -half..=half {
                let offset = TileOffset::new(dx, dz);
                index.insert(offset, TileHandle(tiles.len() as u32));
                tiles.push(Tile {
                    offset,
                    position: Vec3::ZERO,
                    size: tile_size,
                });
            }
        }

        let mut field = Self {
            tile_size,
            tiles_per_axis,
            tiles,
            index,
            center: TileCoord::new(0, 0),
        };
        field.place_around(field.center);
        Ok(field)
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    pub fn tiles_per_axis(&self) -> u32 {
        self.tiles_per_axis
    }

    /// `floor(tiles_per_axis / 2)`.
    pub fn half(&self) -> i32 {
        (self.tiles_per_axis / 2) as i32
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Tile coordinate the field is currently centered on.
    pub fn center_coord(&self) -> TileCoord {
        self.center
    }

    /// Convert a world position to a tile coordinate. Uses floor so negative
    /// positions land in the correct cell.
    ///
    /// Coordinates are clamped to `[-MAX_COORD, MAX_COORD]`, so positions
    /// beyond that range land in the outermost cell.
    pub fn position_to_tile(&self, pos: Vec3) -> TileCoord {
        TileCoord {
            x: self.axis_cell(pos.x),
            z: self.axis_cell(pos.z),
        }
    }

    fn axis_cell(&self, p: f32) -> i32 {
        let size = f64::from(self.tile_size);
        let p = f64::from(p);
        let mut cell = (p / size).floor();
        // The quotient can round across a cell edge; step back into the cell holding p.
        if cell * size > p {
            cell -= 1.0;
        } else if (cell + 1.0) * size <= p {
            cell += 1.0;
        }
        cell.clamp(-f64::from(MAX_COORD), f64::from(MAX_COORD)) as i32
    }

    /// Move every tile so the field is centered on the player's cell.
    /// Returns whether the player's cell changed since the last call.
    pub fn recenter(&mut self, player: Vec3) -> bool {
        let coord = self.position_to_tile(player);
        let moved = coord != self.center;
        if moved {
            tracing::debug!(x = coord.x, z = coord.z, "tile field recentered");
        }
        self.center = coord;
        self.place_around(coord);
        moved
    }

    fn place_around(&mut self, coord: TileCoord) {
        let size = f64::from(self.tile_size);
        for (offset, handle) in &self.index {
            let tile = &mut self.tiles[handle.0 as usize];
            tile.position = Vec3::new(
                (f64::from(coord.x.saturating_add(offset.dx)) * size) as f32,
                0.0,
                (f64::from(coord.z.saturating_add(offset.dz)) * size) as f32,
            );
        }
    }

    pub fn handle(&self, offset: TileOffset) -> Option<TileHandle> {
        self.index.get(&offset).copied()
    }

    pub fn tile(&self, handle: TileHandle) -> Option<&Tile> {
        self.tiles.get(handle.0 as usize)
    }

    pub fn get(&self, offset: TileOffset) -> Option<&Tile> {
        self.handle(offset).and_then(|h| self.tile(h))
    }

    /// The tile at offset (0, 0), which always holds the player.
    pub fn center_tile(&self) -> &Tile {
        let handle = self.index[&TileOffset::CENTER];
        &self.tiles[handle.0 as usize]
    }

    /// Tiles in storage (row-major) order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// The fixed offset → handle mapping.
    pub fn offsets(&self) -> impl Iterator<Item = (TileOffset, TileHandle)> + '_ {
        self.index.iter().map(|(o, h)| (*o, *h))
    }
}
