//! Tiles: a fixed N×N field of ground tiles that follows the player.
//!
//! # Invariants
//! - Tile count is fixed at construction; only tile positions move.
//! - The offset of every tile is fixed at construction and looked up by key.
//! - After `recenter`, the player lies inside the footprint of the (0, 0) tile.

mod field;

pub use field::{MAX_COORD, Tile, TileCoord, TileField, TileFieldError, TileHandle, TileOffset};
