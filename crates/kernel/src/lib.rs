//! World Kernel: authoritative simulation state and tick stepping.
//!
//! # Invariants
//! - A tick runs kinematics, tile recentering, camera follow, then collision
//!   resolution, in that order.
//! - Given the same config and the same input sequence, every tick produces
//!   identical state (the recolor RNG is seeded).
//! - Motion is defined per tick, not per second. Running the loop faster makes
//!   the player faster.

pub mod camera;
pub mod collision;
pub mod config;
pub mod entity;
pub mod kinematics;
pub mod world;

pub use camera::{Camera, CameraRig};
pub use collision::CollisionOutcome;
pub use config::{BodyConfig, ConfigError, SimConfig};
pub use entity::{Body, Item, Obstacle, Player};
pub use world::{TickReport, World, WorldEvent};
