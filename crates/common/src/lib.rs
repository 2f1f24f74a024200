//! Shared value types used by every roamfield crate.
//!
//! # Invariants
//! - Types here are plain data: no simulation logic, no I/O.

mod geometry;
mod types;

pub use geometry::{Aabb, Shape};
pub use types::{Color, Transform};
