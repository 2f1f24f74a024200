//! Developer Tooling: scene inspector.
//!
//! # Invariants
//! - Tools only read the world.

mod inspector;

pub use inspector::{SceneInspector, SceneSummary};

pub fn crate_info() -> &'static str {
    "roamfield-tools v0.1.0"
}
