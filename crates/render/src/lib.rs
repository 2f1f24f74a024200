//! Rendering Adapter: renderer-agnostic interface.
//!
//! # Invariants
//! - Renderer cannot mutate world truth directly.
//! - Render state derives from world state and view.
//!
//! The kernel's [`World`](roamfield_kernel::World) is flattened into a
//! [`DrawList`] of primitives each frame; backends only ever see that list and
//! a [`RenderView`]. [`DebugTextRenderer`] is the headless backend used by the
//! CLI and tests.

mod renderer;
mod scene;

pub use renderer::{DebugTextRenderer, RenderView, Renderer};
pub use scene::{DrawItem, DrawList, MaterialKind, Role};

pub fn crate_info() -> &'static str {
    "roamfield-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
