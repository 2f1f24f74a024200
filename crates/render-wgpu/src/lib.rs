//! wgpu render backend.
//!
//! Draws a [`DrawList`](roamfield_render::DrawList) with unlit flat colors:
//! boxes, spheres and quads as instanced meshes, wireframe items as line lists
//! rebuilt every frame.
//!
//! # Invariants
//! - Renderer never mutates world state.
//! - GPU resources are created once; per-frame data is written into
//!   preallocated buffers that only grow.

mod gpu;
mod mesh;
mod shaders;

pub use gpu::{FrameStats, WgpuFrame, WgpuRenderer};
