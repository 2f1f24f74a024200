use glam::{Mat4, Vec3};
use roamfield_kernel::Camera;

use crate::scene::{DrawList, MaterialKind, Role};

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 5.0, 5.0),
            target: Vec3::ZERO,
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl RenderView {
    /// Default projection looking through `camera`.
    pub fn from_camera(camera: &Camera) -> Self {
        Self {
            eye: camera.eye,
            target: camera.target,
            ..Self::default()
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), aspect, self.near, self.far)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads a draw list and a view configuration, then produces
/// output. It never sees the world itself, so it cannot mutate it.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(&mut self, scene: &DrawList, view: &RenderView) -> Self::Output;
}

/// Debug text renderer.
///
/// Produces a human-readable description of the frame. Used for CLI output,
/// logging, and testing the render interface.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    frames: u64,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&mut self, scene: &DrawList, view: &RenderView) -> String {
        self.frames += 1;
        let mut out = String::new();
        out.push_str(&format!("=== Frame (tick={}) ===\n", scene.tick));
        out.push_str(&format!(
            "Camera: eye=({:.2}, {:.2}, {:.2}) target=({:.2}, {:.2}, {:.2}) fov={:.0}\n",
            view.eye.x,
            view.eye.y,
            view.eye.z,
            view.target.x,
            view.target.y,
            view.target.z,
            view.fov_degrees
        ));

        let tiles: Vec<_> = scene.with_role(Role::Tile).collect();
        if let (Some(first), Some(last)) = (tiles.first(), tiles.last()) {
            out.push_str(&format!(
                "Tiles: {} from ({:.1}, {:.1}) to ({:.1}, {:.1})\n",
                tiles.len(),
                first.transform.position.x,
                first.transform.position.z,
                last.transform.position.x,
                last.transform.position.z
            ));
        }

        for item in scene.items().iter().filter(|i| i.role != Role::Tile) {
            let p = item.transform.position;
            let material = match item.material {
                MaterialKind::Flat => "flat",
                MaterialKind::Wireframe => "wire",
            };
            out.push_str(&format!(
                "  {:<8} pos=({:.2}, {:.2}, {:.2}) color={} {}\n",
                format!("{:?}", item.role),
                p.x,
                p.y,
                p.z,
                item.color,
                material
            ));
        }

        out
    }
}
