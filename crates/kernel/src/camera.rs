use glam::{Mat4, Vec3};

/// Eye position and look-at target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
}

impl Camera {
    pub fn look_at(eye: Vec3, target: Vec3) -> Self {
        Self { eye, target }
    }

    /// Unit view direction. Falls back to −Z when eye and target coincide.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.eye).try_normalize().unwrap_or(Vec3::NEG_Z)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }
}

/// Rigid follow: the camera sits at a fixed offset from the player and looks
/// straight at it. No smoothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRig {
    pub offset: Vec3,
}

impl CameraRig {
    pub fn new(offset: Vec3) -> Self {
        Self { offset }
    }

    pub fn follow(&self, camera: &mut Camera, player: Vec3) {
        camera.eye = player + self.offset;
        camera.target = player;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follow_applies_offset_and_aims_at_player() {
        let rig = CameraRig::new(Vec3::new(0.0, 5.0, 5.0));
        let mut cam = Camera::look_at(Vec3::new(0.0, 5.0, 5.0), Vec3::ZERO);
        let player = Vec3::new(-12.0, 0.5, 33.0);
        rig.follow(&mut cam, player);
        assert_eq!(cam.eye, Vec3::new(-12.0, 5.5, 38.0));
        assert_eq!(cam.target, player);
    }

    #[test]
    fn forward_points_at_target() {
        let cam = Camera::look_at(Vec3::new(0.0, 5.0, 5.0), Vec3::new(0.0, 0.0, 0.0));
        let f = cam.forward();
        assert!((f.length() - 1.0).abs() < 1e-6);
        assert!(f.y < 0.0 && f.z < 0.0);
    }

    #[test]
    fn degenerate_forward_falls_back() {
        let cam = Camera::look_at(Vec3::ONE, Vec3::ONE);
        assert_eq!(cam.forward(), Vec3::NEG_Z);
    }

    #[test]
    fn view_matrix_is_finite() {
        let cam = Camera::look_at(Vec3::new(0.0, 5.0, 5.0), Vec3::new(0.0, 0.5, 0.0));
        let m = cam.view_matrix();
        assert!(m.is_finite());
    }
}
