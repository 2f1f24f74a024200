use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::Transform;

/// Renderable shape parameters, centered on the local origin.
///
/// Planes lie in the local XY plane; rotate them a quarter turn about X to
/// get a floor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Box { size: Vec3 },
    Sphere { radius: f32 },
    Plane { width: f32, height: f32 },
}

impl Shape {
    pub fn cube(edge: f32) -> Self {
        Self::Box {
            size: Vec3::splat(edge),
        }
    }

    /// Half extents of the local-space bounding box.
    pub fn half_extents(&self) -> Vec3 {
        match *self {
            Self::Box { size } => size * 0.5,
            Self::Sphere { radius } => Vec3::splat(radius),
            Self::Plane { width, height } => Vec3::new(width * 0.5, height * 0.5, 0.0),
        }
    }
}

/// Axis-aligned bounding box in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_center_half_extents(center: Vec3, half: Vec3) -> Self {
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// World-space box enclosing `shape` placed by `transform`.
    ///
    /// The eight corners of the local bounding box are transformed and the
    /// result is the box around them, so rotated shapes get a looser fit.
    pub fn from_shape(shape: &Shape, transform: &Transform) -> Self {
        let half = shape.half_extents();
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for i in 0..8 {
            let corner = Vec3::new(
                if i & 1 == 0 { -half.x } else { half.x },
                if i & 2 == 0 { -half.y } else { half.y },
                if i & 4 == 0 { -half.z } else { half.z },
            );
            let world =
                transform.position + transform.rotation * (corner * transform.scale);
            min = min.min(world);
            max = max.max(world);
        }
        Self { min, max }
    }

    /// Overlap test. Boxes sharing a face or edge count as intersecting.
    pub fn intersects(&self, other: &Aabb) -> bool {
        !(other.max.x < self.min.x
            || other.min.x > self.max.x
            || other.max.y < self.min.y
            || other.min.y > self.max.y
            || other.max.z < self.min.z
            || other.min.z > self.max.z)
    }

    pub fn contains_point(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-5
    }

    #[test]
    fn cube_box_around_position() {
        let t = Transform::from_position(Vec3::new(0.0, 0.5, 0.0));
        let b = Aabb::from_shape(&Shape::cube(1.0), &t);
        assert_eq!(b.min, Vec3::new(-0.5, 0.0, -0.5));
        assert_eq!(b.max, Vec3::new(0.5, 1.0, 0.5));
    }

    #[test]
    fn sphere_box_uses_radius() {
        let t = Transform::from_position(Vec3::new(5.0, 0.3, 5.0));
        let b = Aabb::from_shape(&Shape::Sphere { radius: 0.3 }, &t);
        assert!(approx(b.min, Vec3::new(4.7, 0.0, 4.7)));
        assert!(approx(b.max, Vec3::new(5.3, 0.6, 5.3)));
    }

    #[test]
    fn rotated_plane_lies_flat() {
        let t = Transform::default()
            .with_rotation(Quat::from_rotation_x(std::f32::consts::FRAC_PI_2));
        let b = Aabb::from_shape(
            &Shape::Plane {
                width: 20.0,
                height: 20.0,
            },
            &t,
        );
        assert!(b.size().y.abs() < 1e-4);
        assert!(approx(b.size(), Vec3::new(20.0, 0.0, 20.0)));
    }

    #[test]
    fn scale_stretches_box() {
        let t = Transform {
            scale: Vec3::new(2.0, 1.0, 1.0),
            ..Transform::default()
        };
        let b = Aabb::from_shape(&Shape::cube(1.0), &t);
        assert_eq!(b.size(), Vec3::new(2.0, 1.0, 1.0));
    }

    #[test]
    fn touching_faces_intersect() {
        let a = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn separated_boxes_do_not_intersect() {
        let a = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::new(Vec3::new(1.01, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
        assert!(!a.intersects(&b));
        let c = Aabb::new(Vec3::new(0.0, 0.0, -3.0), Vec3::new(1.0, 1.0, -2.0));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn contains_point_is_inclusive() {
        let a = Aabb::from_center_half_extents(Vec3::ZERO, Vec3::splat(1.0));
        assert!(a.contains_point(Vec3::ONE));
        assert!(a.contains_point(Vec3::ZERO));
        assert!(!a.contains_point(Vec3::new(1.5, 0.0, 0.0)));
        assert_eq!(a.center(), Vec3::ZERO);
    }
}
