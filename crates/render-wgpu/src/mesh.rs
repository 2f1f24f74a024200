use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use roamfield_common::Shape;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct Vertex {
    pub position: [f32; 3],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

/// Which shared mesh an instance is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum MeshKind {
    Cube,
    Sphere,
    Quad,
}

impl MeshKind {
    pub const ALL: [MeshKind; 3] = [MeshKind::Cube, MeshKind::Sphere, MeshKind::Quad];

    pub fn for_shape(shape: &Shape) -> Self {
        match shape {
            Shape::Box { .. } => Self::Cube,
            Shape::Sphere { .. } => Self::Sphere,
            Shape::Plane { .. } => Self::Quad,
        }
    }
}

/// Scale that maps the unit mesh for `shape` onto its real dimensions.
pub(crate) fn shape_scale(shape: &Shape) -> Vec3 {
    match *shape {
        Shape::Box { size } => size,
        Shape::Sphere { radius } => Vec3::splat(radius),
        Shape::Plane { width, height } => Vec3::new(width, height, 1.0),
    }
}

/// Unit cube centered on the origin.
pub(crate) fn cube_mesh() -> (Vec<Vertex>, Vec<u16>) {
    let p = 0.5_f32;
    let vertices = (0..8)
        .map(|i| Vertex {
            position: [
                if i & 1 == 0 { -p } else { p },
                if i & 2 == 0 { -p } else { p },
                if i & 4 == 0 { -p } else { p },
            ],
        })
        .collect();
    #[rustfmt::skip]
    let indices: Vec<u16> = vec![
        1,3,7, 7,5,1, // +X
        0,4,6, 6,2,0, // -X
        2,6,7, 7,3,2, // +Y
        0,1,5, 5,4,0, // -Y
        4,5,7, 7,6,4, // +Z
        0,2,3, 3,1,0, // -Z
    ];
    (vertices, indices)
}

/// Unit-radius UV sphere.
pub(crate) fn sphere_mesh(segments: u16, rings: u16) -> (Vec<Vertex>, Vec<u16>) {
    let mut vertices = Vec::with_capacity(((rings + 1) * (segments + 1)) as usize);
    for r in 0..=rings {
        let theta = r as f32 / rings as f32 * std::f32::consts::PI;
        for s in 0..=segments {
            let phi = s as f32 / segments as f32 * std::f32::consts::TAU;
            vertices.push(Vertex {
                position: [
                    -phi.cos() * theta.sin(),
                    theta.cos(),
                    phi.sin() * theta.sin(),
                ],
            });
        }
    }

    let stride = segments + 1;
    let mut indices = Vec::with_capacity((rings * segments * 6) as usize);
    for r in 0..rings {
        for s in 0..segments {
            let a = r * stride + s;
            let b = a + stride;
            indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
        }
    }
    (vertices, indices)
}

/// Unit quad in the XY plane.
pub(crate) fn quad_mesh() -> (Vec<Vertex>, Vec<u16>) {
    let p = 0.5_f32;
    let vertices = vec![
        Vertex { position: [-p, -p, 0.0] },
        Vertex { position: [p, -p, 0.0] },
        Vertex { position: [p, p, 0.0] },
        Vertex { position: [-p, p, 0.0] },
    ];
    (vertices, vec![0, 1, 2, 2, 3, 0])
}

/// Local-space line segments (pairs of points) outlining `shape`.
///
/// Planes get their border plus one diagonal. Boxes get their twelve edges.
/// Spheres get three great circles.
pub(crate) fn wireframe_segments(shape: &Shape) -> Vec<Vec3> {
    let h = shape.half_extents();
    match *shape {
        Shape::Plane { .. } => {
            let c = [
                Vec3::new(-h.x, -h.y, 0.0),
                Vec3::new(h.x, -h.y, 0.0),
                Vec3::new(h.x, h.y, 0.0),
                Vec3::new(-h.x, h.y, 0.0),
            ];
            vec![c[0], c[1], c[1], c[2], c[2], c[3], c[3], c[0], c[0], c[2]]
        }
        Shape::Box { .. } => {
            let corner = |i: usize| {
                Vec3::new(
                    if i & 1 == 0 { -h.x } else { h.x },
                    if i & 2 == 0 { -h.y } else { h.y },
                    if i & 4 == 0 { -h.z } else { h.z },
                )
            };
            let mut out = Vec::with_capacity(24);
            for i in 0..8usize {
                for bit in [1usize, 2, 4] {
                    if i & bit == 0 {
                        out.push(corner(i));
                        out.push(corner(i | bit));
                    }
                }
            }
            out
        }
        Shape::Sphere { radius } => {
            const STEPS: usize = 24;
            let mut out = Vec::with_capacity(STEPS * 6);
            for axis in 0..3 {
                for k in 0..STEPS {
                    for j in [k, k + 1] {
                        let a = j as f32 / STEPS as f32 * std::f32::consts::TAU;
                        let (s, c) = a.sin_cos();
                        out.push(
                            match axis {
                                0 => Vec3::new(c, s, 0.0),
                                1 => Vec3::new(c, 0.0, s),
                                _ => Vec3::new(0.0, c, s),
                            } * radius,
                        );
                    }
                }
            }
            out
        }
    }
}

/// World-space line vertices for `shape` placed by `model`.
pub(crate) fn wireframe_lines(shape: &Shape, model: Mat4, color: [f32; 4]) -> Vec<LineVertex> {
    wireframe_segments(shape)
        .into_iter()
        .map(|p| LineVertex {
            position: model.transform_point3(p).to_array(),
            color,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    #[test]
    fn cube_mesh_is_closed() {
        let (verts, indices) = cube_mesh();
        assert_eq!(verts.len(), 8);
        assert_eq!(indices.len(), 36);
        assert!(indices.iter().all(|&i| (i as usize) < verts.len()));
        for v in &verts {
            assert!(v.position.iter().all(|c| c.abs() == 0.5));
        }
    }

    #[test]
    fn sphere_vertices_on_unit_sphere() {
        let (verts, indices) = sphere_mesh(16, 16);
        assert_eq!(verts.len(), 17 * 17);
        assert_eq!(indices.len(), 16 * 16 * 6);
        assert!(indices.iter().all(|&i| (i as usize) < verts.len()));
        for v in &verts {
            let len = Vec3::from_array(v.position).length();
            assert!((len - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn quad_is_flat() {
        let (verts, indices) = quad_mesh();
        assert_eq!(indices.len(), 6);
        assert!(verts.iter().all(|v| v.position[2] == 0.0));
    }

    #[test]
    fn plane_outline_has_border_and_diagonal() {
        let segs = wireframe_segments(&Shape::Plane {
            width: 20.0,
            height: 20.0,
        });
        assert_eq!(segs.len(), 10);
        assert!(segs.contains(&Vec3::new(10.0, 10.0, 0.0)));
        assert!(segs.contains(&Vec3::new(-10.0, -10.0, 0.0)));
    }

    #[test]
    fn box_outline_has_twelve_edges() {
        let segs = wireframe_segments(&Shape::cube(2.0));
        assert_eq!(segs.len(), 24);
        for pair in segs.chunks(2) {
            assert!(((pair[1] - pair[0]).length() - 2.0).abs() < 1e-6);
        }
    }

    #[test]
    fn floor_tile_lines_lie_on_ground() {
        let model = Mat4::from_rotation_translation(
            Quat::from_rotation_x(std::f32::consts::FRAC_PI_2),
            Vec3::new(10.0, 0.0, -10.0),
        );
        let lines = wireframe_lines(
            &Shape::Plane {
                width: 20.0,
                height: 20.0,
            },
            model,
            [1.0; 4],
        );
        for v in &lines {
            assert!(v.position[1].abs() < 1e-5);
            assert!(v.position[0] >= -1e-4 && v.position[0] <= 20.0 + 1e-4);
            assert!(v.position[2] >= -20.0 - 1e-4 && v.position[2] <= 1e-4);
        }
    }

    #[test]
    fn mesh_kind_per_shape() {
        assert_eq!(MeshKind::for_shape(&Shape::cube(1.0)), MeshKind::Cube);
        assert_eq!(
            MeshKind::for_shape(&Shape::Sphere { radius: 0.3 }),
            MeshKind::Sphere
        );
        assert_eq!(shape_scale(&Shape::Sphere { radius: 0.3 }), Vec3::splat(0.3));
    }
}
