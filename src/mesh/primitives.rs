//! Small meshes instanced across the tree
//!
//! Every primitive is centered on its local origin so the per-instance
//! displacement and the picking spheres share the same center.

use std::f32::consts::{PI, TAU};
use crate::math::Vec3;
use super::geometry::{Mesh, Vertex};

/// Flat triangle whose normal is flipped, if needed, to face away from the origin
fn add_outward_triangle(mesh: &mut Mesh, a: Vec3, b: Vec3, c: Vec3) {
    let normal = (b - a).cross(&(c - a));
    let centroid = (a + b + c).scale(1.0 / 3.0);
    if normal.dot(&centroid) < 0.0 {
        mesh.add_flat_triangle(a, c, b);
    } else {
        mesh.add_flat_triangle(a, b, c);
    }
}

/// Regular tetrahedron with circumradius `size`; the foliage needle cluster
pub fn tetrahedron(size: f32) -> Mesh {
    let s = size / 3.0f32.sqrt();
    let v = [
        Vec3::new(s, s, s),
        Vec3::new(-s, -s, s),
        Vec3::new(-s, s, -s),
        Vec3::new(s, -s, -s),
    ];

    let mut mesh = Mesh::new();
    for [a, b, c] in [[0, 1, 2], [0, 1, 3], [0, 2, 3], [1, 2, 3]] {
        add_outward_triangle(&mut mesh, v[a], v[b], v[c]);
    }
    mesh
}

/// Smooth UV sphere; the glass bauble
pub fn uv_sphere(radius: f32, segments: usize, rings: usize) -> Mesh {
    let segments = segments.max(3);
    let rings = rings.max(2);
    let mut mesh = Mesh::new();

    for ring in 0..=rings {
        let phi = ring as f32 / rings as f32 * PI;
        for seg in 0..=segments {
            let theta = seg as f32 / segments as f32 * TAU;
            let normal = Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin());
            mesh.add_vertices([Vertex::new(normal.scale(radius), normal)]);
        }
    }

    let stride = (segments + 1) as u32;
    for ring in 0..rings as u32 {
        for seg in 0..segments as u32 {
            let a = ring * stride + seg;
            let b = a + stride;
            mesh.add_quad(a, a + 1, b + 1, b);
        }
    }

    mesh
}

/// Axis-aligned cube with edge length `size`; the gift box
pub fn cube(size: f32) -> Mesh {
    let h = size * 0.5;
    let mut mesh = Mesh::new();

    let faces = [Vec3::RIGHT, Vec3::UP, Vec3::FORWARD];
    for axis in faces {
        for sign in [1.0, -1.0] {
            let n = axis.scale(sign);
            // Two in-plane axes perpendicular to the face normal
            let u = if axis == Vec3::UP { Vec3::RIGHT } else { Vec3::UP };
            let w = n.cross(&u);
            let center = n.scale(h);
            let corners = [
                center + (u + w).scale(h),
                center + (u - w).scale(h),
                center + (-u - w).scale(h),
                center + (w - u).scale(h),
            ];
            add_outward_triangle(&mut mesh, corners[0], corners[1], corners[2]);
            add_outward_triangle(&mut mesh, corners[0], corners[2], corners[3]);
        }
    }

    mesh
}

/// Extruded star lying in the XY plane; the apex marker
pub fn star(points: usize, outer: f32, inner: f32, depth: f32) -> Mesh {
    let points = points.max(3);
    let rim: Vec<Vec3> = (0..points * 2)
        .map(|i| {
            let angle = i as f32 / (points * 2) as f32 * TAU + PI * 0.5;
            let r = if i % 2 == 0 { outer } else { inner };
            Vec3::new(angle.cos() * r, angle.sin() * r, 0.0)
        })
        .collect();

    let front = Vec3::new(0.0, 0.0, depth);
    let back = Vec3::new(0.0, 0.0, -depth);
    let mut mesh = Mesh::new();

    for i in 0..rim.len() {
        let a = rim[i];
        let b = rim[(i + 1) % rim.len()];
        add_outward_triangle(&mut mesh, front, a, b);
        add_outward_triangle(&mut mesh, back, b, a);
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normals_face_outward(mesh: &Mesh) -> bool {
        mesh.indices.chunks(3).all(|tri| {
            let v: Vec<_> = tri.iter().map(|i| mesh.vertices[*i as usize]).collect();
            let centroid = (v[0].position + v[1].position + v[2].position).scale(1.0 / 3.0);
            v[0].normal.dot(&centroid) >= -1e-5
        })
    }

    #[test]
    fn test_tetrahedron() {
        let mesh = tetrahedron(1.0);
        assert_eq!(mesh.triangle_count(), 4);
        assert!((mesh.bounding_radius() - 1.0).abs() < 1e-5);
        assert!(normals_face_outward(&mesh));
    }

    #[test]
    fn test_sphere_vertices_on_radius() {
        let mesh = uv_sphere(0.5, 16, 12);
        assert_eq!(mesh.vertex_count(), 17 * 13);
        assert_eq!(mesh.triangle_count(), 16 * 12 * 2);
        for v in &mesh.vertices {
            assert!((v.position.length() - 0.5).abs() < 1e-5);
        }
        assert!(mesh.indices.iter().all(|i| (*i as usize) < mesh.vertex_count()));
    }

    #[test]
    fn test_cube() {
        let mesh = cube(2.0);
        assert_eq!(mesh.triangle_count(), 12);
        assert!((mesh.bounding_radius() - 3.0f32.sqrt()).abs() < 1e-5);
        assert!(normals_face_outward(&mesh));
        for v in &mesh.vertices {
            let p = v.position;
            assert!(p.x.abs() <= 1.0 + 1e-5 && p.y.abs() <= 1.0 + 1e-5 && p.z.abs() <= 1.0 + 1e-5);
        }
    }

    #[test]
    fn test_star() {
        let mesh = star(5, 1.0, 0.45, 0.2);
        assert_eq!(mesh.triangle_count(), 20);
        assert!((mesh.bounding_radius() - 1.0).abs() < 1e-5);
        // First tip points straight up
        assert!(mesh.vertices.iter().any(|v| (v.position - Vec3::UP).length() < 1e-5));
    }
}
