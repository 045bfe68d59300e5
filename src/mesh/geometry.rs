use crate::math::Vec3;

/// A vertex with position and normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self { position, normal }
    }

    /// Layout: position(3) + normal(3) = 6 floats
    pub fn to_array(&self) -> [f32; 6] {
        [
            self.position.x, self.position.y, self.position.z,
            self.normal.x, self.normal.y, self.normal.z,
        ]
    }
}

/// Indexed triangle mesh shared by every instance of a group
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add vertices and return the starting index
    pub fn add_vertices(&mut self, verts: impl IntoIterator<Item = Vertex>) -> u32 {
        let start = self.vertices.len() as u32;
        self.vertices.extend(verts);
        start
    }

    pub fn add_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Add a quad as two triangles (CCW winding)
    pub fn add_quad(&mut self, a: u32, b: u32, c: u32, d: u32) {
        self.add_triangle(a, b, c);
        self.add_triangle(a, c, d);
    }

    /// Flat-shaded triangle: three fresh vertices sharing the face normal
    pub fn add_flat_triangle(&mut self, a: Vec3, b: Vec3, c: Vec3) {
        let normal = (b - a).cross(&(c - a)).normalize();
        let start = self.add_vertices([
            Vertex::new(a, normal),
            Vertex::new(b, normal),
            Vertex::new(c, normal),
        ]);
        self.add_triangle(start, start + 1, start + 2);
    }

    /// Largest distance of any vertex from the local origin
    pub fn bounding_radius(&self) -> f32 {
        self.vertices
            .iter()
            .map(|v| v.position.length())
            .fold(0.0, f32::max)
    }

    /// Get vertex buffer data as flat f32 array
    pub fn vertex_data(&self) -> Vec<f32> {
        self.vertices.iter().flat_map(|v| v.to_array()).collect()
    }

    pub fn index_data(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_to_array() {
        let arr = Vertex::new(Vec3::new(1.0, 2.0, 3.0), Vec3::UP).to_array();
        assert_eq!(arr, [1.0, 2.0, 3.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_flat_triangle_normal() {
        let mut mesh = Mesh::new();
        mesh.add_flat_triangle(Vec3::ZERO, Vec3::RIGHT, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert!((mesh.vertices[0].normal - Vec3::FORWARD).length() < 1e-6);
    }

    #[test]
    fn test_add_quad() {
        let mut mesh = Mesh::new();
        let start = mesh.add_vertices([
            Vertex::new(Vec3::ZERO, Vec3::UP),
            Vertex::new(Vec3::RIGHT, Vec3::UP),
            Vertex::new(Vec3::new(1.0, 0.0, 1.0), Vec3::UP),
            Vertex::new(Vec3::FORWARD, Vec3::UP),
        ]);
        mesh.add_quad(start, start + 1, start + 2, start + 3);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.vertex_data().len(), 4 * 6);
    }

    #[test]
    fn test_bounding_radius() {
        let mut mesh = Mesh::new();
        mesh.add_vertices([
            Vertex::new(Vec3::new(-1.0, 0.0, 0.0), Vec3::UP),
            Vertex::new(Vec3::new(0.0, 2.0, 0.0), Vec3::UP),
        ]);
        assert_eq!(mesh.bounding_radius(), 2.0);
        assert_eq!(Mesh::new().bounding_radius(), 0.0);
    }
}
