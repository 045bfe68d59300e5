pub mod geometry;
pub mod primitives;

pub use geometry::{Mesh, Vertex};

use crate::instances::GroupKind;

/// Mesh shared by every instance of a group
pub fn group_mesh(kind: GroupKind) -> Mesh {
    match kind {
        GroupKind::Foliage => primitives::tetrahedron(1.0),
        GroupKind::Ornaments => primitives::uv_sphere(1.0, 16, 12),
        GroupKind::Gifts => primitives::cube(1.2),
        GroupKind::Apex => primitives::star(5, 1.0, 0.45, 0.25),
    }
}
