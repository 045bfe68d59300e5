use crate::math::{Mat4, Vec3};
use crate::sampling::Placement;

/// Which part of the scene a group draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKind {
    Foliage,
    Ornaments,
    Gifts,
    Apex,
}

impl GroupKind {
    pub fn name(&self) -> &'static str {
        match self {
            GroupKind::Foliage => "foliage",
            GroupKind::Ornaments => "ornaments",
            GroupKind::Gifts => "gifts",
            GroupKind::Apex => "apex",
        }
    }
}

/// Transform of a single instance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstanceTransform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: f32,
}

impl Default for InstanceTransform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: 1.0,
        }
    }
}

impl From<Placement> for InstanceTransform {
    fn from(p: Placement) -> Self {
        Self {
            position: p.position,
            rotation: p.rotation,
            scale: p.scale,
        }
    }
}

impl InstanceTransform {
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_trs(self.position, self.rotation, self.scale)
    }
}

/// Fixed-capacity batch of instances sharing one mesh.
///
/// The instance count never changes after construction; only transforms and
/// live colors are written in place. Base colors and random offsets are set
/// once by the population builder and are read-only afterwards.
#[derive(Debug, Clone)]
pub struct InstanceGroup {
    kind: GroupKind,
    transforms: Vec<InstanceTransform>,
    /// Colors assigned at build time, used to restore after highlighting
    base_colors: Vec<Vec3>,
    /// Colors currently shown
    colors: Vec<Vec3>,
    /// Unit-sphere displacement direction per instance
    offsets: Vec<Vec3>,
    colors_dirty: bool,
    sealed: bool,
}

impl InstanceGroup {
    /// Allocate a group of `capacity` identity instances, white, with no offset
    pub fn new(kind: GroupKind, capacity: usize) -> Self {
        Self {
            kind,
            transforms: vec![InstanceTransform::default(); capacity],
            base_colors: vec![Vec3::ONE; capacity],
            colors: vec![Vec3::ONE; capacity],
            offsets: vec![Vec3::ZERO; capacity],
            colors_dirty: true,
            sealed: false,
        }
    }

    pub fn kind(&self) -> GroupKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    pub fn transform(&self, index: usize) -> &InstanceTransform {
        &self.transforms[index]
    }

    pub fn transforms(&self) -> &[InstanceTransform] {
        &self.transforms
    }

    pub fn set_transform(&mut self, index: usize, transform: InstanceTransform) {
        self.transforms[index] = transform;
    }

    pub fn offset(&self, index: usize) -> Vec3 {
        self.offsets[index]
    }

    pub fn color(&self, index: usize) -> Vec3 {
        self.colors[index]
    }

    pub fn base_color(&self, index: usize) -> Vec3 {
        self.base_colors[index]
    }

    /// Write the live color of one instance and flag the color buffer for upload
    pub fn set_color(&mut self, index: usize, color: Vec3) {
        self.colors[index] = color;
        self.colors_dirty = true;
    }

    /// Put an instance back to the color it was built with
    pub fn restore_color(&mut self, index: usize) {
        let base = self.base_colors[index];
        self.set_color(index, base);
    }

    /// Assign build-time data for one instance. Only valid before `seal`.
    pub(crate) fn init_instance(
        &mut self,
        index: usize,
        transform: InstanceTransform,
        color: Vec3,
        offset: Vec3,
    ) {
        assert!(!self.sealed, "{} group is already built", self.kind.name());
        self.transforms[index] = transform;
        self.base_colors[index] = color;
        self.colors[index] = color;
        self.offsets[index] = offset;
    }

    pub(crate) fn seal(&mut self) {
        self.sealed = true;
        self.colors_dirty = true;
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    pub fn colors_dirty(&self) -> bool {
        self.colors_dirty
    }

    /// Called by the renderer after the color buffer has been uploaded
    pub fn mark_colors_clean(&mut self) {
        self.colors_dirty = false;
    }

    /// Host-side mirror of the vertex displacement: where instance `index`
    /// currently sits given the explode factor and displacement scale.
    pub fn displaced_position(&self, index: usize, explode_factor: f32, displacement: f32) -> Vec3 {
        let t = &self.transforms[index];
        let local = self.offsets[index].scale(explode_factor * displacement);
        t.matrix().transform_point(local)
    }

    /// Per-instance static data for GPU upload.
    /// Layout: model matrix(16) + random offset(3) = 19 floats per instance
    pub fn instance_data(&self) -> Vec<f32> {
        let mut data = Vec::with_capacity(self.len() * 19);
        for (t, offset) in self.transforms.iter().zip(&self.offsets) {
            data.extend_from_slice(t.matrix().as_slice());
            data.extend_from_slice(&offset.to_array());
        }
        data
    }

    /// Live colors for GPU upload, 3 floats per instance
    pub fn color_data(&self) -> Vec<f32> {
        self.colors.iter().flat_map(|c| c.to_array()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_group_has_fixed_capacity() {
        let group = InstanceGroup::new(GroupKind::Ornaments, 12);
        assert_eq!(group.len(), 12);
        assert!(!group.is_sealed());
        assert!(group.colors_dirty());
    }

    #[test]
    fn test_set_and_restore_color() {
        let mut group = InstanceGroup::new(GroupKind::Ornaments, 2);
        group.init_instance(0, InstanceTransform::default(), Vec3::new(1.0, 0.0, 0.0), Vec3::ZERO);
        group.seal();
        group.mark_colors_clean();

        group.set_color(0, Vec3::ONE);
        assert!(group.colors_dirty());
        assert_eq!(group.color(0), Vec3::ONE);
        assert_eq!(group.base_color(0), Vec3::new(1.0, 0.0, 0.0));

        group.restore_color(0);
        assert_eq!(group.color(0), Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    #[should_panic]
    fn test_color_write_out_of_range_panics() {
        let mut group = InstanceGroup::new(GroupKind::Gifts, 1);
        group.set_color(1, Vec3::ONE);
    }

    #[test]
    #[should_panic(expected = "already built")]
    fn test_sealed_group_rejects_init() {
        let mut group = InstanceGroup::new(GroupKind::Gifts, 1);
        group.seal();
        group.init_instance(0, InstanceTransform::default(), Vec3::ONE, Vec3::ZERO);
    }

    #[test]
    fn test_displaced_position() {
        let mut group = InstanceGroup::new(GroupKind::Foliage, 1);
        let t = InstanceTransform {
            position: Vec3::new(0.0, 2.0, 0.0),
            rotation: Vec3::ZERO,
            scale: 0.5,
        };
        group.init_instance(0, t, Vec3::ONE, Vec3::RIGHT);
        group.seal();

        // Fully assembled: sits on its authored position
        assert_eq!(group.displaced_position(0, 0.0, 20.0), Vec3::new(0.0, 2.0, 0.0));
        // Fully dispersed: offset is in local space so it picks up the scale
        let p = group.displaced_position(0, 1.0, 20.0);
        assert!((p - Vec3::new(10.0, 2.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_instance_data_layout() {
        let group = InstanceGroup::new(GroupKind::Foliage, 3);
        assert_eq!(group.instance_data().len(), 3 * 19);
        assert_eq!(group.color_data().len(), 3 * 3);
    }
}
