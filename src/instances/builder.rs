use rand::Rng;
use crate::math::Vec3;
use crate::sampling::{sphere_uniform, ConeShape, Distribution, Palette, ScaleRange};
use super::group::{GroupKind, InstanceGroup, InstanceTransform};

/// How to lay out and color one instance group
#[derive(Debug, Clone, Copy)]
pub struct GroupRecipe {
    pub kind: GroupKind,
    pub count: usize,
    pub distribution: Distribution,
    pub scale: ScaleRange,
    /// Palette to draw per-instance colors from; white when absent
    pub palette: Option<Palette>,
    /// Whether instances get a random offset for the assembly animation
    pub assembles: bool,
}

impl GroupRecipe {
    pub fn foliage(count: usize) -> Self {
        Self {
            kind: GroupKind::Foliage,
            count,
            distribution: Distribution::ConeSpiral,
            scale: ScaleRange::new(0.18, 0.32),
            palette: Some(crate::sampling::palette::FOLIAGE),
            assembles: true,
        }
    }

    pub fn ornaments(count: usize) -> Self {
        Self {
            kind: GroupKind::Ornaments,
            count,
            distribution: Distribution::SurfaceScatter,
            scale: ScaleRange::new(0.22, 0.36),
            palette: Some(crate::sampling::palette::ORNAMENTS),
            assembles: true,
        }
    }

    pub fn gifts(count: usize) -> Self {
        Self {
            kind: GroupKind::Gifts,
            count,
            distribution: Distribution::SurfaceScatter,
            scale: ScaleRange::new(0.25, 0.4),
            palette: Some(crate::sampling::palette::GIFTS),
            assembles: true,
        }
    }
}

/// Fill every instance of `group` according to `recipe`.
///
/// Panics if the group capacity does not match the requested count, or if
/// the group was already built.
pub fn populate_group<R: Rng + ?Sized>(
    group: &mut InstanceGroup,
    recipe: &GroupRecipe,
    shape: &ConeShape,
    rng: &mut R,
) {
    assert_eq!(
        group.len(),
        recipe.count,
        "{} group capacity does not match requested count",
        recipe.kind.name()
    );

    for i in 0..recipe.count {
        let placement = recipe.distribution.sample(i, recipe.count, shape, &recipe.scale, rng);
        let color = match &recipe.palette {
            Some(palette) => palette.pick(rng),
            None => Vec3::ONE,
        };
        let offset = if recipe.assembles {
            sphere_uniform(rng)
        } else {
            Vec3::ZERO
        };
        group.init_instance(i, InstanceTransform::from(placement), color, offset);
    }

    group.seal();
}

/// Allocate and populate a fresh group
pub fn build_group<R: Rng + ?Sized>(recipe: &GroupRecipe, shape: &ConeShape, rng: &mut R) -> InstanceGroup {
    let mut group = InstanceGroup::new(recipe.kind, recipe.count);
    populate_group(&mut group, recipe, shape, rng);
    log::debug!("built {} group with {} instances", recipe.kind.name(), recipe.count);
    group
}

/// Single-instance group for the apex star, centered on its own origin so
/// the renderer can move it with a model matrix.
pub fn build_apex_group(scale: f32, color: Vec3) -> InstanceGroup {
    let mut group = InstanceGroup::new(GroupKind::Apex, 1);
    let transform = InstanceTransform {
        scale,
        ..Default::default()
    };
    group.init_instance(0, transform, color, Vec3::ZERO);
    group.seal();
    group
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::palette::ORNAMENTS;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    const SHAPE: ConeShape = ConeShape { height: 14.0, radius: 5.5 };

    #[test]
    fn test_build_produces_exact_count() {
        let mut rng = SmallRng::seed_from_u64(1);
        for n in [0, 1, 2, 17, 400] {
            let group = build_group(&GroupRecipe::foliage(n), &SHAPE, &mut rng);
            assert_eq!(group.len(), n);
            assert!(group.is_sealed());
        }
    }

    #[test]
    fn test_empty_group() {
        let mut rng = SmallRng::seed_from_u64(1);
        let group = build_group(&GroupRecipe::ornaments(0), &SHAPE, &mut rng);
        assert!(group.is_empty());
        assert!(group.instance_data().is_empty());
    }

    #[test]
    fn test_foliage_within_cone_band() {
        let mut rng = SmallRng::seed_from_u64(2);
        let n = 1000;
        let group = build_group(&GroupRecipe::foliage(n), &SHAPE, &mut rng);
        for (i, t) in group.transforms().iter().enumerate() {
            let r = SHAPE.radius_at(i as f32 / n as f32);
            let d = t.position.horizontal_length();
            assert!(d >= 0.5 * r - 1e-3 && d <= r + 1e-3);
            assert!(t.position.y >= 0.0 && t.position.y < SHAPE.height);
        }
    }

    #[test]
    fn test_ornament_colors_come_from_palette() {
        let mut rng = SmallRng::seed_from_u64(3);
        let group = build_group(&GroupRecipe::ornaments(100), &SHAPE, &mut rng);
        for i in 0..group.len() {
            assert!(ORNAMENTS.contains(group.color(i)));
            assert_eq!(group.color(i), group.base_color(i));
        }
    }

    #[test]
    fn test_assembling_groups_get_unit_offsets() {
        let mut rng = SmallRng::seed_from_u64(4);
        let group = build_group(&GroupRecipe::gifts(50), &SHAPE, &mut rng);
        for i in 0..group.len() {
            assert!((group.offset(i).length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_static_groups_have_no_offset() {
        let mut rng = SmallRng::seed_from_u64(4);
        let recipe = GroupRecipe {
            assembles: false,
            palette: None,
            ..GroupRecipe::gifts(10)
        };
        let group = build_group(&recipe, &SHAPE, &mut rng);
        for i in 0..group.len() {
            assert_eq!(group.offset(i), Vec3::ZERO);
            assert_eq!(group.color(i), Vec3::ONE);
        }
    }

    #[test]
    #[should_panic(expected = "capacity does not match")]
    fn test_capacity_mismatch_fails_fast() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut group = InstanceGroup::new(GroupKind::Ornaments, 5);
        populate_group(&mut group, &GroupRecipe::ornaments(6), &SHAPE, &mut rng);
    }

    #[test]
    fn test_apex_group() {
        let group = build_apex_group(0.9, Vec3::ONE);
        assert_eq!(group.len(), 1);
        assert_eq!(group.transform(0).position, Vec3::ZERO);
        assert_eq!(group.transform(0).scale, 0.9);
    }
}
