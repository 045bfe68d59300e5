use crate::instances::InstanceGroup;
use crate::math::Vec3;
use crate::sampling::palette::HIGHLIGHT;

/// Tracks the one ornament under the pointer and keeps colors consistent:
/// a previously highlighted instance always goes back to its build-time
/// color before the highlight moves or clears.
#[derive(Debug, Clone)]
pub struct HighlightController {
    highlighted: Option<usize>,
    color: Vec3,
}

impl Default for HighlightController {
    fn default() -> Self {
        Self::new(HIGHLIGHT)
    }
}

impl HighlightController {
    pub fn new(color: Vec3) -> Self {
        Self {
            highlighted: None,
            color,
        }
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    /// Apply this frame's hit-test result. Returns true when any color was
    /// written; repeated frames with the same result write nothing.
    pub fn update(&mut self, hit: Option<usize>, group: &mut InstanceGroup) -> bool {
        if hit == self.highlighted {
            return false;
        }

        if let Some(previous) = self.highlighted.take() {
            group.restore_color(previous);
        }
        if let Some(index) = hit {
            group.set_color(index, self.color);
            self.highlighted = Some(index);
        }
        true
    }

    /// Restore and clear any active highlight
    pub fn clear(&mut self, group: &mut InstanceGroup) -> bool {
        self.update(None, group)
    }

    /// Drop the highlight without touching colors. Used when the group it
    /// pointed into has been discarded.
    pub fn forget(&mut self) {
        self.highlighted = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instances::{GroupKind, InstanceTransform};

    const RED: Vec3 = Vec3::new(1.0, 0.0, 0.0);
    const GOLD: Vec3 = Vec3::new(1.0, 0.8, 0.2);
    const BLUE: Vec3 = Vec3::new(0.0, 0.0, 1.0);

    fn ornaments(colors: &[Vec3]) -> InstanceGroup {
        let mut group = InstanceGroup::new(GroupKind::Ornaments, colors.len());
        for (i, c) in colors.iter().enumerate() {
            group.init_instance(i, InstanceTransform::default(), *c, Vec3::ZERO);
        }
        group.seal();
        group.mark_colors_clean();
        group
    }

    #[test]
    fn test_scenario_sequence() {
        let mut group = ornaments(&[RED, GOLD, BLUE]);
        let mut hl = HighlightController::default();

        let mut index0 = Vec::new();
        let mut index1 = Vec::new();
        for hit in [Some(0), Some(0), Some(1), None] {
            hl.update(hit, &mut group);
            index0.push(group.color(0));
            index1.push(group.color(1));
        }

        assert_eq!(index0, vec![Vec3::ONE, Vec3::ONE, RED, RED]);
        assert_eq!(index1, vec![GOLD, GOLD, Vec3::ONE, GOLD]);
        assert_eq!(group.color(2), BLUE);
        assert_eq!(hl.highlighted(), None);
    }

    #[test]
    fn test_restores_original_not_current_color() {
        let mut group = ornaments(&[RED, GOLD, BLUE]);
        let mut hl = HighlightController::default();

        hl.update(Some(0), &mut group);
        hl.update(Some(1), &mut group);
        hl.update(None, &mut group);

        for i in 0..3 {
            assert_eq!(group.color(i), group.base_color(i));
        }
    }

    #[test]
    fn test_repeated_frames_write_nothing() {
        let mut group = ornaments(&[RED, GOLD]);
        let mut hl = HighlightController::default();

        assert!(hl.update(Some(1), &mut group));
        group.mark_colors_clean();
        assert!(!hl.update(Some(1), &mut group));
        assert!(!group.colors_dirty());

        assert!(hl.update(None, &mut group));
        group.mark_colors_clean();
        assert!(!hl.update(None, &mut group));
        assert!(!group.colors_dirty());
    }

    #[test]
    fn test_untouched_instances_never_change() {
        let colors = [RED, GOLD, BLUE, RED, GOLD];
        let mut group = ornaments(&colors);
        let mut hl = HighlightController::default();

        for hit in [Some(1), Some(3), None, Some(3), Some(1), None] {
            hl.update(hit, &mut group);
            for i in [0, 2, 4] {
                assert_eq!(group.color(i), colors[i]);
            }
        }
    }

    #[test]
    fn test_forget_leaves_colors() {
        let mut group = ornaments(&[RED]);
        let mut hl = HighlightController::default();
        hl.update(Some(0), &mut group);
        hl.forget();
        assert_eq!(hl.highlighted(), None);
        assert_eq!(group.color(0), Vec3::ONE);
    }

    #[test]
    #[should_panic]
    fn test_out_of_range_hit_panics() {
        let mut group = ornaments(&[RED]);
        let mut hl = HighlightController::default();
        hl.update(Some(4), &mut group);
    }
}
