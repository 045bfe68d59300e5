use rand::Rng;
use crate::math::Vec3;

/// Fixed set of colors an instance or particle color is drawn from
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    colors: &'static [u32],
}

impl Palette {
    pub const fn new(colors: &'static [u32]) -> Self {
        Self { colors }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn get(&self, index: usize) -> Vec3 {
        Vec3::from_hex(self.colors[index])
    }

    /// Uniformly random palette entry
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        assert!(!self.colors.is_empty(), "cannot pick from an empty palette");
        self.get(rng.gen_range(0..self.colors.len()))
    }

    pub fn contains(&self, color: Vec3) -> bool {
        (0..self.len()).any(|i| self.get(i) == color)
    }
}

/// Needle greens, dark to bright
pub const FOLIAGE: Palette = Palette::new(&[0x0b3d1f, 0x14532d, 0x1f7a3a, 0x2e8b57, 0x3fa34d]);

/// Glass bauble colors
pub const ORNAMENTS: Palette = Palette::new(&[0xd42a2a, 0xffc53d, 0x2563eb, 0xc0c0c0, 0xb5179e]);

/// Wrapping paper colors for the small gift boxes
pub const GIFTS: Palette = Palette::new(&[0xe11d48, 0x16a34a, 0xf59e0b, 0xf8fafc, 0x7c3aed]);

/// Firework shell colors
pub const FIREWORKS: Palette = Palette::new(&[
    0xff3b3b, // red
    0xffa630, // orange
    0xffe14d, // yellow
    0x3bff7a, // green
    0x3bb5ff, // blue
    0xb26bff, // violet
    0xffffff, // white
]);

/// Pointer highlight color
pub const HIGHLIGHT: Vec3 = Vec3::ONE;

/// Apex star color
pub const STAR: u32 = 0xffd95a;

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_pick_stays_in_palette() {
        let mut rng = SmallRng::seed_from_u64(4);
        for _ in 0..200 {
            assert!(ORNAMENTS.contains(ORNAMENTS.pick(&mut rng)));
            assert!(FIREWORKS.contains(FIREWORKS.pick(&mut rng)));
        }
    }

    #[test]
    fn test_pick_reaches_every_entry() {
        let mut rng = SmallRng::seed_from_u64(8);
        let mut seen = vec![false; GIFTS.len()];
        for _ in 0..500 {
            let c = GIFTS.pick(&mut rng);
            let idx = (0..GIFTS.len()).position(|i| GIFTS.get(i) == c).unwrap();
            seen[idx] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_highlight_is_white() {
        assert_eq!(HIGHLIGHT, Vec3::from_hex(0xffffff));
    }
}
