use std::f32::consts::TAU;
use rand::Rng;
use crate::math::Vec3;
use super::fireworks::push_point;

/// Fall speed range, units per frame
const FALL_SPEED: (f32, f32) = (0.02, 0.07);

/// Horizontal sway amplitude range
const SWAY: (f32, f32) = (0.005, 0.02);

/// Sway phase advance per frame
const SWAY_RATE: f32 = 0.02;

const FLAKE_SIZE: (f32, f32) = (2.5, 5.0);
const FLAKE_ALPHA: f32 = 0.8;

#[derive(Debug, Clone, Copy)]
struct Snowflake {
    position: Vec3,
    speed: f32,
    phase: f32,
    sway: f32,
    size: f32,
}

/// Where flakes live: a square column `area` wide centered on the tree
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnowBounds {
    pub area: f32,
    pub ceiling: f32,
}

impl Default for SnowBounds {
    fn default() -> Self {
        Self {
            area: 60.0,
            ceiling: 40.0,
        }
    }
}

/// Fixed-size field of falling snow. Changing the flake count means building
/// a new field.
pub struct SnowField {
    flakes: Vec<Snowflake>,
    bounds: SnowBounds,
}

impl SnowField {
    pub fn new<R: Rng + ?Sized>(count: usize, bounds: SnowBounds, rng: &mut R) -> Self {
        let flakes = (0..count)
            .map(|_| {
                let y = rng.gen_range(0.0..=bounds.ceiling);
                Snowflake {
                    position: Self::random_column(&bounds, rng) + Vec3::new(0.0, y, 0.0),
                    speed: rng.gen_range(FALL_SPEED.0..FALL_SPEED.1),
                    phase: rng.gen_range(0.0..TAU),
                    sway: rng.gen_range(SWAY.0..SWAY.1),
                    size: rng.gen_range(FLAKE_SIZE.0..FLAKE_SIZE.1),
                }
            })
            .collect();

        Self { flakes, bounds }
    }

    fn random_column<R: Rng + ?Sized>(bounds: &SnowBounds, rng: &mut R) -> Vec3 {
        let half = bounds.area * 0.5;
        Vec3::new(rng.gen_range(-half..=half), 0.0, rng.gen_range(-half..=half))
    }

    pub fn count(&self) -> usize {
        self.flakes.len()
    }

    pub fn bounds(&self) -> &SnowBounds {
        &self.bounds
    }

    /// Fall and sway one frame; flakes that reach the ground re-enter at the
    /// ceiling in a new column.
    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for flake in &mut self.flakes {
            flake.phase = (flake.phase + SWAY_RATE) % TAU;
            flake.position.y -= flake.speed;
            flake.position.x += flake.phase.sin() * flake.sway;
            flake.position.z += flake.phase.cos() * flake.sway;

            if flake.position.y < 0.0 {
                flake.position = Self::random_column(&self.bounds, rng)
                    + Vec3::new(0.0, self.bounds.ceiling, 0.0);
            }
        }
    }

    /// Point sprite data, same layout as the firework particles
    pub fn particle_data(&self) -> Vec<f32> {
        let mut data = Vec::with_capacity(self.flakes.len() * 8);
        for flake in &self.flakes {
            push_point(&mut data, flake.position, flake.size, FLAKE_ALPHA, Vec3::ONE);
        }
        data
    }
}
