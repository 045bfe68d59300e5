//! Spatial distributions used to place instances and particles.
//!
//! All samplers are pure given their random source: nothing is retained
//! between calls, so the same seeded RNG reproduces the same layout.

use std::f32::consts::TAU;
use rand::Rng;
use crate::math::Vec3;

/// Number of full turns the foliage helix makes from base to apex
pub const SPIRAL_TURNS: f32 = 40.0;

/// Maximum angular jitter (radians, either side) added to the helix angle
pub const SPIRAL_JITTER: f32 = 0.15;

/// Inner edge of the foliage band as a fraction of the cone radius
pub const INNER_BAND: f32 = 0.5;

/// Cone the tree is built around: apex at `height`, base of `radius` at y = 0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConeShape {
    pub height: f32,
    pub radius: f32,
}

impl ConeShape {
    pub fn new(height: f32, radius: f32) -> Self {
        Self { height, radius }
    }

    /// Radius of the cone surface at a height ratio in [0, 1]
    pub fn radius_at(&self, ratio: f32) -> f32 {
        (1.0 - ratio) * self.radius
    }
}

/// Inclusive-exclusive range an instance scale is drawn from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleRange {
    pub min: f32,
    pub max: f32,
}

impl ScaleRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub const fn fixed(value: f32) -> Self {
        Self { min: value, max: value }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.max > self.min {
            rng.gen_range(self.min..self.max)
        } else {
            self.min
        }
    }
}

/// Position, orientation (XYZ euler radians) and uniform scale of one instance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: f32,
}

/// Which distribution a group of instances is laid out with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Distribution {
    /// Rising helix through the cone volume, ordered by index
    ConeSpiral,
    /// Order-independent scatter over the cone surface
    SurfaceScatter,
}

impl Distribution {
    pub fn sample<R: Rng + ?Sized>(
        &self,
        index: usize,
        count: usize,
        shape: &ConeShape,
        scale: &ScaleRange,
        rng: &mut R,
    ) -> Placement {
        match self {
            Distribution::ConeSpiral => cone_spiral(index, count, shape, scale, rng),
            Distribution::SurfaceScatter => surface_scatter(shape, scale, rng),
        }
    }
}

/// Place instance `index` of `count` on a helix rising through the cone.
///
/// The angle advances at a fixed rate per index, so the turns tighten as the
/// radius shrinks toward the apex. Radial placement lands in the band
/// `[0.5r, r]` so the foliage has depth instead of being a shell.
pub fn cone_spiral<R: Rng + ?Sized>(
    index: usize,
    count: usize,
    shape: &ConeShape,
    scale: &ScaleRange,
    rng: &mut R,
) -> Placement {
    debug_assert!(index < count, "spiral index {} out of range {}", index, count);

    let ratio = index as f32 / count as f32;
    let height = ratio * shape.height;
    let radius = shape.radius_at(ratio);

    let angle = ratio * SPIRAL_TURNS * TAU + rng.gen_range(-SPIRAL_JITTER..=SPIRAL_JITTER);
    let band = rng.gen_range(INNER_BAND..=1.0) * radius;

    Placement {
        position: Vec3::new(angle.cos() * band, height, angle.sin() * band),
        rotation: random_rotation(rng),
        scale: scale.sample(rng),
    }
}

/// Place an instance at a uniformly random height on the cone surface with a
/// uniformly random azimuth.
pub fn surface_scatter<R: Rng + ?Sized>(
    shape: &ConeShape,
    scale: &ScaleRange,
    rng: &mut R,
) -> Placement {
    let ratio: f32 = rng.gen();
    let height = ratio * shape.height;
    let radius = shape.radius_at(ratio);
    let angle = rng.gen_range(0.0..TAU);

    Placement {
        position: Vec3::new(angle.cos() * radius, height, angle.sin() * radius),
        rotation: random_rotation(rng),
        scale: scale.sample(rng),
    }
}

/// Uniformly distributed direction on the unit sphere.
///
/// Uses `phi = acos(2u - 1)` rather than a uniform polar angle, which would
/// bunch samples at the poles.
pub fn sphere_uniform<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let theta = rng.gen_range(0.0..TAU);
    let phi = (2.0 * rng.gen::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
    Vec3::from_spherical(1.0, theta, phi)
}

/// Uniform point on a horizontal ring between `min_radius` and `max_radius`
pub fn ring_point<R: Rng + ?Sized>(min_radius: f32, max_radius: f32, rng: &mut R) -> Vec3 {
    let angle = rng.gen_range(0.0..TAU);
    let radius = if max_radius > min_radius {
        rng.gen_range(min_radius..max_radius)
    } else {
        min_radius
    };
    Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius)
}

fn random_rotation<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    Vec3::new(
        rng.gen_range(0.0..TAU),
        rng.gen_range(0.0..TAU),
        rng.gen_range(0.0..TAU),
    )
}
