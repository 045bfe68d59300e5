//! Scene configuration
//!
//! Loaded from YAML; every field has a default so partial documents work.
//! Values are clamped into range rather than rejected, since they only
//! shape the visuals.

use serde::{Deserialize, Serialize};
use crate::error::SceneError;
use crate::particles::{FireworkParams, SnowBounds};
use crate::sampling::ConeShape;

/// Smallest acceleration accepted; keeps the assembly finite
pub const MIN_ACCELERATION: f32 = 1e-6;

pub const MAX_FIREWORK_RATE: f32 = 0.1;
pub const MAX_SNOWFLAKES: usize = 10_000;
pub const MAX_FOLIAGE: usize = 20_000;
pub const MAX_ORNAMENTS: usize = 2_000;
pub const MAX_GIFTS: usize = 500;
pub const MAX_FIREWORK_CAPACITY: usize = 32;
pub const MAX_BURST_SIZE: usize = 500;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Fixed seed for a reproducible scene; random when absent
    pub seed: Option<u64>,
    pub tree: TreeConfig,
    pub assembly: AssemblyConfig,
    pub fireworks: FireworkConfig,
    pub snow: SnowConfig,
    pub post: PostConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    pub height: f32,
    pub radius: f32,
    pub foliage_count: usize,
    pub ornament_count: usize,
    pub gift_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblyConfig {
    pub initial_step: f32,
    pub acceleration: f32,
    pub displacement_scale: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireworkConfig {
    pub rate: f32,
    pub capacity: usize,
    pub min_radius: f32,
    pub max_radius: f32,
    pub min_apex: f32,
    pub max_apex: f32,
    pub burst_size: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnowConfig {
    pub count: usize,
    pub area: f32,
    pub ceiling: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostConfig {
    pub bloom_strength: f32,
    pub bloom_threshold: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: None,
            tree: TreeConfig::default(),
            assembly: AssemblyConfig::default(),
            fireworks: FireworkConfig::default(),
            snow: SnowConfig::default(),
            post: PostConfig::default(),
        }
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            height: 14.0,
            radius: 5.5,
            foliage_count: 4000,
            ornament_count: 180,
            gift_count: 48,
        }
    }
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            initial_step: 0.0005,
            acceleration: 0.00005,
            displacement_scale: 20.0,
        }
    }
}

impl Default for FireworkConfig {
    fn default() -> Self {
        let p = FireworkParams::default();
        Self {
            rate: p.rate,
            capacity: p.capacity,
            min_radius: p.min_radius,
            max_radius: p.max_radius,
            min_apex: p.min_apex,
            max_apex: p.max_apex,
            burst_size: p.burst_size,
        }
    }
}

impl Default for SnowConfig {
    fn default() -> Self {
        let bounds = SnowBounds::default();
        Self {
            count: 1500,
            area: bounds.area,
            ceiling: bounds.ceiling,
        }
    }
}

impl Default for PostConfig {
    fn default() -> Self {
        Self {
            bloom_strength: 1.1,
            bloom_threshold: 0.55,
        }
    }
}

impl SceneConfig {
    /// Parse from YAML and clamp into range
    pub fn from_yaml(yaml: &str) -> Result<Self, SceneError> {
        let config: SceneConfig = serde_yaml::from_str(yaml)?;
        Ok(config.sanitized())
    }

    /// Clamp every value into its usable range, logging what changed
    pub fn sanitized(mut self) -> Self {
        let t = &mut self.tree;
        t.height = clamp_f32("tree.height", t.height, 0.1, 1000.0);
        t.radius = clamp_f32("tree.radius", t.radius, 0.0, 1000.0);
        t.foliage_count = clamp_count("tree.foliage_count", t.foliage_count, MAX_FOLIAGE);
        t.ornament_count = clamp_count("tree.ornament_count", t.ornament_count, MAX_ORNAMENTS);
        t.gift_count = clamp_count("tree.gift_count", t.gift_count, MAX_GIFTS);

        let a = &mut self.assembly;
        a.initial_step = clamp_f32("assembly.initial_step", a.initial_step, 0.0, 1.0);
        a.acceleration = clamp_f32("assembly.acceleration", a.acceleration, MIN_ACCELERATION, 1.0);
        a.displacement_scale =
            clamp_f32("assembly.displacement_scale", a.displacement_scale, 0.0, 1000.0);

        let f = &mut self.fireworks;
        f.rate = clamp_f32("fireworks.rate", f.rate, 0.0, MAX_FIREWORK_RATE);
        f.capacity = clamp_count("fireworks.capacity", f.capacity, MAX_FIREWORK_CAPACITY);
        f.burst_size = clamp_count("fireworks.burst_size", f.burst_size, MAX_BURST_SIZE);
        f.min_radius = clamp_f32("fireworks.min_radius", f.min_radius, 0.0, 10_000.0);
        f.max_radius = clamp_f32("fireworks.max_radius", f.max_radius, f.min_radius, 10_000.0);
        f.min_apex = clamp_f32("fireworks.min_apex", f.min_apex, 0.0, 10_000.0);
        f.max_apex = clamp_f32("fireworks.max_apex", f.max_apex, f.min_apex, 10_000.0);

        let s = &mut self.snow;
        s.count = clamp_count("snow.count", s.count, MAX_SNOWFLAKES);
        s.area = clamp_f32("snow.area", s.area, 0.0, 10_000.0);
        s.ceiling = clamp_f32("snow.ceiling", s.ceiling, 0.0, 10_000.0);

        let p = &mut self.post;
        p.bloom_strength = clamp_f32("post.bloom_strength", p.bloom_strength, 0.0, 3.0);
        p.bloom_threshold = clamp_f32("post.bloom_threshold", p.bloom_threshold, 0.0, 1.0);

        self
    }

    pub fn cone(&self) -> ConeShape {
        ConeShape::new(self.tree.height, self.tree.radius)
    }

    pub fn firework_params(&self) -> FireworkParams {
        let f = &self.fireworks;
        FireworkParams {
            rate: f.rate,
            capacity: f.capacity,
            min_radius: f.min_radius,
            max_radius: f.max_radius,
            min_apex: f.min_apex,
            max_apex: f.max_apex,
            burst_size: f.burst_size,
        }
    }

    pub fn snow_bounds(&self) -> SnowBounds {
        SnowBounds {
            area: self.snow.area,
            ceiling: self.snow.ceiling,
        }
    }
}

/// Upper-bound an instance or particle count; keeps allocations and
/// per-frame work bounded
pub(crate) fn clamp_count(name: &str, count: usize, max: usize) -> usize {
    if count > max {
        log::warn!("{} {} clamped to {}", name, count, max);
        max
    } else {
        count
    }
}

pub(crate) fn clamp_f32(name: &str, value: f32, min: f32, max: f32) -> f32 {
    let clamped = if value.is_nan() { min } else { value.clamp(min, max) };
    if clamped != value {
        log::warn!("{} {} clamped to {}", name, value, clamped);
    }
    clamped
}
