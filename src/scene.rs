//! Scene context and per-frame driver
//!
//! `Scene` owns every piece of simulated state. The browser facade hit-tests,
//! calls [`Scene::tick`] once per animation frame and hands the result to
//! the renderer; tests drive the same loop without a graphics context.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use crate::animation::{ApexMarker, AssemblyAnimator, AssemblyStep};
use crate::camera::OrbitCamera;
use crate::config::{clamp_count, clamp_f32, SceneConfig, MAX_ORNAMENTS, MAX_SNOWFLAKES};
use crate::instances::{build_apex_group, build_group, GroupKind, GroupRecipe, InstanceGroup};
use crate::interaction::{HighlightController, Ray, RayPicker};
use crate::math::Vec3;
use crate::mesh::group_mesh;
use crate::particles::{FireworkSystem, SnowField};
use crate::sampling::palette::STAR;
use crate::sampling::sphere_uniform;

const APEX_SCALE: f32 = 0.9;
/// Height of the star's center above the cone tip
const APEX_LIFT: f32 = 0.6;

/// What happened during one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub progress: f32,
    /// True only on the frame the assembly completed
    pub settled: bool,
    pub firework_count: usize,
    /// Whether any ornament color was rewritten
    pub colors_changed: bool,
}

pub struct Scene {
    config: SceneConfig,
    rng: SmallRng,
    foliage: InstanceGroup,
    ornaments: InstanceGroup,
    gifts: InstanceGroup,
    apex: InstanceGroup,
    apex_marker: ApexMarker,
    assembly: AssemblyAnimator,
    fireworks: FireworkSystem,
    snow: SnowField,
    highlight: HighlightController,
    camera: OrbitCamera,
    picker: RayPicker,
}

impl Scene {
    /// Build every group and effect from `config`, drawing all randomness
    /// from one generator. A seed fixed in `config` wins over `seed`.
    pub fn new(config: SceneConfig, seed: u64) -> Self {
        let config = config.sanitized();
        let seed = config.seed.unwrap_or(seed);
        let mut rng = SmallRng::seed_from_u64(seed);
        let cone = config.cone();
        let tree = &config.tree;

        let foliage = build_group(&GroupRecipe::foliage(tree.foliage_count), &cone, &mut rng);
        let ornaments = build_group(&GroupRecipe::ornaments(tree.ornament_count), &cone, &mut rng);
        let gifts = build_group(&GroupRecipe::gifts(tree.gift_count), &cone, &mut rng);
        let apex = build_apex_group(APEX_SCALE, Vec3::from_hex(STAR));

        let a = &config.assembly;
        let apex_origin = sphere_uniform(&mut rng).scale(a.displacement_scale);
        let apex_marker = ApexMarker::new(Vec3::new(0.0, tree.height + APEX_LIFT, 0.0), apex_origin);
        let assembly = AssemblyAnimator::new(a.initial_step, a.acceleration, a.displacement_scale);

        let fireworks = FireworkSystem::new(config.firework_params());
        let snow = SnowField::new(config.snow.count, config.snow_bounds(), &mut rng);

        let camera = OrbitCamera::new(Vec3::new(0.0, tree.height * 0.45, 0.0), tree.height * 2.2);
        let picker = RayPicker::new(group_mesh(GroupKind::Ornaments).bounding_radius());

        log::info!(
            "scene ready: {} foliage, {} ornaments, {} gifts, {} snowflakes (seed {})",
            foliage.len(),
            ornaments.len(),
            gifts.len(),
            snow.count(),
            seed
        );

        Self {
            config,
            rng,
            foliage,
            ornaments,
            gifts,
            apex,
            apex_marker,
            assembly,
            fireworks,
            snow,
            highlight: HighlightController::default(),
            camera,
            picker,
        }
    }

    /// Advance the whole scene by one frame. `hit` is the ornament under
    /// the pointer, if any, as found by [`Scene::pick`].
    ///
    /// Panics if `hit` is not an index into the ornament group.
    pub fn tick(&mut self, hit: Option<usize>) -> FrameReport {
        let settled = self.assembly.step(&mut self.apex_marker) == AssemblyStep::JustSettled;
        if settled {
            self.camera.enable_auto_rotate();
        }

        self.fireworks.update(&mut self.rng);
        self.snow.update(&mut self.rng);

        if let Some(index) = hit {
            assert!(
                index < self.ornaments.len(),
                "hit index {} out of range for {} ornaments",
                index,
                self.ornaments.len()
            );
        }
        let colors_changed = self.highlight.update(hit, &mut self.ornaments);

        self.camera.update();

        FrameReport {
            progress: self.assembly.progress(),
            settled,
            firework_count: self.fireworks.count(),
            colors_changed,
        }
    }

    /// Ornament under a screen pixel
    pub fn pick(&self, x: f32, y: f32, width: f32, height: f32) -> Option<usize> {
        if width <= 0.0 || height <= 0.0 {
            return None;
        }
        let ray = RayPicker::screen_ray(
            x,
            y,
            width,
            height,
            &self.camera.view_matrix(),
            &self.camera.projection(width / height),
            self.camera.position(),
        );
        self.pick_ray(&ray)
    }

    /// Ornament hit by a world-space ray, tested where it is currently drawn
    pub fn pick_ray(&self, ray: &Ray) -> Option<usize> {
        self.picker
            .pick(
                ray,
                &self.ornaments,
                self.assembly.explode_factor(),
                self.assembly.displacement_scale(),
            )
            .map(|hit| hit.index)
    }

    pub fn set_firework_rate(&mut self, rate: f32) {
        self.fireworks.set_rate(rate);
        self.config.fireworks.rate = self.fireworks.rate();
    }

    pub fn set_bloom_strength(&mut self, strength: f32) {
        self.config.post.bloom_strength = clamp_f32("post.bloom_strength", strength, 0.0, 3.0);
    }

    /// Replace the snow field with a fresh one of `count` flakes
    pub fn rebuild_snow(&mut self, count: usize) {
        let count = clamp_count("snow.count", count, MAX_SNOWFLAKES);
        self.snow = SnowField::new(count, self.config.snow_bounds(), &mut self.rng);
        self.config.snow.count = count;
        log::debug!("snow rebuilt with {} flakes", count);
    }

    /// Replace the ornament group with a freshly populated one. Any active
    /// highlight pointed into the discarded group and is dropped.
    pub fn rebuild_ornaments(&mut self, count: usize) {
        let count = clamp_count("tree.ornament_count", count, MAX_ORNAMENTS);
        let cone = self.config.cone();
        self.ornaments = build_group(&GroupRecipe::ornaments(count), &cone, &mut self.rng);
        self.highlight.forget();
        self.config.tree.ornament_count = count;
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn group(&self, kind: GroupKind) -> &InstanceGroup {
        match kind {
            GroupKind::Foliage => &self.foliage,
            GroupKind::Ornaments => &self.ornaments,
            GroupKind::Gifts => &self.gifts,
            GroupKind::Apex => &self.apex,
        }
    }

    pub fn group_mut(&mut self, kind: GroupKind) -> &mut InstanceGroup {
        match kind {
            GroupKind::Foliage => &mut self.foliage,
            GroupKind::Ornaments => &mut self.ornaments,
            GroupKind::Gifts => &mut self.gifts,
            GroupKind::Apex => &mut self.apex,
        }
    }

    pub fn apex_marker(&self) -> &ApexMarker {
        &self.apex_marker
    }

    pub fn assembly(&self) -> &AssemblyAnimator {
        &self.assembly
    }

    pub fn fireworks(&self) -> &FireworkSystem {
        &self.fireworks
    }

    pub fn snow(&self) -> &SnowField {
        &self.snow
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlight.highlighted()
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }

    /// Firework then snow point sprites, 8 floats each
    pub fn particle_data(&self) -> Vec<f32> {
        let mut data = self.fireworks.particle_data();
        data.extend(self.snow.particle_data());
        data
    }
}
