use wasm_bindgen::prelude::*;
use web_sys::{WebGl2RenderingContext, HtmlCanvasElement};

pub mod animation;
pub mod camera;
pub mod config;
pub mod error;
pub mod instances;
pub mod interaction;
pub mod math;
pub mod mesh;
pub mod particles;
pub mod render;
pub mod sampling;
pub mod scene;

pub use config::SceneConfig;
pub use error::SceneError;
pub use scene::{FrameReport, Scene};

use instances::GroupKind;
use render::RenderPipeline;

/// Install the panic hook and route `log` to the browser console
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
}

/// Main engine state exposed to JavaScript
#[wasm_bindgen]
pub struct FestiveTree {
    scene: Scene,
    pipeline: RenderPipeline,
    /// Last pointer position over the canvas, in pixels
    pointer: Option<(f32, f32)>,
}

#[wasm_bindgen]
impl FestiveTree {
    /// Create the scene on `canvas`. `config_yaml` may override any subset
    /// of the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, config_yaml: Option<String>) -> Result<FestiveTree, JsValue> {
        let config = match config_yaml.as_deref() {
            Some(yaml) => SceneConfig::from_yaml(yaml)?,
            None => SceneConfig::default(),
        };

        let gl = canvas
            .get_context("webgl2")?
            .ok_or_else(|| SceneError::Context("webgl2 not supported".to_string()))?
            .dyn_into::<WebGl2RenderingContext>()?;

        let seed = config.seed.unwrap_or_else(random_seed);
        let mut scene = Scene::new(config, seed);

        let mut pipeline = RenderPipeline::new(gl, canvas.width() as i32, canvas.height() as i32)?;
        pipeline.upload_scene(&mut scene)?;

        Ok(Self {
            scene,
            pipeline,
            pointer: None,
        })
    }

    /// Advance and draw one frame
    #[wasm_bindgen]
    pub fn render(&mut self) -> Result<(), JsValue> {
        let hit = self.pointer.and_then(|(x, y)| self.pick(x, y));
        self.scene.tick(hit);
        self.pipeline.sync(&mut self.scene)?;
        self.pipeline.render(&self.scene);
        Ok(())
    }

    #[wasm_bindgen]
    pub fn resize(&mut self, width: i32, height: i32) -> Result<(), JsValue> {
        self.pipeline.resize(width, height)?;
        Ok(())
    }

    /// Record the pointer and return the ornament under it, if any. The
    /// highlight itself follows on the next rendered frame.
    #[wasm_bindgen]
    pub fn on_mouse_move(&mut self, x: f32, y: f32) -> Option<u32> {
        self.pointer = Some((x, y));
        self.pick(x, y).map(|i| i as u32)
    }

    #[wasm_bindgen]
    pub fn on_mouse_leave(&mut self) {
        self.pointer = None;
    }

    #[wasm_bindgen]
    pub fn orbit(&mut self, delta_x: f32, delta_y: f32) {
        self.scene.camera_mut().orbit(delta_x, delta_y);
    }

    #[wasm_bindgen]
    pub fn zoom(&mut self, delta: f32) {
        self.scene.camera_mut().zoom(delta);
    }

    // === Live knobs ===

    /// Per-frame spawn probability, clamped to [0, 0.1]
    #[wasm_bindgen]
    pub fn set_firework_rate(&mut self, rate: f32) {
        self.scene.set_firework_rate(rate);
    }

    #[wasm_bindgen]
    pub fn set_snowflake_count(&mut self, count: u32) {
        self.scene.rebuild_snow(count as usize);
    }

    #[wasm_bindgen]
    pub fn set_bloom_strength(&mut self, strength: f32) {
        self.scene.set_bloom_strength(strength);
    }

    /// Rebuild the ornaments with a new count and re-upload them
    #[wasm_bindgen]
    pub fn set_ornament_count(&mut self, count: u32) -> Result<(), JsValue> {
        self.scene.rebuild_ornaments(count as usize);
        self.pipeline.upload_group(self.scene.group_mut(GroupKind::Ornaments))?;
        Ok(())
    }

    // === Queries ===

    #[wasm_bindgen]
    pub fn assembly_progress(&self) -> f32 {
        self.scene.assembly().progress()
    }

    #[wasm_bindgen]
    pub fn is_assembled(&self) -> bool {
        self.scene.assembly().is_settled()
    }

    #[wasm_bindgen]
    pub fn firework_count(&self) -> u32 {
        self.scene.fireworks().count() as u32
    }

    #[wasm_bindgen]
    pub fn highlighted_ornament(&self) -> Option<u32> {
        self.scene.highlighted().map(|i| i as u32)
    }

    #[wasm_bindgen]
    pub fn is_auto_rotating(&self) -> bool {
        self.scene.camera().is_auto_rotating()
    }
}

impl FestiveTree {
    fn pick(&self, x: f32, y: f32) -> Option<usize> {
        self.scene.pick(
            x,
            y,
            self.pipeline.width() as f32,
            self.pipeline.height() as f32,
        )
    }
}

fn random_seed() -> u64 {
    (js_sys::Math::random() * u64::MAX as f64) as u64
}
