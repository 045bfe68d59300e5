use web_sys::{
    WebGl2RenderingContext, WebGlBuffer, WebGlProgram, WebGlVertexArrayObject,
    WebGlTexture, WebGlFramebuffer, WebGlRenderbuffer, WebGlUniformLocation,
};
use crate::error::SceneError;
use crate::instances::{GroupKind, InstanceGroup};
use crate::math::Mat4;
use crate::mesh::group_mesh;
use crate::scene::Scene;
use super::webgl::WebGLContext;
use super::shaders::*;

type Gl = WebGl2RenderingContext;

const VERTEX_FLOATS: i32 = 6;
const INSTANCE_FLOATS: i32 = 19;
const COLOR_FLOATS: i32 = 3;
const PARTICLE_FLOATS: i32 = 8;

/// Groups drawn every frame, in draw order
const DRAW_ORDER: [GroupKind; 4] = [
    GroupKind::Foliage,
    GroupKind::Gifts,
    GroupKind::Ornaments,
    GroupKind::Apex,
];

const VIGNETTE_STRENGTH: f32 = 0.5;

fn emissive(kind: GroupKind) -> f32 {
    match kind {
        GroupKind::Foliage => 0.05,
        GroupKind::Gifts => 0.1,
        GroupKind::Ornaments => 0.35,
        GroupKind::Apex => 1.4,
    }
}

/// Cached uniform locations for the instanced shader
struct InstancedUniforms {
    model: Option<WebGlUniformLocation>,
    view: Option<WebGlUniformLocation>,
    projection: Option<WebGlUniformLocation>,
    progress: Option<WebGlUniformLocation>,
    displacement: Option<WebGlUniformLocation>,
    camera_pos: Option<WebGlUniformLocation>,
    emissive: Option<WebGlUniformLocation>,
}

struct ParticleUniforms {
    view: Option<WebGlUniformLocation>,
    projection: Option<WebGlUniformLocation>,
}

struct PostUniforms {
    extract_texture: Option<WebGlUniformLocation>,
    threshold: Option<WebGlUniformLocation>,
    blur_texture: Option<WebGlUniformLocation>,
    direction: Option<WebGlUniformLocation>,
    scene: Option<WebGlUniformLocation>,
    bloom: Option<WebGlUniformLocation>,
    bloom_strength: Option<WebGlUniformLocation>,
    vignette_strength: Option<WebGlUniformLocation>,
}

/// GPU side of one instance group
struct GroupBuffers {
    kind: GroupKind,
    vao: WebGlVertexArrayObject,
    vertex_buffer: WebGlBuffer,
    index_buffer: WebGlBuffer,
    instance_buffer: WebGlBuffer,
    color_buffer: WebGlBuffer,
    index_count: i32,
    instance_count: i32,
}

/// Framebuffers for post-processing, recreated on resize
struct Targets {
    scene_texture: WebGlTexture,
    scene_depth: WebGlRenderbuffer,
    scene_fbo: WebGlFramebuffer,
    bloom_textures: [WebGlTexture; 2],
    bloom_fbos: [WebGlFramebuffer; 2],
}

/// Complete render pipeline: instanced groups and particles into an
/// offscreen target, then bloom and composite to the canvas
pub struct RenderPipeline {
    ctx: WebGLContext,

    instanced_program: WebGlProgram,
    particle_program: WebGlProgram,
    bloom_extract_program: WebGlProgram,
    blur_program: WebGlProgram,
    composite_program: WebGlProgram,

    instanced_uniforms: InstancedUniforms,
    particle_uniforms: ParticleUniforms,
    post_uniforms: PostUniforms,

    groups: Vec<GroupBuffers>,

    particle_vao: Option<WebGlVertexArrayObject>,
    particle_buffer: Option<WebGlBuffer>,
    particle_count: i32,

    targets: Targets,

    width: i32,
    height: i32,
}

impl RenderPipeline {
    pub fn new(gl: WebGl2RenderingContext, width: i32, height: i32) -> Result<Self, SceneError> {
        let ctx = WebGLContext::new(gl);
        let (width, height) = (width.max(1), height.max(1));

        let instanced_program = ctx.create_program(INSTANCED_VERTEX_SHADER, INSTANCED_FRAGMENT_SHADER)?;
        let particle_program = ctx.create_program(PARTICLE_VERTEX_SHADER, PARTICLE_FRAGMENT_SHADER)?;
        let bloom_extract_program = ctx.create_program(FULLSCREEN_VERTEX_SHADER, BLOOM_EXTRACT_SHADER)?;
        let blur_program = ctx.create_program(FULLSCREEN_VERTEX_SHADER, BLUR_SHADER)?;
        let composite_program = ctx.create_program(FULLSCREEN_VERTEX_SHADER, COMPOSITE_SHADER)?;

        let instanced_uniforms = InstancedUniforms {
            model: ctx.get_uniform_location(&instanced_program, "u_model"),
            view: ctx.get_uniform_location(&instanced_program, "u_view"),
            projection: ctx.get_uniform_location(&instanced_program, "u_projection"),
            progress: ctx.get_uniform_location(&instanced_program, "u_progress"),
            displacement: ctx.get_uniform_location(&instanced_program, "u_displacement"),
            camera_pos: ctx.get_uniform_location(&instanced_program, "u_camera_pos"),
            emissive: ctx.get_uniform_location(&instanced_program, "u_emissive"),
        };

        let particle_uniforms = ParticleUniforms {
            view: ctx.get_uniform_location(&particle_program, "u_view"),
            projection: ctx.get_uniform_location(&particle_program, "u_projection"),
        };

        let post_uniforms = PostUniforms {
            extract_texture: ctx.get_uniform_location(&bloom_extract_program, "u_texture"),
            threshold: ctx.get_uniform_location(&bloom_extract_program, "u_threshold"),
            blur_texture: ctx.get_uniform_location(&blur_program, "u_texture"),
            direction: ctx.get_uniform_location(&blur_program, "u_direction"),
            scene: ctx.get_uniform_location(&composite_program, "u_scene"),
            bloom: ctx.get_uniform_location(&composite_program, "u_bloom"),
            bloom_strength: ctx.get_uniform_location(&composite_program, "u_bloom_strength"),
            vignette_strength: ctx.get_uniform_location(&composite_program, "u_vignette_strength"),
        };

        let targets = Self::create_targets(&ctx, width, height)?;

        Ok(Self {
            ctx,
            instanced_program,
            particle_program,
            bloom_extract_program,
            blur_program,
            composite_program,
            instanced_uniforms,
            particle_uniforms,
            post_uniforms,
            groups: Vec::new(),
            particle_vao: None,
            particle_buffer: None,
            particle_count: 0,
            targets,
            width,
            height,
        })
    }

    fn create_targets(ctx: &WebGLContext, width: i32, height: i32) -> Result<Targets, SceneError> {
        let scene_texture = ctx.create_texture(width, height, Gl::RGBA)?;
        let scene_depth = ctx.create_depth_buffer(width, height)?;
        let scene_fbo = ctx.create_framebuffer(&scene_texture, Some(&scene_depth))?;

        // Bloom runs at half resolution
        let (bw, bh) = ((width / 2).max(1), (height / 2).max(1));
        let bloom_a = ctx.create_texture(bw, bh, Gl::RGBA)?;
        let bloom_b = ctx.create_texture(bw, bh, Gl::RGBA)?;
        let fbo_a = ctx.create_framebuffer(&bloom_a, None)?;
        let fbo_b = ctx.create_framebuffer(&bloom_b, None)?;

        Ok(Targets {
            scene_texture,
            scene_depth,
            scene_fbo,
            bloom_textures: [bloom_a, bloom_b],
            bloom_fbos: [fbo_a, fbo_b],
        })
    }

    /// Upload every group of the scene
    pub fn upload_scene(&mut self, scene: &mut Scene) -> Result<(), SceneError> {
        for kind in DRAW_ORDER {
            self.upload_group(scene.group_mut(kind))?;
        }
        Ok(())
    }

    /// Upload (or replace) the mesh, instance and color buffers of a group
    pub fn upload_group(&mut self, group: &mut InstanceGroup) -> Result<(), SceneError> {
        let ctx = &self.ctx;
        let gl = &ctx.gl;
        let mesh = group_mesh(group.kind());

        let vao = ctx.create_vao()?;
        gl.bind_vertex_array(Some(&vao));

        // Layout: position(3) + normal(3)
        let vertex_buffer = ctx.create_buffer_f32(&mesh.vertex_data(), Gl::STATIC_DRAW)?;
        gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&vertex_buffer));
        let stride = VERTEX_FLOATS * 4;
        ctx.float_attrib(0, 3, stride, 0, 0);
        ctx.float_attrib(1, 3, stride, 12, 0);

        // Layout: model matrix(16) + offset(3)
        let instance_buffer = ctx.create_buffer_f32(&group.instance_data(), Gl::STATIC_DRAW)?;
        gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&instance_buffer));
        let stride = INSTANCE_FLOATS * 4;
        ctx.mat4_instance_attrib(2, stride, 0);
        ctx.float_attrib(6, 3, stride, 64, 1);

        let color_buffer = ctx.create_buffer_f32(&group.color_data(), Gl::DYNAMIC_DRAW)?;
        gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&color_buffer));
        ctx.float_attrib(7, 3, COLOR_FLOATS * 4, 0, 1);

        let index_buffer = ctx.create_index_buffer(mesh.index_data(), Gl::STATIC_DRAW)?;

        gl.bind_vertex_array(None);
        gl.bind_buffer(Gl::ARRAY_BUFFER, None);
        gl.bind_buffer(Gl::ELEMENT_ARRAY_BUFFER, None);
        group.mark_colors_clean();

        let buffers = GroupBuffers {
            kind: group.kind(),
            vao,
            vertex_buffer,
            index_buffer,
            instance_buffer,
            color_buffer,
            index_count: mesh.index_data().len() as i32,
            instance_count: group.len() as i32,
        };

        if let Some(pos) = self.groups.iter().position(|g| g.kind == buffers.kind) {
            let old = self.groups.swap_remove(pos);
            self.release_group(old);
        }
        self.groups.push(buffers);
        self.groups.sort_by_key(|g| DRAW_ORDER.iter().position(|k| *k == g.kind));
        log::debug!("uploaded {} group ({} instances)", group.kind().name(), group.len());
        Ok(())
    }

    fn release_group(&self, buffers: GroupBuffers) {
        let gl = &self.ctx.gl;
        gl.delete_vertex_array(Some(&buffers.vao));
        for buffer in [&buffers.vertex_buffer, &buffers.index_buffer, &buffers.instance_buffer, &buffers.color_buffer] {
            gl.delete_buffer(Some(buffer));
        }
    }

    fn release_targets(&self, targets: Targets) {
        let gl = &self.ctx.gl;
        gl.delete_framebuffer(Some(&targets.scene_fbo));
        for fbo in &targets.bloom_fbos {
            gl.delete_framebuffer(Some(fbo));
        }
        gl.delete_texture(Some(&targets.scene_texture));
        for texture in &targets.bloom_textures {
            gl.delete_texture(Some(texture));
        }
        gl.delete_renderbuffer(Some(&targets.scene_depth));
    }

    /// Push per-frame state to the GPU: dirty color buffers and particles
    pub fn sync(&mut self, scene: &mut Scene) -> Result<(), SceneError> {
        for kind in DRAW_ORDER {
            let group = scene.group_mut(kind);
            if !group.colors_dirty() {
                continue;
            }
            if let Some(buffers) = self.groups.iter().find(|g| g.kind == kind) {
                self.ctx.update_buffer_f32(&buffers.color_buffer, &group.color_data());
                group.mark_colors_clean();
            }
        }

        self.update_particles(&scene.particle_data())
    }

    /// Replace the point sprite buffer.
    /// Format: position(3) + size(1) + alpha(1) + color(3) = 8 floats per particle
    pub fn update_particles(&mut self, data: &[f32]) -> Result<(), SceneError> {
        if let Some(buffer) = &self.particle_buffer {
            self.ctx.update_buffer_f32(buffer, data);
        } else {
            let ctx = &self.ctx;
            let gl = &ctx.gl;
            let vao = ctx.create_vao()?;
            gl.bind_vertex_array(Some(&vao));

            let buffer = ctx.create_buffer_f32(data, Gl::DYNAMIC_DRAW)?;
            gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&buffer));
            let stride = PARTICLE_FLOATS * 4;
            ctx.float_attrib(0, 3, stride, 0, 0);
            ctx.float_attrib(1, 1, stride, 12, 0);
            ctx.float_attrib(2, 1, stride, 16, 0);
            ctx.float_attrib(3, 3, stride, 20, 0);

            gl.bind_vertex_array(None);
            gl.bind_buffer(Gl::ARRAY_BUFFER, None);

            self.particle_vao = Some(vao);
            self.particle_buffer = Some(buffer);
        }

        self.particle_count = data.len() as i32 / PARTICLE_FLOATS;
        Ok(())
    }

    /// Render a frame of `scene`
    pub fn render(&self, scene: &Scene) {
        let gl = &self.ctx.gl;
        let camera = scene.camera();
        let assembly = scene.assembly();
        let post = &scene.config().post;

        let aspect = self.width as f32 / self.height as f32;
        let projection = camera.projection(aspect);
        let view = camera.view_matrix();
        let camera_pos = camera.position();

        // Pass 1: scene into the offscreen target
        gl.bind_framebuffer(Gl::FRAMEBUFFER, Some(&self.targets.scene_fbo));
        self.ctx.viewport(0, 0, self.width, self.height);
        self.ctx.clear(0.01, 0.015, 0.04, 1.0);
        self.ctx.enable_depth_test();
        gl.disable(Gl::BLEND);

        let u = &self.instanced_uniforms;
        gl.use_program(Some(&self.instanced_program));
        self.ctx.uniform_matrix4fv(u.view.as_ref(), view.as_slice());
        self.ctx.uniform_matrix4fv(u.projection.as_ref(), projection.as_slice());
        self.ctx.uniform_1f(u.progress.as_ref(), assembly.progress());
        self.ctx.uniform_1f(u.displacement.as_ref(), assembly.displacement_scale());
        self.ctx.uniform_3f(u.camera_pos.as_ref(), camera_pos.x, camera_pos.y, camera_pos.z);

        for buffers in &self.groups {
            if buffers.instance_count == 0 {
                continue;
            }
            let model = match buffers.kind {
                GroupKind::Apex => Mat4::translation(scene.apex_marker().position),
                _ => Mat4::identity(),
            };
            self.ctx.uniform_matrix4fv(u.model.as_ref(), model.as_slice());
            self.ctx.uniform_1f(u.emissive.as_ref(), emissive(buffers.kind));

            gl.bind_vertex_array(Some(&buffers.vao));
            gl.draw_elements_instanced_with_i32(
                Gl::TRIANGLES,
                buffers.index_count,
                Gl::UNSIGNED_INT,
                0,
                buffers.instance_count,
            );
        }

        if self.particle_vao.is_some() && self.particle_count > 0 {
            gl.use_program(Some(&self.particle_program));
            gl.depth_mask(false);
            self.ctx.enable_additive_blending();

            self.ctx.uniform_matrix4fv(self.particle_uniforms.view.as_ref(), view.as_slice());
            self.ctx.uniform_matrix4fv(self.particle_uniforms.projection.as_ref(), projection.as_slice());

            gl.bind_vertex_array(self.particle_vao.as_ref());
            gl.draw_arrays(Gl::POINTS, 0, self.particle_count);
            gl.depth_mask(true);
        }
        gl.bind_vertex_array(None);

        // Pass 2: bright-pass extract
        let [bloom_a, bloom_b] = &self.targets.bloom_textures;
        let [fbo_a, fbo_b] = &self.targets.bloom_fbos;

        gl.bind_framebuffer(Gl::FRAMEBUFFER, Some(fbo_a));
        self.ctx.viewport(0, 0, (self.width / 2).max(1), (self.height / 2).max(1));
        gl.disable(Gl::DEPTH_TEST);
        gl.disable(Gl::BLEND);

        gl.use_program(Some(&self.bloom_extract_program));
        gl.active_texture(Gl::TEXTURE0);
        gl.bind_texture(Gl::TEXTURE_2D, Some(&self.targets.scene_texture));
        self.ctx.uniform_1i(self.post_uniforms.extract_texture.as_ref(), 0);
        self.ctx.uniform_1f(self.post_uniforms.threshold.as_ref(), post.bloom_threshold);
        gl.draw_arrays(Gl::TRIANGLES, 0, 3);

        // Pass 3 and 4: separable blur, ping-ponging between the bloom targets
        gl.use_program(Some(&self.blur_program));
        self.ctx.uniform_1i(self.post_uniforms.blur_texture.as_ref(), 0);

        gl.bind_framebuffer(Gl::FRAMEBUFFER, Some(fbo_b));
        gl.bind_texture(Gl::TEXTURE_2D, Some(bloom_a));
        self.ctx.uniform_2f(self.post_uniforms.direction.as_ref(), 1.0, 0.0);
        gl.draw_arrays(Gl::TRIANGLES, 0, 3);

        gl.bind_framebuffer(Gl::FRAMEBUFFER, Some(fbo_a));
        gl.bind_texture(Gl::TEXTURE_2D, Some(bloom_b));
        self.ctx.uniform_2f(self.post_uniforms.direction.as_ref(), 0.0, 1.0);
        gl.draw_arrays(Gl::TRIANGLES, 0, 3);

        // Pass 5: composite to the canvas
        gl.bind_framebuffer(Gl::FRAMEBUFFER, None);
        self.ctx.viewport(0, 0, self.width, self.height);
        gl.use_program(Some(&self.composite_program));

        gl.active_texture(Gl::TEXTURE0);
        gl.bind_texture(Gl::TEXTURE_2D, Some(&self.targets.scene_texture));
        self.ctx.uniform_1i(self.post_uniforms.scene.as_ref(), 0);

        gl.active_texture(Gl::TEXTURE1);
        gl.bind_texture(Gl::TEXTURE_2D, Some(bloom_a));
        self.ctx.uniform_1i(self.post_uniforms.bloom.as_ref(), 1);

        self.ctx.uniform_1f(self.post_uniforms.bloom_strength.as_ref(), post.bloom_strength);
        self.ctx.uniform_1f(self.post_uniforms.vignette_strength.as_ref(), VIGNETTE_STRENGTH);

        gl.draw_arrays(Gl::TRIANGLES, 0, 3);
        gl.active_texture(Gl::TEXTURE0);
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Recreate the offscreen targets for a new canvas size
    pub fn resize(&mut self, width: i32, height: i32) -> Result<(), SceneError> {
        let (width, height) = (width.max(1), height.max(1));
        if width == self.width && height == self.height {
            return Ok(());
        }
        let targets = Self::create_targets(&self.ctx, width, height)?;
        let old = std::mem::replace(&mut self.targets, targets);
        self.release_targets(old);
        self.width = width;
        self.height = height;
        Ok(())
    }
}
