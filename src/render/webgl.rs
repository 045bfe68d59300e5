use web_sys::{
    WebGl2RenderingContext, WebGlBuffer, WebGlProgram, WebGlShader, WebGlUniformLocation,
    WebGlVertexArrayObject, WebGlTexture, WebGlFramebuffer, WebGlRenderbuffer,
};
use crate::error::SceneError;

type Gl = WebGl2RenderingContext;

fn render_err(msg: impl Into<String>) -> SceneError {
    SceneError::Render(msg.into())
}

/// Wrapper around WebGL2 context with helper methods
pub struct WebGLContext {
    pub gl: WebGl2RenderingContext,
}

impl WebGLContext {
    pub fn new(gl: WebGl2RenderingContext) -> Self {
        Self { gl }
    }

    /// Compile a shader from source
    pub fn compile_shader(&self, shader_type: u32, source: &str) -> Result<WebGlShader, SceneError> {
        let gl = &self.gl;

        let shader = gl.create_shader(shader_type)
            .ok_or_else(|| render_err("Failed to create shader"))?;

        gl.shader_source(&shader, source);
        gl.compile_shader(&shader);

        if gl.get_shader_parameter(&shader, Gl::COMPILE_STATUS)
            .as_bool()
            .unwrap_or(false)
        {
            Ok(shader)
        } else {
            let log = gl.get_shader_info_log(&shader).unwrap_or_default();
            gl.delete_shader(Some(&shader));
            Err(render_err(format!("Shader compilation failed: {}", log)))
        }
    }

    /// Create a shader program from vertex and fragment shaders
    pub fn create_program(&self, vert_src: &str, frag_src: &str) -> Result<WebGlProgram, SceneError> {
        let gl = &self.gl;

        let vert_shader = self.compile_shader(Gl::VERTEX_SHADER, vert_src)?;
        let frag_shader = self.compile_shader(Gl::FRAGMENT_SHADER, frag_src)?;

        let program = gl.create_program().ok_or_else(|| render_err("Failed to create program"))?;

        gl.attach_shader(&program, &vert_shader);
        gl.attach_shader(&program, &frag_shader);
        gl.link_program(&program);

        gl.delete_shader(Some(&vert_shader));
        gl.delete_shader(Some(&frag_shader));

        if gl.get_program_parameter(&program, Gl::LINK_STATUS)
            .as_bool()
            .unwrap_or(false)
        {
            Ok(program)
        } else {
            let log = gl.get_program_info_log(&program).unwrap_or_default();
            gl.delete_program(Some(&program));
            Err(render_err(format!("Program linking failed: {}", log)))
        }
    }

    /// Create a buffer and upload data
    pub fn create_buffer_f32(&self, data: &[f32], usage: u32) -> Result<WebGlBuffer, SceneError> {
        let gl = &self.gl;

        let buffer = gl.create_buffer().ok_or_else(|| render_err("Failed to create buffer"))?;
        gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&buffer));

        // Safety: the view is consumed by buffer_data before any allocation
        unsafe {
            let array = js_sys::Float32Array::view(data);
            gl.buffer_data_with_array_buffer_view(Gl::ARRAY_BUFFER, &array, usage);
        }

        gl.bind_buffer(Gl::ARRAY_BUFFER, None);
        Ok(buffer)
    }

    /// Replace the whole contents of a dynamic buffer, reallocating storage
    /// so the new data may be larger or smaller than before
    pub fn update_buffer_f32(&self, buffer: &WebGlBuffer, data: &[f32]) {
        let gl = &self.gl;
        gl.bind_buffer(Gl::ARRAY_BUFFER, Some(buffer));
        unsafe {
            let array = js_sys::Float32Array::view(data);
            gl.buffer_data_with_array_buffer_view(Gl::ARRAY_BUFFER, &array, Gl::DYNAMIC_DRAW);
        }
        gl.bind_buffer(Gl::ARRAY_BUFFER, None);
    }

    /// Create an index buffer
    pub fn create_index_buffer(&self, data: &[u32], usage: u32) -> Result<WebGlBuffer, SceneError> {
        let gl = &self.gl;

        let buffer = gl.create_buffer().ok_or_else(|| render_err("Failed to create index buffer"))?;
        gl.bind_buffer(Gl::ELEMENT_ARRAY_BUFFER, Some(&buffer));

        unsafe {
            let array = js_sys::Uint32Array::view(data);
            gl.buffer_data_with_array_buffer_view(Gl::ELEMENT_ARRAY_BUFFER, &array, usage);
        }

        // The element binding stays with the currently bound VAO
        Ok(buffer)
    }

    /// Create a Vertex Array Object
    pub fn create_vao(&self) -> Result<WebGlVertexArrayObject, SceneError> {
        self.gl.create_vertex_array().ok_or_else(|| render_err("Failed to create VAO"))
    }

    /// Float attribute read from the currently bound array buffer.
    /// `divisor` 0 advances per vertex, 1 per instance.
    pub fn float_attrib(&self, location: u32, size: i32, stride: i32, offset: i32, divisor: u32) {
        let gl = &self.gl;
        gl.enable_vertex_attrib_array(location);
        gl.vertex_attrib_pointer_with_i32(location, size, Gl::FLOAT, false, stride, offset);
        gl.vertex_attrib_divisor(location, divisor);
    }

    /// Per-instance mat4 spread over four consecutive attribute slots
    pub fn mat4_instance_attrib(&self, first_location: u32, stride: i32, offset: i32) {
        for column in 0..4 {
            self.float_attrib(first_location + column, 4, stride, offset + column as i32 * 16, 1);
        }
    }

    /// Create a texture
    pub fn create_texture(&self, width: i32, height: i32, internal_format: u32) -> Result<WebGlTexture, SceneError> {
        let gl = &self.gl;

        let texture = gl.create_texture().ok_or_else(|| render_err("Failed to create texture"))?;
        gl.bind_texture(Gl::TEXTURE_2D, Some(&texture));

        gl.tex_image_2d_with_i32_and_i32_and_i32_and_format_and_type_and_opt_u8_array(
            Gl::TEXTURE_2D,
            0,
            internal_format as i32,
            width,
            height,
            0,
            Gl::RGBA,
            Gl::UNSIGNED_BYTE,
            None,
        ).map_err(|e| render_err(format!("Failed to create texture: {:?}", e)))?;

        gl.tex_parameteri(Gl::TEXTURE_2D, Gl::TEXTURE_MIN_FILTER, Gl::LINEAR as i32);
        gl.tex_parameteri(Gl::TEXTURE_2D, Gl::TEXTURE_MAG_FILTER, Gl::LINEAR as i32);
        gl.tex_parameteri(Gl::TEXTURE_2D, Gl::TEXTURE_WRAP_S, Gl::CLAMP_TO_EDGE as i32);
        gl.tex_parameteri(Gl::TEXTURE_2D, Gl::TEXTURE_WRAP_T, Gl::CLAMP_TO_EDGE as i32);

        gl.bind_texture(Gl::TEXTURE_2D, None);
        Ok(texture)
    }

    /// Depth storage for a framebuffer the instanced meshes are drawn into
    pub fn create_depth_buffer(&self, width: i32, height: i32) -> Result<WebGlRenderbuffer, SceneError> {
        let gl = &self.gl;
        let depth = gl.create_renderbuffer().ok_or_else(|| render_err("Failed to create renderbuffer"))?;
        gl.bind_renderbuffer(Gl::RENDERBUFFER, Some(&depth));
        gl.renderbuffer_storage(Gl::RENDERBUFFER, Gl::DEPTH_COMPONENT24, width, height);
        gl.bind_renderbuffer(Gl::RENDERBUFFER, None);
        Ok(depth)
    }

    /// Create a framebuffer with a texture attachment and optional depth
    pub fn create_framebuffer(
        &self,
        texture: &WebGlTexture,
        depth: Option<&WebGlRenderbuffer>,
    ) -> Result<WebGlFramebuffer, SceneError> {
        let gl = &self.gl;

        let fbo = gl.create_framebuffer().ok_or_else(|| render_err("Failed to create framebuffer"))?;
        gl.bind_framebuffer(Gl::FRAMEBUFFER, Some(&fbo));

        gl.framebuffer_texture_2d(
            Gl::FRAMEBUFFER,
            Gl::COLOR_ATTACHMENT0,
            Gl::TEXTURE_2D,
            Some(texture),
            0,
        );
        if let Some(depth) = depth {
            gl.framebuffer_renderbuffer(Gl::FRAMEBUFFER, Gl::DEPTH_ATTACHMENT, Gl::RENDERBUFFER, Some(depth));
        }

        let status = gl.check_framebuffer_status(Gl::FRAMEBUFFER);
        gl.bind_framebuffer(Gl::FRAMEBUFFER, None);
        if status != Gl::FRAMEBUFFER_COMPLETE {
            return Err(render_err(format!("Framebuffer incomplete: {}", status)));
        }

        Ok(fbo)
    }

    pub fn get_uniform_location(&self, program: &WebGlProgram, name: &str) -> Option<WebGlUniformLocation> {
        self.gl.get_uniform_location(program, name)
    }

    pub fn uniform_1f(&self, location: Option<&WebGlUniformLocation>, value: f32) {
        self.gl.uniform1f(location, value);
    }

    pub fn uniform_2f(&self, location: Option<&WebGlUniformLocation>, x: f32, y: f32) {
        self.gl.uniform2f(location, x, y);
    }

    pub fn uniform_3f(&self, location: Option<&WebGlUniformLocation>, x: f32, y: f32, z: f32) {
        self.gl.uniform3f(location, x, y, z);
    }

    pub fn uniform_matrix4fv(&self, location: Option<&WebGlUniformLocation>, data: &[f32; 16]) {
        self.gl.uniform_matrix4fv_with_f32_array(location, false, data);
    }

    pub fn uniform_1i(&self, location: Option<&WebGlUniformLocation>, value: i32) {
        self.gl.uniform1i(location, value);
    }

    pub fn clear(&self, r: f32, g: f32, b: f32, a: f32) {
        self.gl.clear_color(r, g, b, a);
        self.gl.clear(Gl::COLOR_BUFFER_BIT | Gl::DEPTH_BUFFER_BIT);
    }

    pub fn enable_depth_test(&self) {
        self.gl.enable(Gl::DEPTH_TEST);
        self.gl.depth_mask(true);
    }

    /// Additive blending for glowing point sprites
    pub fn enable_additive_blending(&self) {
        self.gl.enable(Gl::BLEND);
        self.gl.blend_func(Gl::SRC_ALPHA, Gl::ONE);
    }

    pub fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.gl.viewport(x, y, width, height);
    }
}
