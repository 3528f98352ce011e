use js_sys::Float32Array;
use log::*;
use wasm_bindgen::JsCast;
use web_sys::*;

use crate::context::*;
use crate::error::RenderError;
use crate::surface::ScreenSurface;

type WebGl2 = WebGl2RenderingContext;

/// A WebGL 2 context.
#[derive(Clone)]
pub struct GlContext {
    pub(crate) inner: WebGl2RenderingContext,
}

impl GlContext {
    /// Creates a `GlContext` bound to the canvas with the given element id, and the associated
    /// surface.
    ///
    /// Returns `RenderError::ContextUnavailable` if there is no such canvas or the browser
    /// refuses to create a WebGL 2 context for it. No other context type is tried, so hosts
    /// that only support WebGL 1 are rejected even though the shaders are GLSL ES 1.00.
    pub fn new(canvas_id: &str, antialias: bool) -> Result<(Self, ScreenSurface), RenderError> {
        let unavailable = |reason: &str| RenderError::ContextUnavailable(reason.to_string());

        let document = window()
            .ok_or_else(|| unavailable("no global window"))?
            .document()
            .ok_or_else(|| unavailable("window has no document"))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| RenderError::ContextUnavailable(format!("no element `{}`", canvas_id)))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| {
                RenderError::ContextUnavailable(format!("element `{}` is not a canvas", canvas_id))
            })?;

        let attributes = WebGlContextAttributes::new();
        attributes.set_antialias(antialias);
        let context = canvas
            .get_context_with_context_options("webgl2", attributes.as_ref())
            .map_err(|_| unavailable("getContext threw"))?
            .ok_or_else(|| unavailable("webgl2 is not supported"))?
            .dyn_into::<WebGl2RenderingContext>()
            .map_err(|_| unavailable("getContext returned an unexpected object"))?;
        debug!("Created WebGL 2 context on `{}`", canvas_id);

        Ok((GlContext { inner: context }, ScreenSurface::new(canvas)))
    }
}

fn shader_stage_as_gl(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => WebGl2::VERTEX_SHADER,
        ShaderStage::Fragment => WebGl2::FRAGMENT_SHADER,
    }
}

fn flag_as_gl(flag: GlFlag) -> u32 {
    match flag {
        GlFlag::DepthTest => WebGl2::DEPTH_TEST,
    }
}

fn depth_func_as_gl(func: DepthFunc) -> u32 {
    match func {
        DepthFunc::LessEqual => WebGl2::LEQUAL,
    }
}

fn usage_as_gl(usage: BufferUsage) -> u32 {
    match usage {
        BufferUsage::StaticDraw => WebGl2::STATIC_DRAW,
    }
}

fn mode_as_gl(mode: PrimitiveMode) -> u32 {
    match mode {
        PrimitiveMode::TriangleStrip => WebGl2::TRIANGLE_STRIP,
    }
}

impl GraphicsContext for GlContext {
    type Shader = WebGlShader;
    type Program = WebGlProgram;
    type Buffer = WebGlBuffer;
    type UniformLocation = WebGlUniformLocation;

    fn create_shader(&self, stage: ShaderStage) -> Option<WebGlShader> {
        self.inner.create_shader(shader_stage_as_gl(stage))
    }

    fn shader_source(&self, shader: &WebGlShader, source: &str) {
        self.inner.shader_source(shader, source);
    }

    fn compile_shader(&self, shader: &WebGlShader) {
        self.inner.compile_shader(shader);
    }

    fn shader_compile_status(&self, shader: &WebGlShader) -> bool {
        self.inner.get_shader_parameter(shader, WebGl2::COMPILE_STATUS).as_bool().unwrap_or(false)
    }

    fn shader_info_log(&self, shader: &WebGlShader) -> Option<String> {
        self.inner.get_shader_info_log(shader)
    }

    fn delete_shader(&self, shader: &WebGlShader) {
        self.inner.delete_shader(Some(shader));
    }

    fn create_program(&self) -> Option<WebGlProgram> {
        self.inner.create_program()
    }

    fn attach_shader(&self, program: &WebGlProgram, shader: &WebGlShader) {
        self.inner.attach_shader(program, shader);
    }

    fn link_program(&self, program: &WebGlProgram) {
        self.inner.link_program(program);
    }

    fn program_link_status(&self, program: &WebGlProgram) -> bool {
        self.inner.get_program_parameter(program, WebGl2::LINK_STATUS).as_bool().unwrap_or(false)
    }

    fn program_info_log(&self, program: &WebGlProgram) -> Option<String> {
        self.inner.get_program_info_log(program)
    }

    fn delete_program(&self, program: &WebGlProgram) {
        self.inner.delete_program(Some(program));
    }

    fn use_program(&self, program: &WebGlProgram) {
        self.inner.use_program(Some(program));
    }

    fn attrib_location(&self, program: &WebGlProgram, name: &str) -> Option<u32> {
        let loc = self.inner.get_attrib_location(program, name);
        if loc < 0 {
            None
        } else {
            Some(loc as u32)
        }
    }

    fn uniform_location(&self, program: &WebGlProgram, name: &str) -> Option<WebGlUniformLocation> {
        self.inner.get_uniform_location(program, name)
    }

    fn create_buffer(&self) -> Option<WebGlBuffer> {
        self.inner.create_buffer()
    }

    fn bind_array_buffer(&self, buffer: &WebGlBuffer) {
        self.inner.bind_buffer(WebGl2::ARRAY_BUFFER, Some(buffer));
    }

    fn array_buffer_data(&self, data: &[f32], usage: BufferUsage) {
        // Copies into JS memory, so `data` doesn't need to outlive the call
        let array = Float32Array::from(data);
        self.inner.buffer_data_with_array_buffer_view(
            WebGl2::ARRAY_BUFFER,
            &array,
            usage_as_gl(usage),
        );
    }

    fn vertex_attrib_pointer(&self, location: u32, layout: AttribLayout) {
        self.inner.vertex_attrib_pointer_with_i32(
            location,
            layout.size,
            WebGl2::FLOAT,
            layout.normalized,
            layout.stride,
            layout.offset,
        );
    }

    fn enable_vertex_attrib_array(&self, location: u32) {
        self.inner.enable_vertex_attrib_array(location);
    }

    fn uniform_matrix4(&self, location: &WebGlUniformLocation, value: &[f32; 16]) {
        self.inner.uniform_matrix4fv_with_f32_array(Some(location), false, value);
    }

    fn clear_color(&self, color: [f32; 4]) {
        self.inner.clear_color(color[0], color[1], color[2], color[3]);
    }

    fn clear_depth(&self, depth: f32) {
        self.inner.clear_depth(depth);
    }

    fn clear(&self, color: bool, depth: bool) {
        let mut bits = 0;
        if color {
            bits |= WebGl2::COLOR_BUFFER_BIT;
        }
        if depth {
            bits |= WebGl2::DEPTH_BUFFER_BIT;
        }
        self.inner.clear(bits);
    }

    fn enable(&self, flag: GlFlag) {
        self.inner.enable(flag_as_gl(flag));
    }

    fn depth_func(&self, func: DepthFunc) {
        self.inner.depth_func(depth_func_as_gl(func));
    }

    fn draw_arrays(&self, mode: PrimitiveMode, first: i32, count: i32) {
        self.inner.draw_arrays(mode_as_gl(mode), first, count);
    }
}
