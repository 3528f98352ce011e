use std::fmt;

/// A shader stage.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum GlFlag {
    DepthTest,
}

/// The depth comparison used when depth testing is enabled.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DepthFunc {
    /// Nearer or equally near fragments pass.
    LessEqual,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BufferUsage {
    StaticDraw,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PrimitiveMode {
    TriangleStrip,
}

/// A buffer to clear, along with the value to clear it to.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ClearBuffer {
    Color([f32; 4]),
    Depth(f32),
}

/// How a float attribute is pulled out of the bound array buffer.
///
/// `stride` and `offset` are in bytes; a stride of 0 means tightly packed.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct AttribLayout {
    pub size: i32,
    pub normalized: bool,
    pub stride: i32,
    pub offset: i32,
}

/// The subset of a GL-style API that the renderer needs.
///
/// `GlContext` implements this over WebGL 2; `RecordingContext` implements it in memory so the
/// pipeline can be exercised without a browser. Object handles are associated types so each
/// implementation keeps its own notion of a shader, program, buffer, and uniform location.
pub trait GraphicsContext {
    type Shader;
    type Program;
    type Buffer;
    type UniformLocation;

    fn create_shader(&self, stage: ShaderStage) -> Option<Self::Shader>;
    fn shader_source(&self, shader: &Self::Shader, source: &str);
    fn compile_shader(&self, shader: &Self::Shader);
    fn shader_compile_status(&self, shader: &Self::Shader) -> bool;
    fn shader_info_log(&self, shader: &Self::Shader) -> Option<String>;
    fn delete_shader(&self, shader: &Self::Shader);

    fn create_program(&self) -> Option<Self::Program>;
    fn attach_shader(&self, program: &Self::Program, shader: &Self::Shader);
    fn link_program(&self, program: &Self::Program);
    fn program_link_status(&self, program: &Self::Program) -> bool;
    fn program_info_log(&self, program: &Self::Program) -> Option<String>;
    fn delete_program(&self, program: &Self::Program);
    fn use_program(&self, program: &Self::Program);

    /// Returns `None` if the program has no active attribute with this name.
    fn attrib_location(&self, program: &Self::Program, name: &str) -> Option<u32>;
    /// Returns `None` if the program has no active uniform with this name.
    fn uniform_location(&self, program: &Self::Program, name: &str)
        -> Option<Self::UniformLocation>;

    fn create_buffer(&self) -> Option<Self::Buffer>;
    fn bind_array_buffer(&self, buffer: &Self::Buffer);
    /// Uploads `data` into the currently bound array buffer.
    fn array_buffer_data(&self, data: &[f32], usage: BufferUsage);

    fn vertex_attrib_pointer(&self, location: u32, layout: AttribLayout);
    fn enable_vertex_attrib_array(&self, location: u32);
    /// Uploads a column-major 4x4 matrix.
    fn uniform_matrix4(&self, location: &Self::UniformLocation, value: &[f32; 16]);

    fn clear_color(&self, color: [f32; 4]);
    fn clear_depth(&self, depth: f32);
    /// Clears the color and/or depth buffers to the current clear values.
    fn clear(&self, color: bool, depth: bool);
    fn enable(&self, flag: GlFlag);
    fn depth_func(&self, func: DepthFunc);

    fn draw_arrays(&self, mode: PrimitiveMode, first: i32, count: i32);
}
