use cgmath::*;
use log::*;
use std::marker::PhantomData;

use crate::context::*;
use crate::error::*;
use crate::uniforms::*;

/// A linked shader program for vertices of type `V` and uniforms located by `U`.
///
/// The program and its shaders are never deleted once linked; they live as long as the context.
pub struct ShaderProgram<C: GraphicsContext, V: Vertex, U: GlUniforms<C>> {
    pub(crate) program: C::Program,
    info: ProgramInfo<U>,
    phantom: PhantomData<V>,
}

/// Where each attribute of a vertex type lives in a linked program, and how to read it from the
/// array buffer.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct AttribBinding {
    pub name: &'static str,
    pub location: u32,
    pub layout: AttribLayout,
}

/// The binding record for a linked program: attribute and uniform locations by name.
///
/// Recomputed whenever a program is compiled.
pub struct ProgramInfo<U> {
    /// One binding per entry in `Vertex::ATTRIBUTES`, in the same order.
    pub attributes: Vec<AttribBinding>,
    pub uniforms: U,
}

impl<U> ProgramInfo<U> {
    /// Looks up every attribute of `V` and every uniform of `U` in `program`.
    pub fn locate<C, V>(context: &C, program: &C::Program) -> Result<Self, RenderError>
    where
        C: GraphicsContext,
        V: Vertex,
        U: GlUniforms<C>,
    {
        // A single attribute is tightly packed, which GL spells as a zero stride
        let stride = if V::ATTRIBUTES.len() == 1 { 0 } else { V::stride() * 4 };
        let mut offset = 0;
        let mut attributes = Vec::with_capacity(V::ATTRIBUTES.len());
        for &(name, size) in V::ATTRIBUTES {
            let location = context
                .attrib_location(program, name)
                .ok_or_else(|| RenderError::MissingAttribute(name.to_string()))?;
            attributes.push(AttribBinding {
                name,
                location,
                layout: AttribLayout { size, normalized: false, stride, offset: offset * 4 },
            });
            offset += size;
        }

        let uniforms = U::new(context, program)?;
        Ok(ProgramInfo { attributes, uniforms })
    }

    /// Returns the binding for the named attribute, if the vertex type has one.
    pub fn attribute(&self, name: &str) -> Option<&AttribBinding> {
        self.attributes.iter().find(|attr| attr.name == name)
    }
}

impl<C: GraphicsContext, V: Vertex, U: GlUniforms<C>> ShaderProgram<C, V, U> {
    /// Compiles both stages, links them, and locates the program's bindings.
    ///
    /// On failure every object created so far is deleted and the error carries the driver's
    /// diagnostic; no usable program is returned.
    pub fn new(
        context: &C,
        vert_shader_source: &str,
        frag_shader_source: &str,
    ) -> Result<Self, RenderError> {
        let vert_shader = Self::load_shader(context, ShaderStage::Vertex, vert_shader_source)?;
        let frag_shader =
            match Self::load_shader(context, ShaderStage::Fragment, frag_shader_source) {
                Ok(shader) => shader,
                Err(err) => {
                    context.delete_shader(&vert_shader);
                    return Err(err);
                }
            };

        let program = match context.create_program() {
            Some(program) => program,
            None => {
                context.delete_shader(&vert_shader);
                context.delete_shader(&frag_shader);
                return Err(RenderError::ResourceCreation("program"));
            }
        };
        context.attach_shader(&program, &vert_shader);
        context.attach_shader(&program, &frag_shader);
        context.link_program(&program);

        let result = if context.program_link_status(&program) {
            ProgramInfo::locate::<C, V>(context, &program)
        } else {
            let log = diagnostic_or_placeholder(context.program_info_log(&program));
            error!("Error linking program: {}", log);
            Err(RenderError::Link { log })
        };

        match result {
            Ok(info) => {
                debug!("Linked program with {} attribute(s)", info.attributes.len());
                Ok(ShaderProgram { program, info, phantom: PhantomData })
            }
            Err(err) => {
                context.delete_program(&program);
                context.delete_shader(&vert_shader);
                context.delete_shader(&frag_shader);
                Err(err)
            }
        }
    }

    fn load_shader(
        context: &C,
        stage: ShaderStage,
        source: &str,
    ) -> Result<C::Shader, RenderError> {
        let shader = context.create_shader(stage).ok_or(RenderError::ResourceCreation("shader"))?;
        context.shader_source(&shader, source);
        context.compile_shader(&shader);

        if !context.shader_compile_status(&shader) {
            let log = diagnostic_or_placeholder(context.shader_info_log(&shader));
            error!("Error compiling {} shader: {}", stage, log);
            context.delete_shader(&shader);
            return Err(RenderError::Compile { stage, log });
        }

        Ok(shader)
    }

    /// Returns the program's binding record.
    pub fn info(&self) -> &ProgramInfo<U> {
        &self.info
    }

    pub(crate) fn bind(&self, context: &C) {
        context.use_program(&self.program);
    }
}

/// A list of all attributes for a given program.
///
/// Each pair is (attribute name, attribute size).
///
/// The size should be the size in *floats*, not bytes.
pub type Attributes = &'static [(&'static str, i32)];

/// A vertex for a given program.
///
/// Example implementation:
/// ```
/// # use cgmath::*;
/// # use webgl_quad::*;
/// struct ExampleVertex {
///     pos: Vector2<f32>,
///     uv: [f32; 2],
/// }
///
/// impl Vertex for ExampleVertex {
///     const ATTRIBUTES: Attributes = &[("pos", 2), ("uv", 2)];
/// }
///
/// impl VertexComponent for ExampleVertex {
///     fn add_to_mesh(&self, f: &mut dyn FnMut(f32)) {
///         self.pos.add_to_mesh(f);
///         self.uv.add_to_mesh(f);
///     }
/// }
///
/// assert_eq!(ExampleVertex::stride(), 4);
/// ```
pub trait Vertex: VertexComponent {
    /// A list of all attributes that each vertex contains.
    const ATTRIBUTES: Attributes;

    /// The size of one vertex, in floats.
    fn stride() -> i32 {
        Self::ATTRIBUTES.iter().map(|&(_, size)| size).sum()
    }
}

/// A component of a vertex.
///
/// See the `Vertex` trait for an example implementation.
pub trait VertexComponent {
    /// Adds the `VertexComponent` to a mesh by calling the given closure for each
    /// `f32` component, in order. Composite `VertexComponent` instances can call
    /// `add_to_mesh` for each of their components rather than calling the closure directly.
    fn add_to_mesh(&self, f: &mut dyn FnMut(f32));
}

impl VertexComponent for f32 {
    fn add_to_mesh(&self, f: &mut dyn FnMut(f32)) {
        f(*self);
    }
}

impl VertexComponent for Vector2<f32> {
    fn add_to_mesh(&self, f: &mut dyn FnMut(f32)) {
        f(self.x);
        f(self.y);
    }
}

impl VertexComponent for Point2<f32> {
    fn add_to_mesh(&self, f: &mut dyn FnMut(f32)) {
        f(self.x);
        f(self.y);
    }
}

impl VertexComponent for [f32; 2] {
    fn add_to_mesh(&self, f: &mut dyn FnMut(f32)) {
        f(self[0]);
        f(self[1]);
    }
}

impl VertexComponent for [f32; 3] {
    fn add_to_mesh(&self, f: &mut dyn FnMut(f32)) {
        f(self[0]);
        f(self[1]);
        f(self[2]);
    }
}
