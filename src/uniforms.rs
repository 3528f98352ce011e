use crate::camera::TransformMatrices;
use crate::context::*;
use crate::error::RenderError;
use crate::shaders::*;

/// Holds uniform values for a given program.
///
/// Example implementation:
/// ```
/// # use cgmath::*;
/// # use webgl_quad::*;
/// # use webgl_quad::uniforms::*;
/// struct ExampleUniforms {
///     matrix: Matrix4<f32>,
/// }
///
/// struct ExampleUniformsGl<C: GraphicsContext> {
///     matrix: Matrix4Uniform<C>,
/// }
///
/// impl<C: GraphicsContext> Uniforms<C> for ExampleUniforms {
///     type GlUniforms = ExampleUniformsGl<C>;
///
///     fn update(&self, context: &C, gl_uniforms: &Self::GlUniforms) {
///         gl_uniforms.matrix.set(context, &self.matrix);
///     }
/// }
///
/// impl<C: GraphicsContext> GlUniforms<C> for ExampleUniformsGl<C> {
///     fn new(context: &C, program: &C::Program) -> Result<Self, RenderError> {
///         Ok(ExampleUniformsGl { matrix: Matrix4Uniform::new("matrix", context, program)? })
///     }
/// }
/// ```
pub trait Uniforms<C: GraphicsContext> {
    /// The `GlUniforms` instance corresponding to this `Uniforms`.
    type GlUniforms: GlUniforms<C>;

    /// Updates the given `GlUniforms` from this `Uniforms`. Should call `set` on each uniform
    /// in the associated `GlUniforms`. The program must already be in use.
    fn update(&self, context: &C, gl_uniforms: &Self::GlUniforms);
}

/// A type used to hold the uniform locations, which can be updated from a corresponding
/// instance of the `Uniforms` trait.
///
/// See the `Uniforms` trait for an example implementation.
pub trait GlUniforms<C: GraphicsContext>: Sized {
    fn new(context: &C, program: &C::Program) -> Result<Self, RenderError>;
}

/// The location of a `mat4` uniform.
pub struct Matrix4Uniform<C: GraphicsContext> {
    loc: C::UniformLocation,
    name: &'static str,
}

impl<C: GraphicsContext> Matrix4Uniform<C> {
    pub fn new(name: &'static str, context: &C, program: &C::Program) -> Result<Self, RenderError> {
        let loc = context
            .uniform_location(program, name)
            .ok_or_else(|| RenderError::MissingUniform(name.to_string()))?;
        Ok(Self { loc, name })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Uploads a column-major matrix, such as a `cgmath::Matrix4<f32>`.
    pub fn set(&self, context: &C, mat: &impl AsRef<[f32; 16]>) {
        context.uniform_matrix4(&self.loc, mat.as_ref());
    }
}

/// Uniform locations of the quad program.
pub struct QuadUniformsGl<C: GraphicsContext> {
    pub projection_matrix: Matrix4Uniform<C>,
    pub model_view_matrix: Matrix4Uniform<C>,
}

impl<C: GraphicsContext> GlUniforms<C> for QuadUniformsGl<C> {
    fn new(context: &C, program: &C::Program) -> Result<Self, RenderError> {
        Ok(QuadUniformsGl {
            projection_matrix: Matrix4Uniform::new(PROJECTION_MATRIX_UNIFORM, context, program)?,
            model_view_matrix: Matrix4Uniform::new(MODEL_VIEW_MATRIX_UNIFORM, context, program)?,
        })
    }
}

impl<C: GraphicsContext> Uniforms<C> for TransformMatrices {
    type GlUniforms = QuadUniformsGl<C>;

    fn update(&self, context: &C, gl_uniforms: &QuadUniformsGl<C>) {
        gl_uniforms.projection_matrix.set(context, &self.projection);
        gl_uniforms.model_view_matrix.set(context, &self.model_view);
    }
}
