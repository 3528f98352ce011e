use log::*;

use crate::camera::TransformMatrices;
use crate::config::RendererConfig;
use crate::context::*;
use crate::error::RenderError;
use crate::mesh::*;
use crate::program::ShaderProgram;
use crate::shaders::*;
use crate::surface::*;
use crate::uniforms::QuadUniformsGl;

/// The program that draws the quad.
pub type QuadProgram<C> = ShaderProgram<C, QuadVertex, QuadUniformsGl<C>>;

/// Compiles and links the quad's program from the given sources.
pub fn compile_program<C: GraphicsContext>(
    context: &C,
    vert_shader_source: &str,
    frag_shader_source: &str,
) -> Result<QuadProgram<C>, RenderError> {
    QuadProgram::new(context, vert_shader_source, frag_shader_source)
}

/// Uploads the unit quad into a static buffer.
pub fn upload_geometry<C: GraphicsContext>(context: &C) -> Result<QuadBuffer<C>, RenderError> {
    QuadBuffer::upload_quad(context)
}

/// Owns a context along with the quad's program and geometry.
///
/// Everything fallible happens in `initialize`; once it succeeds, `render_once` can't fail.
pub struct Renderer<C: GraphicsContext> {
    context: C,
    program: QuadProgram<C>,
    geometry: QuadBuffer<C>,
    config: RendererConfig,
}

impl<C: GraphicsContext> Renderer<C> {
    /// Compiles the fixed shader pair, locates its bindings, and uploads the quad.
    pub fn initialize(context: C, config: RendererConfig) -> Result<Self, RenderError> {
        config.validate()?;
        let program = compile_program(&context, VERTEX_SHADER, FRAGMENT_SHADER)?;
        let geometry = upload_geometry(&context)?;
        info!("Renderer initialized");

        Ok(Renderer { context, program, geometry, config })
    }

    /// Draws a single frame to `surface`.
    ///
    /// Clears color and depth, enables depth testing with nearer-or-equal passing, then draws
    /// the quad as one triangle strip with freshly computed transforms.
    pub fn render_once(&self, surface: &impl Surface) {
        let context = &self.context;
        clear(
            context,
            &[
                ClearBuffer::Color(self.config.clear_color),
                ClearBuffer::Depth(self.config.clear_depth),
            ],
        );
        context.enable(GlFlag::DepthTest);
        context.depth_func(DepthFunc::LessEqual);

        let matrices = TransformMatrices::for_surface(&self.config, surface);
        self.geometry.draw(context, &self.program, &matrices);
        debug!("Drew {} vertices", self.geometry.vertex_count());
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn program(&self) -> &QuadProgram<C> {
        &self.program
    }

    pub fn geometry(&self) -> &QuadBuffer<C> {
        &self.geometry
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProjectionConfig;
    use crate::recording::*;
    use cgmath::*;

    fn renderer() -> Renderer<RecordingContext> {
        Renderer::initialize(RecordingContext::new(), RendererConfig::default()).unwrap()
    }

    #[test]
    fn render_once_issues_commands_in_order() {
        let renderer = renderer();
        let buffer = *renderer.geometry().buffer();
        let program = renderer.program().program;
        renderer.context().clear_calls();

        renderer.render_once(&vec2(640u32, 480));

        let calls = renderer.context().calls();
        let expected_prefix = vec![
            Call::ClearColor([0.0, 0.0, 0.0, 1.0]),
            Call::ClearDepth(1.0),
            Call::Clear { color: true, depth: true },
            Call::Enable(GlFlag::DepthTest),
            Call::DepthFunc(DepthFunc::LessEqual),
            Call::BindArrayBuffer { buffer },
            Call::VertexAttribPointer {
                location: 0,
                layout: AttribLayout { size: 2, normalized: false, stride: 0, offset: 0 },
            },
            Call::EnableVertexAttribArray { location: 0 },
            Call::UseProgram { program },
        ];
        assert_eq!(&calls[..expected_prefix.len()], &expected_prefix[..]);
        assert_eq!(
            calls.last(),
            Some(&Call::DrawArrays { mode: PrimitiveMode::TriangleStrip, first: 0, count: 4 })
        );
        assert_eq!(calls.len(), expected_prefix.len() + 3);
    }

    #[test]
    fn render_once_uploads_both_matrices() {
        let renderer = renderer();
        renderer.render_once(&vec2(640u32, 480));

        let uploads = renderer.context().uniform_uploads();
        let names: Vec<_> = uploads.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec![PROJECTION_MATRIX_UNIFORM, MODEL_VIEW_MATRIX_UNIFORM]);

        let expected: Matrix4<f32> = perspective(Deg(45.0), 640.0 / 480.0, 0.1, 100.0);
        assert_eq!(&uploads[0].1, AsRef::<[f32; 16]>::as_ref(&expected));
        assert_eq!(&uploads[1].1[12..], &[0.0, 0.0, -6.0, 1.0]);
    }

    #[test]
    fn each_render_is_one_draw() {
        let renderer = renderer();
        renderer.render_once(&vec2(100u32, 100));
        assert_eq!(renderer.context().draw_calls().len(), 1);
        renderer.render_once(&vec2(100u32, 100));
        assert_eq!(renderer.context().draw_calls().len(), 2);
    }

    #[test]
    fn invalid_config_is_rejected_before_touching_the_context() {
        let config = RendererConfig {
            projection: ProjectionConfig { near: -1.0, ..Default::default() },
            ..Default::default()
        };
        let context = RecordingContext::new();
        match Renderer::initialize(context, config) {
            Err(RenderError::InvalidConfig(_)) => {}
            Err(err) => panic!("unexpected error: {}", err),
            Ok(_) => panic!("expected an invalid config error"),
        }
    }

    #[test]
    fn custom_clear_color_is_used() {
        let config = RendererConfig { clear_color: [0.2, 0.3, 0.4, 1.0], ..Default::default() };
        let renderer = Renderer::initialize(RecordingContext::new(), config).unwrap();
        renderer.context().clear_calls();
        renderer.render_once(&vec2(1u32, 1));
        assert_eq!(renderer.context().calls()[0], Call::ClearColor([0.2, 0.3, 0.4, 1.0]));
    }
}
