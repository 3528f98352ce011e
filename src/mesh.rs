use log::*;
use std::marker::PhantomData;

use crate::context::*;
use crate::error::RenderError;
use crate::program::*;
use crate::shaders::VERTEX_POSITION_ATTRIBUTE;
use crate::uniforms::*;

/// A primitive topology.
#[doc(hidden)]
pub trait Primitive {
    const MODE: PrimitiveMode;
}

/// Each vertex after the first two forms a triangle with the previous two.
#[derive(Copy, Clone)]
pub struct TriangleStrip;

impl Primitive for TriangleStrip {
    const MODE: PrimitiveMode = PrimitiveMode::TriangleStrip;
}

/// The corners of the unit quad, in triangle-strip order.
pub const QUAD_POSITIONS: [[f32; 2]; 4] = [[1.0, 1.0], [-1.0, 1.0], [1.0, -1.0], [-1.0, -1.0]];

/// A vertex of the quad: a 2D position, widened to `vec4` by the vertex shader.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct QuadVertex {
    pub position: [f32; 2],
}

impl Vertex for QuadVertex {
    const ATTRIBUTES: Attributes = &[(VERTEX_POSITION_ATTRIBUTE, 2)];
}

impl VertexComponent for QuadVertex {
    fn add_to_mesh(&self, f: &mut dyn FnMut(f32)) {
        self.position.add_to_mesh(f);
    }
}

/// A GPU buffer of vertices, drawn without indices.
///
/// The contents are fixed once uploaded.
pub struct GeometryBuffer<C: GraphicsContext, V: Vertex, P: Primitive> {
    buffer: C::Buffer,
    vertex_count: i32,
    phantom: PhantomData<(V, P)>,
}

/// The buffer that holds the quad.
pub type QuadBuffer<C> = GeometryBuffer<C, QuadVertex, TriangleStrip>;

impl<C: GraphicsContext, V: Vertex, P: Primitive> GeometryBuffer<C, V, P> {
    /// Creates a buffer and uploads `vertices` into it as tightly packed `f32`s.
    pub fn new(context: &C, vertices: &[V], usage: BufferUsage) -> Result<Self, RenderError> {
        let mut vertex_data = Vec::with_capacity(vertices.len() * V::stride() as usize);
        for vert in vertices {
            vert.add_to_mesh(&mut |data| vertex_data.push(data));
        }

        let buffer = context.create_buffer().ok_or(RenderError::ResourceCreation("buffer"))?;
        context.bind_array_buffer(&buffer);
        context.array_buffer_data(&vertex_data, usage);
        debug!("Uploaded {} vertices ({} floats)", vertices.len(), vertex_data.len());

        Ok(GeometryBuffer { buffer, vertex_count: vertices.len() as i32, phantom: PhantomData })
    }

    pub fn vertex_count(&self) -> i32 {
        self.vertex_count
    }

    pub fn buffer(&self) -> &C::Buffer {
        &self.buffer
    }

    /// Points each of the program's vertex attributes at this buffer.
    fn bind<U: GlUniforms<C>>(&self, context: &C, info: &ProgramInfo<U>) {
        context.bind_array_buffer(&self.buffer);
        for attr in &info.attributes {
            context.vertex_attrib_pointer(attr.location, attr.layout);
            context.enable_vertex_attrib_array(attr.location);
        }
    }

    /// Draws every vertex in the buffer with `program`.
    ///
    /// Depth and clear state are left as they are; set them up first.
    pub fn draw<U: GlUniforms<C>>(
        &self,
        context: &C,
        program: &ShaderProgram<C, V, U>,
        uniforms: &impl Uniforms<C, GlUniforms = U>,
    ) {
        self.bind(context, program.info());
        program.bind(context);
        uniforms.update(context, &program.info().uniforms);

        context.draw_arrays(P::MODE, 0, self.vertex_count);
    }
}

impl<C: GraphicsContext> QuadBuffer<C> {
    /// Uploads `QUAD_POSITIONS` into a new static buffer.
    pub fn upload_quad(context: &C) -> Result<Self, RenderError> {
        let vertices: Vec<QuadVertex> =
            QUAD_POSITIONS.iter().map(|&position| QuadVertex { position }).collect();
        Self::new(context, &vertices, BufferUsage::StaticDraw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::*;

    #[test]
    fn quad_upload_is_static_and_ordered() {
        let context = RecordingContext::new();
        let quad = QuadBuffer::upload_quad(&context).unwrap();

        assert_eq!(quad.vertex_count(), 4);
        assert_eq!(
            context.buffer_contents(quad.buffer()),
            Some(vec![1.0, 1.0, -1.0, 1.0, 1.0, -1.0, -1.0, -1.0])
        );
        assert!(context.calls().contains(&Call::ArrayBufferData {
            buffer: Some(*quad.buffer()),
            len: 8,
            usage: BufferUsage::StaticDraw,
        }));
    }

    #[test]
    fn upload_binds_before_writing() {
        let context = RecordingContext::new();
        let quad = QuadBuffer::upload_quad(&context).unwrap();
        let buffer = *quad.buffer();
        assert_eq!(
            context.calls(),
            vec![
                Call::CreateBuffer { buffer },
                Call::BindArrayBuffer { buffer },
                Call::ArrayBufferData {
                    buffer: Some(buffer),
                    len: 8,
                    usage: BufferUsage::StaticDraw,
                },
            ]
        );
    }

    #[test]
    fn lost_context_cannot_create_buffers() {
        let context = RecordingContext::new();
        context.set_context_lost(true);
        assert_eq!(
            QuadBuffer::upload_quad(&context).err(),
            Some(RenderError::ResourceCreation("buffer"))
        );
    }

    #[test]
    fn vertex_count_follows_the_uploaded_vertices() {
        let context = RecordingContext::new();
        let verts: Vec<QuadVertex> = [[0.0, 1.0], [1.0, 0.0], [0.0, 0.0]]
            .iter()
            .map(|&position| QuadVertex { position })
            .collect();
        let triangle = QuadBuffer::new(&context, &verts, BufferUsage::StaticDraw).unwrap();
        assert_eq!(triangle.vertex_count(), 3);
        assert_eq!(<TriangleStrip as Primitive>::MODE, PrimitiveMode::TriangleStrip);
        assert_eq!(context.buffer_contents(triangle.buffer()).map(|data| data.len()), Some(6));
    }
}
