use cgmath::*;

use crate::config::*;
use crate::surface::Surface;

/// The projection and model-view matrices for one draw.
///
/// Both are column-major, ready to upload as `mat4` uniforms.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TransformMatrices {
    pub projection: Matrix4<f32>,
    pub model_view: Matrix4<f32>,
}

impl TransformMatrices {
    /// Builds both matrices for a target with the given width/height ratio.
    ///
    /// `projection` must have passed `RendererConfig::validate`, and `aspect` must be positive.
    pub fn new(projection: &ProjectionConfig, camera_offset: Vector3<f32>, aspect: f32) -> Self {
        TransformMatrices {
            projection: perspective(
                Deg(projection.fov_degrees),
                aspect,
                projection.near,
                projection.far,
            ),
            model_view: Matrix4::from_translation(camera_offset),
        }
    }

    /// Builds both matrices for drawing to `surface`.
    pub fn for_surface(config: &RendererConfig, surface: &impl Surface) -> Self {
        Self::new(&config.projection, config.camera_offset, surface.aspect_ratio())
    }
}
