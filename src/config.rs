use cgmath::*;
use serde::*;

use crate::error::RenderError;

/// The perspective projection's parameters.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Vertical field of view, in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        ProjectionConfig { fov_degrees: 45.0, near: 0.1, far: 100.0 }
    }
}

/// Everything the renderer needs besides the context itself.
///
/// The defaults draw the quad as a white square six units in front of the camera on a black
/// background.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Requested when the context is created; the browser may ignore it.
    pub antialias: bool,
    pub clear_color: [f32; 4],
    pub clear_depth: f32,
    pub projection: ProjectionConfig,
    /// Translation applied to the identity to build the model-view matrix.
    pub camera_offset: Vector3<f32>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        RendererConfig {
            antialias: true,
            clear_color: [0.0, 0.0, 0.0, 1.0],
            clear_depth: 1.0,
            projection: ProjectionConfig::default(),
            camera_offset: vec3(0.0, 0.0, -6.0),
        }
    }
}

impl RendererConfig {
    /// Checks that a projection can be built from this config and that clear values are in
    /// range.
    pub fn validate(&self) -> Result<(), RenderError> {
        let invalid = |msg: String| Err(RenderError::InvalidConfig(msg));
        let ProjectionConfig { fov_degrees, near, far } = self.projection;

        if !(fov_degrees > 0.0 && fov_degrees < 180.0) {
            return invalid(format!(
                "field of view must be in (0, 180) degrees, got {}",
                fov_degrees
            ));
        }
        if !(near > 0.0 && near.is_finite()) {
            return invalid(format!("near plane must be positive, got {}", near));
        }
        if !(far > near && far.is_finite()) {
            return invalid(format!("far plane ({}) must be beyond the near plane ({})", far, near));
        }
        if !(0.0..=1.0).contains(&self.clear_depth) {
            return invalid(format!("clear depth must be in [0, 1], got {}", self.clear_depth));
        }
        if self.clear_color.iter().any(|c| !c.is_finite())
            || !(self.camera_offset.x.is_finite()
                && self.camera_offset.y.is_finite()
                && self.camera_offset.z.is_finite())
        {
            return invalid("clear color and camera offset must be finite".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = RendererConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.projection.fov_degrees, 45.0);
        assert_eq!(config.projection.near, 0.1);
        assert_eq!(config.projection.far, 100.0);
        assert_eq!(config.camera_offset, vec3(0.0, 0.0, -6.0));
        assert_eq!(config.clear_color, [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let config: RendererConfig =
            serde_json::from_str(r#"{ "projection": { "fov_degrees": 60.0 }, "antialias": false }"#)
                .unwrap();
        assert_eq!(config.projection.fov_degrees, 60.0);
        assert_eq!(config.projection.far, 100.0);
        assert!(!config.antialias);
        assert_eq!(config.clear_depth, 1.0);
    }

    #[test]
    fn camera_offset_round_trips_through_json() {
        let config = RendererConfig { camera_offset: vec3(1.0, -2.0, -10.0), ..Default::default() };
        let json = serde_json::to_string(&config).unwrap();
        let back: RendererConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn rejects_degenerate_projections() {
        let with = |projection| RendererConfig { projection, ..Default::default() };

        for projection in &[
            ProjectionConfig { fov_degrees: 0.0, ..Default::default() },
            ProjectionConfig { fov_degrees: 180.0, ..Default::default() },
            ProjectionConfig { fov_degrees: f32::NAN, ..Default::default() },
            ProjectionConfig { near: 0.0, ..Default::default() },
            ProjectionConfig { near: 10.0, far: 10.0, ..Default::default() },
            ProjectionConfig { far: f32::INFINITY, ..Default::default() },
        ] {
            match with(*projection).validate() {
                Err(RenderError::InvalidConfig(_)) => {}
                other => panic!("{:?} should be rejected, got {:?}", projection, other),
            }
        }
    }

    #[test]
    fn rejects_out_of_range_clear_depth() {
        let config = RendererConfig { clear_depth: 1.5, ..Default::default() };
        assert!(config.validate().is_err());
    }
}
