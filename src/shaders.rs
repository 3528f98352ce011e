//! The fixed GLSL sources for the quad.
//!
//! Both are GLSL ES 1.00, which WebGL 2 still accepts.

/// Transforms each position by `uProjectionMatrix * uModelViewMatrix`.
pub const VERTEX_SHADER: &str = r#"
attribute vec4 aVertexPosition;

uniform mat4 uModelViewMatrix;
uniform mat4 uProjectionMatrix;

void main() {
    gl_Position = uProjectionMatrix * uModelViewMatrix * aVertexPosition;
}
"#;

/// Opaque white, regardless of input.
pub const FRAGMENT_SHADER: &str = r#"
void main() {
    gl_FragColor = vec4(1.0, 1.0, 1.0, 1.0);
}
"#;

pub const VERTEX_POSITION_ATTRIBUTE: &str = "aVertexPosition";
pub const PROJECTION_MATRIX_UNIFORM: &str = "uProjectionMatrix";
pub const MODEL_VIEW_MATRIX_UNIFORM: &str = "uModelViewMatrix";
