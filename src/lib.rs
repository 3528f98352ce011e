//! Draws a single white quad with WebGL 2: acquire a context, compile a fixed shader pair,
//! upload four vertices, and issue one triangle-strip draw.
//!
//! The pipeline is written against the `GraphicsContext` trait, so it runs the same on a real
//! `GlContext` and on the in-memory `RecordingContext`.

#![deny(bare_trait_objects)]

mod camera;
mod config;
mod context;
mod error;
mod mesh;
mod program;
pub mod recording;
mod renderer;
pub mod shaders;
mod surface;
pub mod uniforms;
mod web;
mod webgl;

pub use crate::camera::*;
pub use crate::config::*;
pub use crate::context::*;
pub use crate::error::*;
pub use crate::mesh::*;
pub use crate::program::*;
pub use crate::recording::RecordingContext;
pub use crate::renderer::*;
pub use crate::surface::*;
pub use crate::web::*;
pub use crate::webgl::*;
pub use uniforms::{GlUniforms, Uniforms};
