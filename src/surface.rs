use cgmath::*;
use log::*;
use web_sys::*;

use crate::context::*;

/// A trait for things that can be rendered to.
pub trait Surface {
    /// Returns the size of the surface, in pixels.
    fn size(&self) -> Vector2<u32>;

    /// Returns the width/height ratio of the surface.
    ///
    /// See `aspect_ratio` for how empty surfaces are handled.
    fn aspect_ratio(&self) -> f32 {
        aspect_ratio(self.size())
    }
}

/// A surface of a fixed size, for rendering without a canvas.
impl Surface for Vector2<u32> {
    fn size(&self) -> Vector2<u32> {
        *self
    }
}

/// Computes the width/height ratio of a surface of the given size.
///
/// Each dimension is clamped to at least one pixel first, so a surface that has
/// collapsed to zero width or height still gives a finite, positive ratio.
pub fn aspect_ratio(size: Vector2<u32>) -> f32 {
    if size.x == 0 || size.y == 0 {
        warn!("Surface has an empty dimension ({}x{}); clamping to 1 pixel", size.x, size.y);
    }
    size.x.max(1) as f32 / size.y.max(1) as f32
}

/// Clears one or more buffers of the current draw target. Does nothing if `buffers` is empty.
///
/// Example usage:
/// ```
/// # use webgl_quad::*;
/// # let context = RecordingContext::new();
/// clear(&context, &[ClearBuffer::Color([0.0, 0.0, 0.0, 1.0]), ClearBuffer::Depth(1.0)]);
/// ```
pub fn clear<C: GraphicsContext>(context: &C, buffers: &[ClearBuffer]) {
    if buffers.is_empty() {
        return;
    }

    let mut color = false;
    let mut depth = false;
    for buffer in buffers {
        match *buffer {
            ClearBuffer::Color(value) => {
                context.clear_color(value);
                color = true;
            }
            ClearBuffer::Depth(value) => {
                context.clear_depth(value);
                depth = true;
            }
        }
    }

    context.clear(color, depth);
}

/// A surface that represents the screen/default framebuffer.
pub struct ScreenSurface {
    canvas: HtmlCanvasElement,
}

impl ScreenSurface {
    pub(crate) fn new(canvas: HtmlCanvasElement) -> Self {
        ScreenSurface { canvas }
    }

    /// Returns the canvas corresponding to this surface.
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

impl Surface for ScreenSurface {
    /// The size the canvas is displayed at, which is what the projection should match.
    fn size(&self) -> Vector2<u32> {
        vec2(self.canvas.client_width().max(0) as u32, self.canvas.client_height().max(0) as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::*;

    #[test]
    fn aspect_ratio_of_regular_surface() {
        assert_eq!(aspect_ratio(vec2(640, 480)), 640.0 / 480.0);
        assert_eq!(vec2(300u32, 150).aspect_ratio(), 2.0);
    }

    #[test]
    fn empty_surfaces_have_finite_aspect() {
        assert_eq!(aspect_ratio(vec2(0, 0)), 1.0);
        assert_eq!(aspect_ratio(vec2(640, 0)), 640.0);
        assert_eq!(aspect_ratio(vec2(0, 480)), 1.0 / 480.0);
        assert!(aspect_ratio(vec2(0, 0)).is_finite());
    }

    #[test]
    fn clear_sets_values_before_clearing() {
        let context = RecordingContext::new();
        clear(&context, &[ClearBuffer::Color([0.0, 0.0, 0.0, 1.0]), ClearBuffer::Depth(1.0)]);
        assert_eq!(
            context.calls(),
            vec![
                Call::ClearColor([0.0, 0.0, 0.0, 1.0]),
                Call::ClearDepth(1.0),
                Call::Clear { color: true, depth: true },
            ]
        );
    }

    #[test]
    fn clearing_nothing_issues_no_commands() {
        let context = RecordingContext::new();
        clear(&context, &[]);
        assert!(context.calls().is_empty());
    }

    #[test]
    fn clear_only_depth() {
        let context = RecordingContext::new();
        clear(&context, &[ClearBuffer::Depth(0.5)]);
        assert_eq!(
            context.calls(),
            vec![Call::ClearDepth(0.5), Call::Clear { color: false, depth: true }]
        );
    }
}
