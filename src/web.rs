//! The browser-facing entry points.

use log::*;
use wasm_bindgen::prelude::*;
use web_sys::window;

use crate::config::RendererConfig;
use crate::error::RenderError;
use crate::renderer::Renderer;
use crate::surface::ScreenSurface;
use crate::webgl::GlContext;

/// A renderer bound to a canvas.
#[wasm_bindgen]
pub struct QuadApp {
    renderer: Renderer<GlContext>,
    surface: ScreenSurface,
}

impl QuadApp {
    fn start(canvas_id: &str, config: RendererConfig) -> Result<QuadApp, RenderError> {
        init_logging();
        let (context, surface) = GlContext::new(canvas_id, config.antialias)?;
        let renderer = Renderer::initialize(context, config)?;
        Ok(QuadApp { renderer, surface })
    }
}

#[wasm_bindgen]
impl QuadApp {
    /// Acquires a WebGL 2 context on the canvas, compiles the program, and uploads the quad.
    ///
    /// Failures are returned to the caller as the error message; nothing is shown to the user.
    pub fn initialize(canvas_id: &str) -> Result<QuadApp, JsValue> {
        Self::start(canvas_id, RendererConfig::default())
            .map_err(|err| JsValue::from_str(&err.to_string()))
    }

    /// Draws one frame.
    #[wasm_bindgen(js_name = renderOnce)]
    pub fn render_once(&self) {
        self.renderer.render_once(&self.surface);
    }
}

/// Initializes and draws one frame on the canvas, showing any failure in a blocking alert.
#[wasm_bindgen]
pub fn run(canvas_id: &str) {
    match QuadApp::start(canvas_id, RendererConfig::default()) {
        Ok(app) => app.render_once(),
        Err(err) => {
            error!("{}", err);
            if let Some(window) = window() {
                // Nothing else can report a failed alert
                let _ = window.alert_with_message(&err.to_string());
            }
        }
    }
}

fn init_logging() {
    console_error_panic_hook::set_once();
    // Only fails if a logger is already installed
    let _ = console_log::init_with_level(Level::Debug);
}
