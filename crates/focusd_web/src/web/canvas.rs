use focusd_site::matrix::Renderer;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

pub(super) fn context_2d(
    canvas: &web_sys::HtmlCanvasElement,
) -> Result<web_sys::CanvasRenderingContext2d, String> {
    canvas
        .get_context("2d")
        .map_err(|_| "canvas: get_context threw".to_string())?
        .ok_or("canvas: missing 2d context".to_string())?
        .dyn_into::<web_sys::CanvasRenderingContext2d>()
        .map_err(|_| "canvas: context is not 2d".to_string())
}

/// Size the backing store to the viewport.
pub(super) fn fit_to_window(canvas: &web_sys::HtmlCanvasElement) -> (u32, u32) {
    let Some(w) = web_sys::window() else {
        return (canvas.width(), canvas.height());
    };
    let px = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as u32;
    let (width, height) = (px(w.inner_width()), px(w.inner_height()));
    canvas.set_width(width);
    canvas.set_height(height);
    (width, height)
}

pub(super) struct CanvasRenderer {
    ctx: web_sys::CanvasRenderingContext2d,
}

impl CanvasRenderer {
    pub(super) fn new(canvas: &web_sys::HtmlCanvasElement) -> Result<Self, String> {
        Ok(Self {
            ctx: context_2d(canvas)?,
        })
    }
}

impl Renderer for CanvasRenderer {
    #[allow(deprecated)]
    fn set_fill_style(&mut self, style: &str) {
        self.ctx.set_fill_style(&JsValue::from_str(style));
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ctx.fill_rect(x, y, w, h);
    }

    fn set_font(&mut self, font: &str) {
        self.ctx.set_font(font);
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        let _ = self.ctx.fill_text(text, x, y);
    }
}

/// Stand-in before the canvas exists; nothing draws until the system starts.
pub(super) struct Offscreen;

impl Renderer for Offscreen {
    fn set_fill_style(&mut self, _style: &str) {}
    fn fill_rect(&mut self, _x: f64, _y: f64, _w: f64, _h: f64) {}
    fn set_font(&mut self, _font: &str) {}
    fn fill_text(&mut self, _text: &str, _x: f64, _y: f64) {}
}
