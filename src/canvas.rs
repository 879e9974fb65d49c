use crate::error::ConfigurationError;
use crate::surface::{ColorStop, Paint, Surface};
use std::f64::consts::TAU;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasGradient, CanvasRenderingContext2d, HtmlCanvasElement};

/// [`Surface`] backed by a browser 2-D canvas context.
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }

    pub fn from_canvas(canvas: &HtmlCanvasElement) -> Result<Self, ConfigurationError> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .ok_or(ConfigurationError::MissingContext)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| ConfigurationError::MissingContext)?;
        Ok(Self::new(ctx))
    }

    fn add_stops(gradient: &CanvasGradient, stops: &[ColorStop]) {
        for stop in stops {
            let _ = gradient.add_color_stop(stop.offset as f32, &stop.color.css());
        }
    }

    // Browsers throw on non-finite gradient geometry; that draw call is skipped.
    fn style(&self, paint: &Paint) -> Option<JsValue> {
        match paint {
            Paint::Solid(rgba) => Some(JsValue::from_str(&rgba.css())),
            Paint::Linear(g) => {
                let gradient = self
                    .ctx
                    .create_linear_gradient(g.from.0, g.from.1, g.to.0, g.to.1);
                Self::add_stops(&gradient, &g.stops);
                Some(gradient.into())
            }
            Paint::Radial(g) => {
                let (x0, y0, r0) = g.inner;
                let (x1, y1, r1) = g.outer;
                let gradient = self.ctx.create_radial_gradient(x0, y0, r0, x1, y1, r1).ok()?;
                Self::add_stops(&gradient, &g.stops);
                Some(gradient.into())
            }
        }
    }
}

impl Surface for CanvasSurface {
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.clear_rect(x, y, width, height);
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.ctx.set_global_alpha(alpha);
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, paint: &Paint) {
        let Some(style) = self.style(paint) else {
            return;
        };
        self.ctx.set_fill_style(&style);
        self.ctx.begin_path();
        if self.ctx.arc(x, y, radius.max(0.0), 0.0, TAU).is_ok() {
            self.ctx.fill();
        }
    }

    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), width: f64, paint: &Paint) {
        let Some(style) = self.style(paint) else {
            return;
        };
        self.ctx.set_stroke_style(&style);
        self.ctx.set_line_width(width);
        self.ctx.set_line_cap("round");
        self.ctx.begin_path();
        self.ctx.move_to(from.0, from.1);
        self.ctx.line_to(to.0, to.1);
        self.ctx.stroke();
    }
}
