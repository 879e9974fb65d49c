use crate::color::Rgba;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ColorStop {
    pub offset: f64,
    pub color: Rgba,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LinearGradient {
    pub from: (f64, f64),
    pub to: (f64, f64),
    pub stops: Vec<ColorStop>,
}

/// Gradient between two concentric-or-not circles, as in the canvas API.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RadialGradient {
    pub inner: (f64, f64, f64),
    pub outer: (f64, f64, f64),
    pub stops: Vec<ColorStop>,
}

impl RadialGradient {
    /// Gradient from the centre point out to `radius`.
    pub fn centred(x: f64, y: f64, radius: f64) -> Self {
        Self {
            inner: (x, y, 0.0),
            outer: (x, y, radius),
            stops: Vec::new(),
        }
    }

    pub fn stop(mut self, offset: f64, color: Rgba) -> Self {
        self.stops.push(ColorStop { offset, color });
        self
    }
}

impl LinearGradient {
    pub fn new(from: (f64, f64), to: (f64, f64)) -> Self {
        Self {
            from,
            to,
            stops: Vec::new(),
        }
    }

    pub fn stop(mut self, offset: f64, color: Rgba) -> Self {
        self.stops.push(ColorStop { offset, color });
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Paint {
    Solid(Rgba),
    Linear(LinearGradient),
    Radial(RadialGradient),
}

/// Immediate-mode 2-D target the starfield draws on.
pub trait Surface {
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    /// Multiplier applied to every subsequent draw call.
    fn set_global_alpha(&mut self, alpha: f64);
    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, paint: &Paint);
    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), width: f64, paint: &Paint);
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCall {
    ClearRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    GlobalAlpha {
        alpha: f64,
    },
    FillCircle {
        x: f64,
        y: f64,
        radius: f64,
        paint: Paint,
    },
    StrokeLine {
        from: (f64, f64),
        to: (f64, f64),
        width: f64,
        paint: Paint,
    },
}

/// Surface that remembers what it was asked to draw.
#[derive(Debug, Default)]
pub struct Recorder {
    pub calls: Vec<DrawCall>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.calls).unwrap_or_else(|_| "[]".to_string())
    }
}

impl Surface for Recorder {
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.calls.push(DrawCall::ClearRect {
            x,
            y,
            width,
            height,
        });
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.calls.push(DrawCall::GlobalAlpha { alpha });
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, paint: &Paint) {
        self.calls.push(DrawCall::FillCircle {
            x,
            y,
            radius,
            paint: paint.clone(),
        });
    }

    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), width: f64, paint: &Paint) {
        self.calls.push(DrawCall::StrokeLine {
            from,
            to,
            width,
            paint: paint.clone(),
        });
    }
}
