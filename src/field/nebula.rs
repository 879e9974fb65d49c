use crate::color::Color;
use crate::field::star::pick;
use rand::Rng;

pub const NEBULA: &[Color] = &[
    Color::hex(0xb794f6),
    Color::hex(0x6eb5ff),
    Color::hex(0x4dd4e8),
    Color::hex(0x9d7ff5),
    Color::hex(0x5ce1e6),
];

/// Soft background blob. Drifts forever and wraps using its own radius as margin.
#[derive(Clone, Debug, PartialEq)]
pub struct NebulaCloud {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub color: Color,
    pub alpha: f64,
    pub drift: (f64, f64),
}

impl NebulaCloud {
    pub fn random<R: Rng>(rng: &mut R, width: f64, height: f64) -> Self {
        let x = rng.gen::<f64>() * width;
        let y = rng.gen::<f64>() * height;
        let radius = rng.gen::<f64>() * 150.0 + 100.0;
        let color = pick(rng, NEBULA);
        let alpha = rng.gen::<f64>() * 0.08 + 0.02;
        let drift = (
            (rng.gen::<f64>() - 0.5) * 0.1,
            (rng.gen::<f64>() - 0.5) * 0.1,
        );

        Self {
            x,
            y,
            radius,
            color,
            alpha,
            drift,
        }
    }

    pub fn advance(&mut self, width: f64, height: f64) {
        self.x += self.drift.0;
        self.y += self.drift.1;
        self.x = wrap(self.x, width, self.radius);
        self.y = wrap(self.y, height, self.radius);
    }
}

/// Sends a coordinate that left `[-margin, extent + margin]` to the opposite edge.
pub fn wrap(value: f64, extent: f64, margin: f64) -> f64 {
    if value < -margin {
        extent + margin
    } else if value > extent + margin {
        -margin
    } else {
        value
    }
}
