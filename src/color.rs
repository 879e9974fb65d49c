use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::hex(0xffffff);

    /// Builds a colour from a `0xRRGGBB` literal.
    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as u8,
            g: ((rgb >> 8) & 0xff) as u8,
            b: (rgb & 0xff) as u8,
        }
    }

    pub fn with_alpha(self, alpha: f64) -> Rgba {
        Rgba {
            color: self,
            alpha: alpha.clamp(0.0, 1.0),
        }
    }

    /// Alpha expressed as a two-digit hex byte, the way CSS `#rrggbbaa` does.
    pub fn with_alpha_byte(self, byte: u8) -> Rgba {
        self.with_alpha(byte as f64 / 255.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Rgba {
    pub color: Color,
    pub alpha: f64,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba {
        color: Color { r: 0, g: 0, b: 0 },
        alpha: 0.0,
    };

    pub fn css(&self) -> String {
        format!(
            "rgba({}, {}, {}, {:.3})",
            self.color.r, self.color.g, self.color.b, self.alpha
        )
    }
}
