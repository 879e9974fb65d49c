use crate::color::Color;
use rand::Rng;
use std::f64::consts::TAU;

pub const COOL: &[Color] = &[Color::hex(0xffaa77), Color::hex(0xff9966), Color::hex(0xff7744)];
pub const MEDIUM: &[Color] = &[Color::hex(0xfff4ea), Color::hex(0xffd2a1), Color::hex(0xffcc6f)];
pub const HOT: &[Color] = &[
    Color::hex(0x9bb0ff),
    Color::hex(0xaabfff),
    Color::hex(0xcad7ff),
    Color::hex(0xf8f7ff),
];
pub const DISTANT: &[Color] = &[Color::hex(0xe8e8ff), Color::hex(0xf0f0ff), Color::hex(0xffffff)];

/// Stars closer than this get the brighter, larger attribute ranges.
pub const NEAR_DISTANCE: f64 = 0.3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TemperatureClass {
    Cool,
    Medium,
    Hot,
    Distant,
}

impl TemperatureClass {
    pub fn of(temperature: f64) -> Self {
        if temperature < 0.2 {
            TemperatureClass::Cool
        } else if temperature < 0.5 {
            TemperatureClass::Medium
        } else if temperature < 0.8 {
            TemperatureClass::Hot
        } else {
            TemperatureClass::Distant
        }
    }

    pub fn palette(self) -> &'static [Color] {
        match self {
            TemperatureClass::Cool => COOL,
            TemperatureClass::Medium => MEDIUM,
            TemperatureClass::Hot => HOT,
            TemperatureClass::Distant => DISTANT,
        }
    }
}

/// Uniform pick that never rejects, so constant mock generators cannot spin.
pub fn pick<R: Rng>(rng: &mut R, options: &[Color]) -> Color {
    let idx = (rng.gen::<f64>() * options.len() as f64) as usize;
    options[idx.min(options.len() - 1)]
}

#[derive(Clone, Debug, PartialEq)]
pub struct Star {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub color: Color,
    pub alpha: f64,
    pub target_alpha: f64,
    pub base_alpha: f64,
    pub temperature: f64,
    /// 0 is close to the viewer, 1 is far away. Also the painter's depth.
    pub distance: f64,
    pub twinkle_speed: f64,
    pub phase: f64,
    pub scintillation: f64,
    pub glow: f64,
}

impl Star {
    pub fn random<R: Rng>(rng: &mut R, width: f64, height: f64) -> Self {
        let distance: f64 = rng.gen();
        let temperature: f64 = rng.gen();
        let near = distance < NEAR_DISTANCE;

        let base_alpha = if near {
            rng.gen::<f64>() * 0.4 + 0.6
        } else {
            rng.gen::<f64>() * 0.5 + 0.2
        };
        let radius = if near {
            rng.gen::<f64>() * 2.5 + 1.0
        } else {
            rng.gen::<f64>() * 1.5 + 0.3
        };

        let x = rng.gen::<f64>() * width;
        let y = rng.gen::<f64>() * height;
        let color = pick(rng, TemperatureClass::of(temperature).palette());

        Self {
            x,
            y,
            radius,
            color,
            alpha: base_alpha,
            target_alpha: base_alpha,
            base_alpha,
            temperature,
            distance,
            twinkle_speed: rng.gen::<f64>() * 0.015 + 0.005,
            phase: rng.gen::<f64>() * TAU,
            glow: rng.gen::<f64>() * 0.6 + 0.4,
            scintillation: rng.gen::<f64>() * 0.3 + 0.1,
        }
    }

    /// A star that fades in from fully transparent.
    pub fn entering<R: Rng>(rng: &mut R, width: f64, height: f64) -> Self {
        let mut star = Self::random(rng, width, height);
        star.alpha = 0.0;
        star
    }

    #[cfg(test)]
    pub fn class(&self) -> TemperatureClass {
        TemperatureClass::of(self.temperature)
    }

    pub fn is_near(&self) -> bool {
        self.distance < NEAR_DISTANCE
    }

    pub fn is_finite(&self) -> bool {
        [
            self.x,
            self.y,
            self.radius,
            self.alpha,
            self.target_alpha,
            self.glow,
        ]
        .iter()
        .all(|v| v.is_finite())
    }

    /// Twinkle offset in [-1, 1] from two superposed waves.
    pub fn twinkle(&self, clock: f64) -> f64 {
        let wave1 = (clock * self.twinkle_speed + self.phase).sin();
        let wave2 = (clock * self.twinkle_speed * 1.7 + self.phase * 2.0).sin();
        (wave1 + wave2 * 0.5) / 1.5
    }

    pub fn parallax_factor(&self) -> f64 {
        1.0 - self.distance
    }
}
