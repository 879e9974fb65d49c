use rand::Rng;
use std::f64::consts::PI;

/// Transient streak. Lives while `life > 0`; drawn opacity follows `life`.
#[derive(Clone, Debug, PartialEq)]
pub struct ShootingStar {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub length: f64,
    pub life: f64,
    pub decay: f64,
}

impl ShootingStar {
    pub fn new(x: f64, y: f64, vx: f64, vy: f64, length: f64, decay: f64) -> Self {
        Self {
            x,
            y,
            vx,
            vy,
            length,
            life: 1.0,
            decay: decay.max(0.0),
        }
    }

    /// Spawns somewhere in the upper half, heading down and to the right.
    pub fn random<R: Rng>(rng: &mut R, width: f64, height: f64) -> Self {
        let x = rng.gen::<f64>() * width;
        let y = rng.gen::<f64>() * height * 0.5;
        let angle = rng.gen::<f64>() * PI / 4.0 + PI / 6.0;
        let speed = rng.gen::<f64>() * 3.0 + 4.0;
        let length = rng.gen::<f64>() * 80.0 + 40.0;
        let decay = rng.gen::<f64>() * 0.015 + 0.01;

        Self::new(x, y, angle.cos() * speed, angle.sin() * speed, length, decay)
    }

    pub fn alpha(&self) -> f64 {
        self.life.clamp(0.0, 1.0)
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    pub fn advance(&mut self) {
        self.x += self.vx;
        self.y += self.vy;
        self.life -= self.decay;
    }

    /// End of the visible trail, behind the head.
    pub fn tail(&self) -> (f64, f64) {
        (
            self.x - self.vx * self.length / 5.0,
            self.y - self.vy * self.length / 5.0,
        )
    }
}
