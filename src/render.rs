use crate::color::{Color, Rgba};
use crate::field::meteor::ShootingStar;
use crate::field::nebula::NebulaCloud;
use crate::field::star::Star;
use crate::field::Simulator;
use crate::surface::{LinearGradient, Paint, RadialGradient, Surface};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

const SPIKE_MIN_ALPHA: f64 = 0.6;
const SPIKE_MIN_RADIUS: f64 = 1.5;
const CORE_MIN_ALPHA: f64 = 0.7;
const HOT_HALO: Color = Color::hex(0xaabfff);
const COOL_HALO: Color = Color::hex(0xff9944);
const TRAIL_MID: Color = Color::hex(0xc8dcff);

/// Draws the current scene back to front. Never touches simulation state.
pub fn render<R, S: Surface>(sim: &Simulator<R>, surface: &mut S) {
    surface.set_global_alpha(1.0);
    surface.clear_rect(0.0, 0.0, sim.width(), sim.height());

    for cloud in sim.nebulae() {
        draw_nebula(cloud, surface);
    }

    for star in by_depth(sim.stars()) {
        draw_star(star, surface);
    }

    for meteor in sim.shooting_stars() {
        draw_meteor(meteor, surface);
    }

    surface.set_global_alpha(1.0);
}

/// Farthest first, so nearer stars land on top.
pub fn by_depth(stars: &[Star]) -> Vec<&Star> {
    let mut order: Vec<&Star> = stars.iter().collect();
    order.sort_by(|a, b| b.distance.total_cmp(&a.distance));
    order
}

fn draw_nebula<S: Surface>(cloud: &NebulaCloud, surface: &mut S) {
    let gradient = RadialGradient::centred(cloud.x, cloud.y, cloud.radius)
        .stop(0.0, cloud.color.with_alpha_byte((cloud.alpha * 255.0) as u8))
        .stop(0.5, cloud.color.with_alpha_byte(0x10))
        .stop(1.0, Rgba::TRANSPARENT);
    surface.fill_circle(cloud.x, cloud.y, cloud.radius, &Paint::Radial(gradient));
}

fn halo(star: &Star, glow_radius: f64) -> RadialGradient {
    let base = RadialGradient::centred(star.x, star.y, glow_radius)
        .stop(0.0, star.color.with_alpha(1.0));
    // Halo tint uses its own thresholds, wider than the palette buckets.
    if star.temperature > 0.7 {
        base.stop(0.3, star.color.with_alpha_byte(0x80))
            .stop(0.6, HOT_HALO.with_alpha_byte(0x40))
            .stop(1.0, Rgba::TRANSPARENT)
    } else if star.temperature < 0.3 {
        base.stop(0.3, star.color.with_alpha_byte(0x70))
            .stop(0.6, COOL_HALO.with_alpha_byte(0x30))
            .stop(1.0, Rgba::TRANSPARENT)
    } else {
        base.stop(0.4, star.color.with_alpha_byte(0x60))
            .stop(1.0, Rgba::TRANSPARENT)
    }
}

pub fn has_spikes(star: &Star) -> bool {
    star.alpha > SPIKE_MIN_ALPHA && star.radius > SPIKE_MIN_RADIUS
}

fn draw_star<S: Surface>(star: &Star, surface: &mut S) {
    let glow_radius = star.radius * (3.0 + star.glow);
    surface.set_global_alpha(star.alpha * star.glow * 0.8);
    surface.fill_circle(star.x, star.y, glow_radius, &Paint::Radial(halo(star, glow_radius)));

    let body = Paint::Solid(star.color.with_alpha(1.0));
    surface.set_global_alpha(star.alpha);
    surface.fill_circle(star.x, star.y, star.radius, &body);

    if has_spikes(star) {
        let length = star.radius * 4.0;
        surface.set_global_alpha(star.alpha * 0.6);
        for i in 0..4 {
            let angle = i as f64 * FRAC_PI_2 + FRAC_PI_4;
            let tip = (star.x + angle.cos() * length, star.y + angle.sin() * length);
            surface.stroke_line((star.x, star.y), tip, star.radius * 0.3, &body);
        }
    }

    if star.is_near() && star.alpha > CORE_MIN_ALPHA {
        surface.set_global_alpha(star.alpha);
        surface.fill_circle(
            star.x,
            star.y,
            star.radius * 0.3,
            &Paint::Solid(Color::WHITE.with_alpha(1.0)),
        );
    }
}

fn draw_meteor<S: Surface>(meteor: &ShootingStar, surface: &mut S) {
    if !meteor.is_alive() {
        return;
    }
    let alpha = meteor.alpha();
    let fade_end = (meteor.x - meteor.vx * 10.0, meteor.y - meteor.vy * 10.0);
    let trail = LinearGradient::new((meteor.x, meteor.y), fade_end)
        .stop(0.0, Color::WHITE.with_alpha(alpha))
        .stop(0.5, TRAIL_MID.with_alpha(alpha * 0.5))
        .stop(1.0, Rgba::TRANSPARENT);

    surface.set_global_alpha(1.0);
    surface.stroke_line((meteor.x, meteor.y), meteor.tail(), 2.0, &Paint::Linear(trail));

    surface.set_global_alpha(alpha * 0.3);
    surface.fill_circle(meteor.x, meteor.y, 3.0, &Paint::Solid(Color::WHITE.with_alpha(1.0)));
}
