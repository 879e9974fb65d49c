use rand::Rng;
use std::cell::RefCell;
use wasm_bindgen::prelude::*;

// `println!`-style logging to the browser console.
macro_rules! console_log {
    ($($t:tt)*) => (web_sys::console::log_1(&format!($($t)*).into()))
}

mod animation;
mod canvas;
pub mod color;
pub mod error;
pub mod field;
pub mod links;
mod page;
pub mod render;
pub mod surface;

use animation::Animation;
use field::{FieldConfig, Simulator};
use surface::Recorder;

thread_local! {
    static STARFIELD: RefCell<Option<Animation>> = RefCell::new(None);
}

fn with_starfield<R>(f: impl FnOnce(&Animation) -> R) -> Result<R, &'static str> {
    STARFIELD.with(|cell| {
        let opt = cell.borrow();
        match opt.as_ref() {
            Some(animation) => Ok(f(animation)),
            None => Err("starfield not running"),
        }
    })
}

#[wasm_bindgen(start)]
pub fn boot() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Starts (or restarts) the background on the canvas with id `canvas_id`.
#[wasm_bindgen]
pub fn start_starfield(
    canvas_id: &str,
    seed: Option<u64>,
    config_json: Option<String>,
) -> Result<(), JsValue> {
    let config = match config_json {
        Some(json) => FieldConfig::from_json(&json).map_err(|err| {
            console_log!("starfield config rejected: {}", err);
            err
        })?,
        None => FieldConfig::default(),
    };
    let seed = seed.unwrap_or_else(|| rand::thread_rng().gen());

    stop_starfield();
    let animation = Animation::start(canvas_id, seed, config)?;
    STARFIELD.with(|slot| *slot.borrow_mut() = Some(animation));
    Ok(())
}

#[wasm_bindgen]
pub fn stop_starfield() {
    // Take first so the drop runs without the slot borrowed.
    let previous = STARFIELD.with(|slot| slot.borrow_mut().take());
    drop(previous);
}

#[wasm_bindgen]
pub fn starfield_status() -> String {
    match with_starfield(|animation| serde_json::to_string(&animation.status())) {
        Ok(Ok(json)) => json,
        Ok(Err(_)) => "{}".to_string(),
        Err(e) => e.to_string(),
    }
}

#[wasm_bindgen]
pub fn install_page(button_id: &str, search_id: &str, item_selector: &str) -> Result<(), JsValue> {
    page::install(button_id, search_id, item_selector)?;
    Ok(())
}

/// Runs a headless scene for `ticks` frames and returns the last frame's draw calls.
#[wasm_bindgen]
pub fn preview_frame(width: f64, height: f64, seed: u64, ticks: u32, frame_ms: f64) -> String {
    preview_json(width, height, seed, ticks, frame_ms)
}

#[wasm_bindgen]
pub fn filter_links_json(links_json: &str, query: &str) -> String {
    links::filter_links_json(links_json, query)
}

pub fn preview_json(width: f64, height: f64, seed: u64, ticks: u32, frame_ms: f64) -> String {
    let mut sim = match Simulator::seeded(width, height, FieldConfig::default(), seed) {
        Ok(sim) => sim,
        Err(_) => return "[]".to_string(),
    };
    for frame in 0..ticks {
        sim.tick(frame as f64 * frame_ms);
    }
    let mut recorder = Recorder::new();
    render::render(&sim, &mut recorder);
    recorder.to_json()
}
