use crate::canvas::CanvasSurface;
use crate::error::{check_dimensions, ConfigurationError};
use crate::field::{FieldConfig, Simulator};
use crate::page::{element, listen, window_and_document};
use crate::render::render;
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, EventTarget, HtmlCanvasElement, MouseEvent, Window};

type FrameCallback = Closure<dyn FnMut(f64)>;

struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

/// A running starfield: the simulator plus every browser hook driving it.
/// Dropping it cancels the queued frame and unhooks all listeners.
pub struct Animation {
    window: Window,
    sim: Rc<RefCell<Simulator>>,
    running: Rc<Cell<bool>>,
    frame_id: Rc<Cell<Option<i32>>>,
    frame: Rc<RefCell<Option<FrameCallback>>>,
    listeners: Vec<Listener>,
}

#[derive(Serialize)]
pub struct StatusView {
    width: f64,
    height: f64,
    stars: usize,
    pending: usize,
    nebulae: usize,
    shooting_stars: usize,
    pointer_active: bool,
}

fn viewport(window: &Window) -> Result<(f64, f64), ConfigurationError> {
    let width = window.inner_width().ok().and_then(|v| v.as_f64());
    let height = window.inner_height().ok().and_then(|v| v.as_f64());
    match (width, height) {
        (Some(width), Some(height)) => {
            check_dimensions(width, height)?;
            Ok((width, height))
        }
        _ => Err(ConfigurationError::InvalidDimensions {
            width: f64::NAN,
            height: f64::NAN,
        }),
    }
}

fn fit_canvas(canvas: &HtmlCanvasElement, width: f64, height: f64) {
    canvas.set_width(width as u32);
    canvas.set_height(height as u32);
}

fn request_frame(window: &Window, callback: &FrameCallback) -> Option<i32> {
    window
        .request_animation_frame(callback.as_ref().unchecked_ref())
        .ok()
}

impl Animation {
    pub fn start(canvas_id: &str, seed: u64, config: FieldConfig) -> Result<Self, ConfigurationError> {
        let (window, document) = window_and_document()?;
        let canvas: HtmlCanvasElement = element(&document, canvas_id, "canvas")?;
        let (width, height) = viewport(&window)?;
        fit_canvas(&canvas, width, height);
        let surface = CanvasSurface::from_canvas(&canvas)?;

        let target = config.star_count;
        let sim = Rc::new(RefCell::new(Simulator::seeded(width, height, config, seed)?));
        console_log!(
            "starfield {}x{} seed {} target {} stars",
            width,
            height,
            seed,
            target
        );

        let mut animation = Self {
            window: window.clone(),
            sim,
            running: Rc::new(Cell::new(true)),
            frame_id: Rc::new(Cell::new(None)),
            frame: Rc::new(RefCell::new(None)),
            listeners: Vec::new(),
        };
        animation.hook_resize(canvas)?;
        animation.hook_pointer(&document)?;
        animation.run(surface);
        Ok(animation)
    }

    fn hook(
        &mut self,
        target: EventTarget,
        event: &'static str,
        callback: Closure<dyn FnMut(Event)>,
    ) -> Result<(), ConfigurationError> {
        listen(&target, event, callback.as_ref())?;
        self.listeners.push(Listener {
            target,
            event,
            callback,
        });
        Ok(())
    }

    fn hook_resize(&mut self, canvas: HtmlCanvasElement) -> Result<(), ConfigurationError> {
        let sim = self.sim.clone();
        let window = self.window.clone();
        let on_resize = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
            let Ok((width, height)) = viewport(&window) else {
                return;
            };
            fit_canvas(&canvas, width, height);
            if sim.borrow_mut().on_resize(width, height).is_ok() {
                console_log!("starfield resized to {}x{}", width, height);
            }
        });
        self.hook(self.window.clone().into(), "resize", on_resize)
    }

    fn hook_pointer(&mut self, document: &web_sys::Document) -> Result<(), ConfigurationError> {
        let sim = self.sim.clone();
        let on_move = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
                sim.borrow_mut()
                    .on_pointer_move(mouse.client_x() as f64, mouse.client_y() as f64);
            }
        });
        self.hook(self.window.clone().into(), "mousemove", on_move)?;

        let sim = self.sim.clone();
        let on_leave = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
            sim.borrow_mut().on_pointer_leave();
        });
        self.hook(document.clone().into(), "mouseleave", on_leave)
    }

    fn run(&mut self, mut surface: CanvasSurface) {
        let sim = self.sim.clone();
        let running = self.running.clone();
        let frame_id = self.frame_id.clone();
        let frame = self.frame.clone();
        let window = self.window.clone();

        *self.frame.borrow_mut() = Some(Closure::new(move |now: f64| {
            if !running.get() {
                return;
            }
            {
                let mut sim = sim.borrow_mut();
                sim.tick(now);
                render(&*sim, &mut surface);
            }
            if let Some(callback) = frame.borrow().as_ref() {
                frame_id.set(request_frame(&window, callback));
            }
        }));

        if let Some(callback) = self.frame.borrow().as_ref() {
            self.frame_id.set(request_frame(&self.window, callback));
        }
    }

    pub fn status(&self) -> StatusView {
        let sim = self.sim.borrow();
        StatusView {
            width: sim.width(),
            height: sim.height(),
            stars: sim.stars().len(),
            pending: sim.pending(),
            nebulae: sim.nebulae().len(),
            shooting_stars: sim.shooting_stars().len(),
            pointer_active: sim.pointer().active,
        }
    }
}

impl Drop for Animation {
    fn drop(&mut self) {
        self.running.set(false);
        if let Some(id) = self.frame_id.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
        for listener in &self.listeners {
            let _ = listener.target.remove_event_listener_with_callback(
                listener.event,
                listener.callback.as_ref().unchecked_ref(),
            );
        }
        // Breaks the frame callback's reference to itself.
        self.frame.borrow_mut().take();
        console_log!("starfield stopped");
    }
}
