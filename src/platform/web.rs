//! Browser host
//!
//! Canvas2D surface, DOM control binding and the requestAnimationFrame loop.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlInputElement, HtmlSelectElement,
};

use super::css_color;
use crate::renderer::{LayerKind, Rgba, Stroke, Surface};
use crate::session::Session;
use crate::settings::Settings;
use crate::sim::{RotationDirection, SimParams, SimulationModel};

/// `Surface` backed by a browser 2D context
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    width: f32,
    height: f32,
}

impl CanvasSurface {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        ctx.set_line_cap("round");
        ctx.set_line_join("round");
        Ok(Self {
            ctx,
            width: canvas.width() as f32,
            height: canvas.height() as f32,
        })
    }

    fn trace(&self, points: &[Vec2]) {
        self.ctx.begin_path();
        self.ctx.move_to(points[0].x as f64, points[0].y as f64);
        for p in &points[1..] {
            self.ctx.line_to(p.x as f64, p.y as f64);
        }
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self, color: Rgba) {
        self.ctx.set_fill_style_str(&css_color(color));
        self.ctx
            .fill_rect(0.0, 0.0, self.width as f64, self.height as f64);
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Rgba) {
        if points.len() < 3 {
            return;
        }
        self.trace(points);
        self.ctx.close_path();
        self.ctx.set_fill_style_str(&css_color(color));
        self.ctx.fill();
    }

    fn stroke_polyline(&mut self, points: &[Vec2], stroke: &Stroke) {
        if points.len() < 2 {
            return;
        }
        self.trace(points);
        self.ctx.set_stroke_style_str(&css_color(stroke.color));
        self.ctx.set_line_width(stroke.width as f64);
        self.ctx.stroke();
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        if radius <= 0.0 {
            return;
        }
        self.ctx.begin_path();
        if self
            .ctx
            .arc(
                center.x as f64,
                center.y as f64,
                radius as f64,
                0.0,
                std::f64::consts::TAU,
            )
            .is_ok()
        {
            self.ctx.set_fill_style_str(&css_color(color));
            self.ctx.fill();
        }
    }

    fn fill_rect(&mut self, min: Vec2, size: Vec2, color: Rgba) {
        self.ctx.set_fill_style_str(&css_color(color));
        self.ctx
            .fill_rect(min.x as f64, min.y as f64, size.x as f64, size.y as f64);
    }

    fn draw_text(&mut self, text: &str, pos: Vec2, px: f32, color: Rgba) {
        self.ctx.set_font(&format!("{}px sans-serif", px));
        self.ctx.set_fill_style_str(&css_color(color));
        let _ = self.ctx.fill_text(text, pos.x as f64, pos.y as f64);
    }
}

/// Everything the frame callback and DOM handlers share
struct WebApp {
    session: Session,
    surface: CanvasSurface,
    /// Pending requestAnimationFrame id, if any
    raf_handle: Option<i32>,
}

/// Numeric parameter inputs and the model field each one drives
const NUMBER_CONTROLS: [(&str, fn(&mut SimulationModel, f32), fn(&SimulationModel) -> f32); 4] = [
    ("mass", |m, v| m.mass = v, |m| m.mass),
    (
        "angular-velocity",
        |m, v| m.angular_velocity = v,
        |m| m.angular_velocity,
    ),
    ("max-tension", |m, v| m.max_tension = v, |m| m.max_tension),
    ("radius", |m, v| m.radius = v, |m| m.radius),
];

/// Build the session, bind controls and start the frame loop
pub fn run() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialised".into());
    }

    log::info!("Orbit Break starting...");

    if let Err(e) = start() {
        log::error!("Failed to start: {:?}", e);
    }
}

fn start() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let canvas: HtmlCanvasElement = document
        .get_element_by_id("canvas")
        .ok_or_else(|| JsValue::from_str("no canvas"))?
        .dyn_into()?;
    canvas.set_width(crate::consts::SURFACE_WIDTH as u32);
    canvas.set_height(crate::consts::SURFACE_HEIGHT as u32);

    let surface = CanvasSurface::new(&canvas)?;
    let session = Session::new(SimParams::default(), Settings::load());
    let app = Rc::new(RefCell::new(WebApp {
        session,
        surface,
        raf_handle: None,
    }));

    setup_number_controls(&document, app.clone());
    setup_direction_control(&document, app.clone());
    setup_buttons(&document, app.clone());
    setup_layer_toggles(&document, app.clone());
    setup_lifecycle(&document, app.clone());
    sync_controls(&document, app.borrow().session.model());

    app.borrow_mut().session.start();
    request_animation_frame(app);

    log::info!("Orbit Break running!");
    Ok(())
}

fn request_animation_frame(app: Rc<RefCell<WebApp>>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let frame_app = app.clone();
    // Released by the JS side once it has run
    let callback = Closure::once_into_js(move |_time: f64| {
        frame_loop(frame_app);
    });
    match window.request_animation_frame(callback.unchecked_ref()) {
        Ok(handle) => app.borrow_mut().raf_handle = Some(handle),
        Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
    }
}

fn frame_loop(app: Rc<RefCell<WebApp>>) {
    let running = {
        let mut guard = app.borrow_mut();
        let WebApp {
            session,
            surface,
            raf_handle,
        } = &mut *guard;
        *raf_handle = None;
        session.frame(surface)
    };

    if running {
        request_animation_frame(app);
    }
}

/// Stop the loop and cancel the pending callback
fn stop(app: &Rc<RefCell<WebApp>>) {
    let mut guard = app.borrow_mut();
    guard.session.stop();
    if let Some(handle) = guard.raf_handle.take() {
        if let Some(window) = web_sys::window() {
            let _ = window.cancel_animation_frame(handle);
        }
    }
}

/// Push model values into the inputs (after construction or restoring defaults)
fn sync_controls(document: &Document, model: &SimulationModel) {
    for (id, _, read) in NUMBER_CONTROLS {
        if let Some(input) = input_by_id::<HtmlInputElement>(document, id) {
            input.set_value(&read(model).to_string());
        }
    }
    if let Some(select) = input_by_id::<HtmlSelectElement>(document, "direction") {
        select.set_value(model.rotation_direction.as_str());
    }
    set_pause_label(document, false);
}

fn input_by_id<T: JsCast>(document: &Document, id: &str) -> Option<T> {
    document.get_element_by_id(id)?.dyn_into::<T>().ok()
}

fn set_pause_label(document: &Document, paused: bool) {
    if let Some(btn) = document.get_element_by_id("pause-btn") {
        btn.set_text_content(Some(if paused { "Resume" } else { "Pause" }));
    }
}

fn setup_number_controls(document: &Document, app: Rc<RefCell<WebApp>>) {
    for (id, apply, _) in NUMBER_CONTROLS {
        let Some(input) = input_by_id::<HtmlInputElement>(document, id) else {
            log::warn!("Control #{} missing", id);
            continue;
        };
        let app = app.clone();
        let target = input.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let value = target.value_as_number() as f32;
            if value.is_finite() {
                apply(app.borrow_mut().session.model_mut(), value);
            }
        });
        let _ = input.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

fn setup_direction_control(document: &Document, app: Rc<RefCell<WebApp>>) {
    let Some(select) = input_by_id::<HtmlSelectElement>(document, "direction") else {
        log::warn!("Control #direction missing");
        return;
    };
    let target = select.clone();
    let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
        if let Some(direction) = RotationDirection::from_str(&target.value()) {
            app.borrow_mut().session.model_mut().rotation_direction = direction;
        }
    });
    let _ = select.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn setup_buttons(document: &Document, app: Rc<RefCell<WebApp>>) {
    let on_click = |id: &str, handler: Box<dyn FnMut()>| {
        let Some(btn) = document.get_element_by_id(id) else {
            log::warn!("Button #{} missing", id);
            return;
        };
        let mut handler = handler;
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| handler());
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    };

    {
        let app = app.clone();
        let document = document.clone();
        on_click(
            "reset-btn",
            Box::new(move || {
                app.borrow_mut().session.reset();
                set_pause_label(&document, false);
            }),
        );
    }
    {
        let app = app.clone();
        on_click(
            "clear-btn",
            Box::new(move || app.borrow_mut().session.clear_trajectory()),
        );
    }
    {
        let app = app.clone();
        let document = document.clone();
        on_click(
            "pause-btn",
            Box::new(move || {
                let paused = app.borrow_mut().session.toggle_pause();
                set_pause_label(&document, paused);
            }),
        );
    }
    {
        let document = document.clone();
        on_click(
            "defaults-btn",
            Box::new(move || {
                let mut guard = app.borrow_mut();
                guard.session.restore_defaults();
                sync_controls(&document, guard.session.model());
            }),
        );
    }
}

/// Checkbox id for a layer toggle
fn layer_toggle_id(kind: LayerKind) -> String {
    format!("layer-{}", kind.as_str())
}

/// Bind one checkbox per layer; every change is written back to LocalStorage
fn setup_layer_toggles(document: &Document, app: Rc<RefCell<WebApp>>) {
    for kind in LayerKind::DRAW_ORDER {
        let id = layer_toggle_id(kind);
        let Some(input) = input_by_id::<HtmlInputElement>(document, &id) else {
            log::warn!("Control #{} missing", id);
            continue;
        };
        input.set_checked(kind.enabled_in(&app.borrow().session.settings().layers));

        let app = app.clone();
        let target = input.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut guard = app.borrow_mut();
            guard.session.set_layer_visible(kind, target.checked());
            guard.session.settings().save();
        });
        let _ = input.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

fn setup_lifecycle(document: &Document, app: Rc<RefCell<WebApp>>) {
    // Auto-pause when the tab is hidden
    {
        let app = app.clone();
        let doc = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if doc.visibility_state() == web_sys::VisibilityState::Hidden {
                app.borrow_mut().session.set_paused(true);
                set_pause_label(&doc, true);
                log::info!("Auto-paused (tab hidden)");
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    let Some(window) = web_sys::window() else {
        return;
    };

    // Tear down the loop with the page
    {
        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            stop(&app);
        });
        let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    // Restart when restored from the back/forward cache
    let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::PageTransitionEvent| {
        if !event.persisted() {
            return;
        }
        let started = app.borrow_mut().session.start();
        if started {
            log::info!("Restored from page cache");
            request_animation_frame(app.clone());
        }
    });
    let _ = window.add_event_listener_with_callback("pageshow", closure.as_ref().unchecked_ref());
    closure.forget();
}
