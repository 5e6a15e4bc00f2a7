use core::f64::consts::TAU;

use boidfield_core::{Color, DrawCommand, RenderTarget, Settings, Simulation};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Element, HtmlCanvasElement, MouseEvent, TouchEvent};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

macro_rules! console_log {
    ($($t:tt)*) => (log(&format_args!($($t)*).to_string()))
}

fn css(color: Color, alpha: f64) -> String {
    format!("rgba({}, {}, {}, {})", color.r, color.g, color.b, alpha)
}

/// Paints draw commands onto a 2d context. The first canvas error is kept
/// and later commands in the same frame are skipped.
struct CanvasTarget<'a> {
    context: &'a CanvasRenderingContext2d,
    width: f64,
    height: f64,
    error: Option<JsValue>,
}

impl CanvasTarget<'_> {
    fn paint(&self, command: DrawCommand) -> Result<(), JsValue> {
        let ctx = self.context;
        match command {
            DrawCommand::Fade { color, alpha } => {
                ctx.set_global_alpha(1.0);
                ctx.set_shadow_blur(0.0);
                ctx.set_fill_style_str(&css(color, alpha));
                ctx.fill_rect(0.0, 0.0, self.width, self.height);
            }
            DrawCommand::Circle {
                center,
                radius,
                color,
                glow,
                alpha,
            } => {
                let fill = css(color, 1.0);
                ctx.set_global_alpha(alpha);
                ctx.set_shadow_blur(glow);
                ctx.set_shadow_color(&fill);
                ctx.set_fill_style_str(&fill);
                ctx.begin_path();
                ctx.arc(center.x, center.y, radius, 0.0, TAU)?;
                ctx.fill();
            }
            DrawCommand::Line {
                from,
                to,
                color,
                width,
                glow,
                alpha,
            } => {
                let stroke = css(color, 1.0);
                ctx.set_global_alpha(alpha);
                ctx.set_shadow_blur(glow);
                ctx.set_shadow_color(&stroke);
                ctx.set_stroke_style_str(&stroke);
                ctx.set_line_width(width);
                ctx.begin_path();
                ctx.move_to(from.x, from.y);
                ctx.line_to(to.x, to.y);
                ctx.stroke();
            }
        }
        Ok(())
    }
}

impl RenderTarget for CanvasTarget<'_> {
    fn draw(&mut self, command: DrawCommand) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.paint(command) {
            self.error = Some(err);
        }
    }
}

/// Animated flock drawn behind the page.
#[wasm_bindgen]
pub struct Backdrop {
    simulation: Simulation,
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

#[wasm_bindgen]
impl Backdrop {
    /// `settings_json` overrides any subset of the tuning constants.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas_id: &str,
        width: f64,
        height: f64,
        settings_json: Option<String>,
    ) -> Result<Backdrop, JsValue> {
        let window = web_sys::window().ok_or("no global window")?;
        let document = window.document().ok_or("no document")?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or("canvas not found")?
            .dyn_into::<HtmlCanvasElement>()?;

        Self::from_canvas(canvas, width, height, settings_json)
    }

    pub fn from_canvas(
        canvas: HtmlCanvasElement,
        width: f64,
        height: f64,
        settings_json: Option<String>,
    ) -> Result<Backdrop, JsValue> {
        let settings = match settings_json {
            Some(json) => Settings::from_json_str(&json)
                .map_err(|e| JsValue::from_str(&format!("invalid settings: {}", e)))?,
            None => Settings::default(),
        };

        canvas.set_width(width as u32);
        canvas.set_height(height as u32);

        let context = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into::<CanvasRenderingContext2d>()?;

        console_log!(
            "Initializing backdrop with {} boids on {}x{}",
            settings.num_boids,
            width,
            height
        );

        let seed = (js_sys::Math::random() * u32::MAX as f64) as u32;

        Ok(Backdrop {
            simulation: Simulation::with_seed(width, height, settings, seed),
            canvas,
            context,
        })
    }

    /// Advance and draw one frame; `now` is `performance.now()`.
    pub fn tick(&mut self, now: f64) -> Result<(), JsValue> {
        let mut target = CanvasTarget {
            context: &self.context,
            width: self.simulation.width(),
            height: self.simulation.height(),
            error: None,
        };
        let summary = self.simulation.tick(now, &mut target);

        self.context.set_global_alpha(1.0);
        self.context.set_shadow_blur(0.0);

        if summary.collisions > 0 {
            console_log!(
                "{} adversary destroyed, {} boids left",
                summary.collisions,
                summary.boid_count
            );
        }

        match target.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.canvas.set_width(width as u32);
        self.canvas.set_height(height as u32);
        self.simulation.resize(width, height);
        console_log!("Resized to {}x{}", width, height);
    }

    fn canvas_point(&self, client_x: i32, client_y: i32) -> (f64, f64) {
        let canvas_element: &Element = self.canvas.as_ref();
        let rect = canvas_element.get_bounding_client_rect();
        (client_x as f64 - rect.left(), client_y as f64 - rect.top())
    }

    pub fn handle_mouse_move(&mut self, event: MouseEvent) {
        let (x, y) = self.canvas_point(event.client_x(), event.client_y());
        self.simulation.pointer_moved(x, y);
    }

    pub fn handle_mouse_down(&mut self, event: MouseEvent, now: f64) {
        if event.button() != 0 {
            return;
        }
        let (x, y) = self.canvas_point(event.client_x(), event.client_y());
        self.simulation.pointer_pressed(x, y, now);
    }

    pub fn handle_mouse_up(&mut self) {
        self.simulation.pointer_released();
    }

    /// Right click spawns an adversary. Returns whether one was spawned.
    pub fn handle_context_menu(&mut self, event: MouseEvent) -> bool {
        event.prevent_default();
        let (x, y) = self.canvas_point(event.client_x(), event.client_y());
        match self.simulation.secondary_click(x, y) {
            Ok(_) => {
                console_log!("Adversary spawned at ({}, {})", x, y);
                true
            }
            Err(err) => {
                console_log!("Spawn ignored: {}", err);
                false
            }
        }
    }

    pub fn handle_touch_start(&mut self, event: TouchEvent, now: f64) {
        if let Some(touch) = event.touches().item(0) {
            let (x, y) = self.canvas_point(touch.client_x(), touch.client_y());
            self.simulation.pointer_pressed(x, y, now);
        }
    }

    pub fn handle_touch_move(&mut self, event: TouchEvent) {
        if let Some(touch) = event.touches().item(0) {
            let (x, y) = self.canvas_point(touch.client_x(), touch.client_y());
            self.simulation.pointer_moved(x, y);
        }
    }

    pub fn handle_touch_end(&mut self) {
        self.simulation.pointer_released();
    }

    /// Smoothed point for the cursor decoration layer.
    pub fn tracking_x(&self) -> f64 {
        self.simulation.tracking_point().x
    }

    pub fn tracking_y(&self) -> f64 {
        self.simulation.tracking_point().y
    }

    pub fn adversary_alive(&self) -> bool {
        self.simulation.adversary_alive()
    }

    pub fn boid_count(&self) -> usize {
        self.simulation.boid_count()
    }

    pub fn adversary_count(&self) -> usize {
        self.simulation.adversary_count()
    }

    pub fn status_json(&self, now: f64) -> Result<String, JsValue> {
        self.simulation
            .status(now)
            .to_json()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn set_separation_weight(&mut self, weight: f64) {
        self.simulation.settings.separation_weight = weight;
    }

    pub fn set_alignment_weight(&mut self, weight: f64) {
        self.simulation.settings.alignment_weight = weight;
    }

    pub fn set_cohesion_weight(&mut self, weight: f64) {
        self.simulation.settings.cohesion_weight = weight;
    }

    pub fn set_attraction_weight(&mut self, weight: f64) {
        self.simulation.settings.attraction_weight = weight;
    }

    pub fn set_max_speed(&mut self, speed: f64) {
        self.simulation.settings.max_speed = speed;
    }

    pub fn set_max_force(&mut self, force: f64) {
        self.simulation.settings.max_force = force;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boidfield_core::render::palette;

    #[test]
    fn test_css_color() {
        assert_eq!(css(palette::BOID, 1.0), "rgba(0, 255, 0, 1)");
        assert_eq!(css(palette::BACKGROUND, 0.03), "rgba(0, 0, 0, 0.03)");
    }
}
