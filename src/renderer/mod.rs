//! Canvas 2D vector draw pass
//!
//! Classic vector-monitor look: white strokes on black, one
//! save/translate/rotate/restore block per entity. Asteroid silhouettes only
//! translate (they do not spin); the ship rotates with its heading; an
//! invulnerable ship blinks.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::sim::{GameState, Ship, ShipPhase};

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl CanvasRenderer {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self {
            ctx,
            width: canvas.width() as f64,
            height: canvas.height() as f64,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width as f64;
        self.height = height as f64;
    }

    pub fn render(&self, state: &GameState, time_ms: f64, thrust_active: bool) {
        let ctx = &self.ctx;

        ctx.set_fill_style_str("#000");
        ctx.fill_rect(0.0, 0.0, self.width, self.height);

        ctx.set_stroke_style_str("#fff");
        ctx.set_line_width(1.5);

        for asteroid in &state.asteroids {
            ctx.begin_path();
            let mut points = asteroid.silhouette.iter();
            if let Some(first) = points.next() {
                ctx.move_to(
                    (asteroid.pos.x + first.x) as f64,
                    (asteroid.pos.y + first.y) as f64,
                );
                for p in points {
                    ctx.line_to((asteroid.pos.x + p.x) as f64, (asteroid.pos.y + p.y) as f64);
                }
            }
            ctx.close_path();
            ctx.stroke();
        }

        ctx.set_fill_style_str("#fff");
        for bullet in &state.bullets {
            ctx.begin_path();
            let _ = ctx.arc(
                bullet.pos.x as f64,
                bullet.pos.y as f64,
                2.0,
                0.0,
                std::f64::consts::TAU,
            );
            ctx.fill();
        }

        self.draw_ship(&state.ship, time_ms, thrust_active);

        if state.phase == crate::sim::GamePhase::Paused {
            ctx.set_fill_style_str("#fff");
            ctx.set_font("28px monospace");
            ctx.set_text_align("center");
            let _ = ctx.fill_text("PAUSED", self.width / 2.0, self.height / 2.0);
        }
    }

    fn draw_ship(&self, ship: &Ship, time_ms: f64, thrust_active: bool) {
        let ctx = &self.ctx;
        match &ship.phase {
            ShipPhase::Flying { .. } => {
                // Blink while the invulnerability window is open
                if ship.invulnerable_remaining() > 0.0 && ((time_ms / 125.0) as u64) % 2 == 0 {
                    return;
                }

                ctx.save();
                let _ = ctx.translate(ship.pos.x as f64, ship.pos.y as f64);
                let _ = ctx.rotate(ship.angle as f64);

                let outline = Ship::silhouette();
                ctx.begin_path();
                ctx.move_to(outline[0].x as f64, outline[0].y as f64);
                for p in &outline[1..] {
                    ctx.line_to(p.x as f64, p.y as f64);
                }
                ctx.close_path();
                ctx.stroke();

                if thrust_active {
                    // Exhaust flicker off the stern
                    let flicker = 1.0 + 0.3 * ((time_ms / 40.0).sin());
                    let r = crate::consts::SHIP_RADIUS as f64;
                    ctx.begin_path();
                    ctx.move_to(-0.7 * r, -0.35 * r);
                    ctx.line_to(-1.4 * r * flicker, 0.0);
                    ctx.line_to(-0.7 * r, 0.35 * r);
                    ctx.stroke();
                }

                ctx.restore();
            }
            ShipPhase::Disintegrating { .. } => {
                for f in &ship.fragments {
                    ctx.save();
                    let _ = ctx.translate(f.pos.x as f64, f.pos.y as f64);
                    let _ = ctx.rotate(f.angle as f64);
                    ctx.begin_path();
                    ctx.move_to(f.points[0].x as f64, f.points[0].y as f64);
                    ctx.line_to(f.points[1].x as f64, f.points[1].y as f64);
                    ctx.stroke();
                    ctx.restore();
                }
            }
            ShipPhase::Hidden { .. } => {}
        }
    }
}
