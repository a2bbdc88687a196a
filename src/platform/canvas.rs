//! 2D canvas renderer
//!
//! Draws a `Snapshot`; never touches game state.

use web_sys::CanvasRenderingContext2d;

use super::color::{css, lerp_color};
use crate::sim::effects::{apple_pulse, blink};
use crate::sim::{Cell, GamePhase, Snapshot};

/// Background per difficulty tier
const BACKGROUNDS: [&str; 3] = ["#1a1a2e", "#16213e", "#0f3460"];

const SNAKE_HEAD: u32 = 0xff8c00;
const SNAKE_BODY_START: u32 = 0x006400;
const SNAKE_BODY_END: u32 = 0x00b400;
const APPLE: u32 = 0xe74c3c;
const OBSTACLE: u32 = 0x555555;
const OBSTACLE_BORDER: u32 = 0x333333;

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    size: f64,
}

impl CanvasRenderer {
    pub fn new(ctx: CanvasRenderingContext2d, size: f64) -> Self {
        Self { ctx, size }
    }

    pub fn render(&self, snap: &Snapshot<'_>) {
        let ctx = &self.ctx;
        ctx.save();
        let shake = snap.shake_offset;
        if shake.x != 0.0 || shake.y != 0.0 {
            let _ = ctx.translate(shake.x as f64, shake.y as f64);
        }

        self.draw_background(snap);

        if snap.phase == GamePhase::Menu {
            self.draw_menu(snap);
            ctx.restore();
            return;
        }

        self.draw_obstacles(snap);
        self.draw_apple(snap);
        self.draw_power_up(snap);
        self.draw_snake(snap);
        self.draw_particles(snap);
        self.draw_hud(snap);

        match snap.phase {
            GamePhase::Paused => self.draw_overlay("PAUSED", &["Press Space to resume"], snap),
            GamePhase::GameOver => {
                let score = format!("Score: {}", snap.score);
                let best = format!("Best: {}", snap.high_score);
                self.draw_overlay(
                    "GAME OVER",
                    &[&score, &best, "Press Enter to restart"],
                    snap,
                );
            }
            _ => {}
        }

        ctx.restore();
    }

    fn cell_rect(&self, snap: &Snapshot<'_>, cell: Cell) -> (f64, f64, f64) {
        let ts = snap.tile_size as f64;
        let gap = (ts - snap.cell_size as f64) / 2.0;
        (
            cell.x as f64 * ts + gap,
            cell.y as f64 * ts + gap,
            snap.cell_size as f64,
        )
    }

    fn cell_center(&self, snap: &Snapshot<'_>, cell: Cell) -> (f64, f64) {
        let ts = snap.tile_size as f64;
        (cell.x as f64 * ts + ts / 2.0, cell.y as f64 * ts + ts / 2.0)
    }

    fn draw_background(&self, snap: &Snapshot<'_>) {
        let ctx = &self.ctx;
        let tier = (snap.background_tier as usize).min(BACKGROUNDS.len() - 1);
        ctx.set_fill_style_str(BACKGROUNDS[tier]);
        ctx.fill_rect(0.0, 0.0, self.size, self.size);

        // Faint grid
        ctx.set_stroke_style_str("rgba(255, 255, 255, 0.03)");
        ctx.set_line_width(0.5);
        let ts = snap.tile_size as f64;
        for i in 1..snap.tile_count {
            let pos = i as f64 * ts;
            ctx.begin_path();
            ctx.move_to(pos, 0.0);
            ctx.line_to(pos, self.size);
            ctx.move_to(0.0, pos);
            ctx.line_to(self.size, pos);
            ctx.stroke();
        }
    }

    fn draw_obstacles(&self, snap: &Snapshot<'_>) {
        let ctx = &self.ctx;
        for &cell in snap.obstacles {
            let (x, y, s) = self.cell_rect(snap, cell);
            ctx.set_fill_style_str(&css(OBSTACLE_BORDER));
            ctx.fill_rect(x, y, s, s);
            ctx.set_fill_style_str(&css(OBSTACLE));
            ctx.fill_rect(x + 2.0, y + 2.0, s - 4.0, s - 4.0);
        }
    }

    fn draw_apple(&self, snap: &Snapshot<'_>) {
        let ctx = &self.ctx;
        let (cx, cy) = self.cell_center(snap, snap.apple);
        let radius = snap.cell_size as f64 / 2.0 + apple_pulse(snap.time) as f64;
        ctx.set_shadow_color(&css(APPLE));
        ctx.set_shadow_blur(12.0);
        ctx.set_fill_style_str(&css(APPLE));
        ctx.begin_path();
        let _ = ctx.arc(cx, cy, radius.max(1.0), 0.0, std::f64::consts::TAU);
        ctx.fill();
        ctx.set_shadow_blur(0.0);
    }

    fn draw_power_up(&self, snap: &Snapshot<'_>) {
        let Some(field) = snap.power_up else {
            return;
        };
        let ctx = &self.ctx;
        let (x, y, s) = self.cell_rect(snap, field.cell);
        // Blink faster-looking as it fades out
        let alpha = 0.4 + 0.6 * blink(snap.time) * field.life_fraction.max(0.3);
        ctx.set_global_alpha(alpha as f64);
        ctx.set_fill_style_str(&css(field.kind.color()));
        ctx.fill_rect(x, y, s, s);
        ctx.set_fill_style_str("#ffffff");
        ctx.set_font("bold 10px sans-serif");
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        let _ = ctx.fill_text(field.kind.label(), x + s / 2.0, y + s / 2.0);
        ctx.set_global_alpha(1.0);
    }

    fn draw_snake(&self, snap: &Snapshot<'_>) {
        let ctx = &self.ctx;
        let len = snap.body.len().max(1) as f32;
        for (i, &cell) in snap.body.iter().enumerate() {
            let color = lerp_color(SNAKE_BODY_START, SNAKE_BODY_END, i as f32 / len);
            let (x, y, s) = self.cell_rect(snap, cell);
            ctx.set_fill_style_str(&css(color));
            ctx.fill_rect(x, y, s, s);
        }

        let (x, y, s) = self.cell_rect(snap, snap.head);
        ctx.set_fill_style_str(&css(SNAKE_HEAD));
        ctx.fill_rect(x, y, s, s);

        // Eyes look along the heading
        let (dx, dy) = snap.heading.delta();
        let (cx, cy) = self.cell_center(snap, snap.head);
        let spread = s * 0.22;
        let (ox, oy) = (dx as f64 * s * 0.15, dy as f64 * s * 0.15);
        for sign in [-1.0, 1.0] {
            let (ex, ey) = if dx != 0 {
                (cx + ox, cy + sign * spread)
            } else {
                (cx + sign * spread, cy + oy)
            };
            ctx.set_fill_style_str("#ffffff");
            ctx.begin_path();
            let _ = ctx.arc(ex, ey, s * 0.14, 0.0, std::f64::consts::TAU);
            ctx.fill();
            ctx.set_fill_style_str("#000000");
            ctx.begin_path();
            let _ = ctx.arc(ex + ox * 0.3, ey + oy * 0.3, s * 0.07, 0.0, std::f64::consts::TAU);
            ctx.fill();
        }
    }

    fn draw_particles(&self, snap: &Snapshot<'_>) {
        let ctx = &self.ctx;
        for p in snap.particles {
            ctx.set_global_alpha(p.alpha() as f64);
            ctx.set_fill_style_str(&css(p.color));
            ctx.begin_path();
            let _ = ctx.arc(
                p.pos.x as f64,
                p.pos.y as f64,
                p.radius as f64,
                0.0,
                std::f64::consts::TAU,
            );
            ctx.fill();
        }
        ctx.set_global_alpha(1.0);
    }

    fn draw_hud(&self, snap: &Snapshot<'_>) {
        let ctx = &self.ctx;
        ctx.set_fill_style_str("#ffffff");
        ctx.set_font("16px sans-serif");
        ctx.set_text_align("left");
        ctx.set_text_baseline("top");
        let _ = ctx.fill_text(
            &format!("Score: {}   Best: {}", snap.score, snap.high_score),
            8.0,
            8.0,
        );

        if let Some(effect) = snap.active_effect {
            ctx.set_fill_style_str(&css(effect.kind.color()));
            ctx.set_text_align("right");
            let secs = (effect.remaining_ms / 1000.0).ceil();
            let _ = ctx.fill_text(
                &format!("{} {}s", effect.kind.name(), secs),
                self.size - 8.0,
                8.0,
            );
        }
    }

    fn draw_menu(&self, snap: &Snapshot<'_>) {
        let prompt = format!("Best: {}", snap.high_score);
        self.draw_overlay("SNAKE", &[&prompt, "Press any key or tap to start"], snap);
    }

    fn draw_overlay(&self, title: &str, lines: &[&str], snap: &Snapshot<'_>) {
        let ctx = &self.ctx;
        ctx.set_fill_style_str("rgba(0, 0, 0, 0.7)");
        ctx.fill_rect(0.0, 0.0, self.size, self.size);

        let mid = self.size / 2.0;
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        ctx.set_fill_style_str("#ffffff");
        ctx.set_font("bold 36px sans-serif");
        let _ = ctx.fill_text(title, mid, mid - 40.0);

        ctx.set_font("16px sans-serif");
        for (i, line) in lines.iter().enumerate() {
            let last = i + 1 == lines.len();
            if last {
                // Prompt line blinks
                ctx.set_global_alpha(0.4 + 0.6 * blink(snap.time) as f64);
            }
            let _ = ctx.fill_text(line, mid, mid + i as f64 * 24.0);
            ctx.set_global_alpha(1.0);
        }
    }
}
