//! Floating orbs
//!
//! Soft circles drift on figure-eight paths around fixed anchors, each with
//! a layered glow halo.
//!
//! ## Options
//!
//! - `color`: CSS color of the orbs (default soft violet)
//! - `count`: number of orbs, 1 - 200 (default 12)
//! - `size`: base radius in pixels, 4 - 200 (default 40)
//! - `speed`: drift speed multiplier (default 0.3)
//! - `glow`: halo intensity, 0 - 1 (default 0.5)

use std::f64::consts::TAU;

use vello::Scene;
use vello::kurbo::{Affine, Circle, Point, Rect};
use vello::peniko::{Brush, Fill};
use wos_theme::Color;

use super::{Animation, AnimationOptions, rand, to_peniko};

const GLOW_LAYERS: usize = 3;

#[derive(Debug, Clone, Copy)]
struct Orb {
    /// Anchor as fraction of the surface (0-1)
    anchor: (f64, f64),
    /// Radius multiplier
    scale: f64,
    brightness: f64,
    phase: f64,
    speed: f64,
    /// Current centre in pixels
    center: Point,
}

/// Glowing orbs on figure-eight paths
#[derive(Debug, Clone)]
pub struct FloatingOrbs {
    color: Color,
    count: usize,
    size: f64,
    speed: f64,
    glow: f64,
    width: f64,
    height: f64,
    orbs: Vec<Orb>,
}

impl Default for FloatingOrbs {
    fn default() -> Self {
        Self {
            color: Color::from_u8(180, 140, 255, 200),
            count: 12,
            size: 40.0,
            speed: 0.3,
            glow: 0.5,
            width: 0.0,
            height: 0.0,
            orbs: Vec::new(),
        }
    }
}

impl FloatingOrbs {
    pub fn count(&self) -> usize {
        self.count
    }

    /// Current orb centres in pixels
    pub fn centers(&self) -> impl Iterator<Item = Point> + '_ {
        self.orbs.iter().map(|o| o.center)
    }

    /// Path swing in pixels, kept proportional to the surface
    fn swing(&self) -> (f64, f64) {
        (self.width * 0.08, self.height * 0.06)
    }
}

impl Animation for FloatingOrbs {
    const NAME: &'static str = "orbs";

    fn configure(&mut self, options: &AnimationOptions) {
        if let Some(color) = options.get_color("color") {
            self.color = color;
        }

        if let Some(count) = options.get_usize("count") {
            self.count = count.clamp(1, 200);
        }

        if let Some(size) = options.get_f64("size") {
            self.size = size.clamp(4.0, 200.0);
        }

        if let Some(speed) = options.get_f64("speed") {
            self.speed = speed.max(0.0);
        }

        if let Some(glow) = options.get_f64("glow") {
            self.glow = glow.clamp(0.0, 1.0);
        }
    }

    fn layout(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.orbs = (0..self.count)
            .map(|i| {
                let seed = i as u32 * 6 + 7;
                let anchor = (rand(seed), rand(seed + 1));
                Orb {
                    anchor,
                    scale: 0.5 + rand(seed + 2),
                    brightness: 0.4 + rand(seed + 3) * 0.6,
                    phase: rand(seed + 4) * TAU,
                    speed: 0.6 + rand(seed + 5) * 0.8,
                    center: Point::new(anchor.0 * width, anchor.1 * height),
                }
            })
            .collect();
    }

    fn update(&mut self, _dt: f64, time: f64) {
        let (swing_x, swing_y) = self.swing();
        let (width, height) = (self.width, self.height);
        let speed = self.speed;

        for orb in &mut self.orbs {
            let t = time * speed * orb.speed + orb.phase;
            orb.center = Point::new(
                orb.anchor.0 * width + t.sin() * swing_x,
                orb.anchor.1 * height + (t * 2.0).sin() * 0.5 * swing_y,
            );
        }
    }

    fn render(&self, scene: &mut Scene, bounds: Rect) {
        for orb in &self.orbs {
            let center = Point::new(bounds.x0 + orb.center.x, bounds.y0 + orb.center.y);
            let radius = self.size * orb.scale;
            let alpha = self.color.a as f64 * orb.brightness;

            if self.glow > 0.0 {
                for layer in (1..=GLOW_LAYERS).rev() {
                    let t = layer as f64 / GLOW_LAYERS as f64;
                    let halo_alpha = (alpha * self.glow * (1.0 - t * 0.8) * 0.35) as f32;
                    if halo_alpha <= 0.001 {
                        continue;
                    }
                    let halo = Circle::new(center, radius * (1.0 + t));
                    let brush = Brush::Solid(to_peniko(self.color.with_alpha(halo_alpha)));
                    scene.fill(Fill::NonZero, Affine::IDENTITY, &brush, None, &halo);
                }
            }

            let body = Circle::new(center, radius);
            let brush = Brush::Solid(to_peniko(self.color.with_alpha(alpha as f32)));
            scene.fill(Fill::NonZero, Affine::IDENTITY, &brush, None, &body);
        }
    }
}
