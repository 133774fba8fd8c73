//! Wireframe mesh backdrop
//!
//! A lattice of jittered nodes, each drifting on its own small loop, joined
//! to its right, lower and lower-right neighbours. Edges fade as they
//! stretch, so the mesh appears to breathe.
//!
//! ## Options
//!
//! - `color`: CSS color of the edges (default cyan)
//! - `spacing`: node spacing in pixels, 24 - 400 (default 80)
//! - `speed`: drift speed multiplier (default 0.5)
//! - `line-width`: edge width in pixels, 0.25 - 8 (default 1)
//! - `intensity`: overall opacity, 0 - 1 (default 0.6)

use std::f64::consts::TAU;

use vello::Scene;
use vello::kurbo::{Affine, Circle, Line, Point, Rect, Stroke, Vec2};
use vello::peniko::{Brush, Fill};
use wos_theme::Color;

use super::{Animation, AnimationOptions, rand, to_peniko};

/// Upper bound on lattice columns and rows, whatever the surface size
const MAX_LATTICE_SIDE: usize = 200;

#[derive(Debug, Clone, Copy)]
struct Node {
    /// Rest position in pixels
    base: Point,
    phase: f64,
    /// Drift radius in pixels
    amplitude: f64,
    /// Current position in pixels
    pos: Point,
}

/// Drifting wireframe lattice
#[derive(Debug, Clone)]
pub struct WireframeMesh {
    color: Color,
    spacing: f64,
    speed: f64,
    line_width: f64,
    intensity: f64,
    cols: usize,
    rows: usize,
    nodes: Vec<Node>,
}

impl Default for WireframeMesh {
    fn default() -> Self {
        Self {
            color: Color::from_u8(0, 255, 255, 255),
            spacing: 80.0,
            speed: 0.5,
            line_width: 1.0,
            intensity: 0.6,
            cols: 0,
            rows: 0,
            nodes: Vec::new(),
        }
    }
}

impl WireframeMesh {
    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    /// Lattice dimensions (columns, rows) for the current surface
    pub fn lattice(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    fn node(&self, col: usize, row: usize) -> Option<&Node> {
        if col < self.cols && row < self.rows {
            self.nodes.get(row * self.cols + col)
        } else {
            None
        }
    }

    fn edge_alpha(&self, a: Point, b: Point) -> f32 {
        let stretch = a.distance(b) / (self.spacing * 1.6);
        ((1.0 - stretch).clamp(0.0, 1.0) * self.intensity) as f32
    }
}

impl Animation for WireframeMesh {
    const NAME: &'static str = "mesh";

    fn configure(&mut self, options: &AnimationOptions) {
        if let Some(color) = options.get_color("color") {
            self.color = color;
        }

        if let Some(spacing) = options.get_f64("spacing") {
            self.spacing = spacing.clamp(24.0, 400.0);
        }

        if let Some(speed) = options.get_f64("speed") {
            self.speed = speed.max(0.0);
        }

        if let Some(width) = options.get_f64("line-width") {
            self.line_width = width.clamp(0.25, 8.0);
        }

        if let Some(intensity) = options.get_f64("intensity") {
            self.intensity = intensity.clamp(0.0, 1.0);
        }
    }

    fn layout(&mut self, width: f64, height: f64) {
        // One extra ring of nodes outside the surface so edges reach the border
        let side = |extent: f64| ((extent / self.spacing).ceil().max(0.0) as usize + 3).min(MAX_LATTICE_SIDE);
        self.cols = side(width);
        self.rows = side(height);

        self.nodes.clear();
        self.nodes.reserve(self.cols * self.rows);
        for row in 0..self.rows {
            for col in 0..self.cols {
                let seed = ((row * self.cols + col) as u32).wrapping_mul(4);
                let jitter_x = (rand(seed) - 0.5) * self.spacing * 0.5;
                let jitter_y = (rand(seed.wrapping_add(1)) - 0.5) * self.spacing * 0.5;
                let base = Point::new(
                    (col as f64 - 1.0) * self.spacing + jitter_x,
                    (row as f64 - 1.0) * self.spacing + jitter_y,
                );
                self.nodes.push(Node {
                    base,
                    phase: rand(seed.wrapping_add(2)) * TAU,
                    amplitude: self.spacing * (0.1 + rand(seed.wrapping_add(3)) * 0.2),
                    pos: base,
                });
            }
        }
    }

    fn update(&mut self, _dt: f64, time: f64) {
        let t = time * self.speed;
        for node in &mut self.nodes {
            let angle = t + node.phase;
            node.pos = Point::new(
                node.base.x + angle.sin() * node.amplitude,
                node.base.y + (angle * 0.8).cos() * node.amplitude,
            );
        }
    }

    fn render(&self, scene: &mut Scene, bounds: Rect) {
        if self.intensity <= 0.0 || self.nodes.is_empty() {
            return;
        }

        let stroke = Stroke::new(self.line_width);
        let offset = Vec2::new(bounds.x0, bounds.y0);

        for row in 0..self.rows {
            for col in 0..self.cols {
                let Some(a) = self.node(col, row) else {
                    continue;
                };
                let neighbours = [
                    self.node(col + 1, row),
                    self.node(col, row + 1),
                    self.node(col + 1, row + 1),
                ];

                for b in neighbours.into_iter().flatten() {
                    let alpha = self.edge_alpha(a.pos, b.pos);
                    if alpha <= 0.01 {
                        continue;
                    }
                    let line = Line::new(a.pos + offset, b.pos + offset);
                    let brush = Brush::Solid(to_peniko(self.color.with_alpha(alpha)));
                    scene.stroke(&stroke, Affine::IDENTITY, &brush, None, &line);
                }

                let vertex = Circle::new(a.pos + offset, self.line_width * 1.5);
                let brush = Brush::Solid(to_peniko(
                    self.color.with_alpha(self.intensity as f32),
                ));
                scene.fill(Fill::NonZero, Affine::IDENTITY, &brush, None, &vertex);
            }
        }
    }
}
