//! Matrix-style falling code
//!
//! Columns of glyphs fall down the surface with a bright head and a fading
//! trail. Glyphs are simple stroked shapes picked from a seed, so no font is
//! needed.
//!
//! ## Options
//!
//! - `color`: CSS color of the trail (default `#00ff46`)
//! - `density`: column density multiplier, 0.1 - 3.0 (default 1.0)
//! - `speed`: fall speed, 1 - 25 (default 7.5)
//! - `font-size`: glyph height in pixels, 8 - 32 (default 14)

use vello::Scene;
use vello::kurbo::{Affine, BezPath, Point, Rect, Stroke};
use vello::peniko::Brush;
use wos_theme::Color;

use super::{Animation, AnimationOptions, hash, rand, to_peniko};

/// Trail glyph slots per column
const TRAIL_GLYPHS: usize = 20;

/// Upper bound on columns, whatever the surface width
const MAX_COLUMNS: usize = 1000;

#[derive(Debug, Clone)]
struct Column {
    /// X position as fraction of width (0-1)
    x: f64,
    /// Head position as fraction of height; below 0 is above the top edge
    head_y: f64,
    /// Glyph seeds from head backwards
    glyph_seeds: Vec<u32>,
    /// Trail length as fraction of height
    trail_length: f64,
    speed: f64,
    falling: bool,
    /// Seconds before the column re-enters from the top
    respawn_delay: f64,
}

impl Column {
    fn spawn(index: usize, seed: u32, columns: usize, head_jitter: f64) -> Self {
        Self {
            x: (index as f64 + 0.5) / columns as f64,
            head_y: -rand(seed) * head_jitter,
            glyph_seeds: (0..TRAIL_GLYPHS as u32)
                .map(|j| seed.wrapping_add(j * 100))
                .collect(),
            trail_length: 0.15 + rand(seed.wrapping_add(1000)) * 0.25,
            speed: 0.7 + rand(seed.wrapping_add(2000)) * 0.6,
            falling: true,
            respawn_delay: 0.0,
        }
    }
}

/// Falling glyph columns
#[derive(Debug, Clone)]
pub struct MatrixRain {
    color: Color,
    columns: Vec<Column>,
    glyph_width: f64,
    glyph_height: f64,
    /// Fraction of the surface height per second
    base_speed: f64,
    density: f64,
    time: f64,
}

impl Default for MatrixRain {
    fn default() -> Self {
        Self {
            color: Color::from_u8(0, 255, 70, 255),
            columns: Vec::new(),
            glyph_width: 10.0,
            glyph_height: 14.0,
            base_speed: 0.3,
            density: 1.0,
            time: 0.0,
        }
    }
}

impl MatrixRain {
    /// Number of columns laid out for the current surface
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn density(&self) -> f64 {
        self.density
    }

    pub fn glyph_height(&self) -> f64 {
        self.glyph_height
    }

    fn glyph(center: Point, width: f64, height: f64, seed: u32) -> BezPath {
        let mut path = BezPath::new();
        let w = width * 0.7;
        let h = height * 0.8;
        let x = center.x - w / 2.0;
        let y = center.y - h / 2.0;
        let p = |fx: f64, fy: f64| Point::new(x + w * fx, y + h * fy);

        match hash(seed) % 8 {
            0 => {
                path.move_to(p(0.2, 0.0));
                path.line_to(p(0.2, 1.0));
                path.move_to(p(0.8, 0.0));
                path.line_to(p(0.8, 1.0));
            }
            1 => {
                path.move_to(p(0.0, 0.0));
                path.line_to(p(1.0, 0.0));
                path.line_to(p(1.0, 1.0));
                path.line_to(p(0.0, 1.0));
                path.close_path();
            }
            2 => {
                path.move_to(p(0.5, 0.0));
                path.line_to(p(0.5, 1.0));
                path.move_to(p(0.0, 0.5));
                path.line_to(p(1.0, 0.5));
            }
            3 => {
                path.move_to(p(0.5, 0.0));
                path.line_to(p(1.0, 1.0));
                path.line_to(p(0.0, 1.0));
                path.close_path();
            }
            4 => {
                for fy in [0.0, 0.5, 1.0] {
                    path.move_to(p(0.0, fy));
                    path.line_to(p(1.0, fy));
                }
            }
            5 => {
                path.move_to(p(0.0, 0.0));
                path.line_to(p(0.0, 1.0));
                path.line_to(p(1.0, 1.0));
            }
            6 => {
                path.move_to(p(0.0, 0.0));
                path.line_to(p(1.0, 1.0));
                path.move_to(p(1.0, 0.0));
                path.line_to(p(0.0, 1.0));
            }
            _ => {
                path.move_to(p(0.3, 0.2));
                path.line_to(p(0.5, 0.0));
                path.line_to(p(0.5, 1.0));
                path.move_to(p(0.2, 1.0));
                path.line_to(p(0.8, 1.0));
            }
        }

        path
    }
}

impl Animation for MatrixRain {
    const NAME: &'static str = "matrix";

    fn configure(&mut self, options: &AnimationOptions) {
        if let Some(color) = options.get_color("color") {
            self.color = color;
        }

        if let Some(density) = options.get_f64("density") {
            self.density = density.clamp(0.1, 3.0);
        }

        if let Some(speed) = options.get_f64("speed") {
            self.base_speed = (speed / 25.0).clamp(0.04, 1.0);
        }

        if let Some(font_size) = options.get_f64("font-size") {
            self.glyph_height = font_size.clamp(8.0, 32.0);
            self.glyph_width = self.glyph_height * 0.7;
        }
    }

    fn layout(&mut self, width: f64, _height: f64) {
        let spacing = self.glyph_width * 1.4;
        let count = (((width / spacing) * self.density).round().max(1.0) as usize).min(MAX_COLUMNS);

        self.time = 0.0;
        self.columns = (0..count)
            .map(|i| Column::spawn(i, i as u32, count, 0.5))
            .collect();
    }

    fn update(&mut self, dt: f64, time: f64) {
        self.time = time;
        let count = self.columns.len();

        for (i, column) in self.columns.iter_mut().enumerate() {
            let idx = i as u32;

            if column.falling {
                column.head_y += self.base_speed * column.speed * dt;

                // Occasionally flicker one glyph in the trail
                let flicker = (time * 1000.0) as u32 ^ idx.wrapping_mul(7919);
                if rand(flicker) < 0.1 {
                    let slot = hash(flicker.wrapping_add(500)) as usize % column.glyph_seeds.len();
                    column.glyph_seeds[slot] = flicker.wrapping_add(1000);
                }

                if column.head_y > 1.0 + column.trail_length {
                    column.falling = false;
                    column.respawn_delay = rand(idx.wrapping_add((time * 100.0) as u32)) * 2.0;
                }
            } else {
                column.respawn_delay -= dt;
                if column.respawn_delay <= 0.0 {
                    let seed = idx.wrapping_add((time * 1000.0) as u32);
                    *column = Column::spawn(i, seed, count, 0.2);
                }
            }
        }
    }

    fn render(&self, scene: &mut Scene, bounds: Rect) {
        let width = bounds.width();
        let height = bounds.height();
        if self.columns.is_empty() || height <= 0.0 {
            return;
        }

        let stroke = Stroke::new(1.5);
        let head_color = to_peniko(Color::rgb(
            (0.78 + self.color.r * 0.22).min(1.0),
            1.0,
            (0.78 + self.color.b * 0.22).min(1.0),
        ));

        for column in self.columns.iter().filter(|c| c.falling) {
            let x = bounds.x0 + column.x * width;
            let head_y = bounds.y0 + column.head_y * height;
            let trail = ((column.trail_length * height) / self.glyph_height) as usize;

            for (i, &seed) in column.glyph_seeds.iter().take(trail.max(1)).enumerate() {
                let y = head_y - i as f64 * self.glyph_height;
                if y < bounds.y0 - self.glyph_height || y > bounds.y1 + self.glyph_height {
                    continue;
                }

                let color = if i == 0 {
                    head_color
                } else {
                    let fade = 1.0 - i as f64 / trail as f64;
                    let alpha = (fade * fade * 0.8) as f32;
                    if alpha <= 0.0 {
                        continue;
                    }
                    to_peniko(self.color.with_alpha(alpha))
                };

                let center = Point::new(x, y + self.glyph_height / 2.0);
                let glyph = Self::glyph(center, self.glyph_width, self.glyph_height, seed);
                scene.stroke(&stroke, Affine::IDENTITY, &Brush::Solid(color), None, &glyph);
            }
        }
    }
}
