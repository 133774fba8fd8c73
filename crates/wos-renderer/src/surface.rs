//! The drawing surface behind the desktop background
//!
//! A `Surface` is shared between the resize coordinator, which owns its
//! dimensions, and whichever animation currently holds the drawing right.
//! Static backgrounds (flat color, image layer) are painted directly by the
//! host element.
//!
//! Surfaces created with [`Surface::recording`] keep a log of every call so
//! tests can assert on ordering without a GPU.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use vello::Scene;
use vello::kurbo::{Affine, Rect};
use vello::peniko::{self, Brush, Fill};
use wos_theme::{BackgroundPosition, BackgroundSize, Color};

/// Shared handle to the host's drawing surface
pub type SharedSurface = Rc<RefCell<Surface>>;

/// What the surface currently shows
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SurfaceFill {
    #[default]
    Blank,
    Solid(Color),
    Image {
        url: String,
        size: BackgroundSize,
        position: BackgroundPosition,
    },
    /// Frames produced by the named animation
    Animation(&'static str),
}

/// Record of a surface mutation for test inspection
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    Resized { width: u32, height: u32 },
    Cleared,
    Painted(SurfaceFill),
    AnimationStarted(&'static str),
    AnimationStopped(&'static str),
    Frame(&'static str),
}

pub struct Surface {
    width: u32,
    height: u32,
    scene: Scene,
    fill: SurfaceFill,
    recording: bool,
    calls: Vec<SurfaceCall>,
}

impl fmt::Debug for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("fill", &self.fill)
            .field("recorded_calls", &self.calls.len())
            .finish()
    }
}

impl Surface {
    /// Create a blank surface
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            scene: Scene::new(),
            fill: SurfaceFill::Blank,
            recording: false,
            calls: Vec::new(),
        }
    }

    /// Create a blank surface that logs every mutation
    pub fn recording(width: u32, height: u32) -> Self {
        Self {
            recording: true,
            ..Self::new(width, height)
        }
    }

    /// Move this surface behind a shared handle
    pub fn into_shared(self) -> SharedSurface {
        Rc::new(RefCell::new(self))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Drawing bounds in pixels
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width as f64, self.height as f64)
    }

    /// Current frame's drawing commands
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn fill(&self) -> &SurfaceFill {
        &self.fill
    }

    /// Whether anything is shown at all
    pub fn is_blank(&self) -> bool {
        self.fill == SurfaceFill::Blank
    }

    /// Change pixel dimensions.
    ///
    /// Static fills are repainted at the new size; animation content is
    /// left for the animation's next frame.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.record(SurfaceCall::Resized { width, height });

        if let SurfaceFill::Solid(color) = self.fill {
            self.fill_rect(color);
        }
    }

    /// Blank the whole surface
    pub fn clear(&mut self) {
        self.scene.reset();
        self.fill = SurfaceFill::Blank;
        self.record(SurfaceCall::Cleared);
    }

    /// Paint a flat color over the whole surface
    pub fn paint_solid(&mut self, color: Color) {
        self.fill_rect(color);
        self.fill = SurfaceFill::Solid(color);
        self.record(SurfaceCall::Painted(self.fill.clone()));
    }

    /// Show an image layer.
    ///
    /// The surface only carries the layer description; decoding and
    /// placement happen in the compositor.
    pub fn paint_image(&mut self, url: &str, size: BackgroundSize, position: BackgroundPosition) {
        self.scene.reset();
        self.fill = SurfaceFill::Image {
            url: url.to_string(),
            size,
            position,
        };
        self.record(SurfaceCall::Painted(self.fill.clone()));
    }

    /// Hand the surface to an animation
    pub fn begin_animation(&mut self, name: &'static str) {
        self.scene.reset();
        self.fill = SurfaceFill::Animation(name);
        self.record(SurfaceCall::AnimationStarted(name));
    }

    /// Take the surface back from an animation, leaving it blank
    pub fn end_animation(&mut self, name: &'static str) {
        self.record(SurfaceCall::AnimationStopped(name));
        self.clear();
    }

    /// Reset the scene for a new animation frame and return it for drawing
    pub fn draw_frame(&mut self, name: &'static str) -> &mut Scene {
        self.scene.reset();
        self.record(SurfaceCall::Frame(name));
        &mut self.scene
    }

    fn fill_rect(&mut self, color: Color) {
        self.scene.reset();
        let brush = Brush::Solid(peniko::Color::new([color.r, color.g, color.b, color.a]));
        let rect = self.bounds();
        self.scene.fill(Fill::NonZero, Affine::IDENTITY, &brush, None, &rect);
    }

    fn record(&mut self, call: SurfaceCall) {
        if self.recording {
            self.calls.push(call);
        }
    }

    // === Assertion helpers ===

    /// All recorded calls, oldest first
    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    /// Drain the recorded calls
    pub fn take_calls(&mut self) -> Vec<SurfaceCall> {
        std::mem::take(&mut self.calls)
    }

    /// Count recorded calls matching a predicate
    pub fn count_calls(&self, pred: impl Fn(&SurfaceCall) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    /// Index of the first recorded call equal to `call`
    pub fn position_of(&self, call: &SurfaceCall) -> Option<usize> {
        self.calls.iter().position(|c| c == call)
    }
}
