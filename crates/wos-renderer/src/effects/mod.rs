//! Background animation strategies
//!
//! ## Architecture
//!
//! Each drawing algorithm implements [`Animation`]: it lays itself out for a
//! surface size, advances with time, and renders into a vello [`Scene`].
//! [`Strategy`] wraps any `Animation` with the lifecycle every background
//! animation shares (start/stop, option handling, frame requests), and is
//! exposed to the host only through the object-safe [`AnimationStrategy`]
//! interface.
//!
//! Concrete animations are picked by name through [`AnimationKind`]:
//!
//! | name     | animation                         |
//! |----------|-----------------------------------|
//! | `matrix` | falling glyph columns             |
//! | `mesh`   | drifting wireframe lattice        |
//! | `orbs`   | glowing orbs on figure-eight paths |

pub mod matrix;
pub mod mesh;
pub mod options;
pub mod orbs;

pub use matrix::MatrixRain;
pub use mesh::WireframeMesh;
pub use options::AnimationOptions;
pub use orbs::FloatingOrbs;

use std::fmt;

use vello::Scene;
use vello::kurbo::Rect;
use vello::peniko;

use crate::frame::{FrameRequest, SharedFrames};
use crate::surface::SharedSurface;

/// A drawing algorithm for the background
pub trait Animation: Default {
    /// Registry name, e.g. "matrix"
    const NAME: &'static str;

    /// Apply tunables. Unknown keys and unparseable values are ignored.
    fn configure(&mut self, options: &AnimationOptions);

    /// (Re)initialize for a surface of the given size in pixels
    fn layout(&mut self, width: f64, height: f64);

    /// Advance animation state
    ///
    /// # Arguments
    /// * `dt` - Seconds since the previous frame
    /// * `time` - Seconds since start
    fn update(&mut self, dt: f64, time: f64);

    /// Draw the current state
    fn render(&self, scene: &mut Scene, bounds: Rect);
}

/// Capability interface the host uses to drive a background animation
pub trait AnimationStrategy {
    /// Registry name of the animation
    fn name(&self) -> &'static str;

    /// Begin producing frames. Idempotent.
    fn start(&mut self);

    /// Stop producing frames and blank the surface. Idempotent.
    fn stop(&mut self);

    /// Replace the tunables. An empty record is ignored.
    fn set_options(&mut self, options: &AnimationOptions);

    /// Effective options, as an owned copy
    fn options(&self) -> AnimationOptions;

    /// True between `start()` and `stop()`
    fn is_active(&self) -> bool;

    /// Redraw callback from the host
    ///
    /// # Arguments
    /// * `dt` - Seconds since the previous redraw
    fn on_frame(&mut self, dt: f32);
}

/// Lifecycle wrapper shared by every animation
pub struct Strategy<A: Animation> {
    animation: A,
    options: AnimationOptions,
    surface: SharedSurface,
    frames: SharedFrames,
    pending: Option<FrameRequest>,
    active: bool,
    time: f64,
}

impl<A: Animation> Strategy<A> {
    /// Create a stopped strategy bound to the host's surface
    pub fn new(surface: SharedSurface, frames: SharedFrames) -> Self {
        Self {
            animation: A::default(),
            options: AnimationOptions::new(),
            surface,
            frames,
            pending: None,
            active: false,
            time: 0.0,
        }
    }

    /// The wrapped animation
    pub fn animation(&self) -> &A {
        &self.animation
    }

    /// Whether a next-frame request is outstanding
    pub fn has_pending_frame(&self) -> bool {
        self.pending.is_some()
    }

    fn surface_size(&self) -> (f64, f64) {
        let (w, h) = self.surface.borrow().size();
        (w as f64, h as f64)
    }
}

impl<A: Animation> AnimationStrategy for Strategy<A> {
    fn name(&self) -> &'static str {
        A::NAME
    }

    fn start(&mut self) {
        if self.active {
            return;
        }

        let (width, height) = self.surface_size();
        self.animation.layout(width, height);
        self.time = 0.0;
        self.active = true;

        self.surface.borrow_mut().begin_animation(A::NAME);
        self.pending = Some(self.frames.borrow_mut().request());
        log::debug!("Started {} animation at {}x{}", A::NAME, width, height);
    }

    fn stop(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;

        if let Some(request) = self.pending.take() {
            self.frames.borrow_mut().cancel(request);
        }
        self.surface.borrow_mut().end_animation(A::NAME);
        log::debug!("Stopped {} animation", A::NAME);
    }

    fn set_options(&mut self, options: &AnimationOptions) {
        if options.is_empty() {
            return;
        }

        let mut animation = A::default();
        animation.configure(options);
        if self.active {
            let (width, height) = self.surface_size();
            animation.layout(width, height);
        }
        self.animation = animation;
        self.options = options.clone();
    }

    fn options(&self) -> AnimationOptions {
        self.options.clone()
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn on_frame(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        let Some(request) = self.pending.take() else {
            return;
        };
        if !self.frames.borrow_mut().consume(request) {
            return;
        }

        let dt = dt.max(0.0) as f64;
        self.time += dt;
        self.animation.update(dt, self.time);

        {
            let mut surface = self.surface.borrow_mut();
            let bounds = surface.bounds();
            let scene = surface.draw_frame(A::NAME);
            self.animation.render(scene, bounds);
        }

        self.pending = Some(self.frames.borrow_mut().request());
    }
}

impl<A: Animation> Drop for Strategy<A> {
    fn drop(&mut self) {
        // A discarded strategy must not leave a frame request behind.
        if let Some(request) = self.pending.take() {
            if let Ok(mut frames) = self.frames.try_borrow_mut() {
                frames.cancel(request);
            }
        }
    }
}

/// Registry of the built-in animations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationKind {
    Matrix,
    Mesh,
    Orbs,
}

impl AnimationKind {
    pub const ALL: [AnimationKind; 3] = [AnimationKind::Matrix, AnimationKind::Mesh, AnimationKind::Orbs];

    /// Registry name
    pub fn name(self) -> &'static str {
        match self {
            AnimationKind::Matrix => MatrixRain::NAME,
            AnimationKind::Mesh => WireframeMesh::NAME,
            AnimationKind::Orbs => FloatingOrbs::NAME,
        }
    }

    /// Look up by exact registry name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Construct a stopped strategy of this kind bound to the surface
    pub fn create(self, surface: SharedSurface, frames: SharedFrames) -> Box<dyn AnimationStrategy> {
        match self {
            AnimationKind::Matrix => Box::new(Strategy::<MatrixRain>::new(surface, frames)),
            AnimationKind::Mesh => Box::new(Strategy::<WireframeMesh>::new(surface, frames)),
            AnimationKind::Orbs => Box::new(Strategy::<FloatingOrbs>::new(surface, frames)),
        }
    }
}

impl fmt::Display for AnimationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Murmur3 finalizer, used as a cheap deterministic RNG
pub(crate) fn hash(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^= h >> 16;
    h
}

/// Random float in [0, 1] from a seed
pub(crate) fn rand(seed: u32) -> f64 {
    hash(seed) as f64 / u32::MAX as f64
}

pub(crate) fn to_peniko(color: wos_theme::Color) -> peniko::Color {
    peniko::Color::new([color.r, color.g, color.b, color.a])
}
