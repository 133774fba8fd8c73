//! WOS Renderer - drawing surface and background animations
//!
//! This crate provides:
//! - [`Surface`]: the shared raster target behind the desktop background,
//!   holding a vello [`Scene`](vello::Scene) with the current frame
//! - [`FrameScheduler`]: the host's redraw-callback registry
//! - [`AnimationStrategy`]: the capability interface every background
//!   animation implements, plus the `matrix`, `mesh` and `orbs` animations
//!
//! Everything here is single-threaded; shared handles are `Rc<RefCell<_>>`.

pub mod effects;
pub mod frame;
pub mod surface;

pub use effects::{
    Animation, AnimationKind, AnimationOptions, AnimationStrategy, FloatingOrbs, MatrixRain,
    Strategy, WireframeMesh,
};
pub use frame::{FrameRequest, FrameScheduler, SharedFrames};
pub use surface::{SharedSurface, Surface, SurfaceCall, SurfaceFill};
