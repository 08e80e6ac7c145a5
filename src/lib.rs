//! An animated "liquid fill" progress indicator.
//!
//! Two sine waves, offset in phase, are traced across a viewport at a height that follows the
//! progress value, clipped to a circle and shifted a little on every tick so the surface appears
//! to move.
//!
//! ```text
//! AnimationScheduler ──► WaveView::tick ──► PhaseClock, WaveGeometry ──► RedrawSink
//! host redraw ─────────► WaveView::draw ──► RenderSurface
//! ```

pub mod animation;
pub mod config;
pub mod error;
pub mod persist;
pub mod render;
pub mod wave;

pub use animation::{AnimationScheduler, RedrawSink, SchedulerState, TickOutcome};
pub use config::WaveConfig;
pub use error::{ConfigError, StateError, WaveError};
pub use persist::SavedState;
pub use render::{CellCanvas, Circle, RenderSurface};
pub use wave::{Color, Viewport, WaveView};
