mod pacing;
mod scheduler;

pub use pacing::FramePacer;
pub use scheduler::{AnimationScheduler, RedrawSink, SchedulerState, TickOutcome, TickTicket};
