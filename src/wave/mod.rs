pub mod geometry;
pub mod layout;
pub mod phase;
pub mod progress;
pub mod style;
mod view;

pub use geometry::{build_path, Point, WaveGeometry, WavePath};
pub use layout::{Layout, LayoutParameters, Viewport};
pub use phase::{PhaseClock, PhaseLayer, PhaseWrap};
pub use progress::ProgressMapper;
pub use style::{Color, WaveStyle};
pub use view::WaveView;
