use super::layout::Layout;

/// A point in surface coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// The outline of one filled wave.
///
/// The outline starts at the bottom left corner, follows the wave crest across the viewport and
/// ends at the bottom right corner. Joining the last point back to the first closes the shape.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WavePath {
    points: Vec<Point>,
}

impl WavePath {
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    fn trace(&mut self, phase: f32, layout: &Layout, wave_to_top: f32, amplitude: f32) {
        self.points.clear();
        self.points.push(Point::new(layout.left as f32, layout.bottom as f32));
        let phase = phase as f64;
        let amplitude = amplitude as f64;
        // Sample by index so the x positions don't accumulate rounding errors.
        for index in 0.. {
            let x = index as f32 * layout.sample_spacing;
            if x > layout.max_right {
                break;
            }
            let y = (amplitude * (layout.omega * x as f64 - phase).sin()) as f32 + wave_to_top;
            self.points.push(Point::new(x, y));
        }
        self.points.push(Point::new(layout.right as f32, layout.bottom as f32));
    }
}

/// Build the outline of a single wave: `y = A·sin(ωx − φ) + wave_to_top`.
pub fn build_path(phase: f32, layout: &Layout, wave_to_top: f32, amplitude: f32) -> WavePath {
    let mut path = WavePath::default();
    path.trace(phase, layout, wave_to_top, amplitude);
    path
}

/// The per tick output: one outline per wave layer, in layer order.
#[derive(Clone, Debug, Default)]
pub struct WaveGeometry {
    paths: Vec<WavePath>,
}

impl WaveGeometry {
    /// Replace every outline with one traced from `phases`.
    ///
    /// Point buffers are reused across calls but their contents are always rebuilt from scratch.
    pub fn rebuild(&mut self, phases: &[f32], layout: &Layout, wave_to_top: f32, amplitude: f32) {
        self.paths.resize_with(phases.len(), WavePath::default);
        for (path, phase) in self.paths.iter_mut().zip(phases) {
            path.trace(*phase, layout, wave_to_top, amplitude);
        }
    }

    pub fn paths(&self) -> &[WavePath] {
        &self.paths
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn clear(&mut self) {
        self.paths.clear();
    }
}
