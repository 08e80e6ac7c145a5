use std::f64::consts::TAU;

/// The default ratio between the wave length and the viewport width.
pub const DEFAULT_WAVE_MULTIPLE: f32 = 1.5;

/// The default horizontal distance between two wave samples.
pub const DEFAULT_SAMPLE_SPACING: f32 = 20.0;

/// The area the renderer draws into, in surface coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Viewport {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(left: i32, top: i32, width: u32, height: u32) -> Self {
        Self { left, top, width, height }
    }

    /// A viewport anchored at the origin.
    pub fn sized(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    pub fn right(&self) -> i32 {
        self.left.saturating_add(self.width as i32)
    }

    pub fn bottom(&self) -> i32 {
        self.top.saturating_add(self.height as i32)
    }
}

/// Layout dependent wave constants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layout {
    pub viewport: Viewport,
    pub left: i32,
    pub right: i32,
    pub bottom: i32,
    pub wave_length: f32,
    /// Angular frequency: `2π / wave_length`.
    pub omega: f64,
    /// The last x coordinate sampled, one spacing past the right edge.
    pub max_right: f32,
    pub sample_spacing: f32,
}

/// Lazily derives a [Layout] from the viewport and caches it until the viewport changes.
#[derive(Clone, Debug)]
pub struct LayoutParameters {
    wave_multiple: f32,
    sample_spacing: f32,
    computed: Option<Layout>,
}

impl LayoutParameters {
    pub fn new(wave_multiple: f32, sample_spacing: f32) -> Self {
        Self { wave_multiple, sample_spacing, computed: None }
    }

    /// Make sure the cached layout matches `viewport`.
    ///
    /// This is a plain comparison when nothing changed, so it's meant to be called on every tick.
    /// A zero width viewport hasn't been measured yet: any cached layout is dropped and nothing is
    /// derived until a real size shows up. Returns whether the layout was (re)derived.
    pub fn ensure_computed(&mut self, viewport: &Viewport) -> bool {
        if viewport.width == 0 {
            self.computed = None;
            return false;
        }
        if self.computed.is_some_and(|layout| layout.viewport == *viewport) {
            return false;
        }
        let wave_length = viewport.width as f32 * self.wave_multiple;
        let layout = Layout {
            viewport: *viewport,
            left: viewport.left,
            right: viewport.right(),
            bottom: viewport.bottom(),
            wave_length,
            omega: TAU / wave_length as f64,
            max_right: viewport.right() as f32 + self.sample_spacing,
            sample_spacing: self.sample_spacing,
        };
        log::debug!(
            "layout derived: width={} wave_length={} omega={} left={} right={} bottom={}",
            viewport.width,
            layout.wave_length,
            layout.omega,
            layout.left,
            layout.right,
            layout.bottom
        );
        self.computed = Some(layout);
        true
    }

    pub fn layout(&self) -> Option<&Layout> {
        self.computed.as_ref()
    }

    pub fn is_computed(&self) -> bool {
        self.computed.is_some()
    }

    /// Drop the cached layout so the next call to [LayoutParameters::ensure_computed] derives it.
    pub fn invalidate(&mut self) {
        self.computed = None;
    }
}

impl Default for LayoutParameters {
    fn default() -> Self {
        Self::new(DEFAULT_WAVE_MULTIPLE, DEFAULT_SAMPLE_SPACING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_width_defers() {
        let mut params = LayoutParameters::default();
        assert!(!params.ensure_computed(&Viewport::sized(0, 200)));
        assert!(params.layout().is_none());
    }

    #[test]
    fn derives_constants() {
        let mut params = LayoutParameters::default();
        assert!(params.ensure_computed(&Viewport::new(10, 5, 200, 200)));

        let layout = params.layout().expect("no layout");
        assert_eq!(layout.left, 10);
        assert_eq!(layout.right, 210);
        assert_eq!(layout.bottom, 205);
        assert_eq!(layout.wave_length, 300.0);
        assert_eq!(layout.max_right, 230.0);
        assert!((layout.omega - TAU / 300.0).abs() < 1e-12);
    }

    #[test]
    fn unchanged_viewport_is_a_no_op() {
        let mut params = LayoutParameters::default();
        let viewport = Viewport::sized(120, 120);
        assert!(params.ensure_computed(&viewport));
        assert!(!params.ensure_computed(&viewport));
        assert!(!params.ensure_computed(&viewport));
    }

    #[test]
    fn resize_recomputes() {
        let mut params = LayoutParameters::default();
        params.ensure_computed(&Viewport::sized(100, 100));
        assert!(params.ensure_computed(&Viewport::sized(400, 100)));
        assert_eq!(params.layout().map(|l| l.wave_length), Some(600.0));
    }

    #[test]
    fn collapsing_to_zero_drops_layout() {
        let mut params = LayoutParameters::default();
        params.ensure_computed(&Viewport::sized(100, 100));
        params.ensure_computed(&Viewport::sized(0, 100));
        assert!(!params.is_computed());
    }

    #[test]
    fn invalidate_forces_recompute() {
        let mut params = LayoutParameters::default();
        let viewport = Viewport::sized(100, 100);
        params.ensure_computed(&viewport);
        params.invalidate();
        assert!(params.ensure_computed(&viewport));
    }
}
