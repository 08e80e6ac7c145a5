use super::geometry::{Point, WaveGeometry};
use super::layout::{LayoutParameters, Viewport};
use super::phase::PhaseClock;
use super::progress::ProgressMapper;
use super::style::{Color, WaveStyle};
use crate::config::WaveConfig;
use crate::error::ConfigError;
use crate::persist::SavedState;
use crate::render::{Circle, RenderSurface};
use std::fmt::Write;

/// An animated liquid fill clipped to a circle.
///
/// The view owns every piece of mutable wave state. Hosts feed it the viewport size and progress
/// changes, call [WaveView::tick] to move the waves and [WaveView::draw] to paint the last traced
/// frame.
#[derive(Clone, Debug)]
pub struct WaveView {
    viewport: Viewport,
    progress: ProgressMapper,
    layout: LayoutParameters,
    clock: PhaseClock,
    geometry: WaveGeometry,
    style: WaveStyle,
    amplitude: f32,
}

impl WaveView {
    pub fn new(config: &WaveConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            viewport: Viewport::default(),
            progress: ProgressMapper::new(config.progress, config.max_progress)?,
            layout: LayoutParameters::new(config.wave_multiple, config.sample_spacing),
            clock: PhaseClock::two_layer(config.phase_step, config.phase_wrap),
            geometry: WaveGeometry::default(),
            style: WaveStyle {
                above_color: config.above_wave_color,
                below_color: config.below_wave_color,
                circle_padding: config.circle_padding,
            },
            amplitude: config.wave_height as f32,
        })
    }

    /// Replace the phase clock, e.g. to run more than two layers.
    pub fn with_clock(mut self, clock: PhaseClock) -> Self {
        self.clock = clock;
        self
    }

    /// Set the progress in the host's native scale, see [ProgressMapper::set_progress].
    pub fn set_progress(&mut self, raw: i32) {
        self.progress.set_progress(raw);
    }

    /// The stored progress, in `0..=max_progress`.
    pub fn progress(&self) -> i32 {
        self.progress.progress()
    }

    pub fn set_max_progress(&mut self, max_progress: i32) -> Result<(), ConfigError> {
        self.progress.set_max_progress(max_progress)
    }

    pub fn max_progress(&self) -> i32 {
        self.progress.max_progress()
    }

    pub fn set_above_wave_color(&mut self, color: Color) {
        self.style.above_color = color;
    }

    pub fn set_below_wave_color(&mut self, color: Color) {
        self.style.below_color = color;
    }

    pub fn style(&self) -> &WaveStyle {
        &self.style
    }

    /// Set the amplitude used from the next tick on.
    pub fn set_wave_height(&mut self, height: i32) {
        self.amplitude = height as f32;
    }

    pub fn wave_height(&self) -> f32 {
        self.amplitude
    }

    /// Tell the view where it's drawn. Layout constants are re-derived on the next tick.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.progress.set_height(viewport.height);
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The fill line, in pixels from the top of the viewport.
    pub fn wave_to_top(&self) -> f32 {
        self.progress.wave_to_top()
    }

    pub fn clock(&self) -> &PhaseClock {
        &self.clock
    }

    pub fn geometry(&self) -> &WaveGeometry {
        &self.geometry
    }

    /// Advance the animation by one frame.
    ///
    /// Returns `false` without touching the phases while the viewport hasn't been measured: there's
    /// nothing meaningful to trace yet.
    pub fn tick(&mut self) -> bool {
        if self.layout.ensure_computed(&self.viewport) {
            self.progress.set_height(self.viewport.height);
            log::debug!("{}", self.describe());
        }
        let Some(layout) = self.layout.layout() else {
            self.geometry.clear();
            return false;
        };
        self.clock.advance();
        let phases = self.clock.phases();
        self.geometry.rebuild(&phases, layout, self.progress.wave_to_top(), self.amplitude);
        true
    }

    /// The circle the waves are clipped to.
    pub fn clip(&self) -> Circle {
        let half = self.viewport.width as f32 / 2.0;
        let center = Point::new(self.viewport.left as f32 + half, self.viewport.top as f32 + half);
        Circle::new(center, half - self.style.circle_padding)
    }

    /// Paint the most recently traced frame: every layer back to front, clipped to the circle.
    pub fn draw(&self, surface: &mut dyn RenderSurface) {
        if self.geometry.is_empty() {
            return;
        }
        surface.clip_to_circle(self.clip());
        for (index, path) in self.geometry.paths().iter().enumerate() {
            surface.fill_path(path, self.layer_color(index));
        }
        surface.reset_clip();
    }

    fn layer_color(&self, index: usize) -> Color {
        match index {
            0 => self.style.above_color,
            _ => self.style.below_color,
        }
    }

    pub fn save_state(&self) -> SavedState {
        SavedState { progress: self.progress() }
    }

    /// Bring back a saved progress. Animation state starts over.
    pub fn restore_state(&mut self, state: &SavedState) {
        self.progress.restore(state.progress);
    }

    /// A human readable dump of the current wave parameters.
    pub fn describe(&self) -> String {
        let mut output = String::new();
        let _ = write!(
            output,
            "viewport={:?} wave_height={} padding={} progress={}/{} wave_to_top={}",
            self.viewport,
            self.amplitude,
            self.style.circle_padding,
            self.progress(),
            self.max_progress(),
            self.wave_to_top(),
        );
        if let Some(layout) = self.layout.layout() {
            let _ = write!(
                output,
                " wave_length={} omega={} left={} right={} bottom={} max_right={}",
                layout.wave_length, layout.omega, layout.left, layout.right, layout.bottom, layout.max_right
            );
        }
        let _ = write!(output, " phases={:?} wrap={}", self.clock.phases(), self.clock.wrap());
        output
    }
}
