use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// The default phase increment applied on every tick, in radians.
pub const DEFAULT_PHASE_STEP: f32 = 0.05;

/// The initial phase of the lower wave: a sixth of a turn behind the upper one.
pub const BELOW_INITIAL_PHASE: f32 = TAU / 6.0;

/// The point past which [PhaseWrap::Reset] sends a phase back to its initial value.
///
/// This rounds to `f32::MAX`. A phase growing by a small step stops changing long before it gets
/// here (around `1e6` for the default step), so with this threshold the reset never fires and the
/// wave eventually freezes. Use [PhaseWrap::Modulo] or [PhaseClock::with_reset_threshold] to avoid
/// that.
pub const LEGACY_RESET_THRESHOLD: f32 = f32::MAX - 100.0;

/// How phase accumulators are kept bounded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PhaseWrap {
    /// Wrap every phase into `[0, 2π)`.
    #[default]
    Modulo,

    /// Let phases grow and send them back to their initial value once they'd cross the reset
    /// threshold.
    Reset,
}

/// One wave layer's phase accumulator.
#[derive(Clone, Debug, PartialEq)]
pub struct PhaseLayer {
    initial: f32,
    phase: f32,
    step: f32,
}

impl PhaseLayer {
    pub fn new(initial: f32, step: f32) -> Self {
        Self { initial, phase: initial, step }
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn initial(&self) -> f32 {
        self.initial
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    fn advance(&mut self, wrap: PhaseWrap, reset_threshold: f32) {
        self.phase = match wrap {
            PhaseWrap::Modulo => (self.phase + self.step).rem_euclid(TAU),
            PhaseWrap::Reset => {
                let next = self.phase + self.step;
                if next >= reset_threshold { self.initial } else { next }
            }
        };
    }
}

/// Owns the phase of every wave layer and advances them once per tick.
///
/// Layers are ordered back to front: index 0 is the upper ("above") wave, index 1 the lower
/// ("below") one. Each layer goes back to its own initial phase on reset so two layers started
/// apart never line up again.
#[derive(Clone, Debug)]
pub struct PhaseClock {
    layers: Vec<PhaseLayer>,
    wrap: PhaseWrap,
    reset_threshold: f32,
}

impl PhaseClock {
    pub fn new(layers: Vec<PhaseLayer>, wrap: PhaseWrap) -> Self {
        Self { layers, wrap, reset_threshold: LEGACY_RESET_THRESHOLD }
    }

    /// The standard above/below pair, both moving by `step` per tick.
    pub fn two_layer(step: f32, wrap: PhaseWrap) -> Self {
        Self::new(vec![PhaseLayer::new(0.0, step), PhaseLayer::new(BELOW_INITIAL_PHASE, step)], wrap)
    }

    /// Override the point at which [PhaseWrap::Reset] kicks in.
    pub fn with_reset_threshold(mut self, threshold: f32) -> Self {
        self.reset_threshold = threshold;
        self
    }

    /// Move every layer forward by its step.
    pub fn advance(&mut self) {
        for layer in &mut self.layers {
            layer.advance(self.wrap, self.reset_threshold);
        }
    }

    /// Change the step used by every layer.
    pub fn set_step(&mut self, step: f32) -> Result<(), ConfigError> {
        validate_phase_step(step)?;
        for layer in &mut self.layers {
            layer.step = step;
        }
        Ok(())
    }

    pub fn layers(&self) -> &[PhaseLayer] {
        &self.layers
    }

    /// The current phase of every layer, in layer order.
    pub fn phases(&self) -> Vec<f32> {
        self.layers.iter().map(PhaseLayer::phase).collect()
    }

    pub fn wrap(&self) -> PhaseWrap {
        self.wrap
    }

    /// The exclusive upper bound a phase can hold.
    pub fn bound(&self) -> f32 {
        match self.wrap {
            PhaseWrap::Modulo => TAU,
            PhaseWrap::Reset => self.reset_threshold,
        }
    }
}

/// Steps must move the phase forward: zero freezes the waves and negative or non finite values
/// escape the phase bounds.
pub fn validate_phase_step(step: f32) -> Result<(), ConfigError> {
    if !(step.is_finite() && step > 0.0) {
        log::warn!("rejecting phase step {step}");
        return Err(ConfigError::InvalidPhaseStep(step));
    }
    Ok(())
}

impl Default for PhaseClock {
    fn default() -> Self {
        Self::two_layer(DEFAULT_PHASE_STEP, PhaseWrap::default())
    }
}
