use crate::error::ConfigError;
use crate::wave::layout::{DEFAULT_SAMPLE_SPACING, DEFAULT_WAVE_MULTIPLE};
use crate::wave::phase::{validate_phase_step, PhaseWrap, DEFAULT_PHASE_STEP};
use crate::wave::progress::{DEFAULT_MAX_PROGRESS, DEFAULT_PROGRESS};
use crate::wave::style::Color;
use serde::Deserialize;
use std::{fs, path::Path, time::Duration};

/// The default amplitude of both waves.
pub const DEFAULT_WAVE_HEIGHT: i32 = 20;

/// The default target delay between two ticks.
pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 25;

/// Everything needed to construct a wave renderer.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct WaveConfig {
    /// The fill color of the upper wave.
    pub above_wave_color: Color,

    /// The fill color of the lower wave.
    #[serde(alias = "blow_wave_color")]
    pub below_wave_color: Color,

    /// The initial progress, already in stored units (`0..=max_progress`).
    pub progress: i32,

    /// How far inside the viewport edge the circular clip sits.
    pub circle_padding: f32,

    /// The progress value that means "full".
    pub max_progress: i32,

    /// The wave amplitude.
    pub wave_height: i32,

    /// The wave length as a multiple of the viewport width.
    pub wave_multiple: f32,

    /// How much the phase moves on every tick, in radians.
    pub phase_step: f32,

    /// The horizontal distance between wave samples.
    pub sample_spacing: f32,

    /// The target delay between ticks, in milliseconds.
    pub refresh_interval_ms: u64,

    /// How phases are kept from growing unbounded.
    pub phase_wrap: PhaseWrap,
}

impl WaveConfig {
    /// Parse a YAML document. Missing fields take their default value.
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Reject values that would make the renderer misbehave later on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_progress <= 0 {
            return Err(ConfigError::InvalidMaxProgress(self.max_progress));
        }
        if self.refresh_interval_ms == 0 {
            return Err(ConfigError::InvalidRefreshInterval);
        }
        if !(self.sample_spacing.is_finite() && self.sample_spacing > 0.0) {
            return Err(ConfigError::InvalidSampleSpacing(self.sample_spacing));
        }
        if !(self.wave_multiple.is_finite() && self.wave_multiple > 0.0) {
            return Err(ConfigError::InvalidWaveMultiple(self.wave_multiple));
        }
        validate_phase_step(self.phase_step)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            above_wave_color: Color::WHITE,
            below_wave_color: Color::WHITE,
            progress: DEFAULT_PROGRESS,
            circle_padding: 0.0,
            max_progress: DEFAULT_MAX_PROGRESS,
            wave_height: DEFAULT_WAVE_HEIGHT,
            wave_multiple: DEFAULT_WAVE_MULTIPLE,
            phase_step: DEFAULT_PHASE_STEP,
            sample_spacing: DEFAULT_SAMPLE_SPACING,
            refresh_interval_ms: DEFAULT_REFRESH_INTERVAL_MS,
            phase_wrap: PhaseWrap::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;

    #[test]
    fn empty_document_uses_defaults() {
        let config = WaveConfig::from_yaml_str("{}").expect("parse failed");
        assert_eq!(config, WaveConfig::default());
        assert_eq!(config.progress, 500);
        assert_eq!(config.max_progress, 1000);
        assert_eq!(config.refresh_interval(), Duration::from_millis(25));
    }

    #[test]
    fn parse_full() {
        let input = r##"
above_wave_color: "#3399ff"
blow_wave_color: "#1166cc"
progress: 250
circle_padding: 4.5
max_progress: 500
wave_height: 12
phase_wrap: reset
refresh_interval_ms: 40
"##;
        let config = WaveConfig::from_yaml_str(input).expect("parse failed");
        assert_eq!(config.above_wave_color, Color::new(0x33, 0x99, 0xff));
        assert_eq!(config.below_wave_color, Color::new(0x11, 0x66, 0xcc));
        assert_eq!(config.progress, 250);
        assert_eq!(config.circle_padding, 4.5);
        assert_eq!(config.max_progress, 500);
        assert_eq!(config.wave_height, 12);
        assert_eq!(config.phase_wrap, PhaseWrap::Reset);
        assert_eq!(config.refresh_interval_ms, 40);
    }

    #[rstest]
    #[case::zero_max("max_progress: 0")]
    #[case::negative_max("max_progress: -3")]
    #[case::zero_interval("refresh_interval_ms: 0")]
    #[case::zero_spacing("sample_spacing: 0.0")]
    #[case::negative_multiple("wave_multiple: -1.0")]
    #[case::zero_step("phase_step: 0.0")]
    #[case::negative_step("{phase_step: -0.05, phase_wrap: reset}")]
    #[case::nan_step("phase_step: .nan")]
    #[case::bad_color("above_wave_color: blue")]
    #[case::unknown_field("wave_speed: 3")]
    fn invalid(#[case] input: &str) {
        assert!(WaveConfig::from_yaml_str(input).is_err());
    }

    #[test]
    fn max_progress_error_kind() {
        let result = WaveConfig::from_yaml_str("max_progress: 0");
        assert!(matches!(result, Err(ConfigError::InvalidMaxProgress(0))));
    }

    #[test]
    fn phase_step_error_kind() {
        let result = WaveConfig::from_yaml_str("phase_step: -0.05");
        assert!(matches!(result, Err(ConfigError::InvalidPhaseStep(step)) if step == -0.05));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "wave_height: 33").expect("write failed");
        let config = WaveConfig::load(file.path()).expect("load failed");
        assert_eq!(config.wave_height, 33);
    }

    #[test]
    fn missing_file() {
        let result = WaveConfig::load(Path::new("/definitely/not/here.yaml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
