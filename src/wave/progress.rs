use crate::error::ConfigError;

/// The default upper bound for stored progress.
pub const DEFAULT_MAX_PROGRESS: i32 = 1000;

/// The default stored progress: half full.
pub const DEFAULT_PROGRESS: i32 = DEFAULT_MAX_PROGRESS / 2;

/// Multiplier applied to host input before it is stored.
pub const PROGRESS_SCALE: i32 = 10;

/// Maps a progress value onto the vertical position of the fill line.
///
/// The fill line (`wave_to_top`) is measured in pixels from the top of the viewport and is kept
/// in sync with the progress, the max progress and the viewport height: any change to one of them
/// recomputes it immediately.
#[derive(Clone, Debug)]
pub struct ProgressMapper {
    progress: i32,
    max_progress: i32,
    height: u32,
    wave_to_top: f32,
}

impl ProgressMapper {
    /// Construct a mapper holding an already scaled `progress`.
    pub fn new(progress: i32, max_progress: i32) -> Result<Self, ConfigError> {
        validate_max_progress(max_progress)?;
        let mut mapper = Self { progress: 0, max_progress, height: 0, wave_to_top: 0.0 };
        mapper.restore(progress);
        Ok(mapper)
    }

    /// Set the progress using the host's native scale.
    ///
    /// The value is multiplied by [PROGRESS_SCALE] and capped at the max progress, so with the
    /// default bound `set_progress(50)` stores `500`.
    pub fn set_progress(&mut self, raw: i32) {
        self.progress = raw.saturating_mul(PROGRESS_SCALE).clamp(0, self.max_progress);
        self.recompute();
    }

    /// Set an already scaled progress, as produced by [ProgressMapper::progress].
    pub fn restore(&mut self, progress: i32) {
        self.progress = progress.clamp(0, self.max_progress);
        self.recompute();
    }

    pub fn progress(&self) -> i32 {
        self.progress
    }

    pub fn max_progress(&self) -> i32 {
        self.max_progress
    }

    /// Change the upper bound. Non positive values are rejected and leave the mapper untouched.
    pub fn set_max_progress(&mut self, max_progress: i32) -> Result<(), ConfigError> {
        validate_max_progress(max_progress)?;
        self.max_progress = max_progress;
        self.progress = self.progress.min(max_progress);
        self.recompute();
        Ok(())
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn set_height(&mut self, height: u32) {
        if self.height != height {
            self.height = height;
            self.recompute();
        }
    }

    /// The fill line, in whole pixels from the top.
    pub fn wave_to_top(&self) -> f32 {
        self.wave_to_top
    }

    fn recompute(&mut self) {
        let filled = self.progress as f32 / self.max_progress as f32;
        self.wave_to_top = (self.height as f32 * (1.0 - filled)).trunc();
    }
}

fn validate_max_progress(max_progress: i32) -> Result<(), ConfigError> {
    if max_progress <= 0 {
        log::warn!("rejecting max progress {max_progress}");
        return Err(ConfigError::InvalidMaxProgress(max_progress));
    }
    Ok(())
}
