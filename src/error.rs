use std::io;

/// Errors produced while building or validating a wave configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("max progress must be greater than zero, got {0}")]
    InvalidMaxProgress(i32),

    #[error("refresh interval must be at least 1ms")]
    InvalidRefreshInterval,

    #[error("sample spacing must be a positive number, got {0}")]
    InvalidSampleSpacing(f32),

    #[error("wave multiple must be a positive number, got {0}")]
    InvalidWaveMultiple(f32),

    #[error("phase step must be a positive number, got {0}")]
    InvalidPhaseStep(f32),

    #[error("invalid color '{0}': expected #rrggbb")]
    InvalidColor(String),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("failed to read config: {0}")]
    Io(#[from] io::Error),
}

/// Errors surfaced by the renderer and its scheduler.
#[derive(thiserror::Error, Debug)]
pub enum WaveError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to spawn animation thread: {0}")]
    SchedulerSpawn(io::Error),

    #[error("state file error: {0}")]
    State(#[from] StateError),
}

/// Errors reading or writing the persisted progress.
#[derive(thiserror::Error, Debug)]
pub enum StateError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("malformed state: {0}")]
    Malformed(#[from] serde_json::Error),
}
