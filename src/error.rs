//! Construction-time error types.
//!
//! Running sessions never fail: invalid transitions are ignored and bad answers
//! count as wrong. Only building a game from settings and a question bank can
//! produce an error.

/// Top-level error returned when a game cannot be constructed.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("Invalid settings: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid question bank: {0}")]
    Bank(#[from] BankError),
}

/// A `Settings` value that violates one of its bounds.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("lane count must be at least 1")]
    NoLanes,

    #[error("speed range is invalid: min {min}, start {start}, max {max}")]
    SpeedRange { min: f32, start: f32, max: f32 },

    #[error("collision band [{low}, {high}) is empty")]
    CollisionBand { low: f32, high: f32 },

    #[error("departed threshold {departed} must lie below the collision band ({low})")]
    DepartedThreshold { departed: f32, low: f32 },

    #[error("obstacle velocity range is invalid: {min}..={max}")]
    ObstacleVelocity { min: f32, max: f32 },

    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),

    #[error("{0} must not be negative")]
    Negative(&'static str),

    #[error("boost multiplier {0} must be at least 1")]
    BoostMultiplier(f32),
}

/// A malformed question in the bank.
#[derive(thiserror::Error, Debug)]
pub enum BankError {
    #[error("question {index} has {count} options, at least 2 are required")]
    TooFewOptions { index: usize, count: usize },

    #[error("question {index} marks option {correct} correct but only has {count} options")]
    CorrectIndexOutOfRange {
        index: usize,
        correct: usize,
        count: usize,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
