//! Quiz Racer - a lane-racing reward mini-game with quiz interrupts
//!
//! Core modules:
//! - `sim`: Deterministic simulation (motion, collisions, quiz, boost, scoring)
//! - `game`: Session lifecycle and host completion contract
//! - `input`: Keyboard/pointer normalization into game commands
//! - `settings`: Data-driven game balance and difficulty presets

pub mod error;
pub mod game;
pub mod input;
pub mod settings;
pub mod sim;

pub use error::{BankError, ConfigError, GameError};
pub use game::{GameHost, Lifecycle, RaceGame};
pub use input::{Command, RawInput, TouchButton};
pub use settings::{Difficulty, Settings};

/// Game configuration constants (defaults for `Settings`)
pub mod consts {
    /// Fixed frame step used by the headless runner (~60 Hz)
    pub const SIM_DT_MS: u32 = 16;

    /// Track layout
    pub const LANE_COUNT: u8 = 3;
    pub const LANE_WIDTH: f32 = 120.0;

    /// Session length in seconds
    pub const SESSION_SECONDS: u32 = 60;
    /// Main countdown period
    pub const MAIN_TIMER_PERIOD_MS: u64 = 1000;

    /// Player speed
    pub const START_SPEED: f32 = 5.0;
    pub const MIN_SPEED: f32 = 2.0;
    pub const MAX_SPEED: f32 = 10.0;
    /// Speed change on a correct / wrong answer
    pub const ANSWER_SPEED_DELTA: f32 = 1.0;

    /// Per-tick scaling of distance and score from speed
    pub const DISTANCE_FACTOR: f32 = 0.1;
    pub const SCORE_FACTOR: f32 = 0.2;

    /// Obstacles
    pub const OBSTACLE_FACTOR: f32 = 1.0;
    pub const OBSTACLE_SPAWN_PROGRESS: f32 = 100.0;
    pub const OBSTACLE_MIN_VELOCITY: f32 = 0.6;
    pub const OBSTACLE_MAX_VELOCITY: f32 = 1.2;
    pub const SPAWN_INTERVAL_MS: u64 = 1500;
    pub const MAX_OBSTACLES: usize = 4;
    /// A lane is blocked for spawning while it holds an obstacle above this progress
    pub const SPAWN_CLEARANCE: f32 = 60.0;
    /// Obstacles below this progress have passed the player
    pub const DEPARTED_THRESHOLD: f32 = -10.0;

    /// Collision band around the player, half-open `[low, high)`
    pub const COLLISION_BAND_LOW: f32 = 15.0;
    pub const COLLISION_BAND_HIGH: f32 = 35.0;

    /// Quiz interrupts
    pub const MILESTONE_DISTANCE: f32 = 150.0;
    pub const QUESTION_SECONDS: u32 = 10;
    pub const QUESTION_COUNTDOWN_PERIOD_MS: u64 = 1000;
    pub const CORRECT_ANSWER_POINTS: u64 = 50;
    /// Consecutive wrong answers that end the session
    pub const MAX_WRONG_ANSWERS: u8 = 3;

    /// Boost
    pub const BOOST_MULTIPLIER: f32 = 2.0;
    pub const BOOST_DURATION_MS: u64 = 3000;

    /// Reward conversion
    pub const SCORE_DIVISOR: u64 = 10;
    pub const DISTANCE_DIVISOR: u64 = 20;
}
