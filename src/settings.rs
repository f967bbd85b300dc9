//! Game balance settings and difficulty presets
//!
//! Every tunable number the simulation uses lives here, so the host can ship
//! balance changes as JSON without touching the engine.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Difficulty preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "medium" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Milliseconds between spawn attempts
    pub fn spawn_interval_ms(&self) -> u64 {
        match self {
            Difficulty::Easy => 2000,
            Difficulty::Normal => SPAWN_INTERVAL_MS,
            Difficulty::Hard => 1000,
        }
    }

    /// Seconds allowed to answer a question
    pub fn question_seconds(&self) -> u32 {
        match self {
            Difficulty::Easy => 15,
            Difficulty::Normal => QUESTION_SECONDS,
            Difficulty::Hard => 6,
        }
    }

    /// Obstacle velocity range
    pub fn obstacle_velocity(&self) -> (f32, f32) {
        match self {
            Difficulty::Easy => (0.5, 0.9),
            Difficulty::Normal => (OBSTACLE_MIN_VELOCITY, OBSTACLE_MAX_VELOCITY),
            Difficulty::Hard => (0.9, 1.6),
        }
    }
}

/// Game balance settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Preset the settings were derived from
    pub difficulty: Difficulty,

    // === Track ===
    pub lane_count: u8,
    /// World width of one lane
    pub lane_width: f32,
    /// Lane the player starts in (clamped to the track)
    pub start_lane: u8,

    // === Session ===
    pub session_seconds: u32,
    pub main_timer_period_ms: u64,

    // === Speed ===
    pub start_speed: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    pub answer_speed_delta: f32,
    /// Distance gained per tick is `speed * distance_factor`
    pub distance_factor: f32,
    /// Score gained per tick is `floor(speed * score_factor)`
    pub score_factor: f32,

    // === Obstacles ===
    pub obstacle_factor: f32,
    pub obstacle_spawn_progress: f32,
    pub obstacle_min_velocity: f32,
    pub obstacle_max_velocity: f32,
    pub spawn_interval_ms: u64,
    pub max_obstacles: usize,
    pub spawn_clearance: f32,
    pub departed_threshold: f32,
    pub collision_band_low: f32,
    pub collision_band_high: f32,

    // === Quiz ===
    pub milestone_distance: f32,
    pub question_seconds: u32,
    pub question_countdown_period_ms: u64,
    pub correct_answer_points: u64,

    // === Boost ===
    pub boost_multiplier: f32,
    pub boost_duration_ms: u64,

    // === Rewards ===
    pub score_divisor: u64,
    pub distance_divisor: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,

            lane_count: LANE_COUNT,
            lane_width: LANE_WIDTH,
            start_lane: LANE_COUNT / 2,

            session_seconds: SESSION_SECONDS,
            main_timer_period_ms: MAIN_TIMER_PERIOD_MS,

            start_speed: START_SPEED,
            min_speed: MIN_SPEED,
            max_speed: MAX_SPEED,
            answer_speed_delta: ANSWER_SPEED_DELTA,
            distance_factor: DISTANCE_FACTOR,
            score_factor: SCORE_FACTOR,

            obstacle_factor: OBSTACLE_FACTOR,
            obstacle_spawn_progress: OBSTACLE_SPAWN_PROGRESS,
            obstacle_min_velocity: OBSTACLE_MIN_VELOCITY,
            obstacle_max_velocity: OBSTACLE_MAX_VELOCITY,
            spawn_interval_ms: SPAWN_INTERVAL_MS,
            max_obstacles: MAX_OBSTACLES,
            spawn_clearance: SPAWN_CLEARANCE,
            departed_threshold: DEPARTED_THRESHOLD,
            collision_band_low: COLLISION_BAND_LOW,
            collision_band_high: COLLISION_BAND_HIGH,

            milestone_distance: MILESTONE_DISTANCE,
            question_seconds: QUESTION_SECONDS,
            question_countdown_period_ms: QUESTION_COUNTDOWN_PERIOD_MS,
            correct_answer_points: CORRECT_ANSWER_POINTS,

            boost_multiplier: BOOST_MULTIPLIER,
            boost_duration_ms: BOOST_DURATION_MS,

            score_divisor: SCORE_DIVISOR,
            distance_divisor: DISTANCE_DIVISOR,
        }
    }
}

impl Settings {
    /// Create settings from a difficulty preset (applies preset defaults)
    pub fn from_preset(preset: Difficulty) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a difficulty preset (updates difficulty-dependent settings)
    pub fn apply_preset(&mut self, preset: Difficulty) {
        self.difficulty = preset;
        self.spawn_interval_ms = preset.spawn_interval_ms();
        self.question_seconds = preset.question_seconds();
        let (min_vel, max_vel) = preset.obstacle_velocity();
        self.obstacle_min_velocity = min_vel;
        self.obstacle_max_velocity = max_vel;
    }

    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Lane the player starts in, clamped to the track
    pub fn clamped_start_lane(&self) -> u8 {
        self.start_lane.min(self.lane_count.saturating_sub(1))
    }

    /// Check every bound the simulation relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lane_count == 0 {
            return Err(ConfigError::NoLanes);
        }
        if !(self.min_speed > 0.0
            && self.min_speed <= self.start_speed
            && self.start_speed <= self.max_speed)
        {
            return Err(ConfigError::SpeedRange {
                min: self.min_speed,
                start: self.start_speed,
                max: self.max_speed,
            });
        }
        if !(self.collision_band_low < self.collision_band_high) {
            return Err(ConfigError::CollisionBand {
                low: self.collision_band_low,
                high: self.collision_band_high,
            });
        }
        if !(self.departed_threshold < self.collision_band_low) {
            return Err(ConfigError::DepartedThreshold {
                departed: self.departed_threshold,
                low: self.collision_band_low,
            });
        }
        if !(self.obstacle_min_velocity > 0.0
            && self.obstacle_min_velocity <= self.obstacle_max_velocity)
        {
            return Err(ConfigError::ObstacleVelocity {
                min: self.obstacle_min_velocity,
                max: self.obstacle_max_velocity,
            });
        }
        if self.boost_multiplier < 1.0 {
            return Err(ConfigError::BoostMultiplier(self.boost_multiplier));
        }

        let positive = [
            ("obstacle_factor", self.obstacle_factor > 0.0),
            ("score_divisor", self.score_divisor > 0),
            ("distance_divisor", self.distance_divisor > 0),
            ("milestone_distance", self.milestone_distance > 0.0),
            ("main_timer_period_ms", self.main_timer_period_ms > 0),
            (
                "question_countdown_period_ms",
                self.question_countdown_period_ms > 0,
            ),
            ("question_seconds", self.question_seconds > 0),
            ("boost_duration_ms", self.boost_duration_ms > 0),
        ];
        if let Some((name, _)) = positive.into_iter().find(|&(_, ok)| !ok) {
            return Err(ConfigError::NotPositive(name));
        }

        let non_negative = [
            ("distance_factor", self.distance_factor),
            ("score_factor", self.score_factor),
            ("answer_speed_delta", self.answer_speed_delta),
        ];
        if let Some((name, _)) = non_negative.into_iter().find(|&(_, v)| !(v >= 0.0)) {
            return Err(ConfigError::Negative(name));
        }

        Ok(())
    }
}
