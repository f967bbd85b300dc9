//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Virtual clock only (timers advance with `tick`, never wall time)
//! - Seeded RNG only
//! - Stable iteration order (obstacles by ID, due timers by time then key)
//! - No rendering or platform dependencies

pub mod boost;
pub mod lane;
pub mod motion;
pub mod quiz;
pub mod scheduler;
pub mod score;
pub mod spawner;
pub mod state;
pub mod tick;

pub use boost::BoostState;
pub use lane::{Lane, LaneLayout};
pub use motion::{CollisionBand, Obstacle, ObstacleField, PlayerStep, player_step};
pub use quiz::{Milestones, OpenQuestion, Question, QuestionBank, Resolution, resolve};
pub use scheduler::{Scheduler, TimerFire, TimerId, TimerKey};
pub use score::RewardRates;
pub use spawner::{SpawnPlan, Spawner};
pub use state::{
    FinishReason, GameEvent, GamePhase, GameSession, ObstacleView, QuestionView, SessionSnapshot,
};
pub use tick::{Simulation, TickInput};
