//! Session state and core simulation types
//!
//! `GameSession` is the single source of truth for one play-through. Only
//! `Simulation` mutates it; everything else reads snapshots.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::boost::BoostState;
use super::lane::{Lane, LaneLayout};
use super::motion::ObstacleField;
use super::quiz::{OpenQuestion, QuestionBank};
use crate::settings::Settings;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Driving: motion, spawning and the session timer are live
    Playing,
    /// A question is on screen; only its countdown runs
    QuestionOpen,
    /// Run ended
    Finished,
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FinishReason {
    TimeExpired,
    Collision,
    ThreeWrongAnswers,
}

/// Something observable that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    LaneChanged { lane: Lane },
    ObstacleSpawned { id: u32, lane: Lane },
    ObstacleDeparted { id: u32 },
    BoostStarted,
    BoostEnded,
    TimeTick { seconds_left: u32 },
    QuestionOpened { index: usize },
    QuestionCountdown { seconds_left: u32 },
    QuestionAnswered {
        correct: bool,
        selected: Option<usize>,
        wrong_streak: u8,
    },
    Finished {
        reason: FinishReason,
        score: u64,
        coins: u64,
    },
}

/// Complete session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    /// Run seed for reproducibility
    pub seed: u64,
    pub phase: GamePhase,
    /// Set exactly when `phase == Finished`
    pub finish_reason: Option<FinishReason>,
    pub distance: f32,
    pub score: u64,
    /// Base speed, always within `[min_speed, max_speed]`
    pub speed: f32,
    pub time_remaining: u32,
    pub consecutive_wrong_answers: u8,
    pub player_lane: Lane,
    pub boost: BoostState,
    pub question: Option<OpenQuestion>,
    /// Reward computed on the transition into `Finished`
    pub coins: Option<u64>,
    /// Simulation tick counter (ticks that ran motion)
    pub time_ticks: u64,
    pub questions_asked: u32,
    pub correct_answers: u32,
}

impl GameSession {
    pub fn new(settings: &Settings, seed: u64) -> Self {
        Self {
            seed,
            phase: GamePhase::Playing,
            finish_reason: None,
            distance: 0.0,
            score: 0,
            speed: settings.start_speed,
            time_remaining: settings.session_seconds,
            consecutive_wrong_answers: 0,
            player_lane: Lane(settings.clamped_start_lane()),
            boost: BoostState::default(),
            question: None,
            coins: None,
            time_ticks: 0,
            questions_asked: 0,
            correct_answers: 0,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.phase == GamePhase::Finished
    }

    /// Speed used for motion, boost included
    pub fn effective_speed(&self, settings: &Settings) -> f32 {
        self.boost
            .effective_speed(self.speed, settings.boost_multiplier)
    }
}

/// Obstacle as the host needs to draw it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleView {
    pub id: u32,
    pub lane: Lane,
    pub progress: f32,
    pub position: Vec2,
}

/// Open question as the host needs to present it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionView {
    pub index: usize,
    pub prompt: String,
    pub options: Vec<String>,
    pub topic: String,
    pub seconds_left: u32,
}

/// Immutable per-tick view of the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub phase: GamePhase,
    pub finish_reason: Option<FinishReason>,
    pub distance: f32,
    pub score: u64,
    pub speed: f32,
    pub effective_speed: f32,
    pub time_remaining: u32,
    pub consecutive_wrong_answers: u8,
    pub player_lane: Lane,
    pub player_position: Vec2,
    pub boost_active: bool,
    pub obstacles: Vec<ObstacleView>,
    pub question: Option<QuestionView>,
    pub coins: Option<u64>,
    /// Events emitted since the previous snapshot
    pub events: Vec<GameEvent>,
}

impl SessionSnapshot {
    pub fn capture(
        session: &GameSession,
        field: &ObstacleField,
        bank: &QuestionBank,
        layout: &LaneLayout,
        settings: &Settings,
        events: Vec<GameEvent>,
    ) -> Self {
        let obstacles = field
            .obstacles()
            .iter()
            .map(|o| ObstacleView {
                id: o.id,
                lane: o.lane,
                progress: o.progress,
                position: layout.world_position(o.lane, o.progress),
            })
            .collect();

        let question = session.question.as_ref().and_then(|open| {
            bank.get(open.index).map(|q| QuestionView {
                index: open.index,
                prompt: q.prompt.clone(),
                options: q.options.clone(),
                topic: q.topic.clone(),
                seconds_left: open.seconds_left,
            })
        });

        let player_progress =
            (settings.collision_band_low + settings.collision_band_high) / 2.0;

        Self {
            phase: session.phase,
            finish_reason: session.finish_reason,
            distance: session.distance,
            score: session.score,
            speed: session.speed,
            effective_speed: session.effective_speed(settings),
            time_remaining: session.time_remaining,
            consecutive_wrong_answers: session.consecutive_wrong_answers,
            player_lane: session.player_lane,
            player_position: layout.world_position(session.player_lane, player_progress),
            boost_active: session.boost.is_active(),
            obstacles,
            question,
            coins: session.coins,
            events,
        }
    }
}
