//! Session reducer
//!
//! `Simulation` owns the `GameSession` and is the only thing that mutates it.
//! The other sim modules compute deltas (player step, spawn plans, answer
//! resolutions); this module applies them in a fixed order each tick:
//!
//! 1. apply input commands
//! 2. advance the clock and handle due timers, earliest first
//! 3. if still `Playing`: motion, departures, collision, spawning, milestones

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::lane::{Lane, LaneLayout};
use super::motion::{CollisionBand, ObstacleField, player_step};
use super::quiz::{Milestones, OpenQuestion, QuestionBank, resolve};
use super::scheduler::{Scheduler, TimerFire, TimerId, TimerKey};
use super::score::RewardRates;
use super::spawner::Spawner;
use super::state::{FinishReason, GameEvent, GamePhase, GameSession, SessionSnapshot};
use crate::error::ConfigError;
use crate::input::Command;
use crate::settings::Settings;

/// Extra distance past the collision band the autopilot looks ahead
const AUTOPILOT_LOOKAHEAD: f32 = 30.0;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Commands in arrival order
    pub commands: Vec<Command>,
    /// Idle/demo mode - steer around obstacles automatically
    pub autopilot: bool,
}

impl TickInput {
    pub fn with_commands(commands: impl IntoIterator<Item = Command>) -> Self {
        Self {
            commands: commands.into_iter().collect(),
            autopilot: false,
        }
    }
}

/// Deterministic race simulation for one session
#[derive(Debug, Clone)]
pub struct Simulation {
    settings: Settings,
    layout: LaneLayout,
    band: CollisionBand,
    rates: RewardRates,
    bank: QuestionBank,
    session: GameSession,
    field: ObstacleField,
    spawner: Spawner,
    milestones: Milestones,
    scheduler: Scheduler,
    rng: Pcg32,
    started: bool,
    /// Events not yet handed out in a snapshot
    events: Vec<GameEvent>,
}

impl Simulation {
    pub fn new(settings: Settings, bank: QuestionBank, seed: u64) -> Result<Self, ConfigError> {
        settings.validate()?;
        if bank.is_empty() {
            log::warn!("Question bank is empty; milestones will not open questions");
        }

        Ok(Self {
            layout: LaneLayout::new(settings.lane_count, settings.lane_width),
            band: CollisionBand::from_settings(&settings),
            rates: RewardRates::from_settings(&settings),
            session: GameSession::new(&settings, seed),
            field: ObstacleField::new(),
            spawner: Spawner::new(&settings),
            milestones: Milestones::new(settings.milestone_distance),
            scheduler: Scheduler::new(),
            rng: Pcg32::seed_from_u64(seed),
            started: false,
            events: Vec::new(),
            bank,
            settings,
        })
    }

    /// Reset all sub-state and start the clock. Only the first call does anything.
    pub fn start(&mut self) -> bool {
        if self.started {
            log::warn!("Session already started; ignoring start()");
            return false;
        }

        let seed = self.session.seed;
        self.session = GameSession::new(&self.settings, seed);
        self.field = ObstacleField::new();
        self.spawner = Spawner::new(&self.settings);
        self.milestones = Milestones::new(self.settings.milestone_distance);
        self.rng = Pcg32::seed_from_u64(seed);
        self.events.clear();

        self.scheduler = Scheduler::new();
        self.scheduler.start();
        self.scheduler
            .schedule_repeating(TimerKey::Main, self.settings.main_timer_period_ms);
        self.started = true;

        log::info!(
            "Session started (seed {}, {}s, {} lanes)",
            seed,
            self.session.time_remaining,
            self.layout.count
        );
        true
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Started, not finished, not shut down
    pub fn is_live(&self) -> bool {
        self.started && self.scheduler.is_running()
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn field(&self) -> &ObstacleField {
        &self.field
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn layout(&self) -> &LaneLayout {
        &self.layout
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Apply one logical command. Ignored unless `Playing`.
    pub fn command(&mut self, command: Command) {
        if !self.is_live() || self.session.phase != GamePhase::Playing {
            log::debug!("Ignoring {:?} in {:?}", command, self.session.phase);
            return;
        }

        match command {
            Command::MoveLeft | Command::MoveRight => {
                let lane = self.session.player_lane;
                let target = if command == Command::MoveLeft {
                    self.layout.left_of(lane)
                } else {
                    self.layout.right_of(lane)
                };
                if target != lane {
                    self.session.player_lane = target;
                    self.events.push(GameEvent::LaneChanged { lane: target });
                }
            }
            Command::ActivateBoost => self.activate_boost(),
        }
    }

    /// Advance the game state by one tick of `dt_ms` milliseconds
    pub fn tick(&mut self, input: &TickInput, dt_ms: u32) -> SessionSnapshot {
        if !self.is_live() {
            return self.take_snapshot();
        }

        for &command in &input.commands {
            self.command(command);
        }
        if input.autopilot {
            if let Some(command) = self.autopilot_command() {
                self.command(command);
            }
        }

        let dt_ms = u64::from(dt_ms);
        self.scheduler.advance(dt_ms);
        while let Some(fire) = self.scheduler.pop_due() {
            self.on_timer(fire);
        }

        if self.session.phase == GamePhase::Playing {
            self.step_motion(dt_ms);
        }

        self.take_snapshot()
    }

    /// Answer the open question; `None` is a timeout. Returns whether it was accepted.
    pub fn answer_question(&mut self, selected: Option<usize>) -> bool {
        if !self.is_live() || self.session.phase != GamePhase::QuestionOpen {
            log::debug!("Ignoring answer {:?} in {:?}", selected, self.session.phase);
            return false;
        }
        self.resolve_question(selected);
        true
    }

    /// Cancel every timer and stop the clock. Safe to call repeatedly.
    pub fn shutdown(&mut self) {
        if self.scheduler.pending() > 0 {
            log::debug!("Cancelling {} timer(s)", self.scheduler.pending());
        }
        self.scheduler.stop();
    }

    /// Snapshot including pending events, leaving them pending
    pub fn snapshot(&self) -> SessionSnapshot {
        self.capture(self.events.clone())
    }

    /// Snapshot that hands out (and clears) pending events
    pub fn take_snapshot(&mut self) -> SessionSnapshot {
        let events = std::mem::take(&mut self.events);
        self.capture(events)
    }

    fn capture(&self, events: Vec<GameEvent>) -> SessionSnapshot {
        SessionSnapshot::capture(
            &self.session,
            &self.field,
            &self.bank,
            &self.layout,
            &self.settings,
            events,
        )
    }

    fn on_timer(&mut self, fire: TimerFire) {
        match fire.key {
            TimerKey::Main => {
                if self.session.phase != GamePhase::Playing {
                    return;
                }
                self.session.time_remaining = self.session.time_remaining.saturating_sub(1);
                self.events.push(GameEvent::TimeTick {
                    seconds_left: self.session.time_remaining,
                });
                if self.session.time_remaining == 0 {
                    self.finish(FinishReason::TimeExpired);
                }
            }
            TimerKey::Question => self.on_question_countdown(fire.id),
            TimerKey::Boost => {
                if self.session.boost.expire(fire.id) {
                    log::debug!("Boost ended");
                    self.events.push(GameEvent::BoostEnded);
                }
            }
        }
    }

    fn on_question_countdown(&mut self, timer: TimerId) {
        if self.session.phase != GamePhase::QuestionOpen {
            return;
        }
        let Some(open) = self.session.question.as_mut() else {
            return;
        };
        if open.timer != Some(timer) {
            return;
        }

        open.seconds_left = open.seconds_left.saturating_sub(1);
        let seconds_left = open.seconds_left;
        self.events
            .push(GameEvent::QuestionCountdown { seconds_left });
        if seconds_left == 0 {
            log::debug!("Question timed out");
            self.resolve_question(None);
        }
    }

    fn step_motion(&mut self, dt_ms: u64) {
        self.session.time_ticks += 1;

        let step = player_step(self.session.effective_speed(&self.settings), &self.settings);
        self.session.distance += step.distance;
        self.session.score += step.score;

        self.field.advance(self.settings.obstacle_factor);
        for id in self.field.remove_departed(self.settings.departed_threshold) {
            self.events.push(GameEvent::ObstacleDeparted { id });
        }

        let hit = self
            .field
            .first_collision(self.session.player_lane, self.band)
            .map(|o| (o.id, o.lane, o.progress));
        if let Some((id, lane, progress)) = hit {
            log::debug!(
                "Collision with obstacle {} in lane {} at progress {:.1}",
                id,
                lane.0,
                progress
            );
            self.finish(FinishReason::Collision);
            return;
        }

        if let Some(plan) = self.spawner.poll(
            dt_ms,
            &self.field,
            &self.layout,
            &mut self.rng,
            &self.settings,
        ) {
            let id = self.field.spawn(plan.lane, plan.progress, plan.velocity);
            log::debug!(
                "Spawned obstacle {} in lane {} (velocity {:.2})",
                id,
                plan.lane.0,
                plan.velocity
            );
            self.events.push(GameEvent::ObstacleSpawned {
                id,
                lane: plan.lane,
            });
        }

        if self.milestones.crossed(self.session.distance) {
            self.open_question();
        }
    }

    fn open_question(&mut self) {
        let Some(index) = self.bank.pick(&mut self.rng) else {
            return;
        };

        self.scheduler.suspend(TimerKey::Main);
        self.scheduler.suspend(TimerKey::Boost);
        let timer = self.scheduler.schedule_repeating(
            TimerKey::Question,
            self.settings.question_countdown_period_ms,
        );

        self.session.question = Some(OpenQuestion {
            index,
            seconds_left: self.settings.question_seconds,
            timer: Some(timer),
        });
        self.session.phase = GamePhase::QuestionOpen;
        self.session.questions_asked += 1;
        self.events.push(GameEvent::QuestionOpened { index });
        log::debug!(
            "Question {} opened at distance {:.1}",
            index,
            self.session.distance
        );
    }

    fn resolve_question(&mut self, selected: Option<usize>) {
        let Some(open) = self.session.question.take() else {
            return;
        };
        self.scheduler.cancel(TimerKey::Question);

        let Some(question) = self.bank.get(open.index) else {
            self.resume_play();
            return;
        };
        let resolution = resolve(
            question,
            selected,
            self.session.speed,
            self.session.consecutive_wrong_answers,
            &self.settings,
        );

        self.session.speed = resolution.speed;
        self.session.score += resolution.points;
        self.session.consecutive_wrong_answers = resolution.wrong_streak;
        if resolution.correct {
            self.session.correct_answers += 1;
        }
        self.events.push(GameEvent::QuestionAnswered {
            correct: resolution.correct,
            selected,
            wrong_streak: resolution.wrong_streak,
        });
        log::debug!(
            "Question answered {} (streak {}, speed {:.1})",
            if resolution.correct { "correctly" } else { "wrongly" },
            resolution.wrong_streak,
            resolution.speed
        );

        if resolution.finishes {
            self.finish(FinishReason::ThreeWrongAnswers);
            return;
        }

        self.resume_play();
        if resolution.correct {
            self.activate_boost();
        }
    }

    fn resume_play(&mut self) {
        self.session.phase = GamePhase::Playing;
        self.scheduler.resume(TimerKey::Main);
        self.scheduler.resume(TimerKey::Boost);
    }

    fn activate_boost(&mut self) {
        if !self.session.boost.activate() {
            return;
        }
        let timer = self
            .scheduler
            .schedule_once(TimerKey::Boost, self.settings.boost_duration_ms);
        self.session.boost.arm(timer);
        self.events.push(GameEvent::BoostStarted);
        log::debug!("Boost started");
    }

    fn finish(&mut self, reason: FinishReason) {
        if self.session.phase == GamePhase::Finished {
            return;
        }

        self.scheduler.stop();
        self.session.boost.reset();
        self.session.question = None;
        self.session.phase = GamePhase::Finished;
        self.session.finish_reason = Some(reason);

        let coins = self.rates.coins(self.session.score, self.session.distance);
        self.session.coins = Some(coins);
        self.events.push(GameEvent::Finished {
            reason,
            score: self.session.score,
            coins,
        });
        log::info!(
            "Session finished: {:?} (score {}, distance {:.0}, coins {})",
            reason,
            self.session.score,
            self.session.distance,
            coins
        );
    }

    /// Dodge into a free neighbouring lane when the current one is threatened
    fn autopilot_command(&self) -> Option<Command> {
        if self.session.phase != GamePhase::Playing {
            return None;
        }

        let horizon = self.band.high + AUTOPILOT_LOOKAHEAD;
        let threatened = |lane: Lane| {
            self.field
                .nearest_in_lane(lane, self.band.low)
                .is_some_and(|o| o.progress < horizon)
        };

        let lane = self.session.player_lane;
        if !threatened(lane) {
            return None;
        }
        let left = self.layout.left_of(lane);
        let right = self.layout.right_of(lane);
        if left != lane && !threatened(left) {
            Some(Command::MoveLeft)
        } else if right != lane && !threatened(right) {
            Some(Command::MoveRight)
        } else {
            None
        }
    }
}
