//! Host-facing game lifecycle
//!
//! Wraps a `Simulation` with the contract the hosting screen relies on:
//! - `start` works once
//! - `GameHost::on_game_end` fires exactly once, on the transition into `Finished`
//! - `close` cancels every timer before `GameHost::on_close` runs, and is idempotent

use crate::error::GameError;
use crate::input::{Command, RawInput};
use crate::settings::Settings;
use crate::sim::{GamePhase, GameSession, QuestionBank, SessionSnapshot, Simulation, TickInput};

/// Callbacks into the hosting screen
pub trait GameHost {
    /// The session finished with this score and coin reward
    fn on_game_end(&mut self, score: u64, coins: u64);

    /// The game was dismissed; no timers are live any more
    fn on_close(&mut self) {}
}

impl<F: FnMut(u64, u64)> GameHost for F {
    fn on_game_end(&mut self, score: u64, coins: u64) {
        self(score, coins)
    }
}

/// Where the game is in its host-visible lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Created,
    Running,
    Closed,
}

pub struct RaceGame<H: GameHost> {
    sim: Simulation,
    host: H,
    lifecycle: Lifecycle,
    end_reported: bool,
}

impl<H: GameHost> RaceGame<H> {
    pub fn new(
        settings: Settings,
        bank: QuestionBank,
        seed: u64,
        host: H,
    ) -> Result<Self, GameError> {
        Ok(Self {
            sim: Simulation::new(settings, bank, seed)?,
            host,
            lifecycle: Lifecycle::Created,
            end_reported: false,
        })
    }

    /// Build a game from a JSON question bank
    pub fn with_question_json(
        settings: Settings,
        questions_json: &str,
        seed: u64,
        host: H,
    ) -> Result<Self, GameError> {
        let bank = QuestionBank::from_json(questions_json)?;
        Self::new(settings, bank, seed, host)
    }

    /// Begin the session. Returns `false` if it was already started or closed.
    pub fn start(&mut self) -> bool {
        if self.lifecycle != Lifecycle::Created {
            log::warn!("start() called in {:?}; ignoring", self.lifecycle);
            return false;
        }
        self.lifecycle = Lifecycle::Running;
        self.sim.start()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn session(&self) -> &GameSession {
        self.sim.session()
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.sim.snapshot()
    }

    /// Advance one tick
    pub fn tick(&mut self, input: &TickInput, dt_ms: u32) -> SessionSnapshot {
        if self.lifecycle != Lifecycle::Running {
            return self.sim.snapshot();
        }
        let snapshot = self.sim.tick(input, dt_ms);
        self.report_end();
        snapshot
    }

    pub fn command(&mut self, command: Command) {
        if self.lifecycle == Lifecycle::Running {
            self.sim.command(command);
        }
    }

    /// Normalize a raw host event and apply it
    pub fn handle_input(&mut self, input: &RawInput) -> Option<Command> {
        let command = input.to_command()?;
        self.command(command);
        Some(command)
    }

    /// Answer the open question (`None` = timed out)
    pub fn answer_question(&mut self, selected: Option<usize>) -> bool {
        if self.lifecycle != Lifecycle::Running {
            return false;
        }
        let accepted = self.sim.answer_question(selected);
        self.report_end();
        accepted
    }

    /// Tear the game down. Timers are cancelled before the host hears about it.
    pub fn close(&mut self) {
        if self.lifecycle == Lifecycle::Closed {
            return;
        }
        self.sim.shutdown();
        self.lifecycle = Lifecycle::Closed;
        log::info!(
            "Game closed ({:?}, score {})",
            self.sim.session().phase,
            self.sim.session().score
        );
        self.host.on_close();
    }

    fn report_end(&mut self) {
        let session = self.sim.session();
        if self.end_reported || session.phase != GamePhase::Finished {
            return;
        }
        self.end_reported = true;
        let score = session.score;
        let coins = session.coins.unwrap_or(0);
        self.host.on_game_end(score, coins);
    }
}
