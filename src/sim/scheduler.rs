//! Virtual clock with cancellable timers keyed by purpose
//!
//! There is at most one timer per `TimerKey`. Scheduling a key again replaces
//! the previous timer, so a superseded timer can never fire. Every timer gets
//! a fresh `TimerId`, which owners compare against the id they armed before
//! acting on a fire.
//!
//! Time only moves through `advance` + `pop_due`. Fires come out one at a
//! time in due order, so a handler that cancels or suspends other timers takes
//! effect before the next fire is produced.

use serde::{Deserialize, Serialize};

/// Purpose of a timer. Declaration order breaks ties between equal due times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TimerKey {
    /// Session countdown (one fire per second of play)
    Main,
    /// Countdown for the open question
    Question,
    /// Boost expiry
    Boost,
}

/// Identity of one scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerId(u64);

/// A timer that came due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerFire {
    pub key: TimerKey,
    pub id: TimerId,
    /// Virtual time the timer was due at
    pub at_ms: u64,
}

#[derive(Debug, Clone)]
struct Timer {
    id: TimerId,
    key: TimerKey,
    due_at: u64,
    /// Repeat period; `None` for one-shot timers
    period: Option<u64>,
    /// Time left when suspended
    suspended: Option<u64>,
}

/// Cooperative single-threaded timer wheel
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now_ms: u64,
    horizon_ms: u64,
    timers: Vec<Timer>,
    next_id: u64,
    running: bool,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start accepting time
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Cancel everything and stop accepting time
    pub fn stop(&mut self) {
        self.cancel_all();
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Number of live timers (suspended ones included)
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    pub fn schedule_once(&mut self, key: TimerKey, delay_ms: u64) -> TimerId {
        self.schedule(key, delay_ms, None)
    }

    pub fn schedule_repeating(&mut self, key: TimerKey, period_ms: u64) -> TimerId {
        self.schedule(key, period_ms, Some(period_ms.max(1)))
    }

    fn schedule(&mut self, key: TimerKey, delay_ms: u64, period: Option<u64>) -> TimerId {
        self.cancel(key);
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            key,
            due_at: self.now_ms + delay_ms,
            period,
            suspended: None,
        });
        id
    }

    /// Cancel the timer for `key`. Returns whether one was live.
    pub fn cancel(&mut self, key: TimerKey) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.key != key);
        self.timers.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    /// Freeze a timer, keeping its remaining time
    pub fn suspend(&mut self, key: TimerKey) {
        let now = self.now_ms;
        if let Some(timer) = self.timer_mut(key) {
            if timer.suspended.is_none() {
                timer.suspended = Some(timer.due_at.saturating_sub(now));
            }
        }
    }

    /// Unfreeze a timer; it fires after the time it had left
    pub fn resume(&mut self, key: TimerKey) {
        let now = self.now_ms;
        if let Some(timer) = self.timer_mut(key) {
            if let Some(remaining) = timer.suspended.take() {
                timer.due_at = now + remaining;
            }
        }
    }

    pub fn is_scheduled(&self, key: TimerKey) -> bool {
        self.timers.iter().any(|t| t.key == key)
    }

    pub fn is_suspended(&self, key: TimerKey) -> bool {
        self.timers
            .iter()
            .any(|t| t.key == key && t.suspended.is_some())
    }

    /// Time until the timer for `key` fires
    pub fn remaining_ms(&self, key: TimerKey) -> Option<u64> {
        self.timers.iter().find(|t| t.key == key).map(|t| {
            t.suspended
                .unwrap_or_else(|| t.due_at.saturating_sub(self.now_ms))
        })
    }

    /// Make `dt_ms` more time available to `pop_due`
    pub fn advance(&mut self, dt_ms: u64) {
        if self.running {
            self.horizon_ms = self.horizon_ms.max(self.now_ms) + dt_ms;
        }
    }

    /// Next due timer within the available time, earliest first.
    ///
    /// Moves the clock to the fire time. Returns `None` (and moves the clock
    /// to the end of the available time) once nothing else is due.
    pub fn pop_due(&mut self) -> Option<TimerFire> {
        if !self.running {
            return None;
        }

        let horizon = self.horizon_ms;
        let next = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.suspended.is_none() && t.due_at <= horizon)
            .min_by_key(|(_, t)| (t.due_at, t.key))
            .map(|(i, _)| i);

        let Some(idx) = next else {
            self.now_ms = self.now_ms.max(horizon);
            return None;
        };

        let timer = &self.timers[idx];
        let fire = TimerFire {
            key: timer.key,
            id: timer.id,
            at_ms: timer.due_at,
        };
        let period = timer.period;
        self.now_ms = fire.at_ms;
        match period {
            Some(period) => self.timers[idx].due_at += period,
            None => {
                self.timers.swap_remove(idx);
            }
        }
        Some(fire)
    }

    fn timer_mut(&mut self, key: TimerKey) -> Option<&mut Timer> {
        self.timers.iter_mut().find(|t| t.key == key)
    }
}
