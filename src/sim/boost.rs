//! Timed, non-stacking speed boost
//!
//! The boost never rewrites the base speed. It is a multiplier applied on top
//! of it, so switching it off restores exactly the speed it started from no
//! matter how many times it is toggled.

use serde::{Deserialize, Serialize};

use super::scheduler::TimerId;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoostState {
    active: bool,
    /// Expiry timer for the current activation
    #[serde(skip)]
    timer: Option<TimerId>,
    /// Activations this session
    pub activations: u32,
}

impl BoostState {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn timer(&self) -> Option<TimerId> {
        self.timer
    }

    /// Switch the boost on. Returns `false` (and changes nothing) if it is already on.
    pub fn activate(&mut self) -> bool {
        if self.active {
            return false;
        }
        self.active = true;
        self.activations += 1;
        true
    }

    /// Remember which timer ends this activation
    pub fn arm(&mut self, timer: TimerId) {
        self.timer = Some(timer);
    }

    /// End the activation owned by `timer`. Fires from any other timer are stale and ignored.
    pub fn expire(&mut self, timer: TimerId) -> bool {
        if !self.active || self.timer != Some(timer) {
            return false;
        }
        self.active = false;
        self.timer = None;
        true
    }

    /// Drop the boost without waiting for its timer (session teardown)
    pub fn reset(&mut self) {
        self.active = false;
        self.timer = None;
    }

    /// Speed actually used for motion
    #[inline]
    pub fn effective_speed(&self, base_speed: f32, multiplier: f32) -> f32 {
        if self.active {
            base_speed * multiplier
        } else {
            base_speed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::scheduler::{Scheduler, TimerKey};
    use proptest::prelude::*;

    #[test]
    fn test_activation_round_trip() {
        let mut sched = Scheduler::new();
        sched.start();
        let mut boost = BoostState::default();
        let base = 5.0;

        assert!(boost.activate());
        boost.arm(sched.schedule_once(TimerKey::Boost, 3000));
        assert_eq!(boost.effective_speed(base, 2.0), 10.0);

        // Second activation while active changes nothing
        assert!(!boost.activate());
        assert_eq!(boost.effective_speed(base, 2.0), 10.0);
        assert_eq!(boost.activations, 1);

        sched.advance(3000);
        let fire = sched.pop_due().expect("boost expiry");
        assert!(boost.expire(fire.id));
        assert_eq!(boost.effective_speed(base, 2.0), base);

        // The same fire can't end the boost twice
        assert!(!boost.expire(fire.id));
    }

    #[test]
    fn test_stale_timer_is_ignored() {
        let mut sched = Scheduler::new();
        sched.start();
        let mut boost = BoostState::default();

        let stale = sched.schedule_once(TimerKey::Boost, 100);
        boost.activate();
        let current = sched.schedule_once(TimerKey::Boost, 100);
        boost.arm(current);

        assert!(!boost.expire(stale));
        assert!(boost.is_active());
        assert!(boost.expire(current));
    }

    proptest! {
        #[test]
        fn prop_toggling_never_drifts(base in 0.5f32..50.0, multiplier in 1.0f32..4.0, presses in 1usize..20) {
            let mut sched = Scheduler::new();
            sched.start();
            let mut boost = BoostState::default();

            for _ in 0..presses {
                if boost.activate() {
                    boost.arm(sched.schedule_once(TimerKey::Boost, 100));
                }
                prop_assert_eq!(boost.effective_speed(base, multiplier), base * multiplier);
            }
            prop_assert_eq!(boost.activations, 1);

            sched.advance(100);
            while let Some(fire) = sched.pop_due() {
                boost.expire(fire.id);
            }
            prop_assert_eq!(boost.effective_speed(base, multiplier), base);
        }
    }
}
