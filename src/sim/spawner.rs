//! Procedural obstacle spawning
//!
//! One spawn attempt per tick once the cooldown has elapsed. An attempt picks a
//! uniformly random lane; if that lane still holds an obstacle near the spawn
//! line (or the track is full) the attempt is dropped and retried next tick.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::lane::{Lane, LaneLayout};
use super::motion::ObstacleField;
use crate::settings::Settings;

/// A spawn the simulation should perform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPlan {
    pub lane: Lane,
    pub progress: f32,
    pub velocity: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Spawner {
    /// Time left before the next attempt is allowed
    cooldown_ms: u64,
}

impl Spawner {
    /// First spawn waits one full interval
    pub fn new(settings: &Settings) -> Self {
        Self {
            cooldown_ms: settings.spawn_interval_ms,
        }
    }

    pub fn cooldown_ms(&self) -> u64 {
        self.cooldown_ms
    }

    /// Let `dt_ms` of play elapse and make at most one spawn attempt
    pub fn poll<R: Rng>(
        &mut self,
        dt_ms: u64,
        field: &ObstacleField,
        layout: &LaneLayout,
        rng: &mut R,
        settings: &Settings,
    ) -> Option<SpawnPlan> {
        self.cooldown_ms = self.cooldown_ms.saturating_sub(dt_ms);
        if self.cooldown_ms > 0 {
            return None;
        }
        if field.len() >= settings.max_obstacles {
            return None;
        }

        let lane = Lane(rng.random_range(0..layout.count));
        if field.lane_blocked(lane, settings.spawn_clearance) {
            log::debug!("Spawn skipped: lane {} still occupied", lane.0);
            return None;
        }

        let velocity = if settings.obstacle_min_velocity < settings.obstacle_max_velocity {
            rng.random_range(settings.obstacle_min_velocity..=settings.obstacle_max_velocity)
        } else {
            settings.obstacle_min_velocity
        };

        self.cooldown_ms = settings.spawn_interval_ms;
        Some(SpawnPlan {
            lane,
            progress: settings.obstacle_spawn_progress,
            velocity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn setup() -> (Settings, LaneLayout, Pcg32) {
        let settings = Settings::default();
        let layout = LaneLayout::new(settings.lane_count, settings.lane_width);
        (settings, layout, Pcg32::seed_from_u64(7))
    }

    #[test]
    fn test_respects_cooldown() {
        let (settings, layout, mut rng) = setup();
        let mut spawner = Spawner::new(&settings);
        let field = ObstacleField::new();

        let half = settings.spawn_interval_ms / 2;
        assert!(spawner.poll(half, &field, &layout, &mut rng, &settings).is_none());
        let plan = spawner
            .poll(settings.spawn_interval_ms - half, &field, &layout, &mut rng, &settings)
            .expect("cooldown elapsed on an empty track");
        assert!(layout.contains(plan.lane));
        assert_eq!(plan.progress, settings.obstacle_spawn_progress);
        assert!(plan.velocity >= settings.obstacle_min_velocity);
        assert!(plan.velocity <= settings.obstacle_max_velocity);

        // Cooldown restarts after a spawn
        assert_eq!(spawner.cooldown_ms(), settings.spawn_interval_ms);
        assert!(spawner.poll(1, &field, &layout, &mut rng, &settings).is_none());
    }

    #[test]
    fn test_never_exceeds_max_obstacles() {
        let (mut settings, layout, mut rng) = setup();
        settings.max_obstacles = 2;
        let mut spawner = Spawner::new(&settings);
        let mut field = ObstacleField::new();
        field.spawn(Lane(0), 20.0, 1.0);
        field.spawn(Lane(1), 20.0, 1.0);

        for _ in 0..50 {
            assert!(
                spawner
                    .poll(settings.spawn_interval_ms, &field, &layout, &mut rng, &settings)
                    .is_none()
            );
        }
    }

    #[test]
    fn test_blocked_lanes_are_never_chosen() {
        let (settings, layout, mut rng) = setup();
        let mut field = ObstacleField::new();
        field.spawn(Lane(0), 95.0, 1.0);
        field.spawn(Lane(2), 95.0, 1.0);

        let mut spawned = 0;
        for _ in 0..100 {
            let mut spawner = Spawner::new(&settings);
            if let Some(plan) =
                spawner.poll(settings.spawn_interval_ms, &field, &layout, &mut rng, &settings)
            {
                assert_eq!(plan.lane, Lane(1));
                spawned += 1;
            }
        }
        assert!(spawned > 0, "the free lane should be drawn at least once");
    }

    #[test]
    fn test_failed_attempt_retries_next_tick() {
        let (settings, _, mut rng) = setup();
        let layout = LaneLayout::new(1, settings.lane_width);
        let mut spawner = Spawner::new(&settings);
        let mut field = ObstacleField::new();
        field.spawn(Lane(0), 95.0, 1.0);

        assert!(
            spawner
                .poll(settings.spawn_interval_ms, &field, &layout, &mut rng, &settings)
                .is_none()
        );
        assert_eq!(spawner.cooldown_ms(), 0);

        field = ObstacleField::new();
        assert!(spawner.poll(16, &field, &layout, &mut rng, &settings).is_some());
    }
}
