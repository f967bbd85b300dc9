//! Obstacle motion and lane collision
//!
//! Obstacles travel from the spawn line toward the player: `progress` falls
//! every tick. The player sits at a fixed spot on the track, so a collision is
//! just "same lane, progress inside the collision band".

use serde::{Deserialize, Serialize};

use super::lane::Lane;
use crate::settings::Settings;

/// An opposing entity on the track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub lane: Lane,
    /// Distance from the player side of the track; decreases every tick
    pub progress: f32,
    /// Constant for the obstacle's lifetime
    pub velocity: f32,
}

/// Half-open progress band `[low, high)` occupied by the player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionBand {
    pub low: f32,
    pub high: f32,
}

impl CollisionBand {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            low: settings.collision_band_low,
            high: settings.collision_band_high,
        }
    }

    #[inline]
    pub fn contains(&self, progress: f32) -> bool {
        progress >= self.low && progress < self.high
    }
}

/// Forward progress the player makes in one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerStep {
    pub distance: f32,
    pub score: u64,
}

/// Player delta for one tick at `speed`
pub fn player_step(speed: f32, settings: &Settings) -> PlayerStep {
    PlayerStep {
        distance: (speed * settings.distance_factor).max(0.0),
        score: (speed * settings.score_factor).floor().max(0.0) as u64,
    }
}

/// Working set of live obstacles, kept sorted by id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
    next_id: u32,
}

impl ObstacleField {
    pub fn new() -> Self {
        Self {
            obstacles: Vec::new(),
            next_id: 1,
        }
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// Add an obstacle with a fresh id; ids are never reused within a field
    pub fn spawn(&mut self, lane: Lane, progress: f32, velocity: f32) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.obstacles.push(Obstacle {
            id,
            lane,
            progress,
            velocity,
        });
        id
    }

    /// Move every obstacle toward the player
    pub fn advance(&mut self, obstacle_factor: f32) {
        for obstacle in &mut self.obstacles {
            obstacle.progress -= obstacle.velocity * obstacle_factor;
        }
    }

    /// Drop obstacles that have passed below `threshold`, returning their ids
    pub fn remove_departed(&mut self, threshold: f32) -> Vec<u32> {
        let departed: Vec<u32> = self
            .obstacles
            .iter()
            .filter(|o| o.progress < threshold)
            .map(|o| o.id)
            .collect();
        if !departed.is_empty() {
            self.obstacles.retain(|o| o.progress >= threshold);
        }
        departed
    }

    /// First obstacle hitting a player in `lane`, ordered by lane then id
    pub fn first_collision(&self, lane: Lane, band: CollisionBand) -> Option<&Obstacle> {
        self.obstacles
            .iter()
            .filter(|o| o.lane == lane && band.contains(o.progress))
            .min_by_key(|o| (o.lane, o.id))
    }

    /// Whether `lane` holds an obstacle further than `clearance` from the player
    pub fn lane_blocked(&self, lane: Lane, clearance: f32) -> bool {
        self.obstacles
            .iter()
            .any(|o| o.lane == lane && o.progress > clearance)
    }

    /// Closest obstacle in `lane` that has not yet passed `min_progress`
    pub fn nearest_in_lane(&self, lane: Lane, min_progress: f32) -> Option<&Obstacle> {
        self.obstacles
            .iter()
            .filter(|o| o.lane == lane && o.progress >= min_progress)
            .min_by(|a, b| {
                a.progress
                    .partial_cmp(&b.progress)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn band() -> CollisionBand {
        CollisionBand {
            low: 15.0,
            high: 35.0,
        }
    }

    #[test]
    fn test_band_is_half_open() {
        let band = band();
        assert!(band.contains(15.0));
        assert!(band.contains(34.99));
        assert!(!band.contains(35.0));
        assert!(!band.contains(14.99));
    }

    #[test]
    fn test_advance_and_depart() {
        let mut field = ObstacleField::new();
        let a = field.spawn(Lane(0), 10.0, 4.0);
        let b = field.spawn(Lane(1), 100.0, 1.0);

        field.advance(2.0);
        assert_eq!(field.obstacles()[0].progress, 2.0);
        assert_eq!(field.obstacles()[1].progress, 98.0);

        field.advance(2.0);
        assert_eq!(field.remove_departed(0.0), vec![a]);
        assert_eq!(field.len(), 1);
        assert_eq!(field.obstacles()[0].id, b);
    }

    #[test]
    fn test_ids_are_unique_and_monotonic() {
        let mut field = ObstacleField::new();
        let ids: Vec<u32> = (0..5).map(|_| field.spawn(Lane(0), 50.0, 1.0)).collect();
        field.advance(100.0);
        assert_eq!(field.remove_departed(0.0).len(), 5);
        let next = field.spawn(Lane(0), 50.0, 1.0);
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(next, 6);
    }

    #[test]
    fn test_collision_requires_same_lane_and_band() {
        let mut field = ObstacleField::new();
        field.spawn(Lane(0), 20.0, 1.0);
        field.spawn(Lane(1), 50.0, 1.0);

        assert!(field.first_collision(Lane(0), band()).is_some());
        assert!(field.first_collision(Lane(1), band()).is_none());
        assert!(field.first_collision(Lane(2), band()).is_none());
    }

    #[test]
    fn test_simultaneous_collisions_pick_lowest_id() {
        let mut field = ObstacleField::new();
        field.spawn(Lane(1), 30.0, 1.0);
        field.spawn(Lane(1), 16.0, 1.0);
        let hit = field.first_collision(Lane(1), band()).expect("collision");
        assert_eq!(hit.id, 1);
    }

    #[test]
    fn test_lane_blocked_by_fresh_obstacle_only() {
        let mut field = ObstacleField::new();
        field.spawn(Lane(0), 90.0, 1.0);
        field.spawn(Lane(1), 20.0, 1.0);
        assert!(field.lane_blocked(Lane(0), 60.0));
        assert!(!field.lane_blocked(Lane(1), 60.0));
        assert!(!field.lane_blocked(Lane(2), 60.0));
    }

    #[test]
    fn test_player_step_floors_score() {
        let settings = Settings::default();
        let step = player_step(7.0, &settings);
        assert!((step.distance - 7.0 * settings.distance_factor).abs() < 1e-6);
        assert_eq!(step.score, (7.0 * settings.score_factor).floor() as u64);
    }
}
