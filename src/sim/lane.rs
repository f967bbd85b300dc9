//! Lane geometry for the track
//!
//! The track is a fixed set of parallel lanes, centred on x = 0. Obstacle
//! progress runs along y: spawn at the top, player near the bottom.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A lane index on the track (0 = leftmost)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Lane(pub u8);

/// Immutable mapping from lanes to world coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaneLayout {
    pub count: u8,
    pub width: f32,
}

impl LaneLayout {
    pub fn new(count: u8, width: f32) -> Self {
        Self {
            count: count.max(1),
            width,
        }
    }

    /// All lanes, left to right
    pub fn lanes(&self) -> impl Iterator<Item = Lane> {
        (0..self.count).map(Lane)
    }

    #[inline]
    pub fn contains(&self, lane: Lane) -> bool {
        lane.0 < self.count
    }

    /// Clamp a lane onto the track
    #[inline]
    pub fn clamp(&self, lane: Lane) -> Lane {
        Lane(lane.0.min(self.count - 1))
    }

    /// Lane to the left, staying on the track
    pub fn left_of(&self, lane: Lane) -> Lane {
        Lane(lane.0.saturating_sub(1))
    }

    /// Lane to the right, staying on the track
    pub fn right_of(&self, lane: Lane) -> Lane {
        self.clamp(Lane(lane.0.saturating_add(1)))
    }

    /// World x coordinate of a lane centre
    pub fn center_x(&self, lane: Lane) -> f32 {
        let half_span = (self.count as f32 - 1.0) / 2.0;
        (lane.0 as f32 - half_span) * self.width
    }

    /// World position for something in `lane` at `progress` along the track
    #[inline]
    pub fn world_position(&self, lane: Lane, progress: f32) -> Vec2 {
        Vec2::new(self.center_x(lane), progress)
    }
}
