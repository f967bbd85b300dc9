//! Coin reward for a finished session

use serde::{Deserialize, Serialize};

use crate::settings::Settings;

/// Divisors converting score and distance into coins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardRates {
    pub score_divisor: u64,
    pub distance_divisor: u64,
}

impl RewardRates {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            score_divisor: settings.score_divisor.max(1),
            distance_divisor: settings.distance_divisor.max(1),
        }
    }

    /// `floor(score / score_divisor) + floor(distance / distance_divisor)`
    pub fn coins(&self, score: u64, distance: f32) -> u64 {
        let whole_distance = distance.max(0.0).floor() as u64;
        score / self.score_divisor + whole_distance / self.distance_divisor
    }
}
