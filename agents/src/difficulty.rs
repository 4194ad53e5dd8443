//! Difficulty model.
//!
//! A single rating is clamped to [`MIN_RATING`, `MAX_RATING`] and mapped
//! through independent clamped linear functions to every knob the
//! heuristic agent and its controller use.
//!
//! | Rating | Reaction | Accuracy | Aggression | Defense | Cooldown mgmt |
//! |--------|----------|----------|------------|---------|---------------|
//! | 400    | 2500 ms  | 0.55     | 0.30       | 0.20    | 0.10          |
//! | 1600   | 1400 ms  | 0.765    | 0.65       | 0.60    | 0.55          |
//! | 2800   | 300 ms   | 0.98     | 1.00       | 1.00    | 1.00          |

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const MIN_RATING: f64 = 400.0;
pub const MAX_RATING: f64 = 2800.0;

/// Named starting points for the rating scale.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Easy,
    Medium,
    Hard,
}

impl Preset {
    pub const fn rating(self) -> f64 {
        match self {
            Preset::Easy => 800.0,
            Preset::Medium => 1400.0,
            Preset::Hard => 2000.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    /// The clamped rating everything else was derived from.
    pub rating: f64,
    /// How long the AI waits before committing a chosen move.
    pub reaction_delay: Duration,
    /// Derived for reporting only; evaluation always looks one move ahead.
    pub search_depth: u8,
    /// Chance of playing the top-scored move; also damps evaluation noise.
    pub accuracy: f64,
    pub aggressiveness: f64,
    pub defensive_awareness: f64,
    pub cooldown_management: f64,
}

/// Linear in the rating between `low` (at MIN_RATING) and `high` (at
/// MAX_RATING), clamped to that interval.
fn scale(rating: f64, low: f64, high: f64) -> f64 {
    let t = ((rating - MIN_RATING) / (MAX_RATING - MIN_RATING)).clamp(0.0, 1.0);
    low + (high - low) * t
}

impl Difficulty {
    pub fn from_rating(rating: f64) -> Self {
        let rating = if rating.is_nan() {
            MIN_RATING
        } else {
            rating.clamp(MIN_RATING, MAX_RATING)
        };
        Self {
            rating,
            reaction_delay: Duration::from_millis(scale(rating, 2500.0, 300.0).round() as u64),
            search_depth: scale(rating, 1.0, 5.0).round() as u8,
            accuracy: scale(rating, 0.55, 0.98),
            aggressiveness: scale(rating, 0.3, 1.0),
            defensive_awareness: scale(rating, 0.2, 1.0),
            cooldown_management: scale(rating, 0.1, 1.0),
        }
    }
}

impl From<Preset> for Difficulty {
    fn from(preset: Preset) -> Self {
        Difficulty::from_rating(preset.rating())
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Preset::Medium.into()
    }
}
