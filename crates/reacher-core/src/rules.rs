//! Scoring rules.

use serde::{Deserialize, Serialize};

/// A session's balance never drops below this.
pub const POINTS_FLOOR: i64 = 0;

/// Centrally configured scoring constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRules {
  /// Balance a freshly created session starts with.
  pub initial_points:    u32,
  pub correct_award:     u32,
  pub incorrect_penalty: u32,
}

impl Default for GameRules {
  fn default() -> Self {
    Self {
      initial_points:    10,
      correct_award:     2,
      incorrect_penalty: 1,
    }
  }
}

impl GameRules {
  /// The score change a guess earns. An incorrect guess always reports the
  /// full penalty, even when the floor absorbs part of it.
  pub fn score(&self, correct: bool) -> ScoreChange {
    if correct {
      ScoreChange::PointsGained(self.correct_award)
    } else {
      ScoreChange::PointsLost(self.incorrect_penalty)
    }
  }
}

/// Outcome of one guess on the balance. Serialises as either
/// `"points_gained": n` or `"points_lost": n`, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreChange {
  PointsGained(u32),
  PointsLost(u32),
}

impl ScoreChange {
  /// Signed delta to apply to the stored balance.
  pub fn delta(self) -> i64 {
    match self {
      Self::PointsGained(n) => i64::from(n),
      Self::PointsLost(n) => -i64::from(n),
    }
  }

  /// Apply to `points`, respecting [`POINTS_FLOOR`]. Stores must implement
  /// exactly this arithmetic atomically.
  pub fn apply(self, points: i64) -> i64 { (points + self.delta()).max(POINTS_FLOOR) }
}
