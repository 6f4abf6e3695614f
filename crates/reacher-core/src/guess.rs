//! Guess verification and scoring.
//!
//! Correctness is decided from the submitted city id and name only; nothing
//! from the issued question is consulted. The balance update is delegated to
//! [`GameStore::adjust_points`], which applies it atomically. There is no
//! replay protection: submitting the same guess twice scores it twice.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  city::CityOption,
  id::{CityId, SessionId},
  rules::{GameRules, POINTS_FLOOR, ScoreChange},
  sampling,
  session,
  store::GameStore,
};

/// A player's answer to a question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Guess {
  pub city_id:    CityId,
  /// Compared case-insensitively with the stored city name.
  pub guess_city: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessOutcome {
  pub correct:      bool,
  #[serde(flatten)]
  pub change:       ScoreChange,
  /// Balance after this guess was applied.
  pub total_points: i64,
  /// The city the clue belonged to.
  pub city:         CityOption,
  pub fun_fact:     String,
  pub trivia:       String,
}

/// Score `guess` for an active session and return the explanation payload.
///
/// The fun fact and trivia are drawn before the balance is touched, so a city
/// with missing content fails without changing any points.
pub async fn verify_guess<S, R>(
  store: &S,
  rules: &GameRules,
  rng: &mut R,
  session_id: &SessionId,
  guess: Guess,
) -> Result<GuessOutcome>
where
  S: GameStore,
  R: Rng + Send,
{
  session::require_active(store, session_id).await?;

  let city = store
    .get_city(guess.city_id.clone())
    .await
    .map_err(Error::store)?
    .ok_or_else(|| Error::CityMissing(guess.city_id.clone()))?;

  let fun_fact = sampling::choose(&city.fun_facts, rng)
    .ok_or_else(|| Error::DataIntegrity(format!("city {} has no fun facts", city.city_id)))?
    .clone();
  let trivia = sampling::choose(&city.trivia, rng)
    .ok_or_else(|| Error::DataIntegrity(format!("city {} has no trivia", city.city_id)))?
    .clone();

  let correct = city.matches_guess(&guess.guess_city);
  let change = rules.score(correct);

  let total_points = store
    .adjust_points(session_id.clone(), change.delta(), POINTS_FLOOR)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| Error::SessionMissing(session_id.clone()))?;

  Ok(GuessOutcome {
    correct,
    change,
    total_points,
    city: city.option(),
    fun_fact,
    trivia,
  })
}
