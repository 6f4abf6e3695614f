//! Handlers for `/city` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/city/random` | `session-id` header; one clue and four options |
//! | `POST` | `/city/guess/verify` | `session-id` header; body `{"city_id":"city_…","guess_city":"Paris"}` |

use axum::{Json, extract::State};
use rand::{SeedableRng, rngs::SmallRng};
use reacher_core::{
  clue::{self, RandomClue},
  guess::{self, Guess, GuessOutcome},
  store::GameStore,
};

use crate::{
  AppState,
  envelope::{self, Envelope},
  error::ApiError,
  extract::{ApiJson, SessionHeader},
};

/// `GET /city/random`
pub async fn random<S>(
  State(state): State<AppState<S>>,
  SessionHeader(session_id): SessionHeader,
) -> Result<Json<Envelope<RandomClue>>, ApiError>
where
  S: GameStore,
{
  let mut rng = SmallRng::from_entropy();
  let clue = clue::issue_random_clue(&*state.store, &mut rng, &session_id).await?;
  tracing::debug!(%session_id, city_id = %clue.city_id, "clue issued");
  Ok(envelope::ok(clue))
}

/// `POST /city/guess/verify`
pub async fn verify<S>(
  State(state): State<AppState<S>>,
  SessionHeader(session_id): SessionHeader,
  ApiJson(body): ApiJson<Guess>,
) -> Result<Json<Envelope<GuessOutcome>>, ApiError>
where
  S: GameStore,
{
  let mut rng = SmallRng::from_entropy();
  let outcome =
    guess::verify_guess(&*state.store, &state.rules, &mut rng, &session_id, body).await?;

  tracing::info!(
    %session_id,
    correct = outcome.correct,
    total_points = outcome.total_points,
    "guess verified"
  );
  Ok(envelope::ok(outcome))
}
