//! Clue selection: one random clue and four shuffled answer options.
//!
//! Nothing about an issued question is persisted. The guess verifier decides
//! correctness from the submitted city id alone, so the same city may come up
//! again with a different set of distractors.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  city::CityOption,
  id::{CityId, SessionId},
  sampling,
  session,
  store::GameStore,
};

/// Options shown per question: the correct city plus three distractors.
pub const OPTION_COUNT: usize = 4;

const DISTRACTOR_COUNT: usize = OPTION_COUNT - 1;

/// A question as handed to the player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomClue {
  pub clue:    String,
  pub city_id: CityId,
  /// Exactly [`OPTION_COUNT`] distinct options in random order, one correct.
  pub options: Vec<CityOption>,
}

/// Pick a uniformly random city, one of its clues, and three distinct
/// distractors, then shuffle the four options.
///
/// Fails with [`Error::CatalogTooSmall`] when the catalog holds fewer than
/// [`OPTION_COUNT`] cities; a short option list is never returned.
pub async fn issue_random_clue<S, R>(
  store: &S,
  rng: &mut R,
  session_id: &SessionId,
) -> Result<RandomClue>
where
  S: GameStore,
  R: Rng + Send,
{
  session::require_active(store, session_id).await?;

  let total = store.count_cities().await.map_err(Error::store)?;
  if total < OPTION_COUNT {
    return Err(Error::CatalogTooSmall { found: total, required: OPTION_COUNT });
  }

  // Every city is equally likely, however many clues it has.
  let offset = rng.gen_range(0..total);
  let city = store
    .city_at(offset)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| {
      Error::DataIntegrity(format!("no city at offset {offset} of {total}"))
    })?;

  let clue = sampling::choose(&city.clues, rng)
    .ok_or_else(|| Error::DataIntegrity(format!("city {} has no clues", city.city_id)))?
    .value
    .clone();

  let others = store
    .cities_excluding(city.city_id.clone())
    .await
    .map_err(Error::store)?;
  let found = others.len() + 1;
  let mut options = sampling::sample_distinct(others, DISTRACTOR_COUNT, rng)
    .ok_or(Error::CatalogTooSmall { found, required: OPTION_COUNT })?;

  options.push(city.option());
  sampling::shuffle(&mut options, rng);

  Ok(RandomClue {
    clue,
    city_id: city.city_id,
    options,
  })
}
