//! City records and the seed dataset format.
//!
//! Cities are written once by the seeding tool and read concurrently by every
//! request afterwards. The catalog enforces uniqueness of `(city, country)`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, id::CityId};

/// A text hint pointing at one city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clue {
  pub value:      String,
  /// Stored for display; selection ignores it.
  pub difficulty: String,
}

/// A city as it is stored in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct City {
  pub city_id:    CityId,
  /// Display name; the value guesses are compared against.
  pub city:       String,
  pub country:    String,
  pub clues:      Vec<Clue>,
  pub fun_facts:  Vec<String>,
  pub trivia:     Vec<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl City {
  /// The externally visible `{city, country}` pair.
  pub fn option(&self) -> CityOption {
    CityOption {
      city:    self.city.clone(),
      country: self.country.clone(),
    }
  }

  /// Case-insensitive, otherwise exact comparison with the stored name. No
  /// trimming and no country disambiguation.
  pub fn matches_guess(&self, guess: &str) -> bool {
    self.city.to_lowercase() == guess.to_lowercase()
  }
}

/// One answer option shown to the player.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CityOption {
  pub city:    String,
  pub country: String,
}

// ─── Dataset ─────────────────────────────────────────────────────────────────

/// One record of the seed dataset. Ids and timestamps are assigned by the
/// store when the record is written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCity {
  pub city:      String,
  pub country:   String,
  pub clues:     Vec<Clue>,
  #[serde(rename = "fun_fact")]
  pub fun_facts: Vec<String>,
  pub trivia:    Vec<String>,
}

impl NewCity {
  /// Reject records that would later make clue selection or guess
  /// verification fail.
  pub fn validate(&self) -> Result<()> {
    let label = format!("{}, {}", self.city, self.country);
    if self.city.is_empty() || self.country.is_empty() {
      return Err(Error::DataIntegrity(format!("city record {label:?} has an empty name")));
    }
    if self.clues.is_empty() {
      return Err(Error::DataIntegrity(format!("{label} has no clues")));
    }
    if self.fun_facts.is_empty() {
      return Err(Error::DataIntegrity(format!("{label} has no fun facts")));
    }
    if self.trivia.is_empty() {
      return Err(Error::DataIntegrity(format!("{label} has no trivia")));
    }
    Ok(())
  }
}

/// Parse and validate a JSON dataset (an array of [`NewCity`] records).
pub fn parse_dataset(json: &str) -> Result<Vec<NewCity>> {
  let cities: Vec<NewCity> = serde_json::from_str(json)?;
  for city in &cities {
    city.validate()?;
  }
  Ok(cities)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn paris() -> City {
    City {
      city_id:    CityId::generate(),
      city:       "Paris".into(),
      country:    "France".into(),
      clues:      vec![],
      fun_facts:  vec![],
      trivia:     vec![],
      created_at: Utc::now(),
      updated_at: Utc::now(),
    }
  }

  #[test]
  fn guess_matching_ignores_case_only() {
    let city = paris();
    assert!(city.matches_guess("Paris"));
    assert!(city.matches_guess("PARIS"));
    assert!(city.matches_guess("paris"));
    assert!(!city.matches_guess("Paris "));
    assert!(!city.matches_guess(" paris"));
    assert!(!city.matches_guess("Pariss"));
    assert!(!city.matches_guess(""));
  }

  #[test]
  fn guess_matching_handles_non_ascii_names() {
    let mut city = paris();
    city.city = "São Paulo".into();
    assert!(city.matches_guess("SÃO PAULO"));
    assert!(!city.matches_guess("Sao Paulo"));
  }

  #[test]
  fn dataset_parses_the_seed_format() {
    let json = r#"[{
      "city": "Tokyo",
      "country": "Japan",
      "clues": [{"value": "Shibuya crossing", "difficulty": "easy"}],
      "fun_fact": ["Largest metro area"],
      "trivia": ["Formerly Edo"]
    }]"#;
    let cities = parse_dataset(json).unwrap();
    assert_eq!(cities.len(), 1);
    assert_eq!(cities[0].fun_facts, ["Largest metro area"]);
    assert_eq!(cities[0].clues[0].difficulty, "easy");
  }

  #[test]
  fn bundled_sample_dataset_is_valid() {
    let cities = parse_dataset(include_str!("../../../dataset/sample.json")).unwrap();
    assert!(cities.len() >= crate::clue::OPTION_COUNT);
  }

  #[test]
  fn dataset_rejects_empty_collections() {
    let json = r#"[{
      "city": "Tokyo", "country": "Japan",
      "clues": [{"value": "x", "difficulty": "easy"}],
      "fun_fact": [], "trivia": ["t"]
    }]"#;
    assert!(matches!(parse_dataset(json), Err(Error::DataIntegrity(_))));
  }

  #[test]
  fn dataset_rejects_malformed_json() {
    assert!(matches!(parse_dataset("{not json"), Err(Error::Dataset(_))));
  }
}
