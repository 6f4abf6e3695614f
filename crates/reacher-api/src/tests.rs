//! Router tests driving the full handler stack over an in-memory SQLite store.

use axum::{
  body::Body,
  http::{Request, StatusCode},
};
use reacher_core::{
  city::{Clue, NewCity},
  id::SessionId,
  rules::GameRules,
};
use reacher_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::{AppState, ShareSettings, api_router, error::GENERIC_FAILURE};

const CITIES: [(&str, &str); 5] = [
  ("Paris", "France"),
  ("Tokyo", "Japan"),
  ("Lima", "Peru"),
  ("Cairo", "Egypt"),
  ("Oslo", "Norway"),
];

fn record(city: &str, country: &str) -> NewCity {
  NewCity {
    city:      city.into(),
    country:   country.into(),
    clues:     vec![Clue { value: format!("{city} clue"), difficulty: "easy".into() }],
    fun_facts: vec![format!("{city} fun fact")],
    trivia:    vec![format!("{city} trivia")],
  }
}

async fn make_state(cities: &[(&str, &str)]) -> AppState<SqliteStore> {
  let store = SqliteStore::open_in_memory().await.unwrap();
  store
    .seed_cities(cities.iter().map(|(c, n)| record(c, n)).collect())
    .await
    .unwrap();
  AppState::new(store, GameRules::default(), ShareSettings::default())
}

async fn send(
  state: &AppState<SqliteStore>,
  method: &str,
  uri: &str,
  session: Option<&str>,
  body: Option<Value>,
) -> (StatusCode, Value) {
  let mut builder = Request::builder().method(method).uri(uri);
  if let Some(id) = session {
    builder = builder.header("session-id", id);
  }
  let req = match body {
    Some(json) => builder
      .header("content-type", "application/json")
      .body(Body::from(json.to_string()))
      .unwrap(),
    None => builder.body(Body::empty()).unwrap(),
  };

  let resp = api_router(state.clone()).oneshot(req).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let value = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, value)
}

async fn new_session(state: &AppState<SqliteStore>) -> String {
  let (status, body) = send(state, "POST", "/session", None, None).await;
  assert_eq!(status, StatusCode::CREATED);
  body["data"]["session_id"].as_str().unwrap().to_owned()
}

// ── Sessions ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_session_returns_201_with_initial_points() {
  let state = make_state(&CITIES).await;
  let (status, body) = send(&state, "POST", "/session", None, None).await;

  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["success"], json!(true));
  assert_eq!(body["data"]["points"], json!(10));
  assert!(body["data"]["session_id"].as_str().unwrap().starts_with("sess_"));
}

#[tokio::test]
async fn get_session_reports_profile_fields() {
  let state = make_state(&CITIES).await;
  let id = new_session(&state).await;

  let (status, body) = send(&state, "GET", "/session", Some(&id), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["data"]["session_id"], json!(id));
  assert_eq!(body["data"]["points"], json!(10));
  assert_eq!(body["data"]["username"], Value::Null);
  assert_eq!(body["data"]["is_active"], json!(true));
}

#[tokio::test]
async fn session_header_is_required_and_validated() {
  let state = make_state(&CITIES).await;

  let (status, body) = send(&state, "GET", "/session", None, None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["success"], json!(false));

  let (status, _) = send(&state, "GET", "/session", Some("not-a-session"), None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let unknown = SessionId::generate().to_string();
  let (status, _) = send(&state, "GET", "/session", Some(&unknown), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ── Clues ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn random_clue_has_four_options() {
  let state = make_state(&CITIES).await;
  let id = new_session(&state).await;

  let (status, body) = send(&state, "GET", "/city/random", Some(&id), None).await;
  assert_eq!(status, StatusCode::OK);
  let data = &body["data"];
  assert!(data["clue"].as_str().unwrap().ends_with(" clue"));
  assert!(data["city_id"].as_str().unwrap().starts_with("city_"));
  assert_eq!(data["options"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn inactive_session_is_forbidden() {
  let state = make_state(&CITIES).await;
  let id = new_session(&state).await;
  state
    .store
    .set_session_active(&SessionId::parse(&id).unwrap(), false)
    .await
    .unwrap();

  let (status, body) = send(&state, "GET", "/city/random", Some(&id), None).await;
  assert_eq!(status, StatusCode::FORBIDDEN);
  assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn small_catalog_hides_the_detail() {
  let state = make_state(&CITIES[..3]).await;
  let id = new_session(&state).await;

  let (status, body) = send(&state, "GET", "/city/random", Some(&id), None).await;
  assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
  assert_eq!(body, json!({ "success": false, "message": GENERIC_FAILURE }));
}

// ── Guesses ──────────────────────────────────────────────────────────────────

/// Ask for a clue and return `(city_id, correct city name)`.
async fn clue_and_answer(state: &AppState<SqliteStore>, id: &str) -> (String, String) {
  let (_, body) = send(state, "GET", "/city/random", Some(id), None).await;
  let city_id = body["data"]["city_id"].as_str().unwrap().to_owned();
  let clue = body["data"]["clue"].as_str().unwrap();
  let name = clue.trim_end_matches(" clue").to_owned();
  (city_id, name)
}

#[tokio::test]
async fn correct_guess_scores_and_explains() {
  let state = make_state(&CITIES).await;
  let id = new_session(&state).await;
  let (city_id, name) = clue_and_answer(&state, &id).await;

  let (status, body) = send(
    &state,
    "POST",
    "/city/guess/verify",
    Some(&id),
    Some(json!({ "city_id": city_id, "guess_city": name.to_lowercase() })),
  )
  .await;

  assert_eq!(status, StatusCode::OK);
  let data = &body["data"];
  assert_eq!(data["correct"], json!(true));
  assert_eq!(data["points_gained"], json!(2));
  assert_eq!(data["total_points"], json!(12));
  assert_eq!(data["city"]["city"], json!(name));
  assert_eq!(data["fun_fact"], json!(format!("{name} fun fact")));
  assert_eq!(data["trivia"], json!(format!("{name} trivia")));
}

#[tokio::test]
async fn incorrect_guess_on_fresh_session_leaves_nine() {
  let state = make_state(&CITIES).await;
  let id = new_session(&state).await;
  let (city_id, _) = clue_and_answer(&state, &id).await;

  let (status, body) = send(
    &state,
    "POST",
    "/city/guess/verify",
    Some(&id),
    Some(json!({ "city_id": city_id, "guess_city": "Atlantis" })),
  )
  .await;

  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["data"]["correct"], json!(false));
  assert_eq!(body["data"]["points_lost"], json!(1));
  assert_eq!(body["data"]["total_points"], json!(9));
  assert!(body["data"].get("points_gained").is_none());
}

#[tokio::test]
async fn guessing_an_unknown_city_is_404() {
  let state = make_state(&CITIES).await;
  let id = new_session(&state).await;
  let unknown = reacher_core::id::CityId::generate().to_string();

  let (status, _) = send(
    &state,
    "POST",
    "/city/guess/verify",
    Some(&id),
    Some(json!({ "city_id": unknown, "guess_city": "Paris" })),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let (_, body) = send(&state, "GET", "/session", Some(&id), None).await;
  assert_eq!(body["data"]["points"], json!(10));
}

#[tokio::test]
async fn malformed_guess_body_is_400() {
  let state = make_state(&CITIES).await;
  let id = new_session(&state).await;

  let (status, body) = send(
    &state,
    "POST",
    "/city/guess/verify",
    Some(&id),
    Some(json!({ "city_id": "paris" })),
  )
  .await;

  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["message"].as_str().unwrap().starts_with("Malformed body passed"));
}

// ── Invites ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn invite_round_trip() {
  let state = make_state(&CITIES).await;
  let id = new_session(&state).await;

  let (status, body) = send(
    &state,
    "POST",
    "/invite",
    Some(&id),
    Some(json!({ "username": "ada" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  let data = &body["data"];
  assert_eq!(data["username"], json!("ada"));
  assert_eq!(data["points"], json!(10));
  assert_eq!(data["wa_text"], json!("welcome!"));
  let invite_id = data["invite_id"].as_str().unwrap();
  assert!(invite_id.starts_with("invi_"));
  assert_eq!(
    data["invite_link"],
    json!(format!("https://reacher.app/invite/{invite_id}"))
  );
  assert!(
    data["image_link"]
      .as_str()
      .unwrap()
      .starts_with("https://gravatar.com/avatar/")
  );

  let (status, body) = send(&state, "GET", &format!("/invite/{invite_id}"), None, None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["data"]["username"], json!("ada"));
  assert_eq!(body["data"]["points"], json!(10));

  let (_, me) = send(&state, "GET", "/session", Some(&id), None).await;
  assert_eq!(me["data"]["username"], json!("ada"));
}

#[tokio::test]
async fn invite_rejections_use_distinct_statuses() {
  let state = make_state(&CITIES).await;
  let first = new_session(&state).await;
  let second = new_session(&state).await;
  let body = |name: &str| Some(json!({ "username": name }));

  let (status, _) = send(&state, "POST", "/invite", Some(&first), body("ada")).await;
  assert_eq!(status, StatusCode::OK);

  // Renaming.
  let (status, _) = send(&state, "POST", "/invite", Some(&first), body("grace")).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  // Someone else's name.
  let (status, _) = send(&state, "POST", "/invite", Some(&second), body("ada")).await;
  assert_eq!(status, StatusCode::CONFLICT);

  // Too short.
  let (status, _) = send(&state, "POST", "/invite", Some(&second), body("al")).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  // No session header at all.
  let (status, _) = send(&state, "POST", "/invite", None, body("linus")).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_and_malformed_invites() {
  let state = make_state(&CITIES).await;
  let unknown = reacher_core::id::InviteId::generate();

  let (status, _) = send(&state, "GET", &format!("/invite/{unknown}"), None, None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let (status, _) = send(&state, "GET", "/invite/nope", None, None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn custom_share_settings_shape_the_link() {
  let store = SqliteStore::open_in_memory().await.unwrap();
  let share = ShareSettings {
    invite_base_url: "https://play.example/i/".into(),
    ..ShareSettings::default()
  };
  let state = AppState::new(store, GameRules::default(), share);
  let id = new_session(&state).await;

  let (_, body) = send(
    &state,
    "POST",
    "/invite",
    Some(&id),
    Some(json!({ "username": "grace" })),
  )
  .await;
  let invite_id = body["data"]["invite_id"].as_str().unwrap();
  assert_eq!(
    body["data"]["invite_link"],
    json!(format!("https://play.example/i/{invite_id}"))
  );
}
