//! In-memory [`GameStore`] used by the unit tests in this crate.

use std::{collections::HashMap, convert::Infallible, sync::Mutex};

use chrono::Utc;

use crate::{
  city::{City, CityOption, Clue},
  id::{CityId, InviteId, SessionId},
  invite::{Invite, InviteOutcome, InviteView, Profile},
  session::Session,
  store::GameStore,
};

#[derive(Default)]
struct Inner {
  /// Kept sorted by id, mirroring the SQL backend's `ORDER BY city_id`.
  cities:   Vec<City>,
  sessions: HashMap<SessionId, Session>,
  invites:  HashMap<InviteId, Invite>,
}

#[derive(Default)]
pub struct MemoryStore {
  inner: Mutex<Inner>,
}

/// A city with a little of everything, enough for selection and scoring.
pub fn sample_city(name: &str, country: &str) -> City {
  let now = Utc::now();
  City {
    city_id:    CityId::generate(),
    city:       name.to_owned(),
    country:    country.to_owned(),
    clues:      vec![
      Clue { value: format!("{name} clue one"), difficulty: "easy".into() },
      Clue { value: format!("{name} clue two"), difficulty: "hard".into() },
    ],
    fun_facts:  vec![format!("{name} fact A"), format!("{name} fact B")],
    trivia:     vec![format!("{name} trivia A"), format!("{name} trivia B")],
    created_at: now,
    updated_at: now,
  }
}

impl MemoryStore {
  pub fn with_cities(cities: &[(&str, &str)]) -> Self {
    let store = Self::default();
    for (name, country) in cities {
      store.insert_city(sample_city(name, country));
    }
    store
  }

  pub fn insert_city(&self, city: City) {
    let mut inner = self.inner.lock().unwrap();
    inner.cities.push(city);
    inner.cities.sort_by(|a, b| a.city_id.cmp(&b.city_id));
  }

  pub fn city(&self, id: &CityId) -> Option<City> {
    let inner = self.inner.lock().unwrap();
    inner.cities.iter().find(|c| &c.city_id == id).cloned()
  }

  pub fn city_id_of(&self, name: &str) -> Option<CityId> {
    let inner = self.inner.lock().unwrap();
    inner
      .cities
      .iter()
      .find(|c| c.city == name)
      .map(|c| c.city_id.clone())
  }

  pub fn set_active(&self, id: &SessionId, active: bool) {
    let mut inner = self.inner.lock().unwrap();
    if let Some(session) = inner.sessions.get_mut(id) {
      session.is_active = active;
    }
  }

  pub fn set_points(&self, id: &SessionId, points: i64) {
    let mut inner = self.inner.lock().unwrap();
    if let Some(session) = inner.sessions.get_mut(id) {
      session.points = points;
    }
  }

  pub fn points(&self, id: &SessionId) -> i64 {
    let inner = self.inner.lock().unwrap();
    inner.sessions[id].points
  }
}

impl GameStore for MemoryStore {
  type Error = Infallible;

  async fn count_cities(&self) -> Result<usize, Infallible> {
    Ok(self.inner.lock().unwrap().cities.len())
  }

  async fn city_at(&self, offset: usize) -> Result<Option<City>, Infallible> {
    Ok(self.inner.lock().unwrap().cities.get(offset).cloned())
  }

  async fn get_city(&self, id: CityId) -> Result<Option<City>, Infallible> { Ok(self.city(&id)) }

  async fn cities_excluding(&self, id: CityId) -> Result<Vec<CityOption>, Infallible> {
    let inner = self.inner.lock().unwrap();
    Ok(
      inner
        .cities
        .iter()
        .filter(|c| c.city_id != id)
        .map(City::option)
        .collect(),
    )
  }

  async fn create_session(&self, initial_points: i64) -> Result<Session, Infallible> {
    let now = Utc::now();
    let session = Session {
      session_id: SessionId::generate(),
      points:     initial_points,
      is_active:  true,
      username:   None,
      image_link: None,
      created_at: now,
      updated_at: now,
    };
    let mut inner = self.inner.lock().unwrap();
    inner.sessions.insert(session.session_id.clone(), session.clone());
    Ok(session)
  }

  async fn get_session(&self, id: SessionId) -> Result<Option<Session>, Infallible> {
    Ok(self.inner.lock().unwrap().sessions.get(&id).cloned())
  }

  async fn adjust_points(
    &self,
    id: SessionId,
    delta: i64,
    floor: i64,
  ) -> Result<Option<i64>, Infallible> {
    let mut inner = self.inner.lock().unwrap();
    Ok(inner.sessions.get_mut(&id).map(|session| {
      session.points = (session.points + delta).max(floor);
      session.updated_at = Utc::now();
      session.points
    }))
  }

  async fn create_invite(
    &self,
    session_id: SessionId,
    profile: Profile,
  ) -> Result<InviteOutcome, Infallible> {
    let mut inner = self.inner.lock().unwrap();
    let taken = inner
      .sessions
      .values()
      .any(|s| s.username.as_deref() == Some(profile.username.as_str()));

    let Some(session) = inner.sessions.get_mut(&session_id) else {
      return Ok(InviteOutcome::SessionMissing);
    };
    if session.username.is_some() {
      return Ok(InviteOutcome::AlreadyNamed);
    }
    if taken {
      return Ok(InviteOutcome::UsernameTaken);
    }

    session.username = Some(profile.username);
    session.image_link = Some(profile.image_link);
    session.updated_at = Utc::now();
    let session = session.clone();

    let invite = Invite {
      invite_id:  InviteId::generate(),
      session_id,
      created_at: Utc::now(),
    };
    inner.invites.insert(invite.invite_id.clone(), invite.clone());
    Ok(InviteOutcome::Created { session, invite })
  }

  async fn get_invite(&self, id: InviteId) -> Result<Option<InviteView>, Infallible> {
    let inner = self.inner.lock().unwrap();
    Ok(inner.invites.get(&id).and_then(|invite| {
      inner.sessions.get(&invite.session_id).map(|session| InviteView {
        invite:  invite.clone(),
        session: session.clone(),
      })
    }))
  }
}
