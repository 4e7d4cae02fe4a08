//! JSON REST API for Waggle.
//!
//! Exposes an axum [`Router`] backed by any
//! [`waggle_core::store::TimelineStore`]. Auth, TLS, and transport concerns
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", waggle_api::api_router(store.clone()))
//! ```

pub mod calendar;
pub mod error;
pub mod events;
pub mod home;
pub mod medications;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use waggle_core::store::TimelineStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: TimelineStore + 'static,
{
  Router::new()
    // Events
    .route("/events", get(events::list::<S>).post(events::create::<S>))
    .route(
      "/events/{id}",
      get(events::get_one::<S>)
        .patch(events::update_one::<S>)
        .delete(events::delete_one::<S>),
    )
    // Medications
    .route(
      "/medications",
      get(medications::list::<S>).post(medications::create::<S>),
    )
    .route(
      "/medications/{id}",
      get(medications::get_one::<S>).delete(medications::delete_one::<S>),
    )
    .route(
      "/medications/{id}/deactivate",
      post(medications::deactivate_one::<S>),
    )
    .route(
      "/medications/{id}/reactivate",
      post(medications::reactivate_one::<S>),
    )
    // Views
    .route("/calendar", get(calendar::grid::<S>))
    .route("/home", get(home::summary::<S>))
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
  };
  use chrono::{Days, NaiveDate, Utc};
  use serde_json::{Value, json};
  use tower::ServiceExt as _;
  use uuid::Uuid;
  use waggle_store_sqlite::SqliteStore;

  use super::api_router;

  async fn router() -> Router<()> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    api_router(Arc::new(store))
  }

  async fn send(
    app: &Router<()>,
    method: &str,
    uri: &str,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
      Some(v) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(v.to_string()))
        .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
    };

    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
  }

  fn event_body(subject_id: Uuid, date: &str) -> Value {
    json!({
      "subject_id": subject_id,
      "owner_id": Uuid::new_v4(),
      "title": "Rabies booster",
      "event_date": date,
      "event_type": "vaccination",
    })
  }

  fn medication_body(subject_id: Uuid) -> Value {
    json!({
      "subject_id": subject_id,
      "owner_id": Uuid::new_v4(),
      "medication_name": "Amoxicillin",
      "dosage_detail": "250mg",
      "frequency": "twice daily",
      "start_date": "2025-03-01",
    })
  }

  // ── Events ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_event_returns_201_and_stored_record() {
    let app = router().await;
    let subject_id = Uuid::new_v4();

    let (status, body) = send(
      &app,
      "POST",
      "/events",
      Some(event_body(subject_id, "2025-03-15")),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["title"], "Rabies booster");
    assert_eq!(body["status"], "upcoming");
    assert_eq!(body["event_date"], "2025-03-15");
    assert!(body["event_id"].as_str().is_some());
  }

  #[tokio::test]
  async fn create_event_with_blank_title_is_400() {
    let app = router().await;
    let mut body = event_body(Uuid::new_v4(), "2025-03-15");
    body["title"] = json!("   ");

    let (status, resp) = send(&app, "POST", "/events", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(resp["error"].as_str().unwrap().contains("title"));
  }

  #[tokio::test]
  async fn get_missing_event_is_404() {
    let app = router().await;
    let (status, body) =
      send(&app, "GET", &format!("/events/{}", Uuid::new_v4()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("not found"));
  }

  #[tokio::test]
  async fn patch_event_updates_only_sent_fields() {
    let app = router().await;
    let (_, created) = send(
      &app,
      "POST",
      "/events",
      Some(event_body(Uuid::new_v4(), "2025-03-15")),
    )
    .await;
    let id = created["event_id"].as_str().unwrap();

    let (status, updated) = send(
      &app,
      "PATCH",
      &format!("/events/{id}"),
      Some(json!({ "title": "Lepto booster" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Lepto booster");
    assert_eq!(updated["event_date"], "2025-03-15");
    assert_eq!(updated["status"], "upcoming");

    let (_, fetched) = send(&app, "GET", &format!("/events/{id}"), None).await;
    assert_eq!(fetched["title"], "Lepto booster");
  }

  #[tokio::test]
  async fn delete_event_then_get_is_404() {
    let app = router().await;
    let (_, created) = send(
      &app,
      "POST",
      "/events",
      Some(event_body(Uuid::new_v4(), "2025-03-15")),
    )
    .await;
    let id = created["event_id"].as_str().unwrap();

    let (status, body) =
      send(&app, "DELETE", &format!("/events/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = send(&app, "GET", &format!("/events/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) =
      send(&app, "DELETE", &format!("/events/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn list_events_scopes_by_subject_and_window() {
    let app = router().await;
    let rex = Uuid::new_v4();
    let fido = Uuid::new_v4();

    for (subject, date) in [
      (rex, "2025-03-10"),
      (rex, "2025-06-01"),
      (fido, "2025-03-12"),
    ] {
      let (status, _) =
        send(&app, "POST", "/events", Some(event_body(subject, date))).await;
      assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(
      &app,
      "GET",
      &format!("/events?subject_ids={rex}&from=2025-03-01&to=2025-03-31"),
      None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let listed = body.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["event_date"], "2025-03-10");
  }

  #[tokio::test]
  async fn invalid_subject_ids_are_rejected() {
    let app = router().await;
    let (status, body) = send(
      &app,
      "GET",
      "/events?subject_ids=not-a-uuid&from=2025-03-01&to=2025-03-31",
      None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("subject id"));
  }

  // ── Medications ─────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_medication_derives_end_date_from_duration() {
    let app = router().await;
    let mut body = medication_body(Uuid::new_v4());
    body["duration_days"] = json!(10);

    let (status, created) =
      send(&app, "POST", "/medications", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["end_date"], "2025-03-11");
    assert_eq!(created["duration_days"], 10);
    assert_eq!(created["active"], true);
  }

  #[tokio::test]
  async fn list_medications_newest_course_first() {
    let app = router().await;
    let rex = Uuid::new_v4();

    for start in ["2025-03-01", "2025-03-10", "2025-03-05"] {
      let mut body = medication_body(rex);
      body["start_date"] = json!(start);
      send(&app, "POST", "/medications", Some(body)).await;
    }

    let (status, body) = send(
      &app,
      "GET",
      &format!("/medications?subject_id={rex}"),
      None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let starts: Vec<_> = body
      .as_array()
      .unwrap()
      .iter()
      .map(|m| m["start_date"].as_str().unwrap().to_owned())
      .collect();
    assert_eq!(starts, vec!["2025-03-10", "2025-03-05", "2025-03-01"]);
  }

  #[tokio::test]
  async fn medication_lifecycle_roundtrip() {
    let app = router().await;
    let (_, created) = send(
      &app,
      "POST",
      "/medications",
      Some(medication_body(Uuid::new_v4())),
    )
    .await;
    let id = created["medication_id"].as_str().unwrap();

    let (status, stopped) = send(
      &app,
      "POST",
      &format!("/medications/{id}/deactivate"),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stopped["active"], false);
    assert_eq!(stopped["start_date"], "2025-03-01");

    // A second deactivation is a validation failure.
    let (status, body) = send(
      &app,
      "POST",
      &format!("/medications/{id}/deactivate"),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("already inactive"));

    let (status, restarted) = send(
      &app,
      "POST",
      &format!("/medications/{id}/reactivate"),
      Some(json!({ "end_date": "2099-01-01" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(restarted["active"], true);
    assert_eq!(restarted["end_date"], "2099-01-01");

    // The course restarts from the server's today: whatever that was, the
    // stored duration spans start to end exactly.
    let start: NaiveDate = restarted["start_date"]
      .as_str()
      .unwrap()
      .parse()
      .unwrap();
    let end = NaiveDate::from_ymd_opt(2099, 1, 1).unwrap();
    let duration = restarted["duration_days"].as_u64().unwrap();
    assert_eq!((end - start).num_days() as u64, duration);
  }

  #[tokio::test]
  async fn reactivate_with_past_end_date_is_400() {
    let app = router().await;
    let (_, created) = send(
      &app,
      "POST",
      "/medications",
      Some(medication_body(Uuid::new_v4())),
    )
    .await;
    let id = created["medication_id"].as_str().unwrap();
    send(
      &app,
      "POST",
      &format!("/medications/{id}/deactivate"),
      None,
    )
    .await;

    let (status, body) = send(
      &app,
      "POST",
      &format!("/medications/{id}/reactivate"),
      Some(json!({ "end_date": "2000-01-01" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
      body["error"]
        .as_str()
        .unwrap()
        .contains("end date must be today or later")
    );

    // The record is left untouched by the failed transition.
    let (_, fetched) =
      send(&app, "GET", &format!("/medications/{id}"), None).await;
    assert_eq!(fetched["active"], false);
    assert_eq!(fetched["start_date"], "2025-03-01");
  }

  #[tokio::test]
  async fn reactivate_active_medication_is_400() {
    let app = router().await;
    let (_, created) = send(
      &app,
      "POST",
      "/medications",
      Some(medication_body(Uuid::new_v4())),
    )
    .await;
    let id = created["medication_id"].as_str().unwrap();

    let (status, body) = send(
      &app,
      "POST",
      &format!("/medications/{id}/reactivate"),
      Some(json!({ "end_date": "2099-01-01" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("already active"));
  }

  // ── Views ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn calendar_grid_has_a_bucket_for_every_window_day() {
    let app = router().await;
    let rex = Uuid::new_v4();
    send(
      &app,
      "POST",
      "/events",
      Some(event_body(rex, "2025-03-15")),
    )
    .await;

    let (status, body) = send(
      &app,
      "GET",
      &format!("/calendar?subject_ids={rex}&reference=2025-03-01"),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let days = body["days"].as_object().unwrap();
    assert_eq!(days.len(), 31);
    assert_eq!(days["2025-03-15"].as_array().unwrap().len(), 1);
    assert_eq!(days["2025-03-14"].as_array().unwrap().len(), 0);

    let (_, compact) = send(
      &app,
      "GET",
      &format!("/calendar?subject_ids={rex}&reference=2025-03-10&compact=true"),
      None,
    )
    .await;
    assert_eq!(compact["days"].as_object().unwrap().len(), 14);
    assert_eq!(
      compact["days"]["2025-03-15"].as_array().unwrap().len(),
      1
    );
  }

  #[tokio::test]
  async fn home_summary_combines_medications_and_events() {
    let app = router().await;
    let rex = Uuid::new_v4();
    let today = Utc::now().date_naive();

    send(&app, "POST", "/medications", Some(medication_body(rex))).await;
    for offset in [1, 2, 3] {
      let date = (today + Days::new(offset)).to_string();
      send(&app, "POST", "/events", Some(event_body(rex, &date))).await;
    }

    let (status, body) = send(
      &app,
      "GET",
      &format!("/home?subject_ids={rex}&limit=2"),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let medications = body["active_medications"].as_array().unwrap();
    assert_eq!(medications.len(), 1);
    assert_eq!(medications[0]["medication"]["medication_name"], "Amoxicillin");
    assert_eq!(medications[0]["days_remaining"], Value::Null);

    let events = body["upcoming_events"].as_array().unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(
      events[0]["event_date"],
      (today + Days::new(1)).to_string()
    );
  }
}
