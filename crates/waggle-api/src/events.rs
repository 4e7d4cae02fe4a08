//! Handlers for `/events` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/events` | `?subject_ids=<csv>&from=<date>&to=<date>` |
//! | `POST`   | `/events` | Body: [`NewEventBody`]; returns 201 + stored event |
//! | `GET`    | `/events/:id` | Single event |
//! | `PATCH`  | `/events/:id` | Body: [`EventPatchBody`]; returns updated event |
//! | `DELETE` | `/events/:id` | Returns 204 |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use uuid::Uuid;
use waggle_core::{
  Error,
  event::{CalendarEvent, EventPatch, EventType, NewEvent},
  repo::EventRepository,
  store::TimelineStore,
  window::DateWindow,
};

use crate::error::ApiError;

/// Parse the comma-separated `subject_ids` query parameter. Blank segments
/// are skipped, so a trailing comma is harmless.
pub(crate) fn parse_subject_ids(raw: &str) -> Result<Vec<Uuid>, ApiError> {
  raw
    .split(',')
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(|s| {
      Uuid::parse_str(s)
        .map_err(|_| ApiError::BadRequest(format!("invalid subject id: {s:?}")))
    })
    .collect()
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// Comma-separated subject ids to include.
  pub subject_ids: String,
  /// First day of the window, inclusive.
  pub from:        NaiveDate,
  /// Last day of the window, inclusive.
  pub to:          NaiveDate,
}

/// `GET /events?subject_ids=<id,id>&from=<date>&to=<date>`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<CalendarEvent>>, ApiError>
where
  S: TimelineStore,
{
  let subject_ids = parse_subject_ids(&params.subject_ids)?;
  let window = DateWindow {
    from: params.from,
    to:   params.to,
  };
  let events = EventRepository::new(store)
    .list(&subject_ids, window)
    .await?;
  Ok(Json(events))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /events/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<CalendarEvent>, ApiError>
where
  S: TimelineStore,
{
  let event = EventRepository::new(store)
    .get(id)
    .await?
    .ok_or(Error::EventNotFound(id))?;
  Ok(Json(event))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /events`.
#[derive(Debug, Deserialize)]
pub struct NewEventBody {
  pub subject_id:  Uuid,
  pub owner_id:    Uuid,
  pub title:       String,
  pub description: Option<String>,
  pub event_date:  NaiveDate,
  pub event_time:  Option<NaiveTime>,
  pub event_type:  EventType,
}

impl From<NewEventBody> for NewEvent {
  fn from(b: NewEventBody) -> Self {
    NewEvent {
      subject_id:  b.subject_id,
      owner_id:    b.owner_id,
      title:       b.title,
      description: b.description,
      event_date:  b.event_date,
      event_time:  b.event_time,
      event_type:  b.event_type,
    }
  }
}

/// `POST /events`: returns 201 + the stored event.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewEventBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: TimelineStore,
{
  let event = EventRepository::new(store)
    .create(NewEvent::from(body))
    .await?;
  Ok((StatusCode::CREATED, Json(event)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `PATCH /events/:id`. Absent fields are left
/// unchanged; `status` is not patchable.
#[derive(Debug, Deserialize)]
pub struct EventPatchBody {
  pub title:       Option<String>,
  pub description: Option<String>,
  pub event_date:  Option<NaiveDate>,
  pub event_time:  Option<NaiveTime>,
  pub event_type:  Option<EventType>,
}

impl From<EventPatchBody> for EventPatch {
  fn from(b: EventPatchBody) -> Self {
    EventPatch {
      title:       b.title,
      description: b.description,
      event_date:  b.event_date,
      event_time:  b.event_time,
      event_type:  b.event_type,
    }
  }
}

/// `PATCH /events/:id`: returns the updated event.
pub async fn update_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<EventPatchBody>,
) -> Result<Json<CalendarEvent>, ApiError>
where
  S: TimelineStore,
{
  let event = EventRepository::new(store)
    .update(id, &EventPatch::from(body))
    .await?;
  Ok(Json(event))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /events/:id`: returns 204. Deleting an unknown id is a 404.
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: TimelineStore,
{
  EventRepository::new(store).delete(id).await?;
  Ok(StatusCode::NO_CONTENT)
}
