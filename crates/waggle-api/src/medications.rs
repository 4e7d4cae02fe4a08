//! Handlers for `/medications` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/medications` | `?subject_id` required |
//! | `POST`   | `/medications` | Body: [`NewMedicationBody`]; returns 201 + stored record |
//! | `GET`    | `/medications/:id` | Single record |
//! | `DELETE` | `/medications/:id` | Returns 204 |
//! | `POST`   | `/medications/:id/deactivate` | No body; returns stopped record |
//! | `POST`   | `/medications/:id/reactivate` | Body: `{"end_date":"..."}`; returns restarted record |
//!
//! Lifecycle transitions resolve "today" from the server clock; the engine
//! itself never consults a clock for them.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;
use waggle_core::{
  Error,
  lifecycle::MedicationLifecycle,
  medication::{Medication, NewMedication},
  repo::MedicationRepository,
  store::TimelineStore,
};

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// Required: the subject whose medication records to return.
  pub subject_id: Uuid,
}

/// `GET /medications?subject_id=<id>`: newest course first.
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Medication>>, ApiError>
where
  S: TimelineStore,
{
  let medications = MedicationRepository::new(store)
    .list(params.subject_id)
    .await?;
  Ok(Json(medications))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /medications/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Medication>, ApiError>
where
  S: TimelineStore,
{
  let medication = MedicationRepository::new(store)
    .get(id)
    .await?
    .ok_or(Error::MedicationNotFound(id))?;
  Ok(Json(medication))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /medications`.
///
/// When `duration_days` is present the stored `end_date` is derived from it,
/// overriding any `end_date` sent here.
#[derive(Debug, Deserialize)]
pub struct NewMedicationBody {
  pub subject_id:      Uuid,
  pub owner_id:        Uuid,
  pub medication_name: String,
  pub dosage_detail:   String,
  pub frequency:       String,
  pub start_date:      NaiveDate,
  pub duration_days:   Option<u32>,
  pub end_date:        Option<NaiveDate>,
  pub notes:           Option<String>,
}

impl From<NewMedicationBody> for NewMedication {
  fn from(b: NewMedicationBody) -> Self {
    NewMedication {
      subject_id:      b.subject_id,
      owner_id:        b.owner_id,
      medication_name: b.medication_name,
      dosage_detail:   b.dosage_detail,
      frequency:       b.frequency,
      start_date:      b.start_date,
      duration_days:   b.duration_days,
      end_date:        b.end_date,
      notes:           b.notes,
    }
  }
}

/// `POST /medications`: returns 201 + the stored record.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewMedicationBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: TimelineStore,
{
  let medication = MedicationRepository::new(store)
    .create(NewMedication::from(body))
    .await?;
  Ok((StatusCode::CREATED, Json(medication)))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /medications/:id`: returns 204. Deleting an unknown id is a 404.
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: TimelineStore,
{
  MedicationRepository::new(store).delete(id).await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Deactivate ───────────────────────────────────────────────────────────────

/// `POST /medications/:id/deactivate`: returns the stopped record.
pub async fn deactivate_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Medication>, ApiError>
where
  S: TimelineStore,
{
  let lifecycle = MedicationLifecycle::new(MedicationRepository::new(store));
  let medication = lifecycle.deactivate(id).await?;
  Ok(Json(medication))
}

// ─── Reactivate ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ReactivateBody {
  /// New course end; must be today or later.
  pub end_date: NaiveDate,
}

/// `POST /medications/:id/reactivate`: restarts the course from today and
/// returns the updated record.
pub async fn reactivate_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<ReactivateBody>,
) -> Result<Json<Medication>, ApiError>
where
  S: TimelineStore,
{
  let today = Utc::now().date_naive();
  let lifecycle = MedicationLifecycle::new(MedicationRepository::new(store));
  let medication = lifecycle.reactivate(id, body.end_date, today).await?;
  Ok(Json(medication))
}
