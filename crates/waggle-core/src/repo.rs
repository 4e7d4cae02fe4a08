//! Repositories, the engine's gatekeepers around a [`TimelineStore`].
//!
//! All validation, identity assignment, ordering, and error classification
//! happens here. Stores stay dumb; layers above (view models, aggregators,
//! the HTTP surface) never talk to a store directly.
//!
//! Every mutation returns the authoritative post-mutation record. Views are
//! re-derived by the caller afterwards; nothing here invalidates or refreshes
//! anything.

use std::sync::Arc;

use chrono::{Days, NaiveDate, Utc};
use uuid::Uuid;

use crate::{
  Error, Result,
  event::{CalendarEvent, EventPatch, EventStatus, NewEvent},
  lifecycle::StatusChange,
  medication::{Medication, NewMedication},
  store::TimelineStore,
  window::DateWindow,
};

// ─── Validation helpers ──────────────────────────────────────────────────────

/// Reject required text fields that are empty after trimming.
fn require_text(field: &str, value: &str) -> Result<()> {
  if value.trim().is_empty() {
    return Err(Error::Validation(format!("{field} must not be blank")));
  }
  Ok(())
}

/// `start + days`, as a validation failure instead of a panic when the result
/// leaves the representable date range.
fn course_end(start: NaiveDate, days: u32) -> Result<NaiveDate> {
  start
    .checked_add_days(Days::new(u64::from(days)))
    .ok_or_else(|| Error::Validation("course end date out of range".into()))
}

// ─── EventRepository ─────────────────────────────────────────────────────────

/// Scoped access to calendar events.
///
/// Stateless between calls; cloning is cheap.
#[derive(Clone)]
pub struct EventRepository<S> {
  store: Arc<S>,
}

impl<S: TimelineStore> EventRepository<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// All events for `subject_ids` inside `window`, ascending by date.
  /// Events on the same day keep store order.
  ///
  /// An empty `subject_ids` list yields an empty result without touching the
  /// store.
  pub async fn list(
    &self,
    subject_ids: &[Uuid],
    window: DateWindow,
  ) -> Result<Vec<CalendarEvent>> {
    if subject_ids.is_empty() {
      return Ok(Vec::new());
    }
    let mut events = self
      .store
      .list_events(subject_ids, window.from, window.to)
      .await
      .map_err(Error::persistence)?;
    events.sort_by_key(|e| e.event_date);
    Ok(events)
  }

  pub async fn get(&self, id: Uuid) -> Result<Option<CalendarEvent>> {
    self.store.get_event(id).await.map_err(Error::persistence)
  }

  /// Validate and persist a new event. Returns the stored record.
  pub async fn create(&self, input: NewEvent) -> Result<CalendarEvent> {
    require_text("title", &input.title)?;

    let event = CalendarEvent {
      event_id:    Uuid::new_v4(),
      subject_id:  input.subject_id,
      owner_id:    input.owner_id,
      title:       input.title,
      description: input.description,
      event_date:  input.event_date,
      event_time:  input.event_time,
      event_type:  input.event_type,
      status:      EventStatus::Upcoming,
      created_at:  Utc::now(),
    };
    self
      .store
      .insert_event(event)
      .await
      .map_err(Error::persistence)
  }

  /// Apply `patch` and return the updated record.
  pub async fn update(
    &self,
    id: Uuid,
    patch: &EventPatch,
  ) -> Result<CalendarEvent> {
    if let Some(title) = &patch.title {
      require_text("title", title)?;
    }
    self
      .store
      .update_event(id, patch)
      .await
      .map_err(Error::persistence)?
      .ok_or(Error::EventNotFound(id))
  }

  /// Delete an event. Deleting an unknown id is an error.
  pub async fn delete(&self, id: Uuid) -> Result<()> {
    let deleted = self
      .store
      .delete_event(id)
      .await
      .map_err(Error::persistence)?;
    if !deleted {
      return Err(Error::EventNotFound(id));
    }
    Ok(())
  }
}

// ─── MedicationRepository ────────────────────────────────────────────────────

/// Scoped access to medication records.
#[derive(Clone)]
pub struct MedicationRepository<S> {
  store: Arc<S>,
}

impl<S: TimelineStore> MedicationRepository<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// All medication records for one subject, newest course first
  /// (descending `start_date`; ties keep store order).
  pub async fn list(&self, subject_id: Uuid) -> Result<Vec<Medication>> {
    let mut medications = self
      .store
      .list_medications(subject_id)
      .await
      .map_err(Error::persistence)?;
    medications.sort_by(|a, b| b.start_date.cmp(&a.start_date));
    Ok(medications)
  }

  pub async fn get(&self, id: Uuid) -> Result<Option<Medication>> {
    self
      .store
      .get_medication(id)
      .await
      .map_err(Error::persistence)
  }

  /// Validate and persist a new medication record.
  ///
  /// When `duration_days` is supplied the end date is derived as
  /// `start_date + duration_days`, superseding any caller-supplied
  /// `end_date`. A bare `end_date` must not precede `start_date`.
  pub async fn create(&self, input: NewMedication) -> Result<Medication> {
    require_text("medication_name", &input.medication_name)?;
    require_text("dosage_detail", &input.dosage_detail)?;
    require_text("frequency", &input.frequency)?;

    let end_date = match input.duration_days {
      Some(days) => Some(course_end(input.start_date, days)?),
      None => {
        if let Some(end) = input.end_date
          && end < input.start_date
        {
          return Err(Error::Validation(
            "end date must not precede start date".into(),
          ));
        }
        input.end_date
      }
    };

    let medication = Medication {
      medication_id:   Uuid::new_v4(),
      subject_id:      input.subject_id,
      owner_id:        input.owner_id,
      medication_name: input.medication_name,
      dosage_detail:   input.dosage_detail,
      frequency:       input.frequency,
      start_date:      input.start_date,
      duration_days:   input.duration_days,
      end_date,
      notes:           input.notes,
      active:          true,
      created_at:      Utc::now(),
    };
    self
      .store
      .insert_medication(medication)
      .await
      .map_err(Error::persistence)
  }

  /// Apply a status transition. The precondition checks live in
  /// [`crate::lifecycle::MedicationLifecycle`], the only caller.
  pub(crate) async fn apply_status(
    &self,
    id: Uuid,
    change: &StatusChange,
  ) -> Result<Medication> {
    self
      .store
      .update_medication_status(id, change)
      .await
      .map_err(Error::persistence)?
      .ok_or(Error::MedicationNotFound(id))
  }

  /// Delete a medication record. Deleting an unknown id is an error.
  pub async fn delete(&self, id: Uuid) -> Result<()> {
    let deleted = self
      .store
      .delete_medication(id)
      .await
      .map_err(Error::persistence)?;
    if !deleted {
      return Err(Error::MedicationNotFound(id));
    }
    Ok(())
  }
}
