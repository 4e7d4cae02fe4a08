//! The `TimelineStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `waggle-store-sqlite`).
//! Higher layers depend on this abstraction, not on any concrete backend, and
//! never call it directly: the repositories in [`crate::repo`] are the only
//! callers.
//!
//! The store holds no business rules. Methods take fully-built records,
//! return exactly what the backend holds, and report absence with `None` or
//! `false` instead of errors; classification into the engine's error
//! vocabulary happens in the repositories.

use std::future::Future;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
  event::{CalendarEvent, EventPatch},
  lifecycle::StatusChange,
  medication::Medication,
};

/// Abstraction over a timeline storage backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait TimelineStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Calendar events ─────────────────────────────────────────────────────

  /// All events for any of `subject_ids` with `event_date` in `[from, to]`
  /// inclusive. Order is unspecified.
  fn list_events<'a>(
    &'a self,
    subject_ids: &'a [Uuid],
    from: NaiveDate,
    to: NaiveDate,
  ) -> impl Future<Output = Result<Vec<CalendarEvent>, Self::Error>> + Send + 'a;

  /// Retrieve an event by id. Returns `None` if not found.
  fn get_event(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<CalendarEvent>, Self::Error>> + Send + '_;

  /// Persist a fully-built event and echo it back.
  fn insert_event(
    &self,
    event: CalendarEvent,
  ) -> impl Future<Output = Result<CalendarEvent, Self::Error>> + Send + '_;

  /// Apply `patch` to the stored event. Returns the updated record, or
  /// `None` if `id` does not exist.
  fn update_event<'a>(
    &'a self,
    id: Uuid,
    patch: &'a EventPatch,
  ) -> impl Future<Output = Result<Option<CalendarEvent>, Self::Error>> + Send + 'a;

  /// Delete an event. Returns `false` if `id` did not exist.
  fn delete_event(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Medications ─────────────────────────────────────────────────────────

  /// All medication records for one subject. Order is unspecified.
  fn list_medications(
    &self,
    subject_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Medication>, Self::Error>> + Send + '_;

  /// Retrieve a medication by id. Returns `None` if not found.
  fn get_medication(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Medication>, Self::Error>> + Send + '_;

  /// Persist a fully-built medication record and echo it back.
  fn insert_medication(
    &self,
    medication: Medication,
  ) -> impl Future<Output = Result<Medication, Self::Error>> + Send + '_;

  /// Apply a status transition verbatim. Returns the updated record, or
  /// `None` if `id` does not exist.
  fn update_medication_status<'a>(
    &'a self,
    id: Uuid,
    change: &'a StatusChange,
  ) -> impl Future<Output = Result<Option<Medication>, Self::Error>> + Send + 'a;

  /// Delete a medication record. Returns `false` if `id` did not exist.
  fn delete_medication(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
