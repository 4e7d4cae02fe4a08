//! Medication lifecycle, the only write path that touches `active`.
//!
//! A medication moves between exactly two statuses. Deactivation flips the
//! flag and preserves every other field. Reactivation restarts the course
//! from today: it requires a fresh end date no earlier than today and
//! rewrites `start_date`, `end_date`, and `duration_days` together.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
  Error, Result, medication::Medication, repo::MedicationRepository,
  store::TimelineStore,
};

// ─── Transition record ───────────────────────────────────────────────────────

/// The persisted outcome of a lifecycle transition.
///
/// Stores apply one of these verbatim; every precondition has already been
/// checked by the time it is produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusChange {
  /// `active = false`; all other fields untouched.
  Deactivate,
  /// `active = true` with the course dates rewritten.
  Reactivate {
    start_date:    NaiveDate,
    end_date:      NaiveDate,
    duration_days: u32,
  },
}

// ─── Lifecycle ───────────────────────────────────────────────────────────────

/// State-machine wrapper around [`MedicationRepository`].
#[derive(Clone)]
pub struct MedicationLifecycle<S> {
  medications: MedicationRepository<S>,
}

impl<S: TimelineStore> MedicationLifecycle<S> {
  pub fn new(medications: MedicationRepository<S>) -> Self {
    Self { medications }
  }

  async fn fetch(&self, id: Uuid) -> Result<Medication> {
    self
      .medications
      .get(id)
      .await?
      .ok_or(Error::MedicationNotFound(id))
  }

  /// Active → Inactive. Only the `active` flag changes.
  pub async fn deactivate(&self, id: Uuid) -> Result<Medication> {
    let current = self.fetch(id).await?;
    if !current.active {
      return Err(Error::AlreadyInactive(id));
    }
    self
      .medications
      .apply_status(id, &StatusChange::Deactivate)
      .await
  }

  /// Inactive → Active, restarting the course from `today`.
  ///
  /// `end_date` must be today or later; when the check fails the stored
  /// record is left untouched. On success the course runs `[today, end_date]`
  /// and `duration_days` is the whole-day span between the two.
  pub async fn reactivate(
    &self,
    id: Uuid,
    end_date: NaiveDate,
    today: NaiveDate,
  ) -> Result<Medication> {
    let current = self.fetch(id).await?;
    if current.active {
      return Err(Error::AlreadyActive(id));
    }
    if end_date < today {
      return Err(Error::Validation("end date must be today or later".into()));
    }

    let change = StatusChange::Reactivate {
      start_date:    today,
      end_date,
      duration_days: (end_date - today).num_days() as u32,
    };
    self.medications.apply_status(id, &change).await
  }
}
