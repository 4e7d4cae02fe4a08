//! Medication types, one record per treatment course.
//!
//! A course is a mutable record with a single lifecycle flag. Deactivation
//! preserves every date field; reactivation rewrites them together (see
//! [`crate::lifecycle`]).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Medication ──────────────────────────────────────────────────────────────

/// A treatment course for one subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Medication {
  pub medication_id:   Uuid,
  pub subject_id:      Uuid,
  pub owner_id:        Uuid,
  pub medication_name: String,
  /// Free-text dose description, e.g. "250mg" or "one tablet".
  pub dosage_detail:   String,
  /// Free-text cadence, e.g. "twice daily".
  pub frequency:       String,
  pub start_date:      NaiveDate,
  /// Whole-day course length. When supplied at creation, `end_date` is
  /// derived from it.
  pub duration_days:   Option<u32>,
  pub end_date:        Option<NaiveDate>,
  pub notes:           Option<String>,
  pub active:          bool,
  /// Server-assigned timestamp; never changes after creation.
  pub created_at:      DateTime<Utc>,
}

// ─── NewMedication ───────────────────────────────────────────────────────────

/// Input to [`crate::repo::MedicationRepository::create`].
/// `medication_id`, `active`, and `created_at` are always engine-assigned.
#[derive(Debug, Clone)]
pub struct NewMedication {
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

impl NewMedication {
  /// Convenience constructor for an open-ended course (no duration, no end
  /// date, no notes).
  pub fn new(
    subject_id: Uuid,
    owner_id: Uuid,
    medication_name: impl Into<String>,
    dosage_detail: impl Into<String>,
    frequency: impl Into<String>,
    start_date: NaiveDate,
  ) -> Self {
    Self {
      subject_id,
      owner_id,
      medication_name: medication_name.into(),
      dosage_detail: dosage_detail.into(),
      frequency: frequency.into(),
      start_date,
      duration_days: None,
      end_date: None,
      notes: None,
    }
  }
}
