//! Home-screen aggregation, the cross-subject landing view.
//!
//! The aggregate is assembled client-side from per-subject queries; there is
//! no cross-subject store operation. Derived fields (`days_remaining`) are
//! computed against the caller's `today` and never persisted.

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::{
  Result, calendar,
  event::CalendarEvent,
  medication::Medication,
  repo::{EventRepository, MedicationRepository},
  store::TimelineStore,
  window::DateWindow,
};

// ─── Summaries ───────────────────────────────────────────────────────────────

/// One active treatment with its countdown.
#[derive(Debug, Clone, Serialize)]
pub struct MedicationSummary {
  pub medication:     Medication,
  /// Whole days until `end_date`, measured from the caller's `today`.
  /// `None` for open-ended courses; zero or negative once the course has
  /// run out.
  pub days_remaining: Option<i64>,
}

impl MedicationSummary {
  pub fn derive(medication: Medication, today: NaiveDate) -> Self {
    let days_remaining =
      medication.end_date.map(|end| (end - today).num_days());
    Self {
      medication,
      days_remaining,
    }
  }

  /// The course end date has arrived or passed.
  pub fn is_elapsed(&self) -> bool {
    matches!(self.days_remaining, Some(days) if days <= 0)
  }
}

/// Both halves of the landing view.
#[derive(Debug, Clone, Serialize)]
pub struct HomeSummary {
  pub active_medications: Vec<MedicationSummary>,
  pub upcoming_events:    Vec<CalendarEvent>,
}

// ─── Aggregator ──────────────────────────────────────────────────────────────

/// Assembles the home view from both repositories.
#[derive(Clone)]
pub struct HomeAggregator<S> {
  events:      EventRepository<S>,
  medications: MedicationRepository<S>,
}

impl<S: TimelineStore> HomeAggregator<S> {
  pub fn new(
    events: EventRepository<S>,
    medications: MedicationRepository<S>,
  ) -> Self {
    Self {
      events,
      medications,
    }
  }

  /// Active treatments across `subject_ids`, newest course first.
  ///
  /// One repository query per subject, merged here.
  pub async fn active_medications(
    &self,
    subject_ids: &[Uuid],
    today: NaiveDate,
  ) -> Result<Vec<MedicationSummary>> {
    let mut merged = Vec::new();
    for &subject_id in subject_ids {
      let medications = self.medications.list(subject_id).await?;
      merged.extend(medications.into_iter().filter(|m| m.active));
    }
    merged.sort_by(|a, b| b.start_date.cmp(&a.start_date));

    Ok(
      merged
        .into_iter()
        .map(|m| MedicationSummary::derive(m, today))
        .collect(),
    )
  }

  /// The next `limit` events across `subject_ids`, looking 14 days out from
  /// `today`.
  pub async fn upcoming_events(
    &self,
    subject_ids: &[Uuid],
    today: NaiveDate,
    limit: usize,
  ) -> Result<Vec<CalendarEvent>> {
    let window = DateWindow::compact_from(today);
    let events = self.events.list(subject_ids, window).await?;
    Ok(calendar::upcoming(&events, today, limit))
  }

  /// Both halves of the landing view in one call.
  pub async fn summary(
    &self,
    subject_ids: &[Uuid],
    today: NaiveDate,
    limit: usize,
  ) -> Result<HomeSummary> {
    Ok(HomeSummary {
      active_medications: self.active_medications(subject_ids, today).await?,
      upcoming_events:    self.upcoming_events(subject_ids, today, limit).await?,
    })
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
