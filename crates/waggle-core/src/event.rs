//! Calendar event types, the unit of everything the calendar surfaces render.
//!
//! An event sits on a plain calendar day: `event_date` carries no timezone,
//! and two events share a day exactly when their dates are equal. The
//! optional `event_time` is display detail and never affects windowing.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Classification ──────────────────────────────────────────────────────────

/// The kind of health happening an event records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
  Vaccination,
  Veterinary,
  Grooming,
  Training,
  Reminder,
  Other,
}

/// Where an event sits in its life. New events always start `Upcoming`; the
/// patch path never touches this field.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
  #[default]
  Upcoming,
  Completed,
  Cancelled,
}

impl EventStatus {
  pub fn is_upcoming(&self) -> bool { matches!(self, Self::Upcoming) }
}

// ─── CalendarEvent ───────────────────────────────────────────────────────────

/// A scheduled health event for one subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEvent {
  pub event_id:    Uuid,
  pub subject_id:  Uuid,
  pub owner_id:    Uuid,
  pub title:       String,
  pub description: Option<String>,
  /// Calendar-day position; all windowing and bucketing compares this field.
  pub event_date:  NaiveDate,
  pub event_time:  Option<NaiveTime>,
  pub event_type:  EventType,
  pub status:      EventStatus,
  /// Server-assigned timestamp; never changes after creation.
  pub created_at:  DateTime<Utc>,
}

// ─── NewEvent ────────────────────────────────────────────────────────────────

/// Input to [`crate::repo::EventRepository::create`].
/// `event_id`, `status`, and `created_at` are always engine-assigned.
#[derive(Debug, Clone)]
pub struct NewEvent {
  pub subject_id:  Uuid,
  pub owner_id:    Uuid,
  pub title:       String,
  pub description: Option<String>,
  pub event_date:  NaiveDate,
  pub event_time:  Option<NaiveTime>,
  pub event_type:  EventType,
}

impl NewEvent {
  /// Convenience constructor with all optional fields left empty.
  pub fn new(
    subject_id: Uuid,
    owner_id: Uuid,
    title: impl Into<String>,
    event_date: NaiveDate,
    event_type: EventType,
  ) -> Self {
    Self {
      subject_id,
      owner_id,
      title: title.into(),
      description: None,
      event_date,
      event_time: None,
      event_type,
    }
  }
}

// ─── EventPatch ──────────────────────────────────────────────────────────────

/// Partial update for an event. A `None` field is left unchanged; a patch
/// cannot clear a previously-set value.
///
/// `status`, `subject_id`, and `owner_id` are deliberately absent.
#[derive(Debug, Clone, Default)]
pub struct EventPatch {
  pub title:       Option<String>,
  pub description: Option<String>,
  pub event_date:  Option<NaiveDate>,
  pub event_time:  Option<NaiveTime>,
  pub event_type:  Option<EventType>,
}

impl EventPatch {
  /// The patched copy of `event`.
  pub fn apply(&self, event: &CalendarEvent) -> CalendarEvent {
    let mut updated = event.clone();
    if let Some(title) = &self.title {
      updated.title = title.clone();
    }
    if let Some(description) = &self.description {
      updated.description = Some(description.clone());
    }
    if let Some(date) = self.event_date {
      updated.event_date = date;
    }
    if let Some(time) = self.event_time {
      updated.event_time = Some(time);
    }
    if let Some(event_type) = self.event_type {
      updated.event_type = event_type;
    }
    updated
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use chrono::{NaiveDate, Utc};
  use uuid::Uuid;

  use super::*;

  fn event(date: NaiveDate) -> CalendarEvent {
    CalendarEvent {
      event_id:    Uuid::new_v4(),
      subject_id:  Uuid::new_v4(),
      owner_id:    Uuid::new_v4(),
      title:       "Rabies booster".into(),
      description: Some("annual".into()),
      event_date:  date,
      event_time:  None,
      event_type:  EventType::Vaccination,
      status:      EventStatus::Upcoming,
      created_at:  Utc::now(),
    }
  }

  #[test]
  fn empty_patch_changes_nothing() {
    let original = event(NaiveDate::from_ymd_opt(2025, 3, 15).unwrap());
    let patched = EventPatch::default().apply(&original);
    assert_eq!(patched.title, original.title);
    assert_eq!(patched.description, original.description);
    assert_eq!(patched.event_date, original.event_date);
    assert_eq!(patched.event_type, original.event_type);
    assert_eq!(patched.status, original.status);
  }

  #[test]
  fn patch_rewrites_only_set_fields() {
    let original = event(NaiveDate::from_ymd_opt(2025, 3, 15).unwrap());
    let patch = EventPatch {
      title: Some("Lepto booster".into()),
      event_date: Some(NaiveDate::from_ymd_opt(2025, 3, 20).unwrap()),
      ..Default::default()
    };
    let patched = patch.apply(&original);
    assert_eq!(patched.title, "Lepto booster");
    assert_eq!(
      patched.event_date,
      NaiveDate::from_ymd_opt(2025, 3, 20).unwrap()
    );
    // Untouched fields survive.
    assert_eq!(patched.description.as_deref(), Some("annual"));
    assert_eq!(patched.event_id, original.event_id);
    assert_eq!(patched.created_at, original.created_at);
  }

  #[test]
  fn patch_never_touches_status() {
    let mut original = event(NaiveDate::from_ymd_opt(2025, 3, 15).unwrap());
    original.status = EventStatus::Completed;
    let patch = EventPatch {
      title: Some("renamed".into()),
      ..Default::default()
    };
    assert_eq!(patch.apply(&original).status, EventStatus::Completed);
  }
}
