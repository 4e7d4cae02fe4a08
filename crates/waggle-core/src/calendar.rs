//! Calendar view derivation: the day grid and the upcoming strip.
//!
//! Both are rebuilt from repository data on every call; nothing here caches.
//! The grid is the day-keyed structure a month or compact calendar renders
//! directly. The upcoming strip is the short "what's next" list shown on
//! landing surfaces.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::{
  Result, event::CalendarEvent, repo::EventRepository, store::TimelineStore,
  window::DateWindow,
};

/// How many events [`upcoming`] returns when the caller does not say
/// otherwise.
pub const DEFAULT_UPCOMING_LIMIT: usize = 3;

// ─── Grid ────────────────────────────────────────────────────────────────────

/// A window's events bucketed by day.
///
/// Every day of the window has an entry, empty or not, so a renderer can walk
/// the map front to back without gap handling. Each event lands in exactly
/// one bucket, keyed by its exact `event_date`.
#[derive(Debug, Clone, Serialize)]
pub struct CalendarGrid {
  pub window: DateWindow,
  pub days:   BTreeMap<NaiveDate, Vec<CalendarEvent>>,
}

impl CalendarGrid {
  /// Bucket `events` into `window`'s days. Events dated outside the window
  /// are dropped; store queries are already window-scoped.
  pub fn from_events(window: DateWindow, events: Vec<CalendarEvent>) -> Self {
    let mut days: BTreeMap<NaiveDate, Vec<CalendarEvent>> =
      window.days().map(|day| (day, Vec::new())).collect();
    for event in events {
      if let Some(bucket) = days.get_mut(&event.event_date) {
        bucket.push(event);
      }
    }
    Self { window, days }
  }

  /// Events on `day`; empty when the day lies outside the window.
  pub fn on(&self, day: NaiveDate) -> &[CalendarEvent] {
    self.days.get(&day).map(Vec::as_slice).unwrap_or(&[])
  }

  /// Total events across all buckets.
  pub fn event_count(&self) -> usize {
    self.days.values().map(Vec::len).sum()
  }
}

// ─── Upcoming strip ──────────────────────────────────────────────────────────

/// The first `limit` events from `events` still to come as of `today`:
/// status `Upcoming`, dated today or later, soonest first (ties keep input
/// order).
///
/// Pure derivation; callers decide which fetched slice to feed in.
pub fn upcoming(
  events: &[CalendarEvent],
  today: NaiveDate,
  limit: usize,
) -> Vec<CalendarEvent> {
  let mut next: Vec<CalendarEvent> = events
    .iter()
    .filter(|e| e.status.is_upcoming() && e.event_date >= today)
    .cloned()
    .collect();
  next.sort_by_key(|e| e.event_date);
  next.truncate(limit);
  next
}

// ─── View model ──────────────────────────────────────────────────────────────

/// Builds calendar read models from repository data.
#[derive(Clone)]
pub struct CalendarViewModel<S> {
  events: EventRepository<S>,
}

impl<S: TimelineStore> CalendarViewModel<S> {
  pub fn new(events: EventRepository<S>) -> Self { Self { events } }

  /// Fetch and bucket one window's worth of events.
  ///
  /// `reference` picks the month, or starts the 14-day strip when `compact`.
  pub async fn build_grid(
    &self,
    subject_ids: &[Uuid],
    reference: NaiveDate,
    compact: bool,
  ) -> Result<CalendarGrid> {
    let window = DateWindow::for_mode(reference, compact);
    let events = self.events.list(subject_ids, window).await?;
    Ok(CalendarGrid::from_events(window, events))
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use uuid::Uuid;

  use super::*;
  use crate::event::{EventStatus, EventType};

  fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
  }

  fn event(date: NaiveDate, status: EventStatus) -> CalendarEvent {
    CalendarEvent {
      event_id:    Uuid::new_v4(),
      subject_id:  Uuid::new_v4(),
      owner_id:    Uuid::new_v4(),
      title:       "Checkup".into(),
      description: None,
      event_date:  date,
      event_time:  None,
      event_type:  EventType::Veterinary,
      status,
      created_at:  Utc::now(),
    }
  }

  // ── Grid ────────────────────────────────────────────────────────────────

  #[test]
  fn grid_has_a_bucket_for_every_window_day() {
    let window = DateWindow::month_of(d(2025, 3, 10));
    let grid = CalendarGrid::from_events(window, vec![]);
    assert_eq!(grid.days.len(), 31);
    assert!(grid.days.values().all(Vec::is_empty));
  }

  #[test]
  fn grid_buckets_by_exact_day() {
    let window = DateWindow::month_of(d(2025, 3, 10));
    let events = vec![
      event(d(2025, 3, 15), EventStatus::Upcoming),
      event(d(2025, 3, 15), EventStatus::Completed),
      event(d(2025, 3, 2), EventStatus::Upcoming),
    ];
    let grid = CalendarGrid::from_events(window, events);

    assert_eq!(grid.on(d(2025, 3, 15)).len(), 2);
    assert_eq!(grid.on(d(2025, 3, 2)).len(), 1);
    assert_eq!(grid.on(d(2025, 3, 3)).len(), 0);
  }

  #[test]
  fn grid_union_equals_input_and_nothing_is_duplicated() {
    let window = DateWindow::compact_from(d(2025, 6, 1));
    let events: Vec<_> = (0..10)
      .map(|i| event(d(2025, 6, 1 + (i % 14)), EventStatus::Upcoming))
      .collect();
    let mut input_ids: Vec<_> = events.iter().map(|e| e.event_id).collect();

    let grid = CalendarGrid::from_events(window, events);
    let mut bucketed_ids: Vec<_> = grid
      .days
      .values()
      .flatten()
      .map(|e| e.event_id)
      .collect();

    input_ids.sort();
    bucketed_ids.sort();
    assert_eq!(bucketed_ids, input_ids);
  }

  #[test]
  fn single_vaccination_in_march_grid() {
    // A March 2025 window with one vaccination on the 15th: 31 buckets,
    // exactly one of them occupied.
    let window = DateWindow::month_of(d(2025, 3, 1));
    let vaccination = event(d(2025, 3, 15), EventStatus::Upcoming);
    let id = vaccination.event_id;
    let grid = CalendarGrid::from_events(window, vec![vaccination]);

    assert_eq!(grid.days.len(), 31);
    assert_eq!(grid.event_count(), 1);
    assert_eq!(grid.on(d(2025, 3, 15))[0].event_id, id);
    let occupied = grid.days.values().filter(|b| !b.is_empty()).count();
    assert_eq!(occupied, 1);
  }

  // ── Upcoming ────────────────────────────────────────────────────────────

  #[test]
  fn upcoming_filters_status_and_past_dates() {
    let today = d(2025, 3, 10);
    let events = vec![
      event(d(2025, 3, 9), EventStatus::Upcoming),  // past
      event(d(2025, 3, 10), EventStatus::Upcoming), // today counts
      event(d(2025, 3, 11), EventStatus::Completed),
      event(d(2025, 3, 12), EventStatus::Cancelled),
      event(d(2025, 3, 13), EventStatus::Upcoming),
    ];
    let next = upcoming(&events, today, DEFAULT_UPCOMING_LIMIT);

    assert_eq!(next.len(), 2);
    assert_eq!(next[0].event_date, d(2025, 3, 10));
    assert_eq!(next[1].event_date, d(2025, 3, 13));
  }

  #[test]
  fn upcoming_sorts_ascending_and_truncates() {
    let today = d(2025, 3, 1);
    let events = vec![
      event(d(2025, 3, 20), EventStatus::Upcoming),
      event(d(2025, 3, 5), EventStatus::Upcoming),
      event(d(2025, 3, 12), EventStatus::Upcoming),
      event(d(2025, 3, 8), EventStatus::Upcoming),
    ];
    let next = upcoming(&events, today, 3);

    let dates: Vec<_> = next.iter().map(|e| e.event_date).collect();
    assert_eq!(dates, vec![d(2025, 3, 5), d(2025, 3, 8), d(2025, 3, 12)]);
  }

  #[test]
  fn upcoming_of_empty_input_is_empty() {
    assert!(upcoming(&[], d(2025, 3, 1), DEFAULT_UPCOMING_LIMIT).is_empty());
  }

  #[test]
  fn upcoming_keeps_input_order_for_same_day_events() {
    let today = d(2025, 3, 1);
    let first = event(d(2025, 3, 5), EventStatus::Upcoming);
    let second = event(d(2025, 3, 5), EventStatus::Upcoming);
    let (first_id, second_id) = (first.event_id, second.event_id);

    let next = upcoming(&[first, second], today, 5);
    assert_eq!(next[0].event_id, first_id);
    assert_eq!(next[1].event_id, second_id);
  }
}
