//! Date windows, the bounded day ranges all event retrieval is scoped to.
//!
//! Two shapes exist: the calendar month around a reference date, and a fixed
//! 14-day "compact" strip starting at a reference date. Everything is plain
//! day arithmetic; no clock is consulted anywhere in this crate, the
//! reference date always arrives as a parameter.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Days spanned by [`DateWindow::compact_from`].
pub const COMPACT_WINDOW_DAYS: u64 = 14;

/// An inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
  pub from: NaiveDate,
  pub to:   NaiveDate,
}

impl DateWindow {
  /// The full calendar month containing `reference`.
  pub fn month_of(reference: NaiveDate) -> Self {
    let from = reference - Days::new(u64::from(reference.day0()));
    let to = from + Months::new(1) - Days::new(1);
    Self { from, to }
  }

  /// The fixed strip `[today, today + 13]`.
  pub fn compact_from(today: NaiveDate) -> Self {
    Self {
      from: today,
      to:   today + Days::new(COMPACT_WINDOW_DAYS - 1),
    }
  }

  /// Month window around `reference`, or the compact strip when `compact`.
  pub fn for_mode(reference: NaiveDate, compact: bool) -> Self {
    if compact {
      Self::compact_from(reference)
    } else {
      Self::month_of(reference)
    }
  }

  /// Both bounds are inclusive.
  pub fn contains(&self, day: NaiveDate) -> bool {
    self.from <= day && day <= self.to
  }

  /// Every day in the window, in order.
  pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
    let to = self.to;
    self.from.iter_days().take_while(move |day| *day <= to)
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
  }

  // ── Compact ─────────────────────────────────────────────────────────────

  #[test]
  fn compact_window_spans_exactly_fourteen_days() {
    let w = DateWindow::compact_from(d(2025, 6, 5));
    assert_eq!(w.from, d(2025, 6, 5));
    assert_eq!(w.to, d(2025, 6, 18));
    assert_eq!(w.days().count(), 14);
  }

  #[test]
  fn compact_window_crosses_month_boundary() {
    let w = DateWindow::compact_from(d(2025, 1, 25));
    assert_eq!(w.to, d(2025, 2, 7));
  }

  #[test]
  fn compact_window_crosses_year_boundary() {
    let w = DateWindow::compact_from(d(2025, 12, 28));
    assert_eq!(w.to, d(2026, 1, 10));
  }

  // ── Month ───────────────────────────────────────────────────────────────

  #[test]
  fn month_window_covers_first_through_last_day() {
    let w = DateWindow::month_of(d(2025, 3, 15));
    assert_eq!(w.from, d(2025, 3, 1));
    assert_eq!(w.to, d(2025, 3, 31));
    assert_eq!(w.days().count(), 31);
  }

  #[test]
  fn month_window_february_non_leap() {
    let w = DateWindow::month_of(d(2025, 2, 11));
    assert_eq!(w.from, d(2025, 2, 1));
    assert_eq!(w.to, d(2025, 2, 28));
    assert_eq!(w.days().count(), 28);
  }

  #[test]
  fn month_window_february_leap() {
    let w = DateWindow::month_of(d(2024, 2, 29));
    assert_eq!(w.from, d(2024, 2, 1));
    assert_eq!(w.to, d(2024, 2, 29));
    assert_eq!(w.days().count(), 29);
  }

  #[test]
  fn month_window_december_stays_in_year() {
    let w = DateWindow::month_of(d(2025, 12, 31));
    assert_eq!(w.from, d(2025, 12, 1));
    assert_eq!(w.to, d(2025, 12, 31));
  }

  // ── Mode dispatch and membership ────────────────────────────────────────

  #[test]
  fn for_mode_dispatches_on_compact_flag() {
    let reference = d(2025, 6, 5);
    assert_eq!(
      DateWindow::for_mode(reference, false),
      DateWindow::month_of(reference)
    );
    assert_eq!(
      DateWindow::for_mode(reference, true),
      DateWindow::compact_from(reference)
    );
  }

  #[test]
  fn contains_is_inclusive_on_both_ends() {
    let w = DateWindow::month_of(d(2025, 3, 15));
    assert!(w.contains(d(2025, 3, 1)));
    assert!(w.contains(d(2025, 3, 31)));
    assert!(!w.contains(d(2025, 2, 28)));
    assert!(!w.contains(d(2025, 4, 1)));
  }

  #[test]
  fn days_are_ordered_and_bounded() {
    let w = DateWindow::compact_from(d(2025, 2, 26));
    let days: Vec<_> = w.days().collect();
    assert_eq!(days.first(), Some(&w.from));
    assert_eq!(days.last(), Some(&w.to));
    assert!(days.windows(2).all(|pair| pair[0] < pair[1]));
  }
}
