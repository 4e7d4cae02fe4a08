//! Handler for the `/calendar` grid endpoint.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use waggle_core::{
  calendar::{CalendarGrid, CalendarViewModel},
  repo::EventRepository,
  store::TimelineStore,
};

use crate::{error::ApiError, events::parse_subject_ids};

#[derive(Debug, Deserialize)]
pub struct GridParams {
  /// Comma-separated subject ids to include.
  pub subject_ids: String,
  /// Anchor date for the window. Defaults to today.
  pub reference:   Option<NaiveDate>,
  /// If `true`, the window is the 14 days starting at `reference` instead of
  /// `reference`'s month.
  #[serde(default)]
  pub compact:     bool,
}

/// `GET /calendar?subject_ids=<csv>[&reference=<date>][&compact=true]`
///
/// Returns the bucketed grid: one entry per window day, empty or not.
pub async fn grid<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<GridParams>,
) -> Result<Json<CalendarGrid>, ApiError>
where
  S: TimelineStore,
{
  let subject_ids = parse_subject_ids(&params.subject_ids)?;
  let reference = params.reference.unwrap_or_else(|| Utc::now().date_naive());

  let grid = CalendarViewModel::new(EventRepository::new(store))
    .build_grid(&subject_ids, reference, params.compact)
    .await?;
  Ok(Json(grid))
}
