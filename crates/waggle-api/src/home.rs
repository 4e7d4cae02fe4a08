//! Handler for the `/home` summary endpoint.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use chrono::Utc;
use serde::Deserialize;
use waggle_core::{
  calendar::DEFAULT_UPCOMING_LIMIT,
  home::{HomeAggregator, HomeSummary},
  repo::{EventRepository, MedicationRepository},
  store::TimelineStore,
};

use crate::{error::ApiError, events::parse_subject_ids};

#[derive(Debug, Deserialize)]
pub struct SummaryParams {
  /// Comma-separated subject ids to include.
  pub subject_ids: String,
  /// Cap on the upcoming-events strip. Defaults to
  /// [`DEFAULT_UPCOMING_LIMIT`].
  pub limit:       Option<usize>,
}

/// `GET /home?subject_ids=<csv>[&limit=<n>]`
///
/// Active medications (with countdowns as of today) plus the next few
/// upcoming events across all requested subjects.
pub async fn summary<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<SummaryParams>,
) -> Result<Json<HomeSummary>, ApiError>
where
  S: TimelineStore,
{
  let subject_ids = parse_subject_ids(&params.subject_ids)?;
  let today = Utc::now().date_naive();
  let limit = params.limit.unwrap_or(DEFAULT_UPCOMING_LIMIT);

  let aggregator = HomeAggregator::new(
    EventRepository::new(store.clone()),
    MedicationRepository::new(store),
  );
  let summary = aggregator.summary(&subject_ids, today, limit).await?;
  Ok(Json(summary))
}
