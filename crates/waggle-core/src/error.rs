//! Error types for `waggle-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("validation failed: {0}")]
  Validation(String),

  #[error("event not found: {0}")]
  EventNotFound(Uuid),

  #[error("medication not found: {0}")]
  MedicationNotFound(Uuid),

  #[error("medication {0} is already active")]
  AlreadyActive(Uuid),

  #[error("medication {0} is already inactive")]
  AlreadyInactive(Uuid),

  #[error("persistence error: {0}")]
  Persistence(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// The three failure classes callers branch on. Transport layers map these to
/// their own status vocabulary (HTTP 400/404/500).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  Validation,
  NotFound,
  Persistence,
}

impl Error {
  /// Wrap a backend failure. Used wherever a store error crosses into the
  /// engine.
  pub fn persistence(
    source: impl std::error::Error + Send + Sync + 'static,
  ) -> Self {
    Self::Persistence(Box::new(source))
  }

  pub fn kind(&self) -> ErrorKind {
    match self {
      // Precondition failures on lifecycle transitions are caller mistakes,
      // not missing data.
      Self::Validation(_) | Self::AlreadyActive(_) | Self::AlreadyInactive(_) => {
        ErrorKind::Validation
      }
      Self::EventNotFound(_) | Self::MedicationNotFound(_) => ErrorKind::NotFound,
      Self::Persistence(_) => ErrorKind::Persistence,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
