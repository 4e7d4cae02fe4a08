//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, dates as `YYYY-MM-DD`, times as
//! `HH:MM:SS`, UUIDs as hyphenated lowercase strings, and enums as their
//! lowercase discriminants.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;
use waggle_core::{
  event::{CalendarEvent, EventStatus, EventType},
  medication::Medication,
};

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveTime ───────────────────────────────────────────────────────────────

pub fn encode_time(t: NaiveTime) -> String { t.format("%H:%M:%S").to_string() }

pub fn decode_time(s: &str) -> Result<NaiveTime> {
  NaiveTime::parse_from_str(s, "%H:%M:%S")
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── EventType ───────────────────────────────────────────────────────────────

pub fn encode_event_type(t: EventType) -> &'static str {
  match t {
    EventType::Vaccination => "vaccination",
    EventType::Veterinary => "veterinary",
    EventType::Grooming => "grooming",
    EventType::Training => "training",
    EventType::Reminder => "reminder",
    EventType::Other => "other",
  }
}

pub fn decode_event_type(s: &str) -> Result<EventType> {
  match s {
    "vaccination" => Ok(EventType::Vaccination),
    "veterinary" => Ok(EventType::Veterinary),
    "grooming" => Ok(EventType::Grooming),
    "training" => Ok(EventType::Training),
    "reminder" => Ok(EventType::Reminder),
    "other" => Ok(EventType::Other),
    other => Err(Error::UnknownDiscriminant("event_type", other.to_owned())),
  }
}

// ─── EventStatus ─────────────────────────────────────────────────────────────

pub fn encode_event_status(s: EventStatus) -> &'static str {
  match s {
    EventStatus::Upcoming => "upcoming",
    EventStatus::Completed => "completed",
    EventStatus::Cancelled => "cancelled",
  }
}

pub fn decode_event_status(s: &str) -> Result<EventStatus> {
  match s {
    "upcoming" => Ok(EventStatus::Upcoming),
    "completed" => Ok(EventStatus::Completed),
    "cancelled" => Ok(EventStatus::Cancelled),
    other => Err(Error::UnknownDiscriminant("status", other.to_owned())),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `calendar_events` row.
pub struct RawEvent {
  pub event_id:    String,
  pub subject_id:  String,
  pub owner_id:    String,
  pub title:       String,
  pub description: Option<String>,
  pub event_date:  String,
  pub event_time:  Option<String>,
  pub event_type:  String,
  pub status:      String,
  pub created_at:  String,
}

impl RawEvent {
  pub fn into_event(self) -> Result<CalendarEvent> {
    Ok(CalendarEvent {
      event_id:    decode_uuid(&self.event_id)?,
      subject_id:  decode_uuid(&self.subject_id)?,
      owner_id:    decode_uuid(&self.owner_id)?,
      title:       self.title,
      description: self.description,
      event_date:  decode_date(&self.event_date)?,
      event_time:  self.event_time.as_deref().map(decode_time).transpose()?,
      event_type:  decode_event_type(&self.event_type)?,
      status:      decode_event_status(&self.status)?,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `medications` row.
pub struct RawMedication {
  pub medication_id:   String,
  pub subject_id:      String,
  pub owner_id:        String,
  pub medication_name: String,
  pub dosage_detail:   String,
  pub frequency:       String,
  pub start_date:      String,
  pub duration_days:   Option<u32>,
  pub end_date:        Option<String>,
  pub notes:           Option<String>,
  pub active:          bool,
  pub created_at:      String,
}

impl RawMedication {
  pub fn into_medication(self) -> Result<Medication> {
    Ok(Medication {
      medication_id:   decode_uuid(&self.medication_id)?,
      subject_id:      decode_uuid(&self.subject_id)?,
      owner_id:        decode_uuid(&self.owner_id)?,
      medication_name: self.medication_name,
      dosage_detail:   self.dosage_detail,
      frequency:       self.frequency,
      start_date:      decode_date(&self.start_date)?,
      duration_days:   self.duration_days,
      end_date:        self.end_date.as_deref().map(decode_date).transpose()?,
      notes:           self.notes,
      active:          self.active,
      created_at:      decode_dt(&self.created_at)?,
    })
  }
}
