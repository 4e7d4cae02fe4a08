//! [`SqliteStore`], the SQLite implementation of [`TimelineStore`].

use std::path::Path;

use chrono::NaiveDate;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use waggle_core::{
  event::{CalendarEvent, EventPatch},
  lifecycle::StatusChange,
  medication::Medication,
  store::TimelineStore,
};

use crate::{
  Result,
  encode::{
    RawEvent, RawMedication, encode_date, encode_dt, encode_event_status,
    encode_event_type, encode_time, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A timeline store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── TimelineStore impl ──────────────────────────────────────────────────────

impl TimelineStore for SqliteStore {
  type Error = crate::Error;

  // ── Calendar events ─────────────────────────────────────────────────────

  async fn list_events(
    &self,
    subject_ids: &[Uuid],
    from: NaiveDate,
    to: NaiveDate,
  ) -> Result<Vec<CalendarEvent>> {
    if subject_ids.is_empty() {
      return Ok(Vec::new());
    }

    let ids: Vec<String> = subject_ids.iter().copied().map(encode_uuid).collect();
    let from_str = encode_date(from);
    let to_str = encode_date(to);

    let raws: Vec<RawEvent> = self
      .conn
      .call(move |conn| {
        // One positional placeholder per subject id, then the window bounds.
        let placeholders = (1..=ids.len())
          .map(|n| format!("?{n}"))
          .collect::<Vec<_>>()
          .join(", ");
        let sql = format!(
          "SELECT event_id, subject_id, owner_id, title, description,
                  event_date, event_time, event_type, status, created_at
           FROM calendar_events
           WHERE subject_id IN ({placeholders})
             AND event_date >= ?{} AND event_date <= ?{}",
          ids.len() + 1,
          ids.len() + 2,
        );

        let mut params = ids;
        params.push(from_str);
        params.push(to_str);

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), |row| {
            Ok(RawEvent {
              event_id:    row.get(0)?,
              subject_id:  row.get(1)?,
              owner_id:    row.get(2)?,
              title:       row.get(3)?,
              description: row.get(4)?,
              event_date:  row.get(5)?,
              event_time:  row.get(6)?,
              event_type:  row.get(7)?,
              status:      row.get(8)?,
              created_at:  row.get(9)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEvent::into_event).collect()
  }

  async fn get_event(&self, id: Uuid) -> Result<Option<CalendarEvent>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawEvent> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT event_id, subject_id, owner_id, title, description,
                      event_date, event_time, event_type, status, created_at
               FROM calendar_events WHERE event_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawEvent {
                  event_id:    row.get(0)?,
                  subject_id:  row.get(1)?,
                  owner_id:    row.get(2)?,
                  title:       row.get(3)?,
                  description: row.get(4)?,
                  event_date:  row.get(5)?,
                  event_time:  row.get(6)?,
                  event_type:  row.get(7)?,
                  status:      row.get(8)?,
                  created_at:  row.get(9)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawEvent::into_event).transpose()
  }

  async fn insert_event(&self, event: CalendarEvent) -> Result<CalendarEvent> {
    let event_id_str   = encode_uuid(event.event_id);
    let subject_id_str = encode_uuid(event.subject_id);
    let owner_id_str   = encode_uuid(event.owner_id);
    let title          = event.title.clone();
    let description    = event.description.clone();
    let date_str       = encode_date(event.event_date);
    let time_str       = event.event_time.map(encode_time);
    let type_str       = encode_event_type(event.event_type).to_owned();
    let status_str     = encode_event_status(event.status).to_owned();
    let created_at_str = encode_dt(event.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO calendar_events (
             event_id, subject_id, owner_id, title, description,
             event_date, event_time, event_type, status, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
          rusqlite::params![
            event_id_str,
            subject_id_str,
            owner_id_str,
            title,
            description,
            date_str,
            time_str,
            type_str,
            status_str,
            created_at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(event)
  }

  async fn update_event(
    &self,
    id: Uuid,
    patch: &EventPatch,
  ) -> Result<Option<CalendarEvent>> {
    let current = match self.get_event(id).await? {
      Some(event) => event,
      None => return Ok(None),
    };
    let updated = patch.apply(&current);

    let id_str      = encode_uuid(id);
    let title       = updated.title.clone();
    let description = updated.description.clone();
    let date_str    = encode_date(updated.event_date);
    let time_str    = updated.event_time.map(encode_time);
    let type_str    = encode_event_type(updated.event_type).to_owned();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE calendar_events
           SET title = ?2, description = ?3, event_date = ?4,
               event_time = ?5, event_type = ?6
           WHERE event_id = ?1",
          rusqlite::params![
            id_str,
            title,
            description,
            date_str,
            time_str,
            type_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(Some(updated))
  }

  async fn delete_event(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM calendar_events WHERE event_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    Ok(affected > 0)
  }

  // ── Medications ─────────────────────────────────────────────────────────

  async fn list_medications(&self, subject_id: Uuid) -> Result<Vec<Medication>> {
    let subject_id_str = encode_uuid(subject_id);

    let raws: Vec<RawMedication> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT medication_id, subject_id, owner_id, medication_name,
                  dosage_detail, frequency, start_date, duration_days,
                  end_date, notes, active, created_at
           FROM medications WHERE subject_id = ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![subject_id_str], |row| {
            Ok(RawMedication {
              medication_id:   row.get(0)?,
              subject_id:      row.get(1)?,
              owner_id:        row.get(2)?,
              medication_name: row.get(3)?,
              dosage_detail:   row.get(4)?,
              frequency:       row.get(5)?,
              start_date:      row.get(6)?,
              duration_days:   row.get(7)?,
              end_date:        row.get(8)?,
              notes:           row.get(9)?,
              active:          row.get(10)?,
              created_at:      row.get(11)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawMedication::into_medication).collect()
  }

  async fn get_medication(&self, id: Uuid) -> Result<Option<Medication>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawMedication> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT medication_id, subject_id, owner_id, medication_name,
                      dosage_detail, frequency, start_date, duration_days,
                      end_date, notes, active, created_at
               FROM medications WHERE medication_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawMedication {
                  medication_id:   row.get(0)?,
                  subject_id:      row.get(1)?,
                  owner_id:        row.get(2)?,
                  medication_name: row.get(3)?,
                  dosage_detail:   row.get(4)?,
                  frequency:       row.get(5)?,
                  start_date:      row.get(6)?,
                  duration_days:   row.get(7)?,
                  end_date:        row.get(8)?,
                  notes:           row.get(9)?,
                  active:          row.get(10)?,
                  created_at:      row.get(11)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawMedication::into_medication).transpose()
  }

  async fn insert_medication(&self, medication: Medication) -> Result<Medication> {
    let medication_id_str = encode_uuid(medication.medication_id);
    let subject_id_str    = encode_uuid(medication.subject_id);
    let owner_id_str      = encode_uuid(medication.owner_id);
    let name              = medication.medication_name.clone();
    let dosage            = medication.dosage_detail.clone();
    let frequency         = medication.frequency.clone();
    let start_str         = encode_date(medication.start_date);
    let duration          = medication.duration_days;
    let end_str           = medication.end_date.map(encode_date);
    let notes             = medication.notes.clone();
    let active            = medication.active;
    let created_at_str    = encode_dt(medication.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO medications (
             medication_id, subject_id, owner_id, medication_name,
             dosage_detail, frequency, start_date, duration_days,
             end_date, notes, active, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
          rusqlite::params![
            medication_id_str,
            subject_id_str,
            owner_id_str,
            name,
            dosage,
            frequency,
            start_str,
            duration,
            end_str,
            notes,
            active,
            created_at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(medication)
  }

  async fn update_medication_status(
    &self,
    id: Uuid,
    change: &StatusChange,
  ) -> Result<Option<Medication>> {
    let current = match self.get_medication(id).await? {
      Some(medication) => medication,
      None => return Ok(None),
    };

    let updated = match *change {
      StatusChange::Deactivate => Medication {
        active: false,
        ..current
      },
      StatusChange::Reactivate {
        start_date,
        end_date,
        duration_days,
      } => Medication {
        active: true,
        start_date,
        end_date: Some(end_date),
        duration_days: Some(duration_days),
        ..current
      },
    };

    let id_str    = encode_uuid(id);
    let active    = updated.active;
    let start_str = encode_date(updated.start_date);
    let end_str   = updated.end_date.map(encode_date);
    let duration  = updated.duration_days;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE medications
           SET active = ?2, start_date = ?3, end_date = ?4, duration_days = ?5
           WHERE medication_id = ?1",
          rusqlite::params![id_str, active, start_str, end_str, duration],
        )?;
        Ok(())
      })
      .await?;

    Ok(Some(updated))
  }

  async fn delete_medication(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM medications WHERE medication_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    Ok(affected > 0)
  }
}
