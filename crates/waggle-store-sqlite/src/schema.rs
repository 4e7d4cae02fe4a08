//! SQL schema for the Waggle SQLite store.
//!
//! Applied in full at every connection startup; each statement is
//! idempotent. `PRAGMA user_version` marks the schema revision so later
//! migrations can key off it.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Dates are stored as ISO 8601 text so lexicographic comparison matches
/// date order and window queries stay plain `>=`/`<=` over the index.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS calendar_events (
    event_id    TEXT PRIMARY KEY,
    subject_id  TEXT NOT NULL,
    owner_id    TEXT NOT NULL,
    title       TEXT NOT NULL,
    description TEXT,
    event_date  TEXT NOT NULL,   -- ISO 8601 date
    event_time  TEXT,            -- HH:MM:SS or NULL
    event_type  TEXT NOT NULL,   -- 'vaccination' | 'veterinary' | 'grooming'
                                 -- | 'training' | 'reminder' | 'other'
    status      TEXT NOT NULL,   -- 'upcoming' | 'completed' | 'cancelled'
    created_at  TEXT NOT NULL    -- ISO 8601 UTC; server-assigned
);

CREATE TABLE IF NOT EXISTS medications (
    medication_id   TEXT PRIMARY KEY,
    subject_id      TEXT NOT NULL,
    owner_id        TEXT NOT NULL,
    medication_name TEXT NOT NULL,
    dosage_detail   TEXT NOT NULL,
    frequency       TEXT NOT NULL,
    start_date      TEXT NOT NULL,   -- ISO 8601 date
    duration_days   INTEGER,         -- whole days, NULL for open-ended
    end_date        TEXT,            -- ISO 8601 date or NULL
    notes           TEXT,
    active          INTEGER NOT NULL DEFAULT 1,
    created_at      TEXT NOT NULL    -- ISO 8601 UTC; server-assigned
);

CREATE INDEX IF NOT EXISTS calendar_events_subject_idx ON calendar_events(subject_id);
CREATE INDEX IF NOT EXISTS calendar_events_date_idx    ON calendar_events(event_date);
CREATE INDEX IF NOT EXISTS medications_subject_idx     ON medications(subject_id);

PRAGMA user_version = 1;
";
