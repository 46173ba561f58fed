//! Wire representation of a work record.
//!
//! The remote table uses snake_case columns plus a few server-managed ones
//! (`user_id`, `created_at`, `updated_at`) that never appear in the local
//! model. The structs below are the explicit mapping table between the two
//! shapes; a renamed column fails to decode here instead of silently
//! dropping a field.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::models::{NewWorkRecord, WorkRecord};

/// A row as the server returns it. Server-only columns are ignored during
/// deserialization.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RemoteWorkRecord {
    pub id: String,
    pub start_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_date: NaiveDate,
    pub end_time: NaiveTime,
    pub description: String,
    pub hours: f64,
}

impl From<RemoteWorkRecord> for WorkRecord {
    fn from(row: RemoteWorkRecord) -> Self {
        Self {
            id: row.id,
            start_date: row.start_date,
            start_time: row.start_time,
            end_date: row.end_date,
            end_time: row.end_time,
            description: row.description,
            hours: row.hours,
        }
    }
}

/// The writable columns, used as the PATCH body. The id and owning user are
/// never part of the payload; they travel as row filters instead.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct RemoteRecordPatch {
    pub start_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_date: NaiveDate,
    pub end_time: NaiveTime,
    pub description: String,
    pub hours: f64,
}

impl From<&WorkRecord> for RemoteRecordPatch {
    fn from(record: &WorkRecord) -> Self {
        Self {
            start_date: record.start_date,
            start_time: record.start_time,
            end_date: record.end_date,
            end_time: record.end_time,
            description: record.description.clone(),
            hours: record.hours,
        }
    }
}

impl From<&NewWorkRecord> for RemoteRecordPatch {
    fn from(record: &NewWorkRecord) -> Self {
        Self {
            start_date: record.start_date,
            start_time: record.start_time,
            end_date: record.end_date,
            end_time: record.end_time,
            description: record.description.clone(),
            hours: record.hours,
        }
    }
}

/// Insert payload: the writable columns tagged with the owning user. The id
/// is left to the server so it can issue a UUID.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct RemoteRecordInsert {
    pub user_id: String,
    #[serde(flatten)]
    pub columns: RemoteRecordPatch,
}

impl RemoteRecordInsert {
    pub fn new(user_id: &str, record: &NewWorkRecord) -> Self {
        Self {
            user_id: user_id.to_string(),
            columns: RemoteRecordPatch::from(record),
        }
    }
}
