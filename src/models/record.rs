use anyhow::{anyhow, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// One logged span of work time. `hours` is computed once when the record
/// is created or edited and never re-derived from the dates afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkRecord {
    pub id: String,
    pub start_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_date: NaiveDate,
    pub end_time: NaiveTime,
    pub description: String,
    pub hours: f64,
}

/// A record that has not been assigned an id yet. The only way to build one
/// is [`NewWorkRecord::new`], which validates the time span and computes
/// `hours`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewWorkRecord {
    pub start_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_date: NaiveDate,
    pub end_time: NaiveTime,
    pub description: String,
    pub hours: f64,
}

impl NewWorkRecord {
    /// Validate the span and compute its duration in hours, rounded to one
    /// decimal. Rejects spans whose end precedes their start.
    pub fn new(
        start_date: NaiveDate,
        start_time: NaiveTime,
        end_date: NaiveDate,
        end_time: NaiveTime,
        description: impl Into<String>,
    ) -> Result<Self> {
        let start = NaiveDateTime::new(start_date, start_time);
        let end = NaiveDateTime::new(end_date, end_time);
        if end < start {
            return Err(anyhow!("end time must not precede start time"));
        }

        let minutes = (end - start).num_minutes();
        let hours = round_to_tenth(minutes as f64 / 60.0);

        Ok(Self {
            start_date,
            start_time,
            end_date,
            end_time,
            description: description.into(),
            hours,
        })
    }

    pub fn with_id(self, id: String) -> WorkRecord {
        WorkRecord {
            id,
            start_date: self.start_date,
            start_time: self.start_time,
            end_date: self.end_date,
            end_time: self.end_time,
            description: self.description,
            hours: self.hours,
        }
    }
}

impl WorkRecord {
    /// Draft a copy of this record anchored to another start date, keeping
    /// the times, description and computed hours. Multi-day spans keep their
    /// day offset.
    pub fn duplicate_for(&self, start_date: NaiveDate) -> NewWorkRecord {
        let span_days = (self.end_date - self.start_date).num_days();
        NewWorkRecord {
            start_date,
            start_time: self.start_time,
            end_date: start_date + Duration::days(span_days),
            end_time: self.end_time,
            description: self.description.clone(),
            hours: self.hours,
        }
    }

    /// Strip the id back off, e.g. when re-inserting the record remotely so
    /// the server can issue its own.
    pub fn into_draft(self) -> NewWorkRecord {
        NewWorkRecord {
            start_date: self.start_date,
            start_time: self.start_time,
            end_date: self.end_date,
            end_time: self.end_time,
            description: self.description,
            hours: self.hours,
        }
    }
}

pub(crate) fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
