use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Symptom name to intensity or flag value, as the client sends it.
pub type Symptoms = BTreeMap<String, serde_json::Value>;

/// A start or end date as it arrives from the document store: either a native
/// timestamp (`{"seconds", "nanoseconds"}`) or a plain ISO string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateValue {
    Native(#[serde(with = "native_timestamp")] DateTime<Utc>),
    Iso(String),
}

impl DateValue {
    /// Calendar date of this value, or `None` if it can't be read as one.
    pub fn to_date(&self) -> Option<NaiveDate> {
        match self {
            DateValue::Native(ts) => Some(ts.date_naive()),
            DateValue::Iso(raw) => parse_iso_date(raw),
        }
    }
}

impl From<NaiveDate> for DateValue {
    fn from(date: NaiveDate) -> Self {
        DateValue::Iso(date.format("%Y-%m-%d").to_string())
    }
}

impl From<DateTime<Utc>> for DateValue {
    fn from(ts: DateTime<Utc>) -> Self {
        DateValue::Native(ts)
    }
}

fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date_part = raw.split('T').next().unwrap_or(raw);

    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|ts| ts.with_timezone(&Utc).date_naive())
        })
}

mod native_timestamp {
    use chrono::{DateTime, Utc};
    use serde::{de::Error, Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct Repr {
        seconds: i64,
        #[serde(default)]
        nanoseconds: u32,
    }

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        Repr {
            seconds: ts.timestamp(),
            nanoseconds: ts.timestamp_subsec_nanos(),
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let repr = Repr::deserialize(deserializer)?;
        DateTime::from_timestamp(repr.seconds, repr.nanoseconds)
            .ok_or_else(|| D::Error::custom("timestamp out of range"))
    }
}

/// A stored cycle document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleRecord {
    pub id: Uuid,
    pub start_date: Option<DateValue>,
    pub end_date: Option<DateValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month_key: Option<String>,
    #[serde(default)]
    pub symptoms: Symptoms,
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl CycleRecord {
    pub fn from_draft(id: Uuid, draft: CycleDraft) -> Self {
        Self {
            id,
            start_date: draft.start_date,
            end_date: draft.end_date,
            month_key: draft.month_key,
            symptoms: draft.symptoms,
            created_at: draft.created_at,
            updated_at: draft.updated_at,
        }
    }

    pub fn has_symptoms(&self) -> bool {
        !self.symptoms.is_empty()
    }
}

/// The writable fields of a cycle, i.e. a record without its id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleDraft {
    pub start_date: Option<DateValue>,
    pub end_date: Option<DateValue>,
    #[serde(default)]
    pub month_key: Option<String>,
    #[serde(default)]
    pub symptoms: Symptoms,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body of `POST /cycles`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCycle {
    pub user_id: String,
    #[serde(flatten)]
    pub cycle: CycleDraft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UpsertOutcome {
    pub id: Uuid,
    pub updated: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepReport {
    pub removed_count: usize,
    pub duplicate_group_count: usize,
    /// Records left alone because their dates couldn't be normalized.
    pub skipped_malformed: usize,
}

/// Records sharing one canonical date-range key, in listing order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateGroup {
    pub key: String,
    pub records: Vec<CycleRecord>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleSummary {
    pub cycle_day: i64,
    pub in_fertile_window: bool,
    pub period_expected_in_days: i64,
    pub start_date: NaiveDate,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleStat {
    pub cycle_number: i32,
    pub start_date: NaiveDate,
    pub period_length: i32,
    pub cycle_length: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleStatsResponse {
    pub average_period_length: f64,
    pub average_cycle_length: f64,
    pub cycle_stats: Vec<CycleStat>,
}
