//! Transport DTOs for the care API.
//!
//! # Design
//! Records are request/response shapes, not owned domain objects. Fields the
//! client needs to reason about are typed; everything else the backend sends
//! (extra profile fields, vitals on follow-ups) is preserved verbatim in a
//! flattened map so nothing is lost between a read and a later update.
//!
//! Caller-side inputs (`*Draft`, `*Filter`) are deliberately loose: ids may
//! arrive as strings, dates as native values or preformatted text. The
//! [`normalize`](crate::normalize) module turns them into backend shapes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::date::DateValue;

/// Backend-assigned numeric identifier.
pub type Id = i64;

/// Free-form filter passed through to the elderly list query.
pub type Filter = Map<String, Value>;

/// Profile fields of an elderly person; used both as the create/update body
/// and, flattened, inside [`ElderlyRecord`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElderlyProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_place: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElderlyRecord {
    pub id: Id,
    #[serde(flatten)]
    pub profile: ElderlyProfile,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DoctorProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: Id,
    #[serde(flatten)]
    pub profile: DoctorProfile,
}

/// Paging and search options for the doctor list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoctorFilter {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
    /// Matched against the doctor's name by the backend.
    pub search: Option<String>,
}

/// A follow-up visit as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowUp {
    pub id: Id,
    pub elderly_id: Id,
    pub doctor_id: Id,
    #[serde(default)]
    pub follow_up_date: Option<String>,
    #[serde(default)]
    pub next_follow_up_date: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub medication_warning: Option<String>,
    #[serde(default)]
    pub schedule_strategy: Option<String>,
    #[serde(default)]
    pub schedule_interval: Option<u32>,
    #[serde(default)]
    pub is_recurring: Option<bool>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An identifier as a caller may hold it: a number, or the string a form
/// field produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdValue {
    Number(Id),
    Text(String),
}

impl From<Id> for IdValue {
    fn from(value: Id) -> Self {
        IdValue::Number(value)
    }
}

impl From<&str> for IdValue {
    fn from(value: &str) -> Self {
        IdValue::Text(value.to_string())
    }
}

impl From<String> for IdValue {
    fn from(value: String) -> Self {
        IdValue::Text(value)
    }
}

/// Caller input for creating or updating a follow-up.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FollowUpDraft {
    #[serde(default)]
    pub elderly_id: Option<IdValue>,
    #[serde(default)]
    pub doctor_id: Option<IdValue>,
    #[serde(default)]
    pub follow_up_date: Option<DateValue>,
    #[serde(default)]
    pub next_follow_up_date: Option<DateValue>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub medication_warning: Option<String>,
    #[serde(default)]
    pub schedule_strategy: Option<String>,
    #[serde(default)]
    pub schedule_interval: Option<u32>,
    #[serde(default)]
    pub is_recurring: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A follow-up body in the exact shape the backend accepts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FollowUpPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elderly_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_up_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_follow_up_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medication_warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_strategy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_interval: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_recurring: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Filter for the follow-up list. Absent fields are not transmitted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FollowUpFilter {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub elderly_id: Option<Id>,
    pub doctor_id: Option<Id>,
    pub elderly_name: Option<String>,
    pub doctor_name: Option<String>,
    pub start_date: Option<DateValue>,
    pub end_date: Option<DateValue>,
}

/// A rendered report kept as opaque bytes, for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportBlob {
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl ReportBlob {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A report body decoded for inline display.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportPayload {
    Json(Value),
    Text(String),
}
