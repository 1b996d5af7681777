//! Pure functions that shape caller input into backend requests.
//!
//! Every default, coercion and omission rule lives here, one function per
//! resource, so the request builders in [`client`](crate::client) only
//! assemble URLs and headers.

use std::fmt::Display;

use serde_json::Value;

use crate::error::ApiError;
use crate::types::{
    DoctorFilter, Filter, FollowUpDraft, FollowUpFilter, FollowUpPayload, Id, IdValue,
};

pub const DEFAULT_SCHEDULE_STRATEGY: &str = "automated";
pub const DEFAULT_DOCTOR_SKIP: u32 = 0;
pub const DEFAULT_DOCTOR_LIMIT: u32 = 100;

/// Ordered query pairs. Absent values are never pushed.
#[derive(Debug, Default)]
struct Query(Vec<(String, String)>);

impl Query {
    fn push(&mut self, key: &str, value: impl Display) {
        self.0.push((key.to_string(), value.to_string()));
    }

    fn push_opt<V: Display>(&mut self, key: &str, value: Option<V>) {
        if let Some(value) = value {
            self.push(key, value);
        }
    }

    fn into_pairs(self) -> Vec<(String, String)> {
        self.0
    }
}

/// Convert a free-form filter to query pairs, dropping `null` values.
///
/// Arrays become repeated keys; nested objects are sent as JSON text.
pub fn filter_query(filter: &Filter) -> Vec<(String, String)> {
    let mut query = Query::default();
    for (key, value) in filter {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for item in items {
                    if let Some(text) = scalar_text(item) {
                        query.push(key, text);
                    }
                }
            }
            other => query.push_opt(key, scalar_text(other)),
        }
    }
    query.into_pairs()
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}

/// Paging pairs for the doctor list. `search` maps onto the backend's
/// `name` key and is left out when absent or blank.
pub fn doctor_query(filter: &DoctorFilter) -> Vec<(String, String)> {
    let mut query = Query::default();
    query.push("skip", filter.skip.unwrap_or(DEFAULT_DOCTOR_SKIP));
    query.push("limit", filter.limit.unwrap_or(DEFAULT_DOCTOR_LIMIT));
    let search = filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    query.push_opt("name", search);
    query.into_pairs()
}

pub fn follow_up_query(filter: &FollowUpFilter) -> Vec<(String, String)> {
    let mut query = Query::default();
    query.push_opt("page", filter.page);
    query.push_opt("per_page", filter.per_page);
    query.push_opt("elderly_id", filter.elderly_id);
    query.push_opt("doctor_id", filter.doctor_id);
    query.push_opt("elderly_name", filter.elderly_name.as_deref());
    query.push_opt("doctor_name", filter.doctor_name.as_deref());
    query.push_opt("start_date", filter.start_date.as_ref().map(|d| d.to_backend()));
    query.push_opt("end_date", filter.end_date.as_ref().map(|d| d.to_backend()));
    query.into_pairs()
}

/// Coerce an id that may be numeric text into an integer.
pub fn coerce_id(field: &'static str, value: &IdValue) -> Result<Id, ApiError> {
    match value {
        IdValue::Number(n) => Ok(*n),
        IdValue::Text(text) => text.trim().parse().map_err(|_| ApiError::InvalidId {
            field,
            value: text.clone(),
        }),
    }
}

fn coerce_opt(field: &'static str, value: Option<&IdValue>) -> Result<Option<Id>, ApiError> {
    value.map(|v| coerce_id(field, v)).transpose()
}

fn shape(draft: &FollowUpDraft) -> Result<FollowUpPayload, ApiError> {
    Ok(FollowUpPayload {
        elderly_id: coerce_opt("elderly_id", draft.elderly_id.as_ref())?,
        doctor_id: coerce_opt("doctor_id", draft.doctor_id.as_ref())?,
        follow_up_date: draft.follow_up_date.as_ref().map(|d| d.to_backend()),
        next_follow_up_date: draft.next_follow_up_date.as_ref().map(|d| d.to_backend()),
        content: draft.content.clone(),
        result: draft.result.clone(),
        medication_warning: draft.medication_warning.clone(),
        schedule_strategy: draft.schedule_strategy.clone(),
        schedule_interval: draft.schedule_interval,
        is_recurring: draft.is_recurring,
        extra: draft.extra.clone(),
    })
}

/// Body for creating a follow-up.
///
/// Fills `schedule_strategy` and `is_recurring` when absent, formats native
/// dates and coerces any ids that are present.
pub fn normalize_new_follow_up(draft: &FollowUpDraft) -> Result<FollowUpPayload, ApiError> {
    let mut payload = shape(draft)?;
    payload
        .schedule_strategy
        .get_or_insert_with(|| DEFAULT_SCHEDULE_STRATEGY.to_string());
    payload.is_recurring.get_or_insert(false);
    Ok(payload)
}

/// Body for updating a follow-up. Both foreign ids must be present and
/// numeric; no scheduling defaults are applied.
pub fn normalize_follow_up_update(draft: &FollowUpDraft) -> Result<FollowUpPayload, ApiError> {
    let mut payload = shape(draft)?;
    payload.elderly_id = Some(payload.elderly_id.ok_or(ApiError::MissingField("elderly_id"))?);
    payload.doctor_id = Some(payload.doctor_id.ok_or(ApiError::MissingField("doctor_id"))?);
    Ok(payload)
}
