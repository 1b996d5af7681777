//! In-memory stand-in for the elderly-care backend.
//!
//! Serves the same routes as the real backend under `/api/v1`. Records are
//! stored as JSON objects so free-form profile fields round-trip untouched;
//! follow-up bodies are validated the way the backend validates them
//! (integer foreign ids, `YYYY-MM-DD HH:mm:ss` dates).

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};

pub const API_PREFIX: &str = "/api/v1";
const BACKEND_DATE_FORMAT_LEN: usize = "YYYY-MM-DD HH:MM:SS".len();

pub type Record = Map<String, Value>;

#[derive(Debug, Default)]
pub struct Store {
    next_id: i64,
    pub elderly: BTreeMap<i64, Record>,
    pub doctors: BTreeMap<i64, Record>,
    pub follow_ups: BTreeMap<i64, Record>,
}

impl Store {
    fn insert(table: &mut BTreeMap<i64, Record>, next_id: &mut i64, mut record: Record) -> Record {
        *next_id += 1;
        record.insert("id".to_string(), json!(*next_id));
        table.insert(*next_id, record.clone());
        record
    }
}

pub type Db = Arc<RwLock<Store>>;

#[derive(Debug, Deserialize)]
pub struct DoctorQuery {
    #[serde(default)]
    pub skip: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
    pub name: Option<String>,
}

fn default_limit() -> usize {
    100
}

#[derive(Debug, Default, Deserialize)]
pub struct FollowUpQuery {
    pub page: Option<usize>,
    pub per_page: Option<usize>,
    pub elderly_id: Option<i64>,
    pub doctor_id: Option<i64>,
    pub elderly_name: Option<String>,
    pub doctor_name: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Follow-up body as the backend accepts it.
#[derive(Debug, Deserialize)]
pub struct FollowUpIn {
    pub elderly_id: i64,
    pub doctor_id: i64,
    pub follow_up_date: Option<String>,
    pub next_follow_up_date: Option<String>,
    #[serde(flatten)]
    pub rest: Record,
}

pub fn app() -> Router {
    app_with(Db::default())
}

pub fn app_with(db: Db) -> Router {
    let api = Router::new()
        .route("/elderly", get(list_elderly).post(create_elderly))
        .route(
            "/elderly/{id}",
            get(get_elderly).put(update_elderly).delete(delete_elderly),
        )
        .route("/elderly/{id}/follow-ups", get(follow_ups_by_elderly))
        .route("/doctors", get(list_doctors).post(create_doctor))
        .route(
            "/doctors/{id}",
            get(get_doctor).put(update_doctor).delete(delete_doctor),
        )
        .route("/follow-ups", get(list_follow_ups).post(create_follow_up))
        .route(
            "/follow-ups/{id}",
            get(get_follow_up).put(update_follow_up).delete(delete_follow_up),
        )
        .route("/follow-ups/{id}/report", get(follow_up_report))
        .with_state(db);
    Router::new().nest(API_PREFIX, api)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

fn not_found() -> Response {
    detail(StatusCode::NOT_FOUND, "resource not found")
}

fn text_field<'a>(record: &'a Record, key: &str) -> Option<&'a str> {
    record.get(key).and_then(Value::as_str)
}

fn id_field(record: &Record, key: &str) -> Option<i64> {
    record.get(key).and_then(Value::as_i64)
}

fn merge(target: &mut Record, patch: Record) {
    for (key, value) in patch {
        if key != "id" {
            target.insert(key, value);
        }
    }
}

// --- elderly ---

async fn list_elderly(
    State(db): State<Db>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Json<Vec<Record>> {
    let store = db.read().await;
    let records = store
        .elderly
        .values()
        .filter(|record| {
            params.iter().all(|(key, wanted)| match record.get(key) {
                Some(Value::String(s)) => s.contains(wanted.as_str()),
                Some(other) => other.to_string() == *wanted,
                None => false,
            })
        })
        .cloned()
        .collect();
    Json(records)
}

async fn create_elderly(State(db): State<Db>, Json(input): Json<Record>) -> (StatusCode, Json<Record>) {
    let mut store = db.write().await;
    let Store { next_id, elderly, .. } = &mut *store;
    let record = Store::insert(elderly, next_id, input);
    tracing::info!(id = ?record.get("id"), "Elderly record created");
    (StatusCode::CREATED, Json(record))
}

async fn get_elderly(State(db): State<Db>, Path(id): Path<i64>) -> Response {
    let store = db.read().await;
    match store.elderly.get(&id) {
        Some(record) => Json(record.clone()).into_response(),
        None => not_found(),
    }
}

async fn update_elderly(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<Record>,
) -> Response {
    let mut store = db.write().await;
    match store.elderly.get_mut(&id) {
        Some(record) => {
            merge(record, input);
            Json(record.clone()).into_response()
        }
        None => not_found(),
    }
}

async fn delete_elderly(State(db): State<Db>, Path(id): Path<i64>) -> Response {
    let mut store = db.write().await;
    match store.elderly.remove(&id) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => not_found(),
    }
}

async fn follow_ups_by_elderly(State(db): State<Db>, Path(id): Path<i64>) -> Response {
    let store = db.read().await;
    if !store.elderly.contains_key(&id) {
        return not_found();
    }
    let follow_ups: Vec<Record> = store
        .follow_ups
        .values()
        .filter(|f| id_field(f, "elderly_id") == Some(id))
        .cloned()
        .collect();
    Json(follow_ups).into_response()
}

// --- doctors ---

async fn list_doctors(State(db): State<Db>, Query(params): Query<DoctorQuery>) -> Json<Vec<Record>> {
    let store = db.read().await;
    let doctors = store
        .doctors
        .values()
        .filter(|doctor| match params.name.as_deref() {
            Some(name) => text_field(doctor, "name").is_some_and(|n| n.contains(name)),
            None => true,
        })
        .skip(params.skip)
        .take(params.limit)
        .cloned()
        .collect();
    Json(doctors)
}

async fn create_doctor(State(db): State<Db>, Json(input): Json<Record>) -> (StatusCode, Json<Record>) {
    let mut store = db.write().await;
    let Store { next_id, doctors, .. } = &mut *store;
    let record = Store::insert(doctors, next_id, input);
    tracing::info!(id = ?record.get("id"), "Doctor created");
    (StatusCode::CREATED, Json(record))
}

async fn get_doctor(State(db): State<Db>, Path(id): Path<i64>) -> Response {
    let store = db.read().await;
    match store.doctors.get(&id) {
        Some(record) => Json(record.clone()).into_response(),
        None => not_found(),
    }
}

async fn update_doctor(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<Record>,
) -> Response {
    let mut store = db.write().await;
    match store.doctors.get_mut(&id) {
        Some(record) => {
            merge(record, input);
            Json(record.clone()).into_response()
        }
        None => not_found(),
    }
}

async fn delete_doctor(State(db): State<Db>, Path(id): Path<i64>) -> Response {
    let mut store = db.write().await;
    match store.doctors.remove(&id) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => not_found(),
    }
}

// --- follow-ups ---

fn valid_backend_date(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == BACKEND_DATE_FORMAT_LEN
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            10 => *b == b' ',
            13 | 16 => *b == b':',
            _ => b.is_ascii_digit(),
        })
}

fn follow_up_record(input: FollowUpIn) -> Result<Record, Response> {
    for date in [&input.follow_up_date, &input.next_follow_up_date]
        .into_iter()
        .flatten()
    {
        if !valid_backend_date(date) {
            return Err(detail(
                StatusCode::UNPROCESSABLE_ENTITY,
                "dates must be formatted as YYYY-MM-DD HH:mm:ss",
            ));
        }
    }
    let mut record = input.rest;
    record.insert("elderly_id".to_string(), json!(input.elderly_id));
    record.insert("doctor_id".to_string(), json!(input.doctor_id));
    if let Some(date) = input.follow_up_date {
        record.insert("follow_up_date".to_string(), json!(date));
    }
    if let Some(date) = input.next_follow_up_date {
        record.insert("next_follow_up_date".to_string(), json!(date));
    }
    Ok(record)
}

fn name_of(table: &BTreeMap<i64, Record>, id: Option<i64>) -> Option<&str> {
    id.and_then(|id| table.get(&id))
        .and_then(|record| text_field(record, "name"))
}

async fn list_follow_ups(
    State(db): State<Db>,
    Query(params): Query<FollowUpQuery>,
) -> Json<Vec<Record>> {
    let store = db.read().await;
    let matches = |f: &&Record| {
        let date = text_field(f, "follow_up_date").unwrap_or_default();
        params.elderly_id.is_none_or(|id| id_field(f, "elderly_id") == Some(id))
            && params.doctor_id.is_none_or(|id| id_field(f, "doctor_id") == Some(id))
            && params.elderly_name.as_deref().is_none_or(|wanted| {
                name_of(&store.elderly, id_field(f, "elderly_id")).is_some_and(|n| n.contains(wanted))
            })
            && params.doctor_name.as_deref().is_none_or(|wanted| {
                name_of(&store.doctors, id_field(f, "doctor_id")).is_some_and(|n| n.contains(wanted))
            })
            && params.start_date.as_deref().is_none_or(|start| date >= start)
            && params.end_date.as_deref().is_none_or(|end| date <= end)
    };
    let filtered = store.follow_ups.values().filter(matches);

    let page: Vec<Record> = match (params.page, params.per_page) {
        (Some(page), Some(per_page)) => filtered
            .skip(page.saturating_sub(1) * per_page)
            .take(per_page)
            .cloned()
            .collect(),
        _ => filtered.cloned().collect(),
    };
    Json(page)
}

async fn create_follow_up(State(db): State<Db>, Json(input): Json<FollowUpIn>) -> Response {
    let record = match follow_up_record(input) {
        Ok(record) => record,
        Err(rejection) => return rejection,
    };
    let mut store = db.write().await;
    let Store { next_id, follow_ups, .. } = &mut *store;
    let record = Store::insert(follow_ups, next_id, record);
    tracing::info!(id = ?record.get("id"), "Follow-up created");
    (StatusCode::CREATED, Json(record)).into_response()
}

async fn get_follow_up(State(db): State<Db>, Path(id): Path<i64>) -> Response {
    let store = db.read().await;
    match store.follow_ups.get(&id) {
        Some(record) => Json(record.clone()).into_response(),
        None => not_found(),
    }
}

async fn update_follow_up(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<FollowUpIn>,
) -> Response {
    let patch = match follow_up_record(input) {
        Ok(record) => record,
        Err(rejection) => return rejection,
    };
    let mut store = db.write().await;
    match store.follow_ups.get_mut(&id) {
        Some(record) => {
            merge(record, patch);
            Json(record.clone()).into_response()
        }
        None => not_found(),
    }
}

async fn delete_follow_up(State(db): State<Db>, Path(id): Path<i64>) -> Response {
    let mut store = db.write().await;
    match store.follow_ups.remove(&id) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => not_found(),
    }
}

async fn follow_up_report(State(db): State<Db>, Path(id): Path<i64>) -> Response {
    let store = db.read().await;
    let Some(follow_up) = store.follow_ups.get(&id) else {
        tracing::warn!(id, "Report requested for missing follow-up");
        return not_found();
    };
    let elderly = name_of(&store.elderly, id_field(follow_up, "elderly_id")).unwrap_or_default();
    let doctor = name_of(&store.doctors, id_field(follow_up, "doctor_id")).unwrap_or_default();
    let date = text_field(follow_up, "follow_up_date").unwrap_or_default();
    let content = text_field(follow_up, "content").unwrap_or_default();

    let body = format!(
        "<!DOCTYPE html><html><head><title>Follow-up report #{id}</title></head><body>\
         <h1>Follow-up report #{id}</h1>\
         <p>Elderly: {elderly}</p><p>Doctor: {doctor}</p>\
         <p>Date: {date}</p><p>Content: {content}</p></body></html>"
    );
    ([(header::CACHE_CONTROL, "no-store")], Html(body)).into_response()
}
