//! Stateless HTTP request builder and response parser for the care API.
//!
//! # Design
//! `CareClient` holds only a base URL and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! Records of the same resource share one parser, since create, read and
//! update all answer with the stored record.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::normalize;
use crate::types::{
    Doctor, DoctorFilter, DoctorProfile, ElderlyProfile, ElderlyRecord, Filter, FollowUp,
    FollowUpDraft, FollowUpFilter, Id, ReportBlob, ReportPayload,
};

const JSON_CONTENT_TYPE: &str = "application/json";
const HTML_CONTENT_TYPE: &str = "text/html";

/// Synchronous, stateless client for the care API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network.
#[derive(Debug, Clone)]
pub struct CareClient {
    base_url: String,
}

impl CareClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn get(&self, path: &str) -> HttpRequest {
        HttpRequest::new(HttpMethod::Get, self.url(path))
    }

    fn delete(&self, path: &str) -> HttpRequest {
        HttpRequest::new(HttpMethod::Delete, self.url(path))
    }

    fn json<T: Serialize>(&self, method: HttpMethod, path: &str, body: &T) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        let mut request = HttpRequest::new(method, self.url(path));
        request
            .headers
            .push(("content-type".to_string(), JSON_CONTENT_TYPE.to_string()));
        request.body = Some(body);
        Ok(request)
    }

    // -----------------------------------------------------------------------
    // Elderly records
    // -----------------------------------------------------------------------

    pub fn build_list_elderly(&self, filter: Option<&Filter>) -> HttpRequest {
        let mut request = self.get("/elderly");
        if let Some(filter) = filter {
            request.query = normalize::filter_query(filter);
        }
        request
    }

    pub fn build_get_elderly(&self, id: Id) -> HttpRequest {
        self.get(&format!("/elderly/{id}"))
    }

    pub fn build_create_elderly(&self, record: &ElderlyProfile) -> Result<HttpRequest, ApiError> {
        self.json(HttpMethod::Post, "/elderly", record)
    }

    pub fn build_update_elderly(&self, id: Id, record: &ElderlyProfile) -> Result<HttpRequest, ApiError> {
        self.json(HttpMethod::Put, &format!("/elderly/{id}"), record)
    }

    pub fn build_delete_elderly(&self, id: Id) -> HttpRequest {
        self.delete(&format!("/elderly/{id}"))
    }

    pub fn parse_elderly_list(&self, response: HttpResponse) -> Result<Vec<ElderlyRecord>, ApiError> {
        parse_json(response)
    }

    pub fn parse_elderly(&self, response: HttpResponse) -> Result<ElderlyRecord, ApiError> {
        parse_json(response)
    }

    // -----------------------------------------------------------------------
    // Doctors
    // -----------------------------------------------------------------------

    pub fn build_list_doctors(&self, filter: Option<&DoctorFilter>) -> HttpRequest {
        let mut request = self.get("/doctors");
        request.query = normalize::doctor_query(filter.unwrap_or(&DoctorFilter::default()));
        request
    }

    pub fn build_get_doctor(&self, id: Id) -> HttpRequest {
        self.get(&format!("/doctors/{id}"))
    }

    pub fn build_create_doctor(&self, record: &DoctorProfile) -> Result<HttpRequest, ApiError> {
        self.json(HttpMethod::Post, "/doctors", record)
    }

    pub fn build_update_doctor(&self, id: Id, record: &DoctorProfile) -> Result<HttpRequest, ApiError> {
        self.json(HttpMethod::Put, &format!("/doctors/{id}"), record)
    }

    pub fn build_delete_doctor(&self, id: Id) -> HttpRequest {
        self.delete(&format!("/doctors/{id}"))
    }

    pub fn parse_doctor_list(&self, response: HttpResponse) -> Result<Vec<Doctor>, ApiError> {
        parse_json(response)
    }

    pub fn parse_doctor(&self, response: HttpResponse) -> Result<Doctor, ApiError> {
        parse_json(response)
    }

    // -----------------------------------------------------------------------
    // Follow-ups
    // -----------------------------------------------------------------------

    pub fn build_list_follow_ups(&self, filter: &FollowUpFilter) -> HttpRequest {
        let mut request = self.get("/follow-ups");
        request.query = normalize::follow_up_query(filter);
        request
    }

    pub fn build_get_follow_up(&self, id: Id) -> HttpRequest {
        self.get(&format!("/follow-ups/{id}"))
    }

    pub fn build_create_follow_up(&self, draft: &FollowUpDraft) -> Result<HttpRequest, ApiError> {
        let payload = normalize::normalize_new_follow_up(draft)?;
        self.json(HttpMethod::Post, "/follow-ups", &payload)
    }

    pub fn build_update_follow_up(&self, id: Id, draft: &FollowUpDraft) -> Result<HttpRequest, ApiError> {
        let payload = normalize::normalize_follow_up_update(draft)?;
        self.json(HttpMethod::Put, &format!("/follow-ups/{id}"), &payload)
    }

    pub fn build_delete_follow_up(&self, id: Id) -> HttpRequest {
        self.delete(&format!("/follow-ups/{id}"))
    }

    pub fn build_follow_ups_by_elderly(&self, elderly_id: Id) -> HttpRequest {
        self.get(&format!("/elderly/{elderly_id}/follow-ups"))
    }

    pub fn parse_follow_up_list(&self, response: HttpResponse) -> Result<Vec<FollowUp>, ApiError> {
        parse_json(response)
    }

    pub fn parse_follow_up(&self, response: HttpResponse) -> Result<FollowUp, ApiError> {
        parse_json(response)
    }

    // -----------------------------------------------------------------------
    // Reports
    // -----------------------------------------------------------------------

    /// Report request for download; asks for HTML explicitly.
    pub fn build_generate_report(&self, id: Id) -> HttpRequest {
        let mut request = self.get(&format!("/follow-ups/{id}/report"));
        request
            .headers
            .push(("accept".to_string(), HTML_CONTENT_TYPE.to_string()));
        request
    }

    /// Report request for inline display.
    pub fn build_get_follow_up_report(&self, id: Id) -> HttpRequest {
        self.get(&format!("/follow-ups/{id}/report"))
    }

    /// Keep the report body as opaque bytes.
    pub fn parse_report_blob(&self, response: HttpResponse) -> Result<ReportBlob, ApiError> {
        check_status(&response)?;
        Ok(ReportBlob {
            content_type: response.content_type().map(str::to_string),
            data: response.body,
        })
    }

    /// Decode the report body: JSON when it parses as JSON, text otherwise.
    pub fn parse_report_payload(&self, response: HttpResponse) -> Result<ReportPayload, ApiError> {
        check_status(&response)?;
        if let Ok(value) = serde_json::from_slice(&response.body) {
            return Ok(ReportPayload::Json(value));
        }
        String::from_utf8(response.body)
            .map(ReportPayload::Text)
            .map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    /// Deletes answer with any 2xx; the body is ignored.
    pub fn parse_delete(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    serde_json::from_slice(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Map non-2xx responses to `ApiError::Http` with the raw status and body.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::Http {
        status: response.status,
        body: response.body_text(),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::IdValue;

    fn client() -> CareClient {
        CareClient::new("http://localhost:8000/api/v1")
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.as_bytes().to_vec(),
        }
    }

    fn body_json(request: &HttpRequest) -> serde_json::Value {
        serde_json::from_str(request.body.as_deref().unwrap()).unwrap()
    }

    #[test]
    fn build_list_elderly_without_filter() {
        let req = client().build_list_elderly(None);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:8000/api/v1/elderly");
        assert!(req.query.is_empty());
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_list_elderly_drops_null_filter_keys() {
        let filter = json!({"name": "Zhang", "contact": null});
        let req = client().build_list_elderly(filter.as_object());
        assert_eq!(req.query, vec![("name".to_string(), "Zhang".to_string())]);
    }

    #[test]
    fn build_create_elderly_sends_json() {
        let record = ElderlyProfile {
            name: Some("Zhang Wei".to_string()),
            age: Some(78),
            ..Default::default()
        };
        let req = client().build_create_elderly(&record).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:8000/api/v1/elderly");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        assert_eq!(body_json(&req), json!({"name": "Zhang Wei", "age": 78}));
    }

    #[test]
    fn build_update_and_delete_elderly_target_the_record() {
        let c = client();
        let req = c.build_update_elderly(9, &ElderlyProfile::default()).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.url, "http://localhost:8000/api/v1/elderly/9");
        assert_eq!(body_json(&req), json!({}));

        let req = c.build_delete_elderly(9);
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.url, "http://localhost:8000/api/v1/elderly/9");
        assert!(req.body.is_none());
    }

    #[test]
    fn build_list_doctors_maps_search_to_name() {
        let filter = DoctorFilter {
            search: Some("Lee".to_string()),
            ..Default::default()
        };
        let req = client().build_list_doctors(Some(&filter));
        assert_eq!(req.url, "http://localhost:8000/api/v1/doctors");
        assert_eq!(req.query_value("name"), Some("Lee"));
        assert_eq!(req.query_value("search"), None);
        assert_eq!(req.query_value("skip"), Some("0"));
        assert_eq!(req.query_value("limit"), Some("100"));
    }

    #[test]
    fn build_list_doctors_without_search_has_no_name() {
        let req = client().build_list_doctors(None);
        assert_eq!(req.query_value("name"), None);
        assert_eq!(req.query.len(), 2);
    }

    #[test]
    fn build_create_follow_up_applies_defaults() {
        let draft = FollowUpDraft {
            elderly_id: Some(IdValue::Number(1)),
            doctor_id: Some(IdValue::Number(2)),
            ..Default::default()
        };
        let req = client().build_create_follow_up(&draft).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:8000/api/v1/follow-ups");
        assert_eq!(
            body_json(&req),
            json!({
                "elderly_id": 1,
                "doctor_id": 2,
                "schedule_strategy": "automated",
                "is_recurring": false
            })
        );
    }

    #[test]
    fn build_update_follow_up_sends_numeric_ids() {
        let draft = FollowUpDraft {
            elderly_id: Some("3".into()),
            doctor_id: Some("4".into()),
            ..Default::default()
        };
        let req = client().build_update_follow_up(5, &draft).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.url, "http://localhost:8000/api/v1/follow-ups/5");
        let body = body_json(&req);
        assert_eq!(body["elderly_id"], json!(3));
        assert_eq!(body["doctor_id"], json!(4));
        assert!(body["elderly_id"].is_i64());
    }

    #[test]
    fn build_update_follow_up_rejects_missing_id_before_sending() {
        let err = client()
            .build_update_follow_up(5, &FollowUpDraft::default())
            .unwrap_err();
        assert!(matches!(err, ApiError::MissingField("elderly_id")));
    }

    #[test]
    fn build_follow_ups_by_elderly_path() {
        let req = client().build_follow_ups_by_elderly(12);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:8000/api/v1/elderly/12/follow-ups");
    }

    #[test]
    fn report_requests_differ_only_in_accept() {
        let c = client();
        let blob = c.build_generate_report(3);
        let decoded = c.build_get_follow_up_report(3);
        assert_eq!(blob.url, "http://localhost:8000/api/v1/follow-ups/3/report");
        assert_eq!(blob.url, decoded.url);
        assert_eq!(blob.header("Accept"), Some("text/html"));
        assert_eq!(decoded.header("accept"), None);
    }

    #[test]
    fn parse_elderly_list_success() {
        let records = client()
            .parse_elderly_list(response(200, r#"[{"id":1,"name":"Zhang"}]"#))
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].profile.name.as_deref(), Some("Zhang"));
    }

    #[test]
    fn parse_created_follow_up_accepts_201() {
        let follow_up = client()
            .parse_follow_up(response(
                201,
                r#"{"id":8,"elderly_id":1,"doctor_id":2,"schedule_strategy":"automated","is_recurring":false}"#,
            ))
            .unwrap();
        assert_eq!(follow_up.id, 8);
        assert_eq!(follow_up.is_recurring, Some(false));
    }

    #[test]
    fn parse_keeps_error_status_and_body() {
        let err = client()
            .parse_doctor(response(500, r#"{"detail":"db down"}"#))
            .unwrap_err();
        match err {
            ApiError::Http { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, r#"{"detail":"db down"}"#);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn parse_not_found_is_not_an_empty_list() {
        let err = client()
            .parse_follow_up_list(response(404, r#"{"detail":"missing"}"#))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn parse_bad_json() {
        let err = client()
            .parse_elderly_list(response(200, "not json"))
            .unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn parse_delete_accepts_any_2xx() {
        let c = client();
        assert!(c.parse_delete(response(204, "")).is_ok());
        assert!(c.parse_delete(response(200, r#"{"ok":true}"#)).is_ok());
        assert!(c.parse_delete(response(404, "")).unwrap_err().is_not_found());
    }

    #[test]
    fn parse_report_blob_keeps_bytes_and_type() {
        let mut resp = response(200, "<html><body>report</body></html>");
        resp.headers
            .push(("content-type".to_string(), "text/html; charset=utf-8".to_string()));
        let blob = client().parse_report_blob(resp).unwrap();
        assert_eq!(blob.content_type.as_deref(), Some("text/html; charset=utf-8"));
        assert_eq!(blob.data, b"<html><body>report</body></html>".to_vec());
    }

    #[test]
    fn parse_report_payload_decodes_text_and_json() {
        let c = client();
        let html = c.parse_report_payload(response(200, "<p>ok</p>")).unwrap();
        assert_eq!(html, ReportPayload::Text("<p>ok</p>".to_string()));

        let data = c
            .parse_report_payload(response(200, r#"{"elderly_name":"Zhang"}"#))
            .unwrap();
        assert_eq!(data, ReportPayload::Json(json!({"elderly_name": "Zhang"})));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = CareClient::new("http://localhost:8000/api/v1/");
        let req = client.build_list_elderly(None);
        assert_eq!(req.url, "http://localhost:8000/api/v1/elderly");
    }
}
