//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results. Comparing parsed JSON (not raw strings) avoids
//! false negatives from field-ordering differences.

use care_core::{
    ApiError, CareClient, Doctor, DoctorFilter, ElderlyProfile, ElderlyRecord, FollowUp,
    FollowUpDraft, HttpMethod, HttpRequest, HttpResponse,
};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:8000/api/v1";

fn client() -> CareClient {
    CareClient::new(BASE_URL)
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn pairs(value: &Value) -> Vec<(String, String)> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .map(|pair| {
                    let arr = pair.as_array().unwrap();
                    (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
                })
                .collect()
        })
        .unwrap_or_default()
}

fn simulated(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().as_bytes().to_vec(),
    }
}

fn assert_request(name: &str, req: &HttpRequest, expected: &Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.url, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: path");
    if !expected["query"].is_null() {
        assert_eq!(req.query, pairs(&expected["query"]), "{name}: query");
    }
    if !expected["headers"].is_null() {
        assert_eq!(req.headers, pairs(&expected["headers"]), "{name}: headers");
    }
    match expected.get("body") {
        Some(body) => {
            let sent: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(&sent, body, "{name}: body");
        }
        None => assert!(req.body.is_none(), "{name}: body should be None"),
    }
}

fn assert_expected_error<T: std::fmt::Debug>(name: &str, case: &Value, result: Result<T, ApiError>) -> Option<T> {
    match case.get("expected_error") {
        Some(status) => {
            let err = result.unwrap_err();
            assert_eq!(err.status(), status.as_u64().map(|s| s as u16), "{name}: status");
            None
        }
        None => Some(result.unwrap()),
    }
}

// ---------------------------------------------------------------------------
// Elderly
// ---------------------------------------------------------------------------

#[test]
fn elderly_test_vectors() {
    let raw = include_str!("../../test-vectors/elderly.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let id = case["input_id"].as_i64();

        let req = match case["operation"].as_str().unwrap() {
            "list" => c.build_list_elderly(case["filter"].as_object()),
            "get" => c.build_get_elderly(id.unwrap()),
            "create" => {
                let input: ElderlyProfile = serde_json::from_value(case["input"].clone()).unwrap();
                c.build_create_elderly(&input).unwrap()
            }
            "update" => {
                let input: ElderlyProfile = serde_json::from_value(case["input"].clone()).unwrap();
                c.build_update_elderly(id.unwrap(), &input).unwrap()
            }
            other => panic!("{name}: unknown operation {other}"),
        };
        assert_request(name, &req, &case["expected_request"]);

        let response = simulated(case);
        if case["operation"] == "list" {
            let records = c.parse_elderly_list(response).unwrap();
            let expected: Vec<ElderlyRecord> = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(records, expected, "{name}: parsed result");
        } else if let Some(record) = assert_expected_error(name, case, c.parse_elderly(response)) {
            let expected: ElderlyRecord = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(record, expected, "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Doctors
// ---------------------------------------------------------------------------

#[test]
fn doctor_test_vectors() {
    let raw = include_str!("../../test-vectors/doctors.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let f = &case["filter"];
        let filter = DoctorFilter {
            skip: f["skip"].as_u64().map(|v| v as u32),
            limit: f["limit"].as_u64().map(|v| v as u32),
            search: f["search"].as_str().map(str::to_string),
        };

        let req = c.build_list_doctors(Some(&filter));
        assert_request(name, &req, &case["expected_request"]);

        let doctors = c.parse_doctor_list(simulated(case)).unwrap();
        let expected: Vec<Doctor> = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(doctors, expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Follow-ups
// ---------------------------------------------------------------------------

#[test]
fn follow_up_test_vectors() {
    let raw = include_str!("../../test-vectors/follow_ups.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input: FollowUpDraft = serde_json::from_value(case["input"].clone()).unwrap();

        let req = match case["operation"].as_str().unwrap() {
            "create" => c.build_create_follow_up(&input).unwrap(),
            "update" => c
                .build_update_follow_up(case["input_id"].as_i64().unwrap(), &input)
                .unwrap(),
            other => panic!("{name}: unknown operation {other}"),
        };
        assert_request(name, &req, &case["expected_request"]);

        if let Some(follow_up) = assert_expected_error(name, case, c.parse_follow_up(simulated(case))) {
            let expected: FollowUp = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(follow_up, expected, "{name}: parsed result");
        }
    }
}
