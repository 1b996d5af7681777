//! API client core for the elderly-care backend.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). `CareApi` pairs that pure
//! core with an injected [`Transport`] to offer one async call per backend
//! operation.
//!
//! # Design
//! - `CareClient` is stateless; it holds only the base URL.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - Defaults, id coercion, date formatting and null-stripping of filters
//!   live in [`normalize`] as pure functions.
//! - DTOs are defined independently from the mock-backend crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod config;
pub mod date;
pub mod error;
pub mod http;
pub mod normalize;
pub mod transport;
pub mod types;

pub use api::CareApi;
pub use client::CareClient;
pub use config::ClientConfig;
pub use date::{format_date_only, format_date_to_backend, normalize_date_string, DateValue};
pub use error::{ApiError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, UreqTransport};
pub use types::{
    Doctor, DoctorFilter, DoctorProfile, ElderlyProfile, ElderlyRecord, Filter, FollowUp,
    FollowUpDraft, FollowUpFilter, FollowUpPayload, Id, IdValue, ReportBlob, ReportPayload,
};
