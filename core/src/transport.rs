//! The I/O seam: something that turns an `HttpRequest` into an
//! `HttpResponse`.
//!
//! `UreqTransport` is the production implementation. Tests substitute their
//! own transports to observe requests or simulate failures.

use std::future::Future;
use std::time::Duration;

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes one HTTP round-trip.
///
/// Non-2xx responses are returned as data, not as errors; only a missing
/// response is a `TransportError`.
pub trait Transport: Send + Sync {
    fn send(&self, request: HttpRequest) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}

/// Blocking `ureq` agent driven from tokio's blocking pool.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let agent = self.agent.clone();
        tokio::task::spawn_blocking(move || execute(&agent, request))
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?
    }
}

fn prepare<B>(mut builder: ureq::RequestBuilder<B>, request: &HttpRequest) -> ureq::RequestBuilder<B> {
    for (key, value) in &request.query {
        builder = builder.query(key, value);
    }
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn execute(agent: &ureq::Agent, request: HttpRequest) -> Result<HttpResponse, TransportError> {
    let url = request.url.as_str();
    let result = match (request.method, request.body.as_deref()) {
        (HttpMethod::Get, _) => prepare(agent.get(url), &request).call(),
        (HttpMethod::Delete, _) => prepare(agent.delete(url), &request).call(),
        (HttpMethod::Post, Some(body)) => prepare(agent.post(url), &request).send(body.as_bytes()),
        (HttpMethod::Post, None) => prepare(agent.post(url), &request).send_empty(),
        (HttpMethod::Put, Some(body)) => prepare(agent.put(url), &request).send(body.as_bytes()),
        (HttpMethod::Put, None) => prepare(agent.put(url), &request).send_empty(),
    };

    let mut response = result.map_err(map_error)?;
    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();
    let body = response.body_mut().read_to_vec().map_err(map_error)?;

    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}

fn map_error(error: ureq::Error) -> TransportError {
    match error {
        ureq::Error::Timeout(_) => TransportError::Timeout,
        other => TransportError::Network(other.to_string()),
    }
}
