//! Async facade pairing a `CareClient` with a `Transport`.
//!
//! Each operation builds exactly one request, awaits one round-trip and
//! parses the result. There is no retry, no cache and no fallback value:
//! a transport failure or non-2xx response comes back as `Err`.

use crate::client::CareClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};
use crate::types::{
    Doctor, DoctorFilter, DoctorProfile, ElderlyProfile, ElderlyRecord, Filter, FollowUp,
    FollowUpDraft, FollowUpFilter, Id, ReportBlob, ReportPayload,
};

#[derive(Debug, Clone)]
pub struct CareApi<T> {
    client: CareClient,
    transport: T,
}

impl CareApi<UreqTransport> {
    /// Client and `ureq` transport built from the same configuration.
    ///
    /// Calls must be made from within a tokio runtime.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(CareClient::from_config(config), UreqTransport::new(config.timeout))
    }
}

impl<T: Transport> CareApi<T> {
    pub fn new(client: CareClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &CareClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let method = request.method;
        let url = request.url.clone();

        let response = self.transport.send(request).await.map_err(|e| {
            tracing::warn!(%method, %url, error = %e, "Request failed");
            ApiError::from(e)
        })?;

        if response.is_success() {
            tracing::debug!(%method, %url, status = response.status, bytes = response.body.len(), "Response received");
            tracing::trace!(%url, payload = %String::from_utf8_lossy(&response.body));
        } else {
            tracing::warn!(%method, %url, status = response.status, "Backend returned an error status");
        }
        Ok(response)
    }

    // --- elderly ---

    pub async fn list_elderly(&self, filter: Option<&Filter>) -> Result<Vec<ElderlyRecord>, ApiError> {
        let response = self.execute(self.client.build_list_elderly(filter)).await?;
        self.client.parse_elderly_list(response)
    }

    pub async fn get_elderly(&self, id: Id) -> Result<ElderlyRecord, ApiError> {
        let response = self.execute(self.client.build_get_elderly(id)).await?;
        self.client.parse_elderly(response)
    }

    pub async fn create_elderly(&self, record: &ElderlyProfile) -> Result<ElderlyRecord, ApiError> {
        let response = self.execute(self.client.build_create_elderly(record)?).await?;
        self.client.parse_elderly(response)
    }

    pub async fn update_elderly(&self, id: Id, record: &ElderlyProfile) -> Result<ElderlyRecord, ApiError> {
        let response = self.execute(self.client.build_update_elderly(id, record)?).await?;
        self.client.parse_elderly(response)
    }

    pub async fn delete_elderly(&self, id: Id) -> Result<(), ApiError> {
        let response = self.execute(self.client.build_delete_elderly(id)).await?;
        self.client.parse_delete(response)
    }

    // --- doctors ---

    pub async fn list_doctors(&self, filter: Option<&DoctorFilter>) -> Result<Vec<Doctor>, ApiError> {
        let response = self.execute(self.client.build_list_doctors(filter)).await?;
        self.client.parse_doctor_list(response)
    }

    pub async fn get_doctor(&self, id: Id) -> Result<Doctor, ApiError> {
        let response = self.execute(self.client.build_get_doctor(id)).await?;
        self.client.parse_doctor(response)
    }

    pub async fn create_doctor(&self, record: &DoctorProfile) -> Result<Doctor, ApiError> {
        let response = self.execute(self.client.build_create_doctor(record)?).await?;
        self.client.parse_doctor(response)
    }

    pub async fn update_doctor(&self, id: Id, record: &DoctorProfile) -> Result<Doctor, ApiError> {
        let response = self.execute(self.client.build_update_doctor(id, record)?).await?;
        self.client.parse_doctor(response)
    }

    pub async fn delete_doctor(&self, id: Id) -> Result<(), ApiError> {
        let response = self.execute(self.client.build_delete_doctor(id)).await?;
        self.client.parse_delete(response)
    }

    // --- follow-ups ---

    pub async fn list_follow_ups(&self, filter: &FollowUpFilter) -> Result<Vec<FollowUp>, ApiError> {
        let response = self.execute(self.client.build_list_follow_ups(filter)).await?;
        self.client.parse_follow_up_list(response)
    }

    pub async fn get_follow_up(&self, id: Id) -> Result<FollowUp, ApiError> {
        let response = self.execute(self.client.build_get_follow_up(id)).await?;
        self.client.parse_follow_up(response)
    }

    pub async fn create_follow_up(&self, draft: &FollowUpDraft) -> Result<FollowUp, ApiError> {
        let response = self.execute(self.client.build_create_follow_up(draft)?).await?;
        self.client.parse_follow_up(response)
    }

    pub async fn update_follow_up(&self, id: Id, draft: &FollowUpDraft) -> Result<FollowUp, ApiError> {
        let response = self.execute(self.client.build_update_follow_up(id, draft)?).await?;
        self.client.parse_follow_up(response)
    }

    pub async fn delete_follow_up(&self, id: Id) -> Result<(), ApiError> {
        let response = self.execute(self.client.build_delete_follow_up(id)).await?;
        self.client.parse_delete(response)
    }

    pub async fn follow_ups_by_elderly(&self, elderly_id: Id) -> Result<Vec<FollowUp>, ApiError> {
        let response = self.execute(self.client.build_follow_ups_by_elderly(elderly_id)).await?;
        self.client.parse_follow_up_list(response)
    }

    // --- reports ---

    /// Report as an opaque blob, for download.
    pub async fn generate_report(&self, id: Id) -> Result<ReportBlob, ApiError> {
        let response = self.execute(self.client.build_generate_report(id)).await?;
        self.client.parse_report_blob(response)
    }

    /// Report as a decoded body, for inline display.
    pub async fn get_follow_up_report(&self, id: Id) -> Result<ReportPayload, ApiError> {
        let response = self.execute(self.client.build_get_follow_up_report(id)).await?;
        self.client.parse_report_payload(response)
    }
}
