use anyhow::Result;
use tracing::{debug, warn};

use shared_config::AppConfig;
use shared_http::ApiClient;

use crate::models::{CatalogPayload, ServiceListResponse};

pub struct MedicalServiceClient {
    client: ApiClient,
}

impl MedicalServiceClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: ApiClient::new(base_url),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.medical_services_url)
    }

    async fn fetch(&self) -> Result<ServiceListResponse> {
        let payload: CatalogPayload = self.client.get("/services").await?;
        Ok(match payload {
            CatalogPayload::Envelope(response) => response,
            CatalogPayload::List(data) => ServiceListResponse::ok(data),
        })
    }

    /// Never fails: transport and decode errors come back as `success: false`.
    pub async fn get_all_services(&self) -> ServiceListResponse {
        match self.fetch().await {
            Ok(response) => {
                debug!("Fetched {} medical services", response.data.len());
                response
            }
            Err(e) => {
                warn!("Failed to fetch medical services from {}: {}", self.client.base_url(), e);
                ServiceListResponse::failed(format!("Failed to load services: {}", e))
            }
        }
    }
}
