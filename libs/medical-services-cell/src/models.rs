use serde::{Deserialize, Serialize};

/// One entry of the hospital's service catalog, as shown on the landing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalService {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub duration_minutes: Option<u32>,
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceListResponse {
    pub success: bool,
    pub data: Vec<MedicalService>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ServiceListResponse {
    pub fn ok(data: Vec<MedicalService>) -> Self {
        Self { success: true, data, message: None }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self { success: false, data: Vec::new(), message: Some(message.into()) }
    }
}

/// Backends answer either with the envelope or with a bare list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum CatalogPayload {
    Envelope(ServiceListResponse),
    List(Vec<MedicalService>),
}
