use serde::{Deserialize, Serialize};

use crate::errors::ClientError;
use crate::gateway::transport::ApiRequest;
use crate::gateway::ApiClient;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
}

/// GET /health
pub async fn health(api: &ApiClient) -> Result<HealthStatus, ClientError> {
    api.send_json(ApiRequest::get("/health")).await
}
