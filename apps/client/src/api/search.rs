use crate::api::encode_path_segment;
use crate::errors::ClientError;
use crate::gateway::transport::ApiRequest;
use crate::gateway::ApiClient;
use crate::models::job::{JobDetail, JobSearchResponse, ResumeSearchRequest, SearchRequest};

pub const DEFAULT_SEARCH_LIMIT: u32 = 10;

/// POST /search
pub async fn search_jobs(
    api: &ApiClient,
    query: &str,
    limit: u32,
) -> Result<JobSearchResponse, ClientError> {
    let body = SearchRequest {
        query: query.to_string(),
        limit,
    };
    api.send_json(ApiRequest::post("/search").json(serde_json::to_value(&body)?))
        .await
}

/// POST /search/resume
pub async fn search_jobs_from_resume(
    api: &ApiClient,
    request: &ResumeSearchRequest,
) -> Result<JobSearchResponse, ClientError> {
    api.send_json(ApiRequest::post("/search/resume").json(serde_json::to_value(request)?))
        .await
}

/// GET /search/job/{id}
pub async fn job_detail(api: &ApiClient, job_id: &str) -> Result<JobDetail, ClientError> {
    api.send_json(ApiRequest::get(format!(
        "/search/job/{}",
        encode_path_segment(job_id)
    )))
    .await
}
