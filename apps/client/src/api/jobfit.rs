use crate::errors::ClientError;
use crate::gateway::transport::ApiRequest;
use crate::gateway::ApiClient;
use crate::models::job::JobFitSaved;
use crate::models::resume::ResumeId;

/// GET /jobfit/analysis/latest
pub async fn latest_analysis(
    api: &ApiClient,
    resume_id: ResumeId,
    role: Option<&str>,
    location: Option<&str>,
) -> Result<JobFitSaved, ClientError> {
    let request = ApiRequest::get("/jobfit/analysis/latest")
        .query("resume_id", resume_id)
        .query_opt("role", role)
        .query_opt("location", location);
    api.send_json(request).await
}

/// PUT /jobfit/analysis/{id}/refresh
pub async fn refresh_analysis(api: &ApiClient, analysis_id: i64) -> Result<JobFitSaved, ClientError> {
    api.send_json(ApiRequest::put(format!(
        "/jobfit/analysis/{analysis_id}/refresh"
    )))
    .await
}
