use crate::errors::ClientError;
use crate::gateway::transport::{ApiRequest, FormPart};
use crate::gateway::ApiClient;
use crate::models::resume::ResumeId;
use crate::models::review::{ResumeReviewResponse, ReviewParams};

/// POST /resume/review
/// Runs an AI review of the résumé text and persists it against `resume_id`.
pub async fn review_resume(
    api: &ApiClient,
    resume_id: ResumeId,
    resume_text: &str,
    params: ReviewParams,
) -> Result<ResumeReviewResponse, ClientError> {
    let parts = vec![
        FormPart::text("resume_id", resume_id.to_string()),
        FormPart::text("resume_text", resume_text),
        FormPart::text("k", params.k.to_string()),
        FormPart::text("lambda_mult", params.lambda_mult.to_string()),
    ];
    api.send_json(ApiRequest::post("/resume/review").multipart(parts))
        .await
}

/// GET /resume/{id}/review
pub async fn latest_review(
    api: &ApiClient,
    resume_id: ResumeId,
) -> Result<ResumeReviewResponse, ClientError> {
    api.send_json(ApiRequest::get(format!("/resume/{resume_id}/review")))
        .await
}
