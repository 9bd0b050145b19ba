use bytes::Bytes;

use crate::errors::ClientError;
use crate::gateway::transport::{ApiRequest, FormPart};
use crate::gateway::ApiClient;
use crate::models::resume::{MessageResponse, ResumeId, ResumeRecord, UploadResponse};

/// GET /resumes
/// Listed oldest first; the last entry is the most recent upload.
pub async fn list_resumes(api: &ApiClient) -> Result<Vec<ResumeRecord>, ClientError> {
    api.send_json(ApiRequest::get("/resumes")).await
}

/// GET /resumes/{id}
pub async fn get_resume(api: &ApiClient, id: ResumeId) -> Result<ResumeRecord, ClientError> {
    api.send_json(ApiRequest::get(format!("/resumes/{id}"))).await
}

/// POST /resumes
pub async fn create_resume(
    api: &ApiClient,
    file_name: &str,
    resume_text: &str,
) -> Result<ResumeRecord, ClientError> {
    api.send_json(ApiRequest::post("/resumes").multipart(resume_form(file_name, resume_text)))
        .await
}

/// PUT /resumes/{id}
pub async fn update_resume(
    api: &ApiClient,
    id: ResumeId,
    file_name: &str,
    resume_text: &str,
) -> Result<ResumeRecord, ClientError> {
    api.send_json(
        ApiRequest::put(format!("/resumes/{id}")).multipart(resume_form(file_name, resume_text)),
    )
    .await
}

/// DELETE /resumes/{id}
pub async fn delete_resume(api: &ApiClient, id: ResumeId) -> Result<MessageResponse, ClientError> {
    api.send_json(ApiRequest::delete(format!("/resumes/{id}"))).await
}

/// POST /upload/pdf
/// The backend extracts the text and stores a new résumé row.
pub async fn upload_pdf(
    api: &ApiClient,
    file_name: &str,
    data: Bytes,
) -> Result<UploadResponse, ClientError> {
    let part = FormPart::File {
        name: "file".to_string(),
        file_name: file_name.to_string(),
        content_type: Some("application/pdf".to_string()),
        data,
    };
    api.send_json(ApiRequest::post("/upload/pdf").multipart(vec![part]))
        .await
}

fn resume_form(file_name: &str, resume_text: &str) -> Vec<FormPart> {
    vec![
        FormPart::text("file_name", file_name),
        FormPart::text("resume_text", resume_text),
    ]
}
