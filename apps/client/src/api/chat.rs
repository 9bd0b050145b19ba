use crate::errors::ClientError;
use crate::gateway::transport::ApiRequest;
use crate::gateway::ApiClient;
use crate::models::chat::{ChatMessage, ChatReply, ChatRequest};
use crate::models::resume::ResumeId;

/// GET /chat/history/{resumeId}
pub async fn chat_history(api: &ApiClient, resume_id: ResumeId) -> Result<Vec<ChatMessage>, ClientError> {
    api.send_json(ApiRequest::get(format!("/chat/history/{resume_id}")))
        .await
}

/// POST /chat
pub async fn send_chat_message(
    api: &ApiClient,
    resume_id: ResumeId,
    message: &str,
) -> Result<ChatReply, ClientError> {
    let body = ChatRequest {
        thread_id: resume_id.to_string(),
        message: message.to_string(),
    };
    api.send_json(ApiRequest::post("/chat").json(serde_json::to_value(&body)?))
        .await
}
