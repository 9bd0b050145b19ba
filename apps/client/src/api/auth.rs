use crate::errors::ClientError;
use crate::gateway::transport::ApiRequest;
use crate::gateway::ApiClient;
use crate::models::user::{RegisterRequest, TokenResponse, User};

/// POST /register
pub async fn register(api: &ApiClient, profile: &RegisterRequest) -> Result<User, ClientError> {
    api.send_json(ApiRequest::post("/register").json(serde_json::to_value(profile)?))
        .await
}

/// POST /token
/// OAuth2 password flow: the email travels as `username`.
pub async fn login(api: &ApiClient, email: &str, password: &str) -> Result<TokenResponse, ClientError> {
    api.send_json(ApiRequest::post("/token").form(&[("username", email), ("password", password)]))
        .await
}

/// GET /users/me
pub async fn current_user(api: &ApiClient) -> Result<User, ClientError> {
    api.send_json(ApiRequest::get("/users/me")).await
}
