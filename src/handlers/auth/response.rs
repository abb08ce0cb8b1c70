//! Authentication response DTOs

use serde::Serialize;
use uuid::Uuid;

/// Login / refresh response
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<AuthUserResponse>,
}

/// User identity returned on login
#[derive(Debug, Serialize)]
pub struct AuthUserResponse {
    pub id: Uuid,
    pub code: i32,
    pub name: String,
    pub lastname: String,
    pub email: String,
    pub roles: Vec<String>,
}
