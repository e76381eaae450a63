use serde::{Deserialize, Serialize};

use super::user::{Role, SignupProvider};

/// Registration fields submitted to `/api/auth/register`.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<SignupProvider>,
    pub accepted_terms: bool,
    pub subscribe_newsletter: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

/// Login credentials: email or phone number, plus password.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub password: String,
}

impl LoginRequest {
    pub fn with_email(email: impl Into<String>, password: impl Into<String>) -> Self {
        LoginRequest {
            email: Some(email.into()),
            phone_number: None,
            password: password.into(),
        }
    }
}

/// Confirmation returned by a successful registration.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SignupResponse {
    pub message: String,
    pub user_id: i64,
    pub verification_sent: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct EmailAvailability {
    pub available: bool,
}

/// Body of the backend health probe at `/health`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct HealthStatus {
    pub status: String,
    pub uptime: Option<f64>,
    pub error: Option<String>,
}
