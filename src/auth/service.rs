use std::sync::Arc;

use reqwest::Client;
use serde_json::json;
use tracing::{debug, warn};

use super::detail::extract_detail;
use crate::config::ApiConfig;
use crate::error::AuthError;
use crate::models::api::{EmailAvailability, LoginRequest, SignupRequest, SignupResponse};
use crate::models::token::AuthTokens;
use crate::models::user::UserProfile;
use crate::store::TokenStore;

/// The sole component performing credential-bearing exchanges and the sole
/// writer of the token store. Calls here go straight to the API rather
/// than through [`ApiClient`](crate::client::ApiClient); routing the auth
/// endpoints through the retrying wrapper would loop on a rejected
/// refresh.
pub struct AuthService {
    base_url: String,
    http: Client,
    store: Arc<dyn TokenStore>,
}

impl AuthService {
    pub fn new(config: &ApiConfig, store: Arc<dyn TokenStore>) -> Self {
        AuthService {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
            store,
        }
    }

    fn api_url(&self, endpoint: &str) -> String {
        format!("{}/api{}", self.base_url, endpoint)
    }

    /// Submits a registration to `/auth/register`.
    pub async fn signup(&self, data: &SignupRequest) -> Result<SignupResponse, AuthError> {
        let url = self.api_url("/auth/register");
        debug!("Submitting registration for {}", data.email);
        let response = self
            .http
            .post(&url)
            .json(data)
            .send()
            .await
            .map_err(connectivity)?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Registration(extract_detail(
                &body,
                "Registration failed",
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AuthError::Registration(format!("Invalid registration response: {}", e)))
    }

    /// Exchanges credentials for a token bundle via `/auth/login`. The
    /// bundle is persisted before this returns, so a concurrent reader of
    /// the store observes either the old or the fully-new bundle.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<AuthTokens, AuthError> {
        let url = self.api_url("/auth/login");
        let response = self
            .http
            .post(&url)
            .json(credentials)
            .send()
            .await
            .map_err(connectivity)?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Login(extract_detail(&body, "Login failed")));
        }

        let tokens: AuthTokens = response
            .json()
            .await
            .map_err(|e| AuthError::Login(format!("Invalid login response: {}", e)))?;
        self.store.save(&tokens).await;
        debug!("Login succeeded; credentials persisted");
        Ok(tokens)
    }

    /// Drops all stored credentials. Infallible from the caller's point of
    /// view: whatever happens internally, the client ends up logged out.
    pub async fn logout(&self) {
        self.store.clear().await;
        debug!("Cleared stored credentials");
    }

    /// Fetches the profile for the stored bearer token via `/auth/me`.
    /// Performs no refresh itself; that is the request wrapper's job.
    pub async fn current_user(&self) -> Result<UserProfile, AuthError> {
        let url = self.api_url("/auth/me");
        let mut request = self.http.get(&url);
        if let Some(token) = self.store.access_token().await {
            request = request.bearer_auth(token);
        }
        let response = request.send().await.map_err(connectivity)?;

        if !response.status().is_success() {
            return Err(AuthError::FetchUser("Failed to fetch user data".to_string()));
        }

        response
            .json()
            .await
            .map_err(|e| AuthError::FetchUser(format!("Invalid profile response: {}", e)))
    }

    /// Exchanges the stored refresh token for a new bundle via
    /// `/auth/refresh-token`. A rejected refresh token means the session
    /// cannot be silently recovered, so the store is cleared before the
    /// error surfaces.
    pub async fn refresh_token(&self) -> Result<AuthTokens, AuthError> {
        let refresh = self
            .store
            .refresh_token()
            .await
            .ok_or_else(|| AuthError::Refresh("No refresh token available".to_string()))?;

        let url = self.api_url("/auth/refresh-token");
        let response = self
            .http
            .post(&url)
            .json(&json!({ "refresh_token": refresh }))
            .send()
            .await
            .map_err(connectivity)?;

        if !response.status().is_success() {
            self.store.clear().await;
            return Err(AuthError::Refresh("Token refresh failed".to_string()));
        }

        let tokens: AuthTokens = response
            .json()
            .await
            .map_err(|e| AuthError::Refresh(format!("Invalid refresh response: {}", e)))?;
        self.store.save(&tokens).await;
        debug!("Refreshed credentials persisted");
        Ok(tokens)
    }

    /// Asks `/auth/check-email` whether an address is free to register.
    pub async fn check_email_availability(
        &self,
        email: &str,
    ) -> Result<EmailAvailability, AuthError> {
        let url = self.api_url("/auth/check-email");
        let response = self
            .http
            .post(&url)
            .json(&json!({ "email": email }))
            .send()
            .await
            .map_err(connectivity)?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::EmailCheck(extract_detail(
                &body,
                "Failed to check email availability",
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AuthError::EmailCheck(format!("Invalid availability response: {}", e)))
    }

    pub async fn request_password_reset(&self, email: &str) -> Result<(), AuthError> {
        self.simple_post(
            "/auth/forgot-password",
            json!({ "email": email }),
            AuthError::PasswordReset,
            "Password reset request failed",
        )
        .await
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AuthError> {
        self.simple_post(
            "/auth/reset-password",
            json!({ "token": token, "new_password": new_password }),
            AuthError::PasswordReset,
            "Password reset failed",
        )
        .await
    }

    pub async fn verify_email(&self, token: &str) -> Result<(), AuthError> {
        self.simple_post(
            "/auth/verify-email",
            json!({ "token": token }),
            AuthError::EmailVerification,
            "Email verification failed",
        )
        .await
    }

    pub async fn resend_verification(&self, email: &str) -> Result<(), AuthError> {
        self.simple_post(
            "/auth/resend-verification",
            json!({ "email": email }),
            AuthError::EmailVerification,
            "Failed to resend verification",
        )
        .await
    }

    /// One-shot POST with no response body of interest. These are
    /// at-most-once, user-initiated actions; no retries.
    async fn simple_post(
        &self,
        endpoint: &str,
        body: serde_json::Value,
        wrap: fn(String) -> AuthError,
        fallback: &str,
    ) -> Result<(), AuthError> {
        let url = self.api_url(endpoint);
        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(connectivity)?;

        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(wrap(extract_detail(&text, fallback)));
        }
        Ok(())
    }

    // Pass-through reads for callers that decide whether to refresh.

    pub async fn access_token(&self) -> Option<String> {
        self.store.access_token().await
    }

    pub async fn is_token_expired(&self) -> bool {
        self.store.is_expired().await
    }

    /// Persist a profile snapshot for cold-start display.
    pub async fn cache_user(&self, user: &UserProfile) {
        self.store.save_user(user).await;
    }

    pub async fn cached_user(&self) -> Option<UserProfile> {
        self.store.cached_user().await
    }
}

fn connectivity(e: reqwest::Error) -> AuthError {
    warn!("Network request failed: {}", e);
    AuthError::Connectivity(e.to_string())
}
