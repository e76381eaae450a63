use std::sync::Arc;

use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::auth::AuthService;
use crate::config::ApiConfig;
use crate::error::AuthError;
use crate::models::api::HealthStatus;

/// General-purpose authenticated request wrapper.
///
/// Every API call outside the auth exchanges goes through here: the stored
/// bearer token is attached, and a 401 triggers exactly one token refresh
/// followed by one retry. The auth endpoints themselves bypass this wrapper
/// (see [`AuthService`]) so a rejected refresh can never recurse.
pub struct ApiClient {
    base_url: String,
    http: Client,
    auth: Arc<AuthService>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, auth: Arc<AuthService>) -> Self {
        ApiClient {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
            auth,
        }
    }

    /// Issues one request against `base_url + path`.
    ///
    /// On a 401 the stored refresh token is exchanged once and the request
    /// retried once with the new bearer token; the retry's outcome is
    /// final, whatever it is. If the refresh itself fails, the client is
    /// forcibly logged out and the caller gets [`AuthError::SessionExpired`]
    /// instead of the original 401 — the right reaction is to redirect to
    /// a login entry point.
    ///
    /// Concurrent callers that each hit a 401 will each refresh
    /// independently; the store keeps whichever bundle lands last.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Response, AuthError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("API request: {} {}", method, url);

        let mut response = self.send(method.clone(), &url, body).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            match self.auth.refresh_token().await {
                Ok(_) => {
                    // send() re-reads the store, so the retry carries the
                    // refreshed token.
                    response = self.send(method, &url, body).await?;
                }
                Err(e) => {
                    warn!("Token refresh failed, forcing logout: {}", e);
                    self.auth.logout().await;
                    return Err(AuthError::SessionExpired);
                }
            }
        }

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|value| {
                    value
                        .get("detail")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                });
            let message = detail.unwrap_or_else(|| format!("HTTP error: {}", status));
            return Err(AuthError::Http { status, message });
        }

        Ok(response)
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<Response, AuthError> {
        let mut request = self
            .http
            .request(method, url)
            .header("Content-Type", "application/json");
        if let Some(token) = self.auth.access_token().await {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        request.send().await.map_err(|e| {
            error!("API request failed: {}", e);
            AuthError::Connectivity(e.to_string())
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, AuthError> {
        let status = response.status().as_u16();
        response.json().await.map_err(|e| AuthError::Http {
            status,
            message: format!("Invalid response body: {}", e),
        })
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, AuthError> {
        let response = self.request(Method::GET, path, None).await?;
        Self::decode(response).await
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&Value>,
    ) -> Result<T, AuthError> {
        let response = self.request(Method::POST, path, body).await?;
        Self::decode(response).await
    }

    pub async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&Value>,
    ) -> Result<T, AuthError> {
        let response = self.request(Method::PUT, path, body).await?;
        Self::decode(response).await
    }

    pub async fn patch<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&Value>,
    ) -> Result<T, AuthError> {
        let response = self.request(Method::PATCH, path, body).await?;
        Self::decode(response).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, AuthError> {
        let response = self.request(Method::DELETE, path, None).await?;
        Self::decode(response).await
    }

    /// Probes the backend health endpoint at the service root (not under
    /// `/api`).
    pub async fn health(&self) -> Result<HealthStatus, AuthError> {
        self.get("/health").await
    }
}
