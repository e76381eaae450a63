use serde::{Deserialize, Serialize};

/// The credentials bundle issued by one login or refresh exchange.
///
/// Tokens are opaque bearer strings; the client never inspects them. Every
/// successful refresh supersedes the previous bundle wholesale.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Validity of the access token in seconds, when the server reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
}

impl AuthTokens {
    /// Convenience constructor for a bearer-typed bundle.
    pub fn bearer(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        expires_in: Option<i64>,
    ) -> Self {
        AuthTokens {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            token_type: "bearer".to_string(),
            expires_in,
        }
    }
}
