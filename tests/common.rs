use std::sync::Arc;

use authkit::auth::AuthService;
use authkit::client::ApiClient;
use authkit::config::ApiConfig;
use authkit::models::token::AuthTokens;
use authkit::session::Session;
use authkit::store::MemoryStore;

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub auth: Arc<AuthService>,
    pub client: ApiClient,
    pub session: Session,
}

/// Wires the full stack (store -> auth -> client/session) against a mock
/// server base URL, with an in-memory store the tests can preload and
/// inspect.
pub fn build_harness(base_url: &str) -> Harness {
    let config = ApiConfig {
        base_url: base_url.to_string(),
    };
    let store = Arc::new(MemoryStore::new());
    let auth = Arc::new(AuthService::new(&config, store.clone()));
    let client = ApiClient::new(&config, auth.clone());
    let session = Session::new(auth.clone());

    Harness {
        store,
        auth,
        client,
        session,
    }
}

pub fn tokens(access: &str, refresh: &str, expires_in: Option<i64>) -> AuthTokens {
    AuthTokens::bearer(access, refresh, expires_in)
}

pub fn profile_body(id: i64, full_name: &str) -> String {
    format!(
        r#"{{
            "id": {id},
            "fullName": "{full_name}",
            "email": "a@b.com",
            "emailVerified": true,
            "phoneNumber": null,
            "phoneVerified": false,
            "role": "STUDENT",
            "profilePictureUrl": null,
            "bio": null,
            "country": null,
            "city": null,
            "skills": ["rust"],
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        }}"#
    )
}

pub fn tokens_body(access: &str, refresh: &str, expires_in: i64) -> String {
    format!(
        r#"{{"access_token":"{access}","refresh_token":"{refresh}","token_type":"bearer","expires_in":{expires_in}}}"#
    )
}
