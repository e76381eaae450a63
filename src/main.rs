use std::sync::Arc;

use tracing::{error, info, warn};

use authkit::auth::AuthService;
use authkit::client::ApiClient;
use authkit::config::{load_config, print_schema};
use authkit::session::Session;
use authkit::store::create_store;
use authkit::utils::logger::init_logging;

/// Small driver around the SDK: restores any stored session and probes the
/// backend health endpoint. `authkit schema` prints the config schema.
#[tokio::main]
async fn main() {
    if std::env::args().nth(1).as_deref() == Some("schema") {
        print_schema();
        return;
    }

    let config = load_config();
    init_logging(&config.logging);

    let store = create_store(&config.store).await;
    if !store.is_enabled() {
        warn!("Token store is disabled; the session will not survive a restart");
    }
    let auth = Arc::new(AuthService::new(&config.api, store));
    let client = ApiClient::new(&config.api, auth.clone());

    let session = Session::new(auth);
    session.initialize().await;
    match session.snapshot().user {
        Some(user) => info!("Restored session for {}", user.full_name),
        None => info!("No stored session; starting anonymous"),
    }

    match client.health().await {
        Ok(health) => {
            if let Some(err) = health.error {
                error!("Backend reported an error: {}", err);
                std::process::exit(1);
            }
            info!(status = health.status.as_str(), "Backend is running and connected");
        }
        Err(e) => {
            error!("Cannot connect to backend: {}", e);
            std::process::exit(1);
        }
    }
}
