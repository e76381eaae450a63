use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, warn};

use crate::auth::AuthService;
use crate::error::AuthError;
use crate::models::api::LoginRequest;
use crate::models::user::UserProfile;

/// Snapshot of the process-wide authentication state.
#[derive(Clone, Debug)]
pub struct SessionState {
    pub user: Option<UserProfile>,
    pub loading: bool,
}

impl SessionState {
    /// True iff a profile was successfully fetched after the last accepted
    /// credentials bundle.
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// The single owner of "who is logged in".
///
/// Constructed once at startup and shared by reference with everything
/// that needs to read the state; consumers take snapshots rather than
/// holding the lock. Cycles between anonymous and authenticated for the
/// lifetime of the process, starting in a loading state until
/// [`initialize`](Session::initialize) has run.
pub struct Session {
    auth: Arc<AuthService>,
    state: RwLock<SessionState>,
}

impl Session {
    pub fn new(auth: Arc<AuthService>) -> Self {
        Session {
            auth,
            state: RwLock::new(SessionState {
                user: None,
                loading: true,
            }),
        }
    }

    pub fn snapshot(&self) -> SessionState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_user(&self, user: Option<UserProfile>) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .user = user;
    }

    fn set_loading(&self, loading: bool) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .loading = loading;
    }

    /// Startup check: restore the session from stored credentials when
    /// possible. Failures degrade quietly to the anonymous state with the
    /// store cleared; startup is not user-initiated, so there is nobody to
    /// report an error to.
    pub async fn initialize(&self) {
        if self.auth.access_token().await.is_some() {
            let restored = if !self.auth.is_token_expired().await {
                // Token looks valid locally; go straight for the profile.
                self.auth.current_user().await
            } else {
                // Token present but expired; try a silent refresh first.
                match self.auth.refresh_token().await {
                    Ok(_) => self.auth.current_user().await,
                    Err(e) => Err(e),
                }
            };

            match restored {
                Ok(user) => {
                    self.auth.cache_user(&user).await;
                    self.set_user(Some(user));
                }
                Err(e) => {
                    debug!("Silent session restore failed: {}", e);
                    self.auth.logout().await;
                }
            }
        }
        self.set_loading(false);
    }

    /// Logs in with email + password and fetches the profile. On failure
    /// the state stays anonymous and the error propagates for display.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, AuthError> {
        self.set_loading(true);
        let result = self.login_inner(email, password).await;
        self.set_loading(false);
        match result {
            Ok(user) => {
                self.set_user(Some(user.clone()));
                Ok(user)
            }
            Err(e) => {
                warn!("Login failed: {}", e);
                Err(e)
            }
        }
    }

    async fn login_inner(&self, email: &str, password: &str) -> Result<UserProfile, AuthError> {
        let credentials = LoginRequest::with_email(email, password);
        self.auth.login(&credentials).await?;
        let user = self.auth.current_user().await?;
        self.auth.cache_user(&user).await;
        Ok(user)
    }

    /// Always ends anonymous with an empty store; never fails.
    pub async fn logout(&self) {
        self.set_loading(true);
        self.auth.logout().await;
        self.set_user(None);
        self.set_loading(false);
    }

    /// Re-fetches the profile in place. On failure the current state is
    /// kept and the error propagates; a stale profile beats an
    /// unexplained logout.
    pub async fn refresh_user(&self) -> Result<(), AuthError> {
        let user = self.auth.current_user().await?;
        self.auth.cache_user(&user).await;
        self.set_user(Some(user));
        Ok(())
    }
}
