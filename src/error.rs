use thiserror::Error;

/// Failure kinds for every operation the SDK exposes.
///
/// Each network-facing operation fails with its own variant carrying the
/// human-readable message extracted from the server response (or a fixed
/// fallback when the response carried none). Callers are expected to show
/// these messages near the action that triggered them.
#[derive(Error, Debug)]
pub enum AuthError {
    /// The registration endpoint rejected the signup.
    #[error("{0}")]
    Registration(String),

    /// The login endpoint rejected the credentials.
    #[error("{0}")]
    Login(String),

    /// The current-user endpoint did not return a profile.
    #[error("{0}")]
    FetchUser(String),

    /// The refresh endpoint rejected the stored refresh token, or none was
    /// stored. The token store has been cleared by the time this surfaces.
    #[error("{0}")]
    Refresh(String),

    #[error("{0}")]
    EmailCheck(String),

    #[error("{0}")]
    PasswordReset(String),

    #[error("{0}")]
    EmailVerification(String),

    /// A background refresh failed while retrying a rejected request; the
    /// client has been logged out and the caller should redirect to login.
    #[error("Session expired. Please log in again.")]
    SessionExpired,

    /// No response was received at all.
    #[error("Cannot reach server: {0}")]
    Connectivity(String),

    /// A non-2xx response without a recognizable failure shape.
    #[error("{message}")]
    Http { status: u16, message: String },
}
