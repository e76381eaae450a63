pub mod api;
pub mod token;
pub mod user;

// Re-export the wire types so callers can do
// "use authkit::models::{AuthTokens, UserProfile};".
pub use api::{EmailAvailability, HealthStatus, LoginRequest, SignupRequest, SignupResponse};
pub use token::AuthTokens;
pub use user::{Role, SignupProvider, UserProfile};
