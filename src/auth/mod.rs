pub mod detail;
pub mod service;

pub use service::AuthService;
