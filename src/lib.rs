//! Library exports for authkit, shared between the binary and tests.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod store;
pub mod utils;
