// Library crate for the bank account API
// This file exposes the public API for the binary and integration tests

pub mod account;
pub mod auth;
pub mod config;
pub mod routes;
pub mod shared;

// Re-export commonly used types for easier access in tests
pub use account::repository::{AccountRepository, InMemoryAccountRepository, PostgresAccountRepository};
pub use config::AppConfig;
pub use routes::create_router;
pub use shared::{AppError, AppState};
