// Public API - what other modules can use
pub use handlers::{delete_account, get_account, list_accounts, transfer};
pub use types::{AccountResponse, MessageResponse, TransferRequest};

// Internal modules
pub mod generators;
mod handlers;
pub mod models;
pub mod repository;
pub mod service;
mod types;
