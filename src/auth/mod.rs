// Public API - what other modules can use
pub use handlers::{sign_in, sign_up};
pub use middleware::{jwt_auth, TOKEN_HEADER};
pub use token::{TokenConfig, TokenService, DEFAULT_EXPIRATION_HOURS};
pub use types::{AccountClaims, SignInRequest, SignUpRequest};

// Internal modules
mod handlers;
mod middleware;
pub mod password;
pub mod service;
mod token;
mod types;
