use serde::{Deserialize, Serialize};

/// JWT claims binding a token to an account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountClaims {
    pub id: i64,    // Account identifier
    pub exp: usize, // Expiration timestamp (standard JWT claim)
    pub iat: usize, // Issued at timestamp (standard JWT claim)
}

/// Request payload for the sign-up endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct SignUpRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Request payload for the sign-in endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}
