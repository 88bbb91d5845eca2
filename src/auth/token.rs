use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::fmt;
use tracing::{debug, instrument};

use super::types::AccountClaims;
use crate::account::models::AccountModel;
use crate::shared::AppError;

pub const DEFAULT_EXPIRATION_HOURS: i64 = 24;

/// Signing settings for account tokens
#[derive(Clone)]
pub struct TokenConfig {
    secret: String,
    pub expiration_hours: i64,
}

impl TokenConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            expiration_hours: DEFAULT_EXPIRATION_HOURS,
        }
    }

    pub fn with_expiration_hours(mut self, expiration_hours: i64) -> Self {
        self.expiration_hours = expiration_hours;
        self
    }
}

impl fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"<redacted>")
            .field("expiration_hours", &self.expiration_hours)
            .finish()
    }
}

/// Issues and validates HS256 tokens bound to an account id
#[derive(Clone)]
pub struct TokenService {
    config: TokenConfig,
}

impl TokenService {
    pub fn new(config: TokenConfig) -> Self {
        Self { config }
    }

    fn secret(&self) -> Result<&[u8], AppError> {
        if self.config.secret.is_empty() {
            return Err(AppError::JwtError("signing secret is not configured".to_string()));
        }
        Ok(self.config.secret.as_bytes())
    }

    /// Creates a token for `account` expiring `expiration_hours` from now
    #[instrument(skip(self, account), fields(account_id = account.id))]
    pub fn issue_token(&self, account: &AccountModel) -> Result<String, AppError> {
        let secret = self.secret()?;
        let now = Utc::now();
        let exp = (now + Duration::hours(self.config.expiration_hours)).timestamp() as usize;

        debug!(
            expiration_hours = self.config.expiration_hours,
            exp_timestamp = exp,
            "Creating JWT token with expiration"
        );

        let claims = AccountClaims {
            id: account.id,
            exp,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret),
        )
        .map_err(|e| {
            debug!(error = %e, "Failed to encode JWT token");
            AppError::JwtError(e.to_string())
        })
    }

    /// Checks signature and expiry, returning the claims if valid
    #[instrument(skip(self, token))]
    pub fn validate_token(&self, token: &str) -> Result<AccountClaims, AppError> {
        let secret = self.secret()?;

        // Expired means expired, no grace period
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<AccountClaims>(token, &DecodingKey::from_secret(secret), &validation)
            .map(|data| {
                debug!(
                    account_id = data.claims.id,
                    exp = data.claims.exp,
                    "JWT token decoded successfully"
                );
                data.claims
            })
            .map_err(|e| {
                debug!(error = %e, "Failed to decode JWT token");
                AppError::JwtError(e.to_string())
            })
    }
}
