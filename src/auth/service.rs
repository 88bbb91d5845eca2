use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    password::{hash_password, verify_dummy_password, verify_password},
    token::TokenService,
    types::{SignInRequest, SignUpRequest},
};
use crate::account::{
    generators::BankNumberGenerator,
    models::{AccountModel, NewAccount, UniqueField},
    repository::AccountRepository,
};
use crate::shared::AppError;

pub const DEFAULT_BANK_NUMBER_ATTEMPTS: u32 = 5;

/// Service for sign-up and sign-in
pub struct AuthService {
    repository: Arc<dyn AccountRepository + Send + Sync>,
    token_service: TokenService,
    bank_number_generator: Arc<dyn BankNumberGenerator>,
    bank_number_attempts: u32,
}

impl AuthService {
    pub fn new(
        repository: Arc<dyn AccountRepository + Send + Sync>,
        token_service: TokenService,
        bank_number_generator: Arc<dyn BankNumberGenerator>,
        bank_number_attempts: u32,
    ) -> Self {
        Self {
            repository,
            token_service,
            bank_number_generator,
            bank_number_attempts: bank_number_attempts.max(1),
        }
    }

    /// Registers a new account with a hashed password and a fresh bank number.
    /// Names and email are stored exactly as submitted.
    #[instrument(skip(self, request))]
    pub async fn sign_up(&self, request: SignUpRequest) -> Result<AccountModel, AppError> {
        validate_sign_up(&request)?;

        let password_hash = hash_password(&request.password)?;

        for attempt in 1..=self.bank_number_attempts {
            let account = NewAccount::new(
                request.first_name.clone(),
                request.last_name.clone(),
                request.email.clone(),
                password_hash.clone(),
                self.bank_number_generator.generate(),
            );

            match self.repository.create_account(&account).await {
                Ok(created) => {
                    info!(account_id = created.id, attempt, "Account signed up");
                    return Ok(created);
                }
                Err(AppError::Conflict(UniqueField::BankNumber)) => {
                    warn!(attempt, "Bank number collision, regenerating");
                }
                Err(error) => return Err(error),
            }
        }

        warn!(
            attempts = self.bank_number_attempts,
            "Could not find a free bank number"
        );
        Err(AppError::Conflict(UniqueField::BankNumber))
    }

    /// Resolves the account by email, checks the password and issues a token.
    /// Unknown email and wrong password give the same error.
    #[instrument(skip(self, request))]
    pub async fn sign_in(&self, request: SignInRequest) -> Result<String, AppError> {
        let account = match self.repository.get_account_by_email(&request.email).await {
            Ok(account) => account,
            Err(AppError::NotFound(_)) => {
                // Pay the same hashing cost as a real account
                verify_dummy_password(&request.password);
                warn!("Sign in attempted for unknown email");
                return Err(AppError::InvalidCredentials);
            }
            Err(error) => return Err(error),
        };

        if !verify_password(&request.password, &account.password) {
            warn!(account_id = account.id, "Sign in failed password verification");
            return Err(AppError::InvalidCredentials);
        }

        let token = self.token_service.issue_token(&account)?;
        info!(account_id = account.id, "Account signed in");
        Ok(token)
    }
}

fn validate_sign_up(request: &SignUpRequest) -> Result<(), AppError> {
    let required = [
        &request.first_name,
        &request.last_name,
        &request.email,
        &request.password,
    ];
    if required.iter().any(|field| field.trim().is_empty()) {
        return Err(AppError::Validation(
            "first name, last name, email, password and confirm password is required".to_string(),
        ));
    }

    if request.password != request.confirm_password {
        return Err(AppError::Validation(
            "password and confirm password should match".to_string(),
        ));
    }

    Ok(())
}
