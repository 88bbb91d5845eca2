use axum::Router;
use std::sync::Arc;

use bankapi::{
    account::generators::RandomBankNumberGenerator,
    account::models::AccountModel,
    auth::{TokenConfig, TokenService},
    create_router, AccountRepository, AppState, InMemoryAccountRepository,
};

pub const TEST_SECRET: &str = "integration-test-secret";

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub app: Router,
    pub repository: Arc<InMemoryAccountRepository>,
    pub token_service: TokenService,
}

pub struct TestSetupBuilder {
    secret: String,
    bank_number_attempts: u32,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            secret: TEST_SECRET.to_string(),
            bank_number_attempts: 5,
        }
    }

    #[allow(dead_code)]
    pub fn with_secret(mut self, secret: &str) -> Self {
        self.secret = secret.to_string();
        self
    }

    pub fn build(self) -> TestSetup {
        let repository = Arc::new(InMemoryAccountRepository::new());
        let token_service = TokenService::new(TokenConfig::new(self.secret));

        let app_state = AppState::new(
            repository.clone(),
            token_service.clone(),
            Arc::new(RandomBankNumberGenerator::new()),
            self.bank_number_attempts,
        );

        TestSetup {
            app: create_router(app_state),
            repository,
            token_service,
        }
    }
}

impl TestSetup {
    /// Looks an account up directly in the store
    pub async fn stored_account(&self, email: &str) -> AccountModel {
        self.repository
            .get_account_by_email(email)
            .await
            .expect("account should be stored")
    }

    /// Issues a token for `account` signed with an arbitrary secret and lifetime
    pub fn forge_token(&self, account: &AccountModel, secret: &str, expiration_hours: i64) -> String {
        TokenService::new(TokenConfig::new(secret).with_expiration_hours(expiration_hours))
            .issue_token(account)
            .expect("token should be issued")
    }
}
