use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::{
    repository::AccountRepository,
    types::{AccountResponse, TransferRequest},
};
use crate::shared::AppError;

/// Service for account reads, deletion and the transfer stub
pub struct AccountService {
    repository: Arc<dyn AccountRepository + Send + Sync>,
}

impl AccountService {
    pub fn new(repository: Arc<dyn AccountRepository + Send + Sync>) -> Self {
        Self { repository }
    }

    /// Lists every account
    #[instrument(skip(self))]
    pub async fn list_accounts(&self) -> Result<Vec<AccountResponse>, AppError> {
        let accounts = self.repository.get_accounts().await?;

        info!(account_count = accounts.len(), "Accounts retrieved successfully");
        Ok(accounts.into_iter().map(AccountResponse::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn get_account(&self, id: i64) -> Result<AccountResponse, AppError> {
        let account = self.repository.get_account_by_id(id).await?;
        debug!(account_id = account.id, "Account retrieved");
        Ok(account.into())
    }

    #[instrument(skip(self))]
    pub async fn delete_account(&self, id: i64) -> Result<(), AppError> {
        self.repository.delete_account(id).await?;
        info!(account_id = id, "Account deleted");
        Ok(())
    }

    /// Accepts a transfer request and hands it back unchanged
    #[instrument(skip(self))]
    pub async fn transfer(&self, request: TransferRequest) -> Result<TransferRequest, AppError> {
        debug!(
            to_account = request.to_account,
            amount = request.amount,
            "Transfer requested"
        );
        Ok(request)
    }
}
