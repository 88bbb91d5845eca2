use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::collections::BTreeMap;
use std::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use super::models::{AccountModel, NewAccount, UniqueField};
use crate::shared::AppError;

/// Trait for account repository operations
///
/// The store only resolves identity. It never judges whether a password is
/// correct; callers compare the returned hash themselves.
#[async_trait]
pub trait AccountRepository {
    /// Inserts the account and returns the stored row with its assigned id
    async fn create_account(&self, account: &NewAccount) -> Result<AccountModel, AppError>;
    async fn get_account_by_email(&self, email: &str) -> Result<AccountModel, AppError>;
    async fn get_accounts(&self) -> Result<Vec<AccountModel>, AppError>;
    async fn get_account_by_id(&self, id: i64) -> Result<AccountModel, AppError>;
    /// Overwrites names, email, password and balance of the row with `account.id`
    async fn update_account(&self, account: &AccountModel) -> Result<(), AppError>;
    async fn delete_account(&self, id: i64) -> Result<(), AppError>;
}

fn account_not_found(id: i64) -> AppError {
    AppError::NotFound(format!("account with id {} not found", id))
}

fn email_not_found() -> AppError {
    AppError::NotFound("account does not exist".to_string())
}

struct InMemoryAccounts {
    next_id: i64,
    accounts: BTreeMap<i64, AccountModel>,
}

impl InMemoryAccounts {
    fn email_taken(&self, email: &str, exclude_id: Option<i64>) -> bool {
        self.accounts
            .values()
            .any(|existing| existing.email == email && Some(existing.id) != exclude_id)
    }

    fn bank_number_taken(&self, bank_number: i64) -> bool {
        self.accounts
            .values()
            .any(|existing| existing.bank_number == bank_number)
    }
}

/// In-memory implementation of AccountRepository for development and testing
///
/// Enforces the same uniqueness rules as the database table. Data is lost
/// when the application restarts.
pub struct InMemoryAccountRepository {
    state: Mutex<InMemoryAccounts>,
}

impl Default for InMemoryAccountRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryAccountRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            state: Mutex::new(InMemoryAccounts {
                next_id: 1,
                accounts: BTreeMap::new(),
            }),
        }
    }

    /// Returns the current number of stored accounts
    pub fn account_count(&self) -> usize {
        self.state.lock().unwrap().accounts.len()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    #[instrument(skip(self, account))]
    async fn create_account(&self, account: &NewAccount) -> Result<AccountModel, AppError> {
        debug!(bank_number = account.bank_number, "Creating account in memory");

        let mut state = self.state.lock().unwrap();
        let conflict = if state.email_taken(&account.email, None) {
            Some(UniqueField::Email)
        } else if state.bank_number_taken(account.bank_number) {
            Some(UniqueField::BankNumber)
        } else {
            None
        };
        if let Some(field) = conflict {
            warn!(field = %field, "Uniqueness violation creating account in memory");
            return Err(AppError::Conflict(field));
        }

        let id = state.next_id;
        state.next_id += 1;
        let model = account.clone().into_model(id);
        state.accounts.insert(id, model.clone());

        debug!(account_id = id, "Account created successfully in memory");
        Ok(model)
    }

    #[instrument(skip(self, email))]
    async fn get_account_by_email(&self, email: &str) -> Result<AccountModel, AppError> {
        let state = self.state.lock().unwrap();
        state
            .accounts
            .values()
            .find(|account| account.email == email)
            .cloned()
            .ok_or_else(email_not_found)
    }

    #[instrument(skip(self))]
    async fn get_accounts(&self) -> Result<Vec<AccountModel>, AppError> {
        let state = self.state.lock().unwrap();
        let accounts: Vec<AccountModel> = state.accounts.values().cloned().collect();

        debug!(account_count = accounts.len(), "Accounts listed from memory");
        Ok(accounts)
    }

    #[instrument(skip(self))]
    async fn get_account_by_id(&self, id: i64) -> Result<AccountModel, AppError> {
        let state = self.state.lock().unwrap();
        match state.accounts.get(&id) {
            Some(account) => Ok(account.clone()),
            None => {
                debug!(account_id = id, "Account not found in memory");
                Err(account_not_found(id))
            }
        }
    }

    #[instrument(skip(self, account))]
    async fn update_account(&self, account: &AccountModel) -> Result<(), AppError> {
        debug!(account_id = account.id, "Updating account in memory");

        let mut state = self.state.lock().unwrap();
        if !state.accounts.contains_key(&account.id) {
            warn!(account_id = account.id, "Account not found for update in memory");
            return Err(account_not_found(account.id));
        }
        // Bank numbers are immutable, so only the email can collide here
        if state.email_taken(&account.email, Some(account.id)) {
            warn!(account_id = account.id, "Email already taken by another account");
            return Err(AppError::Conflict(UniqueField::Email));
        }

        if let Some(stored) = state.accounts.get_mut(&account.id) {
            stored.first_name = account.first_name.clone();
            stored.last_name = account.last_name.clone();
            stored.email = account.email.clone();
            stored.password = account.password.clone();
            stored.balance = account.balance;
        }

        debug!(account_id = account.id, "Account updated successfully in memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_account(&self, id: i64) -> Result<(), AppError> {
        debug!(account_id = id, "Deleting account from memory");

        let mut state = self.state.lock().unwrap();
        if state.accounts.remove(&id).is_none() {
            warn!(account_id = id, "Account not found for deletion in memory");
            return Err(account_not_found(id));
        }

        debug!(account_id = id, "Account deleted successfully from memory");
        Ok(())
    }
}

/// Maps insert/update failures, surfacing unique constraint violations as conflicts
fn map_write_error(error: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_error) = &error {
        if db_error.is_unique_violation() {
            if let Some(field) = db_error.constraint().and_then(UniqueField::from_constraint) {
                return AppError::Conflict(field);
            }
        }
    }
    AppError::DatabaseError(error.to_string())
}

/// PostgreSQL implementation of account repository
pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool against `database_url`
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to connect to database");
                AppError::DatabaseError(e.to_string())
            })?;

        info!(max_connections, "Connected to database");
        Ok(Self::new(pool))
    }

    /// Creates the account table if it does not exist yet
    #[instrument(skip(self))]
    pub async fn create_account_table(&self) -> Result<(), AppError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS account (
                id BIGSERIAL PRIMARY KEY,
                first_name VARCHAR(48) NOT NULL,
                last_name VARCHAR(48) NOT NULL,
                email VARCHAR(64) NOT NULL UNIQUE,
                password VARCHAR(256) NOT NULL,
                bank_number BIGINT NOT NULL UNIQUE,
                balance BIGINT NOT NULL DEFAULT 0,
                created_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to create account table");
            AppError::DatabaseError(e.to_string())
        })?;

        info!("Account table ready");
        Ok(())
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    #[instrument(skip(self, account))]
    async fn create_account(&self, account: &NewAccount) -> Result<AccountModel, AppError> {
        debug!(bank_number = account.bank_number, "Creating account in database");

        let model = sqlx::query_as::<_, AccountModel>(
            "INSERT INTO account (first_name, last_name, email, password, bank_number, balance, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING id, first_name, last_name, email, password, bank_number, balance, created_at",
        )
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(&account.email)
        .bind(&account.password)
        .bind(account.bank_number)
        .bind(account.balance)
        .bind(account.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to create account in database");
            map_write_error(e)
        })?;

        debug!(account_id = model.id, "Account created successfully in database");
        Ok(model)
    }

    #[instrument(skip(self, email))]
    async fn get_account_by_email(&self, email: &str) -> Result<AccountModel, AppError> {
        sqlx::query_as::<_, AccountModel>(
            "SELECT id, first_name, last_name, email, password, bank_number, balance, created_at \
             FROM account WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to fetch account by email");
            AppError::DatabaseError(e.to_string())
        })?
        .ok_or_else(email_not_found)
    }

    #[instrument(skip(self))]
    async fn get_accounts(&self) -> Result<Vec<AccountModel>, AppError> {
        let accounts = sqlx::query_as::<_, AccountModel>(
            "SELECT id, first_name, last_name, email, password, bank_number, balance, created_at \
             FROM account ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to list accounts");
            AppError::DatabaseError(e.to_string())
        })?;

        debug!(account_count = accounts.len(), "Accounts listed from database");
        Ok(accounts)
    }

    #[instrument(skip(self))]
    async fn get_account_by_id(&self, id: i64) -> Result<AccountModel, AppError> {
        sqlx::query_as::<_, AccountModel>(
            "SELECT id, first_name, last_name, email, password, bank_number, balance, created_at \
             FROM account WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, account_id = id, "Failed to fetch account from database");
            AppError::DatabaseError(e.to_string())
        })?
        .ok_or_else(|| account_not_found(id))
    }

    #[instrument(skip(self, account))]
    async fn update_account(&self, account: &AccountModel) -> Result<(), AppError> {
        debug!(account_id = account.id, "Updating account in database");

        let result = sqlx::query(
            "UPDATE account SET first_name = $2, last_name = $3, email = $4, password = $5, balance = $6 \
             WHERE id = $1",
        )
        .bind(account.id)
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(&account.email)
        .bind(&account.password)
        .bind(account.balance)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, account_id = account.id, "Failed to update account in database");
            map_write_error(e)
        })?;

        if result.rows_affected() == 0 {
            warn!(account_id = account.id, "Account not found for update");
            return Err(account_not_found(account.id));
        }

        debug!(account_id = account.id, "Account updated successfully in database");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_account(&self, id: i64) -> Result<(), AppError> {
        debug!(account_id = id, "Deleting account from database");

        let result = sqlx::query("DELETE FROM account WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, account_id = id, "Failed to delete account from database");
                AppError::DatabaseError(e.to_string())
            })?;

        if result.rows_affected() == 0 {
            warn!(account_id = id, "Account not found for deletion");
            return Err(account_not_found(id));
        }

        debug!(account_id = id, "Account deleted successfully from database");
        Ok(())
    }
}
