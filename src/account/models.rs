use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter};

/// Database model for the account table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct AccountModel {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String, // Argon2 PHC hash, never plaintext
    pub bank_number: i64,
    pub balance: i64, // Minor units
    pub created_at: DateTime<Utc>,
}

/// An account that has not been stored yet; the store assigns the id
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub bank_number: i64,
    pub balance: i64,
    pub created_at: DateTime<Utc>,
}

impl NewAccount {
    /// Creates a new account with zero balance, stamped with the current UTC time.
    /// `password_hash` must already be hashed.
    pub fn new(
        first_name: String,
        last_name: String,
        email: String,
        password_hash: String,
        bank_number: i64,
    ) -> Self {
        Self {
            first_name,
            last_name,
            email,
            password: password_hash,
            bank_number,
            balance: 0,
            created_at: Utc::now(),
        }
    }

    /// Attaches a store-assigned id
    pub fn into_model(self, id: i64) -> AccountModel {
        AccountModel {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            password: self.password,
            bank_number: self.bank_number,
            balance: self.balance,
            created_at: self.created_at,
        }
    }
}

/// Columns carrying a uniqueness constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum UniqueField {
    Email,
    BankNumber,
}

impl UniqueField {
    /// Resolves a Postgres constraint name such as `account_email_key`
    pub fn from_constraint(constraint: &str) -> Option<Self> {
        UniqueField::iter().find(|field| constraint.contains(field.as_ref()))
    }
}
