use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::models::AccountModel;

/// Public view of an account; never carries the password hash
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub bank_number: i64,
    pub balance: i64,
    pub created_at: DateTime<Utc>,
}

impl From<AccountModel> for AccountResponse {
    fn from(model: AccountModel) -> Self {
        Self {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            bank_number: model.bank_number,
            balance: model.balance,
            created_at: model.created_at,
        }
    }
}

/// Request payload for a transfer. Echoed back, no balances move.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransferRequest {
    pub to_account: i64,
    pub amount: i64,
}

/// Plain acknowledgement body
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
