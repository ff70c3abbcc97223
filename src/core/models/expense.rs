use super::{ExpenseId, GroupId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Expense {
    pub id: ExpenseId,
    pub group_id: GroupId,
    pub description: String,
    pub amount: f64,
    pub currency: String,
    /// History row written alongside a settlement; never folded into debts.
    pub is_settlement: bool,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Payer {
    pub user_id: UserId,
    pub amount: f64,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Split {
    pub user_id: UserId,
    pub amount: f64,
}

/// An expense together with its payer and split rows.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ExpenseRecord {
    pub expense: Expense,
    pub payers: Vec<Payer>,
    pub splits: Vec<Split>,
}

impl ExpenseRecord {
    pub fn total_paid(&self) -> f64 {
        self.payers.iter().map(|p| p.amount).sum()
    }
}
