use super::{ExpenseId, GroupId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Settlement {
    pub id: i64,
    pub group_id: GroupId,
    pub from_user_id: UserId,
    pub to_user_id: UserId,
    pub amount: f64,
    pub currency: String,
    /// The `is_settlement` expense recorded with this settlement, if any.
    pub expense_id: Option<ExpenseId>,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub created_at: DateTime<Utc>,
}
