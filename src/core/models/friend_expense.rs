use super::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A non-group expense shared 50/50 between two users.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct FriendExpense {
    pub id: i64,
    pub user_id: UserId,
    pub friend_id: UserId,
    pub amount: f64,
    pub paid_by: UserId,
    pub description: String,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub created_at: DateTime<Utc>,
}

impl FriendExpense {
    pub fn involves(&self, user_id: UserId) -> bool {
        self.user_id == user_id || self.friend_id == user_id
    }

    /// The participant that is not `user_id`.
    pub fn counterparty(&self, user_id: UserId) -> UserId {
        if self.user_id == user_id {
            self.friend_id
        } else {
            self.user_id
        }
    }
}
