use super::{GroupId, UserId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub currency: String,
    /// Selects greedy settlement suggestions over literal per-expense debts.
    pub simplify_debts: bool,
    pub member_ids: Vec<UserId>,
}

impl Group {
    pub fn is_member(&self, user_id: UserId) -> bool {
        self.member_ids.contains(&user_id)
    }
}
