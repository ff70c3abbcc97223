use super::UserId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Net amount per user: positive is owed money, negative owes money.
pub type Balances = BTreeMap<UserId, f64>;

/// `from` owes `to` a positive `amount`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Debt {
    pub from: UserId,
    pub to: UserId,
    pub amount: f64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct UserDebts {
    pub owes: Vec<Debt>,
    pub owed: Vec<Debt>,
}
