use crate::core::errors::LedgerError;
use crate::core::models::{
    Expense, ExpenseId, FriendExpense, Group, GroupId, Payer, Settlement, Split, UserId,
};
use async_trait::async_trait;

/// Persistence collaborator for groups, expenses and settlements.
///
/// Inserts assign ids and return the stored row. Listings are ordered by id so
/// the ledger sees history in insertion order.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn create_group(&self, group: Group) -> Result<Group, LedgerError>;
    async fn save_group(&self, group: Group) -> Result<(), LedgerError>;
    async fn get_group(&self, group_id: GroupId) -> Result<Option<Group>, LedgerError>;
    async fn list_user_groups(&self, user_id: UserId) -> Result<Vec<Group>, LedgerError>;

    async fn insert_expense(
        &self,
        expense: Expense,
        payers: Vec<Payer>,
        splits: Vec<Split>,
    ) -> Result<Expense, LedgerError>;
    async fn get_expense(&self, expense_id: ExpenseId) -> Result<Option<Expense>, LedgerError>;
    /// Removes the expense, its rows, and any settlement recorded with it.
    async fn delete_expense(&self, expense_id: ExpenseId) -> Result<(), LedgerError>;
    /// Every expense of the group, settlement history included.
    async fn list_expenses(&self, group_id: GroupId) -> Result<Vec<Expense>, LedgerError>;
    async fn list_non_settlement_expenses(&self, group_id: GroupId) -> Result<Vec<Expense>, LedgerError>;
    async fn list_payers(&self, expense_id: ExpenseId) -> Result<Vec<Payer>, LedgerError>;
    async fn list_splits(&self, expense_id: ExpenseId) -> Result<Vec<Split>, LedgerError>;

    async fn insert_settlement(&self, settlement: Settlement) -> Result<Settlement, LedgerError>;
    async fn list_settlements(&self, group_id: GroupId) -> Result<Vec<Settlement>, LedgerError>;

    async fn insert_friend_expense(&self, expense: FriendExpense) -> Result<FriendExpense, LedgerError>;
    async fn list_friend_expenses(&self, user_id: UserId) -> Result<Vec<FriendExpense>, LedgerError>;
}

pub mod in_memory;
