use crate::core::errors::LedgerError;
use crate::core::models::{
    Expense, ExpenseId, FriendExpense, Group, GroupId, Payer, Settlement, Split, UserId,
};
use crate::infrastructure::storage::Storage;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

#[derive(Clone, Default)]
pub struct InMemoryStorage {
    next_id: Arc<AtomicI64>,
    groups: Arc<RwLock<BTreeMap<GroupId, Group>>>,
    expenses: Arc<RwLock<BTreeMap<ExpenseId, Expense>>>,
    payers: Arc<RwLock<HashMap<ExpenseId, Vec<Payer>>>>,
    splits: Arc<RwLock<HashMap<ExpenseId, Vec<Split>>>>,
    settlements: Arc<RwLock<BTreeMap<i64, Settlement>>>,
    friend_expenses: Arc<RwLock<BTreeMap<i64, FriendExpense>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        InMemoryStorage::default()
    }

    fn allocate_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn create_group(&self, group: Group) -> Result<Group, LedgerError> {
        let group = Group {
            id: self.allocate_id(),
            ..group
        };
        let mut groups = self.groups.write().await;
        groups.insert(group.id, group.clone());
        Ok(group)
    }

    async fn save_group(&self, group: Group) -> Result<(), LedgerError> {
        let mut groups = self.groups.write().await;
        if !groups.contains_key(&group.id) {
            return Err(LedgerError::GroupNotFound(group.id));
        }
        groups.insert(group.id, group);
        Ok(())
    }

    async fn get_group(&self, group_id: GroupId) -> Result<Option<Group>, LedgerError> {
        let groups = self.groups.read().await;
        Ok(groups.get(&group_id).cloned())
    }

    async fn list_user_groups(&self, user_id: UserId) -> Result<Vec<Group>, LedgerError> {
        let groups = self.groups.read().await;
        Ok(groups.values().filter(|g| g.is_member(user_id)).cloned().collect())
    }

    async fn insert_expense(
        &self,
        expense: Expense,
        payers: Vec<Payer>,
        splits: Vec<Split>,
    ) -> Result<Expense, LedgerError> {
        let expense = Expense {
            id: self.allocate_id(),
            ..expense
        };
        self.payers.write().await.insert(expense.id, payers);
        self.splits.write().await.insert(expense.id, splits);
        self.expenses.write().await.insert(expense.id, expense.clone());
        Ok(expense)
    }

    async fn get_expense(&self, expense_id: ExpenseId) -> Result<Option<Expense>, LedgerError> {
        let expenses = self.expenses.read().await;
        Ok(expenses.get(&expense_id).cloned())
    }

    async fn delete_expense(&self, expense_id: ExpenseId) -> Result<(), LedgerError> {
        if self.expenses.write().await.remove(&expense_id).is_none() {
            return Err(LedgerError::ExpenseNotFound(expense_id));
        }
        self.payers.write().await.remove(&expense_id);
        self.splits.write().await.remove(&expense_id);
        self.settlements
            .write()
            .await
            .retain(|_, s| s.expense_id != Some(expense_id));
        Ok(())
    }

    async fn list_expenses(&self, group_id: GroupId) -> Result<Vec<Expense>, LedgerError> {
        let expenses = self.expenses.read().await;
        Ok(expenses
            .values()
            .filter(|e| e.group_id == group_id)
            .cloned()
            .collect())
    }

    async fn list_non_settlement_expenses(&self, group_id: GroupId) -> Result<Vec<Expense>, LedgerError> {
        let expenses = self.expenses.read().await;
        Ok(expenses
            .values()
            .filter(|e| e.group_id == group_id && !e.is_settlement)
            .cloned()
            .collect())
    }

    async fn list_payers(&self, expense_id: ExpenseId) -> Result<Vec<Payer>, LedgerError> {
        let payers = self.payers.read().await;
        Ok(payers.get(&expense_id).cloned().unwrap_or_default())
    }

    async fn list_splits(&self, expense_id: ExpenseId) -> Result<Vec<Split>, LedgerError> {
        let splits = self.splits.read().await;
        Ok(splits.get(&expense_id).cloned().unwrap_or_default())
    }

    async fn insert_settlement(&self, settlement: Settlement) -> Result<Settlement, LedgerError> {
        let settlement = Settlement {
            id: self.allocate_id(),
            ..settlement
        };
        let mut settlements = self.settlements.write().await;
        settlements.insert(settlement.id, settlement.clone());
        Ok(settlement)
    }

    async fn list_settlements(&self, group_id: GroupId) -> Result<Vec<Settlement>, LedgerError> {
        let settlements = self.settlements.read().await;
        Ok(settlements
            .values()
            .filter(|s| s.group_id == group_id)
            .cloned()
            .collect())
    }

    async fn insert_friend_expense(&self, expense: FriendExpense) -> Result<FriendExpense, LedgerError> {
        let expense = FriendExpense {
            id: self.allocate_id(),
            ..expense
        };
        let mut friend_expenses = self.friend_expenses.write().await;
        friend_expenses.insert(expense.id, expense.clone());
        Ok(expense)
    }

    async fn list_friend_expenses(&self, user_id: UserId) -> Result<Vec<FriendExpense>, LedgerError> {
        let friend_expenses = self.friend_expenses.read().await;
        Ok(friend_expenses
            .values()
            .filter(|e| e.involves(user_id))
            .cloned()
            .collect())
    }
}
