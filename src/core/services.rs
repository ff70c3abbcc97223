use crate::constants::{
    EXPENSE_ADDED, EXPENSE_DELETED, FRIEND_EXPENSE_ADDED, GROUP_CREATED, MEMBER_ADDED, SETTLEMENT_RECORDED,
    SIMPLIFY_DEBTS_TOGGLED,
};
use crate::core::errors::LedgerError;
use crate::core::ledger::{self, ZERO_TOLERANCE, round2};
use crate::core::models::{
    AppLog, Balances, Debt, Expense, ExpenseId, ExpenseRecord, FriendExpense, Group, GroupId, Payer, Settlement,
    Split, UserDebts, UserId,
};
use crate::core::splits::SplitMethod;
use crate::infrastructure::logging::LoggingService;
use crate::infrastructure::storage::Storage;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};
use utoipa::ToSchema;

const MAX_AMOUNT: f64 = 1_000_000.0;

#[derive(Serialize, Deserialize, Debug, ToSchema, Clone, PartialEq)]
pub struct GroupSummary {
    pub group: Group,
    #[schema(value_type = Object)]
    pub balances: Balances,
    pub debts: Vec<Debt>,
}

pub struct LedgerService<L: LoggingService, S: Storage> {
    storage: S,
    logging: L,
}

impl<L: LoggingService, S: Storage> LedgerService<L, S> {
    pub fn new(storage: S, logging: L) -> Self {
        info!("Initializing LedgerService");
        LedgerService { storage, logging }
    }

    async fn require_group(&self, group_id: GroupId) -> Result<Group, LedgerError> {
        self.storage
            .get_group(group_id)
            .await?
            .ok_or(LedgerError::GroupNotFound(group_id))
    }

    fn require_member(group: &Group, user_id: UserId) -> Result<(), LedgerError> {
        if !group.is_member(user_id) {
            warn!("User {} is not a member of group {}", user_id, group.id);
            return Err(LedgerError::NotGroupMember(user_id));
        }
        Ok(())
    }

    async fn log_and_audit(
        &self,
        action: &str,
        details: serde_json::Value,
        user_id: Option<UserId>,
    ) -> Result<(), LedgerError> {
        debug!("Recording action {}: {}", action, details);
        self.logging.log_action(action, details, user_id).await
    }

    fn validate_string_input(&self, field: &str, value: &str, max_length: usize) -> Result<(), LedgerError> {
        if value.trim().is_empty() {
            return Err(LedgerError::invalid_input(
                field,
                format!("Invalid {}", field),
                format!("{} cannot be empty", field),
            ));
        }
        if value.chars().count() > max_length {
            return Err(LedgerError::invalid_input(
                field,
                format!("{} Too Long", field),
                format!("{} cannot exceed {} characters", field, max_length),
            ));
        }
        if value.chars().any(|c| c.is_control()) {
            return Err(LedgerError::invalid_input(
                field,
                format!("Invalid {}", field),
                format!("{} contains invalid characters", field),
            ));
        }
        Ok(())
    }

    fn validate_amount_input(&self, field: &str, amount: f64) -> Result<(), LedgerError> {
        if !amount.is_finite() {
            return Err(LedgerError::invalid_input(
                field,
                "Invalid Amount",
                "Amount must be a finite number",
            ));
        }
        if amount <= 0.0 {
            return Err(LedgerError::invalid_input(
                field,
                "Invalid Amount",
                "Amount must be greater than 0",
            ));
        }
        if amount > MAX_AMOUNT {
            return Err(LedgerError::invalid_input(
                field,
                "Amount Too Large",
                "Amount cannot exceed 1,000,000",
            ));
        }
        if (round2(amount) - amount).abs() > 1e-9 {
            return Err(LedgerError::invalid_input(
                field,
                "Invalid Amount",
                "Amount cannot have more than 2 decimal places",
            ));
        }
        Ok(())
    }

    fn validate_currency(&self, currency: &str) -> Result<(), LedgerError> {
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(LedgerError::invalid_input(
                "currency",
                "Invalid Currency",
                "Currency must be a three letter ISO code",
            ));
        }
        Ok(())
    }

    fn validate_payers(&self, amount: f64, payers: &[Payer]) -> Result<(), LedgerError> {
        if payers.is_empty() {
            return Err(LedgerError::invalid_input(
                "payers",
                "Missing Payers",
                "An expense needs at least one payer",
            ));
        }
        let mut seen = BTreeSet::new();
        for payer in payers {
            if !payer.amount.is_finite() || payer.amount < 0.0 {
                return Err(LedgerError::invalid_input(
                    "payers",
                    "Invalid Payer Amount",
                    "Payer amounts must be finite and not negative",
                ));
            }
            if !seen.insert(payer.user_id) {
                return Err(LedgerError::invalid_input(
                    "payers",
                    "Duplicate Payer",
                    format!("User {} is listed as payer more than once", payer.user_id),
                ));
            }
        }
        let total_paid: f64 = payers.iter().map(|p| p.amount).sum();
        if total_paid.abs() < f64::EPSILON {
            return Err(LedgerError::invalid_input(
                "payers",
                "Zero Total Paid",
                "Payers must cover a non-zero amount",
            ));
        }
        if (total_paid - amount).abs() > ZERO_TOLERANCE {
            return Err(LedgerError::invalid_input(
                "payers",
                "Payer Mismatch",
                format!("Payers cover {} of {}", round2(total_paid), amount),
            ));
        }
        Ok(())
    }

    // GROUPS

    pub async fn create_group(
        &self,
        name: String,
        currency: String,
        member_ids: Vec<UserId>,
        simplify_debts: bool,
        created_by: UserId,
    ) -> Result<Group, LedgerError> {
        info!("Creating group '{}' for user {}", name, created_by);
        self.validate_string_input("name", &name, 100)?;
        self.validate_currency(&currency)?;

        let mut members = vec![created_by];
        for id in member_ids {
            if !members.contains(&id) {
                members.push(id);
            }
        }

        let group = self
            .storage
            .create_group(Group {
                id: 0,
                name,
                currency,
                simplify_debts,
                member_ids: members,
            })
            .await?;

        self.log_and_audit(
            GROUP_CREATED,
            json!({
                "group_id": group.id,
                "name": group.name,
                "currency": group.currency,
                "member_ids": group.member_ids,
                "simplify_debts": group.simplify_debts
            }),
            Some(created_by),
        )
        .await?;

        Ok(group)
    }

    pub async fn get_group(&self, group_id: GroupId) -> Result<Option<Group>, LedgerError> {
        self.storage.get_group(group_id).await
    }

    pub async fn add_member(&self, group_id: GroupId, user_id: UserId, added_by: UserId) -> Result<Group, LedgerError> {
        let mut group = self.require_group(group_id).await?;
        Self::require_member(&group, added_by)?;
        if group.is_member(user_id) {
            return Err(LedgerError::AlreadyGroupMember(user_id));
        }

        group.member_ids.push(user_id);
        self.storage.save_group(group.clone()).await?;

        self.log_and_audit(
            MEMBER_ADDED,
            json!({ "group_id": group_id, "user_id": user_id }),
            Some(added_by),
        )
        .await?;
        Ok(group)
    }

    pub async fn set_simplify_debts(
        &self,
        group_id: GroupId,
        enabled: bool,
        changed_by: UserId,
    ) -> Result<Group, LedgerError> {
        let mut group = self.require_group(group_id).await?;
        Self::require_member(&group, changed_by)?;

        group.simplify_debts = enabled;
        self.storage.save_group(group.clone()).await?;

        self.log_and_audit(
            SIMPLIFY_DEBTS_TOGGLED,
            json!({ "group_id": group_id, "enabled": enabled }),
            Some(changed_by),
        )
        .await?;
        Ok(group)
    }

    // EXPENSES & SETTLEMENTS

    pub async fn add_expense(
        &self,
        group_id: GroupId,
        description: String,
        amount: f64,
        payers: Vec<Payer>,
        split: SplitMethod,
        created_by: UserId,
    ) -> Result<ExpenseRecord, LedgerError> {
        info!(
            "Adding expense to group {} by user {} for amount {}",
            group_id, created_by, amount
        );
        let group = self.require_group(group_id).await?;
        Self::require_member(&group, created_by)?;
        self.validate_string_input("description", &description, 255)?;
        self.validate_amount_input("amount", amount)?;
        self.validate_payers(amount, &payers)?;

        for payer in &payers {
            Self::require_member(&group, payer.user_id)?;
        }
        for user_id in split.participants() {
            Self::require_member(&group, user_id)?;
        }
        let splits = split.into_splits(amount)?;

        let expense = self
            .storage
            .insert_expense(
                Expense {
                    id: 0,
                    group_id,
                    description,
                    amount,
                    currency: group.currency.clone(),
                    is_settlement: false,
                    created_at: Utc::now(),
                },
                payers.clone(),
                splits.clone(),
            )
            .await?;
        debug!("Expense created with ID: {}", expense.id);

        self.log_and_audit(
            EXPENSE_ADDED,
            json!({
                "expense_id": expense.id,
                "group_id": group_id,
                "description": expense.description,
                "amount": amount,
                "payer_ids": payers.iter().map(|p| p.user_id).collect::<Vec<_>>()
            }),
            Some(created_by),
        )
        .await?;

        Ok(ExpenseRecord {
            expense,
            payers,
            splits,
        })
    }

    pub async fn delete_expense(&self, expense_id: ExpenseId, deleted_by: UserId) -> Result<(), LedgerError> {
        let expense = self
            .storage
            .get_expense(expense_id)
            .await?
            .ok_or(LedgerError::ExpenseNotFound(expense_id))?;
        let group = self.require_group(expense.group_id).await?;
        Self::require_member(&group, deleted_by)?;

        self.storage.delete_expense(expense_id).await?;

        self.log_and_audit(
            EXPENSE_DELETED,
            json!({
                "expense_id": expense_id,
                "group_id": expense.group_id,
                "is_settlement": expense.is_settlement
            }),
            Some(deleted_by),
        )
        .await?;
        Ok(())
    }

    /// Records `from` paying `to`. The payment is kept twice: as an
    /// `is_settlement` expense for the group history and as a settlement row
    /// that the ledger folds.
    pub async fn record_settlement(
        &self,
        group_id: GroupId,
        from_user_id: UserId,
        to_user_id: UserId,
        amount: f64,
        recorded_by: UserId,
    ) -> Result<Settlement, LedgerError> {
        info!(
            "Recording settlement in group {} from {} to {} for {}",
            group_id, from_user_id, to_user_id, amount
        );
        if from_user_id == to_user_id {
            return Err(LedgerError::SelfSettlement);
        }
        let group = self.require_group(group_id).await?;
        Self::require_member(&group, recorded_by)?;
        Self::require_member(&group, from_user_id)?;
        Self::require_member(&group, to_user_id)?;
        self.validate_amount_input("amount", amount)?;

        let history = self
            .storage
            .insert_expense(
                Expense {
                    id: 0,
                    group_id,
                    description: "Settlement".to_string(),
                    amount,
                    currency: group.currency.clone(),
                    is_settlement: true,
                    created_at: Utc::now(),
                },
                vec![Payer {
                    user_id: from_user_id,
                    amount,
                }],
                vec![Split {
                    user_id: to_user_id,
                    amount,
                }],
            )
            .await?;

        let inserted = self
            .storage
            .insert_settlement(Settlement {
                id: 0,
                group_id,
                from_user_id,
                to_user_id,
                amount,
                currency: group.currency,
                expense_id: Some(history.id),
                created_at: history.created_at,
            })
            .await;
        let settlement = match inserted {
            Ok(settlement) => settlement,
            Err(err) => {
                warn!(
                    "Settlement insert failed for group {}, removing history expense {}",
                    group_id, history.id
                );
                if let Err(cleanup) = self.storage.delete_expense(history.id).await {
                    warn!("Failed to remove history expense {}: {}", history.id, cleanup);
                }
                return Err(err);
            }
        };

        self.log_and_audit(
            SETTLEMENT_RECORDED,
            json!({
                "settlement_id": settlement.id,
                "group_id": group_id,
                "from_user_id": from_user_id,
                "to_user_id": to_user_id,
                "amount": amount
            }),
            Some(recorded_by),
        )
        .await?;

        Ok(settlement)
    }

    pub async fn add_friend_expense(
        &self,
        user_id: UserId,
        friend_id: UserId,
        amount: f64,
        paid_by: UserId,
        description: String,
    ) -> Result<FriendExpense, LedgerError> {
        if user_id == friend_id {
            return Err(LedgerError::SelfFriendExpense);
        }
        if paid_by != user_id && paid_by != friend_id {
            return Err(LedgerError::InvalidPayer(paid_by));
        }
        self.validate_amount_input("amount", amount)?;
        self.validate_string_input("description", &description, 255)?;

        let expense = self
            .storage
            .insert_friend_expense(FriendExpense {
                id: 0,
                user_id,
                friend_id,
                amount,
                paid_by,
                description,
                created_at: Utc::now(),
            })
            .await?;

        self.log_and_audit(
            FRIEND_EXPENSE_ADDED,
            json!({
                "friend_expense_id": expense.id,
                "user_id": user_id,
                "friend_id": friend_id,
                "amount": amount,
                "paid_by": paid_by
            }),
            Some(user_id),
        )
        .await?;
        Ok(expense)
    }

    /// Every expense of the group, settlement history included.
    pub async fn list_expenses(&self, group_id: GroupId) -> Result<Vec<Expense>, LedgerError> {
        self.require_group(group_id).await?;
        self.storage.list_expenses(group_id).await
    }

    // LEDGER

    async fn load_history(&self, group_id: GroupId) -> Result<(Vec<ExpenseRecord>, Vec<Settlement>), LedgerError> {
        let expenses = self.storage.list_non_settlement_expenses(group_id).await?;
        let records = futures::future::try_join_all(expenses.into_iter().map(|expense| async move {
            let payers = self.storage.list_payers(expense.id).await?;
            let splits = self.storage.list_splits(expense.id).await?;
            Ok::<_, LedgerError>(ExpenseRecord {
                expense,
                payers,
                splits,
            })
        }))
        .await?;
        let settlements = self.storage.list_settlements(group_id).await?;
        debug!(
            "Loaded {} expenses and {} settlements for group {}",
            records.len(),
            settlements.len(),
            group_id
        );
        Ok((records, settlements))
    }

    pub async fn compute_balances(&self, group_id: GroupId) -> Result<Balances, LedgerError> {
        let (expenses, settlements) = self.load_history(group_id).await?;
        Ok(ledger::accumulate_balances(&expenses, &settlements))
    }

    /// Net balances for an existing group.
    pub async fn group_balances(&self, group_id: GroupId) -> Result<Balances, LedgerError> {
        self.require_group(group_id).await?;
        self.compute_balances(group_id).await
    }

    pub async fn compute_direct_debts(&self, group_id: GroupId) -> Result<Vec<Debt>, LedgerError> {
        let (expenses, settlements) = self.load_history(group_id).await?;
        ledger::reduce_direct_debts(&expenses, &settlements)
    }

    pub fn simplify(&self, balances: &Balances) -> Vec<Debt> {
        ledger::simplify_debts(balances)
    }

    /// Debts as presented for the group: greedy settlement suggestions when
    /// the group simplifies debts, literal pairwise debts otherwise.
    pub async fn pairwise_debts(&self, group_id: GroupId) -> Result<Vec<Debt>, LedgerError> {
        let group = self.require_group(group_id).await?;
        self.debts_for(&group).await
    }

    async fn debts_for(&self, group: &Group) -> Result<Vec<Debt>, LedgerError> {
        if group.simplify_debts {
            let balances = self.compute_balances(group.id).await?;
            Ok(self.simplify(&balances))
        } else {
            self.compute_direct_debts(group.id).await
        }
    }

    pub async fn user_group_debts(&self, group_id: GroupId, user_id: UserId) -> Result<UserDebts, LedgerError> {
        let debts = self.pairwise_debts(group_id).await?;
        Ok(ledger::partition_user_debts(&debts, user_id))
    }

    pub async fn user_total_balance(&self, user_id: UserId) -> Result<UserDebts, LedgerError> {
        let groups = self.storage.list_user_groups(user_id).await?;
        let mut group_debts = Vec::with_capacity(groups.len());
        for group in &groups {
            group_debts.push(self.debts_for(group).await?);
        }
        let friend_expenses = self.storage.list_friend_expenses(user_id).await?;

        let total = ledger::total_balance(user_id, group_debts.iter().map(Vec::as_slice), &friend_expenses);
        debug!(
            "Total balance for user {} across {} groups: {:?}",
            user_id,
            groups.len(),
            total
        );
        Ok(total)
    }

    pub async fn group_summary(&self, group_id: GroupId) -> Result<GroupSummary, LedgerError> {
        let group = self.require_group(group_id).await?;
        let balances = self.compute_balances(group_id).await?;
        let debts = if group.simplify_debts {
            self.simplify(&balances)
        } else {
            self.compute_direct_debts(group_id).await?
        };
        Ok(GroupSummary { group, balances, debts })
    }

    pub async fn get_app_logs(&self) -> Result<Vec<AppLog>, LedgerError> {
        self.logging.get_logs().await
    }
}
