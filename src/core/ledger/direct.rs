use crate::core::errors::LedgerError;
use crate::core::ledger::money::{exceeds_tolerance, is_effectively_zero, round2};
use crate::core::models::{Debt, ExpenseRecord, Settlement, UserId};
use std::collections::BTreeMap;
use tracing::debug;

/// Ordered pair identifying a directed debt: `from` owes `to`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DebtKey {
    pub from: UserId,
    pub to: UserId,
}

impl DebtKey {
    pub fn new(from: UserId, to: UserId) -> Self {
        DebtKey { from, to }
    }

    pub fn reversed(self) -> Self {
        DebtKey {
            from: self.to,
            to: self.from,
        }
    }
}

/// Outstanding directed debts. At most one of `a -> b` and `b -> a` is present.
pub type DebtMap = BTreeMap<DebtKey, f64>;

/// Folds a group's history into pairwise debts between users who actually
/// shared an expense.
///
/// Every expense is turned into split-user to payer obligations, weighted by
/// each payer's share of the total paid, and netted against the opposite
/// direction as it is recorded. Settlements are applied after all expenses.
/// Amounts are rounded to cents and anything at or below the zero tolerance
/// is dropped.
pub fn reduce_direct_debts(
    expenses: &[ExpenseRecord],
    settlements: &[Settlement],
) -> Result<Vec<Debt>, LedgerError> {
    let mut debts = DebtMap::new();

    for record in expenses.iter().filter(|r| !r.expense.is_settlement) {
        debts = fold_expense(debts, record)?;
    }

    let debts = settlements.iter().fold(debts, |debts, settlement| {
        apply_settlement(
            debts,
            DebtKey::new(settlement.from_user_id, settlement.to_user_id),
            settlement.amount,
        )
    });

    let reduced: Vec<Debt> = debts
        .into_iter()
        .map(|(key, amount)| Debt {
            from: key.from,
            to: key.to,
            amount: round2(amount),
        })
        .filter(|debt| exceeds_tolerance(debt.amount))
        .collect();

    debug!("Direct debts reduced: {:?}", reduced);
    Ok(reduced)
}

fn fold_expense(mut debts: DebtMap, record: &ExpenseRecord) -> Result<DebtMap, LedgerError> {
    let total_paid = record.total_paid();
    if total_paid.abs() < f64::EPSILON || !total_paid.is_finite() {
        return Err(LedgerError::ZeroTotalPaid(record.expense.id));
    }

    for split in &record.splits {
        for payer in &record.payers {
            if split.user_id == payer.user_id {
                continue;
            }
            let amount = split.amount * (payer.amount / total_paid);
            debts = record_debt(debts, DebtKey::new(split.user_id, payer.user_id), amount);
        }
    }
    Ok(debts)
}

/// Records `amount` owed along `key`, netting against the reverse direction
/// first. Overflow past the reverse amount flips the debt onto `key`.
fn record_debt(mut debts: DebtMap, key: DebtKey, amount: f64) -> DebtMap {
    let reverse = key.reversed();
    match debts.remove(&reverse) {
        Some(existing) => {
            let remaining = existing - amount;
            if is_effectively_zero(remaining) {
                // settled in both directions
            } else if remaining < 0.0 {
                *debts.entry(key).or_insert(0.0) += -remaining;
            } else {
                debts.insert(reverse, remaining);
            }
        }
        None => {
            *debts.entry(key).or_insert(0.0) += amount;
        }
    }
    debts
}

/// A settlement nets against the reverse edge exactly like an expense does.
/// Without one it only pays down the forward edge and never opens a new debt.
fn apply_settlement(mut debts: DebtMap, key: DebtKey, amount: f64) -> DebtMap {
    if debts.contains_key(&key.reversed()) {
        return record_debt(debts, key, amount);
    }
    if let Some(existing) = debts.remove(&key) {
        let remaining = existing - amount;
        if !is_effectively_zero(remaining) && remaining > 0.0 {
            debts.insert(key, remaining);
        }
    }
    debts
}
