use crate::core::models::{Balances, ExpenseRecord, Settlement};
use tracing::debug;

/// Folds a group's history into net balances.
///
/// Payers are credited and split users debited for every expense; a
/// settlement credits the payer and debits the recipient. Expenses flagged
/// `is_settlement` are skipped because the matching settlement row already
/// carries the same transfer.
pub fn accumulate_balances(expenses: &[ExpenseRecord], settlements: &[Settlement]) -> Balances {
    let mut balances = Balances::new();

    for record in expenses.iter().filter(|r| !r.expense.is_settlement) {
        for payer in &record.payers {
            *balances.entry(payer.user_id).or_insert(0.0) += payer.amount;
        }
        for split in &record.splits {
            *balances.entry(split.user_id).or_insert(0.0) -= split.amount;
        }
    }

    for settlement in settlements {
        *balances.entry(settlement.from_user_id).or_insert(0.0) += settlement.amount;
        *balances.entry(settlement.to_user_id).or_insert(0.0) -= settlement.amount;
    }

    debug!("Balances accumulated: {:?}", balances);
    balances
}
