use crate::core::ledger::money::{ZERO_TOLERANCE, exceeds_tolerance, round2};
use crate::core::models::{Balances, Debt, UserId};
use tracing::debug;

/// Suggests transfers that settle `balances` by repeatedly matching the
/// largest remaining debtor with the largest remaining creditor.
///
/// The greedy walk is deterministic: users with equal amounts keep ascending
/// id order. It does not always find the global minimum number of transfers,
/// but never returns more than `debtors + creditors - 1` of them.
pub fn simplify_debts(balances: &Balances) -> Vec<Debt> {
    let mut creditors: Vec<(UserId, f64)> = balances
        .iter()
        .filter(|(_, bal)| **bal > ZERO_TOLERANCE)
        .map(|(&user, &bal)| (user, bal))
        .collect();

    let mut debtors: Vec<(UserId, f64)> = balances
        .iter()
        .filter(|(_, bal)| **bal < -ZERO_TOLERANCE)
        .map(|(&user, &bal)| (user, -bal))
        .collect();

    creditors.sort_by(|a, b| b.1.total_cmp(&a.1));
    debtors.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut simplified = Vec::new();
    let mut i = 0;
    let mut j = 0;

    while i < debtors.len() && j < creditors.len() {
        let (debtor_id, debt_amt) = debtors[i];
        let (creditor_id, credit_amt) = creditors[j];

        let settled_amt = debt_amt.min(credit_amt);
        let rounded = round2(settled_amt);
        if exceeds_tolerance(rounded) {
            simplified.push(Debt {
                from: debtor_id,
                to: creditor_id,
                amount: rounded,
            });
        }

        debtors[i].1 = debt_amt - settled_amt;
        creditors[j].1 = credit_amt - settled_amt;

        if debtors[i].1 < ZERO_TOLERANCE {
            i += 1;
        }
        if creditors[j].1 < ZERO_TOLERANCE {
            j += 1;
        }
    }

    debug!("Simplified debts: {:?}", simplified);
    simplified
}
