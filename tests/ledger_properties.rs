use chrono::Utc;
use proptest::prelude::*;
use splitledger::core::ledger::{accumulate_balances, reduce_direct_debts, simplify_debts};
use splitledger::core::models::{Balances, Debt, Expense, ExpenseRecord, Payer, Settlement, UserId};
use splitledger::core::splits::SplitMethod;
use std::collections::BTreeSet;

const MAX_USERS: usize = 6;

/// (amount in cents, payer index, co-payer index, co-payer share in percent, participant mask)
type RawExpense = (u32, usize, usize, u8, u8);

/// (from index, to index, amount in cents)
type RawSettlement = (usize, usize, u32);

fn raw_expenses() -> impl Strategy<Value = Vec<RawExpense>> {
    prop::collection::vec(
        (1u32..=100_000, 0usize..MAX_USERS, 0usize..MAX_USERS, 0u8..=100, 1u8..64),
        0..=25,
    )
}

fn raw_settlements() -> impl Strategy<Value = Vec<RawSettlement>> {
    prop::collection::vec((0usize..MAX_USERS, 0usize..MAX_USERS, 1u32..=50_000), 0..=8)
}

fn user(member_count: usize, idx: usize) -> UserId {
    (idx % member_count) as UserId + 1
}

/// Payers for `cents`: the main payer alone, or the main payer and a
/// co-payer sharing the amount in whole cents.
fn payers(member_count: usize, cents: u32, payer_idx: usize, co_idx: usize, co_percent: u8) -> Vec<Payer> {
    let payer = user(member_count, payer_idx);
    let co_payer = user(member_count, co_idx);
    let co_cents = cents * u32::from(co_percent) / 100;
    if co_payer == payer || co_cents == 0 || co_cents == cents {
        return vec![Payer {
            user_id: payer,
            amount: f64::from(cents) / 100.0,
        }];
    }
    vec![
        Payer {
            user_id: payer,
            amount: f64::from(cents - co_cents) / 100.0,
        },
        Payer {
            user_id: co_payer,
            amount: f64::from(co_cents) / 100.0,
        },
    ]
}

fn build_history(member_count: usize, raw: &[RawExpense]) -> Vec<ExpenseRecord> {
    raw.iter()
        .enumerate()
        .map(|(idx, &(cents, payer_idx, co_idx, co_percent, mask))| {
            let amount = f64::from(cents) / 100.0;
            let payers = payers(member_count, cents, payer_idx, co_idx, co_percent);
            let mut participants: Vec<UserId> = (0..member_count)
                .filter(|bit| mask & (1 << bit) != 0)
                .map(|bit| bit as UserId + 1)
                .collect();
            if participants.is_empty() {
                participants.push(payers[0].user_id);
            }
            let splits = SplitMethod::Equal(participants)
                .into_splits(amount)
                .expect("equal split over members");
            ExpenseRecord {
                expense: Expense {
                    id: idx as i64 + 1,
                    group_id: 1,
                    description: format!("expense {}", idx + 1),
                    amount,
                    currency: "EUR".to_string(),
                    is_settlement: false,
                    created_at: Utc::now(),
                },
                payers,
                splits,
            }
        })
        .collect()
}

fn build_settlements(member_count: usize, raw: &[RawSettlement]) -> Vec<Settlement> {
    raw.iter()
        .filter_map(|&(from_idx, to_idx, cents)| {
            let from = user(member_count, from_idx);
            let to = user(member_count, to_idx);
            (from != to).then(|| settlement(from, to, f64::from(cents) / 100.0))
        })
        .collect()
}

fn settlement(from: UserId, to: UserId, amount: f64) -> Settlement {
    Settlement {
        id: 1,
        group_id: 1,
        from_user_id: from,
        to_user_id: to,
        amount,
        currency: "EUR".to_string(),
        expense_id: None,
        created_at: Utc::now(),
    }
}

fn assert_one_directional(debts: &[Debt]) -> Result<(), TestCaseError> {
    let mut pairs = BTreeSet::new();
    for debt in debts {
        prop_assert!(debt.amount > 0.01);
        prop_assert_ne!(debt.from, debt.to);
        prop_assert!(!pairs.contains(&(debt.to, debt.from)), "both directions for {:?}", debt);
        pairs.insert((debt.from, debt.to));
    }
    Ok(())
}

proptest! {
    #[test]
    fn balances_sum_to_zero(
        member_count in 1usize..=MAX_USERS,
        raw in raw_expenses(),
        raw_paid in raw_settlements(),
    ) {
        let history = build_history(member_count, &raw);
        let settlements = build_settlements(member_count, &raw_paid);
        let balances = accumulate_balances(&history, &settlements);
        let total: f64 = balances.values().sum();
        prop_assert!(total.abs() < 1e-6, "sum was {}", total);
    }

    #[test]
    fn simplified_transfers_settle_every_balance(
        member_count in 1usize..=MAX_USERS,
        raw in raw_expenses(),
        raw_paid in raw_settlements(),
    ) {
        let history = build_history(member_count, &raw);
        let settlements = build_settlements(member_count, &raw_paid);
        let balances = accumulate_balances(&history, &settlements);

        // Balances within tolerance are skipped; several of them can pile up on one user.
        let tiny = balances.values().filter(|b| b.abs() > 1e-9 && b.abs() <= 0.01 + 1e-9).count();
        prop_assume!(tiny <= 1);

        let transfers = simplify_debts(&balances);
        let mut remaining: Balances = balances.clone();
        for transfer in &transfers {
            prop_assert!(transfer.amount > 0.01);
            prop_assert_ne!(transfer.from, transfer.to);
            *remaining.entry(transfer.from).or_insert(0.0) += transfer.amount;
            *remaining.entry(transfer.to).or_insert(0.0) -= transfer.amount;
        }

        for (user, left) in &remaining {
            prop_assert!(left.abs() <= 0.01 + 1e-9, "user {} left with {}", user, left);
        }
    }

    #[test]
    fn simplified_transfer_count_is_bounded(
        member_count in 1usize..=MAX_USERS,
        raw in raw_expenses(),
        raw_paid in raw_settlements(),
    ) {
        let history = build_history(member_count, &raw);
        let settlements = build_settlements(member_count, &raw_paid);
        let balances = accumulate_balances(&history, &settlements);
        let transfers = simplify_debts(&balances);

        let debtors = balances.values().filter(|b| **b < -0.01).count();
        let creditors = balances.values().filter(|b| **b > 0.01).count();
        let bound = (debtors + creditors).saturating_sub(1);
        prop_assert!(transfers.len() <= bound, "{} transfers for bound {}", transfers.len(), bound);
    }

    #[test]
    fn direct_debts_are_deterministic_and_one_directional(
        member_count in 1usize..=MAX_USERS,
        raw in raw_expenses(),
        raw_paid in raw_settlements(),
    ) {
        let history = build_history(member_count, &raw);
        let settlements = build_settlements(member_count, &raw_paid);

        let first = reduce_direct_debts(&history, &settlements).unwrap();
        let second = reduce_direct_debts(&history, &settlements).unwrap();
        prop_assert_eq!(&first, &second);
        assert_one_directional(&first)?;

        let without_settlements = reduce_direct_debts(&history, &[]).unwrap();
        assert_one_directional(&without_settlements)?;
    }

    #[test]
    fn settling_the_outstanding_amount_removes_the_edge(
        member_count in 2usize..=MAX_USERS,
        raw in raw_expenses(),
    ) {
        let history = build_history(member_count, &raw);
        let debts = reduce_direct_debts(&history, &[]).unwrap();
        if let Some(target) = debts.first().copied() {
            let settled = reduce_direct_debts(&history, &[settlement(target.from, target.to, target.amount)]).unwrap();
            prop_assert!(settled.iter().all(|d| !(d.from == target.from && d.to == target.to)));
            prop_assert!(settled.iter().all(|d| !(d.from == target.to && d.to == target.from)));
            prop_assert_eq!(settled.len(), debts.len() - 1);
        }
    }
}
