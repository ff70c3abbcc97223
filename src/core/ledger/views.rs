use crate::core::ledger::money::{exceeds_tolerance, round2};
use crate::core::models::{Debt, FriendExpense, UserDebts, UserId};
use std::collections::BTreeMap;

/// Splits a debt list into what `user_id` owes and what is owed to them.
pub fn partition_user_debts(debts: &[Debt], user_id: UserId) -> UserDebts {
    let mut view = UserDebts::default();
    for debt in debts {
        if debt.from == user_id {
            view.owes.push(*debt);
        } else if debt.to == user_id {
            view.owed.push(*debt);
        }
    }
    view
}

/// Nets `user_id`'s position against every counterparty across all of the
/// given group debt lists plus 50/50 friend expenses.
pub fn total_balance<'a, I>(user_id: UserId, group_debts: I, friend_expenses: &[FriendExpense]) -> UserDebts
where
    I: IntoIterator<Item = &'a [Debt]>,
{
    // counterparty -> amount they owe the user (negative: user owes them)
    let mut net: BTreeMap<UserId, f64> = BTreeMap::new();

    for debts in group_debts {
        for debt in debts {
            if debt.from == user_id {
                *net.entry(debt.to).or_insert(0.0) -= debt.amount;
            } else if debt.to == user_id {
                *net.entry(debt.from).or_insert(0.0) += debt.amount;
            }
        }
    }

    for expense in friend_expenses {
        if !expense.involves(user_id) || expense.user_id == expense.friend_id {
            continue;
        }
        let other = expense.counterparty(user_id);
        let half = expense.amount / 2.0;
        if expense.paid_by == user_id {
            *net.entry(other).or_insert(0.0) += half;
        } else {
            *net.entry(other).or_insert(0.0) -= half;
        }
    }

    let mut view = UserDebts::default();
    for (counterparty, amount) in net {
        let amount = round2(amount);
        if exceeds_tolerance(amount) {
            view.owed.push(Debt {
                from: counterparty,
                to: user_id,
                amount,
            });
        } else if exceeds_tolerance(-amount) {
            view.owes.push(Debt {
                from: user_id,
                to: counterparty,
                amount: -amount,
            });
        }
    }
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn friend_expense(user_id: UserId, friend_id: UserId, amount: f64, paid_by: UserId) -> FriendExpense {
        FriendExpense {
            id: 1,
            user_id,
            friend_id,
            amount,
            paid_by,
            description: "lunch".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn partitions_by_direction() {
        let debts = vec![
            Debt { from: 1, to: 2, amount: 10.0 },
            Debt { from: 3, to: 1, amount: 5.0 },
            Debt { from: 3, to: 2, amount: 7.0 },
        ];
        let view = partition_user_debts(&debts, 1);
        assert_eq!(view.owes, vec![Debt { from: 1, to: 2, amount: 10.0 }]);
        assert_eq!(view.owed, vec![Debt { from: 3, to: 1, amount: 5.0 }]);
    }

    #[test]
    fn friend_expense_paid_by_other_is_owed_by_user() {
        let view = total_balance(1, Vec::<&[Debt]>::new(), &[friend_expense(1, 2, 40.0, 2)]);
        assert_eq!(view.owes, vec![Debt { from: 1, to: 2, amount: 20.0 }]);
        assert!(view.owed.is_empty());
    }

    #[test]
    fn friend_expense_paid_by_user_is_owed_to_user() {
        let view = total_balance(2, Vec::<&[Debt]>::new(), &[friend_expense(1, 2, 40.0, 2)]);
        assert_eq!(view.owed, vec![Debt { from: 1, to: 2, amount: 20.0 }]);
        assert!(view.owes.is_empty());
    }

    #[test]
    fn group_debts_net_across_groups() {
        let group_a = vec![Debt { from: 1, to: 2, amount: 30.0 }];
        let group_b = vec![
            Debt { from: 2, to: 1, amount: 10.0 },
            Debt { from: 3, to: 1, amount: 4.0 },
        ];
        let view = total_balance(1, [group_a.as_slice(), group_b.as_slice()], &[]);
        assert_eq!(view.owes, vec![Debt { from: 1, to: 2, amount: 20.0 }]);
        assert_eq!(view.owed, vec![Debt { from: 3, to: 1, amount: 4.0 }]);
    }

    #[test]
    fn nets_that_round_to_a_cent_are_dropped() {
        let group_a = vec![
            Debt { from: 2, to: 1, amount: 0.03 },
            Debt { from: 1, to: 3, amount: 0.0149 },
            Debt { from: 4, to: 1, amount: 0.016 },
        ];
        let group_b = vec![Debt { from: 1, to: 2, amount: 0.0151 }];
        let view = total_balance(1, [group_a.as_slice(), group_b.as_slice()], &[]);
        assert!(view.owes.is_empty());
        assert_eq!(view.owed, vec![Debt { from: 4, to: 1, amount: 0.02 }]);
    }

    #[test]
    fn fully_netted_counterparties_disappear() {
        let group = vec![Debt { from: 1, to: 2, amount: 20.0 }];
        let view = total_balance(1, [group.as_slice()], &[friend_expense(1, 2, 40.0, 1)]);
        assert_eq!(view, UserDebts::default());
    }
}
