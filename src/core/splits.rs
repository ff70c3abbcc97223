use crate::core::errors::LedgerError;
use crate::core::ledger::money::ZERO_TOLERANCE;
use crate::core::models::{Split, UserId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use utoipa::ToSchema;

/// How an expense total is divided between participants.
///
/// Amounts are whole cents. Leftover cents go to the participants with the
/// largest fractional share, earlier participants first on ties (list order
/// for `Equal`, lowest user id for the maps).
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(tag = "type", content = "values", rename_all = "snake_case")]
pub enum SplitMethod {
    Equal(Vec<UserId>),
    Exact(BTreeMap<UserId, f64>),
    Percentage(BTreeMap<UserId, f64>),
    Shares(BTreeMap<UserId, f64>),
}

impl SplitMethod {
    pub fn participants(&self) -> Vec<UserId> {
        match self {
            SplitMethod::Equal(users) => users.clone(),
            SplitMethod::Exact(values) | SplitMethod::Percentage(values) | SplitMethod::Shares(values) => {
                values.keys().copied().collect()
            }
        }
    }

    pub fn into_splits(self, amount: f64) -> Result<Vec<Split>, LedgerError> {
        match self {
            SplitMethod::Equal(users) => {
                if users.is_empty() {
                    return Err(LedgerError::InvalidSplit);
                }
                let unique: BTreeSet<UserId> = users.iter().copied().collect();
                if unique.len() != users.len() {
                    return Err(LedgerError::InvalidSplit);
                }
                Ok(distribute(amount, users.into_iter().map(|u| (u, 1.0)).collect()))
            }
            SplitMethod::Exact(values) => {
                validate_values("split", &values)?;
                let total: f64 = values.values().sum();
                if (total - amount).abs() > ZERO_TOLERANCE {
                    return Err(LedgerError::InvalidSplit);
                }
                Ok(values
                    .into_iter()
                    .map(|(user_id, amount)| Split { user_id, amount })
                    .collect())
            }
            SplitMethod::Percentage(values) => {
                validate_values("percentage", &values)?;
                let total: f64 = values.values().sum();
                if (total - 100.0).abs() > ZERO_TOLERANCE {
                    return Err(LedgerError::InvalidSplit);
                }
                Ok(distribute(amount, values.into_iter().collect()))
            }
            SplitMethod::Shares(values) => {
                validate_values("shares", &values)?;
                let total: f64 = values.values().sum();
                if total <= 0.0 {
                    return Err(LedgerError::InvalidSplit);
                }
                Ok(distribute(amount, values.into_iter().collect()))
            }
        }
    }
}

fn validate_values(field: &str, values: &BTreeMap<UserId, f64>) -> Result<(), LedgerError> {
    if values.is_empty() {
        return Err(LedgerError::InvalidSplit);
    }
    if values.values().any(|v| !v.is_finite() || *v < 0.0) {
        return Err(LedgerError::invalid_input(
            field,
            "Invalid Split Value",
            "Split values must be finite and not negative",
        ));
    }
    Ok(())
}

/// Splits `amount` by weight in whole cents. Every share is floored to a
/// cent and the leftover cents go one at a time to the largest fractional
/// parts, so no share is ever negative and the shares add up to `amount`.
fn distribute(amount: f64, weights: Vec<(UserId, f64)>) -> Vec<Split> {
    let total_weight: f64 = weights.iter().map(|(_, w)| w).sum();
    let total_cents = (amount * 100.0).round() as i64;

    let mut shares: Vec<(UserId, i64, f64)> = weights
        .into_iter()
        .map(|(user_id, weight)| {
            let exact = total_cents as f64 * weight / total_weight;
            let floor = exact.floor();
            (user_id, floor as i64, exact - floor)
        })
        .collect();

    let assigned: i64 = shares.iter().map(|(_, cents, _)| cents).sum();
    let leftover = usize::try_from(total_cents - assigned).unwrap_or(0);

    // Stable sort: equal fractions keep participant order.
    let mut order: Vec<usize> = (0..shares.len()).collect();
    order.sort_by(|&a, &b| shares[b].2.total_cmp(&shares[a].2));
    for &idx in order.iter().take(leftover) {
        shares[idx].1 += 1;
    }

    shares
        .into_iter()
        .map(|(user_id, cents, _)| Split {
            user_id,
            amount: cents as f64 / 100.0,
        })
        .collect()
}
