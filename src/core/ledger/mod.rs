//! Pure debt computations over a group's expense history.
//!
//! Nothing here performs I/O or keeps state between calls: the service loads
//! a snapshot of expenses and settlements from storage and hands it to these
//! functions.

pub mod balances;
pub mod direct;
pub mod money;
pub mod simplify;
pub mod views;

pub use balances::accumulate_balances;
pub use direct::{DebtKey, DebtMap, reduce_direct_debts};
pub use money::{ZERO_TOLERANCE, is_effectively_zero, round2};
pub use simplify::simplify_debts;
pub use views::{partition_user_debts, total_balance};
