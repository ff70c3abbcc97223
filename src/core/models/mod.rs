pub mod audit;
pub mod debt;
pub mod expense;
pub mod friend_expense;
pub mod group;
pub mod settlement;

pub type UserId = i64;
pub type GroupId = i64;
pub type ExpenseId = i64;

pub use audit::AppLog;
pub use debt::{Balances, Debt, UserDebts};
pub use expense::{Expense, ExpenseRecord, Payer, Split};
pub use friend_expense::FriendExpense;
pub use group::Group;
pub use settlement::Settlement;
