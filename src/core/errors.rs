use serde::Serialize;
use thiserror::Error;

use crate::core::models::{ExpenseId, GroupId, UserId};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub title: String,
    pub description: String,
}

impl FieldError {
    pub fn new(field: &str, title: impl Into<String>, description: impl Into<String>) -> Self {
        FieldError {
            field: field.to_string(),
            title: title.into(),
            description: description.into(),
        }
    }
}

#[derive(Error, Debug, Serialize)]
pub enum LedgerError {
    #[error("Group {0} not found")]
    GroupNotFound(GroupId),
    #[error("Expense {0} not found")]
    ExpenseNotFound(ExpenseId),
    #[error("User {0} is not a group member")]
    NotGroupMember(UserId),
    #[error("User {0} is already a group member")]
    AlreadyGroupMember(UserId),
    #[error("Cannot create settlement to self")]
    SelfSettlement,
    #[error("Cannot share a friend expense with yourself")]
    SelfFriendExpense,
    #[error("User {0} cannot pay for this expense")]
    InvalidPayer(UserId),
    /// Payers of an expense sum to zero, so proportional shares are undefined.
    #[error("Expense {0} has a zero total paid amount")]
    ZeroTotalPaid(ExpenseId),
    #[error("Invalid split amounts")]
    InvalidSplit,
    #[error("Invalid input for field `{0}`: {1:?}")]
    InvalidInput(String, FieldError),
    #[error("Storage error: {0}")]
    StorageError(String),
    #[error("Logging error: {0}")]
    LoggingError(String),
}

impl LedgerError {
    pub fn invalid_input(field: &str, title: impl Into<String>, description: impl Into<String>) -> Self {
        LedgerError::InvalidInput(field.to_string(), FieldError::new(field, title, description))
    }
}
