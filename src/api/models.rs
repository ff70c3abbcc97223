use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::errors::LedgerError;
use crate::core::models::{GroupId, Payer, UserId};
use crate::core::splits::SplitMethod;

// Request structs for JSON payloads
#[derive(Deserialize, ToSchema)]
pub struct CreateGroupRequest {
    pub name: String,
    pub currency: String,
    #[serde(default)]
    pub member_ids: Vec<UserId>,
    #[serde(default)]
    pub simplify_debts: bool,
    pub created_by_id: UserId,
}

#[derive(Deserialize, ToSchema)]
pub struct AddMemberRequest {
    pub user_id: UserId,
    pub added_by_id: UserId,
}

#[derive(Deserialize, ToSchema)]
pub struct ToggleSimplifyRequest {
    pub enabled: bool,
    pub changed_by_id: UserId,
}

#[derive(Deserialize, ToSchema)]
pub struct AddExpenseRequest {
    pub group_id: GroupId,
    pub description: String,
    pub amount: f64,
    pub payers: Vec<Payer>,
    pub split: SplitMethod,
    pub created_by_id: UserId,
}

#[derive(Deserialize, ToSchema)]
pub struct DeleteExpenseRequest {
    pub deleted_by_id: UserId,
}

#[derive(Deserialize, ToSchema)]
pub struct RecordSettlementRequest {
    pub group_id: GroupId,
    pub from_user_id: UserId,
    pub to_user_id: UserId,
    pub amount: f64,
    pub recorded_by_id: UserId,
}

#[derive(Deserialize, ToSchema)]
pub struct AddFriendExpenseRequest {
    pub user_id: UserId,
    pub friend_id: UserId,
    pub amount: f64,
    pub paid_by_id: UserId,
    pub description: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

// Newtype wrapper for LedgerError to implement IntoResponse
pub struct ApiError(pub LedgerError);

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message) = match self.0 {
            LedgerError::GroupNotFound(id) => (StatusCode::NOT_FOUND, format!("Group {} not found", id)),
            LedgerError::ExpenseNotFound(id) => (StatusCode::NOT_FOUND, format!("Expense {} not found", id)),
            LedgerError::NotGroupMember(id) => (StatusCode::FORBIDDEN, format!("User {} is not a group member", id)),
            LedgerError::AlreadyGroupMember(id) => {
                (StatusCode::CONFLICT, format!("User {} is already a group member", id))
            }
            LedgerError::SelfSettlement => (StatusCode::BAD_REQUEST, "Cannot create settlement to self".to_string()),
            LedgerError::SelfFriendExpense => (
                StatusCode::BAD_REQUEST,
                "Cannot share a friend expense with yourself".to_string(),
            ),
            LedgerError::InvalidPayer(id) => (
                StatusCode::BAD_REQUEST,
                format!("User {} is not part of this expense", id),
            ),
            LedgerError::ZeroTotalPaid(id) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("Expense {} has no paid amount", id),
            ),
            LedgerError::InvalidSplit => (StatusCode::BAD_REQUEST, "Invalid split amounts".to_string()),
            LedgerError::InvalidInput(field, detail) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid input for {}: {}", field, detail.description),
            ),
            LedgerError::StorageError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Storage error: {}", msg)),
            LedgerError::LoggingError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Logging error: {}", msg)),
        };
        (status, Json(ErrorResponse { error: error_message })).into_response()
    }
}
