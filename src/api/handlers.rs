use crate::{
    api::models::*,
    core::{
        models::{AppLog, Balances, Debt, ExpenseId, ExpenseRecord, FriendExpense, Group, GroupId, Settlement, UserDebts, UserId},
        services::{GroupSummary, LedgerService},
    },
    infrastructure::{logging::in_memory::InMemoryLogging, storage::in_memory::InMemoryStorage},
};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use std::sync::Arc;

pub type SharedService = Arc<LedgerService<InMemoryLogging, InMemoryStorage>>;

// Define API routes
pub fn api_routes(service: SharedService) -> Router {
    Router::new()
        .route("/groups", post(create_group))
        .route("/groups/{group_id}", get(get_group_summary))
        .route("/groups/{group_id}/members", post(add_member))
        .route("/groups/{group_id}/simplify", post(toggle_simplify_debts))
        .route("/groups/{group_id}/balances", get(get_group_balances))
        .route("/groups/{group_id}/debts", get(get_group_debts))
        .route("/groups/{group_id}/users/{user_id}/debts", get(get_user_group_debts))
        .route("/expenses", post(add_expense))
        .route("/expenses/{expense_id}", delete(delete_expense))
        .route("/settlements", post(record_settlement))
        .route("/friend_expenses", post(add_friend_expense))
        .route("/users/{user_id}/balance", get(get_user_total_balance))
        .route("/logs", get(get_app_logs))
        .with_state(service)
}

#[utoipa::path(
    post,
    path = "/api/groups",
    request_body = CreateGroupRequest,
    responses(
        (status = 201, description = "Group created successfully", body = Group),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub(crate) async fn create_group(
    State(service): State<SharedService>,
    Json(req): Json<CreateGroupRequest>,
) -> Result<(StatusCode, Json<Group>), ApiError> {
    let group = service
        .create_group(
            req.name,
            req.currency,
            req.member_ids,
            req.simplify_debts,
            req.created_by_id,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(group)))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}",
    params(
        ("group_id" = i64, Path, description = "ID of the group")
    ),
    responses(
        (status = 200, description = "Group with balances and debts", body = GroupSummary),
        (status = 404, description = "Group not found", body = ErrorResponse),
        (status = 422, description = "Group history contains an unpaid expense", body = ErrorResponse)
    )
)]
pub(crate) async fn get_group_summary(
    State(service): State<SharedService>,
    Path(group_id): Path<GroupId>,
) -> Result<Json<GroupSummary>, ApiError> {
    let summary = service.group_summary(group_id).await?;
    Ok(Json(summary))
}

#[utoipa::path(
    post,
    path = "/api/groups/{group_id}/members",
    request_body = AddMemberRequest,
    params(
        ("group_id" = i64, Path, description = "ID of the group")
    ),
    responses(
        (status = 200, description = "Member added", body = Group),
        (status = 403, description = "Caller is not a group member", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse),
        (status = 409, description = "User already in group", body = ErrorResponse)
    )
)]
pub(crate) async fn add_member(
    State(service): State<SharedService>,
    Path(group_id): Path<GroupId>,
    Json(req): Json<AddMemberRequest>,
) -> Result<Json<Group>, ApiError> {
    let group = service.add_member(group_id, req.user_id, req.added_by_id).await?;
    Ok(Json(group))
}

#[utoipa::path(
    post,
    path = "/api/groups/{group_id}/simplify",
    request_body = ToggleSimplifyRequest,
    params(
        ("group_id" = i64, Path, description = "ID of the group")
    ),
    responses(
        (status = 200, description = "Simplify mode updated", body = Group),
        (status = 403, description = "Caller is not a group member", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    )
)]
pub(crate) async fn toggle_simplify_debts(
    State(service): State<SharedService>,
    Path(group_id): Path<GroupId>,
    Json(req): Json<ToggleSimplifyRequest>,
) -> Result<Json<Group>, ApiError> {
    let group = service
        .set_simplify_debts(group_id, req.enabled, req.changed_by_id)
        .await?;
    Ok(Json(group))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/balances",
    params(
        ("group_id" = i64, Path, description = "ID of the group")
    ),
    responses(
        (status = 200, description = "Net balance per user", body = Object),
        (status = 404, description = "Group not found", body = ErrorResponse)
    )
)]
pub(crate) async fn get_group_balances(
    State(service): State<SharedService>,
    Path(group_id): Path<GroupId>,
) -> Result<Json<Balances>, ApiError> {
    let balances = service.group_balances(group_id).await?;
    Ok(Json(balances))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/debts",
    params(
        ("group_id" = i64, Path, description = "ID of the group")
    ),
    responses(
        (status = 200, description = "Pairwise debts for the group's mode", body = [Debt]),
        (status = 404, description = "Group not found", body = ErrorResponse),
        (status = 422, description = "Group history contains an unpaid expense", body = ErrorResponse)
    )
)]
pub(crate) async fn get_group_debts(
    State(service): State<SharedService>,
    Path(group_id): Path<GroupId>,
) -> Result<Json<Vec<Debt>>, ApiError> {
    let debts = service.pairwise_debts(group_id).await?;
    Ok(Json(debts))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/users/{user_id}/debts",
    params(
        ("group_id" = i64, Path, description = "ID of the group"),
        ("user_id" = i64, Path, description = "ID of the user")
    ),
    responses(
        (status = 200, description = "What the user owes and is owed in the group", body = UserDebts),
        (status = 404, description = "Group not found", body = ErrorResponse)
    )
)]
pub(crate) async fn get_user_group_debts(
    State(service): State<SharedService>,
    Path((group_id, user_id)): Path<(GroupId, UserId)>,
) -> Result<Json<UserDebts>, ApiError> {
    let debts = service.user_group_debts(group_id, user_id).await?;
    Ok(Json(debts))
}

#[utoipa::path(
    post,
    path = "/api/expenses",
    request_body = AddExpenseRequest,
    responses(
        (status = 201, description = "Expense added", body = ExpenseRecord),
        (status = 400, description = "Invalid amount, payers or split", body = ErrorResponse),
        (status = 403, description = "User is not a group member", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    )
)]
pub(crate) async fn add_expense(
    State(service): State<SharedService>,
    Json(req): Json<AddExpenseRequest>,
) -> Result<(StatusCode, Json<ExpenseRecord>), ApiError> {
    let record = service
        .add_expense(
            req.group_id,
            req.description,
            req.amount,
            req.payers,
            req.split,
            req.created_by_id,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

#[utoipa::path(
    delete,
    path = "/api/expenses/{expense_id}",
    request_body = DeleteExpenseRequest,
    params(
        ("expense_id" = i64, Path, description = "ID of the expense to delete")
    ),
    responses(
        (status = 200, description = "Expense deleted"),
        (status = 403, description = "User is not a group member", body = ErrorResponse),
        (status = 404, description = "Expense not found", body = ErrorResponse)
    )
)]
pub(crate) async fn delete_expense(
    State(service): State<SharedService>,
    Path(expense_id): Path<ExpenseId>,
    Json(req): Json<DeleteExpenseRequest>,
) -> Result<StatusCode, ApiError> {
    service.delete_expense(expense_id, req.deleted_by_id).await?;
    Ok(StatusCode::OK)
}

#[utoipa::path(
    post,
    path = "/api/settlements",
    request_body = RecordSettlementRequest,
    responses(
        (status = 201, description = "Settlement recorded", body = Settlement),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 403, description = "User is not a group member", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    )
)]
pub(crate) async fn record_settlement(
    State(service): State<SharedService>,
    Json(req): Json<RecordSettlementRequest>,
) -> Result<(StatusCode, Json<Settlement>), ApiError> {
    let settlement = service
        .record_settlement(
            req.group_id,
            req.from_user_id,
            req.to_user_id,
            req.amount,
            req.recorded_by_id,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(settlement)))
}

#[utoipa::path(
    post,
    path = "/api/friend_expenses",
    request_body = AddFriendExpenseRequest,
    responses(
        (status = 201, description = "Friend expense added", body = FriendExpense),
        (status = 400, description = "Bad request", body = ErrorResponse)
    )
)]
pub(crate) async fn add_friend_expense(
    State(service): State<SharedService>,
    Json(req): Json<AddFriendExpenseRequest>,
) -> Result<(StatusCode, Json<FriendExpense>), ApiError> {
    let expense = service
        .add_friend_expense(req.user_id, req.friend_id, req.amount, req.paid_by_id, req.description)
        .await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

#[utoipa::path(
    get,
    path = "/api/users/{user_id}/balance",
    params(
        ("user_id" = i64, Path, description = "ID of the user")
    ),
    responses(
        (status = 200, description = "Net position against every counterparty", body = UserDebts),
        (status = 422, description = "A group history contains an unpaid expense", body = ErrorResponse)
    )
)]
pub(crate) async fn get_user_total_balance(
    State(service): State<SharedService>,
    Path(user_id): Path<UserId>,
) -> Result<Json<UserDebts>, ApiError> {
    let total = service.user_total_balance(user_id).await?;
    Ok(Json(total))
}

#[utoipa::path(
    get,
    path = "/api/logs",
    responses(
        (status = 200, description = "Recorded actions", body = [AppLog]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub(crate) async fn get_app_logs(State(service): State<SharedService>) -> Result<Json<Vec<AppLog>>, ApiError> {
    let logs = service.get_app_logs().await?;
    Ok(Json(logs))
}
