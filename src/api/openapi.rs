use utoipa::OpenApi;

use crate::{
    api::models::{
        AddExpenseRequest, AddFriendExpenseRequest, AddMemberRequest, CreateGroupRequest, DeleteExpenseRequest,
        ErrorResponse, RecordSettlementRequest, ToggleSimplifyRequest,
    },
    core::{
        models::{AppLog, Debt, Expense, ExpenseRecord, FriendExpense, Group, Payer, Settlement, Split, UserDebts},
        services::GroupSummary,
        splits::SplitMethod,
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::handlers::create_group,
        super::handlers::get_group_summary,
        super::handlers::add_member,
        super::handlers::toggle_simplify_debts,
        super::handlers::get_group_balances,
        super::handlers::get_group_debts,
        super::handlers::get_user_group_debts,
        super::handlers::add_expense,
        super::handlers::delete_expense,
        super::handlers::record_settlement,
        super::handlers::add_friend_expense,
        super::handlers::get_user_total_balance,
        super::handlers::get_app_logs
    ),
    components(schemas(
        CreateGroupRequest,
        AddMemberRequest,
        ToggleSimplifyRequest,
        AddExpenseRequest,
        DeleteExpenseRequest,
        RecordSettlementRequest,
        AddFriendExpenseRequest,
        ErrorResponse,
        SplitMethod,
        Group,
        Expense,
        ExpenseRecord,
        Payer,
        Split,
        Settlement,
        FriendExpense,
        Debt,
        UserDebts,
        GroupSummary,
        AppLog
    )),
    info(
        title = "Splitledger API",
        description = "API for group expenses, debt simplification and settle-up",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;
