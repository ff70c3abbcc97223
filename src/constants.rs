// Action names recorded in the action log.
pub const GROUP_CREATED: &str = "GROUP_CREATED";
pub const MEMBER_ADDED: &str = "MEMBER_ADDED";
pub const SIMPLIFY_DEBTS_TOGGLED: &str = "SIMPLIFY_DEBTS_TOGGLED";
pub const EXPENSE_ADDED: &str = "EXPENSE_ADDED";
pub const EXPENSE_DELETED: &str = "EXPENSE_DELETED";
pub const SETTLEMENT_RECORDED: &str = "SETTLEMENT_RECORDED";
pub const FRIEND_EXPENSE_ADDED: &str = "FRIEND_EXPENSE_ADDED";
