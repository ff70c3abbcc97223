mod api_tests;

use crate::core::models::{Group, Payer, UserId};
use crate::core::services::LedgerService;
use crate::infrastructure::logging::in_memory::InMemoryLogging;
use crate::infrastructure::storage::in_memory::InMemoryStorage;

pub const ALICE: UserId = 1;
pub const BOB: UserId = 2;
pub const CAROL: UserId = 3;

pub fn create_test_service() -> LedgerService<InMemoryLogging, InMemoryStorage> {
    let storage = InMemoryStorage::new();
    let logging = InMemoryLogging::new();
    LedgerService::new(storage, logging)
}

pub async fn create_trip(service: &LedgerService<InMemoryLogging, InMemoryStorage>, simplify: bool) -> Group {
    service
        .create_group("Trip".to_string(), "EUR".to_string(), vec![BOB, CAROL], simplify, ALICE)
        .await
        .unwrap()
}

pub fn paid_by(user_id: UserId, amount: f64) -> Vec<Payer> {
    vec![Payer { user_id, amount }]
}
