// src/tests/api_tests.rs

use super::{ALICE, BOB, create_test_service};
use crate::api::handlers::api_routes;
use crate::api::models::ErrorResponse;
use crate::core::models::{Debt, Group, Settlement, UserDebts};
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> Router {
    Router::new().nest("/api", api_routes(Arc::new(create_test_service())))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

fn parse<T: DeserializeOwned>(bytes: &[u8]) -> T {
    serde_json::from_slice(bytes).unwrap()
}

async fn create_group(app: &Router, simplify: bool) -> Group {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/groups",
        Some(json!({
            "name": "Trip",
            "currency": "EUR",
            "member_ids": [BOB],
            "simplify_debts": simplify,
            "created_by_id": ALICE
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    parse(&body)
}

#[tokio::test]
async fn test_expense_and_settlement_over_http() {
    let app = app();
    let group = create_group(&app, false).await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/expenses",
        Some(json!({
            "group_id": group.id,
            "description": "Dinner",
            "amount": 100.0,
            "payers": [{ "user_id": ALICE, "amount": 100.0 }],
            "split": { "type": "equal", "values": [ALICE, BOB] },
            "created_by_id": ALICE
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, Method::GET, &format!("/api/groups/{}/debts", group.id), None).await;
    assert_eq!(status, StatusCode::OK);
    let debts: Vec<Debt> = parse(&body);
    assert_eq!(
        debts,
        vec![Debt {
            from: BOB,
            to: ALICE,
            amount: 50.0
        }]
    );

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/settlements",
        Some(json!({
            "group_id": group.id,
            "from_user_id": BOB,
            "to_user_id": ALICE,
            "amount": 50.0,
            "recorded_by_id": BOB
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let settlement: Settlement = parse(&body);
    assert_eq!(settlement.amount, 50.0);

    let (_, body) = send(
        &app,
        Method::GET,
        &format!("/api/groups/{}/users/{}/debts", group.id, BOB),
        None,
    )
    .await;
    let bob: UserDebts = parse(&body);
    assert!(bob.owes.is_empty() && bob.owed.is_empty());

    let (_, body) = send(&app, Method::GET, "/api/logs", None).await;
    let logs: Vec<Value> = parse(&body);
    assert_eq!(logs.len(), 3);
}

#[tokio::test]
async fn test_group_summary_and_balances_over_http() {
    let app = app();
    let group = create_group(&app, true).await;

    let (status, body) = send(&app, Method::GET, &format!("/api/groups/{}", group.id), None).await;
    assert_eq!(status, StatusCode::OK);
    let summary: Value = parse(&body);
    assert_eq!(summary["group"]["simplify_debts"], true);
    assert_eq!(summary["debts"], json!([]));

    let (status, body) = send(&app, Method::GET, &format!("/api/groups/{}/balances", group.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse::<Value>(&body), json!({}));
}

#[tokio::test]
async fn test_error_statuses() {
    let app = app();
    let group = create_group(&app, false).await;

    let (status, body) = send(&app, Method::GET, "/api/groups/999/debts", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let error: ErrorResponse = parse(&body);
    assert_eq!(error.error, "Group 999 not found");

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/groups/{}/members", group.id),
        Some(json!({ "user_id": BOB, "added_by_id": ALICE })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/groups/{}/simplify", group.id),
        Some(json!({ "enabled": true, "changed_by_id": 42 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/settlements",
        Some(json!({
            "group_id": group.id,
            "from_user_id": BOB,
            "to_user_id": BOB,
            "amount": 5.0,
            "recorded_by_id": BOB
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::DELETE,
        "/api/expenses/12345",
        Some(json!({ "deleted_by_id": ALICE })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_friend_expense_and_total_balance_over_http() {
    let app = app();

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/friend_expenses",
        Some(json!({
            "user_id": ALICE,
            "friend_id": BOB,
            "amount": 40.0,
            "paid_by_id": BOB,
            "description": "Cinema"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, Method::GET, &format!("/api/users/{}/balance", ALICE), None).await;
    assert_eq!(status, StatusCode::OK);
    let total: UserDebts = parse(&body);
    assert_eq!(
        total.owes,
        vec![Debt {
            from: ALICE,
            to: BOB,
            amount: 20.0
        }]
    );
}
