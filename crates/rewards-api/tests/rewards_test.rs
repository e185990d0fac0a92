//! Integration tests for the rewards command and query endpoints.

mod common;

use axum::http::StatusCode;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../migrations")]
async fn test_grant_points_round_trip(pool: PgPool) {
    // POST /api/v1/rewards/grant
    let app = common::build_test_app(pool.clone());
    let (status, json) = common::post_json(
        app,
        "/api/v1/rewards/grant",
        &serde_json::json!({
            "user_id": "user-123",
            "review_id": "review-abc",
            "points": 50,
            "reason": "photo review"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["aggregate_id"], "user-123");
    assert_eq!(json["version"], 1);
    assert_eq!(json["event_ids"].as_array().unwrap().len(), 1);

    // GET /api/v1/rewards/accounts/{user_id} — replayed aggregate state.
    let app = common::build_test_app(pool.clone());
    let (status, json) = common::get_json(app, "/api/v1/rewards/accounts/user-123").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["user_id"], "user-123");
    assert_eq!(json["balance"], 50);
    assert_eq!(json["version"], 1);

    // GET /api/v1/rewards/balances/{user_id} — projected read model.
    let app = common::build_test_app(pool);
    let (status, json) = common::get_json(app, "/api/v1/rewards/balances/user-123").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["balance"], 50);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_grant_then_refund_updates_balance(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (status, _) = common::post_json(
        app,
        "/api/v1/rewards/grant",
        &serde_json::json!({
            "user_id": "user-123",
            "review_id": "review-abc",
            "points": 50,
            "reason": ""
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let app = common::build_test_app(pool.clone());
    let (status, json) = common::post_json(
        app,
        "/api/v1/rewards/refund",
        &serde_json::json!({
            "user_id": "user-123",
            "order_id": "order-777",
            "points": 20,
            "reason": "order payment"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["version"], 2);

    let app = common::build_test_app(pool);
    let (status, json) = common::get_json(app, "/api/v1/rewards/balances/user-123").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["balance"], 30);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_grant_with_non_positive_points_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);

    let (status, json) = common::post_json(
        app,
        "/api/v1/rewards/grant",
        &serde_json::json!({
            "user_id": "user-123",
            "review_id": "review-abc",
            "points": 0,
            "reason": ""
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "invalid_command");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_refund_exceeding_balance_returns_422(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (status, _) = common::post_json(
        app,
        "/api/v1/rewards/grant",
        &serde_json::json!({
            "user_id": "user-123",
            "review_id": "review-abc",
            "points": 10,
            "reason": ""
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let app = common::build_test_app(pool);
    let (status, json) = common::post_json(
        app,
        "/api/v1/rewards/refund",
        &serde_json::json!({
            "user_id": "user-123",
            "order_id": "order-777",
            "points": 100,
            "reason": ""
        }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error"], "insufficient_balance");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_refund_for_unknown_account_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);

    let (status, json) = common::post_json(
        app,
        "/api/v1/rewards/refund",
        &serde_json::json!({
            "user_id": "user-ghost",
            "order_id": "order-777",
            "points": 10,
            "reason": ""
        }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "account_not_found");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_revoke_can_drive_balance_negative(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (status, _) = common::post_json(
        app,
        "/api/v1/rewards/grant",
        &serde_json::json!({
            "user_id": "user-123",
            "review_id": "review-abc",
            "points": 50,
            "reason": ""
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let app = common::build_test_app(pool.clone());
    let (status, _) = common::post_json(
        app,
        "/api/v1/rewards/revoke",
        &serde_json::json!({
            "user_id": "user-123",
            "review_id": "review-abc",
            "points": 100,
            "reason": "fake review clawback"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let app = common::build_test_app(pool);
    let (status, json) = common::get_json(app, "/api/v1/rewards/balances/user-123").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["balance"], -50);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_get_account_for_unknown_user_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);

    let (status, json) = common::get_json(app, "/api/v1/rewards/accounts/user-ghost").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "account_not_found");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_get_balance_for_unknown_user_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);

    let (status, json) = common::get_json(app, "/api/v1/rewards/balances/user-ghost").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "balance_not_found");
}
