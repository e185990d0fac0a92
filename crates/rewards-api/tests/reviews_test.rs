//! Integration tests for the review read-model endpoints.

mod common;

use axum::http::StatusCode;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../migrations")]
async fn test_review_summary_and_history_reflect_grants_and_revocations(pool: PgPool) {
    // Grant 50 then revoke 20 on the same review.
    let app = common::build_test_app(pool.clone());
    let (status, _) = common::post_json(
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

    let app = common::build_test_app(pool.clone());
    let (status, _) = common::post_json(
        app,
        "/api/v1/rewards/revoke",
        &serde_json::json!({
            "user_id": "user-123",
            "review_id": "review-abc",
            "points": 20,
            "reason": "partial clawback"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Summary nets the two events.
    let app = common::build_test_app(pool.clone());
    let (status, json) = common::get_json(app, "/api/v1/reviews/review-abc/summary").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["review_id"], "review-abc");
    assert_eq!(json["user_id"], "user-123");
    assert_eq!(json["net_points"], 30);

    // History keeps both rows in order.
    let app = common::build_test_app(pool);
    let (status, json) = common::get_json(app, "/api/v1/reviews/review-abc/history").await;
    assert_eq!(status, StatusCode::OK);
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["points_change"], 50);
    assert_eq!(rows[1]["points_change"], -20);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_refund_does_not_touch_review_models(pool: PgPool) {
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
        "/api/v1/rewards/refund",
        &serde_json::json!({
            "user_id": "user-123",
            "order_id": "order-777",
            "points": 20,
            "reason": ""
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // The refund is order-scoped: summary and history stay at the grant.
    let app = common::build_test_app(pool.clone());
    let (status, json) = common::get_json(app, "/api/v1/reviews/review-abc/summary").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["net_points"], 50);

    let app = common::build_test_app(pool);
    let (_, json) = common::get_json(app, "/api/v1/reviews/review-abc/history").await;
    assert_eq!(json.as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_unknown_review_summary_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);

    let (status, json) = common::get_json(app, "/api/v1/reviews/review-ghost/summary").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "review_not_found");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_unknown_review_history_returns_empty_list(pool: PgPool) {
    let app = common::build_test_app(pool);

    let (status, json) = common::get_json(app, "/api/v1/reviews/review-ghost/history").await;

    assert_eq!(status, StatusCode::OK);
    assert!(json.as_array().unwrap().is_empty());
}
