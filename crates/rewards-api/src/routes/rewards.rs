//! Routes for reward account commands and account-level queries.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rewards_core::repository::StoredEvent;
use rewards_ledger::application::command_handlers;
use rewards_ledger::application::query_handlers::get_reward_account;
use rewards_ledger::domain::commands::{GrantPoints, RefundPoints, RevokePoints};
use rewards_projection::query_handlers::get_balance;

use crate::error::{ApiError, ErrorBody};
use crate::state::AppState;

/// Request body for POST /grant.
#[derive(Debug, Deserialize)]
pub struct GrantPointsRequest {
    /// The account to grant points to.
    pub user_id: String,
    /// The review that triggered the grant.
    pub review_id: String,
    /// Number of points to grant.
    pub points: i64,
    /// Free-text reason.
    pub reason: String,
}

/// Request body for POST /refund.
#[derive(Debug, Deserialize)]
pub struct RefundPointsRequest {
    /// The account to refund points from.
    pub user_id: String,
    /// The order the points are used on.
    pub order_id: String,
    /// Number of points to refund.
    pub points: i64,
    /// Free-text reason.
    pub reason: String,
}

/// Request body for POST /revoke.
#[derive(Debug, Deserialize)]
pub struct RevokePointsRequest {
    /// The account to revoke points from.
    pub user_id: String,
    /// The review that caused the revocation.
    pub review_id: String,
    /// Number of points to revoke.
    pub points: i64,
    /// Free-text reason.
    pub reason: String,
}

/// Response body for accepted commands.
#[derive(Debug, Serialize)]
pub struct CommandAccepted {
    /// The account stream the events were appended to.
    pub aggregate_id: String,
    /// Stream version after the append.
    pub version: i64,
    /// Identifiers of the persisted events, in commit order.
    pub event_ids: Vec<Uuid>,
}

fn accepted(aggregate_id: String, events: &[StoredEvent]) -> CommandAccepted {
    CommandAccepted {
        aggregate_id,
        version: events.last().map_or(0, |e| e.version),
        event_ids: events.iter().map(|e| e.event_id).collect(),
    }
}

/// POST /grant
async fn grant_points(
    State(state): State<AppState>,
    Json(request): Json<GrantPointsRequest>,
) -> Result<Json<CommandAccepted>, ApiError> {
    let command = GrantPoints {
        correlation_id: Uuid::new_v4(),
        user_id: request.user_id.clone(),
        review_id: request.review_id,
        points: request.points,
        reason: request.reason,
    };

    let events = command_handlers::handle_grant_points(
        &command,
        state.clock.as_ref(),
        state.repository.as_ref(),
        state.projector.as_ref(),
        state.publisher.as_ref(),
    )
    .await?;

    Ok(Json(accepted(request.user_id, &events)))
}

/// POST /refund
async fn refund_points(
    State(state): State<AppState>,
    Json(request): Json<RefundPointsRequest>,
) -> Result<Json<CommandAccepted>, ApiError> {
    let command = RefundPoints {
        correlation_id: Uuid::new_v4(),
        user_id: request.user_id.clone(),
        order_id: request.order_id,
        points: request.points,
        reason: request.reason,
    };

    let events = command_handlers::handle_refund_points(
        &command,
        state.clock.as_ref(),
        state.repository.as_ref(),
        state.projector.as_ref(),
        state.publisher.as_ref(),
    )
    .await?;

    Ok(Json(accepted(request.user_id, &events)))
}

/// POST /revoke
async fn revoke_points(
    State(state): State<AppState>,
    Json(request): Json<RevokePointsRequest>,
) -> Result<Json<CommandAccepted>, ApiError> {
    let command = RevokePoints {
        correlation_id: Uuid::new_v4(),
        user_id: request.user_id.clone(),
        review_id: request.review_id,
        points: request.points,
        reason: request.reason,
    };

    let events = command_handlers::handle_revoke_points(
        &command,
        state.clock.as_ref(),
        state.repository.as_ref(),
        state.projector.as_ref(),
        state.publisher.as_ref(),
    )
    .await?;

    Ok(Json(accepted(request.user_id, &events)))
}

/// GET /accounts/{user_id} — aggregate state replayed from the event log.
async fn account(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Response, ApiError> {
    let view = get_reward_account(&user_id, state.repository.as_ref()).await?;
    Ok(Json(view).into_response())
}

/// GET /balances/{user_id} — eventually consistent balance read model.
async fn balance(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Response, ApiError> {
    match get_balance(&state.db_pool, &user_id).await? {
        Some(view) => Ok(Json(view).into_response()),
        None => Ok((
            StatusCode::NOT_FOUND,
            Json(ErrorBody {
                error: "balance_not_found",
                message: format!("no balance recorded for user {user_id}"),
            }),
        )
            .into_response()),
    }
}

/// Returns the router for the rewards context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/grant", post(grant_points))
        .route("/refund", post(refund_points))
        .route("/revoke", post(revoke_points))
        .route("/accounts/{user_id}", get(account))
        .route("/balances/{user_id}", get(balance))
}
