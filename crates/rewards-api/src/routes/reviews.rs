//! Routes for review-scoped read models.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};

use rewards_projection::query_handlers::{get_review_history, get_review_summary};

use crate::error::{ApiError, ErrorBody};
use crate::state::AppState;

/// GET /{review_id}/summary — net points for one review.
async fn review_summary(
    State(state): State<AppState>,
    Path(review_id): Path<String>,
) -> Result<Response, ApiError> {
    match get_review_summary(&state.db_pool, &review_id).await? {
        Some(view) => Ok(Json(view).into_response()),
        None => Ok((
            StatusCode::NOT_FOUND,
            Json(ErrorBody {
                error: "review_not_found",
                message: format!("no reward summary for review {review_id}"),
            }),
        )
            .into_response()),
    }
}

/// GET /{review_id}/history — append-only point history for one review.
async fn review_history(
    State(state): State<AppState>,
    Path(review_id): Path<String>,
) -> Result<Response, ApiError> {
    let rows = get_review_history(&state.db_pool, &review_id).await?;
    Ok(Json(rows).into_response())
}

/// Returns the router for the reviews context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{review_id}/summary", get(review_summary))
        .route("/{review_id}/history", get(review_history))
}
