use crate::{error::AppError, AppState};
use analytics::{MovingAverageOutcome, MovingAverageReport};
use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use core_types::UserId;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct MovingAverageParams {
    /// Falls back to `analytics.default_window` when absent.
    pub window: Option<i64>,
}

/// # GET /analytics/moving-average/:user_id
/// Computes the user's trailing moving average over their recorded amounts.
pub async fn get_moving_average(
    path: Result<Path<UserId>, PathRejection>,
    query: Result<Query<MovingAverageParams>, QueryRejection>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<MovingAverageReport>, AppError> {
    // Malformed parameters get the same JSON error body as every other failure.
    let Path(user_id) = path.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let Query(params) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let window = params.window.unwrap_or(state.default_window);

    match state.service.moving_average(user_id, window).await {
        MovingAverageOutcome::Success(report) => Ok(Json(report)),
        MovingAverageOutcome::InvalidWindow(window) => Err(AppError::InvalidWindow(window)),
        MovingAverageOutcome::NotFound(user_id) => Err(AppError::NotFound(format!(
            "User {user_id} not found in database"
        ))),
        MovingAverageOutcome::Failure(e) => Err(e.into()),
    }
}
