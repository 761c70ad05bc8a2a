//! HTTP handlers for daily goals

use axum::extract::State;
use axum::routing::get;
use axum::Router;

use super::auth::CurrentUser;
use super::extract::Json;
use super::response::{ok, ApiResult};
use super::state::AppState;
use crate::goals::{GoalStatus, UpdateGoalRequest};
use crate::storage::now;

pub fn routes() -> Router<AppState> {
    Router::new().route("/goals", get(get_goal).put(update_goal))
}

/// Current goal (defaults when unset) with today's progress
async fn get_goal(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<GoalStatus> {
    ok(state.with_db(|db| db.goal_status(user.id, now()))?)
}

async fn update_goal(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(updates): Json<UpdateGoalRequest>,
) -> ApiResult<GoalStatus> {
    let status = state.with_db(|db| {
        db.upsert_goal(user.id, updates)?;
        db.goal_status(user.id, now())
    })?;
    ok(status)
}
