//! HTTP handlers for study sessions and progress statistics

use axum::extract::State;
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use uuid::Uuid;

use super::auth::CurrentUser;
use super::extract::{Json, Path, Query};
use super::response::{created, ok, ApiResult, CreatedResult};
use super::state::AppState;
use crate::progress::{
    DailyProgress, HistoryQuery, ProgressStats, RecordAnswerRequest, SessionAnswer,
    StartSessionRequest, StudySession,
};
use crate::storage::now;

const DEFAULT_SESSION_LIST: usize = 20;
const MAX_SESSION_LIST: usize = 100;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sessions", get(list_sessions).post(start_session))
        .route("/sessions/{id}", get(get_session))
        .route("/sessions/{id}/answers", post(record_answer))
        .route("/sessions/{id}/complete", post(complete_session))
        .route("/progress/stats", get(progress_stats))
        .route("/progress/history", get(progress_history))
}

#[derive(Debug, Default, Deserialize)]
struct SessionListQuery {
    limit: Option<usize>,
}

async fn list_sessions(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<SessionListQuery>,
) -> ApiResult<Vec<StudySession>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_SESSION_LIST)
        .clamp(1, MAX_SESSION_LIST);
    ok(state.with_db(|db| db.list_sessions(user.id, limit))?)
}

async fn start_session(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<StartSessionRequest>,
) -> CreatedResult<StudySession> {
    created(state.with_db(|db| db.start_session(user.id, request))?)
}

async fn get_session(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StudySession> {
    ok(state.with_db(|db| db.get_session(user.id, id))?)
}

async fn record_answer(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<RecordAnswerRequest>,
) -> ApiResult<SessionAnswer> {
    ok(state.with_db(|db| db.record_answer(user.id, id, request))?)
}

async fn complete_session(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StudySession> {
    ok(state.with_db(|db| db.complete_session(user.id, id))?)
}

async fn progress_stats(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<ProgressStats> {
    ok(state.with_db(|db| db.progress_stats(user.id, now()))?)
}

/// Daily activity, oldest day first
async fn progress_history(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Vec<DailyProgress>> {
    let days = query.days()?;
    ok(state.with_db(|db| db.progress_history(user.id, days, now()))?)
}
