//! HTTP handlers for notifications and reminder preferences

use axum::extract::State;
use axum::routing::{delete, get, post, put};
use axum::Router;
use uuid::Uuid;

use super::auth::CurrentUser;
use super::extract::{Json, Path, Query};
use super::response::{ok, ApiResult};
use super::state::AppState;
use crate::notifications::{
    MarkAllReadResult, Notification, NotificationPreferences, NotificationQuery,
    UpdatePreferencesRequest,
};
use crate::storage::now;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(list_notifications))
        .route("/notifications/read-all", put(mark_all_read))
        .route(
            "/notifications/preferences",
            get(get_preferences).put(update_preferences),
        )
        .route("/notifications/due-reminder", post(due_reminder))
        .route("/notifications/{id}/read", put(mark_read))
        .route("/notifications/{id}", delete(delete_notification))
}

async fn list_notifications(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<NotificationQuery>,
) -> ApiResult<Vec<Notification>> {
    ok(state.with_db(|db| db.list_notifications(user.id, query.unread_only))?)
}

async fn mark_read(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Notification> {
    ok(state.with_db(|db| db.mark_notification_read(user.id, id))?)
}

async fn mark_all_read(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<MarkAllReadResult> {
    let updated = state.with_db(|db| db.mark_all_notifications_read(user.id))?;
    ok(MarkAllReadResult { updated })
}

async fn delete_notification(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    state.with_db(|db| db.delete_notification(user.id, id))?;
    ok(())
}

async fn get_preferences(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<NotificationPreferences> {
    ok(state.with_db(|db| db.get_notification_preferences(user.id))?)
}

async fn update_preferences(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(updates): Json<UpdatePreferencesRequest>,
) -> ApiResult<NotificationPreferences> {
    ok(state.with_db(|db| db.upsert_notification_preferences(user.id, updates))?)
}

/// Record a due-review reminder; `data` is `null` when none was needed
async fn due_reminder(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Option<Notification>> {
    ok(state.with_db(|db| db.create_due_reminder(user.id, now()))?)
}
