//! HTTP handlers for vocabulary groups

use axum::extract::State;
use axum::routing::{get, post, put};
use axum::Router;
use uuid::Uuid;

use super::auth::CurrentUser;
use super::extract::{Json, Path};
use super::response::{created, ok, ApiResult, CreatedResult};
use super::state::AppState;
use crate::groups::{
    CreateGroupRequest, GroupDetail, SetGroupVocabularyRequest, UpdateGroupRequest,
    VocabularyGroup,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/groups", get(list_groups).post(create_group))
        .route(
            "/groups/{id}",
            get(get_group).put(update_group).delete(delete_group),
        )
        .route("/groups/{id}/vocabulary", put(set_group_vocabulary))
        .route(
            "/groups/{id}/vocabulary/{vocabulary_id}",
            post(add_to_group).delete(remove_from_group),
        )
}

async fn list_groups(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Vec<VocabularyGroup>> {
    ok(state.with_db(|db| db.list_groups(user.id))?)
}

async fn create_group(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CreateGroupRequest>,
) -> CreatedResult<VocabularyGroup> {
    created(state.with_db(|db| db.create_group(user.id, request))?)
}

async fn get_group(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<GroupDetail> {
    ok(state.with_db(|db| db.get_group(user.id, id))?)
}

async fn update_group(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(updates): Json<UpdateGroupRequest>,
) -> ApiResult<VocabularyGroup> {
    ok(state.with_db(|db| db.update_group(user.id, id, updates))?)
}

async fn delete_group(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    state.with_db(|db| db.delete_group(user.id, id))?;
    ok(())
}

/// Replace the whole membership after a drag-and-drop reorder
async fn set_group_vocabulary(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<SetGroupVocabularyRequest>,
) -> ApiResult<GroupDetail> {
    ok(state.with_db(|db| db.set_group_vocabulary(user.id, id, &request.vocabulary_ids))?)
}

async fn add_to_group(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((id, vocabulary_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<GroupDetail> {
    ok(state.with_db(|db| db.add_to_group(user.id, id, vocabulary_id))?)
}

async fn remove_from_group(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((id, vocabulary_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<GroupDetail> {
    ok(state.with_db(|db| db.remove_from_group(user.id, id, vocabulary_id))?)
}
