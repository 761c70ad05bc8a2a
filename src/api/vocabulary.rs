//! HTTP handlers for vocabulary items, reviews and example sentences

use axum::extract::State;
use axum::routing::{get, post, put};
use axum::Router;
use serde::Deserialize;
use uuid::Uuid;

use super::auth::CurrentUser;
use super::extract::{Json, Path, Query};
use super::response::{created, ok, ApiResult, CreatedResult};
use super::state::AppState;
use crate::sentences::{CreateSentenceRequest, ExampleSentence, UpdateSentenceRequest};
use crate::srs::{ReviewOutcome, ReviewRequest};
use crate::storage::now;
use crate::vocabulary::{
    CreateVocabularyRequest, DueVocabulary, UpdateVocabularyRequest, VocabularyDetail,
    VocabularyItem, VocabularyPage, VocabularyQuery,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/vocabulary", get(list_vocabulary).post(create_vocabulary))
        .route("/vocabulary/due", get(due_vocabulary))
        .route(
            "/vocabulary/{id}",
            get(get_vocabulary)
                .put(update_vocabulary)
                .delete(delete_vocabulary),
        )
        .route("/vocabulary/{id}/review", post(review_vocabulary))
        .route(
            "/vocabulary/{id}/sentences",
            get(list_sentences).post(create_sentence),
        )
        .route(
            "/vocabulary/{id}/sentences/{sentence_id}",
            put(update_sentence).delete(delete_sentence),
        )
}

#[derive(Debug, Default, Deserialize)]
struct DueQuery {
    limit: Option<usize>,
}

/// One page of the infinite-scroll list
async fn list_vocabulary(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<VocabularyQuery>,
) -> ApiResult<VocabularyPage> {
    let limit = state.config.page_size(query.limit);
    ok(state.with_db(|db| db.list_vocabulary(user.id, &query, limit))?)
}

async fn create_vocabulary(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CreateVocabularyRequest>,
) -> CreatedResult<VocabularyItem> {
    created(state.with_db(|db| db.create_vocabulary(user.id, request))?)
}

/// Items due for review now
async fn due_vocabulary(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<DueQuery>,
) -> ApiResult<DueVocabulary> {
    let limit = state.config.page_size(query.limit);
    ok(state.with_db(|db| db.due_vocabulary(user.id, limit, now()))?)
}

async fn get_vocabulary(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<VocabularyDetail> {
    ok(state.with_db(|db| db.get_vocabulary(user.id, id))?)
}

async fn update_vocabulary(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(updates): Json<UpdateVocabularyRequest>,
) -> ApiResult<VocabularyItem> {
    ok(state.with_db(|db| db.update_vocabulary(user.id, id, updates))?)
}

async fn delete_vocabulary(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    state.with_db(|db| db.delete_vocabulary(user.id, id))?;
    ok(())
}

/// Grade a recall attempt and reschedule the item
async fn review_vocabulary(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<ReviewRequest>,
) -> ApiResult<ReviewOutcome> {
    ok(state.with_db(|db| db.review_vocabulary(user.id, id, request.quality))?)
}

async fn list_sentences(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Vec<ExampleSentence>> {
    ok(state.with_db(|db| db.list_sentences(user.id, id))?)
}

async fn create_sentence(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<CreateSentenceRequest>,
) -> CreatedResult<ExampleSentence> {
    created(state.with_db(|db| db.create_sentence(user.id, id, request))?)
}

async fn update_sentence(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((id, sentence_id)): Path<(Uuid, Uuid)>,
    Json(updates): Json<UpdateSentenceRequest>,
) -> ApiResult<ExampleSentence> {
    ok(state.with_db(|db| db.update_sentence(user.id, id, sentence_id, updates))?)
}

async fn delete_sentence(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((id, sentence_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<()> {
    state.with_db(|db| db.delete_sentence(user.id, id, sentence_id))?;
    ok(())
}
