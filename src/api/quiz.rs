//! HTTP handlers for quiz generation and answer checking

use axum::extract::State;
use axum::routing::{get, post};
use axum::Router;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::auth::CurrentUser;
use super::extract::{Json, Query};
use super::response::{ok, ApiResult};
use super::state::AppState;
use crate::quiz::{
    build_listening_quiz, build_matching_round, build_multiple_choice_quiz, check_answer,
    CheckAnswerRequest, CheckResult, ListeningQuery, ListeningQuestion, MatchingQuery,
    MatchingRound, MultipleChoiceQuery, MultipleChoiceQuestion, DEFAULT_OPTION_COUNT,
    DEFAULT_PAIR_COUNT, DEFAULT_QUESTION_COUNT, MAX_OPTION_COUNT, MAX_PAIR_COUNT,
    MAX_QUESTION_COUNT, MIN_OPTION_COUNT, MIN_QUIZ_ITEMS,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/quiz/multiple-choice", get(multiple_choice))
        .route("/quiz/matching", get(matching))
        .route("/quiz/listening", get(listening))
        .route("/quiz/check", post(check))
}

fn question_count(requested: Option<usize>) -> usize {
    requested
        .unwrap_or(DEFAULT_QUESTION_COUNT)
        .clamp(1, MAX_QUESTION_COUNT)
}

async fn multiple_choice(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<MultipleChoiceQuery>,
) -> ApiResult<Vec<MultipleChoiceQuestion>> {
    let items = state.with_db(|db| db.all_vocabulary(user.id, query.group_id))?;
    let option_count = query
        .option_count
        .unwrap_or(DEFAULT_OPTION_COUNT)
        .clamp(MIN_OPTION_COUNT, MAX_OPTION_COUNT);

    let mut rng = StdRng::from_entropy();
    let questions = build_multiple_choice_quiz(
        &items,
        question_count(query.count),
        query.direction.unwrap_or_default(),
        option_count,
        &mut rng,
    )?;
    ok(questions)
}

async fn matching(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<MatchingQuery>,
) -> ApiResult<MatchingRound> {
    let items = state.with_db(|db| db.all_vocabulary(user.id, query.group_id))?;
    let pairs = query
        .pairs
        .unwrap_or(DEFAULT_PAIR_COUNT)
        .clamp(MIN_QUIZ_ITEMS, MAX_PAIR_COUNT);

    let mut rng = StdRng::from_entropy();
    ok(build_matching_round(&items, pairs, &mut rng)?)
}

async fn listening(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<ListeningQuery>,
) -> ApiResult<Vec<ListeningQuestion>> {
    let items = state.with_db(|db| db.all_vocabulary(user.id, query.group_id))?;

    let mut rng = StdRng::from_entropy();
    ok(build_listening_quiz(
        &items,
        question_count(query.count),
        DEFAULT_OPTION_COUNT,
        &mut rng,
    )?)
}

/// Check a typed answer against the stored item
async fn check(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CheckAnswerRequest>,
) -> ApiResult<CheckResult> {
    let detail = state.with_db(|db| db.get_vocabulary(user.id, request.vocabulary_id))?;
    ok(check_answer(&detail.item, request.mode, &request.answer))
}
