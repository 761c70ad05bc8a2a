//! HTTP handlers for users

use axum::extract::State;
use axum::routing::{get, post};
use axum::Router;

use super::auth::CurrentUser;
use super::extract::Json;
use super::response::{created, ok, ApiResult, CreatedResult};
use super::state::AppState;
use crate::users::{CreateUserRequest, User};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user))
        .route("/users/me", get(current_user))
}

/// Register a user; the only write that needs no `x-user-id`
async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> CreatedResult<User> {
    let user = state.with_db(|db| db.create_user(&request.email, request.name))?;
    log::info!("Created user {}", user.id);
    created(user)
}

async fn current_user(CurrentUser(user): CurrentUser) -> ApiResult<User> {
    ok(user)
}
