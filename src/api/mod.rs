//! REST API
//!
//! Every route lives under `/api` and answers with the JSON envelope from
//! [`response`]. Handlers take the current user from the `x-user-id`
//! header and run one storage call each while holding the database lock.

pub mod auth;
pub mod extract;
pub mod goals;
pub mod groups;
pub mod notifications;
pub mod quiz;
pub mod response;
pub mod server;
pub mod sessions;
pub mod state;
pub mod users;
pub mod vocabulary;

use axum::extract::OriginalUri;
use axum::http::{Method, Uri};
use axum::routing::get;
use axum::Router;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};

pub use auth::{CurrentUser, USER_ID_HEADER};
pub use response::{ApiError, ApiResponse, ApiResult};
pub use server::serve;
pub use state::AppState;

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
}

async fn health() -> ApiResult<Health> {
    response::ok(Health { status: "ok" })
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}

async fn method_not_allowed(method: Method, OriginalUri(uri): OriginalUri) -> ApiError {
    ApiError::MethodNotAllowed(format!("{} is not allowed on {}", method, uri.path()))
}

/// Build the application router with all routes and layers
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        .merge(users::routes())
        .merge(vocabulary::routes())
        .merge(groups::routes())
        .merge(quiz::routes())
        .merge(sessions::routes())
        .merge(goals::routes())
        .merge(notifications::routes())
        .method_not_allowed_fallback(method_not_allowed);

    let mut app = Router::new()
        .nest("/api", api)
        .fallback(not_found)
        .with_state(state.clone());

    if state.config.cors_allow_any {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }
    app
}
