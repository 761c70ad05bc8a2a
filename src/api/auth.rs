//! Request authentication by the `x-user-id` header

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use super::response::ApiError;
use super::state::AppState;
use crate::users::User;

pub const USER_ID_HEADER: &str = "x-user-id";

/// The user making the request
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| ApiError::Unauthorized(format!("Missing {} header", USER_ID_HEADER)))?;
        let id = header
            .to_str()
            .ok()
            .and_then(|value| Uuid::parse_str(value.trim()).ok())
            .ok_or_else(|| ApiError::Unauthorized(format!("Malformed {} header", USER_ID_HEADER)))?;

        let user = state
            .with_db(|db| db.find_user(id))?
            .ok_or_else(|| ApiError::Unauthorized("Unknown user".to_string()))?;
        Ok(CurrentUser(user))
    }
}
