//! Extractors whose rejections use the JSON error envelope

use axum::extract::{FromRequest, FromRequestParts};

use super::response::ApiError;

/// JSON body; malformed input becomes a 400 `BAD_REQUEST`
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct Json<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct Query<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct Path<T>(pub T);
