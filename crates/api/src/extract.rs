//! Extractors whose rejections answer with the API's JSON error body
//! instead of axum's plain-text one.

use axum::extract::FromRequestParts;

use crate::middleware::error_handling::AppError;

/// `Path` that turns a malformed segment into a `400` validation error.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// `Query` with the same rejection handling as [`ApiPath`].
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);
