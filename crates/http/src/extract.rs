//! Request extractors whose rejections use the `AppError` envelope.

use axum::extract::FromRequest;

use crate::error::AppError;

/// `axum::Json` with body failures reported as `AppError`
#[derive(Debug, Clone, Copy, Default, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);
