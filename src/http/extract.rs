use axum::extract::{FromRequest, FromRequestParts};

use crate::http::AppError;

/// JSON body whose rejections render as `AppError` (400 with a field breakdown).
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Path parameters whose rejections render as `AppError` (404).
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);
