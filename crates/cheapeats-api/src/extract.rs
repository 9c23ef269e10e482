//! Extractors whose rejections render as [`ApiError`] JSON bodies.

use axum::extract::FromRequestParts;

use crate::error::ApiError;

/// [`axum::extract::Query`] with a JSON `400` on malformed parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// [`axum::extract::Path`] with a JSON `400` on malformed segments.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);
