// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin key middleware for directory writes.

use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Header carrying the admin key.
pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

/// Require `X-Admin-Key` to match the configured key.
///
/// With no key configured every request passes.
pub async fn require_admin_key(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(expected) = state.config.admin_api_key.as_deref() else {
        return Ok(next.run(request).await);
    };

    let provided = request
        .headers()
        .get(ADMIN_KEY_HEADER)
        .map(|h| h.as_bytes())
        .unwrap_or_default();

    if !bool::from(provided.ct_eq(expected.as_bytes())) {
        tracing::warn!(
            path = %request.uri().path(),
            present = !provided.is_empty(),
            "Blocked admin request with invalid key"
        );
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(request).await)
}
