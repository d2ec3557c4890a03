// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account routes: register, login, logout and the current profile.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::sync::Arc;

use crate::error::Result;
use crate::middleware::auth::{AuthUser, SESSION_COOKIE, SESSION_TTL_SECS};
use crate::routes::JsonBody;
use crate::services::accounts::{LoginRequest, RegisterRequest, Session, UserProfile};
use crate::AppState;

pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new().route("/auth/me", get(me))
}

/// Session cookie for browser clients. Marked `Secure` whenever the
/// frontend is served over https.
fn session_cookie(token: String, frontend_url: &str) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(frontend_url.starts_with("https://"))
        .max_age(time::Duration::seconds(SESSION_TTL_SECS as i64))
        .build()
}

async fn register(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    JsonBody(input): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, CookieJar, Json<Session>)> {
    let session = state.accounts.register(input).await?;
    let jar = jar.add(session_cookie(
        session.token.clone(),
        &state.config.frontend_url,
    ));

    Ok((StatusCode::CREATED, jar, Json(session)))
}

async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    JsonBody(input): JsonBody<LoginRequest>,
) -> Result<(CookieJar, Json<Session>)> {
    let session = state.accounts.login(input).await?;
    let jar = jar.add(session_cookie(
        session.token.clone(),
        &state.config.frontend_url,
    ));

    Ok((jar, Json(session)))
}

/// Tokens are stateless; logging out only clears the browser cookie.
///
/// The removal cookie is always sent, even when the request carried none.
async fn logout(jar: CookieJar) -> (StatusCode, CookieJar) {
    let mut removal = Cookie::build(SESSION_COOKIE).path("/").build();
    removal.make_removal();
    (StatusCode::NO_CONTENT, jar.add(removal))
}

async fn me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserProfile>> {
    Ok(Json(state.accounts.profile(user.user_id).await?))
}
