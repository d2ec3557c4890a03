// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Hackathon directory routes.

use crate::error::Result;
use crate::routes::{JsonBody, QueryParams};
use crate::services::directory::{
    parse_id, HackathonDetail, HackathonSummary, HackathonView, NewHackathon, Pagination,
};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Directory routes. Listing and detail are public; creation is guarded by
/// the admin key when one is configured.
pub fn routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let create = post(create_hackathon).route_layer(middleware::from_fn_with_state(
        state,
        crate::middleware::require_admin_key,
    ));

    Router::new()
        .route("/hackathons", get(list_hackathons).merge(create))
        .route("/hackathons/{id}", get(get_hackathon))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CreateHackathonResponse {
    pub message: String,
    pub hackathon: HackathonView,
}

/// Create a hackathon.
async fn create_hackathon(
    State(state): State<Arc<AppState>>,
    JsonBody(input): JsonBody<NewHackathon>,
) -> Result<(StatusCode, Json<CreateHackathonResponse>)> {
    let hackathon = state.directory.create_hackathon(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateHackathonResponse {
            message: "Hackathon created successfully".to_string(),
            hackathon: HackathonView::new(&hackathon, Utc::now()),
        }),
    ))
}

/// Raw pagination parameters; parsed by [`Pagination::parse`] so bad values
/// produce field errors.
#[derive(Deserialize)]
struct ListQuery {
    page: Option<String>,
    limit: Option<String>,
}

/// List hackathons by ascending start date.
async fn list_hackathons(
    State(state): State<Arc<AppState>>,
    QueryParams(params): QueryParams<ListQuery>,
) -> Result<Json<Vec<HackathonSummary>>> {
    let page = Pagination::parse(params.page.as_deref(), params.limit.as_deref())?;

    tracing::debug!(page = page.page, limit = page.limit, "Listing hackathons");

    Ok(Json(state.directory.list_hackathons(page).await?))
}

/// Hackathon detail with teams and members.
async fn get_hackathon(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<HackathonDetail>> {
    let id = parse_id("Hackathon", &id)?;
    Ok(Json(state.directory.get_hackathon(id).await?))
}
