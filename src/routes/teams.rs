// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Team registration routes (require authentication via JWT).
//! The auth middleware is applied in routes/mod.rs for these routes.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::routes::JsonBody;
use crate::services::directory::TeamWithMembers;
use crate::services::registration::{MembershipView, NewTeam};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::post,
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/teams/create", post(create_team))
        .route("/teams/join/{team_id}", post(join_team))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CreateTeamResponse {
    pub message: String,
    pub team: TeamWithMembers,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct JoinTeamResponse {
    pub message: String,
    pub membership: MembershipView,
    pub already_member: bool,
    pub team: TeamWithMembers,
}

/// Create a team; the requester becomes its first member.
async fn create_team(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    JsonBody(input): JsonBody<NewTeam>,
) -> Result<(StatusCode, Json<CreateTeamResponse>)> {
    let team = state.registration.create_team(&user, input).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateTeamResponse {
            message: "Team created successfully".to_string(),
            team,
        }),
    ))
}

/// Join a team. Repeating the call is harmless.
async fn join_team(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(team_id): Path<String>,
) -> Result<Json<JoinTeamResponse>> {
    let result = state.registration.join_team(&user, &team_id).await?;

    let message = if result.already_member {
        "Already a member of this team"
    } else {
        "Joined team successfully"
    };

    Ok(Json(JoinTeamResponse {
        message: message.to_string(),
        membership: result.membership,
        already_member: result.already_member,
        team: result.team,
    }))
}
