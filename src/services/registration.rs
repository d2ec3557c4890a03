// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Team registration service.
//!
//! Handles the team workflow for an authenticated user:
//! 1. Create a team under a hackathon (the creator joins it in the same write)
//! 2. Join an existing team (idempotent per user and team)
//!
//! A user may belong to several teams of the same hackathon.

use crate::db::Store;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Membership, Team, User};
use crate::services::directory::{parse_id, team_with_members, TeamWithMembers};
use crate::services::validate::not_blank;
use crate::time_utils::format_utc_rfc3339;
use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;
use validator::Validate;

pub const MAX_TEAM_NAME_LEN: u64 = 100;

/// Body of `POST /teams/create`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct NewTeam {
    #[validate(
        custom(function = "not_blank", message = "Team name is required"),
        length(max = 100, message = "Team name must be at most 100 characters")
    )]
    pub name: String,
    #[validate(custom(function = "not_blank", message = "Hackathon ID is required"))]
    #[serde(deserialize_with = "id_text")]
    pub hackathon_id: String,
}

/// Accept an id as a JSON string or number. Numbers are never valid ids, but
/// they should fail the same lookup as any other unknown id.
fn id_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MembershipView {
    pub team_id: Uuid,
    pub user_id: Uuid,
    pub joined_at: String,
}

impl From<&Membership> for MembershipView {
    fn from(m: &Membership) -> Self {
        Self {
            team_id: m.team_id,
            user_id: m.user_id,
            joined_at: format_utc_rfc3339(m.joined_at),
        }
    }
}

/// Result of a join request.
#[derive(Debug, Clone)]
pub struct JoinResult {
    pub membership: MembershipView,
    /// True if the user was already a member and nothing was written.
    pub already_member: bool,
    pub team: TeamWithMembers,
}

/// Service for creating and joining teams.
#[derive(Clone)]
pub struct TeamRegistration {
    store: Arc<dyn Store>,
}

impl TeamRegistration {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// The session must still map to a stored account.
    async fn requester(&self, auth: &AuthUser) -> Result<User> {
        self.store.get_user(auth.user_id).await?.ok_or_else(|| {
            tracing::warn!(user_id = %auth.user_id, "Token for unknown user");
            AppError::Unauthorized
        })
    }

    /// Create a team in a hackathon with the requester as its first member.
    pub async fn create_team(&self, auth: &AuthUser, input: NewTeam) -> Result<TeamWithMembers> {
        let user = self.requester(auth).await?;
        input.validate()?;

        let hackathon_id = parse_id("Hackathon", &input.hackathon_id)?;
        let hackathon = self
            .store
            .get_hackathon(hackathon_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Hackathon {} not found", hackathon_id)))?;

        let now = Utc::now();
        let team = Team {
            id: Uuid::new_v4(),
            name: input.name.trim().to_string(),
            hackathon_id: hackathon.id,
            created_by: user.id,
            created_at: now,
        };
        let creator = Membership::new(team.id, user.id, now);

        self.store.create_team_with_member(&team, &creator).await?;

        tracing::info!(
            team_id = %team.id,
            hackathon_id = %hackathon.id,
            user_id = %user.id,
            "Team created"
        );

        team_with_members(self.store.as_ref(), team).await
    }

    /// Add the requester to a team. Joining twice is a no-op.
    pub async fn join_team(&self, auth: &AuthUser, team_id: &str) -> Result<JoinResult> {
        let user = self.requester(auth).await?;

        let team_id = parse_id("Team", team_id)?;
        let team = self
            .store
            .get_team(team_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Team {} not found", team_id)))?;

        let outcome = self
            .store
            .add_membership(&Membership::new(team.id, user.id, Utc::now()))
            .await?;
        let already_member = !outcome.is_new();

        if already_member {
            tracing::debug!(team_id = %team.id, user_id = %user.id, "Already a member");
        } else {
            tracing::info!(team_id = %team.id, user_id = %user.id, "User joined team");
        }

        let membership = MembershipView::from(outcome.membership());
        let team = team_with_members(self.store.as_ref(), team).await?;

        Ok(JoinResult {
            membership,
            already_member,
            team,
        })
    }
}
