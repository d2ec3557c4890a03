// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Team and membership models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A team registered under one hackathon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    /// Team ID (also used as document ID)
    pub id: Uuid,
    pub name: String,
    /// Owning hackathon
    pub hackathon_id: Uuid,
    /// User who created the team (and its first member)
    pub created_by: Uuid,
    #[serde(with = "firestore::serialize_as_timestamp")]
    pub created_at: DateTime<Utc>,
}

/// A user's membership in a team.
///
/// Stored once per (team, user) pair; see [`Membership::doc_id`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Membership {
    pub team_id: Uuid,
    pub user_id: Uuid,
    #[serde(with = "firestore::serialize_as_timestamp")]
    pub joined_at: DateTime<Utc>,
}

impl Membership {
    pub fn new(team_id: Uuid, user_id: Uuid, joined_at: DateTime<Utc>) -> Self {
        Self {
            team_id,
            user_id,
            joined_at,
        }
    }

    /// Deterministic document ID, so a pair can only be stored once.
    pub fn doc_id(team_id: Uuid, user_id: Uuid) -> String {
        format!("{}_{}", team_id, user_id)
    }
}

/// Result of adding a membership.
#[derive(Debug, Clone, PartialEq)]
pub enum MembershipOutcome {
    /// A new membership was written.
    Created(Membership),
    /// The pair already existed; nothing was written.
    Existing(Membership),
}

impl MembershipOutcome {
    pub fn membership(&self) -> &Membership {
        match self {
            MembershipOutcome::Created(m) | MembershipOutcome::Existing(m) => m,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, MembershipOutcome::Created(_))
    }
}
