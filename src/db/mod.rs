// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer.
//!
//! [`Store`] is the persistence seam. [`FirestoreDb`] backs production and
//! [`MemoryStore`] backs local development and tests.

pub mod firestore;
pub mod memory;

pub use self::firestore::FirestoreDb;
pub use memory::MemoryStore;

use crate::error::AppError;
use crate::models::{Hackathon, Membership, MembershipOutcome, Team, User};
use async_trait::async_trait;
use uuid::Uuid;

/// Collection names as constants.
pub mod collections {
    pub const HACKATHONS: &str = "hackathons";
    pub const TEAMS: &str = "teams";
    /// Team membership join records, keyed by `{team_id}_{user_id}`
    pub const MEMBERSHIPS: &str = "memberships";
    pub const USERS: &str = "users";
}

/// Typed persistence operations used by the services.
#[async_trait]
pub trait Store: Send + Sync {
    // ─── Hackathons ──────────────────────────────────────────────

    async fn insert_hackathon(&self, hackathon: &Hackathon) -> Result<(), AppError>;

    async fn get_hackathon(&self, id: Uuid) -> Result<Option<Hackathon>, AppError>;

    /// Hackathons ordered by start date ascending (then name, then id).
    async fn list_hackathons(&self, offset: usize, limit: usize)
        -> Result<Vec<Hackathon>, AppError>;

    // ─── Teams ───────────────────────────────────────────────────

    async fn get_team(&self, id: Uuid) -> Result<Option<Team>, AppError>;

    /// Teams of a hackathon, oldest first.
    async fn teams_for_hackathon(&self, hackathon_id: Uuid) -> Result<Vec<Team>, AppError>;

    async fn count_teams(&self, hackathon_id: Uuid) -> Result<u32, AppError>;

    /// Store a team together with its creator's membership, atomically.
    async fn create_team_with_member(
        &self,
        team: &Team,
        creator: &Membership,
    ) -> Result<(), AppError>;

    // ─── Memberships ─────────────────────────────────────────────

    /// Add a membership unless the (team, user) pair already exists.
    async fn add_membership(&self, membership: &Membership)
        -> Result<MembershipOutcome, AppError>;

    /// Memberships of a team, in join order.
    async fn members_of_team(&self, team_id: Uuid) -> Result<Vec<Membership>, AppError>;

    // ─── Users ───────────────────────────────────────────────────

    /// Insert a new user. Fails with [`AppError::Conflict`] if the email is taken.
    async fn insert_user(&self, user: &User) -> Result<(), AppError>;

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, AppError>;

    /// Look up by normalized (lowercased) email.
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
}
