// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process store backed by concurrent maps.
//!
//! Used for local development (`STORE_BACKEND=memory`) and tests. Data does
//! not survive a restart.

use crate::db::Store;
use crate::error::AppError;
use crate::models::{Hackathon, Membership, MembershipOutcome, Team, User};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryStore {
    hackathons: DashMap<Uuid, Hackathon>,
    teams: DashMap<Uuid, Team>,
    memberships: DashMap<(Uuid, Uuid), Membership>,
    users: DashMap<Uuid, User>,
    /// Normalized email -> user ID; the entry lock enforces uniqueness
    emails: DashMap<String, Uuid>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_hackathon(&self, hackathon: &Hackathon) -> Result<(), AppError> {
        self.hackathons.insert(hackathon.id, hackathon.clone());
        Ok(())
    }

    async fn get_hackathon(&self, id: Uuid) -> Result<Option<Hackathon>, AppError> {
        Ok(self.hackathons.get(&id).map(|h| h.clone()))
    }

    async fn list_hackathons(
        &self,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Hackathon>, AppError> {
        let mut all: Vec<Hackathon> = self.hackathons.iter().map(|h| h.clone()).collect();
        all.sort_by(|a, b| {
            a.start_date
                .cmp(&b.start_date)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(all.into_iter().skip(offset).take(limit).collect())
    }

    async fn get_team(&self, id: Uuid) -> Result<Option<Team>, AppError> {
        Ok(self.teams.get(&id).map(|t| t.clone()))
    }

    async fn teams_for_hackathon(&self, hackathon_id: Uuid) -> Result<Vec<Team>, AppError> {
        let mut teams: Vec<Team> = self
            .teams
            .iter()
            .filter(|t| t.hackathon_id == hackathon_id)
            .map(|t| t.clone())
            .collect();
        teams.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(teams)
    }

    async fn count_teams(&self, hackathon_id: Uuid) -> Result<u32, AppError> {
        Ok(self
            .teams
            .iter()
            .filter(|t| t.hackathon_id == hackathon_id)
            .count() as u32)
    }

    async fn create_team_with_member(
        &self,
        team: &Team,
        creator: &Membership,
    ) -> Result<(), AppError> {
        // Membership first: a team becomes visible only once its creator is in it.
        self.memberships
            .insert((creator.team_id, creator.user_id), creator.clone());
        self.teams.insert(team.id, team.clone());
        Ok(())
    }

    async fn add_membership(
        &self,
        membership: &Membership,
    ) -> Result<MembershipOutcome, AppError> {
        match self
            .memberships
            .entry((membership.team_id, membership.user_id))
        {
            Entry::Occupied(existing) => Ok(MembershipOutcome::Existing(existing.get().clone())),
            Entry::Vacant(slot) => {
                slot.insert(membership.clone());
                Ok(MembershipOutcome::Created(membership.clone()))
            }
        }
    }

    async fn members_of_team(&self, team_id: Uuid) -> Result<Vec<Membership>, AppError> {
        let mut members: Vec<Membership> = self
            .memberships
            .iter()
            .filter(|m| m.team_id == team_id)
            .map(|m| m.clone())
            .collect();
        members.sort_by(|a, b| {
            a.joined_at
                .cmp(&b.joined_at)
                .then_with(|| a.user_id.cmp(&b.user_id))
        });
        Ok(members)
    }

    async fn insert_user(&self, user: &User) -> Result<(), AppError> {
        match self.emails.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(AppError::Conflict(format!(
                "Email {} is already registered",
                user.email
            ))),
            Entry::Vacant(slot) => {
                self.users.insert(user.id, user.clone());
                slot.insert(user.id);
                Ok(())
            }
        }
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let Some(id) = self.emails.get(email).map(|id| *id) else {
            return Ok(None);
        };
        self.get_user(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn hackathon(name: &str, start_day: u32) -> Hackathon {
        let start = Utc.with_ymd_and_hms(2025, 1, start_day, 0, 0, 0).unwrap();
        Hackathon {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: "desc".to_string(),
            theme: "AI".to_string(),
            start_date: start,
            end_date: start + chrono::Duration::days(2),
            created_at: Utc::now(),
        }
    }

    fn user(email: &str) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Ada".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_list_orders_by_start_and_paginates() {
        let store = MemoryStore::new();
        for (name, day) in [("c", 20), ("a", 5), ("b", 12)] {
            store.insert_hackathon(&hackathon(name, day)).await.unwrap();
        }

        let names = |list: Vec<Hackathon>| list.into_iter().map(|h| h.name).collect::<Vec<_>>();

        assert_eq!(names(store.list_hackathons(0, 10).await.unwrap()), ["a", "b", "c"]);
        assert_eq!(names(store.list_hackathons(1, 1).await.unwrap()), ["b"]);
        assert!(store.list_hackathons(3, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_membership_is_idempotent() {
        let store = MemoryStore::new();
        let (team_id, user_id) = (Uuid::new_v4(), Uuid::new_v4());

        let first = Membership::new(team_id, user_id, Utc::now());
        let later = Membership::new(team_id, user_id, Utc::now() + chrono::Duration::hours(1));

        let created = store.add_membership(&first).await.unwrap();
        let again = store.add_membership(&later).await.unwrap();

        assert!(created.is_new());
        assert_eq!(again, MembershipOutcome::Existing(first));
        assert_eq!(store.members_of_team(team_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_insert_user_rejects_duplicate_email() {
        let store = MemoryStore::new();
        store.insert_user(&user("ada@example.com")).await.unwrap();

        let err = store.insert_user(&user("ada@example.com")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let found = store.get_user_by_email("ada@example.com").await.unwrap();
        assert!(found.is_some());
        assert!(store.get_user_by_email("bob@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_joins_store_one_membership() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let (team_id, user_id) = (Uuid::new_v4(), Uuid::new_v4());

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .add_membership(&Membership::new(team_id, user_id, Utc::now()))
                        .await
                        .unwrap()
                        .is_new()
                })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap() {
                created += 1;
            }
        }

        assert_eq!(created, 1);
        assert_eq!(store.members_of_team(team_id).await.unwrap().len(), 1);
    }
}
