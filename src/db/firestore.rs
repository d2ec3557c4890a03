// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Hackathons
//! - Teams (created together with the creator's membership)
//! - Memberships (join collection keyed by team and user)
//! - Users (with an email reservation collection for uniqueness)

use crate::db::{collections, Store};
use crate::error::AppError;
use crate::models::{Hackathon, Membership, MembershipOutcome, Team, User};
use async_trait::async_trait;
use firestore::errors::FirestoreError;
use serde::{Deserialize, Serialize};
use std::future::Future;
use uuid::Uuid;

/// Reserves an email address for one user.
const USER_EMAILS: &str = "user_emails";

#[derive(Debug, Serialize, Deserialize)]
struct EmailClaim {
    user_id: Uuid,
}

/// Result row of a count aggregation.
#[derive(Debug, Deserialize)]
struct TeamCount {
    count: u32,
}

/// Document IDs may not contain `/`, which emails can.
fn email_doc_id(email: &str) -> String {
    urlencoding::encode(email).into_owned()
}

/// Finish a write that follows a successful reservation. If the write fails
/// the reservation is released, and the write error is returned.
async fn write_or_release<W, R>(write: W, release: R) -> Result<(), AppError>
where
    W: Future<Output = Result<(), AppError>>,
    R: Future<Output = Result<(), AppError>>,
{
    let Err(err) = write.await else {
        return Ok(());
    };

    if let Err(release_err) = release.await {
        tracing::error!(error = %release_err, "Failed to release reservation");
    }
    Err(err)
}

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create an offline client; every operation returns a database error.
    pub fn new_offline() -> Self {
        Self { client: None }
    }

    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    async fn get_membership(
        &self,
        team_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Membership>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::MEMBERSHIPS)
            .obj()
            .one(&Membership::doc_id(team_id, user_id))
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[async_trait]
impl Store for FirestoreDb {
    // ─── Hackathon Operations ────────────────────────────────────

    async fn insert_hackathon(&self, hackathon: &Hackathon) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::HACKATHONS)
            .document_id(hackathon.id.to_string())
            .object(hackathon)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    async fn get_hackathon(&self, id: Uuid) -> Result<Option<Hackathon>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::HACKATHONS)
            .obj()
            .one(&id.to_string())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn list_hackathons(
        &self,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Hackathon>, AppError> {
        let offset = u32::try_from(offset)
            .map_err(|_| AppError::BadRequest("Page offset too large".to_string()))?;
        let limit = u32::try_from(limit)
            .map_err(|_| AppError::BadRequest("Page limit too large".to_string()))?;

        self.get_client()?
            .fluent()
            .select()
            .from(collections::HACKATHONS)
            .order_by([
                ("start_date", firestore::FirestoreQueryDirection::Ascending),
                ("name", firestore::FirestoreQueryDirection::Ascending),
                ("id", firestore::FirestoreQueryDirection::Ascending),
            ])
            .limit(limit)
            .offset(offset)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Team Operations ─────────────────────────────────────────

    async fn get_team(&self, id: Uuid) -> Result<Option<Team>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::TEAMS)
            .obj()
            .one(&id.to_string())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn teams_for_hackathon(&self, hackathon_id: Uuid) -> Result<Vec<Team>, AppError> {
        let hackathon_id = hackathon_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::TEAMS)
            .filter(move |q| q.for_all([q.field("hackathon_id").eq(hackathon_id.clone())]))
            .order_by([("created_at", firestore::FirestoreQueryDirection::Ascending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Server-side count aggregation; no team documents are transferred.
    async fn count_teams(&self, hackathon_id: Uuid) -> Result<u32, AppError> {
        let hackathon_id = hackathon_id.to_string();
        let counts: Vec<TeamCount> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::TEAMS)
            .filter(move |q| q.for_all([q.field("hackathon_id").eq(hackathon_id.clone())]))
            .aggregate(|a| a.fields([a.field("count").count()]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(counts.first().map_or(0, |c| c.count))
    }

    /// Writes the team and the creator's membership in one transaction so a
    /// team is never visible without its creator.
    async fn create_team_with_member(
        &self,
        team: &Team,
        creator: &Membership,
    ) -> Result<(), AppError> {
        let client = self.get_client()?;

        let mut transaction = client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        client
            .fluent()
            .update()
            .in_col(collections::TEAMS)
            .document_id(team.id.to_string())
            .object(team)
            .add_to_transaction(&mut transaction)
            .map_err(|e| AppError::Database(format!("Failed to add team to transaction: {}", e)))?;

        client
            .fluent()
            .update()
            .in_col(collections::MEMBERSHIPS)
            .document_id(Membership::doc_id(creator.team_id, creator.user_id))
            .object(creator)
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add membership to transaction: {}", e))
            })?;

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Transaction commit failed: {}", e)))?;

        tracing::info!(
            team_id = %team.id,
            hackathon_id = %team.hackathon_id,
            "Team created atomically with creator membership"
        );

        Ok(())
    }

    // ─── Membership Operations ───────────────────────────────────

    /// Create-only write on the deterministic document ID: a concurrent
    /// duplicate fails with ALREADY_EXISTS instead of overwriting.
    async fn add_membership(
        &self,
        membership: &Membership,
    ) -> Result<MembershipOutcome, AppError> {
        let result: Result<Membership, FirestoreError> = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::MEMBERSHIPS)
            .document_id(Membership::doc_id(membership.team_id, membership.user_id))
            .object(membership)
            .execute()
            .await;

        match result {
            Ok(_) => Ok(MembershipOutcome::Created(membership.clone())),
            Err(FirestoreError::DataConflictError(_)) => {
                let existing = self
                    .get_membership(membership.team_id, membership.user_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::Database("Membership conflict but no document found".to_string())
                    })?;
                Ok(MembershipOutcome::Existing(existing))
            }
            Err(e) => Err(AppError::Database(e.to_string())),
        }
    }

    async fn members_of_team(&self, team_id: Uuid) -> Result<Vec<Membership>, AppError> {
        let team_id = team_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::MEMBERSHIPS)
            .filter(move |q| q.for_all([q.field("team_id").eq(team_id.clone())]))
            .order_by([("joined_at", firestore::FirestoreQueryDirection::Ascending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    async fn insert_user(&self, user: &User) -> Result<(), AppError> {
        let client = self.get_client()?;

        // Reserve the email first; ALREADY_EXISTS means it is taken.
        let claim: Result<EmailClaim, FirestoreError> = client
            .fluent()
            .insert()
            .into(USER_EMAILS)
            .document_id(email_doc_id(&user.email))
            .object(&EmailClaim { user_id: user.id })
            .execute()
            .await;

        match claim {
            Ok(_) => {}
            Err(FirestoreError::DataConflictError(_)) => {
                return Err(AppError::Conflict(format!(
                    "Email {} is already registered",
                    user.email
                )));
            }
            Err(e) => return Err(AppError::Database(e.to_string())),
        }

        let write = async {
            let _: () = client
                .fluent()
                .update()
                .in_col(collections::USERS)
                .document_id(user.id.to_string())
                .object(user)
                .execute()
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            Ok::<(), AppError>(())
        };
        let release = async {
            client
                .fluent()
                .delete()
                .from(USER_EMAILS)
                .document_id(email_doc_id(&user.email))
                .execute()
                .await
                .map_err(|e| AppError::Database(e.to_string()))
        };

        write_or_release(write, release).await.inspect_err(|_| {
            tracing::error!(user_id = %user.id, "User write failed after email reservation");
        })
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(&id.to_string())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let claim: Option<EmailClaim> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(USER_EMAILS)
            .obj()
            .one(&email_doc_id(email))
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        match claim {
            Some(claim) => self.get_user(claim.user_id).await,
            None => Ok(None),
        }
    }
}
