// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account registration and login.
//!
//! Issues the session token consumed by the auth middleware.

use crate::db::Store;
use crate::error::{AppError, Result};
use crate::middleware::auth::create_jwt;
use crate::models::user::normalize_email;
use crate::models::User;
use crate::services::password::{hash_password, verify_password};
use crate::services::validate::not_blank;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;
use validator::Validate;

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct RegisterRequest {
    #[validate(custom(function = "not_blank", message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LoginRequest {
    #[validate(custom(function = "not_blank", message = "Email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Public view of an account.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// A signed session and the account it belongs to.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Session {
    pub token: String,
    pub user: UserProfile,
}

/// Service for account creation and credential checks.
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn Store>,
    signing_key: Arc<[u8]>,
}

impl AccountService {
    pub fn new(store: Arc<dyn Store>, signing_key: &[u8]) -> Self {
        Self {
            store,
            signing_key: Arc::from(signing_key),
        }
    }

    fn session_for(&self, user: &User) -> Result<Session> {
        Ok(Session {
            token: create_jwt(user.id, &self.signing_key)?,
            user: UserProfile::from(user),
        })
    }

    /// Create an account and sign it in.
    pub async fn register(&self, input: RegisterRequest) -> Result<Session> {
        input.validate()?;

        let user = User {
            id: Uuid::new_v4(),
            name: input.name.trim().to_string(),
            email: normalize_email(&input.email),
            password_hash: hash_password(input.password).await?,
            created_at: Utc::now(),
        };

        self.store.insert_user(&user).await?;
        tracing::info!(user_id = %user.id, "User registered");

        self.session_for(&user)
    }

    /// Check credentials. Unknown email and wrong password fail the same way.
    pub async fn login(&self, input: LoginRequest) -> Result<Session> {
        input.validate()?;

        let email = normalize_email(&input.email);
        let Some(user) = self.store.get_user_by_email(&email).await? else {
            tracing::debug!("Login for unknown email");
            return Err(AppError::InvalidCredentials);
        };

        if !verify_password(input.password, user.password_hash.clone()).await? {
            tracing::debug!(user_id = %user.id, "Login with wrong password");
            return Err(AppError::InvalidCredentials);
        }

        tracing::info!(user_id = %user.id, "User logged in");
        self.session_for(&user)
    }

    /// Profile of the signed-in user. A token for a vanished account is
    /// treated as unauthenticated.
    pub async fn profile(&self, user_id: Uuid) -> Result<UserProfile> {
        self.store
            .get_user(user_id)
            .await?
            .map(|u| UserProfile::from(&u))
            .ok_or(AppError::Unauthorized)
    }
}
