// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HackTrack: hackathon directory and team registration
//!
//! This crate provides the backend API for listing hackathons, creating
//! teams under them and joining those teams.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::Store;
use services::{AccountService, HackathonDirectory, TeamRegistration};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Arc<dyn Store>,
    pub directory: HackathonDirectory,
    pub registration: TeamRegistration,
    pub accounts: AccountService,
}

impl AppState {
    /// Wire the services to one store.
    pub fn new(config: Config, db: Arc<dyn Store>) -> Self {
        Self {
            directory: HackathonDirectory::new(db.clone()),
            registration: TeamRegistration::new(db.clone()),
            accounts: AccountService::new(db.clone(), &config.jwt_signing_key),
            config,
            db,
        }
    }
}
