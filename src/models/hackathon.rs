// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Hackathon model and its time-derived status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;

/// Hackathon record stored in Firestore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hackathon {
    /// Hackathon ID (also used as document ID)
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub theme: String,
    #[serde(with = "firestore::serialize_as_timestamp")]
    pub start_date: DateTime<Utc>,
    #[serde(with = "firestore::serialize_as_timestamp")]
    pub end_date: DateTime<Utc>,
    #[serde(with = "firestore::serialize_as_timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Hackathon {
    /// Status relative to `now`.
    pub fn status_at(&self, now: DateTime<Utc>) -> HackathonStatus {
        HackathonStatus::at(now, self.start_date, self.end_date)
    }
}

/// Where a hackathon sits relative to the current time.
///
/// Never persisted; computed on every read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum HackathonStatus {
    Upcoming,
    Ongoing,
    Past,
}

impl HackathonStatus {
    pub fn at(now: DateTime<Utc>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        if end < now {
            HackathonStatus::Past
        } else if start <= now {
            HackathonStatus::Ongoing
        } else {
            HackathonStatus::Upcoming
        }
    }
}
