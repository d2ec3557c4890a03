// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Hackathon directory service.
//!
//! Creates hackathon records and serves the list and detail views, including
//! the per-hackathon team count and the nested team/member tree.

use crate::db::Store;
use crate::error::{AppError, Result};
use crate::models::{Hackathon, HackathonStatus, Team};
use crate::services::validate::{not_blank, valid_date};
use crate::time_utils::{format_utc_rfc3339, parse_date_input};
use chrono::{DateTime, Utc};
use futures_util::{stream, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;
use validator::Validate;

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 10;
pub const MAX_LIMIT: usize = 100;

/// Upper bound on concurrent store reads when assembling a detail view.
const MAX_CONCURRENT_DB_OPS: usize = 16;

/// Body of `POST /hackathons`.
///
/// Missing fields deserialize as empty strings so they are reported as
/// validation errors rather than body rejections.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct NewHackathon {
    #[validate(custom(function = "not_blank", message = "Hackathon name is required"))]
    pub name: String,
    #[validate(custom(function = "not_blank", message = "Description is required"))]
    pub description: String,
    #[validate(custom(function = "not_blank", message = "Theme is required"))]
    pub theme: String,
    #[validate(custom(
        function = "valid_date",
        message = "Start date must be a valid date string"
    ))]
    pub start_date: String,
    #[validate(custom(
        function = "valid_date",
        message = "End date must be a valid date string"
    ))]
    pub end_date: String,
}

/// Validated page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Pagination {
    /// Parse raw query values. Both must be integers >= 1 when present;
    /// `limit` is clamped to [`MAX_LIMIT`].
    pub fn parse(page: Option<&str>, limit: Option<&str>) -> Result<Self> {
        fn positive(field: &str, raw: Option<&str>, default: usize) -> Result<usize> {
            match raw.map(str::trim) {
                None | Some("") => Ok(default),
                Some(raw) => match raw.parse::<usize>() {
                    Ok(n) if n >= 1 => Ok(n),
                    _ => Err(AppError::invalid_field(
                        field,
                        format!("{} must be a positive integer", field),
                    )),
                },
            }
        }

        let page = positive("page", page, DEFAULT_PAGE)?;
        let limit = positive("limit", limit, DEFAULT_LIMIT)?.min(MAX_LIMIT);
        Ok(Self { page, limit })
    }

    pub fn offset(&self) -> Result<usize> {
        (self.page - 1)
            .checked_mul(self.limit)
            .ok_or_else(|| AppError::invalid_field("page", "page is too large"))
    }
}

// ─── Views ───────────────────────────────────────────────────

/// Hackathon as returned by `POST /hackathons`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HackathonView {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub theme: String,
    pub start_date: String,
    pub end_date: String,
    pub status: HackathonStatus,
}

impl HackathonView {
    pub fn new(hackathon: &Hackathon, now: DateTime<Utc>) -> Self {
        Self {
            id: hackathon.id,
            name: hackathon.name.clone(),
            description: hackathon.description.clone(),
            theme: hackathon.theme.clone(),
            start_date: format_utc_rfc3339(hackathon.start_date),
            end_date: format_utc_rfc3339(hackathon.end_date),
            status: hackathon.status_at(now),
        }
    }
}

/// One row of `GET /hackathons`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HackathonSummary {
    pub id: Uuid,
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub theme: String,
    pub status: HackathonStatus,
    pub registered_teams: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MemberSummary {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TeamWithMembers {
    pub id: Uuid,
    pub name: String,
    pub hackathon_id: Uuid,
    pub users: Vec<MemberSummary>,
}

/// Response of `GET /hackathons/{id}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HackathonDetail {
    #[serde(flatten)]
    pub hackathon: HackathonView,
    pub teams: Vec<TeamWithMembers>,
}

/// Assemble a team with its members' names, in join order.
pub async fn team_with_members(store: &dyn Store, team: Team) -> Result<TeamWithMembers> {
    let memberships = store.members_of_team(team.id).await?;

    let users: Vec<MemberSummary> = stream::iter(memberships)
        .map(|m| async move {
            let user = store.get_user(m.user_id).await?;
            if user.is_none() {
                tracing::warn!(team_id = %m.team_id, user_id = %m.user_id, "Membership references missing user");
            }
            Ok::<_, AppError>(user.map(|u| MemberSummary {
                id: u.id,
                name: u.name,
            }))
        })
        .buffered(MAX_CONCURRENT_DB_OPS)
        .try_filter_map(|m| async move { Ok(m) })
        .try_collect()
        .await?;

    Ok(TeamWithMembers {
        id: team.id,
        name: team.name,
        hackathon_id: team.hackathon_id,
        users,
    })
}

/// Parse a path ID. Anything that is not a UUID cannot exist.
pub fn parse_id(kind: &str, raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::NotFound(format!("{} {} not found", kind, raw)))
}

/// Service for reading and creating hackathons.
#[derive(Clone)]
pub struct HackathonDirectory {
    store: Arc<dyn Store>,
}

impl HackathonDirectory {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Validate and persist a new hackathon.
    pub async fn create_hackathon(&self, input: NewHackathon) -> Result<Hackathon> {
        input.validate()?;

        // Both parse after validation succeeded
        let (Some(start_date), Some(end_date)) = (
            parse_date_input(&input.start_date),
            parse_date_input(&input.end_date),
        ) else {
            return Err(AppError::invalid_field("startDate", "Invalid date"));
        };

        if start_date > end_date {
            return Err(AppError::invalid_field(
                "endDate",
                "End date must not be before start date",
            ));
        }

        let hackathon = Hackathon {
            id: Uuid::new_v4(),
            name: input.name.trim().to_string(),
            description: input.description.trim().to_string(),
            theme: input.theme.trim().to_string(),
            start_date,
            end_date,
            created_at: Utc::now(),
        };

        self.store.insert_hackathon(&hackathon).await?;

        tracing::info!(
            hackathon_id = %hackathon.id,
            name = %hackathon.name,
            "Hackathon created"
        );

        Ok(hackathon)
    }

    /// One page of hackathons by ascending start date, with team counts.
    pub async fn list_hackathons(&self, page: Pagination) -> Result<Vec<HackathonSummary>> {
        let offset = page.offset()?;
        let hackathons = self.store.list_hackathons(offset, page.limit).await?;
        let now = Utc::now();
        let store = self.store.as_ref();

        stream::iter(hackathons)
            .map(|h| async move {
                let registered_teams = store.count_teams(h.id).await?;
                Ok::<_, AppError>(HackathonSummary {
                    status: h.status_at(now),
                    id: h.id,
                    name: h.name,
                    start_date: format_utc_rfc3339(h.start_date),
                    end_date: format_utc_rfc3339(h.end_date),
                    theme: h.theme,
                    registered_teams,
                })
            })
            .buffered(MAX_CONCURRENT_DB_OPS)
            .try_collect()
            .await
    }

    /// Full detail of one hackathon.
    pub async fn get_hackathon(&self, id: Uuid) -> Result<HackathonDetail> {
        let hackathon = self
            .store
            .get_hackathon(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Hackathon {} not found", id)))?;

        let teams = self.store.teams_for_hackathon(id).await?;
        let mut views = Vec::with_capacity(teams.len());
        for team in teams {
            views.push(team_with_members(self.store.as_ref(), team).await?);
        }

        Ok(HackathonDetail {
            hackathon: HackathonView::new(&hackathon, Utc::now()),
            teams: views,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    fn directory() -> HackathonDirectory {
        HackathonDirectory::new(Arc::new(MemoryStore::new()))
    }

    fn winter_jam() -> NewHackathon {
        NewHackathon {
            name: "Winter Jam".to_string(),
            description: "A cold weekend of code".to_string(),
            theme: "AI".to_string(),
            start_date: "2025-01-10".to_string(),
            end_date: "2025-01-12".to_string(),
        }
    }

    #[test]
    fn test_pagination_defaults_and_clamp() {
        assert_eq!(Pagination::parse(None, None).unwrap(), Pagination::default());
        assert_eq!(
            Pagination::parse(Some("2"), Some("500")).unwrap(),
            Pagination {
                page: 2,
                limit: MAX_LIMIT
            }
        );
    }

    #[test]
    fn test_pagination_rejects_bad_values() {
        for (page, limit) in [("0", "10"), ("abc", "10"), ("1", "0"), ("1", "-3"), ("1.5", "2")] {
            let err = Pagination::parse(Some(page), Some(limit)).unwrap_err();
            assert!(
                matches!(err, AppError::Validation(_)),
                "page={page} limit={limit}"
            );
        }
    }

    #[test]
    fn test_pagination_offset() {
        let p = Pagination { page: 3, limit: 10 };
        assert_eq!(p.offset().unwrap(), 20);

        let huge = Pagination {
            page: usize::MAX,
            limit: MAX_LIMIT,
        };
        assert!(huge.offset().is_err());
    }

    #[tokio::test]
    async fn test_create_then_get_round_trips_fields() {
        let dir = directory();
        let created = dir.create_hackathon(winter_jam()).await.unwrap();

        let detail = dir.get_hackathon(created.id).await.unwrap();

        assert_eq!(detail.hackathon.name, "Winter Jam");
        assert_eq!(detail.hackathon.theme, "AI");
        assert_eq!(detail.hackathon.description, "A cold weekend of code");
        assert_eq!(detail.hackathon.start_date, "2025-01-10T00:00:00.000Z");
        assert_eq!(detail.hackathon.end_date, "2025-01-12T00:00:00.000Z");
        assert!(detail.teams.is_empty());
    }

    #[tokio::test]
    async fn test_create_reports_every_bad_field() {
        let dir = directory();
        let input = NewHackathon {
            name: "  ".to_string(),
            start_date: "soon".to_string(),
            ..winter_jam()
        };

        let err = dir.create_hackathon(input).await.unwrap_err();
        let fields: Vec<&str> = err.field_errors().iter().map(|f| f.field.as_str()).collect();
        assert_eq!(fields, ["name", "startDate"]);
        assert!(dir.list_hackathons(Pagination::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_end_before_start() {
        let dir = directory();
        let input = NewHackathon {
            start_date: "2025-02-01".to_string(),
            end_date: "2025-01-01".to_string(),
            ..winter_jam()
        };

        let err = dir.create_hackathon(input).await.unwrap_err();
        assert_eq!(err.field_errors()[0].field, "endDate");
    }

    #[tokio::test]
    async fn test_get_unknown_is_not_found() {
        let err = directory().get_hackathon(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_respects_limit_and_order() {
        let dir = directory();
        for (name, start) in [("March", "2025-03-01"), ("January", "2025-01-01"), ("February", "2025-02-01")] {
            dir.create_hackathon(NewHackathon {
                name: name.to_string(),
                start_date: start.to_string(),
                end_date: "2025-12-31".to_string(),
                ..winter_jam()
            })
            .await
            .unwrap();
        }

        let first = dir
            .list_hackathons(Pagination { page: 1, limit: 2 })
            .await
            .unwrap();
        let second = dir
            .list_hackathons(Pagination { page: 2, limit: 2 })
            .await
            .unwrap();

        let names: Vec<_> = first.iter().chain(&second).map(|h| h.name.as_str()).collect();
        assert_eq!(first.len(), 2);
        assert_eq!(names, ["January", "February", "March"]);
        assert!(first.iter().all(|h| h.registered_teams == 0));
    }

    #[test]
    fn test_parse_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id("Team", &id.to_string()).unwrap(), id);
        assert!(matches!(parse_id("Team", "42"), Err(AppError::NotFound(_))));
    }
}
