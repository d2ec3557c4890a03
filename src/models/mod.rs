// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod hackathon;
pub mod team;
pub mod user;

pub use hackathon::{Hackathon, HackathonStatus};
pub use team::{Membership, MembershipOutcome, Team};
pub use user::User;
