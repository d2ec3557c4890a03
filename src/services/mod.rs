// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod accounts;
pub mod directory;
pub mod password;
pub mod registration;
pub mod validate;

pub use accounts::AccountService;
pub use directory::HackathonDirectory;
pub use registration::TeamRegistration;
