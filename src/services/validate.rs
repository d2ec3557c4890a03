// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Custom field validators shared by request types.

use crate::time_utils::parse_date_input;
use validator::ValidationError;

/// Reject empty or whitespace-only strings.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Reject strings that are not an accepted date format.
pub fn valid_date(value: &str) -> Result<(), ValidationError> {
    if parse_date_input(value).is_none() {
        return Err(ValidationError::new("invalid_date"));
    }
    Ok(())
}
