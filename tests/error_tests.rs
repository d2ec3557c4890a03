// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Error response tests.
//!
//! Store failures must surface as a generic 500 without leaking details.

use axum::http::StatusCode;
use serde_json::json;

mod common;

#[tokio::test]
async fn test_store_failure_is_database_error() {
    let app = common::create_offline_app();

    let response = common::send(&app, common::get("/hackathons")).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = common::body_json(response).await;
    assert_eq!(body, json!({ "error": "database_error" }));
}

#[tokio::test]
async fn test_validation_runs_before_store() {
    let app = common::create_offline_app();

    let response = common::send(&app, common::post_json("/hackathons", json!({}), None)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let (app, _) = common::create_test_app();

    let response = common::send(&app, common::get("/nope")).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
