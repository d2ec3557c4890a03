// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin key tests for hackathon creation.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use hacktrack::config::Config;
use serde_json::json;

mod common;

fn app_with_admin_key() -> axum::Router {
    let config = Config {
        admin_api_key: Some("organizer-secret".to_string()),
        ..Config::test_default()
    };
    common::create_test_app_with_config(config).0
}

fn create_request(key: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/hackathons")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(key) = key {
        builder = builder.header("x-admin-key", key);
    }
    builder
        .body(Body::from(
            json!({
                "name": "Winter Jam",
                "description": "desc",
                "theme": "AI",
                "startDate": "2099-01-10",
                "endDate": "2099-01-12",
            })
            .to_string(),
        ))
        .unwrap()
}

#[tokio::test]
async fn test_create_requires_admin_key() {
    let app = app_with_admin_key();

    let response = common::send(&app, create_request(None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = common::send(&app, create_request(Some("wrong"))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = common::send(&app, create_request(Some("organizer-secret"))).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_listing_stays_public_with_admin_key() {
    let app = app_with_admin_key();

    let response = common::send(&app, common::get("/hackathons")).await;

    assert_eq!(response.status(), StatusCode::OK);
}
