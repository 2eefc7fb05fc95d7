// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User profile routes.

use crate::error::Result;
use crate::models::{GoalPlan, UserProfile};
use crate::schema::ProfileInput;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/users", post(create_user))
        .route("/api/users/{external_id}", get(get_user).put(update_user))
        .route("/api/users/{external_id}/plan", get(get_plan))
}

/// Create a profile after sign-up.
///
/// The body is taken as plain JSON so an existing external ID is reported
/// before any type errors in the other fields.
async fn create_user(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<(StatusCode, Json<UserProfile>)> {
    let Json(body) = payload?;
    let profile = state.profiles.create_from_json(body).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(external_id): Path<String>,
) -> Result<Json<UserProfile>> {
    Ok(Json(state.profiles.get(&external_id).await?))
}

/// Partial update; immutable and unknown fields in the body are ignored.
async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(external_id): Path<String>,
    payload: std::result::Result<Json<ProfileInput>, JsonRejection>,
) -> Result<Json<UserProfile>> {
    // A missing profile is a 404 even when the body is unusable.
    let input = match payload {
        Ok(Json(input)) => input,
        Err(rejection) => {
            state.profiles.get(&external_id).await?;
            return Err(rejection.into());
        }
    };
    Ok(Json(state.profiles.update(&external_id, input).await?))
}

/// Weight goal summary shown at the end of onboarding.
async fn get_plan(
    State(state): State<Arc<AppState>>,
    Path(external_id): Path<String>,
) -> Result<Json<GoalPlan>> {
    Ok(Json(state.profiles.plan(&external_id).await?))
}
