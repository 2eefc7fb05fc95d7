// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Pass-through routes to the nutrition lookup and food detection services.

use crate::error::{AppError, Result};
use crate::models::{DetectionKind, DetectionSummary, NutritionFacts};
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Path, State},
    http::{header, HeaderMap},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

const MIN_BARCODE_LEN: usize = 8;
const MAX_BARCODE_LEN: usize = 14;

pub fn routes(max_upload_bytes: usize) -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/nutrition/{barcode}", get(lookup_barcode))
        .route(
            "/api/food-detection/food-item",
            post(detect_food_item).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route(
            "/api/food-detection/fruit-vegetable",
            post(detect_fruit_vegetable).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
}

/// EAN-8 through GTIN-14.
fn validate_barcode(barcode: &str) -> Result<()> {
    let valid_len = (MIN_BARCODE_LEN..=MAX_BARCODE_LEN).contains(&barcode.len());
    if !valid_len || !barcode.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::BadRequest(format!(
            "Barcode must be {} to {} digits",
            MIN_BARCODE_LEN, MAX_BARCODE_LEN
        )));
    }
    Ok(())
}

async fn lookup_barcode(
    State(state): State<Arc<AppState>>,
    Path(barcode): Path<String>,
) -> Result<Json<NutritionFacts>> {
    validate_barcode(&barcode)?;
    let facts = state.nutrition.lookup_barcode(&barcode).await?;
    tracing::debug!(barcode = %barcode, name = ?facts.name, "Barcode lookup");
    Ok(Json(facts))
}

async fn detect_food_item(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<DetectionSummary>> {
    detect(&state, DetectionKind::FoodItem, &headers, body).await
}

async fn detect_fruit_vegetable(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<DetectionSummary>> {
    detect(&state, DetectionKind::FruitVegetable, &headers, body).await
}

async fn detect(
    state: &AppState,
    kind: DetectionKind,
    headers: &HeaderMap,
    body: Bytes,
) -> Result<Json<DetectionSummary>> {
    // The boundary parameter must travel with the body, so the whole header is forwarded.
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .filter(|v| v.starts_with("multipart/form-data"))
        .ok_or_else(|| {
            AppError::BadRequest("Expected a multipart/form-data image upload".to_string())
        })?;

    if body.is_empty() {
        return Err(AppError::BadRequest("Empty upload".to_string()));
    }

    tracing::debug!(kind = kind.path(), bytes = body.len(), "Forwarding image for detection");
    let summary = state.nutrition.detect(kind, content_type, body).await?;
    Ok(Json(summary))
}
