// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client for the nutrition lookup and food detection services.
//!
//! Both services are external; this client only forwards requests and
//! decodes their responses into typed models.

use crate::config::Config;
use crate::error::AppError;
use crate::models::{DetectionKind, DetectionSummary, NutritionFacts};
use axum::body::Bytes;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

/// HTTP client for the nutrition collaborators.
#[derive(Clone)]
pub struct NutritionClient {
    http: reqwest::Client,
    nutrition_url: String,
    detection_url: String,
}

impl NutritionClient {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::Internal(e.into()))?;

        Ok(Self {
            http,
            nutrition_url: config.nutrition_service_url.clone(),
            detection_url: config.detection_service_url.clone(),
        })
    }

    /// Look up nutrition facts for a product barcode.
    pub async fn lookup_barcode(&self, barcode: &str) -> Result<NutritionFacts, AppError> {
        let url = format!("{}/nutrition/{}", self.nutrition_url, barcode);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Nutrition lookup failed: {}", e)))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!(
                "No nutrition data found for barcode {}",
                barcode
            )));
        }

        self.check_response_json(response).await
    }

    /// Forward a multipart image upload to the detection service.
    pub async fn detect(
        &self,
        kind: DetectionKind,
        content_type: &str,
        body: Bytes,
    ) -> Result<DetectionSummary, AppError> {
        let url = format!("{}/food-detection/{}", self.detection_url, kind.path());

        let response = self
            .http
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Food detection failed: {}", e)))?;

        self.check_response_json(response).await
    }

    async fn check_response_json<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!("{} - {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Invalid response body: {}", e)))
    }
}
