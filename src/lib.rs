// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Nutritrack API: user profile storage for the Nutritrack mobile app
//!
//! This crate provides the backend that stores the profile assembled during
//! onboarding (identity fields plus body and goal metrics), keyed by the
//! identity provider's UID, and relays barcode and photo lookups to the
//! nutrition services.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod schema;
pub mod services;
pub mod time_utils;

use config::Config;
use services::{NutritionClient, ProfileService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub profiles: ProfileService,
    pub nutrition: NutritionClient,
}
