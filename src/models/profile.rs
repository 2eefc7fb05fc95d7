// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User profile model for storage and API.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// How the user signed in with the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "mobile/src/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    Google,
    Email,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "mobile/src/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Direction of the weight goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "mobile/src/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum GoalType {
    Gain,
    Lose,
}

impl GoalType {
    /// `gain` when the goal is above the current weight, otherwise `lose`.
    pub fn between(current_weight: f64, goal_weight: f64) -> Self {
        if goal_weight > current_weight {
            GoalType::Gain
        } else {
            GoalType::Lose
        }
    }
}

/// Height entered in feet and inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "mobile/src/generated/")
)]
pub struct HeightImperial {
    pub feet: f64,
    pub inches: f64,
}

/// User profile stored in the `users` collection, keyed by `external_id`.
///
/// The serialized form is also the API representation; it carries no
/// storage identifiers or version fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "mobile/src/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Identity provider UID (also used as document ID)
    pub external_id: String,
    /// Lowercased email address
    pub email: String,
    /// Display name, trimmed
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    pub auth_provider: AuthProvider,
    /// Always present in the document, `null` when not chosen
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    /// Height in centimetres
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_imperial: Option<HeightImperial>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_type: Option<GoalType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_difference: Option<f64>,
    /// Desired change in kg per week
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_change_speed: Option<f64>,
    /// Server-assigned creation time (RFC3339), never changed afterwards
    pub created_at: String,
}
