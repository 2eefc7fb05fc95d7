// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Nutrition data returned by the lookup and detection services.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Nutrition facts for a packaged product, looked up by barcode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "mobile/src/generated/")
)]
pub struct NutritionFacts {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub calories: Option<f64>,
    #[serde(default)]
    pub protein: Option<f64>,
    #[serde(default)]
    pub fats: Option<f64>,
    #[serde(default)]
    pub carbs: Option<f64>,
    /// Nutri-Score grade, `a` through `e`
    #[serde(default)]
    pub nutriscore: Option<String>,
    #[serde(default)]
    pub ingredients: Option<String>,
}

/// Which recognition model to run on an uploaded photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionKind {
    FoodItem,
    FruitVegetable,
}

impl DetectionKind {
    /// Path segment under `/food-detection/` on the detection service.
    pub fn path(self) -> &'static str {
        match self {
            DetectionKind::FoodItem => "food-item",
            DetectionKind::FruitVegetable => "fruit-vegetable",
        }
    }
}

/// Nutrition and health-rating summary for a recognised food photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "mobile/src/generated/")
)]
pub struct DetectionSummary {
    #[serde(default)]
    pub food_item: Option<String>,
    #[serde(default)]
    pub calories: Option<f64>,
    #[serde(default)]
    pub protein: Option<f64>,
    #[serde(default)]
    pub carbohydrates: Option<f64>,
    #[serde(default)]
    pub fats: Option<f64>,
    #[serde(default)]
    pub fiber: Option<f64>,
    #[serde(default)]
    pub sugar: Option<f64>,
    #[serde(default)]
    pub health_rating: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
}
