// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod nutrition;
pub mod plan;
pub mod profile;

pub use nutrition::{DetectionKind, DetectionSummary, NutritionFacts};
pub use plan::GoalPlan;
pub use profile::{AuthProvider, Gender, GoalType, HeightImperial, UserProfile};
