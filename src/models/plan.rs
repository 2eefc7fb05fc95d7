// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Weight goal plan derived from a stored profile.

use crate::error::FieldError;
use crate::models::profile::{GoalType, UserProfile};
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Summary of how far the user is from their goal weight and how long it
/// takes at the chosen weekly rate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "mobile/src/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct GoalPlan {
    pub goal_type: GoalType,
    /// Absolute difference between goal and current weight (kg)
    pub weight_difference: f64,
    /// kg per week
    pub weight_change_speed: f64,
    /// Whole weeks needed, rounded up
    pub weeks_to_goal: u32,
}

impl GoalPlan {
    /// Compute the plan from a profile's weight fields.
    ///
    /// Every missing or unusable input is reported, not just the first.
    pub fn from_profile(profile: &UserProfile) -> Result<Self, Vec<FieldError>> {
        let mut errors = Vec::new();

        if profile.current_weight.is_none() {
            errors.push(FieldError::new("currentWeight", "Current weight is not set"));
        }
        if profile.goal_weight.is_none() {
            errors.push(FieldError::new("goalWeight", "Goal weight is not set"));
        }
        match profile.weight_change_speed {
            None => errors.push(FieldError::new(
                "weightChangeSpeed",
                "Weight change speed is not set",
            )),
            Some(speed) if speed <= 0.0 => errors.push(FieldError::new(
                "weightChangeSpeed",
                "Weight change speed must be positive",
            )),
            Some(_) => {}
        }

        match (
            profile.current_weight,
            profile.goal_weight,
            profile.weight_change_speed,
        ) {
            (Some(current), Some(goal), Some(speed)) if errors.is_empty() => {
                let weight_difference = (goal - current).abs();
                Ok(Self {
                    goal_type: GoalType::between(current, goal),
                    weight_difference,
                    weight_change_speed: speed,
                    weeks_to_goal: (weight_difference / speed).ceil() as u32,
                })
            }
            _ => Err(errors),
        }
    }
}
