// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod nutrition;
pub mod profiles;

pub use nutrition::NutritionClient;
pub use profiles::ProfileService;
