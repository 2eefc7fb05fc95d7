// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile payload schema shared by create and update.
//!
//! Both `POST /api/users` and `PUT /api/users/{externalId}` deserialize into
//! [`ProfileInput`] and run the same validators, so the two paths cannot
//! disagree about what a valid field looks like. Create additionally requires
//! the identity fields.

use crate::error::FieldError;
use crate::models::{AuthProvider, Gender, GoalType, HeightImperial, UserProfile};
use regex::Regex;
use serde::{Deserialize, Deserializer};
use std::sync::LazyLock;
use validator::{Validate, ValidationError, ValidationErrors};

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("email pattern compiles"));

pub const MIN_AGE: i64 = 13;
pub const MAX_AGE: i64 = 120;
pub const MAX_EXTERNAL_ID_LEN: u64 = 128;

const AGE_MESSAGE: &str = "Age must be between 13 and 120";

/// Incoming profile fields. Every field is optional at the type level;
/// `createdAt` and unknown keys are dropped during deserialization.
#[derive(Debug, Default, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInput {
    /// Identity provider UID. The mobile client historically sends `uid`.
    #[serde(alias = "uid")]
    #[validate(
        length(min = 1, max = MAX_EXTERNAL_ID_LEN, message = "External ID must be 1 to 128 characters"),
        custom(function = "validate_document_id")
    )]
    pub external_id: Option<String>,

    #[validate(regex(path = *EMAIL_PATTERN, message = "Please use a valid email address"))]
    pub email: Option<String>,

    #[validate(length(min = 1, message = "Name is required"))]
    pub name: Option<String>,

    pub photo_url: Option<String>,

    pub auth_provider: Option<AuthProvider>,

    /// `Some(None)` is an explicit `null`, which resets the gender.
    #[serde(default, deserialize_with = "nullable")]
    pub gender: Option<Option<Gender>>,

    #[validate(range(min = MIN_AGE, max = MAX_AGE, message = "Age must be between 13 and 120"))]
    pub age: Option<i64>,

    pub height: Option<f64>,
    pub height_imperial: Option<HeightImperial>,
    pub current_weight: Option<f64>,
    pub goal_weight: Option<f64>,
    pub goal_type: Option<GoalType>,
    pub weight_difference: Option<f64>,
    pub weight_change_speed: Option<f64>,
}

/// Distinguish an explicit `null` from an absent key.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn is_reserved_document_id(id: &str) -> bool {
    id.contains('/') || id == "." || id == ".." || (id.starts_with("__") && id.ends_with("__"))
}

/// External IDs double as document IDs.
fn validate_document_id(id: &str) -> Result<(), ValidationError> {
    if is_reserved_document_id(id) {
        return Err(ValidationError::new("document_id")
            .with_message("External ID contains reserved characters".into()));
    }
    Ok(())
}

/// Whether `id` can name a stored profile. Anything else is rejected before
/// it reaches the store.
pub fn is_storable_id(id: &str) -> bool {
    let len = id.chars().count() as u64;
    (1..=MAX_EXTERNAL_ID_LEN).contains(&len) && !is_reserved_document_id(id)
}

/// The external ID of a raw create body, read before the body is parsed so a
/// duplicate ID is reported ahead of type errors.
pub fn raw_external_id(body: &serde_json::Value) -> Option<&str> {
    body.get("externalId")
        .or_else(|| body.get("uid"))
        .and_then(serde_json::Value::as_str)
}

/// Convert a range-checked age to its stored form.
fn stored_age(age: Option<i64>) -> Result<Option<u32>, FieldError> {
    age.map(u32::try_from)
        .transpose()
        .map_err(|_| FieldError::new("age", AGE_MESSAGE))
}

impl ProfileInput {
    /// Parse a JSON body. Type and enum errors are reported against `body`.
    pub fn from_json(body: serde_json::Value) -> Result<Self, Vec<FieldError>> {
        serde_json::from_value(body).map_err(|e| vec![FieldError::new("body", e.to_string())])
    }

    /// Lowercase and trim the email, trim the name.
    pub fn normalize(&mut self) {
        if let Some(email) = self.email.as_mut() {
            *email = email.trim().to_lowercase();
        }
        if let Some(name) = self.name.as_mut() {
            *name = name.trim().to_string();
        }
    }

    fn field_errors(&self) -> Vec<FieldError> {
        match self.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => flatten_errors(&errors),
        }
    }

    /// Validate as a create payload and build the record to store.
    pub fn into_new_profile(mut self, created_at: String) -> Result<UserProfile, Vec<FieldError>> {
        self.normalize();
        let mut errors = self.field_errors();

        if self.external_id.is_none() {
            errors.push(FieldError::new("externalId", "External ID is required"));
        }
        if self.email.is_none() {
            errors.push(FieldError::new("email", "Email is required"));
        }
        if self.name.is_none() {
            errors.push(FieldError::new("name", "Name is required"));
        }
        if self.auth_provider.is_none() {
            errors.push(FieldError::new("authProvider", "Auth provider is required"));
        }

        let age = if errors.is_empty() {
            stored_age(self.age).unwrap_or_else(|e| {
                errors.push(e);
                None
            })
        } else {
            None
        };

        match (self.external_id, self.email, self.name, self.auth_provider) {
            (Some(external_id), Some(email), Some(name), Some(auth_provider))
                if errors.is_empty() =>
            {
                Ok(UserProfile {
                    external_id,
                    email,
                    name,
                    photo_url: self.photo_url,
                    auth_provider,
                    gender: self.gender.flatten(),
                    age,
                    height: self.height,
                    height_imperial: self.height_imperial,
                    current_weight: self.current_weight,
                    goal_weight: self.goal_weight,
                    goal_type: self.goal_type,
                    weight_difference: self.weight_difference,
                    weight_change_speed: self.weight_change_speed,
                    created_at,
                })
            }
            _ => {
                errors.sort_by(|a, b| a.field.cmp(&b.field));
                Err(errors)
            }
        }
    }

    /// Validate only the supplied fields and turn them into a patch.
    ///
    /// `externalId` is immutable and silently dropped.
    pub fn into_patch(mut self) -> Result<ProfilePatch, Vec<FieldError>> {
        self.external_id = None;
        self.normalize();
        let mut errors = self.field_errors();
        if !errors.is_empty() {
            errors.sort_by(|a, b| a.field.cmp(&b.field));
            return Err(errors);
        }
        let age = stored_age(self.age).map_err(|e| vec![e])?;
        Ok(ProfilePatch { fields: self, age })
    }
}

/// A validated set of field changes for an existing profile.
#[derive(Debug, Clone)]
pub struct ProfilePatch {
    fields: ProfileInput,
    age: Option<u32>,
}

impl ProfilePatch {
    /// New email, if the patch changes it.
    pub fn email(&self) -> Option<&str> {
        self.fields.email.as_deref()
    }

    /// Stored field names this patch writes, in document order.
    pub fn field_paths(&self) -> Vec<&'static str> {
        let f = &self.fields;
        [
            ("email", f.email.is_some()),
            ("name", f.name.is_some()),
            ("photoUrl", f.photo_url.is_some()),
            ("authProvider", f.auth_provider.is_some()),
            ("gender", f.gender.is_some()),
            ("age", f.age.is_some()),
            ("height", f.height.is_some()),
            ("heightImperial", f.height_imperial.is_some()),
            ("currentWeight", f.current_weight.is_some()),
            ("goalWeight", f.goal_weight.is_some()),
            ("goalType", f.goal_type.is_some()),
            ("weightDifference", f.weight_difference.is_some()),
            ("weightChangeSpeed", f.weight_change_speed.is_some()),
        ]
        .into_iter()
        .filter_map(|(path, present)| present.then_some(path))
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.field_paths().is_empty()
    }

    /// Overwrite the supplied fields on `profile`. Nested objects are
    /// replaced whole.
    pub fn apply_to(&self, profile: &mut UserProfile) {
        let f = &self.fields;
        if let Some(email) = &f.email {
            profile.email = email.clone();
        }
        if let Some(name) = &f.name {
            profile.name = name.clone();
        }
        if let Some(photo_url) = &f.photo_url {
            profile.photo_url = Some(photo_url.clone());
        }
        if let Some(auth_provider) = f.auth_provider {
            profile.auth_provider = auth_provider;
        }
        if let Some(gender) = f.gender {
            profile.gender = gender;
        }
        if self.age.is_some() {
            profile.age = self.age;
        }
        if let Some(height) = f.height {
            profile.height = Some(height);
        }
        if let Some(height_imperial) = f.height_imperial {
            profile.height_imperial = Some(height_imperial);
        }
        if let Some(current_weight) = f.current_weight {
            profile.current_weight = Some(current_weight);
        }
        if let Some(goal_weight) = f.goal_weight {
            profile.goal_weight = Some(goal_weight);
        }
        if let Some(goal_type) = f.goal_type {
            profile.goal_type = Some(goal_type);
        }
        if let Some(weight_difference) = f.weight_difference {
            profile.weight_difference = Some(weight_difference);
        }
        if let Some(speed) = f.weight_change_speed {
            profile.weight_change_speed = Some(speed);
        }
    }
}

/// Convert validator output into API field errors with camelCase names.
fn flatten_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = camel_case(&field.to_string());
            errs.iter()
                .map(|e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value ({})", e.code));
                    FieldError::new(field.clone(), message)
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
