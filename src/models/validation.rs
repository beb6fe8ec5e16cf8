//! Structural validation of set payloads.
//!
//! The variant contract, with `set_type` as the single discriminator:
//!
//! | set_type  | superset_exercise_id | secondary weight/reps | drop_weight/drop_reps |
//! |-----------|----------------------|-----------------------|-----------------------|
//! | normal    | forbidden            | forbidden             | forbidden             |
//! | dropset   | forbidden            | forbidden             | at least one required |
//! | superset  | required             | required              | forbidden             |
//!
//! Validation is a pure function over the candidate payload. All violations
//! are collected in order; the caller must refuse to persist on any.

use super::set::{NewSet, SetType};

/// Maximum length of the free-text note.
pub const MAX_NOTE_LEN: usize = 500;

/// Outcome of validating a candidate set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetValidation {
    /// Human-readable violation messages, in check order.
    pub errors: Vec<String>,
}

impl SetValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Convert into a `Result`, yielding the ordered violations on failure.
    pub fn into_result(self) -> Result<(), Vec<String>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// Validate a candidate set against the structural rules and the variant
/// contract. Returns every violation found, not just the first.
pub fn validate_new_set(set: &NewSet) -> SetValidation {
    let mut errors = Vec::new();

    // Basic validations
    if set.user_id <= 0 {
        errors.push("User ID is required".to_string());
    }
    if set.exercise_id <= 0 {
        errors.push("Exercise ID is required".to_string());
    }
    if set.set_number <= 0 {
        errors.push("Set number must be positive".to_string());
    }

    // Weight and reps structure
    if set.weight.primary <= 0.0 {
        errors.push("Primary weight must be positive".to_string());
    }
    if set.reps.primary <= 0 {
        errors.push("Primary reps must be positive".to_string());
    }

    // Type-specific validations
    match set.set_type {
        SetType::Superset => {
            match set.superset_exercise_id {
                Some(id) if id > 0 => {}
                _ => errors.push("Superset exercise ID is required for supersets".to_string()),
            }
            match set.weight.secondary {
                Some(w) if w > 0.0 => {}
                _ => errors.push("Secondary weight is required for supersets".to_string()),
            }
            match set.reps.secondary {
                Some(r) if r > 0 => {}
                _ => errors.push("Secondary reps is required for supersets".to_string()),
            }
        }
        SetType::Normal | SetType::Dropset => {
            if set.superset_exercise_id.is_some() {
                errors.push(
                    "Superset exercise ID should not be set for non-superset types".to_string(),
                );
            }
            if set.weight.secondary.is_some() {
                errors
                    .push("Secondary weight should not be set for non-superset types".to_string());
            }
            if set.reps.secondary.is_some() {
                errors.push("Secondary reps should not be set for non-superset types".to_string());
            }
        }
    }

    if set.set_type == SetType::Dropset {
        if set.drop_weight.is_none() && set.drop_reps.is_none() {
            errors.push("Drop weight or drop reps must be specified for dropsets".to_string());
        }
        if matches!(set.drop_weight, Some(w) if w <= 0.0) {
            errors.push("Drop weight must be positive".to_string());
        }
        if matches!(set.drop_reps, Some(r) if r <= 0) {
            errors.push("Drop reps must be positive".to_string());
        }
    } else if set.drop_weight.is_some() || set.drop_reps.is_some() {
        errors.push("Drop weight/reps should not be set for non-dropset types".to_string());
    }

    if let Some(note) = &set.note {
        if note.chars().count() > MAX_NOTE_LEN {
            errors.push(format!("Note must not exceed {} characters", MAX_NOTE_LEN));
        }
    }

    SetValidation { errors }
}
