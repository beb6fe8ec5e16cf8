//! Core domain types for logged sets.
//!
//! A `Set` is one logged unit of exercise work. The `set_type` discriminator
//! selects which optional fields are legal (see [`crate::models::validation`]
//! for the variant contract). Weight and reps carry a semi-structured
//! `{primary, secondary?}` shape that is persisted as a JSON blob.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Distinguishes an absent field from an explicit `null`: absent stays
/// `None`, `null` becomes `Some(None)`, a value becomes `Some(Some(v))`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Variant discriminator for a logged set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SetType {
    /// Single weight/reps pair.
    Normal,
    /// Weight reduced mid-set; recorded via `drop_weight`/`drop_reps`.
    Dropset,
    /// Two exercises back-to-back; recorded via `superset_exercise_id` and
    /// secondary weight/reps.
    Superset,
}

impl SetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SetType::Normal => "normal",
            SetType::Dropset => "dropset",
            SetType::Superset => "superset",
        }
    }
}

impl fmt::Display for SetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(SetType::Normal),
            "dropset" => Ok(SetType::Dropset),
            "superset" => Ok(SetType::Superset),
            other => Err(format!("Unknown set type: {}", other)),
        }
    }
}

/// Weight for the primary exercise and, for supersets, the partner exercise.
///
/// Stored as a JSON blob; `secondary: None` and `secondary` absent are the
/// same state on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightData {
    pub primary: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<f64>,
}

impl WeightData {
    pub fn primary(weight: f64) -> Self {
        Self {
            primary: weight,
            secondary: None,
        }
    }

    pub fn with_secondary(primary: f64, secondary: f64) -> Self {
        Self {
            primary,
            secondary: Some(secondary),
        }
    }
}

/// Repetitions for the primary exercise and, for supersets, the partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepsData {
    pub primary: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<i32>,
}

impl RepsData {
    pub fn primary(reps: i32) -> Self {
        Self {
            primary: reps,
            secondary: None,
        }
    }

    pub fn with_secondary(primary: i32, secondary: i32) -> Self {
        Self {
            primary,
            secondary: Some(secondary),
        }
    }
}

/// A persisted logged set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Set {
    pub id: i64,
    pub user_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workout_session_id: Option<i64>,
    pub set_number: i32,
    pub set_type: SetType,
    pub exercise_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superset_exercise_id: Option<i64>,
    pub weight: WeightData,
    pub reps: RepsData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drop_weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drop_reps: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Candidate set payload, pre-persistence (no id/timestamps yet).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSet {
    pub user_id: i64,
    #[serde(default)]
    pub workout_session_id: Option<i64>,
    pub set_number: i32,
    pub set_type: SetType,
    pub exercise_id: i64,
    #[serde(default)]
    pub superset_exercise_id: Option<i64>,
    pub weight: WeightData,
    pub reps: RepsData,
    #[serde(default)]
    pub drop_weight: Option<f64>,
    #[serde(default)]
    pub drop_reps: Option<i32>,
    #[serde(default)]
    pub note: Option<String>,
    /// Defaults to true when omitted.
    #[serde(default)]
    pub completed: Option<bool>,
}

/// Partial update for an existing set.
///
/// Absent fields are left unchanged. The nullable fields use a nested
/// `Option` so an explicit JSON `null` clears the stored value; without
/// that, transitions that must shed fields (superset back to normal,
/// dropset back to normal) would be unreachable through a partial update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SetUpdate {
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub workout_session_id: Option<Option<i64>>,
    #[serde(default)]
    pub set_number: Option<i32>,
    #[serde(default)]
    pub set_type: Option<SetType>,
    #[serde(default)]
    pub exercise_id: Option<i64>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub superset_exercise_id: Option<Option<i64>>,
    #[serde(default)]
    pub weight: Option<WeightData>,
    #[serde(default)]
    pub reps: Option<RepsData>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub drop_weight: Option<Option<f64>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub drop_reps: Option<Option<i32>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub note: Option<Option<String>>,
    #[serde(default)]
    pub completed: Option<bool>,
}

impl SetUpdate {
    /// True when the update carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.workout_session_id.is_none()
            && self.set_number.is_none()
            && self.set_type.is_none()
            && self.exercise_id.is_none()
            && self.superset_exercise_id.is_none()
            && self.weight.is_none()
            && self.reps.is_none()
            && self.drop_weight.is_none()
            && self.drop_reps.is_none()
            && self.note.is_none()
            && self.completed.is_none()
    }

    /// Merge this partial update over an existing set, producing the
    /// candidate record the full variant validator runs against.
    pub fn merge_into(&self, existing: &Set) -> NewSet {
        NewSet {
            user_id: existing.user_id,
            workout_session_id: self
                .workout_session_id
                .unwrap_or(existing.workout_session_id),
            set_number: self.set_number.unwrap_or(existing.set_number),
            set_type: self.set_type.unwrap_or(existing.set_type),
            exercise_id: self.exercise_id.unwrap_or(existing.exercise_id),
            superset_exercise_id: self
                .superset_exercise_id
                .unwrap_or(existing.superset_exercise_id),
            weight: self.weight.unwrap_or(existing.weight),
            reps: self.reps.unwrap_or(existing.reps),
            drop_weight: self.drop_weight.unwrap_or(existing.drop_weight),
            drop_reps: self.drop_reps.unwrap_or(existing.drop_reps),
            note: match &self.note {
                Some(value) => value.clone(),
                None => existing.note.clone(),
            },
            completed: Some(self.completed.unwrap_or(existing.completed)),
        }
    }
}

/// Exercise reference resolved for display (a join, not stored redundantly).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: i64,
    pub name: String,
    pub category: String,
}

/// A set enriched with its resolved exercise references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetWithExercises {
    #[serde(flatten)]
    pub set: Set,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise: Option<Exercise>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superset_exercise: Option<Exercise>,
}
