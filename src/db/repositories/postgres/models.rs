use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

use super::schema::{exercises, sets};
use crate::db::repository::{RepositoryError, RepositoryResult};
use crate::models::{Exercise, NewSet, RepsData, Set, SetType, WeightData};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = sets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SetRow {
    pub id: i64,
    pub user_id: i64,
    pub workout_session_id: Option<i64>,
    pub set_number: i32,
    pub set_type: String,
    pub exercise_id: i64,
    pub superset_exercise_id: Option<i64>,
    pub weight: Value,
    pub reps: Value,
    pub drop_weight: Option<f64>,
    pub drop_reps: Option<i32>,
    pub note: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SetRow {
    /// Decode the row into the domain type, including the serialized
    /// weight/reps blobs.
    pub fn into_set(self) -> RepositoryResult<Set> {
        let set_type: SetType = self
            .set_type
            .parse()
            .map_err(|e: String| RepositoryError::internal(e))?;
        let weight: WeightData = serde_json::from_value(self.weight)
            .map_err(|e| RepositoryError::internal(format!("Invalid weight blob: {}", e)))?;
        let reps: RepsData = serde_json::from_value(self.reps)
            .map_err(|e| RepositoryError::internal(format!("Invalid reps blob: {}", e)))?;

        Ok(Set {
            id: self.id,
            user_id: self.user_id,
            workout_session_id: self.workout_session_id,
            set_number: self.set_number,
            set_type,
            exercise_id: self.exercise_id,
            superset_exercise_id: self.superset_exercise_id,
            weight,
            reps,
            drop_weight: self.drop_weight,
            drop_reps: self.drop_reps,
            note: self.note,
            completed: self.completed,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = sets)]
pub struct NewSetRow {
    pub user_id: i64,
    pub workout_session_id: Option<i64>,
    pub set_number: i32,
    pub set_type: String,
    pub exercise_id: i64,
    pub superset_exercise_id: Option<i64>,
    pub weight: Value,
    pub reps: Value,
    pub drop_weight: Option<f64>,
    pub drop_reps: Option<i32>,
    pub note: Option<String>,
    pub completed: bool,
}

impl NewSetRow {
    pub fn from_new_set(set: &NewSet) -> RepositoryResult<Self> {
        let weight = serde_json::to_value(set.weight)
            .map_err(|e| RepositoryError::internal(format!("Weight encoding failed: {}", e)))?;
        let reps = serde_json::to_value(set.reps)
            .map_err(|e| RepositoryError::internal(format!("Reps encoding failed: {}", e)))?;

        Ok(Self {
            user_id: set.user_id,
            workout_session_id: set.workout_session_id,
            set_number: set.set_number,
            set_type: set.set_type.as_str().to_string(),
            exercise_id: set.exercise_id,
            superset_exercise_id: set.superset_exercise_id,
            weight,
            reps,
            drop_weight: set.drop_weight,
            drop_reps: set.drop_reps,
            note: set.note.clone(),
            completed: set.completed.unwrap_or(true),
        })
    }
}

/// Full-record changeset written on update; the service layer has already
/// merged the partial update and re-validated the result.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = sets)]
#[diesel(treat_none_as_null = true)]
pub struct SetChangeset {
    pub workout_session_id: Option<i64>,
    pub set_number: i32,
    pub set_type: String,
    pub exercise_id: i64,
    pub superset_exercise_id: Option<i64>,
    pub weight: Value,
    pub reps: Value,
    pub drop_weight: Option<f64>,
    pub drop_reps: Option<i32>,
    pub note: Option<String>,
    pub completed: bool,
    pub updated_at: DateTime<Utc>,
}

impl SetChangeset {
    pub fn from_merged(merged: &NewSet, fallback_completed: bool) -> RepositoryResult<Self> {
        let weight = serde_json::to_value(merged.weight)
            .map_err(|e| RepositoryError::internal(format!("Weight encoding failed: {}", e)))?;
        let reps = serde_json::to_value(merged.reps)
            .map_err(|e| RepositoryError::internal(format!("Reps encoding failed: {}", e)))?;

        Ok(Self {
            workout_session_id: merged.workout_session_id,
            set_number: merged.set_number,
            set_type: merged.set_type.as_str().to_string(),
            exercise_id: merged.exercise_id,
            superset_exercise_id: merged.superset_exercise_id,
            weight,
            reps,
            drop_weight: merged.drop_weight,
            drop_reps: merged.drop_reps,
            note: merged.note.clone(),
            completed: merged.completed.unwrap_or(fallback_completed),
            updated_at: Utc::now(),
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = exercises)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ExerciseRow {
    pub id: i64,
    pub name: String,
    pub category: String,
    #[allow(dead_code)] // Selected for completeness; not exposed on the DTO
    pub created_at: DateTime<Utc>,
}

impl From<ExerciseRow> for Exercise {
    fn from(row: ExerciseRow) -> Self {
        Exercise {
            id: row.id,
            name: row.name,
            category: row.category,
        }
    }
}
