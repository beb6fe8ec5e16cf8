//! Workout statistics aggregation.
//!
//! The aggregator is a pure function over already-fetched rows: the
//! repository applies the completed/window filter, this module only folds.
//! For a fixed input slice and window the output is exactly reproducible,
//! so tests never depend on the wall clock.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::SetWithExercises;

/// Per-variant set counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetTypeCounts {
    pub normal: u64,
    pub dropset: u64,
    pub superset: u64,
}

/// One exercise in the favorites ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteExercise {
    pub exercise_id: i64,
    pub exercise_name: String,
    pub total_sets: u64,
}

/// Rollup for one calendar day with at least one completed set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayActivity {
    pub date: NaiveDate,
    pub sets_count: u64,
    pub volume: f64,
}

/// Summary statistics over a user's completed sets in the window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutStats {
    pub total_sets: u64,
    pub unique_exercises: u64,
    pub counts_by_type: SetTypeCounts,
    /// Distinct calendar days (UTC) with at least one completed set.
    pub workout_days: u64,
    pub total_volume_lifted: f64,
    /// Exercises ranked by set count descending, id ascending on ties.
    pub favorite_exercises: Vec<FavoriteExercise>,
    /// Per-day rollups, most recent day first.
    pub recent_activity: Vec<DayActivity>,
    /// The window the caller asked for, echoed back.
    pub period_days: i64,
}

/// Volume of one set: weight times reps, including the superset partner's
/// pair when present.
fn set_volume(set: &SetWithExercises) -> f64 {
    let mut volume = set.set.weight.primary * f64::from(set.set.reps.primary);
    if let (Some(weight), Some(reps)) = (set.set.weight.secondary, set.set.reps.secondary) {
        volume += weight * f64::from(reps);
    }
    volume
}

/// Fold the given completed sets into summary statistics.
///
/// `sets` must already be filtered to completed rows within the window;
/// `period_days` is only echoed into the result.
pub fn compute_workout_stats(sets: &[SetWithExercises], period_days: i64) -> WorkoutStats {
    let mut counts_by_type = SetTypeCounts::default();
    let mut total_volume = 0.0;

    // BTreeMap keeps both rollups deterministic without a sort-by-hash step.
    let mut per_exercise: BTreeMap<i64, (String, u64)> = BTreeMap::new();
    let mut per_day: BTreeMap<NaiveDate, (u64, f64)> = BTreeMap::new();

    for set in sets {
        match set.set.set_type {
            crate::models::SetType::Normal => counts_by_type.normal += 1,
            crate::models::SetType::Dropset => counts_by_type.dropset += 1,
            crate::models::SetType::Superset => counts_by_type.superset += 1,
        }

        let volume = set_volume(set);
        total_volume += volume;

        let name = set
            .exercise
            .as_ref()
            .map(|e| e.name.clone())
            .unwrap_or_else(|| format!("Exercise {}", set.set.exercise_id));
        let entry = per_exercise
            .entry(set.set.exercise_id)
            .or_insert_with(|| (name, 0));
        entry.1 += 1;

        let day = set.set.created_at.date_naive();
        let day_entry = per_day.entry(day).or_insert((0, 0.0));
        day_entry.0 += 1;
        day_entry.1 += volume;
    }

    let mut favorite_exercises: Vec<FavoriteExercise> = per_exercise
        .into_iter()
        .map(|(exercise_id, (exercise_name, total_sets))| FavoriteExercise {
            exercise_id,
            exercise_name,
            total_sets,
        })
        .collect();
    // Stable sort over an id-ordered vec: ties stay id-ascending.
    favorite_exercises.sort_by(|a, b| b.total_sets.cmp(&a.total_sets));

    let recent_activity: Vec<DayActivity> = per_day
        .into_iter()
        .rev()
        .map(|(date, (sets_count, volume))| DayActivity {
            date,
            sets_count,
            volume,
        })
        .collect();

    WorkoutStats {
        total_sets: sets.len() as u64,
        unique_exercises: favorite_exercises.len() as u64,
        counts_by_type,
        workout_days: recent_activity.len() as u64,
        total_volume_lifted: total_volume,
        favorite_exercises,
        recent_activity,
        period_days,
    }
}
