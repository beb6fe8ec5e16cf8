//! High-level service functions over the repository traits.
//!
//! This is the layer the HTTP handlers call. It owns the business rules that
//! are backend-independent: running the structural validator before any
//! write, isolating per-item failures in bulk creation, merging partial
//! updates and re-validating the merged record, and orchestrating the
//! statistics aggregation.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::db::repository::{FullRepository, RepositoryError, RepositoryResult};
use crate::models::{validate_new_set, NewSet, Set, SetUpdate, SetWithExercises};
use crate::services::stats::{compute_workout_stats, WorkoutStats};

/// One failed item in a bulk create, by input position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkCreateError {
    pub index: usize,
    pub error: String,
}

/// Outcome of a bulk create: successes and failures are both reported.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkCreateOutcome {
    pub created: Vec<Set>,
    pub errors: Vec<BulkCreateError>,
}

/// Validate and persist a single set.
///
/// Structural violations are all collected and returned at once; nothing is
/// written when any violation exists.
pub async fn create_set(repo: &dyn FullRepository, set: &NewSet) -> RepositoryResult<Set> {
    validate_new_set(set)
        .into_result()
        .map_err(RepositoryError::validation)?;
    repo.create_set(set).await
}

/// Create several sets, each validated and persisted independently.
///
/// A failure in one item never aborts its siblings; failed items are
/// reported with their input index. There is deliberately no surrounding
/// transaction: save what succeeds.
pub async fn bulk_create_sets(
    repo: &dyn FullRepository,
    sets: &[NewSet],
) -> RepositoryResult<BulkCreateOutcome> {
    let mut outcome = BulkCreateOutcome::default();

    for (index, set) in sets.iter().enumerate() {
        match create_set(repo, set).await {
            Ok(created) => outcome.created.push(created),
            Err(err) => {
                log::warn!("bulk create: item {} rejected: {}", index, err);
                outcome.errors.push(BulkCreateError {
                    index,
                    error: err.to_string(),
                });
            }
        }
    }

    Ok(outcome)
}

/// Fetch a set by id with resolved exercise references.
pub async fn get_set(
    repo: &dyn FullRepository,
    id: i64,
) -> RepositoryResult<Option<SetWithExercises>> {
    repo.get_set_by_id(id).await
}

/// Fetch a user's sets, newest-first, paginated.
pub async fn get_sets_by_user(
    repo: &dyn FullRepository,
    user_id: i64,
    limit: i64,
    offset: i64,
) -> RepositoryResult<Vec<SetWithExercises>> {
    repo.get_sets_by_user(user_id, limit, offset).await
}

/// Fetch a user's sets for one exercise, counting superset partner usage.
pub async fn get_sets_by_user_and_exercise(
    repo: &dyn FullRepository,
    user_id: i64,
    exercise_id: i64,
    limit: i64,
) -> RepositoryResult<Vec<SetWithExercises>> {
    repo.get_sets_by_user_and_exercise(user_id, exercise_id, limit)
        .await
}

/// Fetch all sets in a workout session, in workout order.
pub async fn get_sets_by_session(
    repo: &dyn FullRepository,
    workout_session_id: i64,
) -> RepositoryResult<Vec<SetWithExercises>> {
    repo.get_sets_by_session(workout_session_id).await
}

/// Apply a partial update to a set.
///
/// The repository merges the update over the stored record and re-runs the
/// full variant validator on the merged result inside its critical section,
/// so changing `set_type` without supplying the fields the new variant
/// requires is rejected rather than persisted inconsistently.
pub async fn update_set(
    repo: &dyn FullRepository,
    id: i64,
    update: &SetUpdate,
) -> RepositoryResult<Option<Set>> {
    if update.is_empty() {
        return Err(RepositoryError::validation(vec![
            "No fields to update".to_string(),
        ]));
    }

    repo.update_set(id, update).await
}

/// Delete a set by id. Returns true if a row was removed.
pub async fn delete_set(repo: &dyn FullRepository, id: i64) -> RepositoryResult<bool> {
    repo.delete_set(id).await
}

/// Compute workout statistics over the user's completed sets within the
/// last `days` days.
pub async fn get_user_workout_stats(
    repo: &dyn FullRepository,
    user_id: i64,
    days: i64,
) -> RepositoryResult<WorkoutStats> {
    let cutoff = Utc::now() - Duration::days(days);
    let sets = repo.fetch_completed_sets_since(user_id, cutoff).await?;
    Ok(compute_workout_stats(&sets, days))
}

/// Check that the storage backend is reachable.
pub async fn health_check(repo: &dyn FullRepository) -> RepositoryResult<bool> {
    repo.health_check().await
}
