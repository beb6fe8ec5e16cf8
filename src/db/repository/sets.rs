//! Set repository trait for durable storage of logged sets.
//!
//! Implementations translate the semi-structured `{primary, secondary?}`
//! weight/reps shapes to and from their storage representation and enforce
//! referential integrity against the user and exercise tables.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::error::RepositoryResult;
use crate::models::{NewSet, Set, SetUpdate, SetWithExercises};

/// Repository trait for set persistence and retrieval.
///
/// Ordering guarantees:
/// - User listings are newest-first (creation time descending).
/// - Session listings are `set_number` ascending, then creation time.
///
/// Single-set mutations are atomic: a failed create or update leaves no row
/// written.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait SetRepository: Send + Sync {
    /// Persist a new set and return it with generated id and timestamps.
    ///
    /// The payload is assumed structurally valid (the service layer runs the
    /// validator first); implementations still fail with
    /// `RepositoryError::ConstraintError` when a referenced user or exercise
    /// does not exist.
    async fn create_set(&self, set: &NewSet) -> RepositoryResult<Set>;

    /// Fetch a set by id with resolved exercise references, or `None`.
    async fn get_set_by_id(&self, id: i64) -> RepositoryResult<Option<SetWithExercises>>;

    /// Fetch a user's sets, newest-first, paginated.
    async fn get_sets_by_user(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> RepositoryResult<Vec<SetWithExercises>>;

    /// Fetch a user's sets where the exercise appears as either the primary
    /// or the superset partner exercise, newest-first.
    async fn get_sets_by_user_and_exercise(
        &self,
        user_id: i64,
        exercise_id: i64,
        limit: i64,
    ) -> RepositoryResult<Vec<SetWithExercises>>;

    /// Fetch all sets in a workout session, ordered by `set_number`
    /// ascending, then creation time.
    async fn get_sets_by_session(
        &self,
        workout_session_id: i64,
    ) -> RepositoryResult<Vec<SetWithExercises>>;

    /// Apply a partial update. Returns the updated set, or `None` if the id
    /// does not exist. Implementations merge the update over the stored row
    /// and run the full variant validator on the merged record inside their
    /// critical section (lock or transaction), failing with
    /// `RepositoryError::ValidationError` so no concurrent writer can
    /// produce an unvalidated combination.
    async fn update_set(&self, id: i64, update: &SetUpdate) -> RepositoryResult<Option<Set>>;

    /// Delete a set by id. Returns true if a row was removed.
    async fn delete_set(&self, id: i64) -> RepositoryResult<bool>;

    /// Fetch a user's completed sets created at or after `cutoff`, as input
    /// for statistics aggregation.
    async fn fetch_completed_sets_since(
        &self,
        user_id: i64,
        cutoff: DateTime<Utc>,
    ) -> RepositoryResult<Vec<SetWithExercises>>;

    /// Check that the storage backend is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;
}
