//! In-memory repository implementation.
//!
//! `LocalRepository` backs unit tests and local development. It enforces the
//! same referential-integrity contract as the Postgres backend (unknown user
//! or exercise ids fail with `ConstraintError`) and the same ordering
//! guarantees, with ids as deterministic tie-breakers.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};

use crate::db::repository::{
    ErrorContext, ExerciseLookup, RepositoryError, RepositoryResult, SetRepository, UserLookup,
};
use crate::models::{validate_new_set, Exercise, NewSet, Set, SetUpdate, SetWithExercises};

#[derive(Debug, Default)]
struct Inner {
    sets: BTreeMap<i64, Set>,
    exercises: BTreeMap<i64, Exercise>,
    users: BTreeSet<i64>,
    next_set_id: i64,
}

/// In-memory repository for unit testing and local development.
#[derive(Debug, Default)]
pub struct LocalRepository {
    inner: RwLock<Inner>,
}

impl LocalRepository {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                next_set_id: 1,
                ..Default::default()
            }),
        }
    }

    /// Seed a user. User CRUD itself is outside this core; the repository
    /// only needs known ids for foreign-key checks.
    pub fn insert_user(&self, user_id: i64) {
        self.inner.write().users.insert(user_id);
    }

    /// Seed an exercise for foreign-key checks and display resolution.
    pub fn insert_exercise(&self, exercise: Exercise) {
        self.inner.write().exercises.insert(exercise.id, exercise);
    }

    /// Override a set's creation timestamp. Intended for tests that need
    /// history older than the statistics window.
    pub fn backdate_set(&self, set_id: i64, created_at: DateTime<Utc>) -> bool {
        let mut inner = self.inner.write();
        match inner.sets.get_mut(&set_id) {
            Some(set) => {
                set.created_at = created_at;
                true
            }
            None => false,
        }
    }

    fn check_references(inner: &Inner, set: &NewSet) -> RepositoryResult<()> {
        if !inner.users.contains(&set.user_id) {
            return Err(RepositoryError::constraint_with_context(
                "Referenced user does not exist",
                ErrorContext::new("create_set")
                    .with_entity("user")
                    .with_entity_id(set.user_id),
            ));
        }
        if !inner.exercises.contains_key(&set.exercise_id) {
            return Err(RepositoryError::constraint_with_context(
                "Referenced exercise does not exist",
                ErrorContext::new("create_set")
                    .with_entity("exercise")
                    .with_entity_id(set.exercise_id),
            ));
        }
        if let Some(superset_id) = set.superset_exercise_id {
            if !inner.exercises.contains_key(&superset_id) {
                return Err(RepositoryError::constraint_with_context(
                    "Referenced superset exercise does not exist",
                    ErrorContext::new("create_set")
                        .with_entity("exercise")
                        .with_entity_id(superset_id),
                ));
            }
        }
        Ok(())
    }

    fn resolve(inner: &Inner, set: &Set) -> SetWithExercises {
        SetWithExercises {
            set: set.clone(),
            exercise: inner.exercises.get(&set.exercise_id).cloned(),
            superset_exercise: set
                .superset_exercise_id
                .and_then(|id| inner.exercises.get(&id).cloned()),
        }
    }

    /// Newest-first with id as the tie-breaker, so pagination is stable even
    /// when several sets share a timestamp.
    fn sort_newest_first(sets: &mut [SetWithExercises]) {
        sets.sort_by(|a, b| {
            b.set
                .created_at
                .cmp(&a.set.created_at)
                .then(b.set.id.cmp(&a.set.id))
        });
    }
}

#[async_trait]
impl SetRepository for LocalRepository {
    async fn create_set(&self, set: &NewSet) -> RepositoryResult<Set> {
        let mut inner = self.inner.write();
        Self::check_references(&inner, set)?;

        let id = inner.next_set_id;
        inner.next_set_id += 1;
        let now = Utc::now();

        let stored = Set {
            id,
            user_id: set.user_id,
            workout_session_id: set.workout_session_id,
            set_number: set.set_number,
            set_type: set.set_type,
            exercise_id: set.exercise_id,
            superset_exercise_id: set.superset_exercise_id,
            weight: set.weight,
            reps: set.reps,
            drop_weight: set.drop_weight,
            drop_reps: set.drop_reps,
            note: set.note.clone(),
            completed: set.completed.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };
        inner.sets.insert(id, stored.clone());
        Ok(stored)
    }

    async fn get_set_by_id(&self, id: i64) -> RepositoryResult<Option<SetWithExercises>> {
        let inner = self.inner.read();
        Ok(inner.sets.get(&id).map(|set| Self::resolve(&inner, set)))
    }

    async fn get_sets_by_user(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> RepositoryResult<Vec<SetWithExercises>> {
        let inner = self.inner.read();
        let mut sets: Vec<SetWithExercises> = inner
            .sets
            .values()
            .filter(|s| s.user_id == user_id)
            .map(|s| Self::resolve(&inner, s))
            .collect();
        Self::sort_newest_first(&mut sets);

        let offset = offset.max(0) as usize;
        let limit = limit.max(0) as usize;
        Ok(sets.into_iter().skip(offset).take(limit).collect())
    }

    async fn get_sets_by_user_and_exercise(
        &self,
        user_id: i64,
        exercise_id: i64,
        limit: i64,
    ) -> RepositoryResult<Vec<SetWithExercises>> {
        let inner = self.inner.read();
        let mut sets: Vec<SetWithExercises> = inner
            .sets
            .values()
            .filter(|s| {
                s.user_id == user_id
                    && (s.exercise_id == exercise_id
                        || s.superset_exercise_id == Some(exercise_id))
            })
            .map(|s| Self::resolve(&inner, s))
            .collect();
        Self::sort_newest_first(&mut sets);
        Ok(sets.into_iter().take(limit.max(0) as usize).collect())
    }

    async fn get_sets_by_session(
        &self,
        workout_session_id: i64,
    ) -> RepositoryResult<Vec<SetWithExercises>> {
        let inner = self.inner.read();
        let mut sets: Vec<SetWithExercises> = inner
            .sets
            .values()
            .filter(|s| s.workout_session_id == Some(workout_session_id))
            .map(|s| Self::resolve(&inner, s))
            .collect();
        sets.sort_by(|a, b| {
            a.set
                .set_number
                .cmp(&b.set.set_number)
                .then(a.set.created_at.cmp(&b.set.created_at))
                .then(a.set.id.cmp(&b.set.id))
        });
        Ok(sets)
    }

    async fn update_set(&self, id: i64, update: &SetUpdate) -> RepositoryResult<Option<Set>> {
        let mut inner = self.inner.write();
        let existing = match inner.sets.get(&id) {
            Some(set) => set.clone(),
            None => return Ok(None),
        };

        // Merge and validate under the write lock, so a concurrent update
        // cannot slip an unvalidated combination into the stored record.
        let merged = update.merge_into(&existing);
        validate_new_set(&merged)
            .into_result()
            .map_err(RepositoryError::validation)?;
        Self::check_references(&inner, &merged)?;

        let updated = Set {
            id: existing.id,
            user_id: merged.user_id,
            workout_session_id: merged.workout_session_id,
            set_number: merged.set_number,
            set_type: merged.set_type,
            exercise_id: merged.exercise_id,
            superset_exercise_id: merged.superset_exercise_id,
            weight: merged.weight,
            reps: merged.reps,
            drop_weight: merged.drop_weight,
            drop_reps: merged.drop_reps,
            note: merged.note,
            completed: merged.completed.unwrap_or(existing.completed),
            created_at: existing.created_at,
            updated_at: Utc::now(),
        };
        inner.sets.insert(id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete_set(&self, id: i64) -> RepositoryResult<bool> {
        Ok(self.inner.write().sets.remove(&id).is_some())
    }

    async fn fetch_completed_sets_since(
        &self,
        user_id: i64,
        cutoff: DateTime<Utc>,
    ) -> RepositoryResult<Vec<SetWithExercises>> {
        let inner = self.inner.read();
        let mut sets: Vec<SetWithExercises> = inner
            .sets
            .values()
            .filter(|s| s.user_id == user_id && s.completed && s.created_at >= cutoff)
            .map(|s| Self::resolve(&inner, s))
            .collect();
        Self::sort_newest_first(&mut sets);
        Ok(sets)
    }

    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(true)
    }
}

#[async_trait]
impl ExerciseLookup for LocalRepository {
    async fn exercise_exists(&self, exercise_id: i64) -> RepositoryResult<bool> {
        Ok(self.inner.read().exercises.contains_key(&exercise_id))
    }

    async fn get_exercise(&self, exercise_id: i64) -> RepositoryResult<Option<Exercise>> {
        Ok(self.inner.read().exercises.get(&exercise_id).cloned())
    }
}

#[async_trait]
impl UserLookup for LocalRepository {
    async fn user_exists(&self, user_id: i64) -> RepositoryResult<bool> {
        Ok(self.inner.read().users.contains(&user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RepsData, SetType, WeightData};
    use chrono::Duration;

    fn seeded_repo() -> LocalRepository {
        let repo = LocalRepository::new();
        repo.insert_user(1);
        repo.insert_exercise(Exercise {
            id: 3,
            name: "Bench Press".to_string(),
            category: "chest".to_string(),
        });
        repo.insert_exercise(Exercise {
            id: 5,
            name: "Cable Fly".to_string(),
            category: "chest".to_string(),
        });
        repo
    }

    fn normal_set(user_id: i64, exercise_id: i64) -> NewSet {
        NewSet {
            user_id,
            workout_session_id: None,
            set_number: 1,
            set_type: SetType::Normal,
            exercise_id,
            superset_exercise_id: None,
            weight: WeightData::primary(100.0),
            reps: RepsData::primary(10),
            drop_weight: None,
            drop_reps: None,
            note: None,
            completed: None,
        }
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_user() {
        let repo = seeded_repo();
        let err = repo.create_set(&normal_set(99, 3)).await.unwrap_err();
        assert!(matches!(err, RepositoryError::ConstraintError { .. }));
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_exercise() {
        let repo = seeded_repo();
        let err = repo.create_set(&normal_set(1, 99)).await.unwrap_err();
        assert!(matches!(err, RepositoryError::ConstraintError { .. }));
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_superset_exercise() {
        let repo = seeded_repo();
        let set = NewSet {
            set_type: SetType::Superset,
            superset_exercise_id: Some(42),
            weight: WeightData::with_secondary(50.0, 30.0),
            reps: RepsData::with_secondary(10, 12),
            ..normal_set(1, 3)
        };
        let err = repo.create_set(&set).await.unwrap_err();
        assert!(matches!(err, RepositoryError::ConstraintError { .. }));
    }

    #[tokio::test]
    async fn test_completed_defaults_true() {
        let repo = seeded_repo();
        let created = repo.create_set(&normal_set(1, 3)).await.unwrap();
        assert!(created.completed);
    }

    #[tokio::test]
    async fn test_stats_window_excludes_old_and_incomplete_sets() {
        let repo = seeded_repo();

        let in_window = repo.create_set(&normal_set(1, 3)).await.unwrap();
        let out_of_window = repo.create_set(&normal_set(1, 3)).await.unwrap();
        repo.backdate_set(out_of_window.id, Utc::now() - Duration::days(60));
        let incomplete = NewSet {
            completed: Some(false),
            ..normal_set(1, 3)
        };
        repo.create_set(&incomplete).await.unwrap();

        let cutoff = Utc::now() - Duration::days(30);
        let counted = repo.fetch_completed_sets_since(1, cutoff).await.unwrap();
        assert_eq!(counted.len(), 1);
        assert_eq!(counted[0].set.id, in_window.id);
    }

    #[tokio::test]
    async fn test_update_rejects_invalid_merged_record() {
        let repo = seeded_repo();
        let created = repo.create_set(&normal_set(1, 3)).await.unwrap();

        // The variant check runs against the stored row under the write
        // lock, so a type change without the superset fields never lands.
        let update = SetUpdate {
            set_type: Some(SetType::Superset),
            ..Default::default()
        };
        let err = repo.update_set(created.id, &update).await.unwrap_err();
        assert!(matches!(err, RepositoryError::ValidationError { .. }));

        let stored = repo.get_set_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(stored.set.set_type, SetType::Normal);
    }

    #[tokio::test]
    async fn test_session_ordering_by_set_number_then_creation() {
        let repo = seeded_repo();
        for set_number in [3, 1, 2] {
            let set = NewSet {
                workout_session_id: Some(9),
                set_number,
                ..normal_set(1, 3)
            };
            repo.create_set(&set).await.unwrap();
        }

        let sets = repo.get_sets_by_session(9).await.unwrap();
        let numbers: Vec<i32> = sets.iter().map(|s| s.set.set_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }
}
