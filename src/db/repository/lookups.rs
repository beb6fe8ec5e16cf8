//! Lookup contracts for the user and exercise collaborators.
//!
//! User and exercise CRUD is out of this core's scope; the set subsystem only
//! needs existence checks for foreign-key validation and exercise details for
//! display resolution.

use async_trait::async_trait;

use super::error::RepositoryResult;
use super::sets::SetRepository;
use crate::models::Exercise;

/// Exercise lookup contract.
#[async_trait]
pub trait ExerciseLookup: Send + Sync {
    /// True if the exercise exists.
    async fn exercise_exists(&self, exercise_id: i64) -> RepositoryResult<bool>;

    /// Fetch an exercise's display details, or `None`.
    async fn get_exercise(&self, exercise_id: i64) -> RepositoryResult<Option<Exercise>>;
}

/// User lookup contract.
#[async_trait]
pub trait UserLookup: Send + Sync {
    /// True if the user exists.
    async fn user_exists(&self, user_id: i64) -> RepositoryResult<bool>;
}

/// Full repository: set persistence plus the collaborator lookups.
pub trait FullRepository: SetRepository + ExerciseLookup + UserLookup {}

impl<T> FullRepository for T where T: SetRepository + ExerciseLookup + UserLookup {}
