//! Repository trait definitions and error types.
//!
//! The traits here define the abstract storage interface the service layer
//! works against; concrete backends live in [`crate::db::repositories`].

pub mod error;
pub mod lookups;
pub mod sets;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};
pub use lookups::{ExerciseLookup, FullRepository, UserLookup};
pub use sets::SetRepository;
