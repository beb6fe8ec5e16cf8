//! Domain computations that are independent of storage and transport.

pub mod stats;

pub use stats::{compute_workout_stats, DayActivity, FavoriteExercise, SetTypeCounts, WorkoutStats};
