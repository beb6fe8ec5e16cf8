//! Domain models for logged sets and their validation rules.

pub mod set;
pub mod validation;

pub use set::{
    Exercise, NewSet, RepsData, Set, SetType, SetUpdate, SetWithExercises, WeightData,
};
pub use validation::{validate_new_set, SetValidation};
