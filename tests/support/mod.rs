//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use gymlog_rust::db::repositories::LocalRepository;
use gymlog_rust::models::{Exercise, NewSet, RepsData, SetType, WeightData};

pub const USER_ID: i64 = 1;
pub const BENCH_PRESS: i64 = 3;
pub const CABLE_FLY: i64 = 5;
pub const SQUAT: i64 = 7;

/// Repository seeded with one user and a few exercises.
pub fn seeded_repo() -> Arc<LocalRepository> {
    let repo = LocalRepository::new();
    repo.insert_user(USER_ID);
    repo.insert_exercise(Exercise {
        id: BENCH_PRESS,
        name: "Bench Press".to_string(),
        category: "chest".to_string(),
    });
    repo.insert_exercise(Exercise {
        id: CABLE_FLY,
        name: "Cable Fly".to_string(),
        category: "chest".to_string(),
    });
    repo.insert_exercise(Exercise {
        id: SQUAT,
        name: "Squat".to_string(),
        category: "legs".to_string(),
    });
    Arc::new(repo)
}

/// A valid normal set: 100 kg x 10 reps of bench press.
pub fn normal_set() -> NewSet {
    NewSet {
        user_id: USER_ID,
        workout_session_id: None,
        set_number: 1,
        set_type: SetType::Normal,
        exercise_id: BENCH_PRESS,
        superset_exercise_id: None,
        weight: WeightData::primary(100.0),
        reps: RepsData::primary(10),
        drop_weight: None,
        drop_reps: None,
        note: None,
        completed: None,
    }
}

/// A valid superset: bench press paired with cable fly.
pub fn superset_set() -> NewSet {
    NewSet {
        set_type: SetType::Superset,
        superset_exercise_id: Some(CABLE_FLY),
        weight: WeightData::with_secondary(50.0, 30.0),
        reps: RepsData::with_secondary(10, 12),
        ..normal_set()
    }
}

/// A valid dropset with both drop fields present.
pub fn dropset_set() -> NewSet {
    NewSet {
        set_type: SetType::Dropset,
        weight: WeightData::primary(80.0),
        reps: RepsData::primary(8),
        drop_weight: Some(60.0),
        drop_reps: Some(6),
        ..normal_set()
    }
}
