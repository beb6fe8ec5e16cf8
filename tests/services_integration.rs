//! Service-layer integration tests against the in-memory repository.

mod support;

use gymlog_rust::db::repository::RepositoryError;
use gymlog_rust::db::services;
use gymlog_rust::models::{NewSet, RepsData, SetType, SetUpdate, WeightData};

use support::{dropset_set, normal_set, seeded_repo, superset_set, BENCH_PRESS, CABLE_FLY, SQUAT, USER_ID};

#[tokio::test]
async fn test_create_then_fetch_round_trip() {
    let repo = seeded_repo();
    let created = services::create_set(repo.as_ref(), &normal_set())
        .await
        .unwrap();

    let fetched = services::get_set(repo.as_ref(), created.id)
        .await
        .unwrap()
        .expect("set should exist");
    assert_eq!(fetched.set, created);
    assert_eq!(
        fetched.exercise.as_ref().map(|e| e.name.as_str()),
        Some("Bench Press")
    );
    assert!(fetched.superset_exercise.is_none());
}

#[tokio::test]
async fn test_superset_resolves_both_exercises() {
    let repo = seeded_repo();
    let created = services::create_set(repo.as_ref(), &superset_set())
        .await
        .unwrap();

    let fetched = services::get_set(repo.as_ref(), created.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        fetched.superset_exercise.as_ref().map(|e| e.name.as_str()),
        Some("Cable Fly")
    );
}

#[tokio::test]
async fn test_validation_surfaces_all_violations() {
    let repo = seeded_repo();
    let invalid = NewSet {
        set_number: 0,
        weight: WeightData::primary(0.0),
        reps: RepsData::primary(0),
        ..normal_set()
    };

    let err = services::create_set(repo.as_ref(), &invalid)
        .await
        .unwrap_err();
    assert_eq!(
        err.violations(),
        [
            "Set number must be positive",
            "Primary weight must be positive",
            "Primary reps must be positive",
        ]
    );
}

#[tokio::test]
async fn test_dropset_round_trip_keeps_drop_fields() {
    let repo = seeded_repo();
    let created = services::create_set(repo.as_ref(), &dropset_set())
        .await
        .unwrap();
    assert_eq!(created.drop_weight, Some(60.0));
    assert_eq!(created.drop_reps, Some(6));
}

#[tokio::test]
async fn test_pagination_windows_do_not_overlap() {
    let repo = seeded_repo();
    let mut ids = Vec::new();
    for i in 1..=4 {
        let set = NewSet {
            set_number: i,
            ..normal_set()
        };
        ids.push(
            services::create_set(repo.as_ref(), &set)
                .await
                .unwrap()
                .id,
        );
    }

    let first = services::get_sets_by_user(repo.as_ref(), USER_ID, 2, 0)
        .await
        .unwrap();
    let second = services::get_sets_by_user(repo.as_ref(), USER_ID, 2, 2)
        .await
        .unwrap();

    let first_ids: Vec<i64> = first.iter().map(|s| s.set.id).collect();
    let second_ids: Vec<i64> = second.iter().map(|s| s.set.id).collect();
    assert_eq!(first_ids.len(), 2);
    assert_eq!(second_ids.len(), 2);
    assert!(first_ids.iter().all(|id| !second_ids.contains(id)));

    // Newest-first across both pages.
    let mut combined = first_ids.clone();
    combined.extend(&second_ids);
    let mut expected = ids.clone();
    expected.reverse();
    assert_eq!(combined, expected);
}

#[tokio::test]
async fn test_exercise_filter_matches_primary_and_partner() {
    let repo = seeded_repo();
    services::create_set(repo.as_ref(), &normal_set())
        .await
        .unwrap();
    services::create_set(repo.as_ref(), &superset_set())
        .await
        .unwrap();
    let squat = NewSet {
        exercise_id: SQUAT,
        ..normal_set()
    };
    services::create_set(repo.as_ref(), &squat).await.unwrap();

    let bench = services::get_sets_by_user_and_exercise(repo.as_ref(), USER_ID, BENCH_PRESS, 20)
        .await
        .unwrap();
    assert_eq!(bench.len(), 2);

    // Cable fly only ever appears as the superset partner.
    let fly = services::get_sets_by_user_and_exercise(repo.as_ref(), USER_ID, CABLE_FLY, 20)
        .await
        .unwrap();
    assert_eq!(fly.len(), 1);
    assert_eq!(fly[0].set.set_type, SetType::Superset);
}

#[tokio::test]
async fn test_bulk_create_mixed_outcome() {
    let repo = seeded_repo();
    let batch = vec![
        normal_set(),
        NewSet {
            reps: RepsData::primary(-1),
            ..normal_set()
        },
        dropset_set(),
    ];

    let outcome = services::bulk_create_sets(repo.as_ref(), &batch)
        .await
        .unwrap();
    assert_eq!(outcome.created.len(), 2);
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].index, 1);

    // The two valid sets are durably stored.
    let stored = services::get_sets_by_user(repo.as_ref(), USER_ID, 50, 0)
        .await
        .unwrap();
    assert_eq!(stored.len(), 2);
}

#[tokio::test]
async fn test_update_then_delete_idempotence() {
    let repo = seeded_repo();
    let created = services::create_set(repo.as_ref(), &normal_set())
        .await
        .unwrap();

    let update = SetUpdate {
        weight: Some(WeightData::primary(102.5)),
        ..Default::default()
    };
    let updated = services::update_set(repo.as_ref(), created.id, &update)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.weight.primary, 102.5);

    assert!(services::delete_set(repo.as_ref(), created.id).await.unwrap());
    assert!(!services::delete_set(repo.as_ref(), created.id).await.unwrap());
    assert!(services::get_set(repo.as_ref(), created.id)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_update_cannot_leave_variant_inconsistent() {
    let repo = seeded_repo();
    let created = services::create_set(repo.as_ref(), &superset_set())
        .await
        .unwrap();

    // Dropping to a normal set while the superset fields remain must fail.
    let update = SetUpdate {
        set_type: Some(SetType::Normal),
        ..Default::default()
    };
    let err = services::update_set(repo.as_ref(), created.id, &update)
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::ValidationError { .. }));
}

#[tokio::test]
async fn test_update_superset_to_normal_with_explicit_nulls() {
    let repo = seeded_repo();
    let created = services::create_set(repo.as_ref(), &superset_set())
        .await
        .unwrap();

    let update = SetUpdate {
        set_type: Some(SetType::Normal),
        superset_exercise_id: Some(None),
        weight: Some(WeightData::primary(50.0)),
        reps: Some(RepsData::primary(10)),
        ..Default::default()
    };
    let updated = services::update_set(repo.as_ref(), created.id, &update)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.set_type, SetType::Normal);
    assert_eq!(updated.superset_exercise_id, None);
    assert_eq!(updated.weight.secondary, None);
    assert_eq!(updated.reps.secondary, None);
}

#[tokio::test]
async fn test_stats_scenario_favorites_and_volume() {
    let repo = seeded_repo();
    for _ in 0..3 {
        services::create_set(repo.as_ref(), &normal_set())
            .await
            .unwrap();
    }
    for _ in 0..2 {
        let b = NewSet {
            exercise_id: SQUAT,
            weight: WeightData::primary(50.0),
            reps: RepsData::primary(8),
            ..normal_set()
        };
        services::create_set(repo.as_ref(), &b).await.unwrap();
    }

    let stats = services::get_user_workout_stats(repo.as_ref(), USER_ID, 30)
        .await
        .unwrap();
    assert_eq!(stats.total_sets, 5);
    assert_eq!(stats.unique_exercises, 2);
    assert_eq!(stats.total_volume_lifted, 3.0 * 1000.0 + 2.0 * 400.0);
    assert_eq!(stats.period_days, 30);

    assert_eq!(stats.favorite_exercises[0].exercise_id, BENCH_PRESS);
    assert_eq!(stats.favorite_exercises[0].total_sets, 3);
    assert_eq!(stats.favorite_exercises[1].exercise_id, SQUAT);
    assert_eq!(stats.favorite_exercises[1].total_sets, 2);
}
