//! HTTP handlers for the REST API.
//!
//! Each handler parses the request, delegates to the service layer, and
//! wraps the outcome in the response envelope. Path and query numbers are
//! taken as raw strings so a malformed id yields an enveloped 400 before
//! any repository work happens.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{
    BulkCreateRequest, Envelope, ExerciseQuery, HealthResponse, PageQuery, Pagination, StatsQuery,
};
use super::error::{ApiJson, AppError};
use super::state::AppState;
use crate::db::services as db_services;
use crate::db::BulkCreateOutcome;
use crate::models::{NewSet, Set, SetUpdate, SetWithExercises};
use crate::services::stats::WorkoutStats;

/// Result type for handlers.
pub type EnvelopeResult<T> = Result<(StatusCode, Json<Envelope<T>>), AppError>;

const DEFAULT_USER_LIMIT: i64 = 50;
const DEFAULT_EXERCISE_LIMIT: i64 = 20;
const DEFAULT_STATS_DAYS: i64 = 30;

fn parse_id(name: &str, raw: &str) -> Result<i64, AppError> {
    raw.parse::<i64>()
        .map_err(|_| AppError::BadRequest(format!("Invalid {}: {}", name, raw)))
}

fn parse_or_default(name: &str, raw: Option<&String>, default: i64) -> Result<i64, AppError> {
    match raw {
        Some(value) => parse_id(name, value),
        None => Ok(default),
    }
}

/// GET /health
///
/// Reports process liveness and storage connectivity.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (status, database) = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => (StatusCode::OK, "connected".to_string()),
        Ok(false) => (StatusCode::SERVICE_UNAVAILABLE, "disconnected".to_string()),
        Err(e) => (StatusCode::SERVICE_UNAVAILABLE, format!("error: {}", e)),
    };

    (
        status,
        Json(HealthResponse {
            status: "ok".to_string(),
            database,
        }),
    )
}

/// POST /sets
pub async fn create_set(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<NewSet>,
) -> EnvelopeResult<Set> {
    let created = db_services::create_set(state.repository.as_ref(), &payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::ok("Set created successfully", created)),
    ))
}

/// POST /sets/bulk
///
/// Each item is validated and persisted independently; the response reports
/// both created sets and per-index failures. 201 when at least one item
/// succeeded, 400 otherwise.
pub async fn bulk_create_sets(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<BulkCreateRequest>,
) -> EnvelopeResult<BulkCreateOutcome> {
    if payload.sets.is_empty() {
        return Err(AppError::BadRequest(
            "Sets array is required and cannot be empty".to_string(),
        ));
    }

    let outcome = db_services::bulk_create_sets(state.repository.as_ref(), &payload.sets).await?;

    let any_created = !outcome.created.is_empty();
    let status = if any_created {
        StatusCode::CREATED
    } else {
        StatusCode::BAD_REQUEST
    };
    let mut message = format!("{} sets created successfully", outcome.created.len());
    if !outcome.errors.is_empty() {
        message.push_str(&format!(", {} failed", outcome.errors.len()));
    }

    let mut envelope = Envelope::ok(message, outcome);
    envelope.success = any_created;
    Ok((status, Json(envelope)))
}

/// GET /sets/{id}
pub async fn get_set(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> EnvelopeResult<SetWithExercises> {
    let id = parse_id("set ID", &id)?;
    match db_services::get_set(state.repository.as_ref(), id).await? {
        Some(set) => Ok((
            StatusCode::OK,
            Json(Envelope::ok("Set retrieved successfully", set)),
        )),
        None => Err(AppError::NotFound("Set not found".to_string())),
    }
}

/// PUT /sets/{id}
pub async fn update_set(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<SetUpdate>,
) -> EnvelopeResult<Set> {
    let id = parse_id("set ID", &id)?;
    match db_services::update_set(state.repository.as_ref(), id, &payload).await? {
        Some(updated) => Ok((
            StatusCode::OK,
            Json(Envelope::ok("Set updated successfully", updated)),
        )),
        None => Err(AppError::NotFound("Set not found".to_string())),
    }
}

/// DELETE /sets/{id}
pub async fn delete_set(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> EnvelopeResult<()> {
    let id = parse_id("set ID", &id)?;
    if db_services::delete_set(state.repository.as_ref(), id).await? {
        Ok((
            StatusCode::OK,
            Json(Envelope::ok("Set deleted successfully", ())),
        ))
    } else {
        Err(AppError::NotFound("Set not found".to_string()))
    }
}

/// GET /sets/user/{user_id}?limit&offset
pub async fn get_sets_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> EnvelopeResult<Vec<SetWithExercises>> {
    let user_id = parse_id("user ID", &user_id)?;
    let limit = parse_or_default("limit", query.limit.as_ref(), DEFAULT_USER_LIMIT)?;
    let offset = parse_or_default("offset", query.offset.as_ref(), 0)?;

    let sets =
        db_services::get_sets_by_user(state.repository.as_ref(), user_id, limit, offset).await?;
    let count = sets.len();
    Ok((
        StatusCode::OK,
        Json(
            Envelope::ok("Sets retrieved successfully", sets).with_pagination(Pagination {
                limit,
                offset,
                count,
            }),
        ),
    ))
}

/// GET /sets/user/{user_id}/exercise/{exercise_id}?limit
///
/// Sets where the exercise appears as the primary or the superset partner.
pub async fn get_sets_by_exercise(
    State(state): State<AppState>,
    Path((user_id, exercise_id)): Path<(String, String)>,
    Query(query): Query<ExerciseQuery>,
) -> EnvelopeResult<Vec<SetWithExercises>> {
    let user_id = parse_id("user ID", &user_id)?;
    let exercise_id = parse_id("exercise ID", &exercise_id)?;
    let limit = parse_or_default("limit", query.limit.as_ref(), DEFAULT_EXERCISE_LIMIT)?;

    let sets = db_services::get_sets_by_user_and_exercise(
        state.repository.as_ref(),
        user_id,
        exercise_id,
        limit,
    )
    .await?;
    let count = sets.len();
    Ok((
        StatusCode::OK,
        Json(Envelope::ok("Exercise sets retrieved successfully", sets).with_count(count)),
    ))
}

/// GET /sets/session/{workout_session_id}
pub async fn get_sets_by_session(
    State(state): State<AppState>,
    Path(workout_session_id): Path<String>,
) -> EnvelopeResult<Vec<SetWithExercises>> {
    let workout_session_id = parse_id("workout session ID", &workout_session_id)?;
    let sets =
        db_services::get_sets_by_session(state.repository.as_ref(), workout_session_id).await?;
    let count = sets.len();
    Ok((
        StatusCode::OK,
        Json(Envelope::ok("Workout session sets retrieved successfully", sets).with_count(count)),
    ))
}

/// GET /sets/user/{user_id}/stats?days
pub async fn get_user_workout_stats(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<StatsQuery>,
) -> EnvelopeResult<WorkoutStats> {
    let user_id = parse_id("user ID", &user_id)?;
    let days = parse_or_default("days", query.days.as_ref(), DEFAULT_STATS_DAYS)?;
    if days <= 0 {
        return Err(AppError::BadRequest(format!("Invalid days: {}", days)));
    }

    let stats =
        db_services::get_user_workout_stats(state.repository.as_ref(), user_id, days).await?;
    Ok((
        StatusCode::OK,
        Json(Envelope::ok(
            "Workout statistics retrieved successfully",
            stats,
        )),
    ))
}
