//! Postgres repository implementation using Diesel.
//!
//! This module implements the repository traits against a Postgres database.
//! The semi-structured weight/reps shapes are stored as `jsonb` columns and
//! decoded on read; exercise display names are resolved with left joins
//! against the exercises table (twice for supersets, via a table alias).
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Automatic migration execution
//! - Referential integrity via foreign keys (cascade rules in migrations)
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::time::Duration;
use tokio::task;

use crate::db::repository::{
    ErrorContext, ExerciseLookup, RepositoryError, RepositoryResult, SetRepository, UserLookup,
};
use crate::models::{validate_new_set, Exercise, NewSet, Set, SetUpdate, SetWithExercises};

mod models;
mod schema;

use models::{ExerciseRow, NewSetRow, SetChangeset, SetRow};

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

diesel::alias!(schema::exercises as superset_exercises: SupersetExercises);

/// Exercise columns selected when resolving display references.
type ExerciseTuple = (i64, String, String);

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Minimum number of connections in the pool
    pub min_pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_sec: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_sec: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
        }
    }
}

impl PostgresConfig {
    /// Create configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        let max_pool_size = std::env::var("PG_POOL_MAX")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);

        let min_pool_size = std::env::var("PG_POOL_MIN")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(1);

        let connection_timeout_sec = std::env::var("PG_CONN_TIMEOUT_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        let idle_timeout_sec = std::env::var("PG_IDLE_TIMEOUT_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(600);

        Ok(Self {
            database_url,
            max_pool_size,
            min_pool_size,
            connection_timeout_sec,
            idle_timeout_sec,
        })
    }

    /// Create a new configuration with a database URL.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }
}

/// Diesel-backed repository for Postgres.
#[derive(Clone)]
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Create a new repository and run pending migrations.
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true) // Validate connections before use
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        // Run migrations once during initialization
        {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection_for_migrations"),
                )
            })?;
            Self::run_migrations(&mut conn)?;
        }

        Ok(Self { pool })
    }

    /// Run pending database migrations.
    fn run_migrations(conn: &mut PgConnection) -> RepositoryResult<()> {
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Migration failed: {}", e),
                ErrorContext::new("run_migrations"),
            )
        })?;
        Ok(())
    }

    /// Run a blocking Diesel closure on the runtime's blocking pool.
    async fn with_conn<R, F>(&self, operation: &'static str, f: F) -> RepositoryResult<R>
    where
        R: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<R> + Send + 'static,
    {
        let pool = self.pool.clone();
        task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(RepositoryError::from)?;
            f(&mut conn)
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new(operation),
            )
        })?
        .map_err(|e| e.with_operation(operation))
    }

    fn tuple_to_exercise(tuple: Option<ExerciseTuple>) -> Option<Exercise> {
        tuple.map(|(id, name, category)| Exercise { id, name, category })
    }

    fn row_to_enriched(
        row: (SetRow, Option<ExerciseTuple>, Option<ExerciseTuple>),
    ) -> RepositoryResult<SetWithExercises> {
        let (set_row, exercise, superset_exercise) = row;
        Ok(SetWithExercises {
            set: set_row.into_set()?,
            exercise: Self::tuple_to_exercise(exercise),
            superset_exercise: Self::tuple_to_exercise(superset_exercise),
        })
    }
}

/// The joined select list: the set row plus both resolved exercise refs.
macro_rules! enriched_select {
    () => {
        (
            SetRow::as_select(),
            (
                schema::exercises::id,
                schema::exercises::name,
                schema::exercises::category,
            )
                .nullable(),
            (
                superset_exercises.field(schema::exercises::id),
                superset_exercises.field(schema::exercises::name),
                superset_exercises.field(schema::exercises::category),
            )
                .nullable(),
        )
    };
}

/// The double left join resolving primary and superset exercise names.
macro_rules! enriched_join {
    () => {
        schema::sets::table
            .left_join(
                schema::exercises::table
                    .on(schema::sets::exercise_id.eq(schema::exercises::id)),
            )
            .left_join(
                superset_exercises.on(schema::sets::superset_exercise_id
                    .eq(superset_exercises.field(schema::exercises::id).nullable())),
            )
    };
}

#[async_trait]
impl SetRepository for PostgresRepository {
    async fn create_set(&self, set: &NewSet) -> RepositoryResult<Set> {
        let new_row = NewSetRow::from_new_set(set)?;
        self.with_conn("create_set", move |conn| {
            let row: SetRow = diesel::insert_into(schema::sets::table)
                .values(&new_row)
                .get_result(conn)?;
            row.into_set()
        })
        .await
    }

    async fn get_set_by_id(&self, id: i64) -> RepositoryResult<Option<SetWithExercises>> {
        self.with_conn("get_set_by_id", move |conn| {
            let row = enriched_join!()
                .filter(schema::sets::id.eq(id))
                .select(enriched_select!())
                .first::<(SetRow, Option<ExerciseTuple>, Option<ExerciseTuple>)>(conn)
                .optional()?;
            row.map(Self::row_to_enriched).transpose()
        })
        .await
    }

    async fn get_sets_by_user(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> RepositoryResult<Vec<SetWithExercises>> {
        self.with_conn("get_sets_by_user", move |conn| {
            let rows = enriched_join!()
                .filter(schema::sets::user_id.eq(user_id))
                .order((schema::sets::created_at.desc(), schema::sets::id.desc()))
                .limit(limit.max(0))
                .offset(offset.max(0))
                .select(enriched_select!())
                .load::<(SetRow, Option<ExerciseTuple>, Option<ExerciseTuple>)>(conn)?;
            rows.into_iter().map(Self::row_to_enriched).collect()
        })
        .await
    }

    async fn get_sets_by_user_and_exercise(
        &self,
        user_id: i64,
        exercise_id: i64,
        limit: i64,
    ) -> RepositoryResult<Vec<SetWithExercises>> {
        self.with_conn("get_sets_by_user_and_exercise", move |conn| {
            let rows = enriched_join!()
                .filter(schema::sets::user_id.eq(user_id))
                .filter(
                    schema::sets::exercise_id
                        .eq(exercise_id)
                        .or(schema::sets::superset_exercise_id.eq(exercise_id)),
                )
                .order((schema::sets::created_at.desc(), schema::sets::id.desc()))
                .limit(limit.max(0))
                .select(enriched_select!())
                .load::<(SetRow, Option<ExerciseTuple>, Option<ExerciseTuple>)>(conn)?;
            rows.into_iter().map(Self::row_to_enriched).collect()
        })
        .await
    }

    async fn get_sets_by_session(
        &self,
        workout_session_id: i64,
    ) -> RepositoryResult<Vec<SetWithExercises>> {
        self.with_conn("get_sets_by_session", move |conn| {
            let rows = enriched_join!()
                .filter(schema::sets::workout_session_id.eq(workout_session_id))
                .order((
                    schema::sets::set_number.asc(),
                    schema::sets::created_at.asc(),
                    schema::sets::id.asc(),
                ))
                .select(enriched_select!())
                .load::<(SetRow, Option<ExerciseTuple>, Option<ExerciseTuple>)>(conn)?;
            rows.into_iter().map(Self::row_to_enriched).collect()
        })
        .await
    }

    async fn update_set(&self, id: i64, update: &SetUpdate) -> RepositoryResult<Option<Set>> {
        let update = update.clone();
        self.with_conn("update_set", move |conn| {
            conn.transaction::<_, RepositoryError, _>(|conn| {
                let existing = schema::sets::table
                    .find(id)
                    .select(SetRow::as_select())
                    .for_update()
                    .first::<SetRow>(conn)
                    .optional()?;

                let existing = match existing {
                    Some(row) => row.into_set()?,
                    None => return Ok(None),
                };

                // Merge and validate against the row read inside this
                // transaction, not an earlier snapshot.
                let merged = update.merge_into(&existing);
                validate_new_set(&merged)
                    .into_result()
                    .map_err(RepositoryError::validation)?;
                let changeset = SetChangeset::from_merged(&merged, existing.completed)?;

                let row: SetRow = diesel::update(schema::sets::table.find(id))
                    .set(&changeset)
                    .get_result(conn)?;
                row.into_set().map(Some)
            })
        })
        .await
    }

    async fn delete_set(&self, id: i64) -> RepositoryResult<bool> {
        self.with_conn("delete_set", move |conn| {
            let deleted = diesel::delete(schema::sets::table.find(id)).execute(conn)?;
            Ok(deleted > 0)
        })
        .await
    }

    async fn fetch_completed_sets_since(
        &self,
        user_id: i64,
        cutoff: DateTime<Utc>,
    ) -> RepositoryResult<Vec<SetWithExercises>> {
        self.with_conn("fetch_completed_sets_since", move |conn| {
            let rows = enriched_join!()
                .filter(schema::sets::user_id.eq(user_id))
                .filter(schema::sets::completed.eq(true))
                .filter(schema::sets::created_at.ge(cutoff))
                .order((schema::sets::created_at.desc(), schema::sets::id.desc()))
                .select(enriched_select!())
                .load::<(SetRow, Option<ExerciseTuple>, Option<ExerciseTuple>)>(conn)?;
            rows.into_iter().map(Self::row_to_enriched).collect()
        })
        .await
    }

    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn("health_check", move |conn| {
            sql_query("SELECT 1").execute(conn)?;
            Ok(true)
        })
        .await
    }
}

#[async_trait]
impl ExerciseLookup for PostgresRepository {
    async fn exercise_exists(&self, exercise_id: i64) -> RepositoryResult<bool> {
        self.with_conn("exercise_exists", move |conn| {
            let count: i64 = schema::exercises::table
                .filter(schema::exercises::id.eq(exercise_id))
                .count()
                .get_result(conn)?;
            Ok(count > 0)
        })
        .await
    }

    async fn get_exercise(&self, exercise_id: i64) -> RepositoryResult<Option<Exercise>> {
        self.with_conn("get_exercise", move |conn| {
            let row = schema::exercises::table
                .find(exercise_id)
                .select(ExerciseRow::as_select())
                .first::<ExerciseRow>(conn)
                .optional()?;
            Ok(row.map(Exercise::from))
        })
        .await
    }
}

#[async_trait]
impl UserLookup for PostgresRepository {
    async fn user_exists(&self, user_id: i64) -> RepositoryResult<bool> {
        self.with_conn("user_exists", move |conn| {
            let count: i64 = schema::users::table
                .filter(schema::users::id.eq(user_id))
                .count()
                .get_result(conn)?;
            Ok(count > 0)
        })
        .await
    }
}
