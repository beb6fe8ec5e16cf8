//! Wire types for the REST API.
//!
//! Every endpoint answers with the same envelope shape so clients can
//! handle success and failure uniformly: `{success, message, data}` plus
//! optional `count`, `pagination`, and `errors` members.

use serde::{Deserialize, Serialize};

use crate::models::NewSet;

/// The response envelope shared by all endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    /// Individual violation messages on validation failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl<T> Envelope<T> {
    /// Successful response carrying `data`.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            count: None,
            pagination: None,
            errors: None,
        }
    }

    /// Failed response with no data.
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            count: None,
            pagination: None,
            errors: None,
        }
    }

    /// Attach an element count.
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    /// Attach a pagination echo.
    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }

    /// Attach the individual violation messages.
    pub fn with_errors(mut self, errors: Vec<String>) -> Self {
        self.errors = Some(errors);
        self
    }
}

/// Echo of the paging window applied to a list response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub limit: i64,
    pub offset: i64,
    /// Number of elements actually returned.
    pub count: usize,
}

/// Body for `POST /sets/bulk`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkCreateRequest {
    pub sets: Vec<NewSet>,
}

/// Paging query for the user list endpoint. Values arrive as raw strings so
/// malformed numerics get an enveloped 400 rather than a rejection body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

/// Query for the per-exercise list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExerciseQuery {
    pub limit: Option<String>,
}

/// Query for the statistics endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatsQuery {
    pub days: Option<String>,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
}
