//! HTTP server module exposing the set-logging core as a REST API.
//!
//! Thin axum layer over the service functions in [`crate::db::services`]:
//! request parsing, the wire envelope, and status-code mapping live here,
//! business rules do not.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
