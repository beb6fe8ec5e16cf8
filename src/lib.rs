//! # Gymlog Rust Backend
//!
//! REST backend for a personal fitness tracker.
//!
//! This crate implements the set-logging and workout-statistics subsystem:
//! recording exercise sets (normal / dropset / superset variants), validating
//! their structure, persisting them, and deriving aggregate workout statistics.
//! The backend exposes a REST API via Axum for the web frontend.
//!
//! ## Features
//!
//! - **Set logging**: Create, read, update, delete and bulk-create logged sets
//! - **Validation**: Variant-conditional structural checks before persistence
//! - **Statistics**: Volume, favorite exercises and per-day activity rollups
//! - **HTTP API**: RESTful endpoints for frontend integration
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`models`]: Domain types (sets, weight/reps data) and the set validator
//! - [`db`]: Database operations, repository pattern, and persistence layer
//! - [`services`]: High-level business logic (statistics aggregation)
//! - [`http`]: Axum-based HTTP server and request handlers

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod db;
pub mod models;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
