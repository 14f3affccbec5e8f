//! # luxmon-adapter-http-axum
//!
//! HTTP adapter using `axum`.
//!
//! ## Responsibilities
//! - Serve the JSON REST API (`/api`) for sites, readings, jobs, events,
//!   and the manual automation trigger
//! - Stream real-time events over SSE
//! - Apply CORS and request tracing layers
//!
//! ## Dependency rule
//! Depends on `luxmon-app` (services and port traits) and `luxmon-domain`
//! only. It never touches storage directly.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
