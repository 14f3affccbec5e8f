//! # luxmon-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `SiteRepository` — CRUD for sites
//!   - `ReadingRepository` — append & query time-series readings
//!   - `JobRepository` — CRUD and open-job lookups for jobs
//!   - `EventStore` — append & query events
//!   - `MeterIntegration` — discovery of sites and readings from an
//!     external source
//! - Define **driving/inbound ports** as use-case structs:
//!   - `SiteService`, `ReadingService`, `JobService`
//!   - `AutomationEngine` — evaluate rules over reading history, raise jobs
//! - Provide **in-process infrastructure** (event bus) that doesn't need IO
//! - Orchestrate domain objects without knowing *how* persistence or IO works
//!
//! ## Dependency rule
//! Depends on `luxmon-domain` only (plus `tokio::sync` for channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod automation_engine;
pub mod event_bus;
pub mod ports;
pub mod services;
