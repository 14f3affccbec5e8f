//! # luxmon-domain
//!
//! Pure domain model for the luxmon generation-monitoring system.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Sites** (installations that produce periodic meter readings)
//! - Define **Readings** (immutable timestamped generation measurements)
//! - Define **Jobs** (tracked work items raised when an anomaly is detected)
//! - Define **Rules** (the no-communication and zero-generation detectors
//!   and their tunable parameters)
//! - Define **Events** (append-only records of things that happened)
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod event;
pub mod job;
pub mod reading;
pub mod rule;
pub mod site;
