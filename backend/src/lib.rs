//! # Kitchen calendar
//!
//! Calendar core for a food-safety and production scheduling back office.
//! Cleaning tasks and production (recipe) tasks live in an external task
//! backend; this crate turns them into calendar events, filters them, keeps
//! the page state, coordinates the task drawers and pushes drag/drop
//! changes back to the backend.
//!
//! ## Architecture
//!
//! - [`models`]: Calendar events, backend record shapes, resources
//! - [`services`]: Normalization, filter engine, schedule state, drawer
//!   coordinator, drag/drop adapter
//! - [`db`]: Repository trait, local and REST implementations, configuration
//! - [`http`]: Axum-based HTTP API for the calendar widget

// RepositoryError carries rich context for debugging.
#![allow(clippy::result_large_err)]

pub mod db;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
