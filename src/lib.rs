//! Single-record social stats service.
//!
//! Serves one persisted statistics record (follower count, engagement rate)
//! over a JSON API, with static file serving for every other path. The
//! on-disk copy is a single pretty-printed JSON file; it is seeded with
//! defaults on first start and rewritten whole on every update.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`store`]: The stats record and its file-backed store
//! - [`api`]: HTTP handlers, routes, and response middleware
//! - [`metrics`]: Prometheus counters and exporter

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod store;

pub use config::Config;
pub use error::{Result, StatsError};
