//! HTTP server exposing the Swiss pairing engine.
//!
//! - [`api`]: router, handlers and request-id middleware
//! - [`config`]: environment-driven server configuration
//! - [`logging`]: tracing subscriber and structured log helpers
//! - [`metrics`]: Prometheus counters and histograms

pub mod api;
pub mod config;
pub mod logging;
pub mod metrics;
