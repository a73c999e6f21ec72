//! HTTP server library for the snapfeed social backend.
//!
//! Exposes the router, configuration, logging, and metrics so integration
//! tests can drive the full request pipeline without spawning a process.

pub mod api;
pub mod config;
pub mod logging;
pub mod metrics;
