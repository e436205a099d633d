//! Test modules for the scanner system
//!
//! Aggregator, discovery and orchestrator suites, all running against the
//! in-memory transport.

pub mod helpers;

mod types;
